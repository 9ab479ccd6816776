//! エラー型定義
//!
//! 致命的なエラーのみをここで扱う。シート単位・行単位の問題は
//! [`crate::diagnostics::Diagnostic`] として収集され、処理は継続する。

use std::path::{Path, PathBuf};
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("source unreadable: {path}: {message}")]
    SourceUnreadable { path: PathBuf, message: String },

    #[error("failed to save annotated copy: {path}: {message}")]
    Save { path: PathBuf, message: String },

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    pub fn source_unreadable(path: &Path, message: impl std::fmt::Display) -> Self {
        Error::SourceUnreadable {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn save(path: &Path, message: impl std::fmt::Display) -> Self {
        Error::Save {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// エラーの原因となったファイルパス（あれば）
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::SourceUnreadable { path, .. } | Error::Save { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_source_unreadable() {
        let error = Error::source_unreadable(Path::new("/tmp/盘点.xlsx"), "not a zip file");
        let display = format!("{}", error);
        assert!(display.contains("source unreadable"));
        assert!(display.contains("盘点.xlsx"));
        assert!(display.contains("not a zip file"));
    }

    #[test]
    fn test_error_path() {
        let error = Error::save(Path::new("/dir/标色_report.xlsx"), "disk full");
        assert_eq!(error.path(), Some(Path::new("/dir/标色_report.xlsx")));

        let error = Error::Config("bad".to_string());
        assert!(error.path().is_none());
    }

    #[test]
    fn test_error_display_config() {
        let error = Error::Config("设定文件不正".to_string());
        let display = format!("{}", error);
        assert_eq!(display, "Config error: 设定文件不正");
    }
}
