use crate::error::{ReconError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stock_recon_common::{ExtractOptions, MarkerPalette, DEFAULT_OUTPUT_PREFIX};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 盘点シート名
    pub inventory_sheets: Vec<String>,
    /// 领用单シート名
    pub requisition_sheets: Vec<String>,
    pub inventory: ExtractOptions,
    pub requisition: ExtractOptions,
    /// 標色ファイル名の前缀
    pub output_prefix: String,
    pub palette: MarkerPalette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventory_sheets: vec!["电类盘点".into(), "水类盘点".into()],
            requisition_sheets: vec!["领用单".into()],
            inventory: ExtractOptions::inventory(),
            requisition: ExtractOptions::requisition(),
            output_prefix: DEFAULT_OUTPUT_PREFIX.into(),
            palette: MarkerPalette::default(),
        }
    }
}

impl Config {
    /// 既定の場所から読み込む（無ければ既定値）
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReconError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("stock-recon").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        if self.output_prefix.is_empty() {
            return Err(ReconError::Config(
                "output_prefix が空です（元ファイルを上書きしてしまいます）".into(),
            ));
        }
        for options in [&self.inventory, &self.requisition] {
            if options.name_label.is_empty() || options.quantity_label.is_empty() {
                return Err(ReconError::Config("列ラベルが空です".into()));
            }
        }
        Ok(())
    }
}
