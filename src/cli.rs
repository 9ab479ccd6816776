use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stock-recon")]
#[command(about = "盘点表・领用单の数量照合と標色", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 設定ファイル（省略時は ~/.config/stock-recon/config.json）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 照合して標色ファイルを出力
    Run {
        /// 盘点表ファイル
        #[arg(required = true)]
        inventory: PathBuf,

        /// 领用单ファイル（省略時は盘点表と同じファイルから読む）
        #[arg(short, long)]
        requisition: Option<PathBuf>,

        /// 盘点シート名（複数指定可、省略時は設定値）
        #[arg(long = "inventory-sheet")]
        inventory_sheets: Vec<String>,

        /// 领用单シート名（複数指定可、省略時は設定値）
        #[arg(long = "requisition-sheet")]
        requisition_sheets: Vec<String>,

        /// 標色ファイルを出力しない
        #[arg(long)]
        no_annotate: bool,

        /// 出力ファイル名の前缀
        #[arg(long)]
        prefix: Option<String>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 既定値で設定ファイルを作成
        #[arg(long)]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_sheets() {
        let cli = Cli::parse_from([
            "stock-recon",
            "run",
            "盘点.xlsx",
            "-r",
            "领用.xlsx",
            "--inventory-sheet",
            "电类盘点",
            "--inventory-sheet",
            "水类盘点",
            "--no-annotate",
        ]);
        match cli.command {
            Commands::Run {
                inventory,
                requisition,
                inventory_sheets,
                requisition_sheets,
                no_annotate,
                ..
            } => {
                assert_eq!(inventory, PathBuf::from("盘点.xlsx"));
                assert_eq!(requisition, Some(PathBuf::from("领用.xlsx")));
                assert_eq!(inventory_sheets, vec!["电类盘点", "水类盘点"]);
                assert!(requisition_sheets.is_empty());
                assert!(no_annotate);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_global_verbose() {
        let cli = Cli::parse_from(["stock-recon", "config", "--show", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Config { show: true, init: false }));
    }
}
