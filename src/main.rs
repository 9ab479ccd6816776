use anyhow::{Context, Result};
use clap::Parser;
use stock_recon::cli::{Cli, Commands};
use stock_recon::config::Config;
use stock_recon::pipeline::{self, RunOptions};
use stock_recon::report;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("設定ファイルの読み込みに失敗")?;

    match cli.command {
        Commands::Run {
            inventory,
            requisition,
            inventory_sheets,
            requisition_sheets,
            no_annotate,
            prefix,
            json,
        } => {
            let mut options = RunOptions::from_config(&config, inventory, requisition);
            if !inventory_sheets.is_empty() {
                options.inventory_sheets = inventory_sheets;
            }
            if !requisition_sheets.is_empty() {
                options.requisition_sheets = requisition_sheets;
            }
            if let Some(prefix) = prefix {
                options.output_prefix = prefix;
            }
            options.annotate = !no_annotate;

            let run_report = pipeline::run(&options)
                .with_context(|| format!("照合に失敗: {}", options.inventory_path.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&run_report)?);
            } else {
                print!("{}", report::render_text(&run_report));
                if options.annotate {
                    println!("\n处理完成！标色后的文件已输出在原文件夹，文件名前缀为“{}”。", options.output_prefix);
                }
            }
        }

        Commands::Config { show, init } => {
            if init {
                let path = match &cli.config {
                    Some(path) => {
                        Config::default().save_to(path)?;
                        path.clone()
                    }
                    None => Config::default().save()?,
                };
                println!("✔ 設定ファイルを作成しました: {}", path.display());
            }

            if show || !init {
                println!("設定:");
                println!("  盘点シート: {}", config.inventory_sheets.join(", "));
                println!("  领用单シート: {}", config.requisition_sheets.join(", "));
                println!(
                    "  盘点列: {} / {} (表頭 {}行目)",
                    config.inventory.name_label,
                    config.inventory.quantity_label,
                    config.inventory.header_row_offset + 1
                );
                println!(
                    "  领用列: {} / {} (表頭 {}行目)",
                    config.requisition.name_label,
                    config.requisition.quantity_label,
                    config.requisition.header_row_offset + 1
                );
                println!("  出力前缀: {}", config.output_prefix);
            }
        }
    }

    Ok(())
}
