//! 照合結果のテキスト表示

use crate::pipeline::RunReport;
use std::fmt;
use stock_recon_common::QuantityMap;

/// 1行あたりの品名数
pub const ITEMS_PER_LINE: usize = 10;

/// 品名を `，` 区切りで1行 `per_line` 件ずつ並べる。空なら `无`。
pub fn join_items_per_line<'a, I>(items: I, per_line: usize) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let items: Vec<&str> = items.into_iter().map(String::as_str).collect();
    if items.is_empty() {
        return "无".to_string();
    }
    items
        .chunks(per_line.max(1))
        .map(|chunk| chunk.join("，"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_quantities(map: &QuantityMap) -> String {
    if map.is_empty() {
        return "无".to_string();
    }
    map.iter()
        .map(|(name, qty)| format!("{}: {}", name, qty))
        .collect::<Vec<_>>()
        .join("，")
}

pub fn render_text(report: &RunReport) -> String {
    TextReport(report).to_string()
}

/// 端末向けの表示
pub struct TextReport<'a>(pub &'a RunReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let result = &report.result;

        writeln!(f, "盘点汇总：{}", format_quantities(&report.inventory.quantities))?;
        writeln!(f, "领用汇总：{}", format_quantities(&report.requisition.quantities))?;

        writeln!(f, "\n一致的品名及数量:")?;
        if result.consistent.is_empty() {
            writeln!(f, "无")?;
        }
        for item in &result.consistent {
            writeln!(f, "{}: {}", item.name, item.quantity)?;
        }

        writeln!(f, "\n不一致的品名:")?;
        writeln!(f, "品名 | 盘点数量 | 领用单数量 | 差异")?;
        for d in &result.inconsistent {
            writeln!(f, "{} | {} | {} | {}", d.name, d.first, d.second, d.difference)?;
        }

        writeln!(f, "\n只在盘点表有的品名（请核查）:")?;
        writeln!(f, "{}", join_items_per_line(&result.only_in_first, ITEMS_PER_LINE))?;

        writeln!(f, "\n只在领用单有的品名（请核查）:")?;
        writeln!(f, "{}", join_items_per_line(&result.only_in_second, ITEMS_PER_LINE))?;

        let mut diagnostics = report
            .inventory
            .diagnostics
            .iter()
            .chain(&report.requisition.diagnostics)
            .chain(report.annotations.iter().flat_map(|a| &a.diagnostics))
            .peekable();
        if diagnostics.peek().is_some() {
            writeln!(f, "\n警告:")?;
            for d in diagnostics {
                writeln!(f, "- {}", d)?;
            }
        }

        if !report.annotations.is_empty() {
            writeln!(f)?;
            for annotation in &report.annotations {
                writeln!(f, "已输出标色文件: {}", annotation.output.display())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::path::PathBuf;
    use stock_recon_common::{reconcile, Extraction};

    fn names(n: usize) -> BTreeSet<String> {
        (0..n).map(|i| format!("品{:02}", i)).collect()
    }

    #[test]
    fn test_join_items_per_line() {
        assert_eq!(join_items_per_line(&names(0), 10), "无");
        assert_eq!(join_items_per_line(&names(3), 10), "品00，品01，品02");

        let joined = join_items_per_line(&names(12), 10);
        let lines: Vec<&str> = joined.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "品10，品11");
    }

    #[test]
    fn test_render_text_sections() {
        let inventory: QuantityMap = [("Bolt".to_string(), 10), ("Nut".to_string(), 4)]
            .into_iter()
            .collect();
        let requisition: QuantityMap = [("Bolt".to_string(), 7), ("Screw".to_string(), 2)]
            .into_iter()
            .collect();
        let result = reconcile(&inventory, &requisition);
        let report = RunReport {
            inventory_path: PathBuf::from("a.xlsx"),
            requisition_path: PathBuf::from("b.xlsx"),
            inventory: Extraction {
                quantities: inventory,
                ..Default::default()
            },
            requisition: Extraction {
                quantities: requisition,
                ..Default::default()
            },
            result,
            annotations: vec![],
        };

        let text = render_text(&report);
        assert!(text.contains("盘点汇总：Bolt: 10，Nut: 4"));
        assert!(text.contains("Bolt | 10 | 7 | 3"));
        assert!(text.contains("只在盘点表有的品名（请核查）:\nNut"));
        assert!(text.contains("只在领用单有的品名（请核查）:\nScrew"));
        assert!(!text.contains("警告"));
    }
}
