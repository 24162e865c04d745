// src/io/reporting.rs

use crate::engine::Evaluation;
use crate::error::Result;
use crate::model::Product;
use crate::strategy::optimization::SwapRecord;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One row of the line-item report.
#[derive(Debug, Clone, Serialize)]
pub struct LineItemRow<'a> {
    pub product: &'a str,
    pub annual_cases: f64,
    pub on_hand_cases: f64,
    pub bulk_quantity: f64,
    pub small_deal_cases: f64,
    pub total_savings: f64,
    pub delta_investment: f64,
    pub roi: f64,
    pub days_at_risk: f64,
    pub annualized_roi: f64,
    pub total_stock_days: f64,
    pub deal_cycles_per_year: f64,
    pub warning: String,
}

#[derive(Debug, Clone, Serialize)]
struct PortfolioRow {
    metric: &'static str,
    value: f64,
}

fn write_rows<T: Serialize>(file_path: &Path, rows: impl IntoIterator<Item = T>) -> Result<usize> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut wtr = csv::Writer::from_path(file_path)?;
    let mut count = 0;
    for row in rows {
        wtr.serialize(row)?;
        count += 1;
    }
    wtr.flush()?;

    info!(rows = count, path = %file_path.display(), "report written");
    Ok(count)
}

/// Builds report rows pairing each product with its metrics.
pub fn line_item_rows<'a>(products: &'a [Product], evaluation: &'a Evaluation) -> Vec<LineItemRow<'a>> {
    products
        .iter()
        .zip(&evaluation.line_items)
        .map(|(p, m)| LineItemRow {
            product: &p.name,
            annual_cases: p.annual_cases,
            on_hand_cases: p.on_hand_cases,
            bulk_quantity: p.bulk_quantity,
            small_deal_cases: m.small_deal_cases,
            total_savings: m.total_savings,
            delta_investment: m.delta_investment,
            roi: m.roi,
            days_at_risk: m.days_at_risk,
            annualized_roi: m.annualized_roi,
            total_stock_days: m.total_stock_days,
            deal_cycles_per_year: m.deal_cycles_per_year,
            warning: m.warning.map(|w| w.to_string()).unwrap_or_default(),
        })
        .collect()
}

/// Writes one row per product with its allocation and metrics.
pub fn write_line_item_report(
    file_path: &Path,
    products: &[Product],
    evaluation: &Evaluation,
) -> Result<usize> {
    write_rows(file_path, line_item_rows(products, evaluation))
}

/// Writes the portfolio roll-up as metric/value pairs.
pub fn write_portfolio_report(file_path: &Path, evaluation: &Evaluation) -> Result<usize> {
    let p = &evaluation.portfolio;
    let rows = [
        PortfolioRow { metric: "total_savings", value: p.total_savings },
        PortfolioRow { metric: "total_delta_investment", value: p.total_delta_investment },
        PortfolioRow { metric: "roi", value: p.roi },
        PortfolioRow { metric: "weighted_avg_days_at_risk", value: p.weighted_avg_days_at_risk },
        PortfolioRow { metric: "roi_multiplier", value: p.roi_multiplier },
        PortfolioRow { metric: "annualized_roi", value: p.annualized_roi() },
        PortfolioRow { metric: "deal_cycles_per_year", value: p.deal_cycles_per_year },
        PortfolioRow { metric: "warning_count", value: p.warning_count as f64 },
    ];
    write_rows(file_path, rows)
}

/// Writes the optimizer's accepted swaps, one row each.
pub fn write_history_report(file_path: &Path, history: &[SwapRecord]) -> Result<usize> {
    write_rows(file_path, history)
}
