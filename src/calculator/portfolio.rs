// src/calculator/portfolio.rs

use crate::calculator::line_item::compute_line_item_roi;
use crate::model::{DealParameters, LineItemMetrics, PortfolioMetrics, Product, DAYS_PER_YEAR};

/// Rolls line items up into investment-weighted portfolio metrics.
///
/// Days-at-risk are weighted by each line's delta investment. Lines with no
/// positive delta investment or no days at risk carry no capital exposure and
/// are left out of the weighting.
///
/// `products` must be parallel to `line_items`; it feeds the turnover figure.
pub fn aggregate(products: &[Product], line_items: &[LineItemMetrics]) -> PortfolioMetrics {
    let mut total_savings = 0.0;
    let mut total_delta_investment = 0.0;
    let mut weighted_days_at_risk = 0.0;
    let mut weighting_investment = 0.0;
    let mut total_annual_cases = 0.0;
    let mut total_avg_inventory = 0.0;
    let mut warning_count = 0;

    for (product, item) in products.iter().zip(line_items) {
        if item.is_zero_velocity() {
            continue;
        }

        total_savings += item.total_savings;
        total_delta_investment += item.delta_investment;

        if item.delta_investment > 0.0 && item.days_at_risk > 0.0 {
            weighted_days_at_risk += item.days_at_risk * item.delta_investment;
            weighting_investment += item.delta_investment;
        }

        total_annual_cases += product.annual_cases;
        total_avg_inventory += (product.on_hand_cases + product.bulk_quantity) / 2.0;

        if item.warning.is_some() {
            warning_count += 1;
        }
    }

    let roi = if total_delta_investment > 0.0 {
        total_savings / total_delta_investment
    } else {
        0.0
    };

    let weighted_avg_days_at_risk = if weighting_investment > 0.0 {
        weighted_days_at_risk / weighting_investment
    } else {
        0.0
    };

    let roi_multiplier = if weighted_avg_days_at_risk > 0.0 {
        DAYS_PER_YEAR / weighted_avg_days_at_risk
    } else {
        0.0
    };

    let deal_cycles_per_year = if total_avg_inventory > 0.0 {
        total_annual_cases / total_avg_inventory
    } else {
        0.0
    };

    PortfolioMetrics {
        total_savings,
        total_delta_investment,
        roi,
        weighted_avg_days_at_risk,
        roi_multiplier,
        deal_cycles_per_year,
        warning_count,
    }
}

/// Evaluates every product and aggregates in one pass.
pub fn portfolio_metrics(products: &[Product], params: &DealParameters) -> PortfolioMetrics {
    let items: Vec<LineItemMetrics> = products
        .iter()
        .map(|p| compute_line_item_roi(p, params))
        .collect();
    aggregate(products, &items)
}
