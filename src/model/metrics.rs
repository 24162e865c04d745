// src/model/metrics.rs

use serde::Serialize;
use std::fmt;

/// How a line item was resolved by the ROI model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineItemStatus {
    /// Full linear-depletion evaluation ran.
    Evaluated,
    /// The product does not sell; all metrics are zero.
    ZeroVelocity,
    /// Nothing allocated to the bulk deal; all metrics are zero.
    NoBulkQuantity,
}

/// Non-fatal advisory: projected coverage falls short of the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StockWarning {
    pub projected_days: f64,
    pub required_days: f64,
}

impl fmt::Display for StockWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Insufficient stock: {:.1} days vs {} days required",
            self.projected_days, self.required_days
        )
    }
}

/// Per-product exposure and return metrics. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItemMetrics {
    pub product_name: String,
    pub status: LineItemStatus,

    // Baseline vs bulk sizing
    pub small_deal_cases: f64,
    pub cases_sold_during_terms: f64,
    pub cases_left_small: f64,
    pub cases_left_bulk: f64,

    // Exposure (average dollars tied up after terms)
    pub avg_exposure_small: f64,
    pub avg_exposure_bulk: f64,
    pub delta_investment: f64,

    // Return
    pub total_savings: f64,
    pub roi: f64,
    pub days_at_risk: f64,
    pub annual_roi_multiplier: f64,
    pub annualized_roi: f64,

    // Inventory turnover
    pub days_to_deplete_bulk: f64,
    pub total_stock_days: f64,
    pub deal_cycles_per_year: f64,

    pub warning: Option<StockWarning>,
}

impl LineItemMetrics {
    /// All-zero metrics for a degenerate line item.
    pub fn zeroed(product_name: impl Into<String>, status: LineItemStatus) -> Self {
        Self {
            product_name: product_name.into(),
            status,
            small_deal_cases: 0.0,
            cases_sold_during_terms: 0.0,
            cases_left_small: 0.0,
            cases_left_bulk: 0.0,
            avg_exposure_small: 0.0,
            avg_exposure_bulk: 0.0,
            delta_investment: 0.0,
            total_savings: 0.0,
            roi: 0.0,
            days_at_risk: 0.0,
            annual_roi_multiplier: 0.0,
            annualized_roi: 0.0,
            days_to_deplete_bulk: 0.0,
            total_stock_days: 0.0,
            deal_cycles_per_year: 0.0,
            warning: None,
        }
    }

    pub fn is_zero_velocity(&self) -> bool {
        self.status == LineItemStatus::ZeroVelocity
    }
}

/// Investment-weighted roll-up of line items.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PortfolioMetrics {
    pub total_savings: f64,
    pub total_delta_investment: f64,
    pub roi: f64,
    pub weighted_avg_days_at_risk: f64,
    pub roi_multiplier: f64,
    pub deal_cycles_per_year: f64,
    pub warning_count: usize,
}

impl PortfolioMetrics {
    /// Portfolio ROI scaled to a 365-day basis.
    pub fn annualized_roi(&self) -> f64 {
        self.roi * self.roi_multiplier
    }
}
