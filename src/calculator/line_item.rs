// src/calculator/line_item.rs

//! Line-item ROI under a linear-depletion model.
//!
//! Inventory sells at a constant daily velocity, so cases in hand decline
//! linearly to zero and the average dollars held are half the starting value.
//! ROI is measured against the *incremental* exposure of the bulk order over
//! a proportionally sized small-deal baseline.

use crate::model::{
    DealParameters, LineItemMetrics, LineItemStatus, Product, StockWarning, DAYS_PER_YEAR,
};
use tracing::debug;

/// Computes exposure and return metrics for one product at its current
/// `bulk_quantity`.
///
/// Never fails: zero velocity, zero allocation, zero delta investment and zero
/// days-at-risk all resolve to defined values.
pub fn compute_line_item_roi(product: &Product, params: &DealParameters) -> LineItemMetrics {
    if product.annual_cases <= 0.0 {
        return LineItemMetrics::zeroed(&product.name, LineItemStatus::ZeroVelocity);
    }
    if product.bulk_quantity <= 0.0 {
        return LineItemMetrics::zeroed(&product.name, LineItemStatus::NoBulkQuantity);
    }

    let bulk_cases = product.bulk_quantity;
    let bottles = product.bottles_per_case as f64;
    let daily_velocity = product.daily_velocity();

    // Q1 = ceil(Q2 * small / bulk); scales with this product's share of the deal
    let small_deal_cases = if params.deal_size_cases > 0.0 {
        (bulk_cases * params.small_deal_cases / params.deal_size_cases).ceil()
    } else {
        0.0
    };

    let cases_sold_during_terms = daily_velocity * params.payment_terms_days;
    let cases_left_small = (small_deal_cases - cases_sold_during_terms).max(0.0);
    let cases_left_bulk = (bulk_cases - cases_sold_during_terms).max(0.0);

    // Triangular area: average held value is half the starting value
    let avg_exposure_small = cases_left_small * product.price_small * bottles / 2.0;
    let avg_exposure_bulk = cases_left_bulk * product.price_bulk * bottles / 2.0;
    let delta_investment = avg_exposure_bulk - avg_exposure_small;

    let total_savings = bulk_cases * bottles * (product.price_small - product.price_bulk);

    let roi = if delta_investment > 0.0 {
        total_savings / delta_investment
    } else {
        0.0
    };

    let days_at_risk = if cases_left_bulk > 0.0 {
        cases_left_bulk / daily_velocity
    } else {
        0.0
    };

    let (annual_roi_multiplier, annualized_roi) = if days_at_risk > 0.0 {
        let multiplier = DAYS_PER_YEAR / days_at_risk;
        (multiplier, roi * multiplier)
    } else {
        // Everything sold inside the terms window
        (0.0, roi)
    };

    let days_to_deplete_bulk = bulk_cases / daily_velocity;
    let total_stock_days = (product.on_hand_cases + bulk_cases) / daily_velocity;

    let avg_inventory_cases = (product.on_hand_cases + bulk_cases) / 2.0;
    let deal_cycles_per_year = if avg_inventory_cases > 0.0 {
        product.annual_cases / avg_inventory_cases
    } else {
        0.0
    };

    let warning = if total_stock_days < params.min_days_stock {
        Some(StockWarning {
            projected_days: total_stock_days,
            required_days: params.min_days_stock,
        })
    } else {
        None
    };

    debug!(
        product = %product.name,
        bulk_cases,
        small_deal_cases,
        delta_investment,
        roi,
        days_at_risk,
        annualized_roi,
        "line item evaluated"
    );

    LineItemMetrics {
        product_name: product.name.clone(),
        status: LineItemStatus::Evaluated,
        small_deal_cases,
        cases_sold_during_terms,
        cases_left_small,
        cases_left_bulk,
        avg_exposure_small,
        avg_exposure_bulk,
        delta_investment,
        total_savings,
        roi,
        days_at_risk,
        annual_roi_multiplier,
        annualized_roi,
        days_to_deplete_bulk,
        total_stock_days,
        deal_cycles_per_year,
        warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params() -> DealParameters {
        DealParameters {
            deal_size_cases: 60.0,
            small_deal_cases: 30.0,
            payment_terms_days: 30.0,
            min_days_stock: 30.0,
        }
    }

    fn reference_product() -> Product {
        Product::new("Reference", 10.0, 8.0, 12, 0.0, 360.0).with_bulk_quantity(60.0)
    }

    #[test]
    fn test_reference_scenario() {
        let m = compute_line_item_roi(&reference_product(), &params());

        let velocity = 360.0 / 365.0;
        let sold = velocity * 30.0;
        assert_eq!(m.status, LineItemStatus::Evaluated);
        assert_eq!(m.small_deal_cases, 30.0);
        assert!((m.cases_sold_during_terms - sold).abs() < 1e-9);
        assert!((m.cases_left_small - (30.0 - sold)).abs() < 1e-9);
        assert!((m.cases_left_bulk - (60.0 - sold)).abs() < 1e-9);
        assert!((m.total_savings - 1440.0).abs() < 1e-9);

        let expected_delta = (60.0 - sold) * 8.0 * 12.0 / 2.0 - (30.0 - sold) * 10.0 * 12.0 / 2.0;
        assert!((m.delta_investment - expected_delta).abs() < 1e-9);
        assert!(m.delta_investment > 0.0);
        assert!(m.roi > 0.0);
        assert!(m.annualized_roi > 0.0);

        let days_at_risk = (60.0 - sold) / velocity;
        assert!((m.days_at_risk - days_at_risk).abs() < 1e-9);
        assert!((m.annualized_roi - m.roi * 365.0 / days_at_risk).abs() < 1e-9);
        assert!(m.warning.is_none());
    }

    #[test]
    fn test_zero_velocity_is_all_zero() {
        let p = Product::new("Dead", 10.0, 8.0, 12, 5.0, 0.0).with_bulk_quantity(10.0);
        let m = compute_line_item_roi(&p, &params());
        assert_eq!(m.status, LineItemStatus::ZeroVelocity);
        assert_eq!(m.total_savings, 0.0);
        assert_eq!(m.delta_investment, 0.0);
        assert_eq!(m.roi, 0.0);
        assert_eq!(m.annualized_roi, 0.0);
    }

    #[test]
    fn test_zero_bulk_quantity_is_all_zero() {
        let p = Product::new("Idle", 10.0, 8.0, 12, 5.0, 100.0);
        let m = compute_line_item_roi(&p, &params());
        assert_eq!(m.status, LineItemStatus::NoBulkQuantity);
        assert_eq!(m.roi, 0.0);
        assert_eq!(m.annualized_roi, 0.0);
    }

    #[test]
    fn test_fully_sold_during_terms_passes_roi_through() {
        // 3650 cases/year = 10/day; 30 days of terms clears 300 cases
        let p = Product::new("Fast", 10.0, 8.0, 12, 0.0, 3650.0).with_bulk_quantity(20.0);
        let m = compute_line_item_roi(&p, &params());
        assert_eq!(m.cases_left_bulk, 0.0);
        assert_eq!(m.delta_investment, 0.0);
        assert_eq!(m.roi, 0.0);
        assert_eq!(m.days_at_risk, 0.0);
        assert_eq!(m.annual_roi_multiplier, 0.0);
        assert_eq!(m.annualized_roi, m.roi);
        assert!(m.total_savings > 0.0);
    }

    #[test]
    fn test_understock_warning_is_advisory() {
        let mut p = params();
        p.min_days_stock = 120.0;
        let m = compute_line_item_roi(&reference_product(), &p);
        let w = m.warning.expect("coverage is ~61 days");
        assert!((w.projected_days - 60.0 / (360.0 / 365.0)).abs() < 1e-9);
        assert_eq!(w.required_days, 120.0);
        assert!(m.roi > 0.0);
    }

    #[test]
    fn test_small_deal_baseline_rounds_up() {
        let p = Product::new("Partial", 10.0, 8.0, 12, 0.0, 360.0).with_bulk_quantity(25.0);
        let m = compute_line_item_roi(&p, &params());
        assert_eq!(m.small_deal_cases, 13.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_metrics_are_finite(
            price_small in 0.5f64..100.0,
            discount in 0.0f64..0.5,
            bottles in 1u32..24,
            on_hand in 0.0f64..200.0,
            annual in 0.0f64..5000.0,
            bulk in 0.0f64..500.0,
            terms in 0.0f64..120.0,
        ) {
            let p = Product::new("P", price_small, price_small * (1.0 - discount), bottles, on_hand, annual)
                .with_bulk_quantity(bulk);
            let params = DealParameters { payment_terms_days: terms, ..params() };
            let m = compute_line_item_roi(&p, &params);
            prop_assert!(m.roi.is_finite());
            prop_assert!(m.annualized_roi.is_finite());
            prop_assert!(m.delta_investment.is_finite());
            prop_assert!(m.roi >= 0.0);
            if m.delta_investment <= 0.0 {
                prop_assert_eq!(m.roi, 0.0);
            }
        }
    }
}
