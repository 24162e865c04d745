// src/strategy/implementations.rs

use crate::model::{total_bulk_quantity, DealParameters, Product};
use crate::strategy::traits::{AllocationMode, AllocationStrategy};
use tracing::{debug, info, warn};

/// Coverage ceiling applied after allocation to avoid absurd overstock.
pub const MAX_INVENTORY_DAYS: f64 = 90.0;

// =========================================================================
// Shared allocation steps
// =========================================================================

/// Working copy of the products with every allocation cleared.
fn reset_allocation(products: &[Product]) -> Vec<Product> {
    products
        .iter()
        .cloned()
        .map(|p| p.with_bulk_quantity(0.0))
        .collect()
}

/// Raises each product to the cases needed for `min_days` of coverage.
///
/// Returns the total number of cases added.
fn reserve_minimum_stock(products: &mut [Product], min_days: f64) -> f64 {
    if min_days <= 0.0 {
        return 0.0;
    }

    let mut total_added = 0.0;
    for product in products.iter_mut() {
        let needed = product.minimum_stock_needed(min_days);
        let current = product.bulk_quantity;
        product.bulk_quantity = current.max(needed);
        total_added += product.bulk_quantity - current;
    }
    debug!(min_days, total_added, "reserved minimum stock");
    total_added
}

/// Caps each allocation so projected coverage stays under `max_days`.
fn cap_maximum_inventory(products: &mut [Product], max_days: f64) {
    for product in products.iter_mut() {
        let ceiling = product.maximum_stock(max_days);
        if product.bulk_quantity > ceiling {
            debug!(
                product = %product.name,
                from = product.bulk_quantity,
                to = ceiling,
                "capped allocation"
            );
            product.bulk_quantity = ceiling;
        }
    }
}

/// Floors every allocation, then hands the whole-case shortfall out one case
/// at a time by largest fractional remainder (Hamilton apportionment).
///
/// Equal remainders resolve in input order. Any residual below one case goes
/// to the first product that sells.
fn round_preserving_total(products: &mut [Product], target_total: f64) {
    let mut remainders: Vec<(usize, f64)> = Vec::with_capacity(products.len());
    let mut floored_total = 0.0;

    for (idx, product) in products.iter_mut().enumerate() {
        let floored = product.bulk_quantity.floor();
        remainders.push((idx, product.bulk_quantity - floored));
        product.bulk_quantity = floored;
        floored_total += floored;
    }

    let shortfall = (target_total - floored_total).floor();
    if shortfall > 0.0 {
        // Stable sort keeps input order among equal remainders
        remainders.sort_by(|a, b| b.1.total_cmp(&a.1));
        for &(idx, _) in remainders.iter().take(shortfall as usize) {
            products[idx].bulk_quantity += 1.0;
        }
    }

    let first_selling = products.iter().position(Product::has_velocity);
    top_up_shortfall(products, target_total, first_selling);
}

/// Adds any remaining shortfall against `target_total` to one product.
fn top_up_shortfall(products: &mut [Product], target_total: f64, recipient: Option<usize>) {
    let current = total_bulk_quantity(products);
    if current >= target_total {
        return;
    }
    match recipient {
        Some(idx) => {
            debug!(
                product = %products[idx].name,
                shortfall = target_total - current,
                "topping up allocation"
            );
            products[idx].bulk_quantity += target_total - current;
        }
        None => warn!(
            shortfall = target_total - current,
            "no product can absorb the remaining allocation"
        ),
    }
}

// =========================================================================
// 1. Proportional Allocation
// =========================================================================

/// Each product's share of the deal follows its share of annual sales.
///
/// When a minimum coverage is set, that floor is reserved first and only the
/// remainder is split by sales. Results are rounded by largest remainder,
/// capped at [`MAX_INVENTORY_DAYS`], then topped up to the deal size.
#[derive(Debug, Clone)]
pub struct ProportionalStrategy {
    max_inventory_days: f64,
}

impl ProportionalStrategy {
    pub fn new() -> Self {
        Self {
            max_inventory_days: MAX_INVENTORY_DAYS,
        }
    }
}

impl Default for ProportionalStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationStrategy for ProportionalStrategy {
    fn name(&self) -> &'static str {
        AllocationMode::Proportional.as_str()
    }

    fn allocate(&self, products: &[Product], params: &DealParameters) -> Vec<Product> {
        let mut result = reset_allocation(products);

        let total_annual: f64 = result
            .iter()
            .filter(|p| p.has_velocity())
            .map(|p| p.annual_cases)
            .sum();

        if total_annual <= 0.0 {
            warn!("no annual sales across products; nothing allocated");
            return result;
        }

        let mut target = params.deal_size_cases;
        if params.min_days_stock > 0.0 {
            let reserved = reserve_minimum_stock(&mut result, params.min_days_stock);
            target = (target - reserved).max(0.0);
        }

        for product in result.iter_mut().filter(|p| p.has_velocity()) {
            product.bulk_quantity += product.annual_cases / total_annual * target;
        }

        round_preserving_total(&mut result, params.deal_size_cases);
        cap_maximum_inventory(&mut result, self.max_inventory_days);

        let first_selling = result.iter().position(Product::has_velocity);
        top_up_shortfall(&mut result, params.deal_size_cases, first_selling);

        info!(
            strategy = self.name(),
            total = total_bulk_quantity(&result),
            target = params.deal_size_cases,
            "allocation complete"
        );
        result
    }
}

// =========================================================================
// 2. ROI-Greedy Allocation
// =========================================================================

/// Fills products in order of a screening ROI (savings per dollar of case
/// cost, ignoring capital timing) up to each product's coverage headroom.
///
/// Cases left once every headroom is used go to the top-ranked product.
#[derive(Debug, Clone)]
pub struct RoiGreedyStrategy {
    max_inventory_days: f64,
}

impl RoiGreedyStrategy {
    pub fn new() -> Self {
        Self {
            max_inventory_days: MAX_INVENTORY_DAYS,
        }
    }

    /// Screening ROI for a single case. Zero for products that do not sell.
    pub fn screening_roi(product: &Product) -> f64 {
        let cost = product.bulk_case_cost();
        if !product.has_velocity() || cost <= 0.0 {
            return 0.0;
        }
        product.savings_per_case() / cost
    }

    /// Indices of priced products, best screening ROI first.
    fn rank(products: &[Product]) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = products
            .iter()
            .enumerate()
            .filter(|(_, p)| p.price_small > 0.0 && p.price_bulk > 0.0)
            .map(|(idx, p)| (idx, Self::screening_roi(p)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

impl Default for RoiGreedyStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocationStrategy for RoiGreedyStrategy {
    fn name(&self) -> &'static str {
        AllocationMode::Roi.as_str()
    }

    fn allocate(&self, products: &[Product], params: &DealParameters) -> Vec<Product> {
        let mut result = reset_allocation(products);
        let reserved = reserve_minimum_stock(&mut result, params.min_days_stock);

        let mut remaining = (params.deal_size_cases - reserved).max(0.0);
        if remaining <= 0.0 {
            info!(
                strategy = self.name(),
                reserved, "minimum stock covers the whole deal"
            );
            return result;
        }

        let ranked = Self::rank(&result);
        let top = ranked.first().map(|&(idx, _)| idx);

        for &(idx, roi) in &ranked {
            let product = &mut result[idx];
            if !product.has_velocity() {
                continue;
            }

            let headroom =
                (product.maximum_stock(self.max_inventory_days) - product.bulk_quantity).max(0.0);
            let allocation = remaining.min(headroom);
            product.bulk_quantity += allocation;
            remaining -= allocation;
            debug!(product = %product.name, roi, allocation, "greedy fill");

            if remaining <= 0.0 {
                break;
            }
        }

        if remaining > 0.0 {
            if let Some(idx) = top {
                result[idx].bulk_quantity += remaining;
            }
        }

        cap_maximum_inventory(&mut result, self.max_inventory_days);

        let recipient = top.or_else(|| result.iter().position(Product::has_velocity));
        top_up_shortfall(&mut result, params.deal_size_cases, recipient);

        info!(
            strategy = self.name(),
            total = total_bulk_quantity(&result),
            target = params.deal_size_cases,
            "allocation complete"
        );
        result
    }
}

// =========================================================================
// 3. Minimum / Need-Based Allocation
// =========================================================================

/// Minimum-stock-first allocation. The proportional strategy already
/// reserves coverage before splitting by sales, so this delegates to it.
#[derive(Debug, Clone, Default)]
pub struct MinimumStrategy {
    inner: ProportionalStrategy,
}

impl MinimumStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AllocationStrategy for MinimumStrategy {
    fn name(&self) -> &'static str {
        AllocationMode::Minimum.as_str()
    }

    fn allocate(&self, products: &[Product], params: &DealParameters) -> Vec<Product> {
        self.inner.allocate(products, params)
    }
}

// =========================================================================
// Factory
// =========================================================================

impl AllocationMode {
    pub fn strategy(&self) -> Box<dyn AllocationStrategy> {
        match self {
            Self::Proportional => Box::new(ProportionalStrategy::new()),
            Self::Roi => Box::new(RoiGreedyStrategy::new()),
            Self::Minimum => Box::new(MinimumStrategy::new()),
        }
    }
}

/// Looks a strategy up by name; unknown names fall back to proportional.
pub fn get_allocation_strategy(name: &str) -> Box<dyn AllocationStrategy> {
    match AllocationMode::from_name(name) {
        Some(mode) => mode.strategy(),
        None => {
            warn!(name, "unknown allocation strategy; using proportional");
            AllocationMode::Proportional.strategy()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn params(deal: f64, min_days: f64) -> DealParameters {
        DealParameters {
            deal_size_cases: deal,
            small_deal_cases: deal / 2.0,
            payment_terms_days: 30.0,
            min_days_stock: min_days,
        }
    }

    fn three_products() -> Vec<Product> {
        vec![
            Product::new("A", 10.0, 8.0, 12, 0.0, 100.0),
            Product::new("B", 10.0, 8.0, 12, 0.0, 80.0),
            Product::new("C", 10.0, 8.0, 12, 0.0, 60.0),
        ]
    }

    #[test]
    fn test_proportional_follows_sales_ordering() {
        let result = ProportionalStrategy::new().allocate(&three_products(), &params(60.0, 0.0));
        let q: Vec<f64> = result.iter().map(|p| p.bulk_quantity).collect();
        assert!(q[0] > q[1] && q[1] > q[2], "got {:?}", q);
        assert!(total_bulk_quantity(&result) >= 60.0 - EPS);
    }

    #[test]
    fn test_proportional_exact_split_without_caps() {
        // Plenty of sales so the 90-day ceiling never binds
        let products = vec![
            Product::new("A", 10.0, 8.0, 12, 0.0, 1000.0),
            Product::new("B", 10.0, 8.0, 12, 0.0, 800.0),
            Product::new("C", 10.0, 8.0, 12, 0.0, 600.0),
        ];
        let result = ProportionalStrategy::new().allocate(&products, &params(60.0, 0.0));
        let q: Vec<f64> = result.iter().map(|p| p.bulk_quantity).collect();
        assert_eq!(q, vec![25.0, 20.0, 15.0]);
    }

    #[test]
    fn test_largest_remainder_ties_break_by_input_order() {
        // 10 cases over three equal sellers: 3.33 each, one leftover case
        let products = vec![
            Product::new("A", 10.0, 8.0, 12, 0.0, 1000.0),
            Product::new("B", 10.0, 8.0, 12, 0.0, 1000.0),
            Product::new("C", 10.0, 8.0, 12, 0.0, 1000.0),
        ];
        let result = ProportionalStrategy::new().allocate(&products, &params(10.0, 0.0));
        let q: Vec<f64> = result.iter().map(|p| p.bulk_quantity).collect();
        assert_eq!(q, vec![4.0, 3.0, 3.0]);
    }

    #[test]
    fn test_proportional_zero_sales_allocates_nothing() {
        let products = vec![
            Product::new("A", 10.0, 8.0, 12, 5.0, 0.0),
            Product::new("B", 10.0, 8.0, 12, 5.0, 0.0),
        ];
        let result = ProportionalStrategy::new().allocate(&products, &params(60.0, 30.0));
        assert!(result.iter().all(|p| p.bulk_quantity == 0.0));
    }

    #[test]
    fn test_minimum_stock_is_reserved_first() {
        // B is empty and needs 30 days of coverage; A is already stocked
        let products = vec![
            Product::new("A", 10.0, 8.0, 12, 500.0, 3650.0),
            Product::new("B", 10.0, 8.0, 12, 0.0, 365.0),
        ];
        let result = ProportionalStrategy::new().allocate(&products, &params(60.0, 30.0));
        assert!(result[1].bulk_quantity >= 30.0 - EPS);
        assert!(total_bulk_quantity(&result) >= 60.0 - EPS);
    }

    #[test]
    fn test_minimum_reservation_may_exceed_deal() {
        let products = vec![Product::new("A", 10.0, 8.0, 12, 0.0, 3650.0)];
        let result = ProportionalStrategy::new().allocate(&products, &params(60.0, 30.0));
        // 10 cases/day * 30 days
        assert!((result[0].bulk_quantity - 300.0).abs() < EPS);
    }

    #[test]
    fn test_caller_products_are_untouched() {
        let products = three_products();
        let before = products.clone();
        let _ = get_allocation_strategy("roi").allocate(&products, &params(60.0, 30.0));
        let _ = get_allocation_strategy("proportional").allocate(&products, &params(60.0, 30.0));
        assert_eq!(products, before);
    }

    #[test]
    fn test_roi_greedy_prefers_best_discount() {
        let products = vec![
            Product::new("Thin", 10.0, 9.5, 12, 0.0, 365.0),
            Product::new("Fat", 10.0, 7.0, 12, 0.0, 365.0),
        ];
        let result = RoiGreedyStrategy::new().allocate(&products, &params(60.0, 0.0));
        // Fat fills its 90-day headroom before Thin sees a case
        assert!((result[1].bulk_quantity - 60.0).abs() < EPS);
        assert_eq!(result[0].bulk_quantity, 0.0);
    }

    #[test]
    fn test_roi_greedy_spills_leftover_to_top_product() {
        let products = vec![
            Product::new("Thin", 10.0, 9.5, 12, 0.0, 36.5),
            Product::new("Fat", 10.0, 7.0, 12, 0.0, 36.5),
        ];
        // Each can take 9 cases within 90 days; 60 requested
        let result = RoiGreedyStrategy::new().allocate(&products, &params(60.0, 0.0));
        assert!((result[0].bulk_quantity - 9.0).abs() < EPS);
        assert!((result[1].bulk_quantity - 51.0).abs() < EPS);
    }

    #[test]
    fn test_capped_residual_goes_to_first_seller() {
        // Both shares exceed 90 days of coverage; the slower seller comes first
        let products = vec![
            Product::new("B", 10.0, 8.0, 12, 0.0, 80.0),
            Product::new("A", 10.0, 8.0, 12, 0.0, 100.0),
        ];
        let result = ProportionalStrategy::new().allocate(&products, &params(60.0, 0.0));
        let a_cap = products[1].maximum_stock(MAX_INVENTORY_DAYS);
        assert!((result[1].bulk_quantity - a_cap).abs() < EPS);
        assert!((result[0].bulk_quantity - (60.0 - a_cap)).abs() < 1e-6);
        assert!(result[0].bulk_quantity > result[1].bulk_quantity);
    }

    #[test]
    fn test_roi_greedy_reserves_minimum_stock_before_filling() {
        // Slow ranks last on ROI but is empty and needs 30 days of coverage
        let products = vec![
            Product::new("Fat", 10.0, 7.0, 12, 500.0, 3650.0),
            Product::new("Slow", 10.0, 9.5, 12, 0.0, 365.0),
        ];
        let ranked = RoiGreedyStrategy::rank(&products);
        assert_eq!(ranked.last().map(|&(idx, _)| idx), Some(1));

        let result = RoiGreedyStrategy::new().allocate(&products, &params(60.0, 30.0));
        assert!((result[1].bulk_quantity - 30.0).abs() < EPS);
        assert!((result[0].bulk_quantity - 30.0).abs() < EPS);
    }

    #[test]
    fn test_minimum_strategy_matches_proportional() {
        let p = params(60.0, 30.0);
        let a = MinimumStrategy::new().allocate(&three_products(), &p);
        let b = ProportionalStrategy::new().allocate(&three_products(), &p);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_strategy_falls_back_to_proportional() {
        assert_eq!(get_allocation_strategy("simplex").name(), "proportional");
        assert_eq!(get_allocation_strategy("ROI").name(), "roi");
    }

    #[test]
    fn test_screening_roi() {
        let p = Product::new("X", 10.0, 8.0, 12, 0.0, 100.0);
        assert!((RoiGreedyStrategy::screening_roi(&p) - 0.25).abs() < 1e-12);
        let dead = Product::new("Y", 10.0, 8.0, 12, 0.0, 0.0);
        assert_eq!(RoiGreedyStrategy::screening_roi(&dead), 0.0);
    }

    fn product_strategy() -> impl Strategy<Value = Product> {
        (
            1.0f64..50.0,
            0.0f64..0.4,
            1u32..24,
            0.0f64..100.0,
            1.0f64..2000.0,
        )
            .prop_map(|(price, discount, bottles, on_hand, annual)| {
                Product::new("P", price, price * (1.0 - discount), bottles, on_hand, annual)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_allocations_cover_deal_and_stay_non_negative(
            products in prop::collection::vec(product_strategy(), 1..8),
            deal in 1u32..500,
            min_days in 0.0f64..60.0,
            mode_idx in 0usize..3,
        ) {
            let params = params(deal as f64, min_days);
            let strategy = AllocationMode::ALL[mode_idx].strategy();
            let result = strategy.allocate(&products, &params);

            prop_assert_eq!(result.len(), products.len());
            prop_assert!(result.iter().all(|p| p.bulk_quantity >= 0.0));
            prop_assert!(total_bulk_quantity(&result) >= params.deal_size_cases - 1e-6);
        }

        #[test]
        fn prop_proportional_is_monotone_in_sales_below_cap(
            annual in prop::collection::vec(365.0f64..3000.0, 2..6),
            on_hand in 0.0f64..10.0,
            deal in 1u32..60,
        ) {
            let params = params(deal as f64, 0.0);
            let products: Vec<Product> = annual
                .iter()
                .enumerate()
                .map(|(i, &a)| Product::new(format!("P{i}"), 10.0, 8.0, 12, on_hand, a))
                .collect();
            let total: f64 = annual.iter().sum();
            for p in &products {
                let share = p.annual_cases / total * params.deal_size_cases;
                prop_assume!(share + 1.0 <= p.maximum_stock(MAX_INVENTORY_DAYS));
            }

            let result = ProportionalStrategy::new().allocate(&products, &params);
            for a in &result {
                for b in &result {
                    if a.annual_cases > b.annual_cases {
                        prop_assert!(
                            a.bulk_quantity >= b.bulk_quantity,
                            "{} ({}) got {} < {} ({}) got {}",
                            a.name, a.annual_cases, a.bulk_quantity,
                            b.name, b.annual_cases, b.bulk_quantity
                        );
                    }
                }
            }
        }

        #[test]
        fn prop_allocation_is_repeatable(
            products in prop::collection::vec(product_strategy(), 1..6),
            deal in 1u32..200,
        ) {
            let params = params(deal as f64, 15.0);
            let strategy = get_allocation_strategy("proportional");
            prop_assert_eq!(strategy.allocate(&products, &params), strategy.allocate(&products, &params));
        }
    }
}
