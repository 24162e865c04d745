// src/engine/runner.rs

use crate::calculator::{aggregate, compute_line_item_roi};
use crate::error::Result;
use crate::model::{DealParameters, LineItemMetrics, PortfolioMetrics, Product, Scenario};
use crate::strategy::implementations::get_allocation_strategy;
use crate::strategy::optimization::{self, OptimizationResult};
use crate::strategy::traits::AllocationMode;
use crate::validation::{validate_bulk_quantities, validate_scenario};
use serde::Serialize;
use tracing::{info, warn};

/// Per-product metrics plus their portfolio roll-up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub line_items: Vec<LineItemMetrics>,
    pub portfolio: PortfolioMetrics,
}

impl Evaluation {
    /// Line items carrying an under-stock advisory.
    pub fn warnings(&self) -> impl Iterator<Item = &LineItemMetrics> {
        self.line_items.iter().filter(|m| m.warning.is_some())
    }
}

/// Returns a copy of `products` with `bulk_quantity` assigned by the named
/// strategy. Unknown names fall back to proportional.
pub fn allocate(products: &[Product], params: &DealParameters, strategy_name: &str) -> Vec<Product> {
    get_allocation_strategy(strategy_name).allocate(products, params)
}

/// Evaluates every product at its current allocation.
pub fn evaluate(products: &[Product], params: &DealParameters) -> Evaluation {
    let line_items: Vec<LineItemMetrics> = products
        .iter()
        .map(|p| compute_line_item_roi(p, params))
        .collect();
    let portfolio = aggregate(products, &line_items);

    for item in &line_items {
        if let Some(w) = &item.warning {
            warn!(product = %item.product_name, "{}", w);
        }
    }

    Evaluation {
        line_items,
        portfolio,
    }
}

/// Hill-climbs the allocation toward higher portfolio annualized ROI.
pub fn optimize(
    products: &[Product],
    params: &DealParameters,
    max_iterations: Option<usize>,
) -> OptimizationResult {
    optimization::optimize(products, params, max_iterations)
}

/// How [`run_scenario`] should treat a scenario.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub strategy: String,
    /// Allocate even when the scenario already carries quantities.
    pub reallocate: bool,
    pub optimize: bool,
    pub max_iterations: Option<usize>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            strategy: "proportional".to_string(),
            reallocate: false,
            optimize: true,
            max_iterations: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioReport {
    /// Final allocation (optimized when optimization ran).
    pub products: Vec<Product>,
    /// Strategy used, or `None` when the caller's quantities were kept.
    pub strategy: Option<AllocationMode>,
    pub evaluation: Evaluation,
    pub optimization: Option<OptimizationResult>,
}

impl ScenarioReport {
    /// The scenario as it stands after the run, ready to persist.
    pub fn to_scenario(&self, parameters: DealParameters) -> Scenario {
        Scenario::new(parameters, self.products.clone())
    }
}

/// Validates, allocates if needed, evaluates, and optionally optimizes.
///
/// Invalid input is rejected before any calculation runs.
pub fn run_scenario(scenario: &Scenario, options: &RunOptions) -> Result<ScenarioReport> {
    validate_scenario(scenario)?;
    let params = &scenario.parameters;

    let (products, strategy) = if options.reallocate || scenario.is_unallocated() {
        let mode = AllocationMode::from_name(&options.strategy).unwrap_or_default();
        let products = allocate(&scenario.products, params, &options.strategy);
        (products, Some(mode))
    } else {
        validate_bulk_quantities(&scenario.products, params.deal_size_cases)?;
        (scenario.products.clone(), None)
    };

    let (products, optimization) = if options.optimize {
        let result = optimize(&products, params, options.max_iterations);
        (result.products.clone(), Some(result))
    } else {
        (products, None)
    };

    let evaluation = evaluate(&products, params);
    info!(
        products = products.len(),
        roi = evaluation.portfolio.roi,
        annualized = evaluation.portfolio.annualized_roi(),
        warnings = evaluation.portfolio.warning_count,
        "scenario evaluated"
    );

    Ok(ScenarioReport {
        products,
        strategy,
        evaluation,
        optimization,
    })
}
