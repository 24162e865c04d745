// src/strategy/optimization.rs

//! Greedy hill-climb over single-case transfers.
//!
//! Each iteration moves one case from the worst annualized-ROI product still
//! holding stock to the best annualized-ROI product with headroom, and keeps
//! the move only if portfolio annualized ROI strictly improves. The deal size
//! never changes. There is no optimality guarantee; the swap history shows
//! exactly which moves were made.

use crate::calculator::{compute_line_item_roi, portfolio_metrics};
use crate::model::{DealParameters, PortfolioMetrics, Product};
use serde::Serialize;
use tracing::{debug, info};

pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// No improving single-case move exists.
    Converged,
    /// The iteration limit was reached first.
    Capped,
}

/// One accepted transfer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapRecord {
    pub iteration: usize,
    pub from: String,
    pub to: String,
    pub portfolio_roi: f64,
    pub portfolio_annualized_roi: f64,
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub products: Vec<Product>,
    /// Accepted swaps in order; append-only.
    pub history: Vec<SwapRecord>,
    pub initial_portfolio: PortfolioMetrics,
    pub final_portfolio: PortfolioMetrics,
    /// Iterations attempted, including a final rejected one.
    pub iterations: usize,
    pub termination: Termination,
}

impl OptimizationResult {
    pub fn improvement(&self) -> f64 {
        self.final_portfolio.annualized_roi() - self.initial_portfolio.annualized_roi()
    }
}

/// Picks the (donor, recipient) pair for the next move.
///
/// The donor is the lowest annualized-ROI product holding at least one case;
/// the recipient is the highest annualized-ROI product still below its annual
/// sales. Ties go to the earlier product. `None` when no distinct pair exists.
fn select_swap(products: &[Product], params: &DealParameters) -> Option<(usize, usize)> {
    let mut donor: Option<(usize, f64)> = None;
    let mut recipient: Option<(usize, f64)> = None;

    for (idx, product) in products.iter().enumerate() {
        let annualized = compute_line_item_roi(product, params).annualized_roi;

        if product.bulk_quantity >= 1.0 && donor.map_or(true, |(_, low)| annualized < low) {
            donor = Some((idx, annualized));
        }
        if product.bulk_quantity < product.annual_cases
            && recipient.map_or(true, |(_, high)| annualized > high)
        {
            recipient = Some((idx, annualized));
        }
    }

    match (donor, recipient) {
        (Some((from, _)), Some((to, _))) if from != to => Some((from, to)),
        _ => None,
    }
}

/// Runs the hill-climb on a copy of `products`.
///
/// `max_iterations` defaults to [`DEFAULT_MAX_ITERATIONS`].
pub fn optimize(
    products: &[Product],
    params: &DealParameters,
    max_iterations: Option<usize>,
) -> OptimizationResult {
    let max_iterations = max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);

    let mut current = products.to_vec();
    let initial_portfolio = portfolio_metrics(&current, params);
    let mut portfolio = initial_portfolio;
    let mut history = Vec::new();
    let mut iterations = 0;

    info!(
        roi = initial_portfolio.roi,
        annualized = initial_portfolio.annualized_roi(),
        "starting optimization"
    );

    let termination = loop {
        if iterations >= max_iterations {
            break Termination::Capped;
        }
        iterations += 1;

        let Some((from, to)) = select_swap(&current, params) else {
            debug!(iteration = iterations, "no candidates for swapping");
            break Termination::Converged;
        };

        let mut candidate = current.clone();
        candidate[from].bulk_quantity -= 1.0;
        candidate[to].bulk_quantity += 1.0;

        let trial = portfolio_metrics(&candidate, params);
        if trial.annualized_roi() <= portfolio.annualized_roi() {
            debug!(
                iteration = iterations,
                from = %current[from].name,
                to = %current[to].name,
                annualized = trial.annualized_roi(),
                "swap rejected"
            );
            break Termination::Converged;
        }

        debug!(
            iteration = iterations,
            from = %candidate[from].name,
            to = %candidate[to].name,
            annualized = trial.annualized_roi(),
            "swap accepted"
        );
        history.push(SwapRecord {
            iteration: iterations,
            from: candidate[from].name.clone(),
            to: candidate[to].name.clone(),
            portfolio_roi: trial.roi,
            portfolio_annualized_roi: trial.annualized_roi(),
        });
        current = candidate;
        portfolio = trial;
    };

    info!(
        iterations,
        swaps = history.len(),
        ?termination,
        roi = portfolio.roi,
        annualized = portfolio.annualized_roi(),
        "optimization finished"
    );

    OptimizationResult {
        products: current,
        history,
        initial_portfolio,
        final_portfolio: portfolio,
        iterations,
        termination,
    }
}
