mod calculator;
mod engine;
mod error;
mod io;
mod model;
mod strategy;
mod validation;

use crate::engine::{run_scenario, AppConfig, RunOptions};
use crate::io::reporting;
use crate::io::sample;
use crate::io::ScenarioStore;
use crate::model::{DealParameters, Scenario};
use crate::strategy::traits::AllocationMode;
use std::env;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn print_usage() {
    let strategies: Vec<&str> = AllocationMode::ALL.iter().map(|m| m.as_str()).collect();
    println!("Usage: deal-calculator [run | list | delete <name>]");
    println!("Strategies (DEALCALC_STRATEGY): {}", strategies.join(", "));
}

fn main() -> anyhow::Result<()> {
    // 1. SETUP CONFIGURATION & LOGGING
    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = ScenarioStore::new(&config.scenario_dir);
    info!(dir = %store.dir().display(), "using scenario store");

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("run") => {}
        Some("list") => {
            for name in store.list()? {
                println!("{}", name);
            }
            return Ok(());
        }
        Some("delete") => {
            let Some(name) = args.get(1) else {
                print_usage();
                return Ok(());
            };
            store.delete(name)?;
            println!("Deleted scenario '{}'", name);
            return Ok(());
        }
        Some(_) => {
            print_usage();
            return Ok(());
        }
    }

    println!("=== Multi-Product Bulk Deal Calculator ===");

    // 2. LOAD OR SEED THE SCENARIO
    let name = config.scenario_name.as_str();
    let scenario = if store.exists(name)? {
        store.load(name)?
    } else {
        let products = if config.sample_products > 0 {
            sample::generate_sample_catalog(&mut rand::thread_rng(), config.sample_products, 150.0, 60.0)
        } else {
            sample::demo_catalog()
        };
        info!(name, products = products.len(), "seeding new scenario");
        Scenario::new(DealParameters::default(), products)
    };

    // 3. ALLOCATE, EVALUATE, OPTIMIZE
    let options = RunOptions {
        strategy: config.strategy.clone(),
        reallocate: config.reallocate,
        optimize: config.optimize,
        max_iterations: Some(config.max_iterations),
    };
    let report = run_scenario(&scenario, &options)?;

    // 4. EXPORT RESULTS
    let line_items_path = config.report_dir.join(format!("{}_line_items.csv", name));
    reporting::write_line_item_report(&line_items_path, &report.products, &report.evaluation)?;

    let portfolio_path = config.report_dir.join(format!("{}_portfolio.csv", name));
    reporting::write_portfolio_report(&portfolio_path, &report.evaluation)?;

    if let Some(opt) = &report.optimization {
        let history_path = config.report_dir.join(format!("{}_history.csv", name));
        reporting::write_history_report(&history_path, &opt.history)?;
    }

    // 5. SAVE THE ALLOCATION
    let updated = report.to_scenario(scenario.parameters);
    store.save(name, &updated)?;

    // 6. PRINT SUMMARY
    if let Some(mode) = report.strategy {
        println!("Allocation strategy: {}", mode);
    }
    println!(
        "Deal: {:.0} cases allocated (target {:.0})",
        updated.total_bulk_quantity(),
        scenario.parameters.deal_size_cases
    );

    println!("\n=== Line Items ===");
    for (product, m) in report.products.iter().zip(&report.evaluation.line_items) {
        println!(
            "{:<20} qty {:>6.1}  stock {:>5.0}d -> {:>5.0}d  savings ${:>9.2}  ROI {:>6.2}  annualized {:>7.2}",
            product.name,
            product.bulk_quantity,
            product.days_of_stock(),
            product.days_of_stock_after_purchase(),
            m.total_savings,
            m.roi,
            m.annualized_roi
        );
    }

    let portfolio = &report.evaluation.portfolio;
    println!("\n=== Portfolio ===");
    println!("Total Savings: ${:.2}", portfolio.total_savings);
    println!("Delta Investment: ${:.2}", portfolio.total_delta_investment);
    println!("ROI: {:.4}", portfolio.roi);
    println!("Weighted Days at Risk: {:.1}", portfolio.weighted_avg_days_at_risk);
    println!("Annualized ROI: {:.4}", portfolio.annualized_roi());

    if let Some(opt) = &report.optimization {
        println!(
            "\nOptimization: {} swaps over {} iterations ({:?}), annualized ROI +{:.4}",
            opt.history.len(),
            opt.iterations,
            opt.termination,
            opt.improvement()
        );
    }

    for item in report.evaluation.warnings() {
        if let Some(w) = &item.warning {
            println!("Warning [{}]: {}", item.product_name, w);
        }
    }

    Ok(())
}
