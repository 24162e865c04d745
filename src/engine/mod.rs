pub mod config;
pub mod runner;

pub use config::AppConfig;
pub use runner::{run_scenario, Evaluation, RunOptions};
