pub mod reporting;
pub mod sample;
pub mod scenario_store;

pub use scenario_store::ScenarioStore;
