pub mod metrics;
pub mod product;

pub use metrics::{LineItemMetrics, LineItemStatus, PortfolioMetrics, StockWarning};
pub use product::{total_bulk_quantity, DealParameters, Product, Scenario, DAYS_PER_YEAR};
