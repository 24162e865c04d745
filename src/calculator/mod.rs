pub mod line_item;
pub mod portfolio;

pub use line_item::compute_line_item_roi;
pub use portfolio::{aggregate, portfolio_metrics};
