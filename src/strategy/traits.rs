// src/strategy/traits.rs

use crate::model::{DealParameters, Product};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Distributes the deal's case count across a product list.
///
/// Implementations are pure: they never touch the caller's products and
/// return a fresh list with `bulk_quantity` assigned. The returned total is
/// at least `deal_size_cases` whenever any product sells.
pub trait AllocationStrategy: Debug + Send + Sync {
    /// Registry name used by [`AllocationMode::from_name`].
    fn name(&self) -> &'static str;

    fn allocate(&self, products: &[Product], params: &DealParameters) -> Vec<Product>;
}

/// The closed set of allocation strategies, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    /// Share of the deal follows share of annual sales.
    #[default]
    Proportional,
    /// Greedy fill by savings per dollar of case cost.
    Roi,
    /// Minimum-stock-first allocation.
    Minimum,
}

impl AllocationMode {
    pub const ALL: [AllocationMode; 3] = [
        AllocationMode::Proportional,
        AllocationMode::Roi,
        AllocationMode::Minimum,
    ];

    /// Case-insensitive lookup. `None` for names outside the registry.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "proportional" => Some(Self::Proportional),
            "roi" => Some(Self::Roi),
            "minimum" | "need" => Some(Self::Minimum),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proportional => "proportional",
            Self::Roi => "roi",
            Self::Minimum => "minimum",
        }
    }
}

impl fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
