// src/model/product.rs

use serde::{Deserialize, Serialize};

pub const DAYS_PER_YEAR: f64 = 365.0;

/// One SKU under consideration for the bulk deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    // Identity
    #[serde(alias = "product_name")]
    pub name: String,

    // Pricing (per bottle)
    #[serde(alias = "current_price")]
    pub price_small: f64,
    #[serde(alias = "bulk_price")]
    pub price_bulk: f64,
    pub bottles_per_case: u32,

    // Inventory & velocity (in cases)
    #[serde(alias = "on_hand")]
    pub on_hand_cases: f64,
    #[serde(alias = "cases_per_year")]
    pub annual_cases: f64,

    // The decision variable: cases allocated to the bulk deal
    #[serde(default)]
    pub bulk_quantity: f64,
}

impl Product {
    /// Constructor for a product with nothing allocated yet.
    pub fn new(
        name: impl Into<String>,
        price_small: f64,
        price_bulk: f64,
        bottles_per_case: u32,
        on_hand_cases: f64,
        annual_cases: f64,
    ) -> Self {
        Self {
            name: name.into(),
            price_small,
            price_bulk,
            bottles_per_case,
            on_hand_cases,
            annual_cases,
            bulk_quantity: 0.0,
        }
    }

    /// Builder-style helper to preset the bulk allocation.
    pub fn with_bulk_quantity(mut self, bulk_quantity: f64) -> Self {
        self.bulk_quantity = bulk_quantity;
        self
    }

    /// Cases sold per day.
    pub fn daily_velocity(&self) -> f64 {
        self.annual_cases / DAYS_PER_YEAR
    }

    pub fn has_velocity(&self) -> bool {
        self.annual_cases > 0.0
    }

    /// Dollar savings per case from the bulk discount.
    pub fn savings_per_case(&self) -> f64 {
        (self.price_small - self.price_bulk) * self.bottles_per_case as f64
    }

    /// Cost of one case at the bulk price.
    pub fn bulk_case_cost(&self) -> f64 {
        self.price_bulk * self.bottles_per_case as f64
    }

    /// Days the current on-hand inventory will last. Zero when nothing sells.
    pub fn days_of_stock(&self) -> f64 {
        if !self.has_velocity() {
            return 0.0;
        }
        self.on_hand_cases / self.daily_velocity()
    }

    /// Days the inventory will last once the bulk allocation lands.
    pub fn days_of_stock_after_purchase(&self) -> f64 {
        if !self.has_velocity() {
            return 0.0;
        }
        (self.on_hand_cases + self.bulk_quantity) / self.daily_velocity()
    }

    /// Additional cases required to reach `min_days` of coverage.
    pub fn minimum_stock_needed(&self, min_days: f64) -> f64 {
        if !self.has_velocity() || min_days <= 0.0 {
            return 0.0;
        }
        (self.daily_velocity() * min_days - self.on_hand_cases).max(0.0)
    }

    /// Largest additional purchase that keeps coverage at or under `max_days`.
    pub fn maximum_stock(&self, max_days: f64) -> f64 {
        if !self.has_velocity() || max_days <= 0.0 {
            return 0.0;
        }
        (self.daily_velocity() * max_days - self.on_hand_cases).max(0.0)
    }
}

/// Scenario-wide deal constraints. Immutable for one calculation.
///
/// Fields missing from a stored scenario take the [`Default`] values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealParameters {
    /// Target total bulk cases across all products.
    #[serde(alias = "dealSizeCases", alias = "bulk_deal_minimum")]
    pub deal_size_cases: f64,
    /// Reference non-bulk order size used to size the comparison baseline.
    #[serde(alias = "smallDealCases", alias = "small_deal_minimum")]
    pub small_deal_cases: f64,
    /// Days of vendor credit before payment is due.
    #[serde(alias = "paymentTermsDays", alias = "payment_terms")]
    pub payment_terms_days: f64,
    /// Coverage target used for warnings and need-based reservation.
    #[serde(alias = "minDaysStock")]
    pub min_days_stock: f64,
}

impl Default for DealParameters {
    fn default() -> Self {
        Self {
            deal_size_cases: 60.0,
            small_deal_cases: 30.0,
            payment_terms_days: 30.0,
            min_days_stock: 30.0,
        }
    }
}

/// A named record persisted by the scenario store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub parameters: DealParameters,
    pub products: Vec<Product>,
}

impl Scenario {
    pub fn new(parameters: DealParameters, products: Vec<Product>) -> Self {
        Self {
            parameters,
            products,
        }
    }

    /// True when no product carries a bulk allocation yet.
    pub fn is_unallocated(&self) -> bool {
        self.products.iter().all(|p| p.bulk_quantity <= 0.0)
    }

    pub fn total_bulk_quantity(&self) -> f64 {
        total_bulk_quantity(&self.products)
    }
}

/// Sum of allocated cases across a product list.
pub fn total_bulk_quantity(products: &[Product]) -> f64 {
    products.iter().map(|p| p.bulk_quantity).sum()
}
