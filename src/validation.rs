// src/validation.rs

//! Input checks run before any calculation. The numeric core never
//! re-validates; malformed input must be rejected here.

use crate::error::{DealError, Result};
use crate::model::{total_bulk_quantity, DealParameters, Product, Scenario};
use std::collections::HashSet;

fn require_non_negative(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(DealError::validation(field, format!("must be a number, got {value}")));
    }
    if value < 0.0 {
        return Err(DealError::validation(field, format!("cannot be negative, got {value}")));
    }
    Ok(value)
}

fn require_positive(field: &str, value: f64) -> Result<f64> {
    require_non_negative(field, value)?;
    if value == 0.0 {
        return Err(DealError::validation(field, "cannot be zero"));
    }
    Ok(value)
}

pub fn validate_product(product: &Product) -> Result<()> {
    if product.name.trim().is_empty() {
        return Err(DealError::validation("name", "must be a non-empty string"));
    }

    let price_small = require_non_negative("price_small", product.price_small)?;
    let price_bulk = require_non_negative("price_bulk", product.price_bulk)?;
    require_non_negative("on_hand_cases", product.on_hand_cases)?;
    require_non_negative("annual_cases", product.annual_cases)?;
    require_non_negative("bulk_quantity", product.bulk_quantity)?;

    if product.bottles_per_case == 0 {
        return Err(DealError::validation("bottles_per_case", "must be at least 1"));
    }

    if price_bulk > price_small {
        return Err(DealError::validation(
            "price_bulk",
            format!(
                "bulk price (${price_bulk:.2}) cannot be higher than current price (${price_small:.2}) for {}",
                product.name
            ),
        ));
    }

    Ok(())
}

pub fn validate_parameters(params: &DealParameters) -> Result<()> {
    let deal = require_positive("deal_size_cases", params.deal_size_cases)?;
    let small = require_positive("small_deal_cases", params.small_deal_cases)?;
    require_non_negative("payment_terms_days", params.payment_terms_days)?;
    require_non_negative("min_days_stock", params.min_days_stock)?;

    if small > deal {
        return Err(DealError::validation(
            "small_deal_cases",
            format!("small deal ({small}) cannot be larger than bulk deal ({deal})"),
        ));
    }
    Ok(())
}

/// Checks that a caller-supplied allocation meets the deal size.
pub fn validate_bulk_quantities(products: &[Product], deal_size_cases: f64) -> Result<()> {
    if products.is_empty() {
        return Err(DealError::EmptyScenario);
    }

    let total = total_bulk_quantity(products);
    if total < deal_size_cases {
        return Err(DealError::validation(
            "bulk_quantity",
            format!("total bulk quantity ({total}) is less than the required minimum ({deal_size_cases})"),
        ));
    }
    Ok(())
}

/// Validates parameters, every product, and product-name uniqueness.
pub fn validate_scenario(scenario: &Scenario) -> Result<()> {
    if scenario.products.is_empty() {
        return Err(DealError::EmptyScenario);
    }
    validate_parameters(&scenario.parameters)?;

    let mut seen = HashSet::new();
    for product in &scenario.products {
        validate_product(product)?;
        if !seen.insert(product.name.as_str()) {
            return Err(DealError::validation(
                "name",
                format!("duplicate product name '{}'", product.name),
            ));
        }
    }
    Ok(())
}
