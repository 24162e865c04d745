// src/io/sample.rs

use crate::model::Product;
use rand::Rng;
use rand_distr::{Distribution, Normal};

const VARIETALS: [&str; 10] = [
    "Cabernet", "Merlot", "Pinot Noir", "Syrah", "Malbec", "Chardonnay", "Sauvignon Blanc",
    "Riesling", "Rose", "Prosecco",
];

/// A fixed three-product catalog with descending velocity.
/// Useful for demos and for sanity-checking allocation ordering.
pub fn demo_catalog() -> Vec<Product> {
    vec![
        Product::new("Cabernet", 14.0, 11.5, 12, 4.0, 100.0),
        Product::new("Merlot", 11.0, 9.0, 12, 4.0, 80.0),
        Product::new("Rose", 9.0, 7.5, 12, 4.0, 60.0),
    ]
}

/// Generates a randomized but valid catalog.
///
/// Annual velocity is drawn from a Normal distribution and clamped at one
/// case a year; bulk prices carry a 5-30% discount off the small-deal price.
///
/// # Arguments
/// * `count` - Number of products.
/// * `mean_annual_cases` - Average annual velocity (e.g., 150.0).
/// * `std_dev` - Spread of annual velocity (e.g., 60.0).
pub fn generate_sample_catalog<R: Rng>(
    rng: &mut R,
    count: usize,
    mean_annual_cases: f64,
    std_dev: f64,
) -> Vec<Product> {
    // Fall back to a flat velocity if the spread is unusable
    let velocity = Normal::new(mean_annual_cases, std_dev.abs()).ok();

    (0..count)
        .map(|i| {
            let raw_annual = match &velocity {
                Some(d) => d.sample(rng),
                None => mean_annual_cases,
            };
            let annual = raw_annual.round().max(1.0);

            let price_small = (rng.gen_range(8.0..40.0_f64) * 100.0).round() / 100.0;
            let discount = rng.gen_range(0.05..0.30);
            let price_bulk = (price_small * (1.0 - discount) * 100.0).round() / 100.0;
            let bottles = if rng.gen_bool(0.7) { 12 } else { 6 };
            let on_hand = (annual / 365.0 * rng.gen_range(0.0..45.0)).round();

            let name = match VARIETALS.get(i) {
                Some(v) => v.to_string(),
                None => format!("{} #{}", VARIETALS[i % VARIETALS.len()], i / VARIETALS.len() + 1),
            };

            Product::new(name, price_small, price_bulk, bottles, on_hand, annual)
        })
        .collect()
}
