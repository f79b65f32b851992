//! Material quantity and cost calculator logic

use tracing::debug;

use crate::models::{CostBreakdown, MaterialQuantities};

// Quantities per unit of built-up area
const STEEL_PER_AREA: f64 = 3.5; // kg, reported in tons
const CEMENT_PER_AREA: f64 = 0.4; // bags
const SAND_PER_AREA: f64 = 0.6; // tons

// Unit prices
const STEEL_PRICE_PER_TON: f64 = 60000.0;
const CEMENT_PRICE_PER_BAG: f64 = 420.0;
const SAND_PRICE_PER_TON: f64 = 8000.0;

const LABOR_SHARE: f64 = 0.30;
const OVERHEAD_SHARE: f64 = 0.10;

/// Round to `places` decimal places, ties to even
///
/// Goes through fixed-precision formatting, which rounds the exact binary
/// value, so `round_to(2.675, 2)` is `2.67` (2.675 is stored just below the
/// tie) while `round_to(0.125, 2)` is `0.12` (an exact tie).
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// Calculate the material quantities for `built_up_area` over `num_floors`
pub fn calculate_materials(built_up_area: f64, num_floors: i64) -> MaterialQuantities {
    let factor = built_up_area * num_floors as f64;

    let materials = MaterialQuantities {
        steel_mass: round_to(factor * STEEL_PER_AREA / 1000.0, 2),
        cement_units: round_to(factor * CEMENT_PER_AREA, 0),
        sand_mass: round_to(factor * SAND_PER_AREA, 2),
    };

    debug!(
        built_up_area,
        num_floors,
        steel = materials.steel_mass,
        cement = materials.cement_units,
        sand = materials.sand_mass,
        "calculated materials"
    );

    materials
}

/// Cost of the given material quantities before rounding
fn material_cost(materials: &MaterialQuantities) -> f64 {
    materials.steel_mass * STEEL_PRICE_PER_TON
        + materials.cement_units * CEMENT_PRICE_PER_BAG
        + materials.sand_mass * SAND_PRICE_PER_TON
}

/// Calculate the itemized cost of the building
///
/// Material cost is priced from the rounded quantities. Labor and overhead
/// are shares of `built_up_area * num_floors * cost_per_area`. The total is
/// the sum of the unrounded items, rounded once.
pub fn calculate_cost(built_up_area: f64, num_floors: i64, cost_per_area: f64) -> CostBreakdown {
    let materials = calculate_materials(built_up_area, num_floors);
    let mat_cost = material_cost(&materials);

    let base = built_up_area * num_floors as f64 * cost_per_area;
    let labor = base * LABOR_SHARE;
    let overhead = base * OVERHEAD_SHARE;

    let costs = CostBreakdown {
        material_cost: round_to(mat_cost, 2),
        labor_cost: round_to(labor, 2),
        overhead_cost: round_to(overhead, 2),
        total_cost: round_to(mat_cost + labor + overhead, 2),
    };

    debug!(base, total = costs.total_cost, "calculated cost");

    costs
}
