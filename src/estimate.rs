//! Estimation facade
//!
//! Takes raw request parameters, normalizes them and runs the calculator
//! and the blueprint generator over the result.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blueprint;
use crate::calculator;
use crate::error::EstimateError;
use crate::floors::{FloorSpec, MAX_FLOORS};
use crate::models::{CostBreakdown, Estimate, FloorPlan, MaterialQuantities};

pub const DEFAULT_BUILT_UP_AREA: f64 = 1000.0;
pub const DEFAULT_COST_PER_AREA: f64 = 1500.0;

/// A number as supplied by the caller, possibly still in text form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
    /// `true` reads as 1, `false` as 0
    Flag(bool),
    /// `null`, arrays, objects; never numeric
    Other(serde_json::Value),
}

impl Numeric {
    /// Coerce to `f64`, trimming surrounding whitespace from text
    pub fn to_f64(&self, field: &'static str) -> Result<f64, EstimateError> {
        match self {
            Numeric::Number(x) => Ok(*x),
            Numeric::Text(s) => s.trim().parse::<f64>().map_err(|_| EstimateError::NotNumeric {
                field,
                value: s.clone(),
            }),
            Numeric::Flag(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Numeric::Other(v) => Err(EstimateError::NotNumeric {
                field,
                value: v.to_string(),
            }),
        }
    }
}

impl From<f64> for Numeric {
    fn from(x: f64) -> Self {
        Numeric::Number(x)
    }
}

impl From<&str> for Numeric {
    fn from(s: &str) -> Self {
        Numeric::Text(s.to_string())
    }
}

fn default_area() -> Numeric {
    Numeric::Number(DEFAULT_BUILT_UP_AREA)
}

fn default_rate() -> Numeric {
    Numeric::Number(DEFAULT_COST_PER_AREA)
}

/// Raw estimation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    #[serde(default = "default_area")]
    pub built_up_area: Numeric,
    #[serde(default)]
    pub floors: FloorSpec,
    #[serde(default = "default_rate", alias = "cost_per_sq_yard")]
    pub cost_per_sq_area: Numeric,
}

impl Default for EstimateRequest {
    fn default() -> Self {
        Self {
            built_up_area: default_area(),
            floors: FloorSpec::default(),
            cost_per_sq_area: default_rate(),
        }
    }
}

impl EstimateRequest {
    pub fn new(
        built_up_area: impl Into<Numeric>,
        floors: impl Into<FloorSpec>,
        cost_per_sq_area: impl Into<Numeric>,
    ) -> Self {
        Self {
            built_up_area: built_up_area.into(),
            floors: floors.into(),
            cost_per_sq_area: cost_per_sq_area.into(),
        }
    }
}

/// Normalized estimation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimator {
    pub built_up_area: f64,
    pub num_floors: i64,
    pub cost_per_area: f64,
}

impl Estimator {
    pub fn new(built_up_area: f64, num_floors: i64, cost_per_area: f64) -> Self {
        Self { built_up_area, num_floors, cost_per_area }
    }

    /// Coerce and normalize a raw request
    ///
    /// Rejects floor counts above [`MAX_FLOORS`].
    pub fn from_request(request: &EstimateRequest) -> Result<Self, EstimateError> {
        let built_up_area = request.built_up_area.to_f64("built_up_area")?;
        let num_floors = checked_floor_count(&request.floors)?;
        let cost_per_area = request.cost_per_sq_area.to_f64("cost_per_sq_area")?;

        debug!(
            built_up_area,
            num_floors,
            cost_per_area,
            floors = %request.floors,
            "normalized request"
        );

        Ok(Self::new(built_up_area, num_floors, cost_per_area))
    }

    pub fn materials(&self) -> MaterialQuantities {
        calculator::calculate_materials(self.built_up_area, self.num_floors)
    }

    pub fn costs(&self) -> CostBreakdown {
        calculator::calculate_cost(self.built_up_area, self.num_floors, self.cost_per_area)
    }

    pub fn blueprint(&self) -> Vec<FloorPlan> {
        blueprint::generate_blueprint(self.num_floors)
    }

    pub fn estimate(&self) -> Estimate {
        Estimate {
            materials: self.materials(),
            costs: self.costs(),
            blueprint: self.blueprint(),
        }
    }
}

/// Normalize a floor specification, rejecting counts above [`MAX_FLOORS`]
pub fn checked_floor_count(spec: &FloorSpec) -> Result<i64, EstimateError> {
    let floors = spec.floor_count();
    if floors > MAX_FLOORS {
        return Err(EstimateError::TooManyFloors { floors, max: MAX_FLOORS });
    }
    Ok(floors)
}

/// Run a full estimation for a raw request
pub fn estimate(request: &EstimateRequest) -> Result<Estimate, EstimateError> {
    Ok(Estimator::from_request(request)?.estimate())
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Construction Estimate ===")?;
        writeln!(f, "Floors: {}", self.blueprint.len())?;
        writeln!(f)?;

        writeln!(f, "Materials:")?;
        writeln!(f, "  Steel:  {:>12.2} tons", self.materials.steel_mass)?;
        writeln!(f, "  Cement: {:>12.0} bags", self.materials.cement_units)?;
        writeln!(f, "  Sand:   {:>12.2} tons", self.materials.sand_mass)?;
        writeln!(f)?;

        writeln!(f, "Costs:")?;
        writeln!(f, "  Material: {:>15.2}", self.costs.material_cost)?;
        writeln!(f, "  Labor:    {:>15.2}", self.costs.labor_cost)?;
        writeln!(f, "  Overhead: {:>15.2}", self.costs.overhead_cost)?;
        writeln!(f, "  Total:    {:>15.2}", self.costs.total_cost)?;

        Ok(())
    }
}
