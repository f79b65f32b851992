//! Construction estimator
//!
//! Material quantities, itemized costs and a schematic per-floor layout
//! for a building, from its built-up area and floor count.

pub mod blueprint;
pub mod calculator;
pub mod config;
pub mod error;
pub mod estimate;
pub mod floors;
pub mod generator;
pub mod models;
pub mod planner;

pub use error::EstimateError;
pub use estimate::{EstimateRequest, Estimator, Numeric, checked_floor_count, estimate};
pub use floors::{FloorSpec, parse_floors};
pub use models::{
    CostBreakdown, Estimate, FloorPlan, MaterialQuantities, ProjectReport, Room, ScheduleEntry,
};
pub use planner::{GenerateError, Prompt, TextGenerator};
