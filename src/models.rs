//! Data models for estimates, floor plans and schedules

use serde::{Deserialize, Serialize};

/// Material quantities for the whole building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialQuantities {
    pub steel_mass: f64,   // tons
    pub cement_units: f64, // bags
    pub sand_mass: f64,    // tons
}

/// Itemized cost of the whole building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub material_cost: f64,
    pub labor_cost: f64,
    pub overhead_cost: f64,
    pub total_cost: f64,
}

/// A rectangular room on the 0-100 schematic grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    pub color: String,
}

/// Schematic layout of one floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub floor_name: String,
    pub rooms: Vec<Room>,
}

/// Result of an estimation: quantities, costs and the per-floor layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub materials: MaterialQuantities,
    pub costs: CostBreakdown,
    pub blueprint: Vec<FloorPlan>,
}

/// One phase of a construction schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub week: String,
    pub phase: String,
    #[serde(default)]
    pub activities: Vec<String>,
}

/// An estimate together with its construction schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    #[serde(flatten)]
    pub estimate: Estimate,
    pub schedule: Vec<ScheduleEntry>,
}
