//! Error types for the estimation core

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("could not convert {field} to a number: '{value}'")]
    NotNumeric { field: &'static str, value: String },

    #[error("{floors} floors exceeds the maximum of {max}")]
    TooManyFloors { floors: i64, max: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_numeric_display_names_field_and_value() {
        let e = EstimateError::NotNumeric { field: "built_up_area", value: "abc".into() };
        let msg = e.to_string();
        assert!(msg.contains("built_up_area"));
        assert!(msg.contains("'abc'"));
    }

    #[test]
    fn too_many_floors_display_names_limit() {
        let e = EstimateError::TooManyFloors { floors: 900, max: 500 };
        assert_eq!(e.to_string(), "900 floors exceeds the maximum of 500");
    }
}
