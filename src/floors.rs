//! Floor count parsing
//!
//! Floor specifications arrive either as a plain count or as text. Text is
//! read with the grammar
//!
//! ```text
//! spec    := COUNT | "G+" INTEGER
//! COUNT   := "+"? INTEGER
//! INTEGER := [0-9]+
//! ```
//!
//! after trimming, uppercasing and removing spaces, so `"g + 2"` reads as `G+2`:
//! a ground floor plus two upper floors, three floors in total. Anything
//! that does not match, or that would yield fewer than one floor, reads as
//! [`DEFAULT_FLOORS`].

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Floor count used whenever a text specification cannot be read
pub const DEFAULT_FLOORS: i64 = 1;

/// Largest floor count an estimate accepts
pub const MAX_FLOORS: i64 = 500;

static FLOOR_SPEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:G\+(?P<upper>[0-9]+)|(?P<count>\+?[0-9]+))$")
        .expect("floor spec pattern is valid")
});

/// A floor specification as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FloorSpec {
    /// An explicit floor count, taken as-is
    Count(i64),
    /// A non-integral number; only its text form is considered
    Fractional(f64),
    /// `"3"`, `"G+2"` and friends
    Text(String),
    /// `true` counts as one floor, `false` as none
    Flag(bool),
    /// `null`, arrays, objects
    Other(serde_json::Value),
}

impl Default for FloorSpec {
    fn default() -> Self {
        FloorSpec::Text("G+2".to_string())
    }
}

impl From<i64> for FloorSpec {
    fn from(count: i64) -> Self {
        FloorSpec::Count(count)
    }
}

impl From<&str> for FloorSpec {
    fn from(text: &str) -> Self {
        FloorSpec::Text(text.to_string())
    }
}

impl From<String> for FloorSpec {
    fn from(text: String) -> Self {
        FloorSpec::Text(text)
    }
}

impl fmt::Display for FloorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloorSpec::Count(n) => write!(f, "{}", n),
            FloorSpec::Fractional(x) => write!(f, "{:?}", x),
            FloorSpec::Text(s) => f.write_str(s),
            FloorSpec::Flag(b) => write!(f, "{}", b),
            FloorSpec::Other(v) => write!(f, "{}", v),
        }
    }
}

impl FloorSpec {
    /// Number of floors this specification stands for
    ///
    /// Counts pass through unchanged, even when zero or negative; the layout
    /// generator treats those as "no floors". Text that fails to parse reads
    /// as [`DEFAULT_FLOORS`].
    pub fn floor_count(&self) -> i64 {
        match self {
            FloorSpec::Count(n) => *n,
            // `2.0` reads as the text "2.0", which is not an INTEGER
            FloorSpec::Fractional(x) => parse_floor_text(&format!("{:?}", x)),
            FloorSpec::Text(s) => parse_floor_text(s),
            FloorSpec::Flag(b) => i64::from(*b),
            FloorSpec::Other(_) => DEFAULT_FLOORS,
        }
    }
}

/// Normalize any floor specification to a floor count
pub fn parse_floors(spec: impl Into<FloorSpec>) -> i64 {
    spec.into().floor_count()
}

/// Read a text floor specification, falling back to [`DEFAULT_FLOORS`]
pub fn parse_floor_text(text: &str) -> i64 {
    let normalized = text.trim().to_uppercase().replace(' ', "");

    let Some(caps) = FLOOR_SPEC_RE.captures(&normalized) else {
        return DEFAULT_FLOORS;
    };

    let floors = if let Some(upper) = caps.name("upper") {
        upper.as_str().parse::<i64>().ok().and_then(|n| n.checked_add(1))
    } else {
        caps.name("count").and_then(|c| c.as_str().parse::<i64>().ok())
    };

    match floors {
        Some(n) if n >= 1 => n,
        _ => DEFAULT_FLOORS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_plus_upper_floors() {
        assert_eq!(parse_floors("G+2"), 3);
        assert_eq!(parse_floors("g+0"), 1);
        assert_eq!(parse_floors(" g + 4 "), 5);
    }

    #[test]
    fn plain_numeric_text() {
        assert_eq!(parse_floors("3"), 3);
        assert_eq!(parse_floors(" 12 "), 12);
    }

    #[test]
    fn integers_pass_through_unchanged() {
        assert_eq!(parse_floors(4i64), 4);
        assert_eq!(parse_floors(0i64), 0);
        assert_eq!(parse_floors(-2i64), -2);
    }

    #[test]
    fn malformed_text_defaults_to_one() {
        for bad in [
            "garbage",
            "",
            "G+",
            "G+X",
            "G+-2",
            "G++3",
            "-3",
            "0",
            "2.5",
            "G+2+1",
            "99999999999999999999",
        ] {
            assert_eq!(parse_floors(bad), DEFAULT_FLOORS, "input {bad:?}");
        }
    }

    #[test]
    fn surrounding_whitespace_and_sign_are_accepted() {
        assert_eq!(parse_floors("3\n"), 3);
        assert_eq!(parse_floors("\t2"), 2);
        assert_eq!(parse_floors("+3"), 3);
        assert_eq!(parse_floors(" \tG+1\r\n"), 2);
    }

    #[test]
    fn null_bool_and_structures_never_fail() {
        let null: FloorSpec = serde_json::from_str("null").unwrap();
        assert_eq!(null.floor_count(), 1);

        let yes: FloorSpec = serde_json::from_str("true").unwrap();
        assert_eq!(yes, FloorSpec::Flag(true));
        assert_eq!(yes.floor_count(), 1);

        let no: FloorSpec = serde_json::from_str("false").unwrap();
        assert_eq!(no.floor_count(), 0);

        for raw in ["[3]", r#"{"floors": 3}"#] {
            let spec: FloorSpec = serde_json::from_str(raw).unwrap();
            assert_eq!(spec.floor_count(), DEFAULT_FLOORS, "input {raw}");
        }
    }

    #[test]
    fn fractional_numbers_default_to_one() {
        assert_eq!(FloorSpec::Fractional(2.0).floor_count(), 1);
        assert_eq!(FloorSpec::Fractional(3.7).floor_count(), 1);
    }

    #[test]
    fn deserializes_numbers_and_text() {
        let count: FloorSpec = serde_json::from_str("3").unwrap();
        assert_eq!(count, FloorSpec::Count(3));

        let frac: FloorSpec = serde_json::from_str("2.5").unwrap();
        assert_eq!(frac, FloorSpec::Fractional(2.5));

        let text: FloorSpec = serde_json::from_str("\"G+1\"").unwrap();
        assert_eq!(text.floor_count(), 2);
    }

    #[test]
    fn display_keeps_caller_text() {
        assert_eq!(FloorSpec::from("G+2").to_string(), "G+2");
        assert_eq!(FloorSpec::from(3i64).to_string(), "3");
    }

    #[test]
    fn default_is_ground_plus_two() {
        assert_eq!(FloorSpec::default().floor_count(), 3);
    }
}
