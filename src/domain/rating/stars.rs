//! Stars value object (1 to 5 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Lowest rating a buyer can give.
pub const MIN_STARS: u8 = 1;

/// Highest rating a buyer can give.
pub const MAX_STARS: u8 = 5;

/// A star rating: 1 (worst) to 5 (best), whole stars only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stars(u8);

impl Stars {
    /// Creates a Stars value, returning error if out of range.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !(MIN_STARS..=MAX_STARS).contains(&value) {
            return Err(ValidationError::out_of_range(
                "stars",
                MIN_STARS as i32,
                MAX_STARS as i32,
                value as i32,
            ));
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Stars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_value_in_range() {
        for value in MIN_STARS..=MAX_STARS {
            assert_eq!(Stars::new(value).unwrap().value(), value);
        }
    }

    #[test]
    fn rejects_zero() {
        assert!(Stars::new(0).is_err());
    }

    #[test]
    fn rejects_six_and_above() {
        assert!(Stars::new(6).is_err());
        assert!(Stars::new(200).is_err());
    }

    #[test]
    fn out_of_range_error_names_the_field() {
        match Stars::new(0) {
            Err(ValidationError::OutOfRange { field, min, max, actual }) => {
                assert_eq!(field, "stars");
                assert_eq!(min, 1);
                assert_eq!(max, 5);
                assert_eq!(actual, 0);
            }
            other => panic!("Expected OutOfRange error, got {:?}", other),
        }
    }

    #[test]
    fn ordering_works() {
        assert!(Stars::new(1).unwrap() < Stars::new(5).unwrap());
    }

    #[test]
    fn serializes_to_bare_number() {
        let json = serde_json::to_string(&Stars::new(4).unwrap()).unwrap();
        assert_eq!(json, "4");
    }
}
