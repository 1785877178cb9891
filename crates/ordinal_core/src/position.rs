//! Target position validation.

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;

/// A valid target position: an integer of at least 1.
///
/// There is no upper bound. A target beyond the collection size leaves a
/// sparse tail that compaction closes later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(i64);

impl Position {
    /// The first position.
    pub const FIRST: Position = Position(1);

    /// Validates a raw position.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPosition`] if `value < 1`.
    pub fn new(value: i64) -> CoreResult<Self> {
        if value >= 1 {
            Ok(Self(value))
        } else {
            Err(CoreError::invalid_position(value))
        }
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Position {
    type Error = CoreError;

    fn try_from(value: i64) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl FromStr for Position {
    type Err = CoreError;

    /// Parses user input such as a numeric text field.
    fn from_str(s: &str) -> CoreResult<Self> {
        let trimmed = s.trim();
        let value = trimmed
            .parse::<i64>()
            .map_err(|_| CoreError::non_numeric_position(trimmed))?;
        Self::new(value)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn validity_matches_sign(value in any::<i64>()) {
            prop_assert_eq!(Position::new(value).is_ok(), value >= 1);
        }

        #[test]
        fn text_input_agrees_with_new(value in any::<i64>()) {
            let parsed = value.to_string().parse::<Position>();
            prop_assert_eq!(parsed.ok(), Position::new(value).ok());
        }
    }

    #[test]
    fn accepts_positive() {
        assert_eq!(Position::new(1).unwrap(), Position::FIRST);
        assert_eq!(Position::new(9999).unwrap().get(), 9999);
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert!(matches!(
            Position::new(0),
            Err(CoreError::InvalidPosition { position: 0 })
        ));
        assert!(Position::try_from(-3).is_err());
    }

    #[test]
    fn parses_text() {
        assert_eq!(" 12 ".parse::<Position>().unwrap().get(), 12);
        assert!(matches!(
            "twelve".parse::<Position>(),
            Err(CoreError::NonNumericPosition { .. })
        ));
        assert!(matches!(
            "1.5".parse::<Position>(),
            Err(CoreError::NonNumericPosition { .. })
        ));
        assert!(matches!(
            "-1".parse::<Position>(),
            Err(CoreError::InvalidPosition { position: -1 })
        ));
    }
}
