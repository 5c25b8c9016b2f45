//! License plate validation.
//!
//! A plate is exactly three letters followed by three digits. Input is
//! accepted in any case and stored upper-cased.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of characters in a valid plate.
pub const PLATE_LEN: usize = 6;

/// Shape every normalized plate must match.
const PLATE_PATTERN: &str = r"^[A-Z]{3}[0-9]{3}$";

fn plate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PLATE_PATTERN).expect("plate pattern is valid"))
}

/// Why a plate was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlateError {
    /// No plate was supplied.
    #[error("plate is empty")]
    Empty,

    /// Fewer than six characters.
    #[error("plate is too short ({len} characters, expected 6)")]
    TooShort {
        /// Length of the rejected input.
        len: usize,
    },

    /// More than six characters.
    #[error("plate is too long ({len} characters, expected 6)")]
    TooLong {
        /// Length of the rejected input.
        len: usize,
    },

    /// Six characters, but not three letters followed by three digits.
    #[error("plate '{plate}' must be three letters followed by three digits")]
    BadShape {
        /// The rejected input, upper-cased.
        plate: String,
    },
}

/// A validated, upper-cased license plate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Plate(String);

impl Plate {
    /// Validate and normalize a plate.
    ///
    /// # Errors
    ///
    /// Returns a [`PlateError`] describing the first rule the input breaks.
    pub fn parse(input: &str) -> Result<Self, PlateError> {
        if input.is_empty() {
            return Err(PlateError::Empty);
        }

        let len = input.chars().count();
        if len < PLATE_LEN {
            return Err(PlateError::TooShort { len });
        }
        if len > PLATE_LEN {
            return Err(PlateError::TooLong { len });
        }

        let upper = input.to_ascii_uppercase();
        if !plate_regex().is_match(&upper) {
            return Err(PlateError::BadShape { plate: upper });
        }

        Ok(Self(upper))
    }

    /// Validate an optional plate, treating `None` like an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`PlateError::Empty`] for `None`, otherwise as [`Plate::parse`].
    pub fn parse_opt(input: Option<&str>) -> Result<Self, PlateError> {
        input.map_or(Err(PlateError::Empty), Self::parse)
    }

    /// The normalized plate text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against raw user input.
    #[must_use]
    pub fn matches(&self, input: &str) -> bool {
        self.0.eq_ignore_ascii_case(input)
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Plate {
    type Err = PlateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Plate {
    type Error = PlateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Plate> for String {
    fn from(plate: Plate) -> Self {
        plate.0
    }
}
