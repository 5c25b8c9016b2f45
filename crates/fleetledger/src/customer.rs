//! Customer records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fields::clean_text;

/// A renter, identified by a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: u32,
    name: String,
}

impl Customer {
    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`](crate::Error::InvalidField) if the name is
    /// empty or contains the store delimiter.
    pub fn new(id: u32, name: &str) -> Result<Self> {
        let name = clean_text("name", name)?;
        Ok(Self { id, name })
    }

    /// Identifier.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Customer #{}: {}", self.id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_customer() {
        let customer = Customer::new(100, " Test Customer ").unwrap();
        assert_eq!(customer.id(), 100);
        assert_eq!(customer.name(), "Test Customer");
    }

    #[test]
    fn test_rejects_bad_names() {
        assert!(Customer::new(1, "").is_err());
        assert!(Customer::new(1, "Doe, Jane").is_err());
    }

    #[test]
    fn test_display() {
        let customer = Customer::new(7, "Jane Doe").unwrap();
        assert_eq!(customer.to_string(), "Customer #7: Jane Doe");
    }
}
