//! Field-level input checks shared by the records and the CLI.
//!
//! The durable stores are comma-separated with no escaping, so every free-text
//! field is checked for the delimiter before it can reach a record.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{Error, Result};

/// Field delimiter used by every durable store.
pub const DELIMITER: char = ',';

/// Earliest model year accepted.
pub const MIN_YEAR: i32 = 1886;

/// Latest model year accepted.
pub const MAX_YEAR: i32 = 9999;

/// Upper-case the first character and lower-case the rest.
///
/// A first character whose upper-case form is several characters (such as
/// `ß`) is kept as is, so capitalizing twice gives the same text.
#[must_use]
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut upper = first.to_uppercase();
    let head = match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => first,
    };
    std::iter::once(head)
        .chain(chars.flat_map(char::to_lowercase))
        .collect()
}

/// Trim a free-text field and reject it if it is empty or would corrupt a
/// store line.
///
/// # Errors
///
/// Returns [`Error::InvalidField`] if the trimmed text is empty or contains a
/// comma or a line break.
pub fn clean_text(field: &'static str, input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_field(field, "must not be empty"));
    }
    if trimmed.contains(DELIMITER) {
        return Err(Error::invalid_field(field, "must not contain ','"));
    }
    if trimmed.contains(['\n', '\r']) {
        return Err(Error::invalid_field(field, "must be a single line"));
    }
    Ok(trimmed.to_string())
}

/// Check a model year.
///
/// # Errors
///
/// Returns [`Error::InvalidField`] if the year is outside
/// [`MIN_YEAR`]..=[`MAX_YEAR`].
pub fn check_year(year: i32) -> Result<i32> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(Error::invalid_field(
            "year",
            format!("{year} is outside {MIN_YEAR}..={MAX_YEAR}"),
        ))
    }
}

/// Parse a model year from form input.
///
/// # Errors
///
/// Returns [`Error::InvalidField`] if the input is not a whole number or is
/// out of range.
pub fn parse_year(input: &str) -> Result<i32> {
    let year = input
        .trim()
        .parse::<i32>()
        .map_err(|_| Error::invalid_field("year", format!("'{input}' is not a valid year")))?;
    check_year(year)
}

/// Check that a monetary amount is not negative.
///
/// # Errors
///
/// Returns [`Error::InvalidField`] for negative amounts.
pub fn check_amount(field: &'static str, amount: Decimal) -> Result<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::invalid_field(field, "must not be negative"));
    }
    Ok(amount)
}

/// Parse a monetary amount from form input.
///
/// An empty input is read as zero, which is how a return without extra fees
/// is entered.
///
/// # Errors
///
/// Returns [`Error::InvalidField`] if the input is not a decimal number or is
/// negative.
pub fn parse_amount(field: &'static str, input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| Error::invalid_field(field, format!("'{input}' is not a valid amount")))?;
    check_amount(field, amount)
}

/// Parse a numeric customer identifier.
///
/// # Errors
///
/// Returns [`Error::InvalidField`] unless the input is a non-negative whole
/// number.
pub fn parse_customer_id(input: &str) -> Result<u32> {
    input.trim().parse::<u32>().map_err(|_| {
        Error::invalid_field(
            "customer id",
            format!("'{input}' must be a number (digits only)"),
        )
    })
}

/// Parse a calendar date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns [`Error::InvalidField`] if the input is not an ISO calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        Error::invalid_field("date", format!("'{input}' is not a YYYY-MM-DD date"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("toyota"), "Toyota");
        assert_eq!(capitalize("CAMRY"), "Camry");
        assert_eq!(capitalize("mCLaren"), "Mclaren");
        assert_eq!(capitalize("x"), "X");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_capitalize_is_stable() {
        assert_eq!(capitalize("ßmw"), "ßmw");
        for input in ["ßmw", "toyota", "ÉCOLE", "ǆemal", "x"] {
            let once = capitalize(input);
            assert_eq!(capitalize(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("make", "  Ford ").unwrap(), "Ford");
        assert!(clean_text("make", "   ").is_err());
        assert!(clean_text("make", "Ford, Inc").is_err());
        assert!(clean_text("name", "Jane\nDoe").is_err());
    }

    #[test]
    fn test_clean_text_error_names_field() {
        let err = clean_text("model", "").unwrap_err();
        assert!(err.to_string().contains("model"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("2022").unwrap(), 2022);
        assert_eq!(parse_year(" 1999 ").unwrap(), 1999);
        assert!(parse_year("twenty").is_err());
        assert!(parse_year("1200").is_err());
        assert!(parse_year("").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("amount", "50.0").unwrap(), Decimal::new(500, 1));
        assert_eq!(parse_amount("fees", "").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("fees", "0").unwrap(), Decimal::ZERO);
        assert!(parse_amount("amount", "abc").is_err());
        assert!(parse_amount("amount", "-5").is_err());
    }

    #[test]
    fn test_parse_customer_id() {
        assert_eq!(parse_customer_id("100").unwrap(), 100);
        assert!(parse_customer_id("10a").is_err());
        assert!(parse_customer_id("-1").is_err());
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-03-15").unwrap();
        assert_eq!(date.to_string(), "2024-03-15");
        assert!(parse_date("15/03/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }
}
