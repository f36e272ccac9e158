//! # Validation Module
//!
//! Lexical predicates for every token the console accepts.
//!
//! ## Token Grammar
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Token          Max   Charset                         Extra rule        │
//! │  ─────────────  ────  ──────────────────────────────  ───────────────── │
//! │  user ID          30  [A-Za-z0-9_]                                      │
//! │  password         30  [A-Za-z0-9_]                                      │
//! │  username         30  printable ASCII (0x21-0x7E)                       │
//! │  ISBN             20  printable ASCII (0x21-0x7E)                       │
//! │  name / author    60  0x20-0x7E, no '"'               spaces allowed    │
//! │  keywords         60  0x20-0x7E, no '"'               '|'-separated,    │
//! │                                                       unique, non-empty │
//! │  price            13  digits, at most one '.'         >= 1 digit        │
//! │  quantity         10  digits                          > 0               │
//! │  count            10  digits                                            │
//! │  privilege         1  one of 1, 3, 7                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators run before the privilege gate, and before any state is read.
//!
//! ## Usage
//! ```rust
//! use tome_core::validation::{validate_isbn, parse_quantity};
//!
//! assert!(validate_isbn("978-7-111").is_ok());
//! assert_eq!(parse_quantity("5").unwrap(), 5);
//! assert!(parse_quantity("0").is_err());
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Privilege;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MAX_USER_ID_LEN: usize = 30;
pub const MAX_USERNAME_LEN: usize = 30;
pub const MAX_ISBN_LEN: usize = 20;
pub const MAX_BOOK_TEXT_LEN: usize = 60;
pub const MAX_PRICE_LEN: usize = 13;
pub const MAX_COUNT_LEN: usize = 10;

// =============================================================================
// Shared Checks
// =============================================================================

fn check_length(field: &'static str, value: &str, max: usize) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if value.len() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn check_charset(
    field: &'static str,
    value: &str,
    allowed: impl Fn(char) -> bool,
) -> ValidationResult<()> {
    match value.chars().find(|&c| !allowed(c)) {
        Some(found) => Err(ValidationError::InvalidCharacter { field, found }),
        None => Ok(()),
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_isbn_char(c: char) -> bool {
    c.is_ascii_graphic() && c != '"'
}

/// Quoted text may carry spaces; the quotes themselves are not content.
fn is_book_text_char(c: char) -> bool {
    (c == ' ' || c.is_ascii_graphic()) && c != '"'
}

// =============================================================================
// Account Tokens
// =============================================================================

/// Validates an account identity.
///
/// ## Example
/// ```rust
/// use tome_core::validation::validate_user_id;
///
/// assert!(validate_user_id("alice_01").is_ok());
/// assert!(validate_user_id("alice-01").is_err());
/// assert!(validate_user_id(&"a".repeat(31)).is_err());
/// ```
pub fn validate_user_id(value: &str) -> ValidationResult<()> {
    check_length("user ID", value, MAX_USER_ID_LEN)?;
    check_charset("user ID", value, is_id_char)
}

/// Validates a password. Same grammar as the identity.
pub fn validate_password(value: &str) -> ValidationResult<()> {
    check_length("password", value, MAX_USER_ID_LEN)?;
    check_charset("password", value, is_id_char)
}

/// Validates a display name: any visible ASCII, no spaces.
pub fn validate_username(value: &str) -> ValidationResult<()> {
    check_length("username", value, MAX_USERNAME_LEN)?;
    check_charset("username", value, |c| c.is_ascii_graphic())
}

/// Parses the single-digit privilege of `useradd`.
///
/// Only `1`, `3` and `7` name an account privilege.
pub fn parse_privilege(value: &str) -> ValidationResult<Privilege> {
    let digit = match value.as_bytes() {
        [d] if d.is_ascii_digit() => d - b'0',
        _ => {
            return Err(ValidationError::InvalidFormat {
                field: "privilege",
                reason: "must be a single digit",
            })
        }
    };

    Privilege::from_rank(digit).ok_or(ValidationError::OutOfRange { field: "privilege" })
}

// =============================================================================
// Book Tokens
// =============================================================================

/// Validates an ISBN.
pub fn validate_isbn(value: &str) -> ValidationResult<()> {
    check_length("ISBN", value, MAX_ISBN_LEN)?;
    check_charset("ISBN", value, is_isbn_char)
}

/// Validates a book name or author (the unquoted text).
pub fn validate_book_text(field: &'static str, value: &str) -> ValidationResult<()> {
    check_length(field, value, MAX_BOOK_TEXT_LEN)?;
    check_charset(field, value, is_book_text_char)
}

/// Validates a keyword list as stored on a book.
///
/// ## Rules
/// - Whole string 1-60 characters, no `"`
/// - Segments separated by `|`, none empty
/// - No segment repeated
///
/// ## Example
/// ```rust
/// use tome_core::validation::validate_keywords;
///
/// assert!(validate_keywords("rust|systems").is_ok());
/// assert!(validate_keywords("rust||systems").is_err());
/// assert!(validate_keywords("rust|rust").is_err());
/// ```
pub fn validate_keywords(value: &str) -> ValidationResult<()> {
    check_length("keyword", value, MAX_BOOK_TEXT_LEN)?;
    check_charset("keyword", value, is_book_text_char)?;

    let mut seen = HashSet::new();
    for segment in value.split('|') {
        if segment.is_empty() {
            return Err(ValidationError::InvalidFormat {
                field: "keyword",
                reason: "empty segment",
            });
        }
        if !seen.insert(segment) {
            return Err(ValidationError::DuplicateKeyword(segment.to_string()));
        }
    }

    Ok(())
}

/// Validates the keyword of a `show -keyword=` filter.
///
/// Searching is by one keyword, so `|` is rejected outright.
pub fn validate_single_keyword(value: &str) -> ValidationResult<()> {
    validate_book_text("keyword", value)?;
    if value.contains('|') {
        return Err(ValidationError::InvalidFormat {
            field: "keyword",
            reason: "only one keyword may be searched",
        });
    }
    Ok(())
}

/// Strips the surrounding double quotes of a flag value.
///
/// ## Example
/// ```rust
/// use tome_core::validation::unquote;
///
/// assert_eq!(unquote("name", "\"Dune\"").unwrap(), "Dune");
/// assert!(unquote("name", "Dune").is_err());
/// assert!(unquote("name", "\"").is_err());
/// ```
pub fn unquote<'a>(field: &'static str, raw: &'a str) -> ValidationResult<&'a str> {
    raw.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or(ValidationError::InvalidFormat {
            field,
            reason: "must be enclosed in double quotes",
        })
}

// =============================================================================
// Numeric Tokens
// =============================================================================

/// Parses a price or total cost.
///
/// ## Rules
/// - 1-13 characters
/// - Digits with at most one `.`, at least one digit
pub fn parse_price(value: &str) -> ValidationResult<Money> {
    check_length("price", value, MAX_PRICE_LEN)?;
    check_charset("price", value, |c| c.is_ascii_digit() || c == '.')?;
    if value.matches('.').count() > 1 {
        return Err(ValidationError::InvalidFormat {
            field: "price",
            reason: "more than one decimal point",
        });
    }

    Money::parse_decimal(value).ok_or(ValidationError::InvalidFormat {
        field: "price",
        reason: "no digits",
    })
}

/// Whether a price token names a strictly positive amount.
///
/// Decided on the text, before rounding: `0.001` is positive even though it
/// is recorded as `0.00`.
///
/// ## Example
/// ```rust
/// use tome_core::validation::is_nonzero_amount;
///
/// assert!(is_nonzero_amount("0.001"));
/// assert!(!is_nonzero_amount("0.000"));
/// ```
pub fn is_nonzero_amount(value: &str) -> bool {
    value.bytes().any(|b| matches!(b, b'1'..=b'9'))
}

fn parse_digits(field: &'static str, value: &str) -> ValidationResult<u64> {
    check_length(field, value, MAX_COUNT_LEN)?;
    check_charset(field, value, |c| c.is_ascii_digit())?;
    // Ten digits always fit in u64.
    value
        .parse()
        .map_err(|_| ValidationError::OutOfRange { field })
}

/// Parses a purchase or import quantity: 1-10 digits, strictly positive.
pub fn parse_quantity(value: &str) -> ValidationResult<i64> {
    let quantity = parse_digits("quantity", value)?;
    if quantity == 0 {
        return Err(ValidationError::OutOfRange { field: "quantity" });
    }
    i64::try_from(quantity).map_err(|_| ValidationError::OutOfRange { field: "quantity" })
}

/// Parses the transaction count of `show finance`: 1-10 digits, zero allowed.
pub fn parse_count(value: &str) -> ValidationResult<u64> {
    parse_digits("count", value)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_user_id() {
        assert!(validate_user_id("root").is_ok());
        assert!(validate_user_id("User_42").is_ok());
        assert!(validate_user_id(&"a".repeat(30)).is_ok());

        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("has space").is_err());
        assert!(validate_user_id("dash-ed").is_err());
        assert!(validate_user_id(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("Alice").is_ok());
        assert!(validate_username("O'Brien!").is_ok());
        assert!(validate_username("\"quoted\"").is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("two words").is_err());
        assert!(validate_username("caf\u{e9}").is_err());
    }

    #[test]
    fn test_validate_isbn() {
        assert!(validate_isbn("978-7-111-54742-6").is_ok());
        assert!(validate_isbn(&"9".repeat(20)).is_ok());

        assert!(validate_isbn(&"9".repeat(21)).is_err());
        assert!(validate_isbn("97\"8").is_err());
        assert!(validate_isbn("978 7").is_err());
        assert!(validate_isbn("").is_err());
    }

    #[test]
    fn test_book_text_keeps_spaces() {
        assert!(validate_book_text("name", "The Hobbit").is_ok());
        assert!(validate_book_text("author", "J. R. R. Tolkien").is_ok());
        assert!(validate_book_text("name", " ").is_ok());

        assert!(validate_book_text("name", "The \"Hobbit\"").is_err());
        assert!(validate_book_text("name", "tab\there").is_err());
        assert!(validate_book_text("name", "caf\u{e9}").is_err());
    }

    #[test]
    fn test_validate_keywords() {
        assert!(validate_keywords("fantasy").is_ok());
        assert!(validate_keywords("fantasy|epic|classic").is_ok());
        assert!(validate_keywords("high fantasy|sword and sorcery").is_ok());

        assert!(validate_keywords("|fantasy").is_err());
        assert!(validate_keywords("fantasy|").is_err());
        assert!(matches!(
            validate_keywords("epic|fantasy|epic"),
            Err(ValidationError::DuplicateKeyword(k)) if k == "epic"
        ));
        assert!(validate_keywords(&"k".repeat(61)).is_err());
    }

    #[test]
    fn test_validate_single_keyword() {
        assert!(validate_single_keyword("fantasy").is_ok());
        assert!(validate_single_keyword("science fiction").is_ok());
        assert!(validate_single_keyword("fantasy|epic").is_err());
        assert!(validate_single_keyword("").is_err());
    }

    #[test]
    fn test_parse_privilege() {
        assert_eq!(parse_privilege("1").unwrap(), Privilege::Customer);
        assert_eq!(parse_privilege("3").unwrap(), Privilege::Staff);
        assert_eq!(parse_privilege("7").unwrap(), Privilege::Admin);

        assert!(parse_privilege("0").is_err());
        assert!(parse_privilege("2").is_err());
        assert!(parse_privilege("07").is_err());
        assert!(parse_privilege("a").is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("12.50").unwrap().cents(), 1250);
        assert_eq!(parse_price("0").unwrap().cents(), 0);

        assert!(parse_price("1.2.3").is_err());
        assert!(parse_price("-1").is_err());
        assert!(parse_price(".").is_err());
        assert!(parse_price(&"1".repeat(14)).is_err());
    }

    #[test]
    fn test_nonzero_amount() {
        assert!(is_nonzero_amount("5"));
        assert!(is_nonzero_amount(".01"));
        assert!(is_nonzero_amount("0.004"));
        assert!(!is_nonzero_amount("0"));
        assert!(!is_nonzero_amount("00.000"));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("1").unwrap(), 1);
        assert_eq!(parse_quantity("9999999999").unwrap(), 9_999_999_999);

        assert!(parse_quantity("0").is_err());
        assert!(parse_quantity("00").is_err());
        assert!(parse_quantity("12345678901").is_err());
        assert!(parse_quantity("1.5").is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("0").unwrap(), 0);
        assert_eq!(parse_count("15").unwrap(), 15);
        assert!(parse_count("").is_err());
        assert!(parse_count("x").is_err());
    }
}
