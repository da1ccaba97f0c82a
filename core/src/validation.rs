//! Client-side field validation for catalog forms.
//!
//! Validation is fail-fast: fields are checked in a fixed order and the first
//! failure is returned. Rules never touch the network and never mutate the
//! input. A date only has to look like `YYYY-MM-DD` with a month in 01-12 and
//! a day in 01-31; calendar validity (Feb 30) is left to the server.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{BookInput, StudentInput};

static ISBN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}(\d{3})?$").unwrap());
static STUDENT_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]\d{5}$").unwrap());
static DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").unwrap());

/// Minimum trimmed length for book titles, author names and student names.
pub const MIN_TEXT_LEN: usize = 2;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Wire name of the offending field, e.g. `publishDate`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Where the lower bound on price sits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricePolicy {
    /// Reject negative prices; zero is a valid (free) price.
    #[default]
    AllowZero,
    /// Reject zero and negative prices.
    RequirePositive,
}

/// Tunable validation rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ValidationPolicy {
    #[serde(default)]
    pub price_policy: PricePolicy,
}

/// A form input that can be checked before submission.
pub trait Validate {
    /// Field names in validation order. The first one receives focus when a
    /// form is opened for editing.
    const FIELDS: &'static [&'static str];

    /// Check every field in order, stopping at the first failure.
    fn validate(&self, policy: &ValidationPolicy) -> Result<(), ValidationError>;

    /// Check a single field from its raw form text. Unknown fields pass.
    fn validate_field(field: &str, raw: &str, policy: &ValidationPolicy) -> Result<(), ValidationError>;
}

impl Validate for BookInput {
    const FIELDS: &'static [&'static str] = &["title", "author", "isbn", "price", "publishDate"];

    fn validate(&self, policy: &ValidationPolicy) -> Result<(), ValidationError> {
        book_title(self.title.as_deref())?;
        book_author(self.author.as_deref())?;
        isbn(self.isbn.as_deref())?;
        price(self.price, policy.price_policy)?;
        publish_date(self.publish_date.as_deref())
    }

    fn validate_field(field: &str, raw: &str, policy: &ValidationPolicy) -> Result<(), ValidationError> {
        match field {
            "title" => book_title(Some(raw)),
            "author" => book_author(Some(raw)),
            "isbn" => isbn(Some(raw)),
            "price" => price(parse_price(raw)?, policy.price_policy),
            "publishDate" => publish_date(Some(raw)),
            _ => Ok(()),
        }
    }
}

impl Validate for StudentInput {
    const FIELDS: &'static [&'static str] = &["name", "studentNumber", "dateOfBirth"];

    fn validate(&self, _policy: &ValidationPolicy) -> Result<(), ValidationError> {
        student_name(self.name.as_deref())?;
        student_number(self.student_number.as_deref())?;
        date_of_birth(self.date_of_birth.as_deref())
    }

    fn validate_field(field: &str, raw: &str, _policy: &ValidationPolicy) -> Result<(), ValidationError> {
        match field {
            "name" => student_name(Some(raw)),
            "studentNumber" => student_number(Some(raw)),
            "dateOfBirth" => date_of_birth(Some(raw)),
            _ => Ok(()),
        }
    }
}

fn book_title(value: Option<&str>) -> Result<(), ValidationError> {
    let title = required("title", value, "Please enter a title.")?;
    min_len("title", title, "Title must be at least 2 characters.")
}

fn book_author(value: Option<&str>) -> Result<(), ValidationError> {
    let author = required("author", value, "Please enter an author.")?;
    min_len("author", author, "Author must be at least 2 characters.")
}

fn isbn(value: Option<&str>) -> Result<(), ValidationError> {
    let isbn = required("isbn", value, "Please enter an ISBN.")?;
    if !ISBN_REGEX.is_match(isbn) {
        return Err(ValidationError::new("isbn", "ISBN must be 10 or 13 digits."));
    }
    Ok(())
}

fn price(value: Option<f64>, policy: PricePolicy) -> Result<(), ValidationError> {
    let Some(price) = value else {
        return Err(ValidationError::new("price", "Please enter a price."));
    };
    if !price.is_finite() {
        return Err(ValidationError::new("price", "Price must be a number."));
    }
    match policy {
        PricePolicy::AllowZero if price < 0.0 => {
            Err(ValidationError::new("price", "Price must be 0 or greater."))
        }
        PricePolicy::RequirePositive if price <= 0.0 => {
            Err(ValidationError::new("price", "Price must be greater than 0."))
        }
        _ => Ok(()),
    }
}

fn parse_price(raw: &str) -> Result<Option<f64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| ValidationError::new("price", "Price must be a number."))
}

fn publish_date(value: Option<&str>) -> Result<(), ValidationError> {
    let date = required("publishDate", value, "Please enter a publish date.")?;
    date_format("publishDate", date)
}

fn student_name(value: Option<&str>) -> Result<(), ValidationError> {
    let name = required("name", value, "Please enter a name.")?;
    min_len("name", name, "Name must be at least 2 characters.")
}

fn student_number(value: Option<&str>) -> Result<(), ValidationError> {
    let number = required("studentNumber", value, "Please enter a student number.")?;
    if !STUDENT_NUMBER_REGEX.is_match(number) {
        return Err(ValidationError::new(
            "studentNumber",
            "Student number must be one letter followed by five digits.",
        ));
    }
    Ok(())
}

fn date_of_birth(value: Option<&str>) -> Result<(), ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(()),
        Some(date) => date_format("dateOfBirth", date),
    }
}

/// Returns the trimmed value, or an error when it is absent or blank.
fn required<'a>(field: &'static str, value: Option<&'a str>, message: &str) -> Result<&'a str, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::new(field, message)),
    }
}

fn min_len(field: &'static str, value: &str, message: &str) -> Result<(), ValidationError> {
    if value.chars().count() < MIN_TEXT_LEN {
        return Err(ValidationError::new(field, message));
    }
    Ok(())
}

fn date_format(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !DATE_REGEX.is_match(value) {
        return Err(ValidationError::new(field, "Date must be in YYYY-MM-DD format."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_book() -> BookInput {
        BookInput {
            title: Some("Dune".to_string()),
            author: Some("Frank Herbert".to_string()),
            isbn: Some("9780441172719".to_string()),
            price: Some(18.0),
            publish_date: Some("1965-08-01".to_string()),
        }
    }

    fn valid_student() -> StudentInput {
        StudentInput {
            name: Some("Kim Minji".to_string()),
            student_number: Some("A12345".to_string()),
            date_of_birth: Some("2001-04-09".to_string()),
        }
    }

    fn book_field(book: &BookInput) -> Option<&'static str> {
        book.validate(&ValidationPolicy::default()).err().map(|e| e.field)
    }

    #[test]
    fn valid_book_passes() {
        assert_eq!(valid_book().validate(&ValidationPolicy::default()), Ok(()));
    }

    #[test]
    fn empty_book_reports_title_first() {
        assert_eq!(book_field(&BookInput::default()), Some("title"));
    }

    #[test]
    fn missing_fields_are_reported_in_priority_order() {
        let mut book = BookInput::default();
        book.title = Some("Dune".to_string());
        assert_eq!(book_field(&book), Some("author"));
        book.author = Some("Herbert".to_string());
        assert_eq!(book_field(&book), Some("isbn"));
        book.isbn = Some("1234567890".to_string());
        assert_eq!(book_field(&book), Some("price"));
        book.price = Some(1.0);
        assert_eq!(book_field(&book), Some("publishDate"));
        book.publish_date = Some("2024-01-01".to_string());
        assert_eq!(book_field(&book), None);
    }

    #[test]
    fn whitespace_only_title_is_missing() {
        let mut book = valid_book();
        book.title = Some("   ".to_string());
        let err = book.validate(&ValidationPolicy::default()).unwrap_err();
        assert_eq!(err.field, "title");
        assert_eq!(err.message, "Please enter a title.");
    }

    #[test]
    fn single_character_title_and_author_are_too_short() {
        let mut book = valid_book();
        book.title = Some(" D ".to_string());
        let err = book.validate(&ValidationPolicy::default()).unwrap_err();
        assert_eq!(err.message, "Title must be at least 2 characters.");

        let mut book = valid_book();
        book.author = Some("H".to_string());
        assert_eq!(book_field(&book), Some("author"));
    }

    #[test]
    fn isbn_must_be_ten_or_thirteen_digits() {
        for (isbn, ok) in [
            ("123456789", false),
            ("1234567890", true),
            ("12345678901", false),
            ("1234567890123", true),
            ("123456789X", false),
            ("12345-67890", false),
        ] {
            let mut book = valid_book();
            book.isbn = Some(isbn.to_string());
            assert_eq!(book_field(&book).is_none(), ok, "isbn {isbn}");
        }
    }

    #[test]
    fn negative_price_is_rejected_and_large_price_accepted() {
        let mut book = valid_book();
        book.price = Some(-1.0);
        assert_eq!(book_field(&book), Some("price"));
        book.price = Some(1000.0);
        assert_eq!(book_field(&book), None);
    }

    #[test]
    fn zero_price_follows_policy() {
        let mut book = valid_book();
        book.price = Some(0.0);
        assert_eq!(book.validate(&ValidationPolicy::default()), Ok(()));

        let strict = ValidationPolicy {
            price_policy: PricePolicy::RequirePositive,
        };
        let err = book.validate(&strict).unwrap_err();
        assert_eq!(err.field, "price");
        assert_eq!(err.message, "Price must be greater than 0.");
    }

    #[test]
    fn nan_price_is_rejected() {
        let mut book = valid_book();
        book.price = Some(f64::NAN);
        assert_eq!(book_field(&book), Some("price"));
    }

    #[test]
    fn month_out_of_range_is_rejected() {
        let mut book = valid_book();
        book.publish_date = Some("2024-13-01".to_string());
        assert_eq!(book_field(&book), Some("publishDate"));
        book.publish_date = Some("2024-00-10".to_string());
        assert_eq!(book_field(&book), Some("publishDate"));
    }

    #[test]
    fn impossible_calendar_day_is_accepted() {
        let mut book = valid_book();
        book.publish_date = Some("2024-02-30".to_string());
        assert_eq!(book_field(&book), None);
        book.publish_date = Some("2024-02-32".to_string());
        assert_eq!(book_field(&book), Some("publishDate"));
        book.publish_date = Some("24-02-01".to_string());
        assert_eq!(book_field(&book), Some("publishDate"));
    }

    #[test]
    fn student_number_needs_letter_and_five_digits() {
        for (number, ok) in [
            ("A12345", true),
            ("z00000", true),
            ("12345", false),
            ("AB1234", false),
            ("A123456", false),
            ("A1234", false),
        ] {
            let mut student = valid_student();
            student.student_number = Some(number.to_string());
            let result = student.validate(&ValidationPolicy::default());
            assert_eq!(result.is_ok(), ok, "student number {number}");
        }
    }

    #[test]
    fn student_birth_date_is_optional_but_checked() {
        let mut student = valid_student();
        student.date_of_birth = None;
        assert!(student.validate(&ValidationPolicy::default()).is_ok());

        student.date_of_birth = Some("2001-13-01".to_string());
        let err = student.validate(&ValidationPolicy::default()).unwrap_err();
        assert_eq!(err.field, "dateOfBirth");
    }

    #[test]
    fn student_name_is_checked_first() {
        let err = StudentInput::default()
            .validate(&ValidationPolicy::default())
            .unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn live_field_validation() {
        let policy = ValidationPolicy::default();
        assert!(BookInput::validate_field("isbn", "123", &policy).is_err());
        assert!(BookInput::validate_field("isbn", "1234567890", &policy).is_ok());
        assert!(BookInput::validate_field("price", "0", &policy).is_ok());

        let err = BookInput::validate_field("price", "abc", &policy).unwrap_err();
        assert_eq!(err.message, "Price must be a number.");
        let err = BookInput::validate_field("price", "  ", &policy).unwrap_err();
        assert_eq!(err.message, "Please enter a price.");

        assert!(BookInput::validate_field("unknown", "", &policy).is_ok());
        assert!(StudentInput::validate_field("studentNumber", "A1", &policy).is_err());
    }
}
