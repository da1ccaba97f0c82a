//! Domain records for the catalog API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch drift between the two crates. Server records
//! (`Book`, `Student`) are always complete. Form inputs (`BookInput`,
//! `StudentInput`) hold optional fields because a form may be half filled in;
//! the validator decides whether an input is fit to submit.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::validation::Validate;

/// Collection a record belongs to. Maps to the `/api/{resource}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Books,
    Students,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Books => "books",
            Resource::Students => "students",
        }
    }
}

/// Trimming applied to a form before it is validated and sent.
pub trait Normalize {
    fn normalized(&self) -> Self;
}

/// A catalog entity manipulated by the CRUD operations.
pub trait Record: DeserializeOwned + Clone {
    /// The form-side representation submitted on create and update.
    type Input: Validate + Normalize + Serialize + Default + Clone;

    const RESOURCE: Resource;

    /// Singular noun used in user-facing messages.
    const NOUN: &'static str;

    fn id(&self) -> i64;

    /// Human-readable name shown when confirming a delete.
    fn label(&self) -> &str;

    /// Populate a form from a stored record (edit mode).
    fn to_input(&self) -> Self::Input;
}

/// A book as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: f64,
    pub publish_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<BookDetail>,
}

/// Extended publication details attached to a book.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

/// Book form contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub price: Option<f64>,
    pub publish_date: Option<String>,
}

impl Normalize for BookInput {
    /// Trim surrounding whitespace from every text field.
    fn normalized(&self) -> Self {
        Self {
            title: trimmed(&self.title),
            author: trimmed(&self.author),
            isbn: trimmed(&self.isbn),
            price: self.price,
            publish_date: trimmed(&self.publish_date),
        }
    }
}

impl Record for Book {
    type Input = BookInput;

    const RESOURCE: Resource = Resource::Books;
    const NOUN: &'static str = "book";

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn to_input(&self) -> BookInput {
        BookInput {
            title: Some(self.title.clone()),
            author: Some(self.author.clone()),
            isbn: Some(self.isbn.clone()),
            price: Some(self.price),
            publish_date: Some(self.publish_date.clone()),
        }
    }
}

/// A student as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub student_number: String,
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

/// Student form contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    pub name: Option<String>,
    pub student_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
}

impl Normalize for StudentInput {
    /// Trim surrounding whitespace; an empty date of birth becomes absent.
    fn normalized(&self) -> Self {
        Self {
            name: trimmed(&self.name),
            student_number: trimmed(&self.student_number),
            date_of_birth: trimmed(&self.date_of_birth).filter(|d| !d.is_empty()),
        }
    }
}

impl Record for Student {
    type Input = StudentInput;

    const RESOURCE: Resource = Resource::Students;
    const NOUN: &'static str = "student";

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn to_input(&self) -> StudentInput {
        StudentInput {
            name: Some(self.name.clone()),
            student_number: Some(self.student_number.clone()),
            date_of_birth: self.date_of_birth.clone(),
        }
    }
}

/// Error payload the API attaches to every non-2xx response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value.as_ref().map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_uses_camel_case_on_the_wire() {
        let json = r#"{"id":7,"title":"Dune","author":"Herbert","isbn":"1234567890","price":12.5,"publishDate":"1965-08-01"}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.publish_date, "1965-08-01");
        assert!(book.detail.is_none());

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["publishDate"], "1965-08-01");
        assert!(value.get("detail").is_none());
    }

    #[test]
    fn book_detail_is_parsed_when_present() {
        let json = r#"{"id":1,"title":"Dune","author":"Herbert","isbn":"1234567890","price":1,"publishDate":"1965-08-01",
            "detail":{"id":3,"description":null,"language":"en","pageCount":416,"publisher":"Chilton","edition":null,"coverImageUrl":null}}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        let detail = book.detail.unwrap();
        assert_eq!(detail.page_count, Some(416));
        assert_eq!(detail.publisher.as_deref(), Some("Chilton"));
        assert!(detail.description.is_none());
    }

    #[test]
    fn book_input_normalization_trims_text() {
        let input = BookInput {
            title: Some("  Dune ".to_string()),
            author: Some("Herbert\n".to_string()),
            isbn: None,
            price: Some(3.0),
            publish_date: Some(" 1965-08-01".to_string()),
        };
        let normalized = input.normalized();
        assert_eq!(normalized.title.as_deref(), Some("Dune"));
        assert_eq!(normalized.author.as_deref(), Some("Herbert"));
        assert!(normalized.isbn.is_none());
        assert_eq!(normalized.publish_date.as_deref(), Some("1965-08-01"));
    }

    #[test]
    fn student_input_drops_blank_birth_date() {
        let input = StudentInput {
            name: Some("Kim".to_string()),
            student_number: Some("A12345".to_string()),
            date_of_birth: Some("   ".to_string()),
        };
        let normalized = input.normalized();
        assert!(normalized.date_of_birth.is_none());
        let value = serde_json::to_value(&normalized).unwrap();
        assert!(value.get("dateOfBirth").is_none());
        assert_eq!(value["studentNumber"], "A12345");
    }

    #[test]
    fn record_round_trips_into_form() {
        let student = Student {
            id: 4,
            name: "Lee".to_string(),
            student_number: "B00001".to_string(),
            date_of_birth: None,
        };
        let input = student.to_input();
        assert_eq!(input.name.as_deref(), Some("Lee"));
        assert_eq!(student.label(), "Lee");
        assert_eq!(Student::RESOURCE.path(), "students");
    }

    #[test]
    fn error_body_tolerates_missing_message() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message.is_none());
    }
}
