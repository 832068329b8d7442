//! Book (catalog title) model and related types

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::copy::CopySummary;
use crate::error::AppError;

/// ISBN-10 or ISBN-13 (978/979 prefix), digits only, `X` allowed as check digit.
pub static ISBN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(97(8|9))?\d{9}(\d|X)$").expect("valid ISBN regex"));

/// Book row as stored in the `books` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: i32,
}

/// Book without its copies (list, create and update responses)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: i32,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            published_year: book.published_year,
        }
    }
}

/// Book with all of its copies, in creation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDetail {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: i32,
    pub copies: Vec<CopySummary>,
}

impl BookDetail {
    pub fn new(book: Book, copies: Vec<CopySummary>) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            published_year: book.published_year,
            copies,
        }
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Author is required"))]
    pub author: String,
    /// ISBN-10 or ISBN-13, e.g. `9780441013593`
    #[validate(custom(function = "isbn_format"))]
    pub isbn: String,
    #[validate(
        required(message = "Published year is required"),
        range(min = 1000, max = 2100, message = "Published year must be between 1000 and 2100")
    )]
    pub published_year: Option<i32>,
}

/// Validated book ready to be inserted; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: i32,
}

impl TryFrom<&CreateBook> for NewBook {
    type Error = AppError;

    fn try_from(data: &CreateBook) -> Result<Self, Self::Error> {
        let published_year = data.published_year.ok_or_else(|| {
            AppError::Validation("publishedYear: Published year is required".to_string())
        })?;

        Ok(Self {
            title: data.title.clone(),
            author: data.author.clone(),
            isbn: data.isbn.clone(),
            published_year,
        })
    }
}

/// Partial book update. Omitted or blank fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    #[validate(custom(function = "blank_or_isbn", message = "Invalid ISBN format"))]
    pub isbn: Option<String>,
    #[validate(range(min = 1000, max = 2100, message = "Published year must be between 1000 and 2100"))]
    pub published_year: Option<i32>,
}

impl UpdateBook {
    /// Apply the supplied fields to `book`. Returns true if anything changed.
    pub fn apply_to(&self, book: &mut Book) -> bool {
        let mut changed = false;

        let mut overwrite = |target: &mut String, value: &Option<String>| {
            if let Some(value) = present(value) {
                if target.as_str() != value {
                    *target = value.to_string();
                    changed = true;
                }
            }
        };
        overwrite(&mut book.title, &self.title);
        overwrite(&mut book.author, &self.author);
        overwrite(&mut book.isbn, &self.isbn);

        if let Some(year) = self.published_year {
            if book.published_year != year {
                book.published_year = year;
                changed = true;
            }
        }

        changed
    }
}

/// Non-blank value of an optional text field
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn isbn_format(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(Cow::from("ISBN is required"));
        return Err(err);
    }
    if !ISBN_PATTERN.is_match(value) {
        let mut err = ValidationError::new("isbn");
        err.message = Some(Cow::from("Invalid ISBN format"));
        return Err(err);
    }
    Ok(())
}

fn blank_or_isbn(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || ISBN_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("isbn"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> CreateBook {
        CreateBook {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: "9780441013593".to_string(),
            published_year: Some(1965),
        }
    }

    #[test]
    fn test_isbn_pattern() {
        assert!(ISBN_PATTERN.is_match("9780441013593"));
        assert!(ISBN_PATTERN.is_match("044101359X"));
        assert!(ISBN_PATTERN.is_match("9790441013593"));
        assert!(!ISBN_PATTERN.is_match("978-0-441-01359-3"));
        assert!(!ISBN_PATTERN.is_match("9770441013593"));
        assert!(!ISBN_PATTERN.is_match("12345"));
    }

    #[test]
    fn test_create_book_valid() {
        assert!(dune().validate().is_ok());
    }

    #[test]
    fn test_create_book_rejects_blank_title() {
        let mut book = dune();
        book.title = "   ".to_string();
        let errors = book.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert_eq!(
            fields["title"][0].message.as_deref(),
            Some("Title is required")
        );
    }

    #[test]
    fn test_create_book_rejects_bad_isbn_and_year() {
        let mut book = dune();
        book.isbn = "not-an-isbn".to_string();
        book.published_year = Some(999);
        let errors = book.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("isbn"));
        assert!(fields.contains_key("published_year"));

        book.isbn = "9780441013593".to_string();
        book.published_year = Some(2101);
        assert!(book.validate().is_err());
    }

    #[test]
    fn test_create_book_blank_isbn_is_required() {
        let mut book = dune();
        book.isbn = " ".to_string();
        let errors = book.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["isbn"].len(), 1);
        assert_eq!(fields["isbn"][0].message.as_deref(), Some("ISBN is required"));

        book.isbn = "978044101359".to_string();
        let errors = book.validate().unwrap_err();
        assert_eq!(
            errors.field_errors()["isbn"][0].message.as_deref(),
            Some("Invalid ISBN format")
        );
    }

    #[test]
    fn test_create_book_requires_year() {
        let mut book = dune();
        book.published_year = None;
        let errors = book.validate().unwrap_err();
        assert_eq!(
            errors.field_errors()["published_year"][0].message.as_deref(),
            Some("Published year is required")
        );
        assert!(matches!(NewBook::try_from(&book), Err(AppError::Validation(_))));

        let new_book = NewBook::try_from(&dune()).unwrap();
        assert_eq!(new_book.published_year, 1965);
    }

    #[test]
    fn test_update_book_allows_blank_isbn() {
        let update = UpdateBook {
            isbn: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let update = UpdateBook {
            isbn: Some("123".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_apply_update_skips_blank_fields() {
        let mut book = Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: "9780441013593".to_string(),
            published_year: 1965,
        };
        let update = UpdateBook {
            title: Some("  ".to_string()),
            author: None,
            isbn: Some("0441013597".to_string()),
            published_year: Some(1966),
        };

        assert!(update.apply_to(&mut book));
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.isbn, "0441013597");
        assert_eq!(book.published_year, 1966);

        assert!(!update.apply_to(&mut book));
    }

    #[test]
    fn test_summary_uses_camel_case() {
        let summary = BookSummary {
            id: 1,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: "9780441013593".to_string(),
            published_year: 1965,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["publishedYear"], 1965);
    }
}
