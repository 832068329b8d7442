//! Data models for the catalog

pub mod book;
pub mod copy;

// Re-export commonly used types
pub use book::{Book, BookDetail, BookSummary, CreateBook, NewBook, UpdateBook};
pub use copy::{Copy, CopySummary, UpdateCopyAvailability};
