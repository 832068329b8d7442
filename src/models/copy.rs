//! Copy (physical lending instance of a book) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Copy row as stored in the `book_copies` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Copy {
    pub id: i64,
    pub book_id: i64,
    pub available: bool,
}

/// Copy as exposed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CopySummary {
    pub id: i64,
    pub available: bool,
}

impl From<Copy> for CopySummary {
    fn from(copy: Copy) -> Self {
        Self {
            id: copy.id,
            available: copy.available,
        }
    }
}

/// Availability toggle request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCopyAvailability {
    #[validate(required(message = "Availability status is required"))]
    pub available: Option<bool>,
}
