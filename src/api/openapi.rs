//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Catalog API",
        version = "1.0.0",
        description = "Books and their lending copies",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api", description = "Catalog API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::create_book,
        books::get_book,
        books::update_book,
        books::delete_book,
        // Copies
        books::list_copies,
        books::add_copy,
        books::update_copy_availability,
    ),
    components(
        schemas(
            crate::models::book::BookSummary,
            crate::models::book::BookDetail,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::copy::CopySummary,
            crate::models::copy::UpdateCopyAvailability,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog book management"),
        (name = "copies", description = "Copies of a book and their availability")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
