//! API handlers for the catalog REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use validator::{Validate, ValidationErrors};

use crate::{
    error::{AppError, ErrorResponse},
    AppState,
};

/// JSON body extractor that runs `validator` checks before the handler sees the value
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| AppError::Validation(first_violation(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// Path parameters extractor; malformed ids are reported as validation errors
pub struct IdPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for IdPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(IdPath(value))
    }
}

/// `"<field>: <message>"` for the first failing field, by field name
fn first_violation(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", wire_name(&field.to_string()), message)
            })
        })
        .unwrap_or_else(|| "Validation error".to_string())
}

/// JSON name of a request field (`published_year` -> `publishedYear`)
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

/// Stamp the request path onto error bodies produced by [`AppError`]
async fn error_context(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<ErrorResponse>() {
        Some(mut body) => {
            body.path = Some(path);
            (response.status(), Json(body)).into_response()
        }
        None => response,
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Copies
        .route(
            "/books/:id/copies",
            get(books::list_copies).post(books::add_copy),
        )
        .route(
            "/books/:id/copies/:copy_id",
            put(books::update_copy_availability),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api", api)
        .merge(openapi)
        .layer(middleware::from_fn(error_context))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
