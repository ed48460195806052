//! API handlers for the circulation REST endpoints

pub mod books;
pub mod circulation;
pub mod health;
pub mod openapi;
pub mod stats;
pub mod students;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    routing::{get, post},
    Json, RequestPartsExt, Router,
};
use serde::de::DeserializeOwned;
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth::TokenClaims, error::AppError, AppState};

/// Extractor guarding mutating routes.
///
/// Holds `None` when no token secret is configured and the surface is open.
pub struct StaffToken(pub Option<TokenClaims>);

#[async_trait]
impl FromRequestParts<AppState> for StaffToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(secret) = state.config.auth.jwt_secret.as_deref() else {
            return Ok(StaffToken(None));
        };

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Authentication("Missing bearer token".to_string()))?;

        let claims = TokenClaims::verify(bearer.token(), secret, &state.config.auth.audience)?;
        Ok(StaffToken(Some(claims)))
    }
}

/// JSON request body whose shape errors are reported as `AppError::Validation`
/// (400 with a `{detail, code}` body) instead of axum's plain-text 422.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/:id", get(books::get_book).put(books::update_book))
        // Students
        .route("/students", get(students::list_students).post(students::create_student))
        .route("/students/:id", get(students::get_student))
        // Circulation
        .route("/borrow", post(circulation::borrow_book))
        .route("/return", post(circulation::return_book))
        .route("/borrow-records", get(circulation::list_borrow_records))
        .route("/borrow-records/:id", get(circulation::get_borrow_record))
        // Statistics
        .route("/stats", get(stats::get_stats))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
