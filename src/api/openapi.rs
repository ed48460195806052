//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, circulation, health, stats, students};

/// Registers the bearer scheme referenced by mutating routes
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Circulation API",
        version = "1.0.0",
        description = "Books, students and borrow/return transactions"
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
        // Students
        students::list_students,
        students::create_student,
        students::get_student,
        // Circulation
        circulation::borrow_book,
        circulation::return_book,
        circulation::list_borrow_records,
        circulation::get_borrow_record,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::student::Student,
            crate::models::student::CreateStudent,
            crate::models::borrow_record::BorrowRecord,
            crate::models::borrow_record::BorrowStatus,
            crate::models::borrow_record::BorrowRequest,
            crate::models::borrow_record::ReturnRequest,
            crate::models::stats::LibrarySummary,
            circulation::TransactionResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book inventory"),
        (name = "students", description = "Student registry"),
        (name = "circulation", description = "Borrow and return transactions"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
