//! Borrow/return endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::{
        borrow_record::{BorrowRecord, BorrowRecordQuery, BorrowRequest, ReturnRequest},
        Outcome,
    },
    AppState,
};

use super::{JsonBody, StaffToken};

/// Completed borrow or return
#[derive(Serialize, ToSchema)]
pub struct TransactionResponse {
    pub success: bool,
    pub message: String,
    /// Borrow record after the transaction
    pub record: BorrowRecord,
}

/// Turn a transaction outcome into a response body or a 400 rejection
fn transaction_response(outcome: Outcome<BorrowRecord>) -> AppResult<Json<TransactionResponse>> {
    match outcome {
        Outcome::Completed { message, value } => Ok(Json(TransactionResponse {
            success: true,
            message,
            record: value,
        })),
        Outcome::Rejected(rejection) => Err(rejection.into()),
    }
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrow",
    tag = "circulation",
    security(("bearer_auth" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = TransactionResponse),
        (status = 400, description = "Unknown student or book, or no copies available", body = ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    _staff: StaffToken,
    JsonBody(request): JsonBody<BorrowRequest>,
) -> AppResult<(StatusCode, Json<TransactionResponse>)> {
    let outcome = state
        .services
        .circulation
        .borrow_book(request.student_id, request.book_id)
        .await?;
    Ok((StatusCode::CREATED, transaction_response(outcome)?))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/return",
    tag = "circulation",
    security(("bearer_auth" = [])),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = TransactionResponse),
        (status = 400, description = "Unknown record or already returned", body = ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    _staff: StaffToken,
    JsonBody(request): JsonBody<ReturnRequest>,
) -> AppResult<Json<TransactionResponse>> {
    let outcome = state.services.circulation.return_book(request.record_id).await?;
    transaction_response(outcome)
}

/// List borrow records, newest first
#[utoipa::path(
    get,
    path = "/borrow-records",
    tag = "circulation",
    params(BorrowRecordQuery),
    responses(
        (status = 200, description = "Borrow records", body = Vec<BorrowRecord>),
        (status = 400, description = "Unknown status filter", body = ErrorResponse)
    )
)]
pub async fn list_borrow_records(
    State(state): State<AppState>,
    Query(query): Query<BorrowRecordQuery>,
) -> AppResult<Json<Vec<BorrowRecord>>> {
    let status = query.status_filter().map_err(AppError::Validation)?;
    let records = state.services.circulation.list_borrow_records(status).await?;
    Ok(Json(records))
}

/// Get borrow record by ID
#[utoipa::path(
    get,
    path = "/borrow-records/{id}",
    tag = "circulation",
    params(("id" = i64, Path, description = "Borrow record ID")),
    responses(
        (status = 200, description = "Borrow record", body = BorrowRecord),
        (status = 404, description = "Record not found", body = ErrorResponse)
    )
)]
pub async fn get_borrow_record(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<BorrowRecord>> {
    state
        .services
        .circulation
        .get_borrow_record(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
}
