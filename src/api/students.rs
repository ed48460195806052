//! Student registry endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::student::{CreateStudent, Student},
    AppState,
};

use super::{JsonBody, StaffToken};

/// List all students ordered by name
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    responses(
        (status = 200, description = "List of students", body = Vec<Student>)
    )
)]
pub async fn list_students(State(state): State<AppState>) -> AppResult<Json<Vec<Student>>> {
    let students = state.services.students.list_students().await?;
    Ok(Json(students))
}

/// Register a student
#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    security(("bearer_auth" = [])),
    request_body = CreateStudent,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
pub async fn create_student(
    State(state): State<AppState>,
    _staff: StaffToken,
    JsonBody(data): JsonBody<CreateStudent>,
) -> AppResult<(StatusCode, Json<Student>)> {
    let student = state.services.students.add_student(data).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// Get student by ID
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found", body = ErrorResponse)
    )
)]
pub async fn get_student(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Student>> {
    state
        .services
        .students
        .get_student(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))
}
