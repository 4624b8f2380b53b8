//! Course catalogue and enrollment handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use campus_auth::{AdminUser, CurrentUser};
use campus_core::school::{validate_course, AddCourseRequest, Course, Enrollment, EnrollmentRequest};
use campus_core::storage::RepositoryError;

use crate::handlers::AppError;
use crate::state::AppState;

/// List all courses (GET /course/info).
#[axum::debug_handler]
pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.courses.list_courses().await?;
    Ok(Json(courses))
}

/// Get a single course by ID (GET /course/{id}).
#[axum::debug_handler]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let course = state
        .courses
        .get_course(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Course", id))?;

    Ok(Json(course))
}

/// Create a course (POST /course/add/course). Admins only.
#[axum::debug_handler]
pub async fn add_course(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<AddCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    validate_course(&req)?;

    let course = state.courses.create_course(&req.into_new_course()).await?;
    tracing::info!(course_id = course.id, admin_id = admin.id, name = %course.name, "Created course");

    Ok((StatusCode::CREATED, Json(course)))
}

/// List the current user's enrollments (GET /course/enrollment).
#[axum::debug_handler]
pub async fn list_enrollments(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    let enrollments = state.enrollments.list_enrollments(user.id).await?;
    Ok(Json(enrollments))
}

/// Enroll the current user in a course (POST /course/pick).
#[axum::debug_handler]
pub async fn pick_course(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<EnrollmentRequest>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = state.enrollments.pick_course(user.id, req.course_id).await?;
    tracing::info!(student_id = user.id, course_id = req.course_id, "Picked course");

    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// Remove the current user from a course (POST /course/drop).
#[axum::debug_handler]
pub async fn drop_course(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<EnrollmentRequest>,
) -> Result<StatusCode, AppError> {
    state.enrollments.drop_course(user.id, req.course_id).await?;
    tracing::info!(student_id = user.id, course_id = req.course_id, "Dropped course");

    Ok(StatusCode::NO_CONTENT)
}
