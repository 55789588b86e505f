use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::{CourseId, GradeSubmission, StudentId, TermId};
use super::repository::{AcademicRepository, RepositoryError};
use super::service::{CsvExport, GradeReportService, ReportServiceError};

/// Router builder exposing report, GPA, projection, and grade endpoints.
pub fn academic_router<R>(service: Arc<GradeReportService<R>>) -> Router
where
    R: AcademicRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/students/:student_id/reports/gpa/:term_id",
            get(gpa_report_handler::<R>),
        )
        .route(
            "/api/v1/students/:student_id/reports/gpa/:term_id/csv",
            get(gpa_report_csv_handler::<R>),
        )
        .route(
            "/api/v1/students/:student_id/reports/transcript",
            get(transcript_handler::<R>),
        )
        .route(
            "/api/v1/students/:student_id/reports/transcript/csv",
            get(transcript_csv_handler::<R>),
        )
        .route(
            "/api/v1/students/:student_id/terms/:term_id/gpa",
            get(term_gpa_handler::<R>),
        )
        .route(
            "/api/v1/students/:student_id/terms/:term_id/grades",
            get(term_grades_handler::<R>),
        )
        .route(
            "/api/v1/students/:student_id/courses/:course_id/projection",
            get(projection_handler::<R>),
        )
        .route(
            "/api/v1/students/:student_id/grades",
            post(record_grade_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectionQuery {
    current_grade: f64,
    final_weight: f64,
    target_grade: String,
}

pub(crate) async fn gpa_report_handler<R>(
    State(service): State<Arc<GradeReportService<R>>>,
    Path((student_id, term_id)): Path<(String, u32)>,
) -> Response
where
    R: AcademicRepository + 'static,
{
    match service.gpa_report(&StudentId(student_id), TermId(term_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn gpa_report_csv_handler<R>(
    State(service): State<Arc<GradeReportService<R>>>,
    Path((student_id, term_id)): Path<(String, u32)>,
) -> Response
where
    R: AcademicRepository + 'static,
{
    match service.gpa_report_csv(&StudentId(student_id), TermId(term_id)) {
        Ok(export) => csv_response(export),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn transcript_handler<R>(
    State(service): State<Arc<GradeReportService<R>>>,
    Path(student_id): Path<String>,
) -> Response
where
    R: AcademicRepository + 'static,
{
    match service.transcript_report(&StudentId(student_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn transcript_csv_handler<R>(
    State(service): State<Arc<GradeReportService<R>>>,
    Path(student_id): Path<String>,
) -> Response
where
    R: AcademicRepository + 'static,
{
    match service.transcript_csv(&StudentId(student_id)) {
        Ok(export) => csv_response(export),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn term_gpa_handler<R>(
    State(service): State<Arc<GradeReportService<R>>>,
    Path((student_id, term_id)): Path<(String, u32)>,
) -> Response
where
    R: AcademicRepository + 'static,
{
    match service.term_gpa(&StudentId(student_id), TermId(term_id)) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn term_grades_handler<R>(
    State(service): State<Arc<GradeReportService<R>>>,
    Path((student_id, term_id)): Path<(String, u32)>,
) -> Response
where
    R: AcademicRepository + 'static,
{
    match service.term_grades(&StudentId(student_id), TermId(term_id)) {
        Ok(grades) => (StatusCode::OK, axum::Json(grades)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn projection_handler<R>(
    State(service): State<Arc<GradeReportService<R>>>,
    Path((student_id, course_id)): Path<(String, u32)>,
    Query(query): Query<ProjectionQuery>,
) -> Response
where
    R: AcademicRepository + 'static,
{
    match service.grade_projection(
        &StudentId(student_id),
        CourseId(course_id),
        query.current_grade,
        query.final_weight,
        &query.target_grade,
    ) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn record_grade_handler<R>(
    State(service): State<Arc<GradeReportService<R>>>,
    Path(student_id): Path<String>,
    axum::Json(submission): axum::Json<GradeSubmission>,
) -> Response
where
    R: AcademicRepository + 'static,
{
    match service.record_grade(&StudentId(student_id), submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

fn csv_response(export: CsvExport) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", export.filename);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response()
}

fn error_response(err: ReportServiceError) -> Response {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_rejected_request() {
        StatusCode::BAD_REQUEST
    } else if matches!(err, ReportServiceError::Repository(RepositoryError::Conflict)) {
        StatusCode::CONFLICT
    } else {
        warn!(error = %err, "academic request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
