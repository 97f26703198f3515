//! Plain load/save endpoints for the JSON collections.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, Result};
use crate::server::types::SaveTimetableRequest;
use crate::server::util::{into_records, is_empty_payload, parse_body};
use crate::store::Collection;
use crate::types::AppState;

fn load(s: &AppState, collection: Collection) -> Result<Response> {
    let records = s.store.load(collection)?;
    Ok((StatusCode::OK, Json(records)).into_response())
}

/// Reads a non-empty JSON payload from the request body.
fn payload(body: &Bytes) -> Result<Value> {
    let value: Value =
        parse_body(body).map_err(|e| AppError::Validation(format!("Invalid JSON: {}", e)))?;
    if is_empty_payload(&value) {
        return Err(AppError::Validation("No data provided".into()));
    }
    Ok(value)
}

fn saved(message: &str) -> Response {
    (StatusCode::OK, Json(json!({ "message": message }))).into_response()
}

async fn replace(s: &AppState, collection: Collection, body: &Bytes, message: &str) -> Result<Response> {
    let records = into_records(payload(body)?);

    let _guard = s.locks.acquire(collection).await;
    s.store.save(collection, &records)?;
    info!("Replaced {} with {} records", collection, records.len());

    Ok(saved(message))
}

async fn append(s: &AppState, collection: Collection, body: &Bytes, message: &str) -> Result<Response> {
    let record = payload(body)?;

    let _guard = s.locks.acquire(collection).await;
    s.store.append(collection, record)?;
    info!("Appended a record to {}", collection);

    Ok(saved(message))
}

/// GET /get-syllabus
pub async fn get_syllabus(State(s): State<Arc<AppState>>) -> Result<Response> {
    info!("GET /get-syllabus");
    load(&s, Collection::Syllabus)
}

/// POST /save-syllabus
pub async fn post_save_syllabus(State(s): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
    info!("POST /save-syllabus");
    replace(&s, Collection::Syllabus, &body, "Syllabus saved successfully!").await
}

/// GET /get-semester
///
/// Returns the semester timetable.
pub async fn get_semester(State(s): State<Arc<AppState>>) -> Result<Response> {
    info!("GET /get-semester");
    load(&s, Collection::SemesterTimetable)
}

/// POST /save-semester
pub async fn post_save_semester(State(s): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
    info!("POST /save-semester");
    replace(
        &s,
        Collection::SemesterTimetable,
        &body,
        "Semester details saved successfully!",
    )
    .await
}

/// GET /get-semester-details
pub async fn get_semester_details(State(s): State<Arc<AppState>>) -> Result<Response> {
    info!("GET /get-semester-details");
    load(&s, Collection::SemesterDetails)
}

/// POST /save-semester-details
pub async fn post_save_semester_details(
    State(s): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response> {
    info!("POST /save-semester-details");
    append(
        &s,
        Collection::SemesterDetails,
        &body,
        "Semester details saved successfully!",
    )
    .await
}

/// GET /get-chapter-details
pub async fn get_chapter_details(State(s): State<Arc<AppState>>) -> Result<Response> {
    info!("GET /get-chapter-details");
    load(&s, Collection::ChapterDetails)
}

/// POST /save-chapter-details
pub async fn post_save_chapter_details(
    State(s): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response> {
    info!("POST /save-chapter-details");
    append(
        &s,
        Collection::ChapterDetails,
        &body,
        "Chapter details saved successfully!",
    )
    .await
}

/// GET /get-timetable
pub async fn get_timetable(State(s): State<Arc<AppState>>) -> Result<Response> {
    info!("GET /get-timetable");
    load(&s, Collection::LessonTimetable)
}

/// POST /save-timetable
///
/// Body: `{"timetable": [...]}`. Replaces the lesson timetable.
pub async fn post_save_timetable(State(s): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
    const MISSING: &str = "No timetable data received";
    info!("POST /save-timetable");

    let req: Option<SaveTimetableRequest> =
        parse_body(&body).map_err(|e| AppError::Validation(format!("Invalid JSON: {}", e)))?;
    let timetable = req.map(|r| r.timetable).unwrap_or_default();
    if timetable.is_empty() {
        return Err(AppError::Validation(MISSING.into()));
    }

    let _guard = s.locks.acquire(Collection::LessonTimetable).await;
    s.store.save(Collection::LessonTimetable, &timetable)?;
    info!("Saved lesson timetable with {} entries", timetable.len());

    Ok(saved("Timetable saved successfully"))
}

/// GET /get-combined-details
///
/// Returns every collection in one object.
pub async fn get_combined_details(State(s): State<Arc<AppState>>) -> Result<Response> {
    info!("GET /get-combined-details");

    let combined = json!({
        "semester_details": s.store.load(Collection::SemesterDetails)?,
        "chapter_details": s.store.load(Collection::ChapterDetails)?,
        "timetable": s.store.load(Collection::LessonTimetable)?,
        "syllabus": s.store.load(Collection::Syllabus)?,
        "semester_timetable": s.store.load(Collection::SemesterTimetable)?,
    });

    Ok((StatusCode::OK, Json(combined)).into_response())
}
