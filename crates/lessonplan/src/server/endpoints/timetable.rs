use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::server::types::{required, RescheduleRequest};
use crate::server::util::{load_entries, parse_body, save_entries};
use crate::store::Collection;
use crate::timetable::{self, ChapterDetails, SemesterDetails};
use crate::types::AppState;

/// POST /reschedule-topic
///
/// Body: `{"topic": ..., "currentDate": "YYYY-MM-DD"}`. Moves the lecture on
/// `currentDate` to the next available slot and returns the whole updated
/// timetable.
pub async fn post_reschedule_topic(
    State(s): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response> {
    let invalid = || AppError::Validation("Invalid request data".into());

    let req: Option<RescheduleRequest> = parse_body(&body).map_err(|_| invalid())?;
    let req = req.ok_or_else(invalid)?;
    let (Some(topic), Some(current_date)) = (req.topic.as_ref(), required(&req.current_date)) else {
        return Err(invalid());
    };

    info!("POST /reschedule-topic (currentDate={}, topic={})", current_date, topic);

    let _guard = s.locks.acquire(Collection::LessonTimetable).await;
    let entries = load_entries(s.store.as_ref())?;

    let outcome = s.rescheduler.reschedule(&entries, current_date).map_err(|e| {
        warn!("Could not reschedule {}: {}", current_date, e);
        AppError::from(e)
    })?;

    for dropped in &outcome.dropped {
        warn!(
            "Dropped entry on {} ({}) to make room for an extra lecture",
            dropped.date, dropped.kind
        );
    }

    save_entries(s.store.as_ref(), &outcome.timetable)?;
    info!(
        "Rescheduled {} to {} ({:?})",
        current_date, outcome.target_date, outcome.tier
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Topic rescheduled successfully",
            "updatedTimetable": outcome.timetable,
        })),
    )
        .into_response())
}

/// POST /generate-timetable
///
/// Builds the lesson timetable from the latest semester details and all
/// chapter details, saves it and returns it.
pub async fn post_generate_timetable(State(s): State<Arc<AppState>>) -> Result<Response> {
    info!("POST /generate-timetable");

    let semester: SemesterDetails = s
        .store
        .load(Collection::SemesterDetails)?
        .pop()
        .ok_or_else(|| AppError::Validation("No semester details found".into()))
        .and_then(|v| {
            serde_json::from_value(v)
                .map_err(|e| AppError::Validation(format!("Invalid semester details: {}", e)))
        })?;

    let chapters = s
        .store
        .load(Collection::ChapterDetails)?
        .into_iter()
        .map(serde_json::from_value)
        .collect::<std::result::Result<Vec<ChapterDetails>, _>>()
        .map_err(|e| AppError::Validation(format!("Invalid chapter details: {}", e)))?;
    if chapters.is_empty() {
        return Err(AppError::Validation("No chapter details found".into()));
    }

    let generated = timetable::generate(&semester, &chapters)?;

    let _guard = s.locks.acquire(Collection::LessonTimetable).await;
    save_entries(s.store.as_ref(), &generated)?;
    info!("Generated lesson timetable with {} entries", generated.len());

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Timetable generated successfully",
            "timetable": generated,
        })),
    )
        .into_response())
}
