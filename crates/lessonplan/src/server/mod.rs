use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;
use crate::server::endpoints::{auth, documents, status, timetable};
use crate::types::AppState;

mod endpoints;
mod types;
mod util;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
/// - `config`: Server settings (CORS origin).
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>, config: &ServerConfig) -> Router {
    let auth_router = Router::new()
        .route("/register", post(auth::post_register))
        .route("/login", post(auth::post_login));

    let document_router = Router::new()
        .route("/get-syllabus", get(documents::get_syllabus))
        .route("/save-syllabus", post(documents::post_save_syllabus))
        .route("/get-semester", get(documents::get_semester))
        .route("/save-semester", post(documents::post_save_semester))
        .route(
            "/get-semester-details",
            get(documents::get_semester_details),
        )
        .route(
            "/save-semester-details",
            post(documents::post_save_semester_details),
        )
        .route("/get-chapter-details", get(documents::get_chapter_details))
        .route(
            "/save-chapter-details",
            post(documents::post_save_chapter_details),
        )
        .route("/get-timetable", get(documents::get_timetable))
        .route("/save-timetable", post(documents::post_save_timetable))
        .route(
            "/get-combined-details",
            get(documents::get_combined_details),
        );

    let timetable_router = Router::new()
        .route("/reschedule-topic", post(timetable::post_reschedule_topic))
        .route(
            "/generate-timetable",
            post(timetable::post_generate_timetable),
        );

    Router::new()
        .route("/health", get(status::get_health))
        .merge(auth_router)
        .merge(document_router)
        .merge(timetable_router)
        .with_state(app_state)
        .layer(cors_layer(&config.cors_origin))
        .layer(TraceLayer::new_for_http())
}

/// Allows the browser frontend at `origin` to call the API with credentials.
fn cors_layer(origin: &str) -> CorsLayer {
    match origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(true),
        Err(_) => {
            warn!("Invalid CORS origin {:?}, cross-origin requests disabled", origin);
            CorsLayer::new()
        }
    }
}
