//! End-to-end tests driving the router with in-memory storage.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use lessonplan::config::{Config, ServerConfig};
use lessonplan::db::UserDbManager;
use lessonplan::server::create_router;
use lessonplan::store::{Collection, DocumentStore, JsonFileStore, MemoryStore};
use lessonplan::timetable::CollisionPolicy;
use lessonplan::types::AppState;

// ── Helpers ─────────────────────────────────────────────────────────────────

fn app_with(store: Arc<dyn DocumentStore>, config: &Config) -> Router {
    let users = UserDbManager::open_in_memory().unwrap();
    let state = Arc::new(AppState::new(store, users, config));
    create_router(state, &ServerConfig::default())
}

fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (app_with(store.clone(), &Config::default()), store)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

fn entry(date: &str, kind: &str) -> Value {
    json!({ "date": date, "type": kind, "details": format!("topic for {date}") })
}

// ── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_then_login() {
    let (app, _) = app();

    let (status, body) = post(
        &app,
        "/register",
        json!({"username": "ada", "password": "hunter2", "subject": "Maths"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");

    let (status, body) = post(&app, "/login", json!({"username": "ada", "password": "hunter2"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["subject"], "Maths");
    assert!(body["user_id"].is_i64());
    assert!(!body.to_string().contains("hunter2"));
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let (app, _) = app();
    let user = json!({"username": "ada", "password": "a", "subject": "Maths"});

    post(&app, "/register", user.clone()).await;
    let (status, body) = post(&app, "/register", user).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Username already exists"}));
}

#[tokio::test]
async fn registration_requires_all_fields() {
    let (app, _) = app();

    let (status, body) = post(&app, "/register", json!({"username": "ada", "password": "a"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username, password, and subject are required");
}

#[tokio::test]
async fn bad_credentials() {
    let (app, _) = app();
    post(
        &app,
        "/register",
        json!({"username": "ada", "password": "right", "subject": "Maths"}),
    )
    .await;

    let (status, body) = post(&app, "/login", json!({"username": "ada", "password": "wrong"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password");

    let (status, _) = post(&app, "/login", json!({"username": "nobody", "password": "right"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = post(&app, "/login", json!({"username": "ada"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username and password are required");
}

// ── Collections ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn syllabus_is_replaced() {
    let (app, _) = app();

    post(&app, "/save-syllabus", json!([{"unit": 1}, {"unit": 2}])).await;
    let (status, body) = post(&app, "/save-syllabus", json!([{"unit": 3}])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Syllabus saved successfully!");

    let (_, body) = get(&app, "/get-syllabus").await;
    assert_eq!(body, json!([{"unit": 3}]));
}

#[tokio::test]
async fn details_are_appended() {
    let (app, _) = app();

    post(&app, "/save-chapter-details", json!({"chapterName": "Sets", "subtopics": ["A"]})).await;
    let (status, body) =
        post(&app, "/save-chapter-details", json!({"chapterName": "Maps", "subtopics": ["B"]})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Chapter details saved successfully!");

    let (_, body) = get(&app, "/get-chapter-details").await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[1]["chapterName"], "Maps");
}

#[tokio::test]
async fn empty_saves_are_rejected() {
    let (app, _) = app();

    let (status, body) = post(&app, "/save-semester-details", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No data provided");

    let (status, body) = post(&app, "/save-timetable", json!({"timetable": []})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No timetable data received");

    let (status, _) = send(&app, "POST", "/save-syllabus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn combined_details_include_every_collection() {
    let (app, store) = app();
    store.save(Collection::Syllabus, &[json!({"unit": 1})]).unwrap();
    store
        .save(Collection::LessonTimetable, &[entry("2024-01-01", "lecture")])
        .unwrap();

    let (status, body) = get(&app, "/get-combined-details").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["syllabus"], json!([{"unit": 1}]));
    assert_eq!(body["timetable"][0]["date"], "2024-01-01");
    assert_eq!(body["semester_details"], json!([]));
    assert_eq!(body["chapter_details"], json!([]));
    assert_eq!(body["semester_timetable"], json!([]));
}

// ── Rescheduling ────────────────────────────────────────────────────────────

#[tokio::test]
async fn reschedule_into_holiday() {
    let (app, store) = app();
    post(
        &app,
        "/save-timetable",
        json!({"timetable": [entry("2024-01-01", "lecture"), entry("2024-01-02", "holiday")]}),
    )
    .await;

    let (status, body) = post(
        &app,
        "/reschedule-topic",
        json!({"topic": "topic for 2024-01-01", "currentDate": "2024-01-01"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Topic rescheduled successfully");
    let moved = &body["updatedTimetable"][1];
    assert_eq!(moved["type"], "lecture");
    assert_eq!(moved["details"], "topic for 2024-01-01");
    assert_eq!(moved["status"], "Rescheduled from 2024-01-01 (Originally holiday)");

    // The response echoes what was persisted
    let saved = Value::Array(store.load(Collection::LessonTimetable).unwrap());
    assert_eq!(saved, body["updatedTimetable"]);
}

#[tokio::test]
async fn reschedule_extra_lecture() {
    let (app, store) = app();
    store
        .save(
            Collection::LessonTimetable,
            &[
                entry("2024-01-01", "lecture"),
                entry("2024-01-02", "lecture"),
                entry("2024-01-03", "lecture"),
            ],
        )
        .unwrap();

    let (status, body) = post(
        &app,
        "/reschedule-topic",
        json!({"topic": {"chapter": "Sets"}, "currentDate": "2024-01-01"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let tt = body["updatedTimetable"].as_array().unwrap();
    assert_eq!(tt.len(), 3);
    assert_eq!(tt[0]["status"], "Rescheduled");
    assert_eq!(tt[1]["status"], "Rescheduled from 2024-01-01 (Extra Lecture)");
    assert_eq!(tt[1]["details"], "topic for 2024-01-01");
}

#[tokio::test]
async fn reschedule_extra_lecture_keeping_existing_entry() {
    let store = Arc::new(MemoryStore::new());
    let mut config = Config::default();
    config.reschedule.collision_policy = CollisionPolicy::Keep;
    let app = app_with(store.clone(), &config);
    store
        .save(
            Collection::LessonTimetable,
            &[entry("2024-01-01", "lecture"), entry("2024-01-02", "lecture")],
        )
        .unwrap();

    let (status, body) = post(
        &app,
        "/reschedule-topic",
        json!({"topic": "x", "currentDate": "2024-01-01"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let tt = body["updatedTimetable"].as_array().unwrap();
    assert_eq!(tt.len(), 3);
    assert_eq!(tt[1]["details"], "topic for 2024-01-02");
    assert_eq!(tt[2]["status"], "Rescheduled from 2024-01-01 (Extra Lecture)");
}

#[tokio::test]
async fn reschedule_missing_entry_leaves_timetable_alone() {
    let (app, store) = app();
    let original = vec![entry("2024-01-01", "lecture"), entry("2024-01-02", "holiday")];
    store.save(Collection::LessonTimetable, &original).unwrap();

    let (status, body) = post(
        &app,
        "/reschedule-topic",
        json!({"topic": "x", "currentDate": "2024-03-01"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Current entry not found"}));
    assert_eq!(store.load(Collection::LessonTimetable).unwrap(), original);
}

#[tokio::test]
async fn reschedule_without_slots() {
    let (app, store) = app();
    let original = vec![
        entry("2024-01-01", "lecture"),
        entry("2024-01-02", "lecture"),
        entry("2024-01-02", "lecture"),
    ];
    store.save(Collection::LessonTimetable, &original).unwrap();

    let (status, body) = post(
        &app,
        "/reschedule-topic",
        json!({"topic": "x", "currentDate": "2024-01-01"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No available slots found in the semester");
    assert_eq!(store.load(Collection::LessonTimetable).unwrap(), original);
}

#[tokio::test]
async fn reschedule_requires_topic_and_date() {
    let (app, _) = app();

    let (status, body) = post(&app, "/reschedule-topic", json!({"currentDate": "2024-01-01"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request data");

    let (status, _) = post(&app, "/reschedule-topic", json!({"topic": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reschedule_accepts_null_topic() {
    let (app, store) = app();
    let bare = json!({"date": "2024-01-03", "type": "lecture"});
    store
        .save(
            Collection::LessonTimetable,
            &[entry("2024-01-01", "lecture"), entry("2024-01-02", "holiday"), bare.clone()],
        )
        .unwrap();

    let (status, body) = post(
        &app,
        "/reschedule-topic",
        json!({"topic": null, "currentDate": "2024-01-01"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updatedTimetable"][1]["details"], "topic for 2024-01-01");
    // Entries stored without details are saved back without them
    let saved = store.load(Collection::LessonTimetable).unwrap();
    assert_eq!(saved[2], bare);
}

#[tokio::test]
async fn malformed_stored_timetable_is_a_server_error() {
    let (app, store) = app();
    store
        .save(Collection::LessonTimetable, &[json!({"details": "no date"})])
        .unwrap();

    let (status, body) = post(
        &app,
        "/reschedule-topic",
        json!({"topic": "x", "currentDate": "2024-01-01"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Malformed lesson timetable"));
}

// ── Generation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn generate_from_saved_details() {
    let (app, _) = app();
    post(
        &app,
        "/save-semester-details",
        json!({
            "semesterStartDate": "2024-01-01",
            "semesterEndDate": "2024-01-03",
            "teachingDays": {"mon": true, "wed": true},
            "holidays": []
        }),
    )
    .await;
    post(
        &app,
        "/save-chapter-details",
        json!({"chapterName": "Sets", "subtopics": ["Unions"]}),
    )
    .await;

    let (status, body) = post(&app, "/generate-timetable", json!(null)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["timetable"],
        json!([
            {"date": "2024-01-01", "type": "lecture", "details": "Sets: Unions"},
            {"date": "2024-01-02", "type": "non-teaching", "details": "No classes"},
            {"date": "2024-01-03", "type": "vacant", "details": "No topics scheduled"}
        ])
    );

    let (_, saved) = get(&app, "/get-timetable").await;
    assert_eq!(saved, body["timetable"]);
}

#[tokio::test]
async fn generate_without_details() {
    let (app, _) = app();

    let (status, body) = post(&app, "/generate-timetable", json!(null)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No semester details found");
}

// ── File-backed store ───────────────────────────────────────────────────────

#[tokio::test]
async fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()).unwrap());
    let app = app_with(store, &Config::default());

    post(
        &app,
        "/save-timetable",
        json!({"timetable": [entry("2024-01-01", "lecture"), entry("2024-01-05", "vacant")]}),
    )
    .await;
    let (status, _) = post(
        &app,
        "/reschedule-topic",
        json!({"topic": "x", "currentDate": "2024-01-01"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let raw = std::fs::read_to_string(dir.path().join("lesson_timetable.json")).unwrap();
    let saved: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(saved[1]["status"], "Rescheduled from 2024-01-01 (Originally vacant)");
}

#[tokio::test]
async fn health() {
    let (app, _) = app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
