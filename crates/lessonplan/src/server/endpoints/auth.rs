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

use crate::db::password;
use crate::error::{AppError, Result};
use crate::server::types::{required, LoginRequest, RegisterRequest};
use crate::server::util::parse_body;
use crate::types::AppState;

/// POST /register
pub async fn post_register(State(s): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
    const MISSING: &str = "Username, password, and subject are required";

    let req: Option<RegisterRequest> =
        parse_body(&body).map_err(|_| AppError::Validation(MISSING.into()))?;
    let req = req.ok_or_else(|| AppError::Validation(MISSING.into()))?;

    let (Some(username), Some(plain), Some(subject)) = (
        required(&req.username),
        required(&req.password),
        required(&req.subject),
    ) else {
        return Err(AppError::Validation(MISSING.into()));
    };

    info!("POST /register ({})", username);

    if s.users.find_user(username)?.is_some() {
        warn!("Registration rejected, username {} is taken", username);
        return Err(AppError::Validation("Username already exists".into()));
    }

    let id = s.users.create_user(username, &password::hash(plain)?, subject)?;
    info!("Registered user {} (id {})", username, id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    )
        .into_response())
}

/// POST /login
pub async fn post_login(State(s): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
    const MISSING: &str = "Username and password are required";

    let req: Option<LoginRequest> =
        parse_body(&body).map_err(|_| AppError::Validation(MISSING.into()))?;
    let req = req.ok_or_else(|| AppError::Validation(MISSING.into()))?;

    let (Some(username), Some(plain)) = (required(&req.username), required(&req.password)) else {
        return Err(AppError::Validation(MISSING.into()));
    };

    info!("POST /login ({})", username);

    match s.users.verify_credentials(username, plain)? {
        Some(user) => {
            info!("User {} (id {}) logged in", user.username, user.id);
            Ok((
                StatusCode::OK,
                Json(json!({
                    "message": "Login successful",
                    "user_id": user.id,
                    "subject": user.subject,
                })),
            )
                .into_response())
        }
        None => {
            warn!("Failed login for {}", username);
            Err(AppError::Auth("Invalid username or password".into()))
        }
    }
}
