// src/users/handlers.rs
//! Legacy /api/user routes backed by the standalone users table

use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{CreateUserRequest, LegacyUser, UserNameResponse};
use crate::common::{ApiError, AppState};

/// POST /api/user - Create a bare user record
pub async fn create_user_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<LegacyUser>), ApiError> {
    let state = state_lock.read().await.clone();

    let (name, username) = validate_create_user(request)?;

    let result = sqlx::query("INSERT INTO users (name, username) VALUES (?, ?)")
        .bind(&name)
        .bind(&username)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let user = sqlx::query_as::<_, LegacyUser>("SELECT * FROM users WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = user.id, "Legacy user created");

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/user - Return the first user's name
pub async fn first_user_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<UserNameResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let row: Option<(String,)> = sqlx::query_as("SELECT name FROM users ORDER BY id LIMIT 1")
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    match row {
        Some((name,)) => Ok(Json(UserNameResponse { name })),
        None => Err(ApiError::NotFound("No user found".to_string())),
    }
}

pub(crate) fn validate_create_user(
    request: CreateUserRequest,
) -> Result<(String, String), ApiError> {
    match (request.name, request.username) {
        (Some(name), Some(username))
            if !name.trim().is_empty() && !username.trim().is_empty() =>
        {
            Ok((name, username))
        }
        _ => Err(ApiError::BadRequest(
            "Name and username are required".to_string(),
        )),
    }
}
