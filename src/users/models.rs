// src/users/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Legacy user record, disjoint from profiles
#[derive(FromRow, Serialize, Deserialize, Debug)]
pub struct LegacyUser {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub created_at: Option<String>,
}

/// Body of POST /api/user
#[derive(Deserialize, Debug)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub username: Option<String>,
}

/// Body of GET /api/user
#[derive(Serialize, Debug)]
pub struct UserNameResponse {
    pub name: String,
}
