// routes/auth.rs

use chrono::Utc;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{post, State};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::jwt::jwt_helper::{create_access_token, create_refresh_token, verify_refresh_token, AuthKeys};
use crate::models::user::User;
use crate::repository::user_repository::UserRepository;
use crate::routes::error::ApiError;

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

#[post("/login", format = "json", data = "<credentials>")]
pub fn login(
    credentials: Json<LoginRequest>,
    user_repo: &State<UserRepository>,
    keys: &State<AuthKeys>,
) -> Result<Json<AuthResponse>, ApiError> {
    let stored = user_repo
        .find_by_email(&credentials.email)
        .filter(|stored| stored.password == credentials.password)
        .ok_or_else(|| {
            warn!(email = %credentials.email, "rejected login");
            ApiError::unauthorized("INVALID_CREDENTIALS", "Invalid email or password")
        })?;

    let access_token = create_access_token(keys, &stored.user)
        .map_err(|_| ApiError::internal("Failed to issue access token"))?;
    let (refresh_token, expires_at) = create_refresh_token(keys, &stored.user.id)
        .map_err(|_| ApiError::internal("Failed to issue refresh token"))?;
    user_repo.store_refresh_token(&refresh_token, &stored.user.id, expires_at);

    info!(user = %stored.user.id, salon = %stored.user.salon_id, "login");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: stored.user,
    }))
}

#[post("/refresh", format = "json", data = "<body>")]
pub fn refresh(
    body: Json<RefreshRequest>,
    user_repo: &State<UserRepository>,
    keys: &State<AuthKeys>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let token = &body.refresh_token;

    if verify_refresh_token(keys, token).is_none() {
        return Err(ApiError::unauthorized(
            "INVALID_REFRESH_TOKEN",
            "Invalid or expired refresh token",
        ));
    }

    // The store record is the revocation authority; a signed token that was
    // logged out (or aged out) is no longer acceptable.
    let record = user_repo
        .lookup_refresh_token(token)
        .filter(|record| Utc::now() < record.expires_at)
        .ok_or_else(|| ApiError::unauthorized("TOKEN_EXPIRED", "Refresh token expired"))?;

    let user = user_repo
        .find_by_id(&record.user_id)
        .ok_or_else(|| ApiError::unauthorized("USER_NOT_FOUND", "User not found"))?;

    let access_token = create_access_token(keys, &user)
        .map_err(|_| ApiError::internal("Failed to issue access token"))?;

    Ok(Json(RefreshResponse { access_token }))
}

#[post("/logout", format = "json", data = "<body>")]
pub fn logout(body: Json<LogoutRequest>, user_repo: &State<UserRepository>) -> Status {
    if let Some(token) = &body.refresh_token {
        user_repo.revoke_refresh_token(token);
    }
    Status::NoContent
}
