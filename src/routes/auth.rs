//! # 인증 핸들러
//!
//! - `POST /auth/register`, `POST /auth/login`: 토큰 쌍 발급
//! - `POST /auth/refresh`: refresh 토큰 교체(rotation). 쓴 토큰은 즉시 폐기됩니다.
//! - `POST /auth/logout`: 사용자의 모든 refresh 토큰 폐기
//! - `GET  /auth/me`: 내 정보
//!
//! refresh 토큰은 원문이 아니라 SHA-256 해시만 DB에 저장합니다.

use crate::{
    db::users as db_users,
    error::AppError,
    middleware::{
        auth::{create_token, hash_token, verify_token, AuthUser, TokenKind},
        ValidatedJson,
    },
    models::user::*,
    routes::vacations::AppState,
    services::{hash_password, verify_password},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};

const EXPIRES_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

fn token_error(e: jsonwebtoken::errors::Error) -> AppError {
    AppError::Internal(format!("Token generation failed: {}", e))
}

/// access/refresh 토큰 쌍을 만들고 refresh 토큰 해시를 저장합니다.
async fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let access_token =
        create_token(&user.id, user.role, TokenKind::Access, &state.jwt).map_err(token_error)?;
    let refresh_token =
        create_token(&user.id, user.role, TokenKind::Refresh, &state.jwt).map_err(token_error)?;

    let token_id = uuid::Uuid::now_v7().to_string();
    let expires_at = (Utc::now() + state.jwt.refresh_ttl)
        .format(EXPIRES_AT_FORMAT)
        .to_string();

    db_users::store_refresh_token(
        &state.pool,
        &token_id,
        &user.id,
        &hash_token(&refresh_token),
        &expires_at,
    )
    .await?;

    Ok(AuthResponse {
        user: user.into(),
        access_token,
        refresh_token,
    })
}

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let email = req.email.trim();

    if db_users::find_by_email(&state.pool, email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&req.password)?;

    // 가입 경로로는 항상 일반 사용자만 만들어집니다.
    let user_id = uuid::Uuid::now_v7().to_string();
    let user = db_users::create_user(
        &state.pool,
        &user_id,
        req.first_name.trim(),
        req.last_name.trim(),
        email,
        &password_hash,
        Role::User,
    )
    .await?;

    tracing::info!("Registered user {}", user.id);
    let response = issue_tokens(&state, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = db_users::find_by_email(&state.pool, req.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    Ok(Json(issue_tokens(&state, user).await?))
}

pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let claims = verify_token(&req.refresh_token, TokenKind::Refresh, &state.jwt.secret)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    let token_hash = hash_token(&req.refresh_token);
    let (user_id, expires_at) = db_users::find_refresh_token(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::Unauthorized("Refresh token not found or revoked".to_string()))?;

    // 사용 여부와 관계없이 제시된 토큰은 폐기합니다.
    db_users::delete_refresh_token(&state.pool, &token_hash).await?;

    let expires = chrono::NaiveDateTime::parse_from_str(&expires_at, EXPIRES_AT_FORMAT)
        .map_err(|e| AppError::Internal(format!("Date parse error: {}", e)))?;
    if expires.and_utc() < Utc::now() {
        return Err(AppError::Unauthorized("Refresh token expired".to_string()));
    }
    if claims.sub != user_id {
        return Err(AppError::Unauthorized("Invalid refresh token".to_string()));
    }

    let user = db_users::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found".to_string()))?;

    Ok(Json(issue_tokens(&state, user).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    db_users::delete_user_refresh_tokens(&state.pool, &auth_user.user_id).await?;

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}
