//! # 여행 상품 조회/팔로우 핸들러
//!
//! ## 엔드포인트 (모두 로그인 필요)
//! - `GET    /api/v1/vacations`             → 페이지 단위 목록 (필터: followed, upcoming, active)
//! - `GET    /api/v1/vacations/{id}`        → 상세
//! - `POST   /api/v1/vacations/{id}/follow` → 팔로우
//! - `DELETE /api/v1/vacations/{id}/follow` → 팔로우 해제

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::{
    db,
    error::AppError,
    middleware::{
        auth::{AuthUser, JwtSettings},
        QueryParams,
    },
    models::{ListVacationsQuery, Pagination, VacationPage, VacationResponse},
    services::storage::ImageStorage,
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// `SqlitePool`과 `Arc`는 clone해도 같은 대상을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀
    pub pool: SqlitePool,
    /// JWT 서명 키와 토큰 유효 기간
    pub jwt: JwtSettings,
    /// 이미지 저장소 (S3 또는 로컬 디스크)
    pub images: Arc<ImageStorage>,
    /// 업로드 이미지 최대 크기(바이트)
    pub max_upload_bytes: usize,
}

/// 경로의 ID가 UUID 형식인지 확인하고 정규화된 문자열을 돌려줍니다.
pub(crate) fn parse_vacation_id(raw: &str) -> Result<String, AppError> {
    uuid::Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| AppError::BadRequest("Invalid vacation ID format".to_string()))
}

/// `GET /vacations`: 조건에 맞는 여행 상품 한 페이지를 조회합니다.
///
/// 각 항목에는 팔로워 수와 현재 사용자의 팔로우 여부가 포함됩니다.
pub async fn list_vacations(
    State(state): State<AppState>,
    auth_user: AuthUser,
    QueryParams(query): QueryParams<ListVacationsQuery>,
) -> Result<Json<VacationPage>, AppError> {
    let filter = query.normalize();
    let today = Utc::now().date_naive();

    let (rows, total) =
        db::list_vacations(&state.pool, &auth_user.user_id, &filter, today).await?;

    let data = rows
        .into_iter()
        .map(|row| {
            let url = state.images.public_url(&row.vacation.image_key);
            VacationResponse::with_stats(row, url)
        })
        .collect();

    Ok(Json(VacationPage {
        data,
        pagination: Pagination::new(total, filter.page, filter.limit),
    }))
}

pub async fn get_vacation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<VacationResponse>, AppError> {
    let id = parse_vacation_id(&id)?;
    let row = db::get_vacation_with_stats(&state.pool, &id, &auth_user.user_id)
        .await?
        .ok_or_else(AppError::vacation_not_found)?;

    let url = state.images.public_url(&row.vacation.image_key);
    Ok(Json(VacationResponse::with_stats(row, url)))
}

/// `POST /vacations/{id}/follow`
///
/// 이미 팔로우 중이면 409를 반환합니다.
pub async fn follow_vacation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let id = parse_vacation_id(&id)?;
    if db::get_vacation(&state.pool, &id).await?.is_none() {
        return Err(AppError::vacation_not_found());
    }

    if !db::follow(&state.pool, &auth_user.user_id, &id).await? {
        return Err(AppError::Conflict(
            "You are already following this vacation".to_string(),
        ));
    }

    let follower_count = db::count_followers(&state.pool, &id).await?;
    tracing::debug!("User {} followed vacation {}", auth_user.user_id, id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Vacation followed successfully",
            "followerCount": follower_count
        })),
    ))
}

/// `DELETE /vacations/{id}/follow`
pub async fn unfollow_vacation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_vacation_id(&id)?;
    if db::get_vacation(&state.pool, &id).await?.is_none() {
        return Err(AppError::vacation_not_found());
    }

    if !db::unfollow(&state.pool, &auth_user.user_id, &id).await? {
        return Err(AppError::NotFound(
            "You are not following this vacation".to_string(),
        ));
    }

    let follower_count = db::count_followers(&state.pool, &id).await?;
    tracing::debug!("User {} unfollowed vacation {}", auth_user.user_id, id);

    Ok(Json(json!({
        "message": "Vacation unfollowed successfully",
        "followerCount": follower_count
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacation_id_must_be_a_uuid() {
        assert!(parse_vacation_id("not-a-uuid").is_err());

        let id = parse_vacation_id("0192D4E2-7B3A-7C3D-9E1F-0A1B2C3D4E5F").unwrap();
        assert_eq!(id, "0192d4e2-7b3a-7c3d-9e1f-0a1b2c3d4e5f");
    }
}
