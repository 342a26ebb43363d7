//! # 팔로워 리포트 핸들러 (관리자 전용)
//!
//! - `GET /api/v1/reports`     → JSON 배열
//! - `GET /api/v1/reports/csv` → CSV 파일 다운로드

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    Json,
};

use crate::{
    db,
    error::AppError,
    middleware::AdminUser,
    models::FollowerReportRow,
    routes::vacations::AppState,
    services::{render_csv, CSV_FILE_NAME},
};

pub async fn follower_report(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<FollowerReportRow>>, AppError> {
    let rows = db::reports::follower_report(&state.pool).await?;
    Ok(Json(rows))
}

pub async fn follower_report_csv(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let rows = db::reports::follower_report(&state.pool).await?;
    let body = render_csv(&rows)?;

    let headers = [
        (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
        ),
    ];
    Ok((headers, body))
}
