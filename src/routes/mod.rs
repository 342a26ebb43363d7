//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `admin`: 관리자 여행 상품 생성/수정/삭제 (multipart)
//! - `auth`: 인증 관련 (회원가입, 로그인, 토큰 갱신, 로그아웃)
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `reports`: 팔로워 리포트 (JSON, CSV)
//! - `vacations`: 목록/상세 조회, 팔로우, 공유 상태(`AppState`)

pub mod admin;
pub mod auth;
pub mod health;
pub mod reports;
pub mod vacations;


pub use vacations::AppState;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

/// multipart 경계/헤더와 텍스트 필드를 위한 여유분
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// `/api/v1` 아래에 붙는 API 라우터를 만듭니다.
pub fn api_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes + FORM_OVERHEAD_BYTES;

    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    let admin_routes = Router::new()
        .route("/admin/vacations", post(admin::create_vacation))
        .route(
            "/admin/vacations/{id}",
            put(admin::update_vacation).delete(admin::delete_vacation),
        )
        .route("/reports", get(reports::follower_report))
        .route("/reports/csv", get(reports::follower_report_csv));

    Router::new()
        .merge(auth_routes)
        .merge(admin_routes)
        .route("/vacations", get(vacations::list_vacations))
        .route("/vacations/{id}", get(vacations::get_vacation))
        .route(
            "/vacations/{id}/follow",
            post(vacations::follow_vacation).delete(vacations::unfollow_vacation),
        )
        .route("/health", get(health::health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
