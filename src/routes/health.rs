//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /api/v1/health` → `{ "status": "ok", "imageStorage": "s3" | "local" }`
//!
//! 로드밸런서나 컨테이너 헬스체크에서 사용합니다.
//! 이미지 저장소가 로컬 디스크로 전환되었는지도 함께 알려줍니다.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::routes::vacations::AppState;

/// `GET /health`: 실패하지 않는 핸들러입니다.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let image_storage = if state.images.is_local() { "local" } else { "s3" };

    Json(json!({
        "status": "ok",
        "imageStorage": image_storage
    }))
}
