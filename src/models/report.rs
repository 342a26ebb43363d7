use serde::{Deserialize, Serialize};

/// 여행 상품별 팔로워 수 (리포트 한 줄)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FollowerReportRow {
    pub vacation_id: String,
    pub destination: String,
    pub follower_count: i64,
}
