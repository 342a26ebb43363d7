use crate::error::AppError;
use crate::models::FollowerReportRow;
use sqlx::SqlitePool;

/// 모든 여행 상품의 팔로워 수. 팔로워가 없는 상품도 0으로 포함됩니다.
pub async fn follower_report(pool: &SqlitePool) -> Result<Vec<FollowerReportRow>, AppError> {
    let rows = sqlx::query_as::<_, FollowerReportRow>(
        r#"
        SELECT v.id AS vacation_id, v.destination, COUNT(f.user_id) AS follower_count
        FROM vacations v
        LEFT JOIN followers f ON f.vacation_id = v.id
        GROUP BY v.id, v.destination
        ORDER BY follower_count DESC, v.destination ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
