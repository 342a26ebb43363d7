//! # 팔로우 관계 쿼리
//!
//! `followers` 테이블은 (user_id, vacation_id) 복합 기본키를 가지므로
//! 같은 관계가 두 번 저장될 수 없습니다.

use crate::error::AppError;
use sqlx::SqlitePool;

/// 새로 팔로우했으면 true, 이미 팔로우 중이면 false
pub async fn follow(
    pool: &SqlitePool,
    user_id: &str,
    vacation_id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO followers (user_id, vacation_id) VALUES (?, ?)",
    )
    .bind(user_id)
    .bind(vacation_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 팔로우를 해제했으면 true, 원래 팔로우하지 않았으면 false
pub async fn unfollow(
    pool: &SqlitePool,
    user_id: &str,
    vacation_id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM followers WHERE user_id = ? AND vacation_id = ?")
        .bind(user_id)
        .bind(vacation_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_followers(pool: &SqlitePool, vacation_id: &str) -> Result<i64, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM followers WHERE vacation_id = ?")
        .bind(vacation_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
