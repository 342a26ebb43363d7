//! # 여행 상품 데이터베이스 쿼리 모듈
//!
//! `vacations` 테이블의 CRUD와 목록 조회 쿼리입니다.
//!
//! 목록 조회는 조건(upcoming/active/followed)에 따라 WHERE 절이 달라지므로
//! `sqlx::QueryBuilder`로 SQL을 조립합니다. 같은 조건을 목록 쿼리와
//! 전체 개수(COUNT) 쿼리에 똑같이 붙여야 페이지 계산이 맞습니다.
//!
//! 날짜 비교는 `YYYY-MM-DD` 문자열 비교입니다.

use crate::error::AppError;
use crate::models::{Vacation, VacationFilter, VacationInput, VacationWithStats};
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const VACATION_COLUMNS: &str = "v.id, v.destination, v.description, v.start_date, v.end_date, \
     v.price, v.image_key, v.created_at, v.updated_at";

/// 목록/개수 쿼리에 공통 WHERE 조건을 붙입니다.
/// 호출 전에 SQL은 `... WHERE 1 = 1` 상태여야 합니다.
fn push_filters(
    qb: &mut QueryBuilder<'_, Sqlite>,
    user_id: &str,
    filter: &VacationFilter,
    today: NaiveDate,
) {
    let today = today.format("%Y-%m-%d").to_string();

    if filter.upcoming {
        qb.push(" AND v.start_date > ").push_bind(today.clone());
    }
    if filter.active {
        qb.push(" AND v.start_date <= ")
            .push_bind(today.clone())
            .push(" AND v.end_date >= ")
            .push_bind(today);
    }
    if filter.followed_only {
        qb.push(" AND EXISTS (SELECT 1 FROM followers f WHERE f.vacation_id = v.id AND f.user_id = ")
            .push_bind(user_id.to_string())
            .push(")");
    }
}

fn select_with_stats(user_id: &str) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(VACATION_COLUMNS)
        .push(", (SELECT COUNT(*) FROM followers f WHERE f.vacation_id = v.id) AS follower_count")
        .push(", EXISTS (SELECT 1 FROM followers f WHERE f.vacation_id = v.id AND f.user_id = ")
        .push_bind(user_id.to_string())
        .push(") AS is_following FROM vacations v WHERE 1 = 1");
    qb
}

/// 조건에 맞는 한 페이지와 전체 개수를 반환합니다.
///
/// 정렬: 시작일 오름차순, 같은 날이면 ID(UUIDv7, 생성순) 오름차순
pub async fn list_vacations(
    pool: &SqlitePool,
    user_id: &str,
    filter: &VacationFilter,
    today: NaiveDate,
) -> Result<(Vec<VacationWithStats>, i64), AppError> {
    let mut count_qb: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new("SELECT COUNT(*) FROM vacations v WHERE 1 = 1");
    push_filters(&mut count_qb, user_id, filter, today);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = select_with_stats(user_id);
    push_filters(&mut qb, user_id, filter, today);
    qb.push(" ORDER BY v.start_date ASC, v.id ASC LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset());

    let rows = qb
        .build_query_as::<VacationWithStats>()
        .fetch_all(pool)
        .await?;

    Ok((rows, total))
}

pub async fn get_vacation(pool: &SqlitePool, id: &str) -> Result<Option<Vacation>, AppError> {
    let vacation = sqlx::query_as::<_, Vacation>(
        r#"
        SELECT id, destination, description, start_date, end_date, price, image_key,
               created_at, updated_at
        FROM vacations
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(vacation)
}

pub async fn get_vacation_with_stats(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<Option<VacationWithStats>, AppError> {
    let mut qb = select_with_stats(user_id);
    qb.push(" AND v.id = ").push_bind(id.to_string());

    let row = qb
        .build_query_as::<VacationWithStats>()
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn create_vacation(
    pool: &SqlitePool,
    id: &str,
    input: &VacationInput,
    image_key: &str,
) -> Result<Vacation, AppError> {
    sqlx::query(
        r#"
        INSERT INTO vacations (id, destination, description, start_date, end_date, price, image_key)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(&input.destination)
    .bind(&input.description)
    .bind(input.start_date.format("%Y-%m-%d").to_string())
    .bind(input.end_date.format("%Y-%m-%d").to_string())
    .bind(input.price)
    .bind(image_key)
    .execute(pool)
    .await?;

    get_vacation(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created vacation".to_string()))
}

/// 모든 필드를 덮어씁니다. 없는 ID면 None
pub async fn update_vacation(
    pool: &SqlitePool,
    id: &str,
    input: &VacationInput,
    image_key: &str,
) -> Result<Option<Vacation>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE vacations
        SET destination = ?, description = ?, start_date = ?, end_date = ?, price = ?,
            image_key = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(&input.destination)
    .bind(&input.description)
    .bind(input.start_date.format("%Y-%m-%d").to_string())
    .bind(input.end_date.format("%Y-%m-%d").to_string())
    .bind(input.price)
    .bind(image_key)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    get_vacation(pool, id).await
}

/// 팔로우 관계는 외래키 `ON DELETE CASCADE`로 함께 삭제됩니다.
pub async fn delete_vacation(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM vacations WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
