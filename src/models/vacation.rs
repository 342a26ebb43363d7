//! # 여행 상품(Vacation) 모델 정의
//!
//! - `Vacation`: DB의 `vacations` 테이블 한 행
//! - `VacationWithStats`: 목록/상세 조회용 행 (팔로워 수, 현재 사용자의 팔로우 여부 포함)
//! - `VacationResponse`: 클라이언트에 보내는 JSON (이미지 URL 포함)
//! - `VacationForm` → `VacationInput`: 관리자 multipart 폼의 원시 문자열을 검증된 값으로 변환
//!
//! 날짜는 DB에 `YYYY-MM-DD` 문자열로 저장됩니다. ISO 형식이라
//! 문자열 비교가 곧 날짜 비교가 되므로 SQL에서 그대로 비교할 수 있습니다.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Vacation {
    pub id: String,
    pub destination: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub price: f64,
    pub image_key: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VacationWithStats {
    #[sqlx(flatten)]
    pub vacation: Vacation,
    pub follower_count: i64,
    /// SQLite의 EXISTS 결과 (0 또는 1)
    pub is_following: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationResponse {
    pub id: String,
    pub destination: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub price: f64,
    pub image_key: String,
    pub image_url: String,
    /// 관리자 생성/수정 응답에는 통계가 없으므로 생략됩니다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follower_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
    pub created_at: String,
    pub updated_at: String,
}

impl VacationResponse {
    pub fn new(vacation: Vacation, image_url: String) -> Self {
        Self {
            id: vacation.id,
            destination: vacation.destination,
            description: vacation.description,
            start_date: vacation.start_date,
            end_date: vacation.end_date,
            price: vacation.price,
            image_key: vacation.image_key,
            image_url,
            follower_count: None,
            is_following: None,
            created_at: vacation.created_at,
            updated_at: vacation.updated_at,
        }
    }

    pub fn with_stats(row: VacationWithStats, image_url: String) -> Self {
        Self {
            follower_count: Some(row.follower_count),
            is_following: Some(row.is_following != 0),
            ..Self::new(row.vacation, image_url)
        }
    }
}

/// `GET /vacations`의 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
pub struct ListVacationsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub followed: Option<bool>,
    pub upcoming: Option<bool>,
    pub active: Option<bool>,
}

/// 정규화된 목록 조회 조건
#[derive(Debug, Clone, PartialEq)]
pub struct VacationFilter {
    pub page: i64,
    pub limit: i64,
    pub followed_only: bool,
    pub upcoming: bool,
    pub active: bool,
}

impl ListVacationsQuery {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;
    /// `(page - 1) * limit`가 i64를 넘지 않는 최대 페이지
    pub const MAX_PAGE: i64 = i64::MAX / Self::MAX_LIMIT;

    pub fn normalize(&self) -> VacationFilter {
        VacationFilter {
            page: self.page.unwrap_or(1).clamp(1, Self::MAX_PAGE),
            limit: self
                .limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            followed_only: self.followed.unwrap_or(false),
            upcoming: self.upcoming.unwrap_or(false),
            active: self.active.unwrap_or(false),
        }
    }
}

impl VacationFilter {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub pages: i64,
    pub current_page: i64,
    pub limit: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        Self {
            total,
            pages: (total + limit - 1) / limit,
            current_page: page,
            limit,
            has_next: page * limit < total,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VacationPage {
    pub data: Vec<VacationResponse>,
    pub pagination: Pagination,
}

/// 관리자 폼에서 모은 원시 텍스트 필드. 누락된 필드는 None
#[derive(Debug, Default)]
pub struct VacationForm {
    pub destination: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub price: Option<String>,
}

/// 검증을 통과한 여행 상품 입력값
#[derive(Debug, Clone, PartialEq, Validate)]
#[validate(schema(function = "validate_date_range"))]
pub struct VacationInput {
    #[validate(length(min = 1, message = "Destination is required"))]
    pub destination: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(range(min = 0.0, max = 10000.0, message = "Price must be between 0 and 10,000"))]
    pub price: f64,
}

fn validate_date_range(input: &VacationInput) -> Result<(), ValidationError> {
    if input.end_date < input.start_date {
        let mut err = ValidationError::new("date_range");
        err.message = Some(Cow::from("End date must be after start date"));
        return Err(err);
    }
    Ok(())
}

fn field_error(
    errors: &mut ValidationErrors,
    field: &'static str,
    code: &'static str,
    msg: &'static str,
) {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::from(msg));
    errors.add(field, err);
}

/// `YYYY-MM-DD` 또는 RFC 3339 타임스탬프를 받아 날짜만 남깁니다.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

impl VacationForm {
    /// 원시 필드를 파싱하고 검증합니다.
    ///
    /// 파싱 단계의 에러(누락, 날짜/숫자 형식)와 `Validate` 단계의 에러를
    /// 한 번에 모으지 않고, 파싱 에러가 있으면 먼저 그것만 반환합니다.
    pub fn into_input(self) -> Result<VacationInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let start_date = match self.start_date.as_deref().map(parse_date) {
            Some(Some(d)) => Some(d),
            Some(None) => {
                field_error(&mut errors, "startDate", "date", "Start date must be a valid date");
                None
            }
            None => {
                field_error(&mut errors, "startDate", "required", "Start date is required");
                None
            }
        };
        let end_date = match self.end_date.as_deref().map(parse_date) {
            Some(Some(d)) => Some(d),
            Some(None) => {
                field_error(&mut errors, "endDate", "date", "End date must be a valid date");
                None
            }
            None => {
                field_error(&mut errors, "endDate", "required", "End date is required");
                None
            }
        };
        let price = match self.price.as_deref().map(|p| p.trim().parse::<f64>()) {
            Some(Ok(p)) if p.is_finite() => Some(p),
            Some(_) => {
                field_error(&mut errors, "price", "number", "Price must be a number");
                None
            }
            None => {
                field_error(&mut errors, "price", "required", "Price is required");
                None
            }
        };

        let (Some(start_date), Some(end_date), Some(price)) = (start_date, end_date, price) else {
            return Err(errors);
        };

        let input = VacationInput {
            destination: self.destination.unwrap_or_default().trim().to_string(),
            description: self.description.unwrap_or_default().trim().to_string(),
            start_date,
            end_date,
            price,
        };
        input.validate()?;
        Ok(input)
    }
}
