//! # 요청 추출자(Extractor) 모듈
//!
//! - `auth`: JWT 검증, 로그인 사용자/관리자 추출
//! - `validate`: JSON/쿼리/multipart 추출자 (거절을 `AppError`로 변환)

pub mod auth;
pub mod validate;

pub use auth::{AdminUser, AuthUser};
pub use validate::{FormData, QueryParams, ValidatedJson};
