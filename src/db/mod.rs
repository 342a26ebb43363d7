//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `followers`: 팔로우/언팔로우
//! - `reports`: 팔로워 수 집계 쿼리
//! - `users`: 사용자와 refresh 토큰
//! - `vacations`: 여행 상품 CRUD와 목록 조회

pub mod followers;
pub mod reports;
pub mod users;
pub mod vacations;

pub use followers::*;
pub use vacations::*;
