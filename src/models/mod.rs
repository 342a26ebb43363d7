//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `user`: 사용자, 역할, 인증 요청/응답
//! - `vacation`: 여행 상품, 목록 조회 조건, 관리자 입력 폼
//! - `report`: 팔로워 수 리포트
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Vacation`처럼 짧게 쓸 수 있습니다.

pub mod report;
pub mod user;
pub mod vacation;

pub use report::*;
pub use user::*;
pub use vacation::*;
