//! # 서비스 모듈
//!
//! DB 밖의 작업을 담당합니다.
//! - `bootstrap`: 시작 시 관리자 계정 보장
//! - `password`: Argon2id 해싱/검증
//! - `report`: 팔로워 리포트 CSV 생성
//! - `storage`: 이미지 저장소 (S3 + 로컬 디스크 대체)

pub mod bootstrap;
pub mod password;
pub mod report;
pub mod storage;

pub use password::*;
pub use report::*;
