//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 필수 항목은 `DATABASE_URL`, `JWT_SECRET` 두 가지뿐이고,
//! 나머지는 모두 기본값이 있습니다. S3 관련 설정은 `S3_BUCKET`이
//! 있을 때만 의미가 있으며, 없으면 이미지가 로컬 디스크에 저장됩니다.

use std::env;

/// 애플리케이션 전체 설정을 담는 구조체
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/vacations.db")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// 로컬 이미지 저장 디렉토리 (S3를 쓸 수 없을 때 사용)
    pub uploads_path: String,
    /// 빌드된 프론트엔드 디렉토리. 존재하면 SPA로 서빙합니다.
    pub frontend_dist: String,
    /// access 토큰 유효 시간(분)
    pub access_token_ttl_minutes: i64,
    /// refresh 토큰 유효 기간(일)
    pub refresh_token_ttl_days: i64,
    /// 업로드 이미지 최대 크기(바이트)
    pub max_upload_bytes: usize,
    /// S3 설정. `S3_BUCKET`이 없으면 None
    pub s3: Option<S3Config>,
    /// 시작 시 보장할 관리자 계정 (이메일, 비밀번호)
    pub admin_bootstrap: Option<(String, String)>,
}

/// S3(또는 LocalStack 같은 호환 서비스) 접속 정보
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    /// 사용자 지정 엔드포인트. None이면 AWS 기본 엔드포인트
    pub endpoint: Option<String>,
    /// 클라이언트에게 돌려줄 이미지 URL의 기준 주소
    pub public_endpoint: Option<String>,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub force_path_style: bool,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`이 없으면 `VarError`를 반환합니다.
    /// 숫자 항목은 파싱에 실패하면 기본값을 사용합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        let s3 = optional("S3_BUCKET").map(|bucket| {
            let endpoint = optional("S3_ENDPOINT");
            S3Config {
                public_endpoint: optional("S3_PUBLIC_ENDPOINT").or_else(|| endpoint.clone()),
                endpoint,
                region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id: env::var("AWS_ACCESS_KEY_ID").unwrap_or_else(|_| "test".to_string()),
                secret_access_key: env::var("AWS_SECRET_ACCESS_KEY")
                    .unwrap_or_else(|_| "test".to_string()),
                force_path_style: parse_or("S3_FORCE_PATH_STYLE", true),
                bucket,
            }
        });

        let admin_bootstrap = match (optional("ADMIN_EMAIL"), optional("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")?, // 필수
            jwt_secret: env::var("JWT_SECRET")?,     // 필수
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 3000),
            uploads_path: env::var("UPLOADS_PATH").unwrap_or_else(|_| "data/uploads".to_string()),
            frontend_dist: env::var("FRONTEND_DIST")
                .unwrap_or_else(|_| "../frontend/dist".to_string()),
            access_token_ttl_minutes: parse_or("ACCESS_TOKEN_TTL_MINUTES", 60),
            refresh_token_ttl_days: parse_or("REFRESH_TOKEN_TTL_DAYS", 7),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", 5 * 1024 * 1024),
            s3,
            admin_bootstrap,
        })
    }
}

/// 값이 없거나 공백뿐이면 None
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_falls_back_on_garbage() {
        env::set_var("VACATIONS_TEST_PORT", "not-a-number");
        assert_eq!(parse_or::<u16>("VACATIONS_TEST_PORT", 3000), 3000);

        env::set_var("VACATIONS_TEST_PORT", " 8080 ");
        assert_eq!(parse_or::<u16>("VACATIONS_TEST_PORT", 3000), 8080);
    }

    #[test]
    fn blank_optional_is_none() {
        env::set_var("VACATIONS_TEST_BLANK", "   ");
        assert_eq!(optional("VACATIONS_TEST_BLANK"), None);
        assert_eq!(optional("VACATIONS_TEST_DEFINITELY_UNSET"), None);
    }
}
