//! # 여행 상품 API 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 이미지 저장소 준비 (S3, 실패 시 로컬 디스크)
//! 6. 관리자 계정 보장
//! 7. API 라우터 설정
//! 8. HTTP 서버 시작

// ── 모듈 선언 ──
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

use anyhow::Result;
use axum::Router;
use chrono::Duration;
use config::Config;
use middleware::auth::JwtSettings;
use routes::AppState;
use services::storage::{ImageStorage, LocalDiskStore, ObjectStore, S3Store};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{path::Path, str::FromStr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG 환경변수로 로그 레벨을 제어합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vacations=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting vacations server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    // 데이터베이스 파일이 없으면 새로 만듭니다. 외래키 제약은 sqlx 기본값으로 켜져 있습니다.
    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 6단계: 이미지 저장소 준비 ──
    // 로컬 저장소는 항상 만들어 두고, S3 설정이 있으면 원격 저장소를 먼저 씁니다.
    let uploads_path = Path::new(&config.uploads_path);
    if !uploads_path.exists() {
        tokio::fs::create_dir_all(uploads_path).await?;
        tracing::info!("Created uploads directory: {}", config.uploads_path);
    }

    let local: Arc<dyn ObjectStore> =
        Arc::new(LocalDiskStore::new(&config.uploads_path, "/uploads"));
    let remote: Option<Arc<dyn ObjectStore>> = match &config.s3 {
        Some(s3) => Some(Arc::new(S3Store::from_config(s3).await)),
        None => None,
    };
    let images = Arc::new(ImageStorage::new(remote, local));
    images.init().await?;

    // ── 7단계: 관리자 계정 보장 ──
    if let Some((email, password)) = &config.admin_bootstrap {
        services::bootstrap::ensure_admin(&pool, email, password).await?;
    }

    // ── 8단계: 애플리케이션 상태(State) 생성 ──
    let state = AppState {
        pool,
        jwt: JwtSettings {
            secret: config.jwt_secret.clone(),
            access_ttl: Duration::minutes(config.access_token_ttl_minutes),
            refresh_ttl: Duration::days(config.refresh_token_ttl_days),
        },
        images,
        max_upload_bytes: config.max_upload_bytes,
    };

    // ── 9단계: 라우터 설정 ──
    // 개발 환경 기준으로 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .nest("/api/v1", routes::api_router(state))
        // 로컬 디스크에 저장된 이미지
        .nest_service("/uploads", ServeDir::new(&config.uploads_path));

    // 빌드된 프론트엔드가 있으면 같은 서버에서 SPA로 서빙합니다.
    let frontend_dist = Path::new(&config.frontend_dist);
    let router = if frontend_dist.exists() {
        tracing::info!("Serving frontend static files from {}", config.frontend_dist);
        let serve_dir = ServeDir::new(frontend_dist)
            .not_found_service(ServeFile::new(frontend_dist.join("index.html")));
        router.fallback_service(serve_dir)
    } else {
        tracing::warn!("Frontend dist directory not found, serving API only");
        router
    };

    let app = router.layer(cors).layer(TraceLayer::new_for_http());

    // ── 10단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
