//! # 이미지 저장소 서비스
//!
//! 여행 상품 이미지를 S3(또는 LocalStack)에 올리고 지웁니다.
//! S3를 쓸 수 없으면 로컬 디스크(`UPLOADS_PATH`)로 전환합니다.
//!
//! ## 구성
//! - `ObjectStore` 트레이트: 저장소 하나가 할 수 있는 일 (put/delete/URL)
//! - `S3Store`: aws-sdk-s3 기반 구현
//! - `LocalDiskStore`: 디스크 기반 구현. `/uploads/{key}`로 서빙됩니다.
//! - `ImageStorage`: 두 저장소를 묶고, `use_local` 플래그로 어느 쪽을 쓸지 고릅니다.
//!
//! ## 전환 규칙
//! ```text
//! 시작 시 버킷 확인 실패 ─┐
//! 업로드 실패 ───────────┼─→ use_local = true (다시 false로 돌아가지 않음)
//! 삭제 실패 ─────────────┘
//! ```
//! 업로드 실패 시에는 같은 키로 로컬에 다시 저장하므로 요청 자체는 성공합니다.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;
use thiserror::Error;
use tokio::fs;

use crate::config::S3Config;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("remote object store: {0}")]
    Remote(String),
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// 이미지 하나를 키(파일 이름)로 저장/삭제하는 저장소
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 로그에 찍을 저장소 이름
    fn name(&self) -> &'static str;

    /// 저장소를 쓸 수 있는 상태로 만듭니다 (버킷/디렉토리 생성).
    async fn ensure_ready(&self) -> Result<(), StorageError>;

    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), StorageError>;

    /// 없는 키를 지우는 것은 에러가 아닙니다.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    fn public_url(&self, key: &str) -> String;
}

pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base: String,
}

impl S3Store {
    pub async fn from_config(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "environment",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        let public_base = match &config.public_endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), config.bucket),
            None => format!("https://{}.s3.amazonaws.com", config.bucket),
        };

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
            public_base,
        }
    }
}

fn remote_error<E>(err: E) -> StorageError
where
    E: std::error::Error,
{
    StorageError::Remote(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl ObjectStore for S3Store {
    fn name(&self) -> &'static str {
        "s3"
    }

    async fn ensure_ready(&self) -> Result<(), StorageError> {
        let head = self.client.head_bucket().bucket(&self.bucket).send().await;
        let err = match head {
            Ok(_) => {
                tracing::info!("Bucket \"{}\" exists", self.bucket);
                return Ok(());
            }
            Err(err) => err,
        };

        let missing = err
            .as_service_error()
            .map(|e| e.is_not_found())
            .unwrap_or(false);
        if !missing {
            return Err(remote_error(err));
        }

        tracing::info!("Bucket \"{}\" does not exist, creating it", self.bucket);
        self.client
            .create_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(remote_error)?;
        Ok(())
    }

    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes.to_vec()))
            .content_type(content_type)
            .send()
            .await
            .map_err(remote_error)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(remote_error)?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, key)
    }
}

/// 로컬 디스크 저장소. 키는 `root` 바로 아래의 파일 이름입니다.
pub struct LocalDiskStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalDiskStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        // 키는 경로 구분자 없는 단일 파일 이름이어야 합니다.
        let is_plain = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && Path::new(key).file_name().is_some();
        if !is_plain {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalDiskStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn ensure_ready(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    async fn put(&self, key: &str, bytes: &[u8], _content_type: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).await?;
        fs::write(path, bytes).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.url_prefix, key)
    }
}

/// 원격 저장소(선택)와 로컬 저장소를 묶은 이미지 저장소
pub struct ImageStorage {
    remote: Option<Arc<dyn ObjectStore>>,
    local: Arc<dyn ObjectStore>,
    use_local: AtomicBool,
}

impl ImageStorage {
    pub fn new(remote: Option<Arc<dyn ObjectStore>>, local: Arc<dyn ObjectStore>) -> Self {
        let use_local = AtomicBool::new(remote.is_none());
        Self {
            remote,
            local,
            use_local,
        }
    }

    /// 시작 시 한 번 호출합니다. 원격 저장소가 준비되지 않으면 로컬로 전환합니다.
    pub async fn init(&self) -> Result<(), StorageError> {
        self.local.ensure_ready().await?;

        match &self.remote {
            Some(remote) => match remote.ensure_ready().await {
                Ok(()) => tracing::info!("Image storage: {}", remote.name()),
                Err(e) => self.fall_back(&e),
            },
            None => tracing::info!("Image storage: local disk only"),
        }
        Ok(())
    }

    pub fn is_local(&self) -> bool {
        self.use_local.load(Ordering::SeqCst)
    }

    fn fall_back(&self, cause: &StorageError) {
        if !self.use_local.swap(true, Ordering::SeqCst) {
            tracing::warn!("Switching image storage to local disk: {}", cause);
        }
    }

    fn active_remote(&self) -> Option<&Arc<dyn ObjectStore>> {
        if self.is_local() {
            None
        } else {
            self.remote.as_ref()
        }
    }

    /// 이미지를 저장하고 생성된 키를 반환합니다.
    pub async fn upload(
        &self,
        original_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let key = generate_key(original_name);

        if let Some(remote) = self.active_remote() {
            match remote.put(&key, bytes, content_type).await {
                Ok(()) => {
                    tracing::debug!("Uploaded {} to {}", key, remote.name());
                    return Ok(key);
                }
                Err(e) => self.fall_back(&e),
            }
        }

        self.local.put(&key, bytes, content_type).await?;
        tracing::debug!("Stored {} on local disk", key);
        Ok(key)
    }

    /// 이미지를 지웁니다. 실패해도 요청을 실패시키지 않고 로그만 남깁니다.
    pub async fn delete(&self, key: &str) {
        if let Some(remote) = self.active_remote() {
            if let Err(e) = remote.delete(key).await {
                tracing::warn!("Failed to delete {} from {}: {}", key, remote.name(), e);
                self.fall_back(&e);
            }
            return;
        }

        if let Err(e) = self.local.delete(key).await {
            tracing::warn!("Failed to delete local image {}: {}", key, e);
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        match self.active_remote() {
            Some(remote) => remote.public_url(key),
            None => self.local.public_url(key),
        }
    }
}

/// `{밀리초 타임스탬프}-{uuid v4}{.확장자}` 형태의 키를 만듭니다.
/// 확장자는 소문자로 바꾸고, 영숫자가 아니거나 너무 길면 버립니다.
pub fn generate_key(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();

    format!(
        "{}-{}{}",
        Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4(),
        ext
    )
}
