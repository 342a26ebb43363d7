//! # 관리자 여행 상품 관리 핸들러
//!
//! ## 엔드포인트 (관리자 전용, multipart/form-data)
//! - `POST   /api/v1/admin/vacations`      → 생성 (이미지 필수)
//! - `PUT    /api/v1/admin/vacations/{id}` → 수정 (이미지 선택)
//! - `DELETE /api/v1/admin/vacations/{id}` → 삭제
//!
//! 폼 필드: `destination`, `description`, `startDate`, `endDate`, `price`, `image`
//!
//! 이미지는 DB 작업 전에 업로드합니다. DB 작업이 실패하면 방금 올린
//! 이미지를 지워서 어느 행도 가리키지 않는 파일이 남지 않게 합니다.

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    db,
    error::AppError,
    middleware::{AdminUser, FormData},
    models::{VacationForm, VacationResponse},
    routes::vacations::{parse_vacation_id, AppState},
};

/// 폼에서 받은 이미지 파일
struct ImageUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body is too large".to_string())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

fn too_large(max_bytes: usize) -> AppError {
    AppError::PayloadTooLarge(format!("Image must be at most {} bytes", max_bytes))
}

/// 이미지 필드를 읽습니다. 한도를 넘는 순간 중단합니다.
///
/// 파일을 고르지 않은 채 제출된 빈 파일 필드는 None입니다.
async fn read_image(
    mut field: Field<'_>,
    max_bytes: usize,
) -> Result<Option<ImageUpload>, AppError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(too_large(max_bytes));
        }
        bytes.extend_from_slice(&chunk);
    }

    if file_name.is_empty() && bytes.is_empty() {
        return Ok(None);
    }
    if !content_type.starts_with("image/") {
        return Err(AppError::BadRequest("Only image files are allowed".to_string()));
    }
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Image file is empty".to_string()));
    }

    Ok(Some(ImageUpload {
        file_name,
        content_type,
        bytes,
    }))
}

/// multipart 본문 전체를 읽어 텍스트 필드와 이미지로 나눕니다.
/// 알 수 없는 필드는 무시합니다.
async fn read_form(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<(VacationForm, Option<ImageUpload>), AppError> {
    let mut form = VacationForm::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            image = read_image(field, max_bytes).await?;
            continue;
        }

        let slot = match name.as_str() {
            "destination" => &mut form.destination,
            "description" => &mut form.description,
            "startDate" => &mut form.start_date,
            "endDate" => &mut form.end_date,
            "price" => &mut form.price,
            _ => continue,
        };
        *slot = Some(field.text().await.map_err(multipart_error)?);
    }

    Ok((form, image))
}

/// `POST /admin/vacations`: 새 여행 상품을 만듭니다.
pub async fn create_vacation(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    FormData(multipart): FormData,
) -> Result<(StatusCode, Json<VacationResponse>), AppError> {
    let (form, image) = read_form(multipart, state.max_upload_bytes).await?;
    let input = form.into_input()?;
    let image = image.ok_or(AppError::BadRequest("Image is required".to_string()))?;

    let image_key = state
        .images
        .upload(&image.file_name, &image.content_type, &image.bytes)
        .await?;

    let id = uuid::Uuid::now_v7().to_string();
    let vacation = match db::create_vacation(&state.pool, &id, &input, &image_key).await {
        Ok(vacation) => vacation,
        Err(e) => {
            state.images.delete(&image_key).await;
            return Err(e);
        }
    };

    tracing::info!("Admin {} created vacation {}", admin.user_id, vacation.id);
    let url = state.images.public_url(&vacation.image_key);
    Ok((StatusCode::CREATED, Json(VacationResponse::new(vacation, url))))
}

/// `PUT /admin/vacations/{id}`: 모든 텍스트 필드를 덮어씁니다.
///
/// 새 이미지가 오면 업로드 후 행을 갱신하고, 그 다음에 예전 이미지를 지웁니다.
pub async fn update_vacation(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    FormData(multipart): FormData,
) -> Result<Json<VacationResponse>, AppError> {
    let id = parse_vacation_id(&id)?;
    let (form, image) = read_form(multipart, state.max_upload_bytes).await?;
    let input = form.into_input()?;

    let existing = db::get_vacation(&state.pool, &id)
        .await?
        .ok_or_else(AppError::vacation_not_found)?;

    let vacation = match image {
        Some(image) => {
            let new_key = state
                .images
                .upload(&image.file_name, &image.content_type, &image.bytes)
                .await?;

            match db::update_vacation(&state.pool, &id, &input, &new_key).await {
                Ok(Some(vacation)) => {
                    state.images.delete(&existing.image_key).await;
                    vacation
                }
                Ok(None) => {
                    state.images.delete(&new_key).await;
                    return Err(AppError::vacation_not_found());
                }
                Err(e) => {
                    state.images.delete(&new_key).await;
                    return Err(e);
                }
            }
        }
        None => db::update_vacation(&state.pool, &id, &input, &existing.image_key)
            .await?
            .ok_or_else(AppError::vacation_not_found)?,
    };

    tracing::info!("Admin {} updated vacation {}", admin.user_id, vacation.id);
    let url = state.images.public_url(&vacation.image_key);
    Ok(Json(VacationResponse::new(vacation, url)))
}

/// `DELETE /admin/vacations/{id}`: 행을 지운 뒤 이미지를 지웁니다.
/// 팔로우 관계는 DB에서 함께 삭제됩니다.
pub async fn delete_vacation(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_vacation_id(&id)?;
    let vacation = db::get_vacation(&state.pool, &id)
        .await?
        .ok_or_else(AppError::vacation_not_found)?;

    if !db::delete_vacation(&state.pool, &id).await? {
        return Err(AppError::vacation_not_found());
    }
    state.images.delete(&vacation.image_key).await;

    tracing::info!("Admin {} deleted vacation {}", admin.user_id, id);
    Ok(StatusCode::NO_CONTENT)
}
