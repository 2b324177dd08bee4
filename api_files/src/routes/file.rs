use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder, get, http::header::CONTENT_DISPOSITION, post, web};
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::Success,
    multipart,
};
use serde::Serialize;
use storage::{FileStorage, PUBLIC_PREFIX};
use uuid::Uuid;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_id: String,
    pub file_name: String,
    pub file_download_uri: String,
    pub file_type: String,
    /// Byte count, as a string.
    pub size: String,
}

/// Stores an uploaded file.
///
/// # Input
/// - `payload`: multipart form with a `file` part and an optional `userId` field.
///   With a user id the file is stored as that user's logo.
/// - `storage`: File storage
/// - `config`: Application configuration, for the public base URL
///
/// # Output
/// - Success: `{ fileId, fileName, fileDownloadUri, fileType, size }`
/// - Error: Returns 400 Bad Request when the file is missing or empty
///
/// # Frontend Example
/// ```javascript
/// const form = new FormData();
/// form.append('file', input.files[0]);
/// const response = await fetch('/api/files/upload', { method: 'POST', body: form });
/// const { fileDownloadUri } = await response.json();
/// ```
#[post("/upload")]
pub async fn post_upload(
    payload: Multipart,
    storage: web::Data<Arc<FileStorage>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let mut form = multipart::read_form(payload, MAX_UPLOAD_BYTES).await?;
    let file = form
        .take_file("file")
        .ok_or_else(|| AppError::BadRequest("File cannot be empty".to_string()))?;
    let user_id = form
        .text("userId")
        .map(|id| {
            Uuid::parse_str(&id)
                .map_err(|_| AppError::BadRequest(format!("Invalid userId: {}", id)))
        })
        .transpose()?;

    // browsers may send a full client path
    let original_name = file
        .file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string();

    let reference = match user_id {
        Some(user_id) => {
            storage
                .store_logo(&file.bytes, user_id, &storage::extension_of(&original_name))
                .await?
        }
        None => storage.store_file(&file.bytes, &original_name).await?,
    };
    let file_id = reference
        .strip_prefix(PUBLIC_PREFIX)
        .unwrap_or(&reference)
        .to_string();
    log::info!("Stored upload {} ({} bytes)", file_id, file.bytes.len());

    Success::ok(UploadResponse {
        file_download_uri: format!(
            "{}/api/files/download/{}",
            config.storage_config.app_base_url, file_id
        ),
        file_id,
        file_name: original_name,
        file_type: file
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string()),
        size: file.bytes.len().to_string(),
    })
}

/// Downloads a stored file. Accepts a bare file id or an `/uploads/...` reference.
#[get("/download/{file_id:.*}")]
pub async fn get_download(
    path: web::Path<String>,
    storage: web::Data<Arc<FileStorage>>,
) -> Res<impl Responder> {
    let stored = storage.load(&path).await.inspect_err(|_| {
        log::warn!("File not found for ID: {}", path);
    })?;
    Ok(HttpResponse::Ok()
        .content_type(stored.content_type.as_str())
        .insert_header((
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", stored.name),
        ))
        .body(stored.bytes))
}
