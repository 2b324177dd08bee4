use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::StreamExt;

use crate::error::{AppError, Res};

/// Text fields are small; anything longer is rejected.
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A fully buffered multipart form.
#[derive(Debug, Default)]
pub struct Form {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, UploadedFile>,
}

impl Form {
    /// Trimmed text value, `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name).filter(|f| !f.bytes.is_empty())
    }
}

/// Buffers every part of `payload`. Parts carrying a file name become files,
/// the rest text fields. Files larger than `max_file_bytes` are a `BadRequest`.
pub async fn read_form(mut payload: Multipart, max_file_bytes: usize) -> Res<Form> {
    let mut form = Form::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(bad_multipart)?;
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|m| m.to_string());
        let limit = if file_name.is_some() {
            max_file_bytes
        } else {
            MAX_TEXT_FIELD_BYTES
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(bad_multipart)?;
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::BadRequest(format!(
                    "Field '{}' exceeds the {} byte limit",
                    name, limit
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match file_name {
            Some(file_name) => {
                form.files.insert(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    },
                );
            }
            None => {
                let value = String::from_utf8(bytes).map_err(|_| {
                    AppError::BadRequest(format!("Field '{}' is not valid UTF-8", name))
                })?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

fn bad_multipart(err: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart payload: {}", err))
}
