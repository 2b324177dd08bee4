use std::path::{Path, PathBuf};

use common::error::{AppError, Res};
use uuid::Uuid;

/// Public prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads/";

pub struct StoredFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Flat directory of uploaded logos, generic uploads and oversized invoice PDFs.
///
/// Every `store_*` call returns the public reference `/uploads/{file}`.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Creates the directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> Res<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        log::info!("File storage at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `file_{uuid}_{original}`
    pub async fn store_file(&self, bytes: &[u8], original_name: &str) -> Res<String> {
        let name = format!("file_{}_{}", Uuid::new_v4(), clean_name(original_name)?);
        self.store_named(bytes, &name).await
    }

    /// `pdf_{user}_{name}`
    pub async fn store_pdf(&self, bytes: &[u8], user_id: Uuid, name: &str) -> Res<String> {
        let name = format!("pdf_{}_{}", user_id, clean_name(name)?);
        self.store_named(bytes, &name).await
    }

    /// `logo_{user}_{uuid}{ext}`, where `ext` includes the dot or is empty.
    pub async fn store_logo(&self, bytes: &[u8], user_id: Uuid, ext: &str) -> Res<String> {
        let name = format!("logo_{}_{}{}", user_id, Uuid::new_v4(), ext);
        self.store_named(bytes, &clean_name(&name)?).await
    }

    pub async fn store_named(&self, bytes: &[u8], name: &str) -> Res<String> {
        let name = clean_name(name)?;
        tokio::fs::write(self.root.join(&name), bytes).await?;
        log::debug!("Stored {} ({} bytes)", name, bytes.len());
        Ok(format!("{}{}", PUBLIC_PREFIX, name))
    }

    /// Accepts either a bare file name or an `/uploads/...` reference.
    pub async fn load(&self, reference: &str) -> Res<StoredFile> {
        let name = clean_name(strip_prefix(reference))
            .map_err(|_| AppError::NotFound(format!("File not found: {}", reference)))?;
        let path = self.root.join(&name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(StoredFile {
                content_type: mime_guess::from_path(&path)
                    .first_or_octet_stream()
                    .to_string(),
                name,
                bytes,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("File not found: {}", name)))
            }
            Err(e) => Err(AppError::from(e)),
        }
    }

    /// Best effort, a missing file is not an error.
    pub async fn delete(&self, reference: &str) {
        let Ok(name) = clean_name(strip_prefix(reference)) else {
            return;
        };
        if let Err(e) = tokio::fs::remove_file(self.root.join(&name)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Could not delete {}: {}", name, e);
            }
        }
    }
}

fn strip_prefix(reference: &str) -> &str {
    let trimmed = reference.trim_start_matches('/');
    trimmed
        .strip_prefix(PUBLIC_PREFIX.trim_start_matches('/'))
        .unwrap_or(trimmed)
}

/// Rejects anything that could leave the storage directory.
fn clean_name(name: &str) -> Res<String> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.contains("..")
        || trimmed.contains('/')
        || trimmed.contains('\\')
        || trimmed.contains('\0')
    {
        return Err(AppError::BadRequest(format!("Invalid file name: {}", name)));
    }
    Ok(trimmed.to_string())
}

/// Extension of `file_name` including the dot, or an empty string.
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}
