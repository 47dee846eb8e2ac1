//! Product image uploads.
//!
//! Accepts multipart form data from the admin back office, keeps only
//! `image/*` parts, and writes each file to the upload directory as
//! `<unix millis>-<sanitized original name>`. Saved files are served back
//! under `/uploads`.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Multipart, MultipartError};
use chrono::Utc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Maximum number of images per product.
pub const MAX_FILES: usize = 5;
/// Maximum size of a single image in bytes.
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Errors that can occur while saving uploaded images.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Only images allowed")]
    NotAnImage,

    #[error("At most {MAX_FILES} images allowed")]
    TooManyFiles,

    #[error("Image exceeds {} MiB", MAX_FILE_BYTES / (1024 * 1024))]
    TooLarge,

    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("failed to write upload: {0}")]
    Io(#[from] std::io::Error),
}

/// One field parsed out of a multipart product form: either a text value
/// or a saved image path.
#[derive(Debug)]
pub enum FormField {
    Text { name: String, value: String },
    Image { url: String },
}

/// Drain a multipart body, saving image parts and collecting text parts.
///
/// Text fields come back verbatim for the caller to deserialize; each image
/// part named `image` (or `image-<n>`) is written to `upload_dir` and
/// returned as its public `/uploads/...` URL.
///
/// # Errors
///
/// Returns `UploadError` on a non-image file part, too many files, an
/// oversized file, or an I/O failure.
pub async fn collect_product_form(
    upload_dir: &Path,
    mut multipart: Multipart,
) -> Result<Vec<FormField>, UploadError> {
    tokio::fs::create_dir_all(upload_dir).await?;

    let mut fields = Vec::new();
    let mut image_count = 0usize;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let is_file = field.file_name().is_some();

        if is_file {
            image_count += 1;
            if image_count > MAX_FILES {
                return Err(UploadError::TooManyFiles);
            }
            let content_type = field.content_type().unwrap_or_default().to_string();
            if !content_type.starts_with("image/") {
                return Err(UploadError::NotAnImage);
            }
            let original = field.file_name().unwrap_or("image").to_string();
            let data = field.bytes().await?;
            if data.len() > MAX_FILE_BYTES {
                return Err(UploadError::TooLarge);
            }
            let path = save_image(upload_dir, &original, &data).await?;
            fields.push(FormField::Image { url: path });
        } else {
            let value = field.text().await?;
            fields.push(FormField::Text { name, value });
        }
    }

    Ok(fields)
}

/// Write image bytes under the upload directory and return the public URL.
async fn save_image(
    upload_dir: &Path,
    original_name: &str,
    data: &[u8],
) -> Result<String, UploadError> {
    let filename = format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        sanitize_filename(original_name)
    );
    let path: PathBuf = upload_dir.join(&filename);

    let mut file = tokio::fs::File::create(&path).await?;
    file.write_all(data).await?;
    file.flush().await?;

    Ok(format!("/uploads/{filename}"))
}

/// Strip path separators and whitespace from a client-supplied filename.
fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize_filename("trail shoe.png"), "trail_shoe.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("a\\b\\c.jpg"), "c.jpg");
    }

    #[tokio::test]
    async fn saved_image_lands_in_upload_dir() {
        let dir = std::env::temp_dir().join(format!("uploads-test-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let url = save_image(&dir, "photo.png", b"not-a-real-png")
            .await
            .unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-photo.png"));
        let on_disk = dir.join(url.trim_start_matches("/uploads/"));
        assert!(tokio::fs::try_exists(&on_disk).await.unwrap());
        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
