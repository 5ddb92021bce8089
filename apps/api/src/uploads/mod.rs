//! Upload boundary and lifecycle for resume PDFs.
//!
//! Lifecycle: `UploadStore::persist` puts a file in the `Received` state,
//! `StoredUpload::read` is the `Processing` step, and `StoredUpload::release`
//! consumes the handle (`Released`). The janitor may release any file
//! asynchronously once it outlives the retention window; deletion is idempotent
//! so both paths can race safely.

use axum::extract::multipart::Field;
use bytes::{Bytes, BytesMut};
use thiserror::Error;

pub mod janitor;
pub mod store;

pub use janitor::UploadJanitor;
pub use store::{StoredUpload, UploadStore};

/// Upper bound for an uploaded resume.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Only PDF files are allowed")]
    NotPdf,

    #[error("File too large. Maximum size is 5MB")]
    TooLarge,

    #[error("Upload error: {0}")]
    Multipart(String),
}

/// A file received from the client but not yet written to disk.
#[derive(Debug)]
pub struct PendingFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Reads a multipart file field that must be a PDF no larger than `MAX_UPLOAD_BYTES`.
/// The content type is checked before any byte is consumed.
pub async fn read_pdf_field(mut field: Field<'_>) -> Result<PendingFile, UploadError> {
    if !is_pdf(field.content_type()) {
        return Err(UploadError::NotPdf);
    }

    let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
    let mut buffer = BytesMut::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| UploadError::Multipart(e.body_text()))?
    {
        if buffer.len() + chunk.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge);
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok(PendingFile {
        file_name,
        bytes: buffer.freeze(),
    })
}

/// Compares the MIME type without parameters, case-insensitively.
fn is_pdf(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(PDF_MIME))
}
