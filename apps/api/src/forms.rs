//! Shared multipart form plumbing for the upload-bearing endpoints.

use axum::extract::multipart::{Field, Multipart};
use bytes::Bytes;

use crate::errors::AppError;
use crate::storage::UploadedFile;

/// Reads a text part. Malformed parts are the client's fault.
pub async fn read_text_field(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart field: {e}")))
}

/// Reads a file part, keeping its declared content type and filename.
pub async fn read_file_field(field: Field<'_>) -> Result<UploadedFile, AppError> {
    let file_name = field.file_name().map(str::to_owned);
    let content_type = field
        .content_type()
        .map(str::to_owned)
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let data: Bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart file: {e}")))?;
    Ok(UploadedFile {
        file_name,
        content_type,
        data,
    })
}

/// Advances to the next multipart part, mapping stream errors to 400s.
pub async fn next_field<'a>(
    multipart: &'a mut Multipart,
) -> Result<Option<Field<'a>>, AppError> {
    multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))
}

/// Required text field: present and non-blank after trimming.
pub fn require_trimmed(value: Option<String>, name: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(AppError::Validation(format!("{name} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_trimmed_accepts_and_trims() {
        let value = require_trimmed(Some("  CS-21-042 ".to_string()), "rollNumber").unwrap();
        assert_eq!(value, "CS-21-042");
    }

    #[test]
    fn test_require_trimmed_rejects_missing() {
        let err = require_trimmed(None, "username").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_require_trimmed_rejects_blank() {
        let err = require_trimmed(Some("   ".to_string()), "email").unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("email")));
    }
}
