//! Document upload gateway.
//!
//! Everything the core persists as a "document URL" goes through the
//! `DocumentUploader` trait; the production backend is S3 (MinIO locally,
//! AWS in production). Handlers never touch the SDK directly.
//!
//! `AppState` holds an `Arc<dyn DocumentUploader>`.

use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

/// A file part lifted out of a multipart request body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Bytes,
}

/// Converts file bytes into a durable URL. Implement this to swap storage
/// backends without touching the endpoint, handler, or caller code.
#[async_trait]
pub trait DocumentUploader: Send + Sync {
    async fn upload(&self, key: &str, file: &UploadedFile) -> Result<String>;
}

pub struct S3DocumentStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3DocumentStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl DocumentUploader for S3DocumentStore {
    async fn upload(&self, key: &str, file: &UploadedFile) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(file.data.clone()))
            .content_type(&file.content_type)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("S3 upload failed: {e}"))?;

        info!("Uploaded document to s3://{}/{}", self.bucket, key);

        Ok(format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            key
        ))
    }
}
