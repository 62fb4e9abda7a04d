//! Image upload service
//!
//! Validates the file before anything touches object storage: a rejected
//! upload never creates an object. Accepted files get a collision-proof
//! storage path and a best-effort audit row.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::models::UploadRecord;
use crate::repositories::UploadRepository;
use crate::supabase::ObjectStore;

/// Error types for upload operations
#[derive(Debug, thiserror::Error)]
pub enum UploadServiceError {
    /// MIME type outside the image allow-list
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// File exceeds the size limit
    #[error("File too large: {size} bytes (limit {max})")]
    TooLarge { size: u64, max: u64 },

    /// Storage or audit failure
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Result of a successful upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    /// Public URL of the stored object
    pub url: String,
    /// Path within the storage bucket
    pub path: String,
}

/// Upload service
pub struct UploadService {
    config: UploadConfig,
    store: Arc<dyn ObjectStore>,
    audit: Arc<dyn UploadRepository>,
}

impl UploadService {
    pub fn new(
        config: UploadConfig,
        store: Arc<dyn ObjectStore>,
        audit: Arc<dyn UploadRepository>,
    ) -> Self {
        Self {
            config,
            store,
            audit,
        }
    }

    /// Validate and store one image, returning its public URL.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
        uploaded_by: Uuid,
    ) -> Result<UploadedFile, UploadServiceError> {
        if !self.config.is_type_allowed(content_type) {
            return Err(UploadServiceError::UnsupportedType(
                content_type.to_string(),
            ));
        }
        let size = data.len() as u64;
        if size > self.config.max_file_size {
            return Err(UploadServiceError::TooLarge {
                size,
                max: self.config.max_file_size,
            });
        }

        // timestamp + uuid keeps concurrent uploads from ever sharing a path
        let path = format!(
            "uploads/{}_{}.{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4(),
            self.config.extension_for(content_type)
        );
        let url = self
            .store
            .put(&path, data, content_type)
            .await
            .map_err(anyhow::Error::from)?;

        // the object is already stored, so an audit failure only gets logged
        let record = UploadRecord {
            file_name: file_name.to_string(),
            file_path: path.clone(),
            file_size: size as i64,
            file_type: content_type.to_string(),
            uploaded_by: Some(uploaded_by),
        };
        if let Err(err) = self.audit.insert(&record).await {
            tracing::warn!(path = %path, error = %err, "failed to record upload audit row");
        }

        Ok(UploadedFile { url, path })
    }
}
