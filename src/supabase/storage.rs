//! Object storage client
//!
//! Uploads go to the backend's storage API with the service-role key; the
//! resulting objects are served from the bucket's public URL space.

use async_trait::async_trait;

use super::client::Supabase;
use super::error::SupabaseError;

/// Seam between the upload service and the storage backend
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object and return its public URL
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, SupabaseError>;
}

/// Storage client bound to one bucket
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: Supabase,
    bucket: String,
}

impl StorageClient {
    pub fn new(client: Supabase, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
        }
    }

    /// Public URL for an object in this bucket
    pub fn public_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.client.base_url(),
            self.bucket,
            encoded.join("/")
        )
    }
}

#[async_trait]
impl ObjectStore for StorageClient {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, SupabaseError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.client.base_url(),
            self.bucket,
            path
        );
        let response = self
            .client
            .http()
            .post(&url)
            .headers(self.client.auth_headers())
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SupabaseError::from_response(status.as_u16(), &body));
        }
        Ok(self.public_url(path))
    }
}
