//! S3-compatible object store wrapper.

use aws_sdk_s3::primitives::ByteStream;

/// Errors surfaced by the storage adapter. All map to the Infrastructure
/// (500) class at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object upload failed for {key}: {message}")]
    Upload { key: String, message: String },

    #[error("Object delete failed: {0}")]
    Delete(String),

    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Handle to one bucket of an S3-compatible object store.
///
/// Objects are public-read; `public_base_url` is the CDN/storage host under
/// which uploaded keys are reachable.
#[derive(Clone)]
pub struct ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a store from the ambient AWS environment plus `S3_BUCKET`,
    /// `S3_PUBLIC_URL`, and an optional `S3_ENDPOINT` override for
    /// S3-compatible providers.
    ///
    /// # Panics
    ///
    /// Panics if `S3_BUCKET` or `S3_PUBLIC_URL` is unset; storage is a
    /// required dependency and misconfiguration must fail startup.
    pub async fn from_env() -> Self {
        let bucket = std::env::var("S3_BUCKET").expect("S3_BUCKET must be set");
        let public_base_url = std::env::var("S3_PUBLIC_URL").expect("S3_PUBLIC_URL must be set");

        let base = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_s3::config::Builder::from(&base).force_path_style(true);
        if let Ok(endpoint) = std::env::var("S3_ENDPOINT") {
            builder = builder.endpoint_url(endpoint);
        }
        let client = aws_sdk_s3::Client::from_conf(builder.build());

        Self::new(client, bucket, public_base_url)
    }

    /// Public URL for a stored key.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket, key)
    }

    /// Recover the object key from one of our public URLs. Returns `None`
    /// for foreign URLs, which are skipped by bulk deletes.
    pub fn key_from_url(&self, url: &str) -> Option<String> {
        let prefix = format!("{}/{}/", self.public_base_url, self.bucket);
        url.strip_prefix(&prefix).map(|key| key.to_string())
    }

    /// Upload bytes under `key`, returning the public URL.
    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(self.public_url(key))
    }

    /// Delete an object. Missing keys are treated as success.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete(e.to_string()))?;
        Ok(())
    }

    /// Best-effort bulk delete of every URL that belongs to this store.
    /// Failures are logged and skipped; image cleanup must never block a
    /// property delete.
    pub async fn delete_urls(&self, urls: &[String]) {
        for url in urls {
            let Some(key) = self.key_from_url(url) else {
                continue;
            };
            if let Err(e) = self.delete(&key).await {
                tracing::warn!(url, error = %e, "Failed to delete stored object");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ObjectStore {
        let conf = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .build();
        ObjectStore::new(
            aws_sdk_s3::Client::from_conf(conf),
            "property-images".into(),
            "https://storage.example.com/".into(),
        )
    }

    #[test]
    fn public_url_round_trip() {
        let store = store();
        let url = store.public_url("properties/p1/123-thumb.jpg");
        assert_eq!(
            url,
            "https://storage.example.com/property-images/properties/p1/123-thumb.jpg"
        );
        assert_eq!(
            store.key_from_url(&url).as_deref(),
            Some("properties/p1/123-thumb.jpg")
        );
    }

    #[test]
    fn foreign_urls_yield_no_key() {
        let store = store();
        assert_eq!(store.key_from_url("https://elsewhere.net/x.jpg"), None);
    }
}
