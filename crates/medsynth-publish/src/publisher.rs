use std::time::Instant;

use tracing::{debug, info};

use medsynth_generate::{ArtifactFormat, Collection};

use crate::errors::PublishError;
use crate::report::ArtifactReport;
use crate::store::{ObjectInfo, ObjectStore};

/// Whether `ensure_target_exists` had to create the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Created,
    AlreadyExists,
}

/// Publishes encoded collections into one bucket.
///
/// Owns the store client for the duration of a run; call [`Publisher::close`]
/// when done.
pub struct Publisher<S: ObjectStore> {
    store: S,
    bucket: String,
}

impl<S: ObjectStore> Publisher<S> {
    pub fn new(store: S, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// List visible buckets. Any failure is reported as a connection error.
    pub async fn verify_connection(&self) -> Result<Vec<String>, PublishError> {
        let buckets = self
            .store
            .list_buckets()
            .await
            .map_err(|err| PublishError::Connection(err.to_string()))?;
        info!(
            event = "storage_connected",
            backend = self.store.backend(),
            buckets = ?buckets,
            "connected to storage"
        );
        Ok(buckets)
    }

    /// Create the bucket unless it already exists.
    pub async fn ensure_target_exists(&self) -> Result<TargetState, PublishError> {
        if self.store.bucket_exists(&self.bucket).await? {
            info!(event = "bucket_exists", bucket = %self.bucket);
            return Ok(TargetState::AlreadyExists);
        }
        self.store.create_bucket(&self.bucket).await?;
        info!(event = "bucket_created", bucket = %self.bucket);
        Ok(TargetState::Created)
    }

    pub async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, PublishError> {
        self.store.list_objects(&self.bucket, prefix).await
    }

    /// Delete every object under `prefix`. Returns the number deleted.
    pub async fn clear(&self, prefix: &str) -> Result<usize, PublishError> {
        info!(event = "clear_started", bucket = %self.bucket, prefix);
        let objects = self.list(prefix).await?;
        for object in &objects {
            self.store.delete_object(&self.bucket, &object.key).await?;
            debug!(event = "object_deleted", key = %object.key);
        }
        info!(
            event = "clear_finished",
            prefix,
            deleted = objects.len()
        );
        Ok(objects.len())
    }

    /// Encode `collection` as `format` and upload it to `prefix + filename`.
    ///
    /// One upload attempt; a failure is returned as-is.
    pub async fn publish(
        &self,
        collection: Collection<'_>,
        prefix: &str,
        filename: &str,
        format: ArtifactFormat,
    ) -> Result<ArtifactReport, PublishError> {
        let start = Instant::now();
        let key = format!("{prefix}{filename}");
        info!(
            event = "upload_started",
            key = %key,
            collection = collection.name(),
            format = %format
        );

        let body = collection.encode(format)?;
        let bytes = body.len() as u64;
        self.store
            .put_object(&self.bucket, &key, body, format.content_type())
            .await?;

        info!(
            event = "upload_finished",
            key = %key,
            rows = collection.len(),
            bytes,
            duration_ms = start.elapsed().as_millis() as u64
        );

        Ok(ArtifactReport {
            key,
            collection: collection.name().to_string(),
            format,
            content_type: format.content_type().to_string(),
            rows: collection.len(),
            bytes,
        })
    }

    /// Close the underlying client.
    pub async fn close(self) -> Result<(), PublishError> {
        self.store.close().await
    }
}
