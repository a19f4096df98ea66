mod local;
mod memory;
mod s3;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use s3::{S3Settings, S3Store};

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::PublishError;

/// Metadata of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectInfo {
    pub key: String,
    pub size: u64,
}

/// Client handle for a bucket-oriented object store.
///
/// Every call is a single attempt; implementations never retry.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Backend identifier (e.g. `s3`).
    fn backend(&self) -> &'static str;

    /// List bucket names visible to the client's credentials.
    async fn list_buckets(&self) -> Result<Vec<String>, PublishError>;

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, PublishError>;

    async fn create_bucket(&self, bucket: &str) -> Result<(), PublishError>;

    /// List every object whose key starts with `prefix`, sorted by key.
    async fn list_objects(&self, bucket: &str, prefix: &str)
    -> Result<Vec<ObjectInfo>, PublishError>;

    /// Delete one object. Deleting a missing key is not an error.
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), PublishError>;

    /// Write `body` at `key`, replacing any existing object.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PublishError>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, PublishError>;

    /// Release the client. The handle must not be used afterwards.
    async fn close(&self) -> Result<(), PublishError> {
        Ok(())
    }
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for Box<T> {
    fn backend(&self) -> &'static str {
        (**self).backend()
    }

    async fn list_buckets(&self) -> Result<Vec<String>, PublishError> {
        (**self).list_buckets().await
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, PublishError> {
        (**self).bucket_exists(bucket).await
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), PublishError> {
        (**self).create_bucket(bucket).await
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectInfo>, PublishError> {
        (**self).list_objects(bucket, prefix).await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), PublishError> {
        (**self).delete_object(bucket, key).await
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PublishError> {
        (**self).put_object(bucket, key, body, content_type).await
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, PublishError> {
        (**self).get_object(bucket, key).await
    }

    async fn close(&self) -> Result<(), PublishError> {
        (**self).close().await
    }
}
