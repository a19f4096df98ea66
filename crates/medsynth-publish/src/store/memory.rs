use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::errors::PublishError;

use super::{ObjectInfo, ObjectStore};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

type Buckets = BTreeMap<String, BTreeMap<String, StoredObject>>;

/// Process-local store used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: Mutex<Buckets>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content type recorded for `key`, if present.
    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        let buckets = self.lock().ok()?;
        buckets
            .get(bucket)?
            .get(key)
            .map(|object| object.content_type.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Buckets>, PublishError> {
        self.buckets
            .lock()
            .map_err(|_| PublishError::backend("lock", "memory store poisoned"))
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_buckets(&self) -> Result<Vec<String>, PublishError> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, PublishError> {
        Ok(self.lock()?.contains_key(bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), PublishError> {
        self.lock()?.entry(bucket.to_string()).or_default();
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectInfo>, PublishError> {
        let buckets = self.lock()?;
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| PublishError::NoSuchBucket(bucket.to_string()))?;
        Ok(objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| ObjectInfo {
                key: key.clone(),
                size: object.data.len() as u64,
            })
            .collect())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), PublishError> {
        let mut buckets = self.lock()?;
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| PublishError::NoSuchBucket(bucket.to_string()))?;
        objects.remove(key);
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PublishError> {
        let mut buckets = self.lock()?;
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| PublishError::NoSuchBucket(bucket.to_string()))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                data: body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, PublishError> {
        let buckets = self.lock()?;
        buckets
            .get(bucket)
            .ok_or_else(|| PublishError::NoSuchBucket(bucket.to_string()))?
            .get(key)
            .map(|object| object.data.clone())
            .ok_or_else(|| PublishError::NoSuchObject {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}
