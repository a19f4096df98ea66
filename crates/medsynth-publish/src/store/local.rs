use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::PublishError;

use super::{ObjectInfo, ObjectStore};

/// Store backed by a local directory: one subdirectory per bucket, one file
/// per object. Keys containing `/` map to nested directories.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, PublishError> {
        if bucket.is_empty() || !is_plain_relative(Path::new(bucket)) || bucket.contains('/') {
            return Err(PublishError::InvalidKey(bucket.to_string()));
        }
        Ok(self.root.join(bucket))
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, PublishError> {
        let relative = Path::new(key);
        if key.is_empty() || key.ends_with('/') || !is_plain_relative(relative) {
            return Err(PublishError::InvalidKey(key.to_string()));
        }
        Ok(self.bucket_dir(bucket)?.join(relative))
    }

    async fn existing_bucket_dir(&self, bucket: &str) -> Result<PathBuf, PublishError> {
        let dir = self.bucket_dir(bucket)?;
        if !fs::try_exists(&dir).await? {
            return Err(PublishError::NoSuchBucket(bucket.to_string()));
        }
        Ok(dir)
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn backend(&self) -> &'static str {
        "local"
    }

    async fn list_buckets(&self) -> Result<Vec<String>, PublishError> {
        if !fs::try_exists(&self.root).await? {
            return Ok(Vec::new());
        }
        let mut buckets = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                buckets.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        buckets.sort();
        Ok(buckets)
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, PublishError> {
        Ok(fs::try_exists(self.bucket_dir(bucket)?).await?)
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), PublishError> {
        fs::create_dir_all(self.bucket_dir(bucket)?).await?;
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectInfo>, PublishError> {
        let bucket_dir = self.existing_bucket_dir(bucket).await?;
        let mut objects = Vec::new();
        let mut pending = vec![bucket_dir.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }
                // Staging files are listed too, so a clear also drops
                // leftovers from an interrupted write.
                let key = object_key(&bucket_dir, &path);
                if key.starts_with(prefix) {
                    let size = entry.metadata().await?.len();
                    objects.push(ObjectInfo { key, size });
                }
            }
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), PublishError> {
        let path = self.object_path(bucket, key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), PublishError> {
        self.existing_bucket_dir(bucket).await?;
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let tmp_path = temp_path(&path, key)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&tmp_path)
            .await?;
        file.write_all(&body).await?;
        file.sync_all().await?;
        fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, PublishError> {
        self.existing_bucket_dir(bucket).await?;
        let path = self.object_path(bucket, key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(PublishError::NoSuchObject {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn is_plain_relative(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_)))
}

fn object_key(bucket_dir: &Path, path: &Path) -> String {
    path.strip_prefix(bucket_dir)
        .unwrap_or(path)
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn temp_path(path: &Path, key: &str) -> Result<PathBuf, PublishError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| PublishError::InvalidKey(key.to_string()))?;
    Ok(path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_keys_escaping_the_bucket() {
        let store = LocalStore::new("/tmp/medsynth-unused");
        assert!(store.object_path("bucket", "../outside.csv").is_err());
        assert!(store.object_path("bucket", "/etc/passwd").is_err());
        assert!(store.object_path("bucket", "dev/").is_err());
        assert!(store.object_path("bucket", "dev/patient_data.csv").is_ok());
        assert!(store.bucket_dir("a/b").is_err());
    }

    #[test]
    fn builds_slash_separated_keys() {
        let root = Path::new("/data/bucket");
        let key = object_key(root, &root.join("dev").join("ehr_data.json"));
        assert_eq!(key, "dev/ehr_data.json");
    }
}
