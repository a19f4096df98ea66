//! S3-compatible object store.
//!
//! Works against AWS S3 and against any S3-interoperable endpoint (for
//! example Google Cloud Storage at `https://storage.googleapis.com` with HMAC
//! keys) when `endpoint` is set.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use serde::{Deserialize, Serialize};

use crate::errors::PublishError;

use super::{ObjectInfo, ObjectStore};

/// Connection settings for [`S3Store`]. Credentials come from the standard
/// AWS provider chain (environment, profile, instance metadata).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Settings {
    /// Custom endpoint URL; path-style addressing is used when set.
    pub endpoint: Option<String>,
    pub region: Option<String>,
}

/// Shared S3 client. Construct once per run and pass it down.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    region: Option<String>,
}

impl S3Store {
    /// Load AWS configuration and build the client.
    pub async fn connect(settings: &S3Settings) -> Result<Self, PublishError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let region = sdk_config.region().map(|region| region.to_string());
        tracing::debug!(
            endpoint = settings.endpoint.as_deref().unwrap_or("default"),
            region = region.as_deref().unwrap_or("unset"),
            "s3 client configured"
        );

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            region,
        })
    }

    fn location_constraint(&self) -> Option<CreateBucketConfiguration> {
        let region = self.region.as_deref()?;
        if region == "us-east-1" || region == "auto" {
            return None;
        }
        Some(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region))
                .build(),
        )
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn backend(&self) -> &'static str {
        "s3"
    }

    async fn list_buckets(&self) -> Result<Vec<String>, PublishError> {
        let response = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|err| {
                PublishError::backend("list buckets", DisplayErrorContext(err).to_string())
            })?;

        Ok(response
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect())
    }

    async fn bucket_exists(&self, bucket: &str) -> Result<bool, PublishError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                if err
                    .as_service_error()
                    .map(|service| service.is_not_found())
                    .unwrap_or(false)
                {
                    Ok(false)
                } else {
                    Err(PublishError::backend(
                        "head bucket",
                        format!("s3://{bucket}: {}", DisplayErrorContext(err)),
                    ))
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), PublishError> {
        self.client
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(self.location_constraint())
            .send()
            .await
            .map_err(|err| {
                PublishError::backend(
                    "create bucket",
                    format!("s3://{bucket}: {}", DisplayErrorContext(err)),
                )
            })?;
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectInfo>, PublishError> {
        let mut results = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(bucket).prefix(prefix);
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|err| {
                PublishError::backend(
                    "list objects",
                    format!("s3://{bucket}/{prefix}: {}", DisplayErrorContext(err)),
                )
            })?;

            for object in response.contents() {
                if let Some(key) = object.key() {
                    results.push(ObjectInfo {
                        key: key.to_string(),
                        size: object.size().unwrap_or(0).max(0) as u64,
                    });
                }
            }

            continuation_token =
                next_page_token(response.is_truncated(), response.next_continuation_token());
            if continuation_token.is_none() {
                break;
            }
        }

        results.sort_by(|a, b| a.key.cmp(&b.key));
        tracing::debug!(
            objects = results.len(),
            "listed s3://{}/{}",
            bucket,
            prefix
        );
        Ok(results)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), PublishError> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                PublishError::backend(
                    "delete object",
                    format!("s3://{bucket}/{key}: {}", DisplayErrorContext(err)),
                )
            })?;
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PublishError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|err| {
                PublishError::backend(
                    "put object",
                    format!("s3://{bucket}/{key}: {}", DisplayErrorContext(err)),
                )
            })?;
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, PublishError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                PublishError::backend(
                    "get object",
                    format!("s3://{bucket}/{key}: {}", DisplayErrorContext(err)),
                )
            })?;

        let data = response.body.collect().await.map_err(|err| {
            PublishError::backend("get object", format!("s3://{bucket}/{key}: {err}"))
        })?;
        Ok(data.into_bytes().to_vec())
    }
}

/// Token for the next listing page. A truncated response without a token
/// ends the listing instead of restarting from the first page.
fn next_page_token(is_truncated: Option<bool>, token: Option<&str>) -> Option<String> {
    match (is_truncated, token) {
        (Some(true), Some(token)) if !token.is_empty() => Some(token.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continues_only_with_a_token() {
        assert_eq!(next_page_token(Some(true), Some("abc")).as_deref(), Some("abc"));
        assert_eq!(next_page_token(Some(true), None), None);
        assert_eq!(next_page_token(Some(true), Some("")), None);
        assert_eq!(next_page_token(Some(false), Some("abc")), None);
        assert_eq!(next_page_token(None, None), None);
    }
}
