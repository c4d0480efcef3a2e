use crate::config::{ExportConfig, MinioConfig};
use crate::error::{EtlError, Result};
use crate::ports::ObjectStore;
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use tracing::debug;

/// S3-compatible object store. Serves both the MinIO-style primary store
/// (custom endpoint, static credentials, path-style addressing) and the AWS
/// export store (named profile + region).
pub struct S3ObjectStore {
    client: Client,
}

fn store_err(context: &str, err: impl std::error::Error + Send + Sync + 'static) -> EtlError {
    EtlError::ObjectStore(format!("{}: {}", context, DisplayErrorContext(&err)))
}

impl S3ObjectStore {
    /// Client for the primary store. MinIO needs path-style addressing.
    pub fn for_minio(config: &MinioConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "minio",
        );
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url(config.endpoint.clone())
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();
        Self {
            client: Client::from_conf(s3_config),
        }
    }

    /// Client for the export store, resolved from a named AWS profile.
    pub async fn for_aws_profile(config: &ExportConfig) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(&config.profile)
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err)
                if err
                    .as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false) =>
            {
                Ok(false)
            }
            Err(err) => Err(store_err(&format!("head_bucket '{}'", bucket), err)),
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.client
            .create_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| store_err(&format!("create_bucket '{}'", bucket), e))?;
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| store_err(&format!("list_objects '{}'", bucket), e))?;
        let keys = response
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect();
        Ok(keys)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| store_err(&format!("get_object '{}/{}'", bucket, key), e))?;
        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| store_err(&format!("read body of '{}/{}'", bucket, key), e))?;
        Ok(bytes.into_bytes().to_vec())
    }

    async fn put_object(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| store_err(&format!("put_object '{}/{}'", bucket, key), e))?;
        Ok(())
    }
}

/// In-memory object store for development and testing. Objects list in key
/// order, which keeps tests deterministic.
#[derive(Default)]
pub struct InMemoryObjectStore {
    buckets: Mutex<HashMap<String, BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        Ok(self.buckets.lock().unwrap().contains_key(bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.buckets
            .lock()
            .unwrap()
            .entry(bucket.to_string())
            .or_default();
        debug!("Created in-memory bucket '{}'", bucket);
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        let buckets = self.buckets.lock().unwrap();
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| EtlError::ObjectStore(format!("no such bucket '{}'", bucket)))?;
        Ok(objects.keys().cloned().collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let buckets = self.buckets.lock().unwrap();
        buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
            .ok_or_else(|| EtlError::ObjectStore(format!("no such object '{}/{}'", bucket, key)))
    }

    async fn put_object(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<()> {
        let mut buckets = self.buckets.lock().unwrap();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| EtlError::ObjectStore(format!("no such bucket '{}'", bucket)))?;
        objects.insert(key.to_string(), bytes);
        Ok(())
    }
}
