use crate::error::Result;
use crate::record::RecordSet;
use async_trait::async_trait;

/// Result of a plain HTTP GET, before any status handling.
#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

/// A bucket/key byte store. Both the primary (MinIO) store and the export
/// (S3) store sit behind this trait.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool>;
    async fn create_bucket(&self, bucket: &str) -> Result<()>;
    /// Keys of every object in the bucket, in listing order.
    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>>;
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
    async fn put_object(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Explicit existence check driving a create-if-absent step.
    async fn ensure_bucket(&self, bucket: &str) -> Result<()> {
        if self.bucket_exists(bucket).await? {
            tracing::info!("Bucket '{}' already exists", bucket);
        } else {
            self.create_bucket(bucket).await?;
            tracing::info!("Created bucket '{}'", bucket);
        }
        Ok(())
    }
}

/// The relational store. Unquoted identifiers fold to lower case, so a
/// replaced table ends up with lower-cased column names regardless of the
/// casing in the source record set.
#[async_trait]
pub trait Database: Send + Sync {
    /// Drops any existing table of that name, recreates it with every column
    /// typed as TEXT, and bulk-inserts all rows in one batched statement.
    /// Returns the number of rows inserted.
    async fn replace_table(&self, table: &str, records: &RecordSet) -> Result<u64>;

    /// Names of all base tables in the default schema.
    async fn list_base_tables(&self) -> Result<Vec<String>>;

    /// All rows of a table, columns in ordinal position order.
    async fn read_table(&self, table: &str) -> Result<RecordSet>;
}
