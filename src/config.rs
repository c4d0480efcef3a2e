use crate::constants::DEFAULT_RAW_BUCKET;
use crate::error::{EtlError, Result};

fn required(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| EtlError::Config(format!("Missing required environment variable '{}'", name)))
}

/// Source API settings for the fetch stage.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: required("API_BASE_URL")?,
        })
    }
}

/// Primary (MinIO-style) object store settings.
#[derive(Debug, Clone)]
pub struct MinioConfig {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub raw_bucket: String,
}

impl MinioConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            endpoint: std::env::var("MINIO_URL")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            access_key: required("MINIO_ACCESS_KEY")?,
            secret_key: required("MINIO_SECRET_KEY")?,
            raw_bucket: std::env::var("BUCKET_NAME")
                .unwrap_or_else(|_| DEFAULT_RAW_BUCKET.to_string()),
        })
    }
}

/// Relational store settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        let port = required("DB_PORT")?;
        let port = port
            .parse::<u16>()
            .map_err(|_| EtlError::Config(format!("DB_PORT is not a valid port: '{}'", port)))?;
        Ok(Self {
            host: required("DB_HOST")?,
            port,
            name: required("DB_NAME")?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
        })
    }

    /// Connection URL in the form sqlx expects.
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

/// Secondary (AWS S3) export store settings.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub profile: String,
    pub region: String,
    pub bucket: String,
    pub folder_prefix: String,
}

impl ExportConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            profile: required("AWS_PROFILE")?,
            region: required("AWS_REGION")?,
            bucket: required("S3_BUCKET_NAME")?,
            folder_prefix: std::env::var("S3_FOLDER_PREFIX").unwrap_or_default(),
        })
    }

    /// Key for `name` under the configured folder prefix, if any.
    pub fn prefixed_key(&self, name: &str) -> String {
        if self.folder_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.folder_prefix.trim_end_matches('/'), name)
        }
    }
}
