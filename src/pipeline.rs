use crate::config::{ApiConfig, DatabaseConfig, ExportConfig, MinioConfig};
use crate::constants::FETCH_OUTPUT_FILE;
use crate::database::PostgresDatabase;
use crate::error::Result;
use crate::http::ReqwestFetch;
use crate::object_store::S3ObjectStore;
use crate::ports::{Database, HttpFetch, ObjectStore};
use crate::stages;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// The pipeline's external collaborators behind their ports.
pub struct PipelineDeps {
    pub http: Arc<dyn HttpFetch>,
    pub primary_store: Arc<dyn ObjectStore>,
    pub export_store: Arc<dyn ObjectStore>,
    pub database: Arc<dyn Database>,
}

impl PipelineDeps {
    /// Production wiring: reqwest, MinIO, AWS S3, Postgres.
    pub async fn from_configs(
        minio: &MinioConfig,
        database: &DatabaseConfig,
        export: &ExportConfig,
    ) -> Result<Self> {
        Ok(Self {
            http: Arc::new(ReqwestFetch::new()),
            primary_store: Arc::new(S3ObjectStore::for_minio(minio)),
            export_store: Arc::new(S3ObjectStore::for_aws_profile(export).await),
            database: Arc::new(PostgresDatabase::connect(database).await?),
        })
    }
}

/// All stage configuration, read once up front.
pub struct PipelineConfig {
    pub api: ApiConfig,
    pub minio: MinioConfig,
    pub export: ExportConfig,
    pub output_file: PathBuf,
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api: ApiConfig::from_env()?,
            minio: MinioConfig::from_env()?,
            export: ExportConfig::from_env()?,
            output_file: PathBuf::from(FETCH_OUTPUT_FILE),
        })
    }
}

/// Runs all five stages in fixed order. Each stage fully completes before
/// the next begins; the first error aborts the run.
pub async fn run_pipeline(deps: &PipelineDeps, config: &PipelineConfig) -> Result<()> {
    info!("🐐 Starting pipeline.");
    let records = stages::fetch::fetch_api_data(
        deps.http.as_ref(),
        &config.api,
        Some(&config.output_file),
    )
    .await?;
    // Stage the fetched rows into the raw bucket so the rest of the path
    // has input without an out-of-band upload.
    if !records.is_empty() {
        deps.primary_store
            .ensure_bucket(&config.minio.raw_bucket)
            .await?;
        deps.primary_store
            .put_object(
                &config.minio.raw_bucket,
                FETCH_OUTPUT_FILE,
                records.to_csv_bytes()?,
            )
            .await?;
        info!(
            "Staged {} rows into raw bucket '{}'",
            records.len(),
            config.minio.raw_bucket
        );
    }
    info!("✅ API data retrieval completed.");

    info!("🚚 Starting transfer from raw to clean bucket.");
    stages::raw_to_clean::transfer_raw_to_clean(deps.primary_store.as_ref(), &config.minio).await?;
    info!("✅ Transfer from raw to clean bucket completed.");

    info!("🚚 Starting transfer from clean bucket to database.");
    stages::clean_to_db::transfer_clean_to_db(
        deps.primary_store.as_ref(),
        deps.database.as_ref(),
    )
    .await?;
    info!("✅ Transfer from clean bucket to database completed.");

    info!("🚚 Starting transfer from database to export store.");
    stages::db_to_export::transfer_db_to_export(
        deps.database.as_ref(),
        deps.export_store.as_ref(),
        &config.export,
    )
    .await?;
    info!("✅ Transfer from database to export store completed.");

    info!("🚚 Starting transfer from export store to gold bucket.");
    stages::export_to_gold::transfer_export_to_gold(
        deps.export_store.as_ref(),
        deps.primary_store.as_ref(),
        &config.export,
    )
    .await?;
    info!("✅ Transfer from export store to gold bucket completed.");

    info!("🏁 Pipeline finished.");
    Ok(())
}
