use crate::config::ExportConfig;
use crate::constants::{CLEAN_OBJECT_KEY, GOLD_BUCKET};
use crate::error::Result;
use crate::ports::ObjectStore;
use tracing::{info, instrument};

/// Mirrors the one exported clean file from the export store back into the
/// primary store's gold bucket, bytes untouched.
#[instrument(skip(export_store, primary_store, config), fields(bucket = %config.bucket))]
pub async fn transfer_export_to_gold(
    export_store: &dyn ObjectStore,
    primary_store: &dyn ObjectStore,
    config: &ExportConfig,
) -> Result<()> {
    primary_store.ensure_bucket(GOLD_BUCKET).await?;

    let source_key = config.prefixed_key(CLEAN_OBJECT_KEY);
    info!(
        "Attempting to download '{}' from export bucket '{}'",
        source_key, config.bucket
    );
    let bytes = export_store.get_object(&config.bucket, &source_key).await?;
    info!("Successfully downloaded '{}'", source_key);

    primary_store
        .put_object(GOLD_BUCKET, CLEAN_OBJECT_KEY, bytes)
        .await?;
    info!(
        "Transfer completed! '{}' mirrored into the gold bucket",
        CLEAN_OBJECT_KEY
    );
    Ok(())
}
