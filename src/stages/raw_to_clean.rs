use crate::config::MinioConfig;
use crate::constants::{CLEAN_BUCKET, CLEAN_OBJECT_KEY};
use crate::error::Result;
use crate::ports::ObjectStore;
use crate::record::RecordSet;
use tracing::{info, instrument, warn};

/// Reads every CSV object in the raw bucket, upper-cases its column names,
/// and writes the result to the clean bucket under the fixed output key.
///
/// With more than one raw object the fixed key means the last object
/// processed wins; that matches the original loader and is logged loudly.
#[instrument(skip(store, config), fields(raw_bucket = %config.raw_bucket))]
pub async fn transfer_raw_to_clean(store: &dyn ObjectStore, config: &MinioConfig) -> Result<()> {
    for bucket in [config.raw_bucket.as_str(), CLEAN_BUCKET] {
        store.ensure_bucket(bucket).await?;
    }

    let keys = store.list_objects(&config.raw_bucket).await?;
    if keys.is_empty() {
        info!("No files found in raw bucket");
        return Ok(());
    }
    if keys.len() > 1 {
        warn!(
            "{} raw objects share the single clean key '{}'; only the last processed survives",
            keys.len(),
            CLEAN_OBJECT_KEY
        );
    }

    for key in &keys {
        info!("Processing: {}", key);

        let bytes = store.get_object(&config.raw_bucket, key).await?;
        let mut records = RecordSet::from_csv(&bytes)?;
        records.uppercase_columns();

        store
            .put_object(CLEAN_BUCKET, CLEAN_OBJECT_KEY, records.to_csv_bytes()?)
            .await?;
        info!("Uploaded: {}", CLEAN_OBJECT_KEY);
    }

    info!("Transfer completed!");
    Ok(())
}
