use crate::constants::CLEAN_BUCKET;
use crate::error::Result;
use crate::ports::{Database, ObjectStore};
use crate::record::RecordSet;
use tracing::{info, instrument};

/// Object key to table name: strip the `.csv` extension, lower-case the rest.
fn table_name_for(key: &str) -> String {
    key.strip_suffix(".csv").unwrap_or(key).to_lowercase()
}

/// Loads every CSV object in the clean bucket into the relational store.
/// Each file gets its own drop-then-create all-TEXT table, committed per
/// file.
#[instrument(skip(store, database))]
pub async fn transfer_clean_to_db(store: &dyn ObjectStore, database: &dyn Database) -> Result<()> {
    let keys = store.list_objects(CLEAN_BUCKET).await?;
    if keys.is_empty() {
        info!("No files found in clean bucket");
        return Ok(());
    }

    for key in &keys {
        info!("Processing: {}", key);

        let bytes = store.get_object(CLEAN_BUCKET, key).await?;
        let records = RecordSet::from_csv(&bytes)?;
        let table = table_name_for(key);

        let inserted = database.replace_table(&table, &records).await?;
        info!("Inserted {} rows into {}", inserted, table);
    }

    info!("Transfer to database completed!");
    Ok(())
}
