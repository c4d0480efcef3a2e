use crate::config::ExportConfig;
use crate::error::Result;
use crate::ports::{Database, ObjectStore};
use tracing::{info, instrument};

/// Dumps every base table of the default schema to the export store as
/// `<prefix>/<table>.csv`. Full dump every run, no filtering.
#[instrument(skip(database, store, config), fields(bucket = %config.bucket))]
pub async fn transfer_db_to_export(
    database: &dyn Database,
    store: &dyn ObjectStore,
    config: &ExportConfig,
) -> Result<()> {
    let tables = database.list_base_tables().await?;
    if tables.is_empty() {
        info!("No tables found in database");
        return Ok(());
    }

    for table in &tables {
        info!("Processing table: {}", table);

        let records = database.read_table(table).await?;
        info!("Retrieved {} rows from {}", records.len(), table);

        let key = config.prefixed_key(&format!("{}.csv", table));
        store
            .put_object(&config.bucket, &key, records.to_csv_bytes()?)
            .await?;
        info!("Uploaded {} to bucket: {}", key, config.bucket);
    }

    info!("Transfer to export store completed!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryDatabase;
    use crate::object_store::InMemoryObjectStore;
    use crate::record::RecordSet;

    fn export_config() -> ExportConfig {
        ExportConfig {
            profile: "etl".into(),
            region: "us-east-1".into(),
            bucket: "exports".into(),
            folder_prefix: "landing".into(),
        }
    }

    #[tokio::test]
    async fn every_table_becomes_a_prefixed_csv() {
        let database = InMemoryDatabase::new();
        database
            .replace_table(
                "capitals_clean",
                &RecordSet::new(
                    vec!["country".into(), "capital".into()],
                    vec![
                        vec!["France".into(), "Paris".into()],
                        vec!["Japan".into(), "Tokyo".into()],
                    ],
                ),
            )
            .await
            .unwrap();
        let store = InMemoryObjectStore::new();
        store.create_bucket("exports").await.unwrap();

        transfer_db_to_export(&database, &store, &export_config())
            .await
            .unwrap();

        let bytes = store
            .get_object("exports", "landing/capitals_clean.csv")
            .await
            .unwrap();
        assert_eq!(
            bytes,
            b"country,capital\nFrance,Paris\nJapan,Tokyo\n".to_vec()
        );
    }

    #[tokio::test]
    async fn empty_catalog_is_a_no_op() {
        let database = InMemoryDatabase::new();
        let store = InMemoryObjectStore::new();
        store.create_bucket("exports").await.unwrap();

        transfer_db_to_export(&database, &store, &export_config())
            .await
            .unwrap();
        assert!(store.list_objects("exports").await.unwrap().is_empty());
    }
}
