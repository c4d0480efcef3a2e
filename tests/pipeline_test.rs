use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tempfile::tempdir;

use capitals_etl::config::{ApiConfig, ExportConfig, MinioConfig};
use capitals_etl::constants::{CLEAN_BUCKET, CLEAN_OBJECT_KEY, GOLD_BUCKET};
use capitals_etl::database::InMemoryDatabase;
use capitals_etl::object_store::InMemoryObjectStore;
use capitals_etl::pipeline::{run_pipeline, PipelineConfig, PipelineDeps};
use capitals_etl::ports::{Database, HttpFetch, HttpGetResult, ObjectStore};
use capitals_etl::record::RecordSet;

struct StubApi {
    status: u16,
    body: &'static str,
}

#[async_trait]
impl HttpFetch for StubApi {
    async fn get(&self, _url: &str) -> capitals_etl::error::Result<HttpGetResult> {
        Ok(HttpGetResult {
            status: self.status,
            bytes: self.body.as_bytes().to_vec(),
        })
    }
}

fn test_config(output_file: std::path::PathBuf) -> PipelineConfig {
    PipelineConfig {
        api: ApiConfig {
            base_url: "http://api.test/capitals".into(),
        },
        minio: MinioConfig {
            endpoint: "http://localhost:9000".into(),
            access_key: "test".into(),
            secret_key: "test".into(),
            raw_bucket: "raw".into(),
        },
        export: ExportConfig {
            profile: "etl".into(),
            region: "us-east-1".into(),
            bucket: "exports".into(),
            folder_prefix: "landing".into(),
        },
        output_file,
    }
}

fn test_deps(api: StubApi) -> PipelineDeps {
    PipelineDeps {
        http: Arc::new(api),
        primary_store: Arc::new(InMemoryObjectStore::new()),
        export_store: Arc::new(InMemoryObjectStore::new()),
        database: Arc::new(InMemoryDatabase::new()),
    }
}

#[tokio::test]
async fn full_pipeline_mirrors_the_payload_into_gold() -> Result<()> {
    let api = StubApi {
        status: 200,
        body: r#"[
            {"country": "France", "capital": "Paris"},
            {"country": "Japan", "capital": "Tokyo"}
        ]"#,
    };
    let deps = test_deps(api);
    deps.export_store.create_bucket("exports").await?;

    let dir = tempdir()?;
    let config = test_config(dir.path().join("capitals.csv"));

    run_pipeline(&deps, &config).await?;

    // The fetch stage persisted the local CSV artifact.
    assert!(config.output_file.exists());

    // The clean bucket holds the upper-cased headers.
    let clean = deps
        .primary_store
        .get_object(CLEAN_BUCKET, CLEAN_OBJECT_KEY)
        .await?;
    assert_eq!(
        String::from_utf8(clean)?,
        "COUNTRY,CAPITAL\nFrance,Paris\nJapan,Tokyo\n"
    );

    // The gold object is byte-identical to the export object.
    let exported = deps
        .export_store
        .get_object("exports", "landing/capitals_clean.csv")
        .await?;
    let gold = deps
        .primary_store
        .get_object(GOLD_BUCKET, CLEAN_OBJECT_KEY)
        .await?;
    assert_eq!(gold, exported);

    // Row count and values match the original payload; headers match the
    // payload's columns up to identifier-case folding in the database.
    let records = RecordSet::from_csv(&gold)?;
    assert_eq!(records.len(), 2);
    assert_eq!(records.rows[0], vec!["France", "Paris"]);
    assert_eq!(records.rows[1], vec!["Japan", "Tokyo"]);
    let headers: Vec<String> = records
        .columns
        .iter()
        .map(|c| c.to_lowercase())
        .collect();
    assert_eq!(headers, vec!["country", "capital"]);

    Ok(())
}

#[tokio::test]
async fn failing_api_aborts_before_any_staging() -> Result<()> {
    let api = StubApi {
        status: 500,
        body: "boom",
    };
    let deps = test_deps(api);
    deps.export_store.create_bucket("exports").await?;

    let dir = tempdir()?;
    let config = test_config(dir.path().join("capitals.csv"));

    assert!(run_pipeline(&deps, &config).await.is_err());
    assert!(!config.output_file.exists());
    assert!(!deps.primary_store.bucket_exists("raw").await?);
    Ok(())
}

#[tokio::test]
async fn rerun_overwrites_every_stage_output() -> Result<()> {
    let api = StubApi {
        status: 200,
        body: r#"[{"country": "France", "capital": "Paris"}]"#,
    };
    let deps = test_deps(api);
    deps.export_store.create_bucket("exports").await?;

    let dir = tempdir()?;
    let config = test_config(dir.path().join("capitals.csv"));

    run_pipeline(&deps, &config).await?;
    run_pipeline(&deps, &config).await?;

    // Still exactly one row everywhere; nothing appended.
    let table = deps.database.read_table("capitals_clean").await?;
    assert_eq!(table.len(), 1);
    let gold = deps
        .primary_store
        .get_object(GOLD_BUCKET, CLEAN_OBJECT_KEY)
        .await?;
    assert_eq!(RecordSet::from_csv(&gold)?.len(), 1);
    Ok(())
}
