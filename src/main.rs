use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use capitals_etl::config::{ApiConfig, DatabaseConfig, ExportConfig, MinioConfig};
use capitals_etl::constants::FETCH_OUTPUT_FILE;
use capitals_etl::database::PostgresDatabase;
use capitals_etl::http::ReqwestFetch;
use capitals_etl::logging;
use capitals_etl::object_store::S3ObjectStore;
use capitals_etl::pipeline::{run_pipeline, PipelineConfig, PipelineDeps};
use capitals_etl::stages;

#[derive(Parser)]
#[command(name = "capitals_etl")]
#[command(about = "Five-stage capitals ETL pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all five stages in order
    Run,
    /// Fetch the API payload and save it as a local CSV
    Fetch {
        /// Where to write the fetched CSV
        #[arg(long, default_value = FETCH_OUTPUT_FILE)]
        output: PathBuf,
    },
    /// Normalize raw bucket CSVs into the clean bucket
    RawToClean,
    /// Load clean bucket CSVs into the database
    CleanToDb,
    /// Export every base table to the export store
    DbToExport,
    /// Mirror the exported clean file into the gold bucket
    ExportToGold,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => {
            println!("🚀 Running full pipeline...");
            let config = PipelineConfig::from_env()?;
            let database = DatabaseConfig::from_env()?;
            let deps = PipelineDeps::from_configs(&config.minio, &database, &config.export).await?;
            run_pipeline(&deps, &config).await
        }
        Commands::Fetch { output } => {
            println!("📥 Running fetch stage...");
            let config = ApiConfig::from_env()?;
            let http = ReqwestFetch::new();
            stages::fetch::fetch_api_data(&http, &config, Some(&output))
                .await
                .map(|_| ())
        }
        Commands::RawToClean => {
            println!("🚚 Running raw -> clean stage...");
            let config = MinioConfig::from_env()?;
            let store = S3ObjectStore::for_minio(&config);
            stages::raw_to_clean::transfer_raw_to_clean(&store, &config).await
        }
        Commands::CleanToDb => {
            println!("🚚 Running clean -> database stage...");
            let minio = MinioConfig::from_env()?;
            let store = S3ObjectStore::for_minio(&minio);
            let database = PostgresDatabase::connect(&DatabaseConfig::from_env()?).await?;
            stages::clean_to_db::transfer_clean_to_db(&store, &database).await
        }
        Commands::DbToExport => {
            println!("🚚 Running database -> export stage...");
            let export = ExportConfig::from_env()?;
            let database = PostgresDatabase::connect(&DatabaseConfig::from_env()?).await?;
            let store = S3ObjectStore::for_aws_profile(&export).await;
            stages::db_to_export::transfer_db_to_export(&database, &store, &export).await
        }
        Commands::ExportToGold => {
            println!("🚚 Running export -> gold stage...");
            let export = ExportConfig::from_env()?;
            let minio = MinioConfig::from_env()?;
            let export_store = S3ObjectStore::for_aws_profile(&export).await;
            let primary_store = S3ObjectStore::for_minio(&minio);
            stages::export_to_gold::transfer_export_to_gold(&export_store, &primary_store, &export)
                .await
        }
    };

    if let Err(e) = &result {
        error!("Pipeline failed: {}", e);
        println!("❌ Failed: {}", e);
    } else {
        println!("✅ Completed successfully");
    }

    result.map_err(Into::into)
}
