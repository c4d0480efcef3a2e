use crate::config::ApiConfig;
use crate::error::{EtlError, Result};
use crate::ports::HttpFetch;
use crate::record::RecordSet;
use serde_json::Value;
use std::path::Path;
use tracing::{info, instrument};

/// Pulls a JSON array of uniform objects from the configured endpoint and
/// materializes it as a record set. Optionally persists the result as a
/// local CSV; an empty payload skips the write.
#[instrument(skip(http, config), fields(url = %config.base_url))]
pub async fn fetch_api_data(
    http: &dyn HttpFetch,
    config: &ApiConfig,
    output_file: Option<&Path>,
) -> Result<RecordSet> {
    info!("Fetching data from API: {}", config.base_url);

    let response = http.get(&config.base_url).await?;
    if !(200..300).contains(&response.status) {
        return Err(EtlError::Api {
            message: format!("API returned status {}", response.status),
        });
    }

    let payload: Value = serde_json::from_slice(&response.bytes)?;
    let records = RecordSet::from_json_array(&payload)?;
    info!("Total records fetched: {}", records.len());

    if let Some(path) = output_file {
        if !records.is_empty() {
            records.write_csv_file(path)?;
            info!("Data saved to {}", path.display());
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::HttpGetResult;
    use async_trait::async_trait;

    struct StubFetch {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl HttpFetch for StubFetch {
        async fn get(&self, _url: &str) -> Result<HttpGetResult> {
            Ok(HttpGetResult {
                status: self.status,
                bytes: self.body.as_bytes().to_vec(),
            })
        }
    }

    fn api_config() -> ApiConfig {
        ApiConfig {
            base_url: "http://api.test/capitals".to_string(),
        }
    }

    #[tokio::test]
    async fn payload_rows_and_columns_survive() {
        let http = StubFetch {
            status: 200,
            body: r#"[{"country":"France","capital":"Paris"},{"country":"Japan","capital":"Tokyo"}]"#,
        };
        let records = fetch_api_data(&http, &api_config(), None).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records.columns, vec!["country", "capital"]);
    }

    #[tokio::test]
    async fn non_2xx_status_fails_the_stage() {
        let http = StubFetch {
            status: 503,
            body: "unavailable",
        };
        let err = fetch_api_data(&http, &api_config(), None).await.unwrap_err();
        assert!(matches!(err, EtlError::Api { .. }));
    }

    #[tokio::test]
    async fn malformed_json_fails_the_stage() {
        let http = StubFetch {
            status: 200,
            body: "not json",
        };
        let err = fetch_api_data(&http, &api_config(), None).await.unwrap_err();
        assert!(matches!(err, EtlError::Json(_)));
    }

    #[tokio::test]
    async fn output_file_holds_the_fetched_rows() {
        let http = StubFetch {
            status: 200,
            body: r#"[{"country":"France","capital":"Paris"}]"#,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capitals.csv");
        fetch_api_data(&http, &api_config(), Some(&path))
            .await
            .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "country,capital\nFrance,Paris\n");
    }

    #[tokio::test]
    async fn empty_payload_skips_the_output_file() {
        let http = StubFetch {
            status: 200,
            body: "[]",
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capitals.csv");
        let records = fetch_api_data(&http, &api_config(), Some(&path))
            .await
            .unwrap();
        assert!(records.is_empty());
        assert!(!path.exists());
    }
}
