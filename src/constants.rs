/// Fixed bucket and object names shared across stages.
///
/// The clean and gold buckets are not configurable; the raw bucket name comes
/// from the environment with `raw` as fallback (see `config::MinioConfig`).

/// Bucket the clean stage writes into.
pub const CLEAN_BUCKET: &str = "clean";

/// Bucket the final mirror stage writes into.
pub const GOLD_BUCKET: &str = "gold";

/// Fallback name for the raw bucket when `BUCKET_NAME` is unset.
pub const DEFAULT_RAW_BUCKET: &str = "raw";

/// Fixed output key for the raw->clean stage. Every processed raw object is
/// written under this one key, so with multiple raw objects the last one
/// processed wins.
pub const CLEAN_OBJECT_KEY: &str = "capitals_clean.csv";

/// Default path for the local CSV written by the fetch stage.
pub const FETCH_OUTPUT_FILE: &str = "capitals.csv";
