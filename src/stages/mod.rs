pub mod clean_to_db;
pub mod db_to_export;
pub mod export_to_gold;
pub mod fetch;
pub mod raw_to_clean;
