pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod http;
pub mod logging;
pub mod object_store;
pub mod pipeline;
pub mod ports;
pub mod record;
pub mod stages;
