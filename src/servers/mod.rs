pub mod schemas;
pub mod web_api;

pub use web_api::{ApiConfig, ApiServer};
