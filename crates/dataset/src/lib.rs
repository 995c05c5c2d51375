//! # Budget Lens Dataset
//!
//! Loads the static JSON resource with monthly budget execution figures into the
//! `TimeSeries` model. Each row carries the indicator name under `"INDICATOR Name"`
//! and one field per `YYYY-MM` period holding a thousands-separated number string.

pub mod error;
pub mod loader;

pub use error::DatasetError;
pub use loader::{load_from_path, parse_str, INDICATOR_NAME_FIELD};
