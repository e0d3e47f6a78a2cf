pub mod classifier;
pub mod config;
pub mod feedback;
pub mod feeds;
pub mod round;
pub mod runner;
pub mod sampler;
pub mod store;
pub mod timer;
pub mod types;
// cmd and reports are binary modules (in main.rs), kept out of the
// library surface on purpose.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SteadyError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Sensor Error: {0}")]
    Sensor(String),
}

pub type ShResult<T> = Result<T, SteadyError>;
