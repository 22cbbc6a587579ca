use thiserror::Error;

pub mod types;
pub mod utils;
pub mod env;
pub mod admin_http;
pub mod storage;

#[derive(Debug, Error)]
pub enum CommonError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}
