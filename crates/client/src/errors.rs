use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure, non-2xx status or undecodable body from the backend.
    #[error("remote error: {0}")]
    Remote(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("local storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Every tier in the resolution policy failed or the policy was empty.
    #[error("no tier could resolve {0}")]
    Unresolved(&'static str),
}

impl From<models::ModelError> for ClientError {
    fn from(e: models::ModelError) -> Self {
        match e {
            models::ModelError::Validation(msg) => ClientError::Validation(msg),
        }
    }
}

impl From<common::CommonError> for ClientError {
    fn from(e: common::CommonError) -> Self {
        ClientError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}
