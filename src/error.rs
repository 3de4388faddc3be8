// Contract errors and the response envelope returned to callers

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const OK: u16 = 200;
pub const BAD_REQUEST: u16 = 400;
pub const NOT_FOUND: u16 = 404;
pub const CONFLICT: u16 = 409;
pub const INTERNAL_ERROR: u16 = 500;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("car {0} already exists")]
    AlreadyExists(String),

    #[error("car {0} not found")]
    NotFound(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Only raised when scrapping is configured as terminal.
    #[error("car {0} is scrapped")]
    Scrapped(String),

    #[error("ledger store failure: {0}")]
    Store(#[from] anyhow::Error),

    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ContractError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ContractError::InvalidArguments(message.into())
    }

    pub fn status(&self) -> u16 {
        match self {
            ContractError::InvalidArguments(_) => BAD_REQUEST,
            ContractError::NotFound(_) => NOT_FOUND,
            ContractError::AlreadyExists(_) | ContractError::Scrapped(_) => CONFLICT,
            ContractError::Store(_) | ContractError::Serialization(_) => INTERNAL_ERROR,
        }
    }
}

pub type ContractResult<T> = Result<T, ContractError>;

// ============================================================================
// RESPONSE
// ============================================================================

/// What an invocation hands back: a status code, a message on failure and
/// the serialized payload on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub message: String,
    pub payload: Vec<u8>,
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Response {
            status: OK,
            message: String::new(),
            payload,
        }
    }

    pub fn error(err: &ContractError) -> Self {
        Response {
            status: err.status(),
            message: err.to_string(),
            payload: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == OK
    }

    /// Payload parsed as JSON (Null when empty).
    pub fn payload_json(&self) -> serde_json::Result<serde_json::Value> {
        if self.payload.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&self.payload)
    }
}

impl From<ContractResult<Vec<u8>>> for Response {
    fn from(result: ContractResult<Vec<u8>>) -> Self {
        match result {
            Ok(payload) => Response::success(payload),
            Err(err) => Response::error(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ContractError::invalid("x").status(), 400);
        assert_eq!(ContractError::NotFound("1".into()).status(), 404);
        assert_eq!(ContractError::AlreadyExists("1".into()).status(), 409);
        assert_eq!(ContractError::Scrapped("1".into()).status(), 409);
        assert_eq!(ContractError::Store(anyhow::anyhow!("disk")).status(), 500);
    }

    #[test]
    fn test_error_response_carries_message() {
        let response = Response::error(&ContractError::NotFound("1000".into()));

        assert!(!response.is_ok());
        assert_eq!(response.message, "car 1000 not found");
        assert!(response.payload.is_empty());
        assert_eq!(response.payload_json().unwrap(), serde_json::Value::Null);
    }
}
