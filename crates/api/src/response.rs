//! Shared response envelope types for API handlers.
//!
//! Collections are wrapped in `{ "data": ... }`. Mutations answer with a
//! human-readable `message`, plus the affected row when there is one.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "message": ... }` for operations with nothing else to report.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{ "message": ..., "data": T }` for mutations that return the affected row.
#[derive(Debug, Serialize)]
pub struct MessageDataResponse<T: Serialize> {
    pub message: String,
    pub data: T,
}
