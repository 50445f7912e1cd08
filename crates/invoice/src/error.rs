//! Error types for invoice assembly and delivery.

use thiserror::Error;

pub type InvoiceResult<T> = Result<T, InvoiceError>;

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Mail transport failed: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
