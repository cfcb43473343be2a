//! Error types for cafedex

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CafedexError {
    // Checkpoint errors
    #[error("Checkpoint not found at {path}. Run the previous stage first")]
    CheckpointMissing { path: PathBuf },

    #[error("Failed to parse checkpoint {path}: {reason}")]
    CheckpointCorrupt { path: PathBuf, reason: String },

    // Provider errors
    #[error("Provider request failed{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Provider {
        /// HTTP status, if the failure happened at the protocol level.
        /// `None` means a network-level error (timeout, reset, DNS).
        status: Option<u16>,
        message: String,
    },

    #[error("Structured-generation response contained no tool output (stop reason: {stop_reason})")]
    MissingStructuredOutput { stop_reason: String },

    #[error("Missing required credential: {key}")]
    CredentialMissing { key: String },

    // Domain errors
    #[error("Vector length mismatch: {left} vs {right}")]
    VectorLengthMismatch { left: usize, right: usize },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CafedexError {
    /// HTTP status attached to a provider failure, if any.
    pub fn provider_status(&self) -> Option<u16> {
        match self {
            CafedexError::Provider { status, .. } => *status,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CafedexError>;
