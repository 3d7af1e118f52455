//! services/app/src/error.rs
//!
//! Defines the primary error type for the entire client application.

use crate::config::ConfigError;
use novelink_core::ports::PortError;

/// The primary error type for the `app` service.
///
/// Nothing here is fatal to the process: authentication and missing-content
/// failures map to dedicated screens, submit/upload failures are shown inline
/// with the composition preserved, and speech failures reset silently before
/// they ever reach this type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Reading content is gated behind a login; there is no stored session.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The requested novel does not exist (empty-state with a
    /// return-to-library action).
    #[error("Content unavailable: {0}")]
    ContentUnavailable(String),

    /// Submission was rejected or failed in transit; shown as a dismissible
    /// inline message with the composition preserved.
    #[error("Submit failed: {0}")]
    Submit(String),

    /// A file upload failed; same inline treatment as a submit failure.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying HTTP client.
    #[error("Transport Error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., reading the local store).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
