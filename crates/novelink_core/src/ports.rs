//! crates/novelink_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the hosted database service, the durable local
//! store, and the platform speech facility.

use crate::domain::{NewNovel, Novel, NovelPatch, NovelStats, Utterance};
use async_trait::async_trait;
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., the
/// hosted database or the network transport).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Thin contract over the hosted database-as-a-service: row CRUD on the
/// novels collection plus file uploads. All operations may fail with a
/// transport or validation error and are never retried automatically.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    async fn fetch_novel(&self, novel_id: Uuid) -> PortResult<Novel>;

    async fn insert_novel(&self, novel: NewNovel) -> PortResult<Novel>;

    async fn update_novel(&self, novel_id: Uuid, patch: NovelPatch) -> PortResult<()>;

    /// Uploads a file and returns its publicly resolvable URL.
    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> PortResult<String>;

    /// Writes back a novel's counters after a like. The caller owns the
    /// increment; the gateway just stores the new totals.
    async fn record_like(&self, novel_id: Uuid, stats: NovelStats) -> PortResult<()>;
}

/// Durable local key-value storage with browser-localStorage semantics:
/// synchronous, string-valued, process-wide, last-write-wins across
/// concurrent writers. Reads are defensive; callers fall back to defaults on
/// absent or malformed values rather than failing.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn remove(&self, key: &str);

    fn keys(&self) -> Vec<String>;
}

/// Completion signals delivered by a speech synthesizer back to whoever
/// submitted the utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechEvent {
    Finished,
    Failed,
}

/// The platform speech-synthesis facility. Submission is synchronous;
/// completion or failure arrives later as a [`SpeechEvent`]. At most one
/// utterance is active at a time — callers must cancel before re-speaking.
pub trait SpeechSynthesizer: Send + Sync {
    fn speak(&self, utterance: &Utterance) -> PortResult<()>;

    /// Cancels any active utterance. Idempotent; a no-op while idle.
    fn cancel(&self);
}
