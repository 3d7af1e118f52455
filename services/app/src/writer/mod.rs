//! services/app/src/writer/mod.rs
//!
//! The composition session: drafting a new novel or editing an existing one.
//! New compositions are snapshotted to the local store on a fixed autosave
//! interval and the snapshot is deleted only on successful submission.

use crate::auth;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use novelink_core::domain::{strip_markup, AuthorSnapshot, Draft, NewNovel, NovelPatch};
use novelink_core::ports::{ContentGateway, KeyValueStore, PortError};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Fixed storage key for the in-progress draft blob.
pub const DRAFT_KEY: &str = "novel_write_draft";
/// How often the autosave timer fires while composing a new novel.
pub const AUTOSAVE_INTERVAL_MS: u64 = 20_000;
/// The editor's empty-document sentinel; a body equal to this is trivial.
pub const EMPTY_DOCUMENT: &str = "<p></p>";

const DEFAULT_CATEGORY: &str = "fantasy";
const DEFAULT_COVER: &str = "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c";

/// The editable surface of a composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub title: String,
    pub description: String,
    pub category: String,
    /// Serialized markup produced by the rich-text editor.
    pub content: String,
    pub cover_url: String,
}

impl Default for Composition {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            content: String::new(),
            cover_url: String::new(),
        }
    }
}

impl Composition {
    /// Trivial compositions (no title, empty or sentinel body) are not worth
    /// autosaving.
    fn is_trivial(&self) -> bool {
        self.title.trim().is_empty()
            && (self.content.is_empty() || self.content == EMPTY_DOCUMENT)
    }
}

/// Writer lifecycle. A failed submit returns to the matching composing phase
/// with the error kept for inline display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterPhase {
    /// Composing a new novel; the autosave timer runs only here.
    Composing,
    /// Editing an already-published novel; never autosaved locally.
    ComposingExisting,
    Submitting,
    Submitted(Uuid),
}

/// One composition session over the local store and the content gateway.
pub struct WriterSession {
    store: Arc<dyn KeyValueStore>,
    gateway: Arc<dyn ContentGateway>,
    author: AuthorSnapshot,
    edit_id: Option<Uuid>,
    phase: WriterPhase,
    composition: Composition,
    is_public: bool,
    error: Option<String>,
    last_saved: Option<DateTime<Utc>>,
    last_autosave_ms: u64,
}

fn port_message(e: &PortError) -> String {
    match e {
        PortError::NotFound(msg) | PortError::Unexpected(msg) => msg.clone(),
        PortError::Unauthorized => "Unauthorized".to_string(),
    }
}

impl WriterSession {
    /// Starts a new composition, restoring the local draft if one exists.
    pub fn open_new(
        store: Arc<dyn KeyValueStore>,
        gateway: Arc<dyn ContentGateway>,
        author: AuthorSnapshot,
        now_ms: u64,
    ) -> Self {
        let composition = match store.get(DRAFT_KEY) {
            Some(raw) => match serde_json::from_str::<Draft>(&raw) {
                Ok(draft) => {
                    info!("Restored local draft from {}", draft.updated_at);
                    Composition {
                        title: draft.title,
                        description: draft.description,
                        category: draft.category,
                        content: draft.content,
                        cover_url: draft.cover_url,
                    }
                }
                Err(e) => {
                    warn!("Ignoring malformed local draft: {}", e);
                    Composition::default()
                }
            },
            None => Composition::default(),
        };

        Self {
            store,
            gateway,
            author,
            edit_id: None,
            phase: WriterPhase::Composing,
            composition,
            is_public: true,
            error: None,
            last_saved: None,
            last_autosave_ms: now_ms,
        }
    }

    /// Starts editing an existing novel. The fetched record populates the
    /// composition and overrides any local draft, which is left in place for
    /// the next new composition.
    pub async fn open_edit(
        store: Arc<dyn KeyValueStore>,
        gateway: Arc<dyn ContentGateway>,
        author: AuthorSnapshot,
        edit_id: Uuid,
        now_ms: u64,
    ) -> Result<Self, AppError> {
        let novel = gateway.fetch_novel(edit_id).await.map_err(|e| match e {
            PortError::NotFound(msg) => AppError::ContentUnavailable(msg),
            other => AppError::Port(other),
        })?;

        Ok(Self {
            store,
            gateway,
            author,
            edit_id: Some(edit_id),
            phase: WriterPhase::ComposingExisting,
            composition: Composition {
                title: novel.title,
                description: novel.description,
                category: novel.category,
                content: novel.content,
                cover_url: novel.cover,
            },
            is_public: novel.is_public,
            error: None,
            last_saved: None,
            last_autosave_ms: now_ms,
        })
    }

    //------------------------------------------------------------------
    // Composition edits
    //------------------------------------------------------------------

    pub fn set_title(&mut self, title: &str) {
        self.composition.title = title.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.composition.description = description.to_string();
    }

    pub fn set_category(&mut self, category: &str) {
        self.composition.category = category.to_string();
    }

    pub fn set_content(&mut self, content: &str) {
        self.composition.content = content.to_string();
    }

    pub fn set_is_public(&mut self, is_public: bool) {
        self.is_public = is_public;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    //------------------------------------------------------------------
    // Autosave
    //------------------------------------------------------------------

    /// Timer callback. Saves a draft snapshot at most once per interval, only
    /// while composing a new novel, and only once there is something worth
    /// keeping. Returns whether a snapshot was written.
    pub fn autosave_tick(&mut self, now_ms: u64, now: DateTime<Utc>) -> bool {
        if self.edit_id.is_some() || self.phase != WriterPhase::Composing {
            return false;
        }
        if now_ms.saturating_sub(self.last_autosave_ms) < AUTOSAVE_INTERVAL_MS {
            return false;
        }
        self.last_autosave_ms = now_ms;

        if self.composition.is_trivial() {
            return false;
        }

        let draft = Draft {
            title: self.composition.title.clone(),
            description: self.composition.description.clone(),
            category: self.composition.category.clone(),
            content: self.composition.content.clone(),
            cover_url: self.composition.cover_url.clone(),
            updated_at: now,
        };
        match serde_json::to_string(&draft) {
            Ok(raw) => {
                self.store.set(DRAFT_KEY, &raw);
                self.last_saved = Some(now);
                true
            }
            Err(e) => {
                warn!("Failed to serialize draft: {}", e);
                false
            }
        }
    }

    //------------------------------------------------------------------
    // Uploads and submission
    //------------------------------------------------------------------

    /// Uploads a cover image and records its public URL on the composition.
    /// Failure keeps the composition as-is and surfaces an inline message.
    pub async fn upload_cover(&mut self, bytes: Vec<u8>, extension: &str) -> Result<String, AppError> {
        let file_name = format!("{}/{}.{}", self.author.id, Uuid::new_v4(), extension);
        match self.gateway.upload_image(&file_name, bytes).await {
            Ok(url) => {
                self.composition.cover_url = url.clone();
                Ok(url)
            }
            Err(e) => {
                let msg = port_message(&e);
                self.error = Some(msg.clone());
                Err(AppError::Upload(msg))
            }
        }
    }

    /// Submits the composition: insert for a new novel, update when editing.
    ///
    /// On success the local draft is deleted (new mode) and the novel id is
    /// returned. On failure the session returns to its pre-submit composing
    /// phase with every field exactly as typed, the error held for display,
    /// and the draft untouched.
    pub async fn submit(&mut self, now: DateTime<Utc>) -> Result<Uuid, AppError> {
        if self.composition.title.trim().is_empty() {
            let msg = "title is required".to_string();
            self.error = Some(msg.clone());
            return Err(AppError::Submit(msg));
        }

        let composing_phase = self.phase;
        self.phase = WriterPhase::Submitting;
        self.error = None;

        let word_count = strip_markup(&self.composition.content).chars().count();
        let cover = if self.composition.cover_url.is_empty() {
            DEFAULT_COVER.to_string()
        } else {
            self.composition.cover_url.clone()
        };

        let result = match self.edit_id {
            Some(id) => {
                let patch = NovelPatch {
                    title: self.composition.title.trim().to_string(),
                    description: self.composition.description.trim().to_string(),
                    category: self.composition.category.clone(),
                    content: self.composition.content.clone(),
                    cover,
                    is_public: self.is_public,
                    word_count,
                    updated_at: now,
                };
                self.gateway.update_novel(id, patch).await.map(|()| id)
            }
            None => {
                let new_novel = NewNovel {
                    title: self.composition.title.trim().to_string(),
                    description: self.composition.description.trim().to_string(),
                    category: self.composition.category.clone(),
                    content: self.composition.content.clone(),
                    cover,
                    author: self.author.clone(),
                    is_public: self.is_public,
                    word_count,
                };
                self.gateway.insert_novel(new_novel).await.map(|novel| novel.id)
            }
        };

        match result {
            Ok(id) => {
                if self.edit_id.is_none() {
                    self.store.remove(DRAFT_KEY);
                }
                self.phase = WriterPhase::Submitted(id);
                info!(novel = %id, "Composition submitted");
                Ok(id)
            }
            Err(e) => {
                let msg = port_message(&e);
                self.phase = composing_phase;
                self.error = Some(msg.clone());
                Err(AppError::Submit(msg))
            }
        }
    }

    //------------------------------------------------------------------
    // View
    //------------------------------------------------------------------

    pub fn phase(&self) -> WriterPhase {
        self.phase
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_id.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Timestamp of the last autosave, shown next to the draft indicator.
    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    /// The author snapshot attached to submissions; derived from the stored
    /// session when available.
    pub fn author_from_session(store: &dyn KeyValueStore) -> AuthorSnapshot {
        match auth::current_session(store) {
            Some(session) => AuthorSnapshot {
                id: session.user_id,
                name: session
                    .email
                    .split('@')
                    .next()
                    .filter(|s| !s.is_empty())
                    .unwrap_or("reader")
                    .to_string(),
                avatar_url: String::new(),
            },
            None => AuthorSnapshot::default(),
        }
    }
}
