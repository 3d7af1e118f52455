//! crates/novelink_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage backend or wire format.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

/// Removes all markup tags from `content`, leaving its plain text.
pub fn strip_markup(content: &str) -> String {
    MARKUP_TAG.replace_all(content, "").into_owned()
}

/// Aggregate counters attached to a published novel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovelStats {
    pub likes: u64,
    pub views: u64,
    pub chapters: u32,
}

/// Author display snapshot embedded in a novel record at publish time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorSnapshot {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: String,
}

/// A published novel as fetched from the content gateway.
///
/// Immutable once loaded for reading; the reader session holds it read-only.
/// `content` is either plain text with newline-separated paragraphs or markup
/// made of block elements (the editor's output).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Novel {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub content: String,
    pub cover: String,
    pub author: AuthorSnapshot,
    pub stats: NovelStats,
    pub word_count: usize,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for inserting a new novel.
#[derive(Debug, Clone, Serialize)]
pub struct NewNovel {
    pub title: String,
    pub description: String,
    pub category: String,
    pub content: String,
    pub cover: String,
    pub author: AuthorSnapshot,
    pub is_public: bool,
    pub word_count: usize,
}

/// Payload for updating an existing novel. Carries the full editable surface;
/// counters are owned by the gateway and never patched from here.
#[derive(Debug, Clone, Serialize)]
pub struct NovelPatch {
    pub title: String,
    pub description: String,
    pub category: String,
    pub content: String,
    pub cover: String,
    pub is_public: bool,
    pub word_count: usize,
    pub updated_at: DateTime<Utc>,
}

/// A single displayable piece of a novel's content.
///
/// The variant is decided once, when the paragraph sequence is derived from
/// the source content, and never re-decided at render time: a fragment is
/// rendered either as trusted markup or as plain text, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentFragment {
    PlainText(String),
    TrustedMarkup(String),
}

impl ContentFragment {
    /// The raw stored form of the fragment.
    pub fn as_str(&self) -> &str {
        match self {
            ContentFragment::PlainText(s) => s,
            ContentFragment::TrustedMarkup(s) => s,
        }
    }

    /// The fragment's text with all markup tags removed, suitable for
    /// speech synthesis.
    pub fn spoken_text(&self) -> String {
        match self {
            ContentFragment::PlainText(s) => s.clone(),
            ContentFragment::TrustedMarkup(s) => strip_markup(s),
        }
    }
}

/// An in-progress composition snapshot, persisted locally between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub content: String,
    pub cover_url: String,
    pub updated_at: DateTime<Utc>,
}

/// Per-reader presentation preferences.
///
/// `page_index` is scoped to a single novel; the others are global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingPreferences {
    pub font_size: u32,
    pub dark_mode: bool,
    pub page_index: usize,
}

/// A device-independent page navigation request. Keyboard, touch gestures and
/// tap zones all reduce to one of these before any paging logic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationIntent {
    Previous,
    Next,
    First,
    Last,
}

/// A single speech request handed to the synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Utterance {
    /// Builds an utterance with the fixed reading voice parameters.
    pub fn reading(text: String, language: &str) -> Self {
        Self {
            text,
            language: language.to_string(),
            rate: 0.9,
            pitch: 1.0,
        }
    }
}

/// A locally stored authenticated session record.
///
/// Reading access is gated on the presence of one of these; the token itself
/// is issued and validated by the hosted auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spoken_text_strips_markup_tags() {
        let fragment =
            ContentFragment::TrustedMarkup("<p>Hello <img src=\"x.png\"/>world</p>".to_string());
        assert_eq!(fragment.spoken_text(), "Hello world");
    }

    #[test]
    fn spoken_text_passes_plain_text_through() {
        let fragment = ContentFragment::PlainText("just words".to_string());
        assert_eq!(fragment.spoken_text(), "just words");
    }

    #[test]
    fn reading_utterance_uses_fixed_voice_parameters() {
        let utterance = Utterance::reading("text".to_string(), "zh-CN");
        assert_eq!(utterance.rate, 0.9);
        assert_eq!(utterance.pitch, 1.0);
        assert_eq!(utterance.language, "zh-CN");
    }
}
