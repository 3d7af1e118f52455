//! services/app/src/adapters/gateway.rs
//!
//! This module contains the content gateway adapter, the concrete
//! implementation of the `ContentGateway` port from the `core` crate. It
//! speaks the hosted database service's REST dialect (a rows endpoint plus an
//! object-storage endpoint) using `reqwest`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use novelink_core::domain::{AuthorSnapshot, NewNovel, Novel, NovelPatch, NovelStats};
use novelink_core::ports::{ContentGateway, PortError, PortResult};
use serde::Deserialize;
use uuid::Uuid;

const NOVELS_TABLE: &str = "novels";
const IMAGE_BUCKET: &str = "images";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A REST adapter that implements the `ContentGateway` port.
#[derive(Clone)]
pub struct RestGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestGateway {
    /// Creates a new `RestGateway`. `base_url` is the service root without a
    /// trailing slash.
    pub fn new(client: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn rows_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, NOVELS_TABLE)
    }

    fn object_url(&self, file_name: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, IMAGE_BUCKET, file_name)
    }

    /// The publicly resolvable URL for an uploaded object.
    fn public_url(&self, file_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, IMAGE_BUCKET, file_name
        )
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key)),
            None => req,
        }
    }

    async fn check_status(response: reqwest::Response) -> PortResult<reqwest::Response> {
        match response.status() {
            s if s.is_success() => Ok(response),
            reqwest::StatusCode::NOT_FOUND => {
                Err(PortError::NotFound("row not found".to_string()))
            }
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(PortError::Unauthorized)
            }
            s => {
                let body = response.text().await.unwrap_or_default();
                Err(PortError::Unexpected(format!("gateway returned {}: {}", s, body)))
            }
        }
    }
}

//=========================================================================================
// "Impure" Wire Record Structs
//=========================================================================================

#[derive(Deserialize)]
struct NovelRecord {
    id: Uuid,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    cover: String,
    #[serde(default)]
    author: AuthorSnapshot,
    #[serde(default)]
    stats: NovelStats,
    #[serde(default)]
    word_count: usize,
    #[serde(default = "default_public")]
    is_public: bool,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

fn default_public() -> bool {
    true
}

impl NovelRecord {
    fn to_domain(self) -> Novel {
        Novel {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            content: self.content,
            cover: self.cover,
            author: self.author,
            stats: self.stats,
            word_count: self.word_count,
            is_public: self.is_public,
            created_at: self.created_at,
            updated_at: self.updated_at.unwrap_or(self.created_at),
        }
    }
}

//=========================================================================================
// `ContentGateway` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentGateway for RestGateway {
    async fn fetch_novel(&self, novel_id: Uuid) -> PortResult<Novel> {
        let response = self
            .authed(self.client.get(self.rows_url()))
            .query(&[("id", format!("eq.{}", novel_id)), ("select", "*".to_string())])
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let rows: Vec<NovelRecord> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(NovelRecord::to_domain)
            .ok_or_else(|| PortError::NotFound(format!("Novel {} not found", novel_id)))
    }

    async fn insert_novel(&self, novel: NewNovel) -> PortResult<Novel> {
        let initial_stats = NovelStats {
            likes: 0,
            views: 0,
            chapters: 1,
        };
        let body = serde_json::json!([{
            "title": novel.title,
            "description": novel.description,
            "category": novel.category,
            "content": novel.content,
            "cover": novel.cover,
            "author": novel.author,
            "is_public": novel.is_public,
            "word_count": novel.word_count,
            "stats": initial_stats,
            "created_at": Utc::now(),
            "updated_at": Utc::now(),
        }]);

        let response = self
            .authed(self.client.post(self.rows_url()))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let rows: Vec<NovelRecord> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(NovelRecord::to_domain)
            .ok_or_else(|| PortError::Unexpected("insert returned no row".to_string()))
    }

    async fn update_novel(&self, novel_id: Uuid, patch: NovelPatch) -> PortResult<()> {
        let response = self
            .authed(self.client.patch(self.rows_url()))
            .query(&[("id", format!("eq.{}", novel_id))])
            .json(&patch)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn upload_image(&self, file_name: &str, bytes: Vec<u8>) -> PortResult<String> {
        let response = self
            .authed(self.client.post(self.object_url(file_name)))
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(self.public_url(file_name))
    }

    async fn record_like(&self, novel_id: Uuid, stats: NovelStats) -> PortResult<()> {
        let response = self
            .authed(self.client.patch(self.rows_url()))
            .query(&[("id", format!("eq.{}", novel_id))])
            .json(&serde_json::json!({ "stats": stats }))
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Self::check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> RestGateway {
        RestGateway::new(
            reqwest::Client::new(),
            "https://example.test/".to_string(),
            None,
        )
    }

    #[test]
    fn urls_are_built_without_double_slashes() {
        let gw = gateway();
        assert_eq!(gw.rows_url(), "https://example.test/rest/v1/novels");
        assert_eq!(
            gw.object_url("u1/cover.png"),
            "https://example.test/storage/v1/object/images/u1/cover.png"
        );
        assert_eq!(
            gw.public_url("u1/cover.png"),
            "https://example.test/storage/v1/object/public/images/u1/cover.png"
        );
    }

    #[test]
    fn novel_record_fills_missing_updated_at_from_created_at() {
        let raw = serde_json::json!({
            "id": Uuid::nil(),
            "title": "T",
            "created_at": "2026-01-02T03:04:05Z",
        });
        let record: NovelRecord = serde_json::from_value(raw).unwrap();
        let novel = record.to_domain();
        assert_eq!(novel.updated_at, novel.created_at);
        assert!(novel.is_public);
    }
}
