//! JSON shapes for the admin link endpoints.
//!
//! The wire format uses camelCase field names (`expiresAt`, `visitCount`).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::application::services::{CreateLink, SlugAvailability};
use crate::domain::entities::{Link, LinkChanges};

/// `POST /api/admin/links` request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    /// Auto-generated when omitted.
    pub slug: Option<String>,
    pub target: String,
    pub status: Option<i16>,
    pub expires_at: Option<i64>,
}

impl From<CreateLinkRequest> for CreateLink {
    fn from(req: CreateLinkRequest) -> Self {
        CreateLink {
            slug: req.slug,
            target: req.target,
            status: req.status,
            expires_at: req.expires_at,
        }
    }
}

/// `PATCH /api/admin/links/{slug}` request body.
///
/// For `expiresAt`, an absent field leaves the expiry untouched while an
/// explicit `null` clears it; `double_option` preserves the distinction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    pub target: Option<String>,
    pub status: Option<i16>,
    #[serde(default, deserialize_with = "double_option")]
    pub expires_at: Option<Option<i64>>,
}

impl From<UpdateLinkRequest> for LinkChanges {
    fn from(req: UpdateLinkRequest) -> Self {
        LinkChanges {
            target: req.target,
            status: req.status,
            expires_at: req.expires_at,
        }
    }
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// A link record as returned by the admin endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i64,
    pub slug: String,
    pub target: String,
    pub status: i16,
    pub expires_at: Option<i64>,
    pub visit_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            slug: link.slug,
            target: link.target,
            status: link.status,
            expires_at: link.expires_at,
            visit_count: link.visit_count,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// `GET /api/admin/links` query string.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// `GET /api/admin/links` response.
#[derive(Debug, Serialize)]
pub struct ListLinksResponse {
    pub links: Vec<LinkResponse>,
    pub total: usize,
}

/// Placeholder stats block; a real analytics query engine is out of scope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsBlock {
    pub total_visits: i64,
    pub last_24h: i64,
    pub by_country: Vec<Value>,
    pub by_referrer: Vec<Value>,
}

impl StatsBlock {
    pub fn placeholder(total_visits: i64) -> Self {
        Self {
            total_visits,
            last_24h: 0,
            by_country: Vec::new(),
            by_referrer: Vec::new(),
        }
    }
}

/// `GET /api/admin/links/{slug}` response: the record plus stats.
#[derive(Debug, Serialize)]
pub struct LinkWithStatsResponse {
    #[serde(flatten)]
    pub link: LinkResponse,
    pub stats: StatsBlock,
}

/// `GET /api/admin/links/{slug}/stats` query string.
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub period: Option<String>,
}

/// `GET /api/admin/links/{slug}/stats` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub slug: String,
    pub period: String,
    pub total_visits: i64,
    pub by_country: Vec<Value>,
    pub by_referrer: Vec<Value>,
}

/// `GET /api/admin/check-slug/{slug}` response.
#[derive(Debug, Serialize)]
pub struct SlugCheckResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl From<SlugAvailability> for SlugCheckResponse {
    fn from(availability: SlugAvailability) -> Self {
        Self {
            available: availability.available,
            reason: availability.reason,
        }
    }
}
