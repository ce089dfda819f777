//! Link validation rules.
//!
//! Validation runs before any store mutation and returns a structured list of
//! field errors rather than a single message, so callers can surface all
//! problems at once.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use url::Url;

pub const MAX_SLUG_LEN: usize = 32;
pub const MAX_TARGET_LEN: usize = 2048;

/// Redirect statuses a link may be configured with.
pub const ALLOWED_STATUSES: [i16; 4] = [301, 302, 307, 308];

static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("slug regex is valid"));

/// A single validation failure tied to the field that caused it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A candidate link record, either new or merged from an update.
#[derive(Debug)]
pub struct LinkDraft<'a> {
    pub slug: &'a str,
    pub target: &'a str,
    pub status: i16,
    pub expires_at: Option<i64>,
}

/// Validates a whole link record, accumulating every field error.
pub fn validate_link(draft: &LinkDraft<'_>, now: i64) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(e) = validate_slug(draft.slug) {
        errors.push(e);
    }
    if let Some(e) = validate_target(draft.target) {
        errors.push(e);
    }
    if !ALLOWED_STATUSES.contains(&draft.status) {
        errors.push(FieldError::new(
            "status",
            format!("Status must be one of: 301, 302, 307, 308 (got {})", draft.status),
        ));
    }
    if let Some(expires_at) = draft.expires_at
        && expires_at <= now
    {
        errors.push(FieldError::new(
            // Matches the wire field name, not the internal one.
            "expiresAt",
            "Expiration time must be a future Unix timestamp",
        ));
    }

    errors
}

/// Validates slug length and charset (`[A-Za-z0-9_-]`, 1-32 chars).
pub fn validate_slug(slug: &str) -> Option<FieldError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return Some(FieldError::new(
            "slug",
            format!("Slug must be between 1 and {} characters", MAX_SLUG_LEN),
        ));
    }

    if !SLUG_REGEX.is_match(slug) {
        return Some(FieldError::new(
            "slug",
            "Slug can only contain letters, numbers, hyphens, and underscores",
        ));
    }

    None
}

fn validate_target(target: &str) -> Option<FieldError> {
    if target.is_empty() {
        return Some(FieldError::new("target", "Target URL is required"));
    }

    if target.len() > MAX_TARGET_LEN {
        return Some(FieldError::new(
            "target",
            format!("Target URL must be {} characters or less", MAX_TARGET_LEN),
        ));
    }

    match Url::parse(target) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => None,
        Ok(_) => Some(FieldError::new(
            "target",
            "Target URL must use http:// or https:// protocol",
        )),
        Err(_) => Some(FieldError::new("target", "Invalid URL format")),
    }
}
