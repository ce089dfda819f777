//! Visit event emitted for every successful resolution.

/// User-agent strings longer than this are truncated before being recorded.
pub const MAX_USER_AGENT_LEN: usize = 256;

/// A single redirect served, destined for the analytics sink.
///
/// Delivery is best-effort: events may be dropped when the queue is full and
/// increments may be lost under failure, never corrupted.
#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub slug: String,
    pub referrer: Option<String>,
    /// Coarse geography (two-letter country code) when the edge provides it.
    pub country: Option<String>,
    pub user_agent: Option<String>,
    pub visited_at: i64,
}

impl VisitEvent {
    pub fn new(
        slug: String,
        referrer: Option<&str>,
        country: Option<&str>,
        user_agent: Option<&str>,
        visited_at: i64,
    ) -> Self {
        Self {
            slug,
            referrer: referrer.map(str::to_string),
            country: country.map(str::to_string),
            user_agent: user_agent.map(truncate_user_agent),
            visited_at,
        }
    }
}

fn truncate_user_agent(ua: &str) -> String {
    ua.chars().take(MAX_USER_AGENT_LEN).collect()
}
