//! Core business entities.

mod link;
mod visit;

pub use link::{Link, LinkChanges, LinkProjection, NewLink, RedirectTarget};
pub use visit::{MAX_USER_AGENT_LEN, VisitEvent};
