//! Shared helpers: slug generation and link validation.

pub mod slug;
pub mod validation;
