//! Request and response DTOs.

pub mod link;
