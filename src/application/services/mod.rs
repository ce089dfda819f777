//! Application services: resolution, invalidation, admin mutations, sweep.

mod admin;
mod invalidator;
mod resolver;
mod sweeper;

pub use admin::{
    AdminService, CreateLink, DEFAULT_STATUS, LIST_DEFAULT_LIMIT, LIST_MAX_LIMIT, SlugAvailability,
};
pub use invalidator::Invalidator;
pub use resolver::{Resolution, Resolver};
pub use sweeper::Sweeper;
