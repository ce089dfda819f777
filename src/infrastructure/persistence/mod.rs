//! Persistence backends for the authoritative store.

mod pg_link_store;

pub use pg_link_store::PgLinkStore;
