//! Repository traits abstracting the authoritative store.

mod link_store;

pub use link_store::LinkStore;

#[cfg(test)]
pub use link_store::MockLinkStore;
