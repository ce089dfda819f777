//! Domain layer: entities, repository traits, and the visit worker.

pub mod entities;
pub mod repositories;
pub mod visit_worker;
