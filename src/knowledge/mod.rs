//! Food knowledge base: entity types and the read-only store

pub mod entity;
pub mod store;

pub use entity::{language_name, AltLabel, Entity, PropertyValue, RecipeField};
pub use store::{KnowledgeStore, StoreStats, SNAPSHOT_VERSION};
