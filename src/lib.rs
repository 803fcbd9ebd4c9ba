//! Recipe Finder - Knowledge-Base Recipe Search
//!
//! Answers structured recipe searches over a food knowledge base. Callers
//! send a list of criteria (ingredients to include, ingredients to avoid,
//! cuisine, diet, difficulty, course, cook time); free-text ingredient
//! mentions are resolved to canonical ingredient entities and the recipe
//! collection is narrowed stage by stage.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Consumers: HTTP (axum), CLI query                              │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 RecipeSearchService                             │
//! │   criteria normalize → filter pipeline → record format          │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │          EntityResolver (exact > word > fuzzy)                  │
//! │                    over LabelIndex                              │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  KnowledgeStore                                 │
//! │          (JSON export or bincode snapshot)                      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use recipe_finder::{KnowledgeStore, RecipeSearchService, RawCriterion};
//!
//! let store = Arc::new(KnowledgeStore::from_json_file(Path::new("data/knowledge.json"))?);
//! let service = RecipeSearchService::new(store);
//!
//! let criteria: Vec<RawCriterion> = serde_json::from_str(
//!     r#"[{"parameter": "Ingredient", "values": ["onion"], "avoidValues": ["peanut"]}]"#,
//! )?;
//! let records = service.search(&criteria)?;
//! ```

pub mod config;
pub mod entity_linking;
pub mod error;
pub mod knowledge;
pub mod search;

#[cfg(feature = "server")]
pub mod api;

// Re-export main types
pub use config::{KnowledgeFormat, SearchConfig};
pub use entity_linking::{EntityResolver, LabelIndex, MatchTier};
pub use error::{ConfigError, SearchError, SearchResult, StoreError};
pub use knowledge::{Entity, KnowledgeStore, RecipeField};
pub use search::{Criterion, RawCriterion, RecipeRecord, RecipeSearchService, UnresolvedPolicy};

use std::path::Path;

/// Load the knowledge store named by `config.knowledge`
pub fn load_store(config: &SearchConfig) -> Result<KnowledgeStore, StoreError> {
    let path: &Path = &config.knowledge.path;
    match config.knowledge.format {
        KnowledgeFormat::Json => KnowledgeStore::from_json_file(path),
        KnowledgeFormat::Snapshot => KnowledgeStore::load_snapshot(path),
    }
}
