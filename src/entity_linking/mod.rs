//! Entity linking: resolving free-text ingredient mentions to knowledge-base entities
//!
//! - `normalize` - canonical text form shared by every comparison
//! - `fuzzy` - partial-ratio scoring and the match threshold
//! - `labels` - per-entity label lists and the compiled label index
//! - `resolver` - exact > word > fuzzy tiered resolution

pub mod fuzzy;
pub mod labels;
pub mod normalize;
pub mod resolver;

pub use fuzzy::{is_fuzzy_match, partial_ratio, MATCH_THRESHOLD};
pub use labels::{entity_labels, Label, LabelIndex, LabelSource};
pub use resolver::{EntityResolver, MatchTier, Resolution, TierSets};
