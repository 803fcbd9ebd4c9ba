//! Recipe search: criteria normalization, the filter pipeline and record output

pub mod criteria;
pub mod pipeline;
pub mod record;
pub mod service;

pub use criteria::{normalize, Criterion, CriterionParameter, RawCriterion};
pub use pipeline::{
    Comparator, FilterOutcome, FilterPipeline, ResolvedMention, Stage, StageReport,
    UnresolvedPolicy,
};
pub use record::{format_record, RecipeRecord};
pub use service::{FacetCounts, RecipeSearchService, FACET_FIELDS};
