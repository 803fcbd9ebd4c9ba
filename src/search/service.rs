//! Recipe search service
//!
//! Owns the shared knowledge store and its compiled label index, and is the
//! single entry point the HTTP layer and the CLI call into.

use super::criteria::{normalize, RawCriterion};
use super::pipeline::{FilterPipeline, UnresolvedPolicy};
use super::record::{format_record, RecipeRecord};
use crate::config::MatchingConfig;
use crate::entity_linking::{EntityResolver, LabelIndex, MATCH_THRESHOLD};
use crate::error::{SearchError, SearchResult};
use crate::knowledge::{KnowledgeStore, RecipeField, StoreStats};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Fields reported by [`RecipeSearchService::unique_values`]
pub const FACET_FIELDS: [RecipeField; 4] = [
    RecipeField::Cuisine,
    RecipeField::Diet,
    RecipeField::Course,
    RecipeField::Difficulty,
];

/// Property name → `(value, count)` pairs, most frequent first
pub type FacetCounts = BTreeMap<String, Vec<(String, usize)>>;

/// Search façade over a read-only knowledge store
#[derive(Debug, Clone)]
pub struct RecipeSearchService {
    store: Arc<KnowledgeStore>,
    index: Arc<LabelIndex>,
    recipe_class: Option<String>,
    threshold: u8,
    unresolved: UnresolvedPolicy,
}

impl RecipeSearchService {
    /// Build the service, compiling the label index once
    pub fn new(store: Arc<KnowledgeStore>) -> Self {
        let index = Arc::new(LabelIndex::build(&store));
        Self {
            store,
            index,
            recipe_class: Some("FoodRecipes".to_string()),
            threshold: MATCH_THRESHOLD,
            unresolved: UnresolvedPolicy::FailOpen,
        }
    }

    pub fn with_recipe_class(mut self, recipe_class: Option<String>) -> Self {
        self.recipe_class = recipe_class;
        self
    }

    pub fn with_matching(mut self, matching: &MatchingConfig) -> Self {
        self.threshold = matching.threshold;
        self.unresolved = matching.unresolved_ingredient;
        self
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    pub fn index(&self) -> &LabelIndex {
        &self.index
    }

    /// Resolver bound to this service's store and threshold
    pub fn resolver(&self) -> EntityResolver<'_> {
        EntityResolver::new(&self.store, &self.index).with_threshold(self.threshold)
    }

    /// Filter recipes by criteria.
    ///
    /// Errors:
    /// - `Validation` when no criterion survives normalization
    /// - `NoMatch` when the pipeline leaves nothing
    pub fn search(&self, raw: &[RawCriterion]) -> SearchResult<Vec<RecipeRecord>> {
        let criteria = normalize(raw);
        if criteria.is_empty() {
            return Err(SearchError::criteria_required());
        }

        let pipeline = FilterPipeline::new(self.resolver(), self.threshold, self.unresolved);
        let outcome = pipeline.run(self.store.recipes(self.recipe_class.as_deref()), &criteria);

        tracing::info!(
            criteria = criteria.len(),
            resolved = outcome.resolved.len(),
            unresolved = outcome.unresolved.len(),
            matched = outcome.recipes.len(),
            "Search complete"
        );

        if outcome.recipes.is_empty() {
            return Err(SearchError::NoMatch);
        }

        Ok(outcome.recipes.into_iter().map(format_record).collect())
    }

    /// Case-insensitive exact name lookup, first match in store order
    pub fn search_by_name(&self, query: &str) -> SearchResult<Vec<RecipeRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::Validation(
                "Query parameter is required".to_string(),
            ));
        }

        self.store
            .find_by_name_ignore_case(query)
            .map(|entity| vec![format_record(entity)])
            .ok_or_else(|| SearchError::NotFound(format!("No recipe found for '{query}'")))
    }

    /// Distinct values of the facet fields across every entity
    pub fn unique_values(&self) -> FacetCounts {
        FACET_FIELDS
            .iter()
            .map(|&field| {
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for entity in self.store.entities() {
                    for value in entity.field_values(field) {
                        *counts.entry(value).or_default() += 1;
                    }
                }

                let mut sorted: Vec<(String, usize)> = counts
                    .into_iter()
                    .map(|(value, count)| (value.to_string(), count))
                    .collect();
                sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

                (field.property_name().to_string(), sorted)
            })
            .collect()
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats(self.recipe_class.as_deref())
    }

    pub fn recipe_count(&self) -> usize {
        self.store.recipes(self.recipe_class.as_deref()).count()
    }
}
