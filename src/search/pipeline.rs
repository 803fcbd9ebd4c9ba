//! Recipe filter pipeline
//!
//! Narrows a recipe collection by normalized criteria. Stages run in a
//! fixed order regardless of the order criteria arrive in:
//!
//! 1. Allergen exclusion - every `avoidValues` term from every criterion
//! 2. Ingredient inclusion - resolved mentions, AND across entities
//! 3. Categorical/scalar filters - Cuisine, Diet, Difficulty, Course,
//!    Cook Time, one stage per criterion in input order
//!
//! Every stage is a `retain` over the running set, so a recipe dropped by
//! one stage never comes back.

use super::criteria::{Criterion, CriterionParameter};
use crate::entity_linking::fuzzy::is_fuzzy_match;
use crate::entity_linking::normalize::normalize_text;
use crate::entity_linking::resolver::{EntityResolver, MatchTier};
use crate::knowledge::{Entity, RecipeField};
use serde::{Deserialize, Serialize};

/// What to do with an ingredient mention that resolves to nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Drop the mention; it adds no constraint
    #[default]
    FailOpen,
    /// Any unresolved mention empties the result set
    FailClosed,
}

/// A pipeline stage, as reported in `FilterOutcome::stages`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    AllergenExclusion,
    IngredientInclusion,
    Field(CriterionParameter),
}

/// Set sizes around one executed stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub before: usize,
    pub after: usize,
}

/// An ingredient mention and the entity it resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMention {
    pub mention: String,
    pub entity: String,
    pub tier: MatchTier,
}

/// Pipeline result with the per-stage trace
#[derive(Debug, Clone)]
pub struct FilterOutcome<'r> {
    pub recipes: Vec<&'r Entity>,
    pub stages: Vec<StageReport>,
    pub resolved: Vec<ResolvedMention>,
    pub unresolved: Vec<String>,
}

/// Per-field value comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// Case-insensitive equality
    Exact,
    /// Partial ratio above the threshold
    Fuzzy(u8),
}

impl Comparator {
    /// `wanted` must already be normalized
    pub fn matches(self, wanted: &str, actual: &str) -> bool {
        let actual = normalize_text(actual);
        match self {
            Comparator::Exact => actual == wanted,
            Comparator::Fuzzy(threshold) => is_fuzzy_match(wanted, &actual, threshold),
        }
    }
}

/// Configured filter pipeline
#[derive(Debug, Clone, Copy)]
pub struct FilterPipeline<'a> {
    resolver: EntityResolver<'a>,
    threshold: u8,
    unresolved: UnresolvedPolicy,
}

impl<'a> FilterPipeline<'a> {
    pub fn new(resolver: EntityResolver<'a>, threshold: u8, unresolved: UnresolvedPolicy) -> Self {
        Self {
            resolver: resolver.with_threshold(threshold),
            threshold,
            unresolved,
        }
    }

    /// Run every stage over `recipes`
    pub fn run<'r, I>(&self, recipes: I, criteria: &[Criterion]) -> FilterOutcome<'r>
    where
        I: IntoIterator<Item = &'r Entity>,
    {
        let mut outcome = FilterOutcome {
            recipes: recipes.into_iter().collect(),
            stages: Vec::new(),
            resolved: Vec::new(),
            unresolved: Vec::new(),
        };

        self.exclude_allergens(&mut outcome, criteria);
        self.include_ingredients(&mut outcome, criteria);

        for criterion in criteria {
            self.apply_field_filter(&mut outcome, criterion);
        }

        outcome
    }

    /// Stage 1: drop recipes with any ingredient close to any avoid term
    fn exclude_allergens(&self, outcome: &mut FilterOutcome<'_>, criteria: &[Criterion]) {
        let avoid = distinct_normalized(criteria.iter().flat_map(|c| c.avoid_values.iter()));
        if avoid.is_empty() {
            return;
        }

        let threshold = self.threshold;
        narrow(outcome, Stage::AllergenExclusion, |recipe| {
            !recipe.actual_ingredients().any(|ingredient| {
                let ingredient = normalize_text(ingredient);
                avoid
                    .iter()
                    .any(|term| is_fuzzy_match(&ingredient, term, threshold))
            })
        });
    }

    /// Stage 2: require every resolved ingredient entity
    fn include_ingredients(&self, outcome: &mut FilterOutcome<'_>, criteria: &[Criterion]) {
        let mentions = distinct_normalized(
            criteria
                .iter()
                .filter(|c| c.parameter == CriterionParameter::Ingredient)
                .flat_map(|c| c.value.iter().chain(c.values.iter())),
        );
        if mentions.is_empty() {
            return;
        }

        let mut targets: Vec<String> = Vec::new();
        for mention in mentions {
            match self.resolver.resolve_with_tier(&mention) {
                Some(resolution) => {
                    let target = normalize_text(&resolution.entity.name);
                    if !targets.contains(&target) {
                        targets.push(target);
                    }
                    outcome.resolved.push(ResolvedMention {
                        mention,
                        entity: resolution.entity.name.clone(),
                        tier: resolution.tier,
                    });
                }
                None => outcome.unresolved.push(mention),
            }
        }

        let fail_closed =
            self.unresolved == UnresolvedPolicy::FailClosed && !outcome.unresolved.is_empty();
        if targets.is_empty() && !fail_closed {
            return;
        }

        let threshold = self.threshold;
        narrow(outcome, Stage::IngredientInclusion, |recipe| {
            if fail_closed {
                return false;
            }
            let ingredients: Vec<String> = recipe.actual_ingredients().map(normalize_text).collect();
            targets.iter().all(|target| {
                ingredients
                    .iter()
                    .any(|ingredient| is_fuzzy_match(ingredient, target, threshold))
            })
        });
    }

    /// Stage 3: one categorical or scalar criterion
    fn apply_field_filter(&self, outcome: &mut FilterOutcome<'_>, criterion: &Criterion) {
        let (field, comparator) = match &criterion.parameter {
            CriterionParameter::Cuisine => (RecipeField::Cuisine, self.comparator(criterion)),
            CriterionParameter::Diet => (RecipeField::Diet, self.comparator(criterion)),
            CriterionParameter::Difficulty => (RecipeField::Difficulty, self.comparator(criterion)),
            CriterionParameter::Course => (RecipeField::Course, self.comparator(criterion)),
            // Cook Time never honours `custom`
            CriterionParameter::CookTime => (RecipeField::CookTime, Comparator::Exact),
            CriterionParameter::Ingredient => return,
            CriterionParameter::Other(name) => {
                tracing::debug!(parameter = %name, "Ignoring unrecognized criterion parameter");
                return;
            }
        };

        let Some(wanted) = criterion.value.as_deref().map(normalize_text) else {
            return;
        };

        narrow(outcome, Stage::Field(criterion.parameter.clone()), |recipe| {
            if field == RecipeField::CookTime {
                recipe
                    .cook_time()
                    .is_some_and(|actual| comparator.matches(&wanted, actual))
            } else {
                recipe
                    .field_values(field)
                    .any(|actual| comparator.matches(&wanted, actual))
            }
        });
    }

    fn comparator(&self, criterion: &Criterion) -> Comparator {
        if criterion.custom {
            Comparator::Fuzzy(self.threshold)
        } else {
            Comparator::Exact
        }
    }
}

/// Retain matching recipes and record the stage
fn narrow<F>(outcome: &mut FilterOutcome<'_>, stage: Stage, mut keep: F)
where
    F: FnMut(&Entity) -> bool,
{
    let before = outcome.recipes.len();
    outcome.recipes.retain(|recipe| keep(*recipe));
    let after = outcome.recipes.len();

    tracing::debug!(stage = ?stage, before, after, "Pipeline stage applied");
    outcome.stages.push(StageReport {
        stage,
        before,
        after,
    });
}

/// Normalized, non-blank, first-occurrence-ordered terms
fn distinct_normalized<'s, I>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = &'s String>,
{
    let mut out: Vec<String> = Vec::new();
    for term in terms {
        let term = normalize_text(term);
        if !term.is_empty() && !out.contains(&term) {
            out.push(term);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity_linking::LabelIndex;
    use crate::knowledge::KnowledgeStore;

    fn recipe(name: &str, ingredients: &[&str], cuisine: &str) -> Entity {
        Entity::named(name)
            .with_class("FoodRecipes")
            .with_field(RecipeField::ActualIngredients, ingredients.iter().copied())
            .with_field(RecipeField::Cuisine, [cuisine])
    }

    fn make_store() -> KnowledgeStore {
        KnowledgeStore::new(vec![
            Entity::named("Onion").with_pref_label("Onion"),
            Entity::named("Garlic").with_pref_label("Garlic"),
            recipe("Onion_Pakora", &["onion", "gram flour"], "Indian"),
            recipe("Garlic_Naan", &["garlic", "flour"], "Indian"),
            recipe("Onion_Garlic_Soup", &["onions", "garlic cloves"], "French"),
        ])
        .unwrap()
    }

    fn names(outcome: &FilterOutcome<'_>) -> Vec<String> {
        outcome.recipes.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_no_criteria_keeps_everything() {
        let store = make_store();
        let index = LabelIndex::build(&store);
        let pipeline = FilterPipeline::new(
            EntityResolver::new(&store, &index),
            80,
            UnresolvedPolicy::FailOpen,
        );

        let outcome = pipeline.run(store.recipes(Some("FoodRecipes")), &[]);
        assert_eq!(outcome.recipes.len(), 3);
        assert!(outcome.stages.is_empty());
    }

    #[test]
    fn test_stage_order_is_fixed() {
        let store = make_store();
        let index = LabelIndex::build(&store);
        let pipeline = FilterPipeline::new(
            EntityResolver::new(&store, &index),
            80,
            UnresolvedPolicy::FailOpen,
        );

        // Inclusion criterion listed before the exclusion one
        let criteria = vec![
            Criterion::new(CriterionParameter::Cuisine).with_value("Indian"),
            Criterion::new(CriterionParameter::Ingredient).with_values(["onion"]),
            Criterion::new(CriterionParameter::Ingredient).avoiding(["flour"]),
        ];
        let outcome = pipeline.run(store.recipes(Some("FoodRecipes")), &criteria);

        let stages: Vec<_> = outcome.stages.iter().map(|s| s.stage.clone()).collect();
        assert_eq!(
            stages,
            vec![
                Stage::AllergenExclusion,
                Stage::IngredientInclusion,
                Stage::Field(CriterionParameter::Cuisine),
            ]
        );
        assert!(outcome.recipes.is_empty());
    }

    #[test]
    fn test_unresolved_mention_fail_open() {
        let store = make_store();
        let index = LabelIndex::build(&store);
        let pipeline = FilterPipeline::new(
            EntityResolver::new(&store, &index),
            80,
            UnresolvedPolicy::FailOpen,
        );

        let criteria =
            vec![Criterion::new(CriterionParameter::Ingredient).with_values(["garlic", "zzzz"])];
        let outcome = pipeline.run(store.recipes(Some("FoodRecipes")), &criteria);

        assert_eq!(outcome.unresolved, vec!["zzzz"]);
        assert_eq!(names(&outcome), vec!["Garlic_Naan", "Onion_Garlic_Soup"]);
    }

    #[test]
    fn test_unresolved_mention_fail_closed() {
        let store = make_store();
        let index = LabelIndex::build(&store);
        let pipeline = FilterPipeline::new(
            EntityResolver::new(&store, &index),
            80,
            UnresolvedPolicy::FailClosed,
        );

        let criteria =
            vec![Criterion::new(CriterionParameter::Ingredient).with_values(["garlic", "zzzz"])];
        let outcome = pipeline.run(store.recipes(Some("FoodRecipes")), &criteria);
        assert!(outcome.recipes.is_empty());
    }

    #[test]
    fn test_resolved_mentions_reported() {
        let store = make_store();
        let index = LabelIndex::build(&store);
        let pipeline = FilterPipeline::new(
            EntityResolver::new(&store, &index),
            80,
            UnresolvedPolicy::FailOpen,
        );

        let criteria = vec![Criterion::new(CriterionParameter::Ingredient).with_value("Onion")];
        let outcome = pipeline.run(store.recipes(Some("FoodRecipes")), &criteria);

        assert_eq!(
            outcome.resolved,
            vec![ResolvedMention {
                mention: "onion".to_string(),
                entity: "Onion".to_string(),
                tier: MatchTier::Exact,
            }]
        );
        assert_eq!(names(&outcome), vec!["Onion_Pakora", "Onion_Garlic_Soup"]);
    }

    #[test]
    fn test_unknown_parameter_has_no_effect() {
        let store = make_store();
        let index = LabelIndex::build(&store);
        let pipeline = FilterPipeline::new(
            EntityResolver::new(&store, &index),
            80,
            UnresolvedPolicy::FailOpen,
        );

        let criteria = vec![
            Criterion::new(CriterionParameter::Other("Serving Size".into())).with_value("4"),
        ];
        let outcome = pipeline.run(store.recipes(Some("FoodRecipes")), &criteria);
        assert_eq!(outcome.recipes.len(), 3);
        assert!(outcome.stages.is_empty());
    }

    #[test]
    fn test_comparator_modes() {
        assert!(Comparator::Exact.matches("indian", "Indian"));
        assert!(!Comparator::Exact.matches("indian", "Indi"));
        assert!(Comparator::Fuzzy(80).matches("indin", "Indian"));
        assert!(!Comparator::Fuzzy(80).matches("indian", "French"));
    }
}
