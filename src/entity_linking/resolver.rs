//! Tiered entity resolution for free-text ingredient mentions
//!
//! A mention resolves to at most one entity. Candidates fall into three
//! tiers, highest precedence first:
//!
//! 1. **Exact** - the normalized mention equals one of the entity's labels
//! 2. **Word** - the mention shares a whitespace token with some label
//! 3. **Fuzzy** - partial ratio against a label, or the entity name, exceeds
//!    the threshold
//!
//! An exact match short-circuits that entity only: it is not also tested
//! for the lower tiers. The winner is the earliest entity, in store order,
//! of the first non-empty tier.
//!
//! [`EntityResolver::resolve`] answers the exact and word tiers from the
//! label index and only scans for the fuzzy tier.
//! [`EntityResolver::collect_tiers`] is the plain single pass over every
//! entity and returns all three candidate sets; both pick the same winner.

use super::fuzzy::{is_fuzzy_match, MATCH_THRESHOLD};
use super::labels::{IndexedEntity, LabelIndex};
use super::normalize::{normalize_text, word_set};
use crate::knowledge::{Entity, KnowledgeStore};
use std::collections::HashSet;
use std::fmt;

/// Resolver precedence class, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchTier {
    Exact,
    Word,
    Fuzzy,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchTier::Exact => "exact",
            MatchTier::Word => "word",
            MatchTier::Fuzzy => "fuzzy",
        })
    }
}

/// A resolved mention
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub entity: &'a Entity,
    pub tier: MatchTier,
}

/// Candidate sets from a full pass, each in store order
#[derive(Debug, Clone, Default)]
pub struct TierSets<'a> {
    pub exact: Vec<&'a Entity>,
    pub word: Vec<&'a Entity>,
    pub fuzzy: Vec<&'a Entity>,
}

impl<'a> TierSets<'a> {
    /// First member of the first non-empty set
    pub fn winner(&self) -> Option<Resolution<'a>> {
        [
            (MatchTier::Exact, &self.exact),
            (MatchTier::Word, &self.word),
            (MatchTier::Fuzzy, &self.fuzzy),
        ]
        .into_iter()
        .find_map(|(tier, set)| set.first().map(|&entity| Resolution { entity, tier }))
    }
}

/// Resolves mentions against a store through its label index
#[derive(Debug, Clone, Copy)]
pub struct EntityResolver<'a> {
    store: &'a KnowledgeStore,
    index: &'a LabelIndex,
    threshold: u8,
}

impl<'a> EntityResolver<'a> {
    /// `index` must have been built from `store`
    pub fn new(store: &'a KnowledgeStore, index: &'a LabelIndex) -> Self {
        Self {
            store,
            index,
            threshold: MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Resolve a mention to its canonical entity
    pub fn resolve(&self, mention: &str) -> Option<&'a Entity> {
        self.resolve_with_tier(mention).map(|r| r.entity)
    }

    /// Resolve a mention, reporting which tier produced the match
    pub fn resolve_with_tier(&self, mention: &str) -> Option<Resolution<'a>> {
        let mention = normalize_text(mention);
        if mention.is_empty() {
            return None;
        }

        let resolution = self.lookup(&mention);

        match &resolution {
            Some(r) => tracing::debug!(
                mention = %mention,
                entity = %r.entity.name,
                tier = %r.tier,
                "Mention resolved"
            ),
            None => tracing::info!(mention = %mention, "Mention did not resolve"),
        }

        resolution
    }

    fn lookup(&self, mention: &str) -> Option<Resolution<'a>> {
        // Fast path: exact label match
        if let Some(&pos) = self.index.exact_candidates(mention).first() {
            return self.resolution(pos, MatchTier::Exact);
        }

        // Token overlap via token_index
        let words = word_set(mention);
        let word_hit = words
            .iter()
            .filter_map(|w| self.index.token_candidates(w).first().copied())
            .min();
        if let Some(pos) = word_hit {
            return self.resolution(pos, MatchTier::Word);
        }

        // Slow path: fuzzy scan in store order
        let pos = self
            .index
            .entries()
            .iter()
            .position(|entry| self.fuzzy_hit(mention, entry))?;
        self.resolution(pos, MatchTier::Fuzzy)
    }

    /// Single pass over every entity, collecting all three tier sets
    pub fn collect_tiers(&self, mention: &str) -> TierSets<'a> {
        let mention = normalize_text(mention);
        let mut sets = TierSets::default();
        if mention.is_empty() {
            return sets;
        }

        let words: HashSet<String> = word_set(&mention);

        for (entity, entry) in self.store.entities().iter().zip(self.index.entries()) {
            if entry.labels.iter().any(|l| l.text == mention) {
                sets.exact.push(entity);
                continue;
            }
            if !entry.label_words.is_disjoint(&words) {
                sets.word.push(entity);
            }
            if self.fuzzy_hit(&mention, entry) {
                sets.fuzzy.push(entity);
            }
        }

        sets
    }

    fn fuzzy_hit(&self, mention: &str, entry: &IndexedEntity) -> bool {
        entry
            .labels
            .iter()
            .map(|l| l.text.as_str())
            .chain(std::iter::once(entry.name_norm.as_str()))
            .any(|text| is_fuzzy_match(mention, text, self.threshold))
    }

    fn resolution(&self, pos: usize, tier: MatchTier) -> Option<Resolution<'a>> {
        self.store
            .entities()
            .get(pos)
            .map(|entity| Resolution { entity, tier })
    }
}
