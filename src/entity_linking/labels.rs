//! Label index for entity resolution
//!
//! Every entity contributes an ordered list of matchable labels:
//! preferred label, then scientific names, then alternate labels, all
//! normalized. The index is compiled once from the store and adds two
//! lookup tables so the resolver's exact and word tiers avoid a full scan:
//!
//! - exact index: label text → entity positions
//! - token index: label token → entity positions
//!
//! Positions are store positions and every posting list is ascending, so
//! the first entry of a list is the earliest entity in store order.

use super::normalize::{normalize_text, tokenize};
use crate::knowledge::{Entity, KnowledgeStore};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Where a label came from on its entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    Preferred,
    Scientific,
    /// Alternate label; language is informational and never affects matching
    Alternate { language: Option<&'static str> },
}

/// A normalized label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub source: LabelSource,
}

/// Labels of one entity, in match order. Empty labels are skipped.
pub fn entity_labels(entity: &Entity) -> Vec<Label> {
    let preferred = entity
        .pref_label
        .iter()
        .map(|l| (l.as_str(), LabelSource::Preferred));
    let scientific = entity
        .scientific_names
        .iter()
        .map(|l| (l.as_str(), LabelSource::Scientific));
    let alternate = entity.alt_labels.iter().map(|l| {
        (
            l.value.as_str(),
            LabelSource::Alternate {
                language: l.language(),
            },
        )
    });

    preferred
        .chain(scientific)
        .chain(alternate)
        .filter_map(|(raw, source)| {
            let text = normalize_text(raw);
            (!text.is_empty()).then_some(Label { text, source })
        })
        .collect()
}

/// Precomputed match data for one entity
#[derive(Debug, Clone)]
pub struct IndexedEntity {
    pub labels: Vec<Label>,
    /// Union of the whitespace tokens of every label
    pub label_words: HashSet<String>,
    /// Normalized entity name, the fuzzy-tier fallback
    pub name_norm: String,
}

/// Compiled label index over a knowledge store
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    entries: Vec<IndexedEntity>,
    exact_index: HashMap<String, SmallVec<[usize; 4]>>,
    token_index: HashMap<String, SmallVec<[usize; 8]>>,
}

impl LabelIndex {
    /// Compile the index; positions match `store.entities()`
    pub fn build(store: &KnowledgeStore) -> Self {
        let mut index = LabelIndex::default();

        for (pos, entity) in store.entities().iter().enumerate() {
            let labels = entity_labels(entity);
            let mut label_words = HashSet::new();

            for label in &labels {
                push_posting(index.exact_index.entry(label.text.clone()).or_default(), pos);
                for token in tokenize(&label.text) {
                    push_posting(index.token_index.entry(token.clone()).or_default(), pos);
                    label_words.insert(token);
                }
            }

            index.entries.push(IndexedEntity {
                labels,
                label_words,
                name_norm: normalize_text(&entity.name),
            });
        }

        tracing::debug!(
            entities = index.entries.len(),
            labels = index.exact_index.len(),
            tokens = index.token_index.len(),
            "Label index built"
        );

        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Match data for the entity at `pos`
    pub fn entry(&self, pos: usize) -> Option<&IndexedEntity> {
        self.entries.get(pos)
    }

    pub fn entries(&self) -> &[IndexedEntity] {
        &self.entries
    }

    /// Positions of entities carrying a label equal to `text` (normalized)
    pub fn exact_candidates(&self, text: &str) -> &[usize] {
        self.exact_index
            .get(text)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Positions of entities with `token` in some label
    pub fn token_candidates(&self, token: &str) -> &[usize] {
        self.token_index
            .get(token)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn token_count(&self) -> usize {
        self.token_index.len()
    }
}

/// Append keeping the list ascending and free of repeats
fn push_posting<A: smallvec::Array<Item = usize>>(list: &mut SmallVec<A>, pos: usize) {
    if list.last() != Some(&pos) {
        list.push(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> KnowledgeStore {
        KnowledgeStore::new(vec![
            Entity::named("Onion")
                .with_pref_label("Onion")
                .with_scientific_name("Allium cepa")
                .with_alt_label("Pyaaz", Some("hi"))
                .with_alt_label("Vengayam", Some("zz")),
            Entity::named("Red_Onion").with_pref_label("Red Onion"),
            Entity::named("Unlabelled_Thing"),
        ])
        .unwrap()
    }

    #[test]
    fn test_entity_labels_order_and_sources() {
        let store = sample_store();
        let labels = entity_labels(&store.entities()[0]);
        let texts: Vec<_> = labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["onion", "allium cepa", "pyaaz", "vengayam"]);
        assert_eq!(labels[0].source, LabelSource::Preferred);
        assert_eq!(labels[1].source, LabelSource::Scientific);
        assert_eq!(
            labels[2].source,
            LabelSource::Alternate {
                language: Some("Hindi")
            }
        );
        assert_eq!(
            labels[3].source,
            LabelSource::Alternate {
                language: Some("Unknown")
            }
        );
    }

    #[test]
    fn test_unlabelled_entity_has_no_labels() {
        let store = sample_store();
        assert!(entity_labels(&store.entities()[2]).is_empty());

        let index = LabelIndex::build(&store);
        let entry = index.entry(2).unwrap();
        assert!(entry.labels.is_empty());
        assert_eq!(entry.name_norm, "unlabelled_thing");
    }

    #[test]
    fn test_exact_and_token_postings() {
        let index = LabelIndex::build(&sample_store());
        assert_eq!(index.exact_candidates("onion"), &[0]);
        assert_eq!(index.exact_candidates("red onion"), &[1]);
        assert_eq!(index.token_candidates("onion"), &[0, 1]);
        assert_eq!(index.token_candidates("cepa"), &[0]);
        assert!(index.exact_candidates("garlic").is_empty());
    }

    #[test]
    fn test_repeated_token_posted_once() {
        let store = KnowledgeStore::new(vec![Entity::named("Dal")
            .with_pref_label("Dal")
            .with_alt_label("Dal Tadka", None)])
        .unwrap();
        let index = LabelIndex::build(&store);
        assert_eq!(index.token_candidates("dal"), &[0]);
    }
}
