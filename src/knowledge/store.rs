//! Read-only knowledge store
//!
//! The `KnowledgeStore` is built once at startup, either from a JSON export
//! of the knowledge base or from a compiled bincode snapshot, and is shared
//! by reference for the rest of the process lifetime. Iteration order is the
//! order of the source document and is what every "first match" rule in
//! resolution and lookup refers to.

use super::entity::{AltLabel, Entity, PropertyValue};
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

/// Snapshot format version - increment when `Entity` layout changes
pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk snapshot layout
#[derive(Debug, Serialize, Deserialize)]
struct KnowledgeSnapshot {
    version: u32,
    entities: Vec<Entity>,
}

/// Immutable collection of knowledge-base entities
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    entities: Vec<Entity>,
    /// Exact name → position in `entities`
    name_index: HashMap<String, usize>,
}

impl KnowledgeStore {
    /// Build a store, rejecting duplicate entity names
    pub fn new(entities: Vec<Entity>) -> Result<Self, StoreError> {
        let mut name_index = HashMap::with_capacity(entities.len());
        for (idx, entity) in entities.iter().enumerate() {
            if name_index.insert(entity.name.clone(), idx).is_some() {
                return Err(StoreError::DuplicateEntity(entity.name.clone()));
            }
        }
        Ok(Self {
            entities,
            name_index,
        })
    }

    /// Parse a JSON export (either `{"entities": [...]}` or a bare array)
    pub fn from_json_str(content: &str) -> Result<Self, StoreError> {
        let document: StoreDocument = serde_json::from_str(content)?;
        let entities = match document {
            StoreDocument::Wrapped { entities } | StoreDocument::Bare(entities) => entities,
        };
        Self::new(entities.into_iter().map(Entity::from).collect())
    }

    /// Load a JSON export from disk
    pub fn from_json_file(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load a compiled snapshot from disk
    pub fn load_snapshot(path: &Path) -> Result<Self, StoreError> {
        let bytes = std::fs::read(path)?;
        let snapshot: KnowledgeSnapshot = bincode::deserialize(&bytes)?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }

        Self::new(snapshot.entities)
    }

    /// Save a compiled snapshot to disk
    pub fn save_snapshot(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let snapshot = KnowledgeSnapshot {
            version: SNAPSHOT_VERSION,
            entities: self.entities.clone(),
        };
        std::fs::write(path, bincode::serialize(&snapshot)?)?;
        Ok(())
    }

    /// All entities in store order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get entity by exact name
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.name_index.get(name).map(|&idx| &self.entities[idx])
    }

    /// First entity, in store order, whose name equals `query` ignoring case
    pub fn find_by_name_ignore_case(&self, query: &str) -> Option<&Entity> {
        let query = query.to_lowercase();
        self.entities
            .iter()
            .find(|e| e.name.to_lowercase() == query)
    }

    /// Recipe candidates: members of `recipe_class`, or every entity when `None`
    pub fn recipes<'a>(&'a self, recipe_class: Option<&'a str>) -> impl Iterator<Item = &'a Entity> {
        self.entities
            .iter()
            .filter(move |e| recipe_class.map_or(true, |class| e.is_member_of(class)))
    }

    /// Statistics for debugging
    pub fn stats(&self, recipe_class: Option<&str>) -> StoreStats {
        StoreStats {
            entity_count: self.entities.len(),
            recipe_count: self.recipes(recipe_class).count(),
            label_count: self
                .entities
                .iter()
                .map(|e| {
                    usize::from(e.pref_label.is_some())
                        + e.scientific_names.len()
                        + e.alt_labels.len()
                })
                .sum(),
            property_value_count: self
                .entities
                .iter()
                .flat_map(|e| e.properties.values())
                .map(Vec::len)
                .sum(),
        }
    }
}

/// Store statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub entity_count: usize,
    pub recipe_count: usize,
    pub label_count: usize,
    pub property_value_count: usize,
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Knowledge Store Statistics:")?;
        writeln!(f, "  Entities: {}", self.entity_count)?;
        writeln!(f, "  Recipes: {}", self.recipe_count)?;
        writeln!(f, "  Labels: {}", self.label_count)?;
        writeln!(f, "  Property values: {}", self.property_value_count)?;
        Ok(())
    }
}

// ============================================================================
// JSON export format
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum StoreDocument {
    Wrapped { entities: Vec<EntityDocument> },
    Bare(Vec<EntityDocument>),
}

#[derive(Deserialize)]
struct EntityDocument {
    name: String,
    #[serde(default, alias = "is_a")]
    classes: Vec<String>,
    #[serde(default, alias = "pref_label")]
    has_pref_label: Option<String>,
    #[serde(default, alias = "scientific_names")]
    has_scientific_name: Vec<String>,
    #[serde(default, alias = "alt_labels")]
    has_alt_labels: Vec<AltLabelDocument>,
    #[serde(default)]
    properties: BTreeMap<String, ValuesDocument>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AltLabelDocument {
    Plain(String),
    Tagged {
        value: String,
        #[serde(default)]
        lang: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValuesDocument {
    Many(Vec<ValueDocument>),
    One(ValueDocument),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueDocument {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    Reference { entity: String },
}

impl From<ValueDocument> for PropertyValue {
    fn from(doc: ValueDocument) -> Self {
        match doc {
            ValueDocument::Text(s) => PropertyValue::Text(s),
            ValueDocument::Number(n) => PropertyValue::Text(n.to_string()),
            ValueDocument::Bool(b) => PropertyValue::Text(b.to_string()),
            ValueDocument::Reference { entity } => PropertyValue::Entity(entity),
        }
    }
}

impl From<EntityDocument> for Entity {
    fn from(doc: EntityDocument) -> Self {
        let alt_labels = doc
            .has_alt_labels
            .into_iter()
            .map(|label| match label {
                AltLabelDocument::Plain(value) => AltLabel { value, lang: None },
                AltLabelDocument::Tagged { value, lang } => AltLabel { value, lang },
            })
            .collect();

        let properties = doc
            .properties
            .into_iter()
            .map(|(name, values)| {
                let values = match values {
                    ValuesDocument::Many(v) => v.into_iter().map(PropertyValue::from).collect(),
                    ValuesDocument::One(v) => vec![PropertyValue::from(v)],
                };
                (name, values)
            })
            .collect();

        Entity {
            name: doc.name,
            classes: doc.classes,
            pref_label: doc.has_pref_label,
            scientific_names: doc.has_scientific_name,
            alt_labels,
            properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "entities": [
            {
                "name": "Onion",
                "classes": ["FoodIngredients"],
                "has_pref_label": "Onion",
                "has_scientific_name": ["Allium cepa"],
                "has_alt_labels": [{"value": "Pyaaz", "lang": "hi"}, "Kanda"]
            },
            {
                "name": "Aloo_Gobi",
                "classes": ["FoodRecipes"],
                "properties": {
                    "hasActualIngredients": ["potato", "cauliflower"],
                    "hasCookTime": 30,
                    "hasCuisine": ["Indian"],
                    "hasMainIngredient": [{"entity": "Onion"}]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_json_export() {
        let store = KnowledgeStore::from_json_str(SAMPLE).unwrap();
        assert_eq!(store.len(), 2);

        let onion = store.get("Onion").unwrap();
        assert_eq!(onion.scientific_names, vec!["Allium cepa"]);
        assert_eq!(onion.alt_labels[0].lang.as_deref(), Some("hi"));
        assert_eq!(onion.alt_labels[1].lang, None);

        let recipe = store.get("Aloo_Gobi").unwrap();
        assert_eq!(recipe.cook_time(), Some("30"));
        assert_eq!(
            recipe.values("hasMainIngredient"),
            &[PropertyValue::Entity("Onion".to_string())]
        );
    }

    #[test]
    fn test_bare_array_export() {
        let store = KnowledgeStore::from_json_str(r#"[{"name": "a"}, {"name": "b"}]"#).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.entities()[1].name, "b");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = KnowledgeStore::from_json_str(r#"[{"name": "a"}, {"name": "a"}]"#).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEntity(name) if name == "a"));
    }

    #[test]
    fn test_recipes_filtered_by_class() {
        let store = KnowledgeStore::from_json_str(SAMPLE).unwrap();
        let recipes: Vec<_> = store.recipes(Some("FoodRecipes")).collect();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].name, "Aloo_Gobi");
        assert_eq!(store.recipes(None).count(), 2);
    }

    #[test]
    fn test_find_by_name_ignore_case() {
        let store = KnowledgeStore::from_json_str(SAMPLE).unwrap();
        assert_eq!(
            store.find_by_name_ignore_case("aloo_gobi").map(|e| e.name.as_str()),
            Some("Aloo_Gobi")
        );
        assert!(store.find_by_name_ignore_case("aloo").is_none());
    }

    #[test]
    fn test_snapshot_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb").join("snapshot.bin");

        let store = KnowledgeStore::from_json_str(SAMPLE).unwrap();
        store.save_snapshot(&path).unwrap();

        let loaded = KnowledgeStore::load_snapshot(&path).unwrap();
        assert_eq!(loaded.entities(), store.entities());
    }

    #[test]
    fn test_stats() {
        let store = KnowledgeStore::from_json_str(SAMPLE).unwrap();
        let stats = store.stats(Some("FoodRecipes"));
        assert_eq!(stats.entity_count, 2);
        assert_eq!(stats.recipe_count, 1);
        assert_eq!(stats.label_count, 4);
        assert_eq!(stats.property_value_count, 5);
    }
}
