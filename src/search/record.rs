//! Public response shape for matched recipes

use crate::knowledge::Entity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A matched recipe as returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    /// Every property the entity carries, stringified, in sorted order
    pub properties: BTreeMap<String, Vec<String>>,
}

/// Format a recipe entity. Nested entity values render as their names.
pub fn format_record(recipe: &Entity) -> RecipeRecord {
    RecipeRecord {
        name: recipe.name.clone(),
        record_type: "Recipe".to_string(),
        properties: recipe
            .properties
            .iter()
            .map(|(name, values)| (name.clone(), values.iter().map(|v| v.to_string()).collect()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{PropertyValue, RecipeField};
    use serde_json::json;

    #[test]
    fn test_format_record_json_shape() {
        let mut recipe = Entity::named("Aloo_Gobi")
            .with_class("FoodRecipes")
            .with_field(RecipeField::Cuisine, ["Indian"])
            .with_field(RecipeField::ActualIngredients, ["potato", "cauliflower"]);
        recipe
            .properties
            .insert("hasMainIngredient".into(), vec![PropertyValue::Entity("Potato".into())]);

        let record = format_record(&recipe);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "name": "Aloo_Gobi",
                "type": "Recipe",
                "properties": {
                    "hasActualIngredients": ["potato", "cauliflower"],
                    "hasCuisine": ["Indian"],
                    "hasMainIngredient": ["Potato"]
                }
            })
        );
    }

    #[test]
    fn test_entity_without_properties() {
        let record = format_record(&Entity::named("Plain"));
        assert_eq!(record.record_type, "Recipe");
        assert!(record.properties.is_empty());
    }
}
