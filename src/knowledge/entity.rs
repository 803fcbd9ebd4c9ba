//! Knowledge-base entity types
//!
//! An `Entity` is one record of the food knowledge base: an ingredient, a
//! recipe or any other food concept. Property access is typed and always
//! present: a missing property reads as an empty slice, never as an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Recognized alternate-label language tags and their display names
const LANGUAGE_TAGS: &[(&str, &str)] = &[
    ("as", "Assamese"),
    ("bn", "Bengali"),
    ("en", "English"),
    ("gu", "Gujarati"),
    ("hi", "Hindi"),
    ("kn", "Kannada"),
    ("ks", "Kashmiri"),
    ("kha", "Khasi"),
    ("kok", "Konkani"),
    ("ml", "Malayalam"),
    ("mni", "Manipuri"),
    ("mr", "Marathi"),
    ("ne", "Nepali"),
    ("or", "Oriya"),
    ("pa", "Punjabi"),
    ("sa", "Sanskrit"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("ur", "Urdu"),
    ("cmn", "Common_Name"),
];

/// Full language name for an alternate-label tag, `"Unknown"` if unrecognized
pub fn language_name(tag: &str) -> &'static str {
    LANGUAGE_TAGS
        .iter()
        .find(|(code, _)| *code == tag)
        .map(|(_, name)| *name)
        .unwrap_or("Unknown")
}

/// An alternate label with an optional language tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltLabel {
    pub value: String,
    pub lang: Option<String>,
}

impl AltLabel {
    pub fn new(value: impl Into<String>, lang: Option<&str>) -> Self {
        Self {
            value: value.into(),
            lang: lang.map(str::to_string),
        }
    }

    /// Display name of the label's language; informational only
    pub fn language(&self) -> Option<&'static str> {
        self.lang.as_deref().map(language_name)
    }
}

/// A single property value: literal text or a reference to another entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    Text(String),
    /// Nested entity, held by its unique name
    Entity(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyValue::Text(s) | PropertyValue::Entity(s) => s,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recipe properties consulted by the filter pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeField {
    ActualIngredients,
    CookTime,
    Cuisine,
    Diet,
    Difficulty,
    Course,
}

impl RecipeField {
    /// Knowledge-base property name backing this field
    pub fn property_name(self) -> &'static str {
        match self {
            RecipeField::ActualIngredients => "hasActualIngredients",
            RecipeField::CookTime => "hasCookTime",
            RecipeField::Cuisine => "hasCuisine",
            RecipeField::Diet => "hasDiet",
            RecipeField::Difficulty => "hasDifficulty",
            RecipeField::Course => "hasCourse",
        }
    }
}

/// A knowledge-base record
///
/// Immutable once loaded. Property values keep their stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique name within the store
    pub name: String,
    /// Class memberships (e.g. "FoodRecipes", "FoodIngredients")
    pub classes: Vec<String>,
    pub pref_label: Option<String>,
    pub scientific_names: Vec<String>,
    pub alt_labels: Vec<AltLabel>,
    pub properties: BTreeMap<String, Vec<PropertyValue>>,
}

impl Entity {
    /// Bare entity with a name and nothing else
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classes: Vec::new(),
            pref_label: None,
            scientific_names: Vec::new(),
            alt_labels: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_pref_label(mut self, label: impl Into<String>) -> Self {
        self.pref_label = Some(label.into());
        self
    }

    pub fn with_scientific_name(mut self, name: impl Into<String>) -> Self {
        self.scientific_names.push(name.into());
        self
    }

    pub fn with_alt_label(mut self, value: impl Into<String>, lang: Option<&str>) -> Self {
        self.alt_labels.push(AltLabel::new(value, lang));
        self
    }

    /// Append text values to a property
    pub fn with_texts<I, S>(mut self, property: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties
            .entry(property.to_string())
            .or_default()
            .extend(values.into_iter().map(|v| PropertyValue::Text(v.into())));
        self
    }

    /// Append text values to a recipe field
    pub fn with_field<I, S>(self, field: RecipeField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_texts(field.property_name(), values)
    }

    pub fn is_member_of(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Values of a property, empty if the entity does not carry it
    pub fn values(&self, property: &str) -> &[PropertyValue] {
        self.properties
            .get(property)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Values of a recipe field as strings
    pub fn field_values(&self, field: RecipeField) -> impl Iterator<Item = &str> {
        self.values(field.property_name())
            .iter()
            .map(PropertyValue::as_str)
    }

    pub fn actual_ingredients(&self) -> impl Iterator<Item = &str> {
        self.field_values(RecipeField::ActualIngredients)
    }

    /// First `hasCookTime` value, the only one the pipeline compares
    pub fn cook_time(&self) -> Option<&str> {
        self.field_values(RecipeField::CookTime).next()
    }
}
