//! Search criteria: request shape and normalization
//!
//! Callers send a list of loosely-typed criterion objects. `normalize`
//! turns them into validated `Criterion` values:
//! - `parameter` is required and parsed into `CriterionParameter`
//! - `value` is trimmed; blank becomes absent
//! - blank entries are removed from `values` / `avoidValues`
//! - `custom` is the truthiness of `customInput`
//!
//! Entries without a parameter, or with none of `value` / `values` /
//! `avoidValues` left after cleaning, are dropped silently.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Criterion as received from the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCriterion {
    #[serde(default)]
    pub parameter: Option<String>,
    /// Scalar value; numbers are accepted and read as text
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub values: Option<Vec<String>>,
    #[serde(default)]
    pub avoid_values: Option<Vec<String>>,
    /// Any truthy value enables fuzzy comparison for this criterion
    #[serde(default)]
    pub custom_input: Option<Value>,
}

/// Field a criterion filters on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CriterionParameter {
    Ingredient,
    CookTime,
    Cuisine,
    Diet,
    Difficulty,
    Course,
    /// Unrecognized name; kept, but no pipeline stage reads it
    Other(String),
}

impl CriterionParameter {
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "Ingredient" => CriterionParameter::Ingredient,
            "Cook Time" => CriterionParameter::CookTime,
            "Cuisine" => CriterionParameter::Cuisine,
            "Diet" => CriterionParameter::Diet,
            "Difficulty" => CriterionParameter::Difficulty,
            "Course" => CriterionParameter::Course,
            other => CriterionParameter::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CriterionParameter::Ingredient => "Ingredient",
            CriterionParameter::CookTime => "Cook Time",
            CriterionParameter::Cuisine => "Cuisine",
            CriterionParameter::Diet => "Diet",
            CriterionParameter::Difficulty => "Difficulty",
            CriterionParameter::Course => "Course",
            CriterionParameter::Other(name) => name,
        }
    }
}

impl fmt::Display for CriterionParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized filter request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub parameter: CriterionParameter,
    pub value: Option<String>,
    pub values: Vec<String>,
    pub avoid_values: Vec<String>,
    /// Fuzzy comparator for Cuisine/Diet/Difficulty/Course
    pub custom: bool,
}

impl Criterion {
    pub fn new(parameter: CriterionParameter) -> Self {
        Self {
            parameter,
            value: None,
            values: Vec::new(),
            avoid_values: Vec::new(),
            custom: false,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn avoiding<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.avoid_values.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn custom(mut self, custom: bool) -> Self {
        self.custom = custom;
        self
    }

    /// True when any of value / values / avoidValues is present
    pub fn has_terms(&self) -> bool {
        self.value.is_some() || !self.values.is_empty() || !self.avoid_values.is_empty()
    }
}

/// Normalize raw criteria, dropping unusable entries
pub fn normalize(raw: &[RawCriterion]) -> Vec<Criterion> {
    raw.iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            let criterion = normalize_one(entry);
            if criterion.is_none() {
                tracing::debug!(position, "Dropping criterion without parameter or values");
            }
            criterion
        })
        .collect()
}

fn normalize_one(raw: &RawCriterion) -> Option<Criterion> {
    let parameter = raw
        .parameter
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())?;

    let criterion = Criterion {
        parameter: CriterionParameter::parse(parameter),
        value: raw.value.as_ref().and_then(scalar_text),
        values: clean_list(raw.values.as_deref()),
        avoid_values: clean_list(raw.avoid_values.as_deref()),
        custom: raw.custom_input.as_ref().is_some_and(is_truthy),
    };

    criterion.has_terms().then_some(criterion)
}

/// Trimmed text of a scalar JSON value, `None` when blank or not a scalar
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn clean_list(list: Option<&[String]>) -> Vec<String> {
    list.unwrap_or_default()
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// JSON truthiness: null, false, 0, "" and empty containers are false
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: Value) -> Vec<RawCriterion> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_parse_request_shape() {
        let raw = parse(json!([
            {"parameter": "Ingredient", "values": ["onion", " garlic "], "avoidValues": ["peanut"]},
            {"parameter": "Cuisine", "value": " Indian ", "customInput": true}
        ]));
        let criteria = normalize(&raw);

        assert_eq!(criteria.len(), 2);
        assert_eq!(criteria[0].parameter, CriterionParameter::Ingredient);
        assert_eq!(criteria[0].values, vec!["onion", "garlic"]);
        assert_eq!(criteria[0].avoid_values, vec!["peanut"]);
        assert!(!criteria[0].custom);

        assert_eq!(criteria[1].parameter, CriterionParameter::Cuisine);
        assert_eq!(criteria[1].value.as_deref(), Some("Indian"));
        assert!(criteria[1].custom);
    }

    #[test]
    fn test_drops_entries_without_parameter() {
        let raw = parse(json!([
            {"value": "Indian"},
            {"parameter": "  ", "value": "Indian"}
        ]));
        assert!(normalize(&raw).is_empty());
    }

    #[test]
    fn test_drops_entries_without_terms() {
        let raw = parse(json!([
            {"parameter": "Ingredient", "value": "", "values": ["", "  "], "avoidValues": []},
            {"parameter": "Diet", "values": null}
        ]));
        assert!(normalize(&raw).is_empty());
    }

    #[test]
    fn test_numeric_value_read_as_text() {
        let raw = parse(json!([{"parameter": "Cook Time", "value": 30}]));
        let criteria = normalize(&raw);
        assert_eq!(criteria[0].parameter, CriterionParameter::CookTime);
        assert_eq!(criteria[0].value.as_deref(), Some("30"));
    }

    #[test]
    fn test_unknown_parameter_passes_through() {
        let raw = parse(json!([{"parameter": "Serving Size", "value": "4"}]));
        let criteria = normalize(&raw);
        assert_eq!(
            criteria[0].parameter,
            CriterionParameter::Other("Serving Size".to_string())
        );
    }

    #[test]
    fn test_custom_input_truthiness() {
        for (input, expected) in [
            (json!(true), true),
            (json!("yes"), true),
            (json!(1), true),
            (json!(["x"]), true),
            (json!(false), false),
            (json!(0), false),
            (json!(""), false),
            (json!(null), false),
            (json!({}), false),
        ] {
            let raw = parse(json!([{"parameter": "Diet", "value": "Vegan", "customInput": input}]));
            assert_eq!(normalize(&raw)[0].custom, expected, "customInput {input}");
        }
    }

    #[test]
    fn test_parameter_names_round_trip() {
        for name in ["Ingredient", "Cook Time", "Cuisine", "Diet", "Difficulty", "Course"] {
            assert_eq!(CriterionParameter::parse(name).as_str(), name);
        }
    }
}
