//! Prediction form derivation and validation
//!
//! Pure data: the schema reported by `/status` becomes a list of fields, and
//! the values entered for those fields become a `/predict` request. Rendering
//! lives in `app::views`.

use crate::constants::FEATURE_ID_PREFIX;
use crate::messages;
use crate::types::{FeatureSchema, FeatureValues};
use std::collections::HashMap;
use thiserror::Error;

/// Client-side validation failures; none of these reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", messages::MISSING_FILE)]
    MissingFile,
    #[error("{}", messages::NO_TRAINED_MODEL)]
    NoTrainedModel,
    /// First feature found without a value
    #[error("{}", messages::FILL_ALL_FIELDS)]
    IncompleteFields { feature: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub id: String,
    pub name: String,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Categorical feature; first option is the disabled placeholder
    Select { options: Vec<SelectOption> },
    /// Free-form feature
    Text { placeholder: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub disabled: bool,
    pub selected: bool,
}

impl FormField {
    /// Value the input starts with
    pub fn initial_value(&self) -> String {
        match &self.kind {
            FieldKind::Select { options } => options
                .iter()
                .find(|o| o.selected)
                .map(|o| o.value.clone())
                .unwrap_or_default(),
            FieldKind::Text { .. } => String::new(),
        }
    }
}

pub fn field_id(feature: &str) -> String {
    format!("{}{}", FEATURE_ID_PREFIX, feature)
}

/// One field per feature, in schema order.
pub fn build_form(schema: &FeatureSchema) -> Vec<FormField> {
    schema
        .iter()
        .map(|(name, values)| {
            let kind = if values.is_empty() {
                FieldKind::Text {
                    placeholder: messages::text_placeholder(name),
                }
            } else {
                let placeholder = SelectOption {
                    value: String::new(),
                    label: messages::select_placeholder(name),
                    disabled: true,
                    selected: true,
                };
                let options = std::iter::once(placeholder)
                    .chain(values.iter().map(|v| SelectOption {
                        value: v.clone(),
                        label: v.clone(),
                        disabled: false,
                        selected: false,
                    }))
                    .collect();
                FieldKind::Select { options }
            };
            FormField {
                id: field_id(name),
                name: name.to_string(),
                kind,
            }
        })
        .collect()
}

/// Current input values, keyed by field id
#[derive(Debug, Clone, Default)]
pub struct FormInputs {
    values: HashMap<String, String>,
}

impl FormInputs {
    /// Fresh inputs for `fields`; nothing from a previous form survives.
    pub fn for_fields(fields: &[FormField]) -> Self {
        Self {
            values: fields
                .iter()
                .map(|f| (f.id.clone(), f.initial_value()))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.values.get(id).map(String::as_str)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut String> {
        self.values.get_mut(id)
    }

    #[cfg(test)]
    pub fn set(&mut self, id: &str, value: impl Into<String>) {
        self.values.insert(id.to_string(), value.into());
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Read every schema feature from `inputs`, trimmed.
///
/// All-or-nothing: a missing input or an empty value fails the whole form.
pub fn collect_features(schema: &FeatureSchema, inputs: &FormInputs) -> Result<FeatureValues, ValidationError> {
    let mut features = FeatureValues::new();
    for name in schema.keys() {
        let value = inputs.get(&field_id(name)).map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(ValidationError::IncompleteFields {
                feature: name.to_string(),
            });
        }
        features.insert(name.clone(), value.to_string());
    }
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(entries: &[(&str, Vec<&str>)]) -> FeatureSchema {
        entries
            .iter()
            .map(|(name, values)| (name.to_string(), values.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    #[test]
    fn builds_text_and_select_fields() {
        let form = build_form(&schema(&[("age", vec![]), ("color", vec!["red", "blue"])]));
        assert_eq!(form.len(), 2);

        assert_eq!(form[0].id, "feature-age");
        assert_eq!(form[0].name, "age");
        assert_eq!(
            form[0].kind,
            FieldKind::Text {
                placeholder: "Enter a value for age".into()
            }
        );

        assert_eq!(form[1].id, "feature-color");
        let FieldKind::Select { options } = &form[1].kind else {
            panic!("color should be a select");
        };
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["", "red", "blue"]);
        assert!(options[0].disabled && options[0].selected);
        assert!(options[1..].iter().all(|o| !o.disabled && !o.selected && o.label == o.value));
    }

    #[test]
    fn form_follows_schema_order() {
        let form = build_form(&schema(&[("z", vec![]), ("a", vec!["1"]), ("m", vec![])]));
        let names: Vec<&str> = form.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["z", "a", "m"]);
    }

    #[test]
    fn fresh_inputs_start_empty() {
        let form = build_form(&schema(&[("age", vec![]), ("color", vec!["red"])]));
        let inputs = FormInputs::for_fields(&form);
        assert_eq!(inputs.get("feature-age"), Some(""));
        assert_eq!(inputs.get("feature-color"), Some(""));
        assert_eq!(inputs.get("feature-other"), None);
    }

    #[test]
    fn collects_trimmed_values_in_schema_order() {
        let s = schema(&[("age", vec![]), ("color", vec!["red", "blue"])]);
        let mut inputs = FormInputs::for_fields(&build_form(&s));
        inputs.set("feature-age", "  42 ");
        inputs.set("feature-color", "blue");

        let features = collect_features(&s, &inputs).unwrap();
        let pairs: Vec<(&str, &str)> = features.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, [("age", "42"), ("color", "blue")]);
    }

    #[test]
    fn blank_field_fails_whole_form() {
        let s = schema(&[("age", vec![]), ("color", vec!["red"])]);
        let mut inputs = FormInputs::for_fields(&build_form(&s));
        inputs.set("feature-age", "   ");
        inputs.set("feature-color", "red");

        let err = collect_features(&s, &inputs).unwrap_err();
        assert_eq!(err, ValidationError::IncompleteFields { feature: "age".into() });
        assert_eq!(err.to_string(), "Please fill in all fields.");
    }

    #[test]
    fn missing_input_fails_whole_form() {
        let s = schema(&[("age", vec![]), ("color", vec!["red"])]);
        let mut inputs = FormInputs::default();
        inputs.set("feature-age", "30");

        let err = collect_features(&s, &inputs).unwrap_err();
        assert_eq!(err, ValidationError::IncompleteFields { feature: "color".into() });
    }
}
