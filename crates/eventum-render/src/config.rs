//! Rendering configuration: parsing, default merge, and validation.
//!
//! Configuration text is a YAML mapping with two recognized user keys:
//!
//! ```yaml
//! params:
//!   hostname: web-01
//! samples:
//!   users:
//!     type: csv
//!     source: users.csv
//! ```
//!
//! The studio edits a single template at a time, so the `templates` section
//! and picking mode are not user-supplied: [`parse_config`] injects one
//! synthetic entry named for the template under edit with mode `all`,
//! overriding anything present in the raw text.
//!
//! Validation reports every invalid field at once as a deduplicated list of
//! messages rather than stopping at the first problem.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::RenderFailure;

/// How templates of a render set are picked for execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplatePickingMode {
    /// Every template in the set renders on each cycle.
    #[default]
    All,
    /// One template of the set is picked per cycle.
    Any,
}

/// Selection rule for one named template in the render set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Name the template body is registered under.
    pub template: String,
}

/// Format of a sample data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    Csv,
    Json,
}

/// Reference to a sample data source, exposed read-only to templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SampleConfig {
    #[serde(rename = "type")]
    pub kind: SampleKind,
    pub source: String,
}

/// Validated configuration for one render cycle.
///
/// Built fresh from the configuration text on every render; never mutated,
/// only replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderingConfig {
    pub mode: TemplatePickingMode,
    pub templates: BTreeMap<String, TemplateConfig>,
    pub params: BTreeMap<String, serde_json::Value>,
    pub samples: BTreeMap<String, SampleConfig>,
}

/// Parses and validates configuration text for the template named
/// `template_name`.
///
/// Pure function of its input. Failure classification:
///
/// - invalid YAML → [`RenderFailure::Parse`]
/// - valid YAML that is not a mapping → [`RenderFailure::Shape`] naming the
///   encountered type (an empty document parses to `null` and lands here)
/// - mapping with invalid fields → [`RenderFailure::ConfigValidation`] with
///   one message per field, deduplicated and sorted
pub fn parse_config(raw: &str, template_name: &str) -> Result<RenderingConfig, RenderFailure> {
    let value: serde_yaml::Value = serde_yaml::from_str(raw)?;

    let mapping = match value {
        serde_yaml::Value::Mapping(mapping) => mapping,
        other => return Err(RenderFailure::Shape(yaml_type_name(&other).to_string())),
    };

    let mut errors = BTreeSet::new();
    let mut params = BTreeMap::new();
    let mut samples = BTreeMap::new();

    for (key, val) in &mapping {
        let Some(key) = key.as_str() else {
            errors.insert(format!(
                "top-level keys must be strings, got {}",
                yaml_type_name(key)
            ));
            continue;
        };
        match key {
            // Overridden by the injected defaults below.
            "mode" | "templates" => {}
            "params" => collect_params(val, &mut params, &mut errors),
            "samples" => collect_samples(val, &mut samples, &mut errors),
            other => {
                errors.insert(format!("unknown field `{}`", other));
            }
        }
    }

    if !errors.is_empty() {
        return Err(RenderFailure::ConfigValidation(
            errors.into_iter().collect(),
        ));
    }

    let mut templates = BTreeMap::new();
    templates.insert(
        template_name.to_string(),
        TemplateConfig {
            template: template_name.to_string(),
        },
    );

    Ok(RenderingConfig {
        mode: TemplatePickingMode::All,
        templates,
        params,
        samples,
    })
}

fn collect_params(
    value: &serde_yaml::Value,
    params: &mut BTreeMap<String, serde_json::Value>,
    errors: &mut BTreeSet<String>,
) {
    let Some(mapping) = value.as_mapping() else {
        errors.insert(format!(
            "params: key-value mapping expected, but got {}",
            yaml_type_name(value)
        ));
        return;
    };
    for (key, val) in mapping {
        let Some(name) = key.as_str() else {
            errors.insert(format!(
                "params: parameter names must be strings, got {}",
                yaml_type_name(key)
            ));
            continue;
        };
        match serde_json::to_value(val) {
            Ok(json) => {
                params.insert(name.to_string(), json);
            }
            Err(e) => {
                errors.insert(format!("params.{}: {}", name, e));
            }
        }
    }
}

fn collect_samples(
    value: &serde_yaml::Value,
    samples: &mut BTreeMap<String, SampleConfig>,
    errors: &mut BTreeSet<String>,
) {
    let Some(mapping) = value.as_mapping() else {
        errors.insert(format!(
            "samples: key-value mapping expected, but got {}",
            yaml_type_name(value)
        ));
        return;
    };
    for (key, val) in mapping {
        let Some(name) = key.as_str() else {
            errors.insert(format!(
                "samples: sample names must be strings, got {}",
                yaml_type_name(key)
            ));
            continue;
        };
        match serde_yaml::from_value::<SampleConfig>(val.clone()) {
            Ok(sample) => {
                samples.insert(name.to_string(), sample);
            }
            Err(e) => {
                errors.insert(format!("samples.{}: {}", name, e));
            }
        }
    }
}

fn yaml_type_name(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mapping_uses_defaults() {
        let config = parse_config("{}", "template.jinja").unwrap();
        assert_eq!(config.mode, TemplatePickingMode::All);
        assert!(config.params.is_empty());
        assert!(config.samples.is_empty());
        assert_eq!(config.templates.len(), 1);
        assert_eq!(
            config.templates["template.jinja"].template,
            "template.jinja"
        );
    }

    #[test]
    fn test_params_pass_through() {
        let config = parse_config("params:\n  hostname: web-01\n  retries: 3\n", "t").unwrap();
        assert_eq!(config.params["hostname"], serde_json::json!("web-01"));
        assert_eq!(config.params["retries"], serde_json::json!(3));
    }

    #[test]
    fn test_samples_parse() {
        let config = parse_config(
            "samples:\n  users:\n    type: csv\n    source: users.csv\n",
            "t",
        )
        .unwrap();
        let sample = &config.samples["users"];
        assert_eq!(sample.kind, SampleKind::Csv);
        assert_eq!(sample.source, "users.csv");
    }

    #[test]
    fn test_malformed_yaml_is_parse_failure() {
        let err = parse_config("not: valid: yaml: :", "t").unwrap_err();
        assert!(matches!(err, RenderFailure::Parse(_)));
    }

    #[test]
    fn test_sequence_is_shape_failure() {
        let err = parse_config("- a\n- b\n", "t").unwrap_err();
        match err {
            RenderFailure::Shape(ty) => assert_eq!(ty, "sequence"),
            other => panic!("expected shape failure, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_document_is_shape_failure() {
        let err = parse_config("", "t").unwrap_err();
        match err {
            RenderFailure::Shape(ty) => assert_eq!(ty, "null"),
            other => panic!("expected shape failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_fields_collected_and_sorted() {
        let err = parse_config("zebra: 1\napple: 2\n", "t").unwrap_err();
        match err {
            RenderFailure::ConfigValidation(messages) => {
                assert_eq!(
                    messages,
                    vec![
                        "unknown field `apple`".to_string(),
                        "unknown field `zebra`".to_string(),
                    ]
                );
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_non_mapping_params_is_validation_failure() {
        let err = parse_config("params: 5\n", "t").unwrap_err();
        match err {
            RenderFailure::ConfigValidation(messages) => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0].contains("params"));
                assert!(messages[0].contains("number"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_sample_entry_names_the_sample() {
        let err = parse_config("samples:\n  users: 5\n", "t").unwrap_err();
        match err {
            RenderFailure::ConfigValidation(messages) => {
                assert!(messages[0].starts_with("samples.users:"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_user_templates_and_mode_are_overridden() {
        let config = parse_config(
            "mode: any\ntemplates:\n  other:\n    template: other.jinja\n",
            "template.jinja",
        )
        .unwrap();
        assert_eq!(config.mode, TemplatePickingMode::All);
        assert_eq!(config.templates.len(), 1);
        assert!(config.templates.contains_key("template.jinja"));
    }
}
