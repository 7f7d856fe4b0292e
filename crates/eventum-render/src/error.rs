//! Error types for the render core.
//!
//! This module provides [`RenderFailure`], the closed set of ways a render
//! cycle can fail. Callers match on the variant rather than inspecting
//! message text; every variant is recoverable and leaves session state
//! untouched.

use std::fmt;

/// Classified failure of one render cycle.
#[derive(Debug)]
pub enum RenderFailure {
    /// Configuration text is not syntactically valid YAML.
    Parse(String),

    /// Configuration parsed but is not a key-value mapping. Carries the name
    /// of the YAML type that was encountered instead.
    Shape(String),

    /// One or more configuration fields failed validation. Messages are
    /// deduplicated and human-readable, one per invalid field.
    ConfigValidation(Vec<String>),

    /// Template execution raised an error (syntax, undefined reference,
    /// evaluation type error, failed subprocess). Carries the underlying
    /// cause text.
    Execution(String),
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderFailure::Parse(msg) => {
                write!(f, "configuration parse failure: {}", msg)
            }
            RenderFailure::Shape(ty) => {
                write!(
                    f,
                    "invalid configuration: key-value mapping expected, but got {}",
                    ty
                )
            }
            RenderFailure::ConfigValidation(messages) => {
                write!(f, "invalid configuration: {}", messages.join("; "))
            }
            RenderFailure::Execution(msg) => {
                write!(f, "template execution failure: {}", msg)
            }
        }
    }
}

impl std::error::Error for RenderFailure {}

impl From<serde_yaml::Error> for RenderFailure {
    fn from(err: serde_yaml::Error) -> Self {
        RenderFailure::Parse(err.to_string())
    }
}

// Execution errors keep the engine's full cause chain, which is where
// minijinja puts the actually useful detail (line numbers, variable names).
impl From<minijinja::Error> for RenderFailure {
    fn from(err: minijinja::Error) -> Self {
        let mut msg = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            msg.push_str(&format!(": {}", cause));
            source = cause.source();
        }
        RenderFailure::Execution(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_display_names_type() {
        let err = RenderFailure::Shape("sequence".to_string());
        assert!(err.to_string().contains("key-value mapping expected"));
        assert!(err.to_string().contains("sequence"));
    }

    #[test]
    fn test_validation_display_joins_messages() {
        let err = RenderFailure::ConfigValidation(vec![
            "unknown field `foo`".to_string(),
            "params: key-value mapping expected, but got string".to_string(),
        ]);
        let text = err.to_string();
        assert!(text.contains("unknown field `foo`"));
        assert!(text.contains("params:"));
    }

    #[test]
    fn test_from_yaml_error_is_parse() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("not: valid: yaml: :").unwrap_err();
        let err: RenderFailure = yaml_err.into();
        assert!(matches!(err, RenderFailure::Parse(_)));
    }

    #[test]
    fn test_from_minijinja_error_is_execution() {
        let mj_err = minijinja::Error::new(
            minijinja::ErrorKind::UndefinedError,
            "variable `missing` is undefined",
        );
        let err: RenderFailure = mj_err.into();
        assert!(matches!(err, RenderFailure::Execution(_)));
    }
}
