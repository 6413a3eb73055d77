//! Error types for schema reflection

use thiserror::Error;

/// Result type for reflection operations
pub type Result<T> = std::result::Result<T, ReflectError>;

/// Boxed error returned by hooks and capabilities
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Reflection errors
///
/// Every variant carries the dotted property path (rooted at `#`) where the
/// failure happened.
#[derive(Error, Debug)]
pub enum ReflectError {
    #[error("Unsupported type at {path}: {type_name} ({kind})")]
    UnsupportedType {
        path: String,
        type_name: String,
        kind: String,
    },

    #[error("Failed to parse `{keyword}` value {value:?} at {path}: {reason}")]
    TagParse {
        path: String,
        keyword: String,
        value: String,
        reason: String,
    },

    #[error("Malformed field tag {tag:?} at {path}: {reason}")]
    InvalidTag {
        path: String,
        tag: String,
        reason: String,
    },

    #[error("Hook failed at {path}: {source}")]
    Hook {
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl ReflectError {
    /// The dotted path the error is attached to, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            ReflectError::UnsupportedType { path, .. }
            | ReflectError::TagParse { path, .. }
            | ReflectError::InvalidTag { path, .. }
            | ReflectError::Hook { path, .. } => Some(path),
            ReflectError::Json(_) | ReflectError::Config(_) => None,
        }
    }
}

/// Error returned by hooks and capability implementations
#[derive(Error, Debug)]
pub enum HookError {
    /// Omit the property currently being placed into its parent.
    ///
    /// Only meaningful while a property is being reflected; anywhere else it
    /// surfaces as [`ReflectError::Hook`].
    #[error("skip property")]
    SkipProperty,

    #[error(transparent)]
    Failed(BoxError),
}

impl HookError {
    /// Wrap any error as a hook failure
    pub fn failed(err: impl Into<BoxError>) -> Self {
        HookError::Failed(err.into())
    }

    /// Hook failure from a plain message
    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        HookError::Failed(message.into())
    }
}

/// Walker-internal control flow: the skip sentinel or a real error
#[derive(Debug)]
pub(crate) enum Interrupt {
    SkipProperty,
    Error(ReflectError),
}

impl From<ReflectError> for Interrupt {
    fn from(err: ReflectError) -> Self {
        Interrupt::Error(err)
    }
}

impl Interrupt {
    /// Lift a hook result into walker control flow, attaching the path
    pub(crate) fn from_hook(err: HookError, path: &str) -> Self {
        match err {
            HookError::SkipProperty => Interrupt::SkipProperty,
            HookError::Failed(source) => Interrupt::Error(ReflectError::Hook {
                path: path.to_string(),
                source,
            }),
        }
    }

    /// Collapse into a public error once no property boundary is left to catch a skip
    pub(crate) fn into_error(self, path: &str) -> ReflectError {
        match self {
            Interrupt::Error(err) => err,
            Interrupt::SkipProperty => ReflectError::Hook {
                path: path.to_string(),
                source: "property skip requested outside of a property".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_path() {
        let err = ReflectError::TagParse {
            path: "#.age".to_string(),
            keyword: "minimum".to_string(),
            value: "abc".to_string(),
            reason: "invalid float literal".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("#.age"));
        assert!(message.contains("minimum"));
        assert_eq!(err.path(), Some("#.age"));
    }

    #[test]
    fn test_skip_sentinel_outside_property() {
        let err = Interrupt::from_hook(HookError::SkipProperty, "#").into_error("#");
        match err {
            ReflectError::Hook { path, .. } => assert_eq!(path, "#"),
            other => panic!("Expected Hook, got {:?}", other),
        }
    }

    #[test]
    fn test_hook_failure_wrapped() {
        match Interrupt::from_hook(HookError::msg("boom"), "#.name") {
            Interrupt::Error(ReflectError::Hook { path, source }) => {
                assert_eq!(path, "#.name");
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("Expected Hook error, got {:?}", other),
        }
    }
}
