//! Error type shared by the registry, resolver and `Filterable` entry point.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = FilterError> = std::result::Result<T, E>;

/// Errors raised while building the enabled operator set or resolving filters.
///
/// Nothing in the crate recovers from these locally; the host is expected to
/// turn them into a request-level failure (usually a 400).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FilterError {
    /// The registry, configuration or allow-list cannot produce a usable
    /// operator set.
    #[error("filter configuration error: {0}")]
    Configuration(String),

    /// A filter references an operator that is not enabled for this call.
    #[error("operator `{token}` is not enabled for field `{column}`")]
    UnknownOperator {
        /// Field the operator was used on.
        column: String,
        /// The operator token as written by the caller.
        token: String,
    },

    /// The filter value has a shape no strategy accepts.
    #[error("malformed filter for field `{column}`: {reason}")]
    MalformedFilter {
        /// Field whose value was rejected.
        column: String,
        /// What was expected instead.
        reason: String,
    },
}

impl FilterError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn unknown_operator(column: &str, token: &str) -> Self {
        Self::UnknownOperator {
            column: column.to_string(),
            token: token.to_string(),
        }
    }

    /// Build a [`MalformedFilter`](Self::MalformedFilter) error.
    ///
    /// Public so custom strategies can report arity problems the same way
    /// the built-in operators do.
    pub fn malformed(column: &str, reason: impl Into<String>) -> Self {
        Self::MalformedFilter {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = FilterError::configuration("no operators enabled");
        assert_eq!(
            err.to_string(),
            "filter configuration error: no operators enabled"
        );
    }

    #[test]
    fn test_unknown_operator_display() {
        let err = FilterError::unknown_operator("age", "$lt");
        assert_eq!(
            err.to_string(),
            "operator `$lt` is not enabled for field `age`"
        );
    }

    #[test]
    fn test_malformed_display() {
        let err = FilterError::malformed("age", "`$between` expects exactly 2 values");
        assert_eq!(
            err.to_string(),
            "malformed filter for field `age`: `$between` expects exactly 2 values"
        );
    }

    #[test]
    fn test_error_debug() {
        let err = FilterError::unknown_operator("status", "$foo");
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("UnknownOperator"));
        assert!(debug_str.contains("$foo"));
    }
}
