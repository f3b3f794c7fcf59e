//! Process-wide filter configuration.
//!
//! ```toml
//! # Operators enabled when a model brings no allow-list (omit for all)
//! filters = ["$eq", "$in", "$gt", "$lt"]
//! # Field of the ambient request data that holds the filters
//! key = "filters"
//! ```

use serde::Deserialize;

use crate::constants::DEFAULT_FILTERS_KEY;
use crate::error::{FilterError, Result};

/// Filter settings, usually deserialized from the host's config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct FilterConfig {
    /// Default enabled operator tokens. `None` enables every registered one.
    pub filters: Option<Vec<String>>,
    /// Key the ambient filter source is read under.
    pub key: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            filters: None,
            key: DEFAULT_FILTERS_KEY.to_string(),
        }
    }
}

impl FilterConfig {
    /// Parse configuration from TOML text.
    ///
    /// ```
    /// use mik_filter::FilterConfig;
    ///
    /// let config = FilterConfig::from_toml(r#"filters = ["$eq", "$gt"]"#).unwrap();
    /// assert_eq!(config.filters, Some(vec!["$eq".to_string(), "$gt".to_string()]));
    /// assert_eq!(config.key, "filters");
    /// ```
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| FilterError::configuration(format!("invalid filter config: {e}")))?;
        if config.key.is_empty() {
            return Err(FilterError::configuration("filter source key cannot be empty"));
        }
        Ok(config)
    }

    /// Set the default enabled operator tokens.
    #[must_use]
    pub fn with_filters<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters = Some(tokens.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = FilterConfig::default();
        assert_eq!(config.filters, None);
        assert_eq!(config.key, "filters");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(FilterConfig::from_toml("").unwrap(), FilterConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let config = FilterConfig::from_toml(
            r#"
            filters = ["$in", "$between"]
            key = "where"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.filters,
            Some(vec!["$in".to_string(), "$between".to_string()])
        );
        assert_eq!(config.key, "where");
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            FilterConfig::from_toml("operators = []"),
            Err(FilterError::Configuration(_))
        ));
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(matches!(
            FilterConfig::from_toml(r#"filters = "$eq""#),
            Err(FilterError::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            FilterConfig::from_toml(r#"key = """#),
            Err(FilterError::Configuration(_))
        ));
    }

    #[test]
    fn test_with_filters() {
        let config = FilterConfig::default().with_filters(["$eq"]);
        assert_eq!(config.filters, Some(vec!["$eq".to_string()]));
    }
}
