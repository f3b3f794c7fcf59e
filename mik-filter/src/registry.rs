//! Strategy registry and the per-call enabled set.
//!
//! A [`Registry`] is built once (usually at startup) and shared read-only.
//! A [`FilterList`] is derived from it for every filtering call, narrowed to
//! that call's allow-list, and dropped afterwards.

use std::fmt;
use std::sync::Arc;

use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::strategy::{Operator, Strategy};

/// Every known operator strategy plus the default enabled tokens.
///
/// ```
/// use mik_filter::{FilterList, Registry};
///
/// let registry = Registry::builtin();
/// let list = FilterList::only(&registry, Some(["$gt", "$lt"])).unwrap();
/// assert!(list.contains("$gt"));
/// assert!(!list.contains("$eq"));
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    strategies: Vec<Arc<dyn Strategy>>,
    /// Tokens enabled when a call brings no allow-list. `None` = all.
    defaults: Option<Vec<String>>,
}

impl Registry {
    /// A registry with no strategies.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding every built-in [`Operator`], all enabled by default.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            strategies: Operator::ALL
                .into_iter()
                .map(|op| Arc::new(op) as Arc<dyn Strategy>)
                .collect(),
            defaults: None,
        }
    }

    /// Built-in operators with the defaults named in `config`.
    ///
    /// Fails if the configuration names an operator that is not registered.
    pub fn from_config(config: &FilterConfig) -> Result<Self> {
        let registry = Self::builtin();
        match &config.filters {
            Some(tokens) => registry.with_defaults(tokens),
            None => Ok(registry),
        }
    }

    /// Register a custom strategy.
    ///
    /// Fails if a strategy with the same token is already registered.
    pub fn register(&mut self, strategy: impl Strategy + 'static) -> Result<&mut Self> {
        let token = strategy.token();
        if token.is_empty() {
            return Err(FilterError::configuration("operator token cannot be empty"));
        }
        if self.get(token).is_some() {
            return Err(FilterError::configuration(format!(
                "operator `{token}` is already registered"
            )));
        }
        self.strategies.push(Arc::new(strategy));
        Ok(self)
    }

    /// Replace the default enabled tokens.
    pub fn with_defaults<I, S>(mut self, tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = self.known(tokens)?;
        self.defaults = Some(tokens);
        Ok(self)
    }

    /// Look up a registered strategy by exact token.
    pub fn get(&self, token: &str) -> Option<&Arc<dyn Strategy>> {
        self.strategies.iter().find(|s| s.token() == token)
    }

    /// Registered tokens in registration order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.strategies.iter().map(|s| s.token())
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether no strategy is registered.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Check every token against the registry, dropping duplicates.
    fn known<I, S>(&self, tokens: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            if self.get(token).is_none() {
                return Err(FilterError::configuration(format!(
                    "operator `{token}` is not registered"
                )));
            }
            if !out.iter().any(|t| t == token) {
                out.push(token.to_string());
            }
        }
        Ok(out)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("tokens", &self.tokens().collect::<Vec<_>>())
            .field("defaults", &self.defaults)
            .finish()
    }
}

/// The operators enabled for one filtering call.
#[derive(Clone)]
pub struct FilterList {
    strategies: Vec<Arc<dyn Strategy>>,
}

impl FilterList {
    /// Build the enabled set for one call.
    ///
    /// With `allow = None` the registry defaults apply; otherwise the result
    /// is the intersection of the registry with `allow`.
    ///
    /// # Errors
    ///
    /// [`FilterError::Configuration`] when `allow` names an operator the
    /// registry does not know, or when the resulting set is empty.
    pub fn only<I, S>(registry: &Registry, allow: Option<I>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = match (allow, &registry.defaults) {
            (Some(allow), _) => registry.known(allow)?,
            (None, Some(defaults)) => defaults.clone(),
            (None, None) => registry.tokens().map(str::to_string).collect(),
        };

        let strategies: Vec<_> = tokens
            .iter()
            .filter_map(|token| registry.get(token).cloned())
            .collect();

        if strategies.is_empty() {
            return Err(FilterError::configuration("no filter operators are enabled"));
        }

        Ok(Self { strategies })
    }

    /// [`only`](Self::only) without an allow-list: the registry defaults.
    pub fn defaults(registry: &Registry) -> Result<Self> {
        Self::only(registry, None::<[&str; 0]>)
    }

    /// The enabled strategy for `token`, if any.
    pub fn get(&self, token: &str) -> Option<&dyn Strategy> {
        self.strategies
            .iter()
            .find(|s| s.token() == token)
            .map(|s| &**s)
    }

    /// Whether `token` is enabled.
    pub fn contains(&self, token: &str) -> bool {
        self.get(token).is_some()
    }

    /// Enabled tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.strategies.iter().map(|s| s.token())
    }

    /// Number of enabled operators.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Always `false` for a constructed list; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl fmt::Debug for FilterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.tokens()).finish()
    }
}
