//! The `Filterable` capability models implement.
//!
//! ```
//! use mik_filter::prelude::*;
//!
//! #[derive(Default)]
//! struct User {
//!     filters: FilterSlot,
//! }
//!
//! impl Filterable for User {
//!     fn filter_slot(&self) -> &FilterSlot {
//!         &self.filters
//!     }
//!
//!     fn filter_slot_mut(&mut self) -> &mut FilterSlot {
//!         &mut self.filters
//!     }
//! }
//!
//! let registry = Registry::builtin();
//! let ctx = FilterContext::new(&registry);
//! let spec = FilterSpec::parse(r#"{"status": "active", "age": {"$gt": 18}}"#).unwrap();
//!
//! let query = User::default()
//!     .filter(&ctx, postgres("users"), None::<[&str; 0]>, Some(&spec))
//!     .unwrap();
//! assert_eq!(
//!     query.build().sql,
//!     "SELECT * FROM users WHERE status = $1 AND age > $2"
//! );
//! ```

use std::fmt;

use serde_json::{Map, Value as JsonValue};

use crate::config::FilterConfig;
use crate::constants::DEFAULT_FILTERS_KEY;
use crate::error::Result;
use crate::query::QueryHandle;
use crate::registry::{FilterList, Registry};
use crate::resolve::Resolver;
use crate::spec::FilterSpec;

/// Request-scoped data the filters are read from when the caller passes
/// none explicitly.
///
/// Hosts implement this over whatever holds their decoded request input.
pub trait FilterSource {
    /// The filter mapping stored under `key`, or `None` if absent.
    fn filter_spec(&self, key: &str) -> Result<Option<FilterSpec>>;
}

impl FilterSource for Map<String, JsonValue> {
    fn filter_spec(&self, key: &str) -> Result<Option<FilterSpec>> {
        match self.get(key) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(value) => FilterSpec::from_json_at(key, value.clone()).map(Some),
        }
    }
}

impl FilterSource for JsonValue {
    fn filter_spec(&self, key: &str) -> Result<Option<FilterSpec>> {
        match self {
            Self::Object(map) => map.filter_spec(key),
            _ => Ok(None),
        }
    }
}

/// Everything a filtering call needs from its environment.
///
/// Built per request by the host; it only borrows the shared registry.
#[derive(Clone, Copy)]
pub struct FilterContext<'a> {
    registry: &'a Registry,
    key: &'a str,
    source: Option<&'a dyn FilterSource>,
}

impl<'a> FilterContext<'a> {
    /// A context with no ambient source, reading under the default key.
    pub const fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            key: DEFAULT_FILTERS_KEY,
            source: None,
        }
    }

    /// Read ambient filters under the key named in `config`.
    #[must_use]
    pub fn with_config(mut self, config: &'a FilterConfig) -> Self {
        self.key = &config.key;
        self
    }

    /// Read ambient filters under `key`.
    #[must_use]
    pub const fn with_key(mut self, key: &'a str) -> Self {
        self.key = key;
        self
    }

    /// Wire in the request-scoped filter source.
    #[must_use]
    pub const fn with_source(mut self, source: &'a dyn FilterSource) -> Self {
        self.source = Some(source);
        self
    }

    /// The registry strategies are taken from.
    pub const fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Filters from the ambient source, empty when there are none.
    fn ambient_spec(&self) -> Result<FilterSpec> {
        match self.source {
            Some(source) => Ok(source.filter_spec(self.key)?.unwrap_or_default()),
            None => Ok(FilterSpec::new()),
        }
    }
}

impl fmt::Debug for FilterContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterContext")
            .field("registry", self.registry)
            .field("key", &self.key)
            .field("source", &self.source.is_some())
            .finish()
    }
}

/// Per-instance allow-list storage for a [`Filterable`] model.
///
/// Empty until the model sets one; then it wins over the registry defaults
/// for every later call on the same instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSlot(Option<Vec<String>>);

impl FilterSlot {
    /// The stored allow-list, if any.
    pub fn get(&self) -> Option<&[String]> {
        self.0.as_deref()
    }

    /// Store an allow-list, replacing any previous one.
    pub fn set(&mut self, filters: Vec<String>) {
        self.0 = Some(filters);
    }

    /// Forget the stored allow-list.
    pub fn clear(&mut self) {
        self.0 = None;
    }
}

/// Mongo-style filtering for a data model.
///
/// Implementors only provide access to their [`FilterSlot`].
pub trait Filterable {
    /// The model's allow-list slot.
    fn filter_slot(&self) -> &FilterSlot;

    /// Mutable access to the model's allow-list slot.
    fn filter_slot_mut(&mut self) -> &mut FilterSlot;

    /// Store an allow-list used by every later [`filter`](Self::filter)
    /// call that does not bring its own.
    fn set_filters<I, S>(&mut self, filters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter_slot_mut()
            .set(filters.into_iter().map(Into::into).collect());
        self
    }

    /// Apply filters to `query` and hand it back.
    ///
    /// 1. `available`, when given, is stored as this instance's allow-list.
    /// 2. The enabled operators are the instance allow-list, or the registry
    ///    defaults when there is none.
    /// 3. Filters are `source`, or else the context's ambient source, or
    ///    else nothing.
    /// 4. Every field is resolved in order against `query`.
    ///
    /// # Errors
    ///
    /// Registry and resolver errors are returned unchanged.
    fn filter<Q, I, S>(
        &mut self,
        ctx: &FilterContext<'_>,
        mut query: Q,
        available: Option<I>,
        source: Option<&FilterSpec>,
    ) -> Result<Q>
    where
        Q: QueryHandle,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(available) = available {
            self.set_filters(available);
        }

        let list = FilterList::only(ctx.registry(), self.filter_slot().get())?;

        let ambient;
        let spec = match source {
            Some(spec) => spec,
            None => {
                ambient = ctx.ambient_spec()?;
                &ambient
            },
        };

        tracing::debug!(
            fields = spec.len(),
            operators = list.len(),
            explicit = source.is_some(),
            "applying filters"
        );

        Resolver::new(&list).apply_all(&mut query, spec)?;
        Ok(query)
    }
}
