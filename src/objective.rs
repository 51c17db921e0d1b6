//! Objective functions and the registry that maps names to them.
//!
//! An [`Objective`] computes an interval enclosure of a function over a box.
//! The search trusts this enclosure unconditionally: if it fails to contain
//! the true range, pruning may discard the global minimizer.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SearchError};
use crate::interval::Interval;
use crate::types::SearchBox;

/// A bivariate function evaluated over boxes.
///
/// Implementations must return an interval containing `f(x, y)` for every
/// point of `region`, and a sub-box's enclosure must lie within the hull of
/// its parent's.
pub trait Objective: Send + Sync {
    fn enclose(&self, region: &SearchBox) -> Interval;
}

impl<F> Objective for F
where
    F: Fn(Interval, Interval) -> Interval + Send + Sync,
{
    #[inline]
    fn enclose(&self, region: &SearchBox) -> Interval {
        self(region.x(), region.y())
    }
}

/// Shared handle to an objective.
pub type ObjectiveRef = Arc<dyn Objective>;

/// An objective together with the domain it is searched over.
#[derive(Clone)]
pub struct RegisteredFunction {
    pub objective: ObjectiveRef,
    pub domain: SearchBox,
    /// Known global minimum, when one is documented for the function.
    pub known_minimum: Option<f64>,
}

impl fmt::Debug for RegisteredFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredFunction")
            .field("domain", &self.domain)
            .field("known_minimum", &self.known_minimum)
            .finish_non_exhaustive()
    }
}

/// Name → function lookup.
///
/// Names are kept sorted so listings are stable.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, RegisteredFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `objective` under `name`, replacing any previous entry.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        objective: impl Objective + 'static,
        domain: SearchBox,
    ) -> &mut Self {
        self.insert(name, objective, domain, None)
    }

    /// Register a function whose global minimum value is known.
    pub fn register_with_minimum(
        &mut self,
        name: impl Into<String>,
        objective: impl Objective + 'static,
        domain: SearchBox,
        minimum: f64,
    ) -> &mut Self {
        self.insert(name, objective, domain, Some(minimum))
    }

    /// Register an objective that is already shared elsewhere.
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        objective: ObjectiveRef,
        domain: SearchBox,
    ) -> &mut Self {
        self.functions.insert(
            name.into(),
            RegisteredFunction {
                objective,
                domain,
                known_minimum: None,
            },
        );
        self
    }

    fn insert(
        &mut self,
        name: impl Into<String>,
        objective: impl Objective + 'static,
        domain: SearchBox,
        known_minimum: Option<f64>,
    ) -> &mut Self {
        self.functions.insert(
            name.into(),
            RegisteredFunction {
                objective: Arc::new(objective),
                domain,
                known_minimum,
            },
        );
        self
    }

    /// Look up a function by name.
    ///
    /// # Errors
    /// Returns `SearchError::UnknownFunction` listing the registered names.
    pub fn get(&self, name: &str) -> Result<&RegisteredFunction> {
        self.functions
            .get(name)
            .ok_or_else(|| SearchError::UnknownFunction {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
