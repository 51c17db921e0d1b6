//! High-level entry point combining a function, its domain and run options.

use std::sync::Arc;

use crate::coordinator::minimize_distributed;
use crate::error::Result;
use crate::objective::{FunctionRegistry, Objective};
use crate::search::minimize;
use crate::types::{ExecutionMode, SearchBox, SearchOptions, SearchResult};

/// Name under which an ad-hoc objective is registered for distributed runs.
const ADHOC_NAME: &str = "objective";

/// Minimizer for one function over its domain.
///
/// ```
/// use interval_bnb::{FunctionRegistry, Minimizer};
///
/// let registry = FunctionRegistry::standard().unwrap();
/// let result = Minimizer::from_registry(&registry, "booth")
///     .unwrap()
///     .threshold(0.05)
///     .sequential()
///     .minimize()
///     .unwrap();
/// assert!(result.upper_bound < 0.1);
/// ```
pub struct Minimizer {
    registry: FunctionRegistry,
    name: String,
    options: SearchOptions,
}

impl Minimizer {
    /// Minimize an arbitrary objective over `domain`.
    pub fn new(objective: impl Objective + 'static, domain: SearchBox) -> Self {
        let mut registry = FunctionRegistry::new();
        registry.register_shared(ADHOC_NAME, Arc::new(objective), domain);
        Self {
            registry,
            name: ADHOC_NAME.to_string(),
            options: SearchOptions::default(),
        }
    }

    /// Minimize the function registered as `name`.
    ///
    /// # Errors
    /// Returns `SearchError::UnknownFunction` if `name` is not registered.
    pub fn from_registry(registry: &FunctionRegistry, name: &str) -> Result<Self> {
        let func = registry.get(name)?;
        let mut own = FunctionRegistry::new();
        own.register_shared(name, Arc::clone(&func.objective), func.domain);
        Ok(Self {
            registry: own,
            name: name.to_string(),
            options: SearchOptions::default(),
        })
    }

    /// Stop splitting boxes whose x-width is at or below `threshold`.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.options.threshold = threshold;
        self
    }

    /// Run the whole search on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.options.mode = ExecutionMode::Sequential;
        self
    }

    /// Split the search across the four-worker pool.
    pub fn distributed(mut self) -> Self {
        self.options.mode = ExecutionMode::Distributed;
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Result<SearchBox> {
        Ok(self.registry.get(&self.name)?.domain)
    }

    /// Run the search.
    ///
    /// # Errors
    /// Returns `SearchError::InvalidThreshold` or `SearchError::InvalidBounds`
    /// for unusable parameters, and coordination errors in distributed mode.
    pub fn minimize(&self) -> Result<SearchResult> {
        self.options.validate()?;
        match self.options.mode {
            ExecutionMode::Sequential => {
                let func = self.registry.get(&self.name)?;
                minimize(func.objective.as_ref(), &func.domain, self.options.threshold)
            }
            ExecutionMode::Distributed => {
                minimize_distributed(&self.registry, &self.name, self.options.threshold)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::interval::Interval;

    fn quadratic() -> Minimizer {
        Minimizer::new(
            |x: Interval, y: Interval| (x - 1.0).sqr() + y.sqr(),
            SearchBox::from_bounds((-2.0, 2.0), (-2.0, 2.0)).unwrap(),
        )
    }

    #[test]
    fn test_defaults() {
        let m = quadratic();
        assert_eq!(m.options, SearchOptions::default());
        assert_eq!(m.name(), ADHOC_NAME);
    }

    #[test]
    fn test_modes_agree_on_adhoc_objective() {
        let seq = quadratic().threshold(0.25).sequential().minimize().unwrap();
        let dist = quadratic().threshold(0.25).distributed().minimize().unwrap();
        assert_eq!(seq.mode, ExecutionMode::Sequential);
        assert_eq!(dist.mode, ExecutionMode::Distributed);
        assert!(dist.upper_bound <= seq.upper_bound);
        for result in [&seq, &dist] {
            assert!(result
                .candidates
                .iter()
                .any(|c| c.region.contains_point(1.0, 0.0)));
        }
    }

    #[test]
    fn test_from_registry() {
        let reg = FunctionRegistry::standard().unwrap();
        let m = Minimizer::from_registry(&reg, "matyas").unwrap();
        assert_eq!(m.domain().unwrap(), reg.get("matyas").unwrap().domain);
        assert!(matches!(
            Minimizer::from_registry(&reg, "missing"),
            Err(SearchError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn test_invalid_threshold() {
        let err = quadratic().threshold(-0.5).minimize().unwrap_err();
        assert_eq!(err, SearchError::InvalidThreshold(-0.5));
    }
}
