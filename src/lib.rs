//! # interval-bnb: interval branch-and-bound global minimization
//!
//! Finds the global minimum of a bivariate function over a rectangular box,
//! using interval arithmetic to bound the function on whole sub-boxes at a
//! time. Each box is evaluated to an enclosure `[flo, fhi]` of the function's
//! range there:
//!
//! - boxes whose `flo` exceeds the best known upper bound cannot contain the
//!   minimum and are discarded;
//! - a box whose `fhi` lies below that bound lowers it;
//! - boxes narrower than the requested threshold are kept as candidates;
//! - everything else is split into four quadrants and searched recursively.
//!
//! The result is a certified upper bound on the minimum and the list of
//! candidate boxes that may still contain a minimizer.
//!
//! ## Execution modes
//!
//! - **Sequential**: one depth-first search over the whole domain
//!   ([`search::minimize`]).
//! - **Distributed**: the domain is split into quadrants, each searched by one
//!   of four workers with private state; bounds are min-reduced and the
//!   candidates merged afterwards ([`coordinator::minimize_distributed`]).
//!
//! ## Soundness
//!
//! Results are only as good as the enclosures. Interval operations here use
//! ordinary floating-point rounding, so enclosures may miss the true range by
//! an ulp or so.
//!
//! ## Example
//!
//! ```
//! use interval_bnb::{FunctionRegistry, Minimizer};
//!
//! let registry = FunctionRegistry::standard().unwrap();
//! let result = Minimizer::from_registry(&registry, "sphere")
//!     .unwrap()
//!     .threshold(0.5)
//!     .minimize()
//!     .unwrap();
//! assert_eq!(result.upper_bound, 0.5);
//! assert!(result.candidates.iter().all(|c| c.flo < result.upper_bound));
//! ```

pub mod builder;
pub mod comm;
pub mod coordinator;
pub mod error;
pub mod functions;
pub mod interval;
pub mod objective;
pub mod search;
pub mod split;
pub mod storage;
pub mod trace;
pub mod types;

// Re-export main types
pub use builder::Minimizer;
pub use comm::{Communicator, LocalEndpoint, LocalGroup};
pub use coordinator::{
    minimize_distributed, run_worker, Assignment, QuadrantAssignment, RunRequest, WorkerReport,
    WORKER_COUNT,
};
pub use error::{Result, SearchError};
pub use interval::Interval;
pub use objective::{FunctionRegistry, Objective, ObjectiveRef, RegisteredFunction};
pub use search::{minimize, search, SearchContext};
pub use split::{split_box, QUADRANT_COUNT};
pub use storage::CandidateSet;
pub use types::{
    Candidate, ExecutionMode, SearchBox, SearchOptions, SearchResult, SearchStats,
    DEFAULT_THRESHOLD,
};
