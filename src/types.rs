//! Core type definitions: search boxes, candidates, options and results.

use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::interval::Interval;

// ──────────────────────────────────────────────────────────────────────────────
// Search box
// ──────────────────────────────────────────────────────────────────────────────

/// A two-dimensional rectangular region `x × y`.
///
/// Boxes are immutable; sub-boxes are produced by [`crate::split::split_box`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchBox {
    x: Interval,
    y: Interval,
}

impl SearchBox {
    pub fn new(x: Interval, y: Interval) -> Self {
        Self { x, y }
    }

    /// Build a box from `(lo, hi)` pairs, rejecting reversed or non-finite
    /// bounds.
    pub fn from_bounds(x: (f64, f64), y: (f64, f64)) -> Result<Self> {
        for (axis, (lo, hi)) in [('x', x), ('y', y)] {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(SearchError::InvalidBounds { axis, lo, hi });
            }
        }
        Ok(Self::new(Interval::new(x.0, x.1), Interval::new(y.0, y.1)))
    }

    #[inline]
    pub fn x(&self) -> Interval {
        self.x
    }

    #[inline]
    pub fn y(&self) -> Interval {
        self.y
    }

    /// Area of the box.
    pub fn area(&self) -> f64 {
        self.x.width() * self.y.width()
    }

    /// Center point `(x.mid, y.mid)`.
    pub fn center(&self) -> (f64, f64) {
        (self.x.mid(), self.y.mid())
    }

    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        self.x.contains(px) && self.y.contains(py)
    }

    /// True if the interiors of the two boxes overlap.
    pub fn interiors_overlap(&self, other: &SearchBox) -> bool {
        let overlap = |a: Interval, b: Interval| a.left() < b.right() && b.left() < a.right();
        overlap(self.x, other.x) && overlap(self.y, other.y)
    }

    /// Checks that the box is a valid search domain: finite bounds with
    /// `lo < hi` on both axes.
    pub fn validate(&self) -> Result<()> {
        for (axis, i) in [('x', self.x), ('y', self.y)] {
            let (lo, hi) = (i.left(), i.right());
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(SearchError::InvalidBounds { axis, lo, hi });
            }
        }
        Ok(())
    }

    /// True while splitting yields strictly smaller boxes on both axes.
    pub fn can_bisect(&self) -> bool {
        self.x.can_bisect() && self.y.can_bisect()
    }
}

impl fmt::Display for SearchBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.x, self.y)
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Candidate
// ──────────────────────────────────────────────────────────────────────────────

/// A leaf box that may contain a global minimizer, together with the
/// enclosure `[flo, fhi]` of the objective over it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub region: SearchBox,
    pub flo: f64,
    pub fhi: f64,
}

impl Candidate {
    pub fn new(region: SearchBox, enclosure: Interval) -> Self {
        Self {
            region,
            flo: enclosure.left(),
            fhi: enclosure.right(),
        }
    }

    pub fn enclosure(&self) -> Interval {
        Interval::new(self.flo, self.fhi)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.region, self.enclosure())
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Options
// ──────────────────────────────────────────────────────────────────────────────

/// How the search is carried out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// One engine run over the whole domain on the calling thread.
    Sequential,
    /// First split handed out to the fixed group of workers.
    #[default]
    Distributed,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Distributed => write!(f, "distributed"),
        }
    }
}

/// Default stopping threshold on the x-width of a box.
pub const DEFAULT_THRESHOLD: f64 = 1e-3;

/// Run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Boxes whose x-width is at or below this value are not split further.
    pub threshold: f64,
    pub mode: ExecutionMode,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            mode: ExecutionMode::default(),
        }
    }
}

impl SearchOptions {
    /// The threshold must be finite and strictly positive for the recursion
    /// to terminate.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.threshold)
    }
}

pub(crate) fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(())
    } else {
        Err(SearchError::InvalidThreshold(threshold))
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Statistics and results
// ──────────────────────────────────────────────────────────────────────────────

/// Counters collected during one engine run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Objective enclosures computed.
    pub evaluations: usize,
    /// Boxes discarded because their lower bound exceeded the upper bound.
    pub pruned: usize,
    /// Boxes that reached the threshold.
    pub leaves: usize,
    /// Times the upper bound was lowered.
    pub tightenings: usize,
    /// Deepest recursion level reached; the initial domain is level 0.
    pub max_depth: usize,
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.evaluations += rhs.evaluations;
        self.pruned += rhs.pruned;
        self.leaves += rhs.leaves;
        self.tightenings += rhs.tightenings;
        self.max_depth = self.max_depth.max(rhs.max_depth);
    }
}

/// Outcome of a minimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Certified upper bound on the global minimum.
    pub upper_bound: f64,
    /// Surviving candidate boxes in ascending `flo` order.
    pub candidates: Vec<Candidate>,
    pub stats: SearchStats,
    pub mode: ExecutionMode,
}

impl SearchResult {
    /// Smallest lower bound among the candidates, i.e. a lower bound on the
    /// global minimum. `None` when no candidate survived.
    pub fn lower_bound(&self) -> Option<f64> {
        self.candidates.first().map(|c| c.flo)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.candidates {
            writeln!(f, "{}", c)?;
        }
        writeln!(f, "Number of minimizers: {}", self.candidates.len())?;
        write!(f, "Upper bound for minimum: {:.15e}", self.upper_bound)
    }
}
