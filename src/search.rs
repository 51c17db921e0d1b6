//! The branch-and-bound engine.
//!
//! A depth-first recursion over boxes. Each box is evaluated once; it is
//! discarded if its enclosure lies entirely above the best known upper
//! bound, it lowers that bound if its enclosure lies entirely below it, it
//! becomes a candidate once its x-width reaches the threshold, and it is
//! otherwise split into quadrants that are searched in turn.
//!
//! All mutable state of a run lives in a [`SearchContext`] owned by the
//! caller and threaded through the recursion, so later siblings benefit from
//! bounds found by earlier ones. The engine is single-threaded and knows
//! nothing about workers: it searches whatever box it is given.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::Result;
use crate::objective::Objective;
use crate::split::split_box;
use crate::storage::CandidateSet;
use crate::trace::TraceWriter;
use crate::trace_write;
use crate::types::{validate_threshold, Candidate, ExecutionMode, SearchBox, SearchResult, SearchStats};

/// Mutable state of one engine run: the upper bound and the candidates
/// consistent with it.
///
/// Invariant: every stored candidate has `flo < upper_bound`.
pub struct SearchContext {
    upper_bound: f64,
    candidates: CandidateSet,
    stats: SearchStats,
    #[cfg_attr(not(feature = "trace"), allow(dead_code))]
    tracer: Option<Arc<TraceWriter>>,
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchContext {
    /// Fresh state: `upper_bound = +inf`, no candidates.
    pub fn new() -> Self {
        Self {
            upper_bound: f64::INFINITY,
            candidates: CandidateSet::new(),
            stats: SearchStats::default(),
            tracer: None,
        }
    }

    /// Fresh state that records search events into `tracer`.
    ///
    /// Events are only written when the crate is built with the `trace`
    /// feature.
    pub fn with_tracer(tracer: Arc<TraceWriter>) -> Self {
        Self {
            tracer: Some(tracer),
            ..Self::new()
        }
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// True if every candidate lies strictly below the upper bound.
    pub fn invariant_holds(&self) -> bool {
        // Sorted by flo, so the last candidate is the only one to check.
        self.candidates
            .last()
            .map_or(true, |c| c.flo < self.upper_bound)
    }

    pub fn into_result(self, mode: ExecutionMode) -> SearchResult {
        SearchResult {
            upper_bound: self.upper_bound,
            candidates: self.candidates.into_vec(),
            stats: self.stats,
            mode,
        }
    }

    /// Lower the upper bound and drop the candidates it rules out.
    fn tighten(&mut self, bound: f64) -> usize {
        debug_assert!(bound < self.upper_bound);
        self.upper_bound = bound;
        self.stats.tightenings += 1;
        let evicted = self.candidates.evict_from(bound);
        trace_write!(
            self.tracer.as_deref(),
            "TRACE TIGHTEN ub={} evicted={} kept={}",
            bound,
            evicted,
            self.candidates.len()
        );
        evicted
    }

    /// Record a leaf box. Returns false when its lower bound does not lie
    /// below the upper bound, in which case it cannot be stored.
    fn offer(&mut self, candidate: Candidate) -> bool {
        self.stats.leaves += 1;
        if candidate.flo < self.upper_bound {
            self.candidates.insert(candidate);
            true
        } else {
            false
        }
    }
}

/// Search `region` for the global minimum of `objective`, updating `ctx`.
///
/// Recursion stops on boxes whose x-width is at or below `threshold`, and on
/// boxes too narrow to bisect in floating point. The caller must make sure
/// the threshold is positive.
pub fn search<O>(objective: &O, region: &SearchBox, threshold: f64, ctx: &mut SearchContext)
where
    O: Objective + ?Sized,
{
    search_at(objective, region, threshold, 0, ctx);
}

fn search_at<O>(objective: &O, region: &SearchBox, threshold: f64, depth: usize, ctx: &mut SearchContext)
where
    O: Objective + ?Sized,
{
    let enclosure = objective.enclose(region);
    ctx.stats.evaluations += 1;
    ctx.stats.max_depth = ctx.stats.max_depth.max(depth);
    trace!(depth, flo = enclosure.left(), fhi = enclosure.right(), "evaluated box");
    trace_write!(
        ctx.tracer.as_deref(),
        "TRACE EVAL depth={} x=[{},{}] y=[{},{}] flo={} fhi={} ub={}",
        depth,
        region.x().left(),
        region.x().right(),
        region.y().left(),
        region.y().right(),
        enclosure.left(),
        enclosure.right(),
        ctx.upper_bound
    );

    if enclosure.left() > ctx.upper_bound {
        ctx.stats.pruned += 1;
        trace_write!(
            ctx.tracer.as_deref(),
            "TRACE PRUNE depth={} flo={} ub={}",
            depth,
            enclosure.left(),
            ctx.upper_bound
        );
        return;
    }

    if enclosure.right() < ctx.upper_bound {
        let evicted = ctx.tighten(enclosure.right());
        debug!(depth, upper_bound = enclosure.right(), evicted, "upper bound tightened");
    }

    // Below float resolution a split would hand back this same box.
    if region.x().width() <= threshold || !region.can_bisect() {
        let inserted = ctx.offer(Candidate::new(*region, enclosure));
        trace_write!(
            ctx.tracer.as_deref(),
            "TRACE LEAF depth={} flo={} fhi={} inserted={} size={}",
            depth,
            enclosure.left(),
            enclosure.right(),
            inserted,
            ctx.candidates.len()
        );
        return;
    }

    trace_write!(
        ctx.tracer.as_deref(),
        "TRACE SPLIT depth={} width={}",
        depth,
        region.x().width()
    );
    for sub in split_box(region) {
        search_at(objective, &sub, threshold, depth + 1, ctx);
    }
}

/// Minimize `objective` over `domain` with a single sequential engine run.
///
/// # Errors
/// Returns `SearchError::InvalidThreshold` unless `threshold` is finite and
/// positive, and `SearchError::InvalidBounds` for an unusable domain.
pub fn minimize<O>(objective: &O, domain: &SearchBox, threshold: f64) -> Result<SearchResult>
where
    O: Objective + ?Sized,
{
    validate_threshold(threshold)?;
    domain.validate()?;

    let mut ctx = SearchContext::new();
    search(objective, domain, threshold, &mut ctx);
    debug!(
        upper_bound = ctx.upper_bound,
        candidates = ctx.candidates.len(),
        evaluations = ctx.stats.evaluations,
        "sequential search finished"
    );
    Ok(ctx.into_result(ExecutionMode::Sequential))
}

/// Deepest level the recursion can reach on a box of x-width `width`:
/// `ceil(log2(width / threshold))`, and 0 when the box is already small
/// enough. Boxes that stop bisecting at float resolution end sooner.
pub fn depth_bound(width: f64, threshold: f64) -> usize {
    if width <= threshold {
        return 0;
    }
    let ratio = width / threshold;
    let levels = if ratio.is_finite() {
        ratio.log2()
    } else {
        // Tiny thresholds overflow the ratio.
        width.log2() - threshold.log2()
    };
    levels.ceil() as usize
}
