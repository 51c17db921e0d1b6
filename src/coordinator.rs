//! Four-worker static decomposition of a search.
//!
//! The coordinator (rank 0) splits the function's domain into quadrants and
//! broadcasts one quadrant per worker. Every worker, the coordinator
//! included, runs the engine on its quadrant with private state. Afterwards
//! the local upper bounds are min-reduced onto the coordinator, every
//! worker's candidates are all-gathered, and the coordinator filters their
//! union against the global bound.
//!
//! There is no communication during the searches, so a worker never benefits
//! from a bound found in another quadrant. The final filter restores the
//! candidate-set invariant with respect to the global bound.

use std::sync::Mutex;

use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::comm::{Communicator, LocalEndpoint, LocalGroup};
use crate::error::{Result, SearchError};
use crate::objective::FunctionRegistry;
use crate::search::{search, SearchContext};
use crate::split::{split_box, QUADRANT_COUNT};
use crate::storage::CandidateSet;
use crate::types::{validate_threshold, Candidate, ExecutionMode, SearchBox, SearchResult, SearchStats};

/// Number of workers a distributed run requires.
pub const WORKER_COUNT: usize = 4;

/// Rank of the coordinator.
pub const ROOT: usize = 0;

// One quadrant per worker.
const _: () = assert!(WORKER_COUNT == QUADRANT_COUNT);

/// Parameters the caller hands to the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub function: String,
    pub threshold: f64,
}

impl RunRequest {
    pub fn new(function: impl Into<String>, threshold: f64) -> Self {
        Self {
            function: function.into(),
            threshold,
        }
    }
}

/// The quadrant a worker is responsible for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadrantAssignment {
    pub worker: usize,
    pub region: SearchBox,
}

/// Everything a worker needs to start its search; identical on every worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub function: String,
    pub threshold: f64,
    pub quadrants: Vec<QuadrantAssignment>,
}

impl Assignment {
    /// Split `domain` and give quadrant `i` to worker `i`.
    pub fn new(function: impl Into<String>, threshold: f64, domain: &SearchBox) -> Self {
        let quadrants = split_box(domain)
            .into_iter()
            .enumerate()
            .map(|(worker, region)| QuadrantAssignment { worker, region })
            .collect();
        Self {
            function: function.into(),
            threshold,
            quadrants,
        }
    }

    /// The region assigned to `worker`, if any.
    pub fn region_for(&self, worker: usize) -> Option<&SearchBox> {
        self.quadrants
            .iter()
            .find(|q| q.worker == worker)
            .map(|q| &q.region)
    }
}

/// What one worker contributes to the final result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerReport {
    pub rank: usize,
    /// Best bound found in this worker's quadrant alone.
    pub upper_bound: f64,
    pub candidates: Vec<Candidate>,
    pub stats: SearchStats,
}

/// Validate a run request against `registry` and build its assignment.
///
/// # Errors
/// `InvalidThreshold`, `UnknownFunction` or `InvalidBounds`, in that order.
pub fn prepare_assignment(registry: &FunctionRegistry, request: &RunRequest) -> Result<Assignment> {
    validate_threshold(request.threshold)?;
    let func = registry.get(&request.function)?;
    func.domain.validate()?;
    Ok(Assignment::new(
        request.function.clone(),
        request.threshold,
        &func.domain,
    ))
}

/// Run one worker of a distributed search.
///
/// The coordinator must be given the run request; other ranks pass `None`
/// and receive their parameters by broadcast. Returns the merged result on
/// the coordinator and `None` on every other rank.
///
/// # Errors
/// `TopologyMismatch` unless the group has exactly [`WORKER_COUNT`] members,
/// checked before any message is sent. A coordinator whose request is missing
/// or fails [`prepare_assignment`] returns that error and aborts the group,
/// so every other rank returns `Communication`. Message failures also surface
/// as `Communication`.
pub fn run_worker<C>(
    comm: &mut C,
    registry: &FunctionRegistry,
    request: Option<&RunRequest>,
) -> Result<Option<SearchResult>>
where
    C: Communicator + ?Sized,
{
    if comm.size() != WORKER_COUNT {
        return Err(SearchError::TopologyMismatch {
            expected: WORKER_COUNT,
            found: comm.size(),
        });
    }
    let rank = comm.rank();

    let outgoing = if rank == ROOT {
        let prepared = request
            .ok_or_else(|| {
                SearchError::Communication("coordinator started without a run request".into())
            })
            .and_then(|request| prepare_assignment(registry, request));
        match prepared {
            Ok(assignment) => Some(assignment),
            Err(e) => {
                if let Err(send_err) = comm.abort(ROOT, &e.to_string()) {
                    debug!(error = %send_err, "abort not delivered to every worker");
                }
                return Err(e);
            }
        }
    } else {
        None
    };
    let assignment = comm.broadcast(ROOT, outgoing)?;
    debug!(
        rank,
        function = %assignment.function,
        threshold = assignment.threshold,
        "received assignment"
    );

    let func = registry.get(&assignment.function)?;
    let region = assignment.region_for(rank).ok_or_else(|| {
        SearchError::Communication(format!("no quadrant assigned to rank {}", rank))
    })?;

    let mut ctx = SearchContext::new();
    search(func.objective.as_ref(), region, assignment.threshold, &mut ctx);
    let local = ctx.into_result(ExecutionMode::Distributed);
    let mut stats = local.stats;
    // Quadrants sit one level below the full domain.
    stats.max_depth += 1;
    debug!(
        rank,
        upper_bound = local.upper_bound,
        candidates = local.candidates.len(),
        evaluations = stats.evaluations,
        "local search finished"
    );

    let global_bound = comm.reduce_min(ROOT, local.upper_bound)?;
    let reports = comm.all_gather(WorkerReport {
        rank,
        upper_bound: local.upper_bound,
        candidates: local.candidates,
        stats,
    })?;

    Ok(global_bound.map(|bound| merge_reports(bound, reports)))
}

/// Union of every worker's candidates, filtered against the global bound.
fn merge_reports(upper_bound: f64, reports: Vec<WorkerReport>) -> SearchResult {
    let mut stats = SearchStats::default();
    let mut merged = CandidateSet::new();
    for report in reports {
        stats += report.stats;
        merged.extend(report.candidates);
    }
    let evicted = merged.evict_from(upper_bound);
    info!(
        upper_bound,
        candidates = merged.len(),
        evicted,
        evaluations = stats.evaluations,
        "distributed search finished"
    );
    SearchResult {
        upper_bound,
        candidates: merged.into_vec(),
        stats,
        mode: ExecutionMode::Distributed,
    }
}

/// Minimize the registered function `name` with [`WORKER_COUNT`] workers on
/// a dedicated thread pool.
///
/// The request is validated before any worker starts, so a bad name or
/// threshold never leaves workers blocked.
pub fn minimize_distributed(
    registry: &FunctionRegistry,
    name: &str,
    threshold: f64,
) -> Result<SearchResult> {
    let request = RunRequest::new(name, threshold);
    prepare_assignment(registry, &request)?;

    let pool = ThreadPoolBuilder::new()
        .num_threads(WORKER_COUNT)
        .thread_name(|i| format!("ibnb-worker-{}", i))
        .build()
        .map_err(|e| SearchError::ThreadPool(e.to_string()))?;

    let endpoints: Vec<Mutex<Option<LocalEndpoint>>> = LocalGroup::new(WORKER_COUNT)
        .into_iter()
        .map(|ep| Mutex::new(Some(ep)))
        .collect();

    let outcomes = pool.broadcast(|ctx| -> Result<Option<SearchResult>> {
        let rank = ctx.index();
        let mut endpoint = endpoints
            .get(rank)
            .and_then(|slot| slot.lock().ok()?.take())
            .ok_or_else(|| {
                SearchError::Communication(format!("no endpoint for worker {}", rank))
            })?;
        let request = (rank == ROOT).then_some(&request);
        run_worker(&mut endpoint, registry, request)
    });

    let mut result = None;
    for outcome in outcomes {
        if let Some(r) = outcome? {
            result = Some(r);
        }
    }
    result.ok_or_else(|| SearchError::Communication("coordinator produced no result".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;
    use crate::search::minimize;
    use std::thread;

    fn sphere_registry() -> FunctionRegistry {
        let mut reg = FunctionRegistry::new();
        reg.register(
            "sphere",
            |x: Interval, y: Interval| x.sqr() + y.sqr(),
            SearchBox::from_bounds((-2.0, 2.0), (-2.0, 2.0)).unwrap(),
        );
        reg
    }

    #[test]
    fn test_assignment_covers_domain() {
        let domain = SearchBox::from_bounds((-2.0, 2.0), (-2.0, 2.0)).unwrap();
        let a = Assignment::new("sphere", 0.5, &domain);
        assert_eq!(a.quadrants.len(), WORKER_COUNT);
        let area: f64 = a.quadrants.iter().map(|q| q.region.area()).sum();
        assert_eq!(area, domain.area());
        for w in 0..WORKER_COUNT {
            assert!(a.region_for(w).is_some());
        }
        assert!(a.region_for(WORKER_COUNT).is_none());
    }

    #[test]
    fn test_prepare_rejects_bad_requests() {
        let reg = sphere_registry();
        assert!(matches!(
            prepare_assignment(&reg, &RunRequest::new("sphere", -1.0)),
            Err(SearchError::InvalidThreshold(_))
        ));
        assert!(matches!(
            prepare_assignment(&reg, &RunRequest::new("nope", 0.5)),
            Err(SearchError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn test_wrong_group_size_is_rejected_before_messaging() {
        let reg = sphere_registry();
        let request = RunRequest::new("sphere", 0.5);
        let mut group = LocalGroup::new(3);
        let err = run_worker(&mut group[0], &reg, Some(&request)).unwrap_err();
        assert_eq!(
            err,
            SearchError::TopologyMismatch {
                expected: WORKER_COUNT,
                found: 3
            }
        );
    }

    #[test]
    fn test_workers_on_plain_threads() {
        let reg = sphere_registry();
        let request = RunRequest::new("sphere", 0.5);
        let results: Vec<Option<SearchResult>> = thread::scope(|s| {
            let handles: Vec<_> = LocalGroup::new(WORKER_COUNT)
                .into_iter()
                .map(|mut ep| {
                    let reg = &reg;
                    let request = &request;
                    s.spawn(move || {
                        let req = (ep.rank() == ROOT).then_some(request);
                        run_worker(&mut ep, reg, req).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(results[0].is_some());
        assert!(results[1..].iter().all(Option::is_none));
    }

    #[test]
    fn test_invalid_request_releases_every_worker() {
        let reg = sphere_registry();
        for request in [RunRequest::new("sphere", 0.0), RunRequest::new("cube", 0.5)] {
            let expected = prepare_assignment(&reg, &request).unwrap_err();
            let outcomes: Vec<Result<Option<SearchResult>>> = thread::scope(|s| {
                let handles: Vec<_> = LocalGroup::new(WORKER_COUNT)
                    .into_iter()
                    .map(|mut ep| {
                        let reg = &reg;
                        let request = &request;
                        s.spawn(move || {
                            let req = (ep.rank() == ROOT).then_some(request);
                            run_worker(&mut ep, reg, req)
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });
            assert_eq!(outcomes[ROOT], Err(expected.clone()));
            for outcome in &outcomes[1..] {
                match outcome {
                    Err(SearchError::Communication(msg)) => {
                        assert!(msg.contains(&expected.to_string()), "{}", msg)
                    }
                    other => panic!("expected Communication, got {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_root_without_request_releases_workers() {
        let reg = sphere_registry();
        let outcomes: Vec<Result<Option<SearchResult>>> = thread::scope(|s| {
            let handles: Vec<_> = LocalGroup::new(WORKER_COUNT)
                .into_iter()
                .map(|mut ep| {
                    let reg = &reg;
                    s.spawn(move || run_worker(&mut ep, reg, None))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(outcomes
            .iter()
            .all(|o| matches!(o, Err(SearchError::Communication(_)))));
    }

    #[test]
    fn test_distributed_sphere() {
        let reg = sphere_registry();
        let result = minimize_distributed(&reg, "sphere", 0.5).unwrap();
        assert_eq!(result.mode, ExecutionMode::Distributed);
        assert_eq!(result.upper_bound, 0.5);
        assert!(result.candidates.iter().all(|c| c.flo < result.upper_bound));
        let at_origin: Vec<_> = result.candidates.iter().filter(|c| c.flo == 0.0).collect();
        assert_eq!(at_origin.len(), 4);
        assert!(at_origin.iter().all(|c| c.region.contains_point(0.0, 0.0)));
    }

    #[test]
    fn test_distributed_not_worse_than_sequential() {
        let reg = sphere_registry();
        let func = reg.get("sphere").unwrap();
        let seq = minimize(func.objective.as_ref(), &func.domain, 0.25).unwrap();
        let dist = minimize_distributed(&reg, "sphere", 0.25).unwrap();
        assert!(dist.upper_bound <= seq.upper_bound);
        assert_eq!(dist.stats.max_depth, seq.stats.max_depth);
    }

    #[test]
    fn test_distributed_rejects_before_spawning() {
        let reg = sphere_registry();
        assert!(matches!(
            minimize_distributed(&reg, "sphere", 0.0),
            Err(SearchError::InvalidThreshold(_))
        ));
        assert!(matches!(
            minimize_distributed(&reg, "cube", 0.5),
            Err(SearchError::UnknownFunction { .. })
        ));
    }

    #[test]
    fn test_merge_filters_against_global_bound() {
        let region = SearchBox::from_bounds((0.0, 1.0), (0.0, 1.0)).unwrap();
        let report = |rank, ub, flos: &[f64]| WorkerReport {
            rank,
            upper_bound: ub,
            candidates: flos
                .iter()
                .map(|&f| Candidate::new(region, Interval::new(f, f + 1.0)))
                .collect(),
            stats: SearchStats {
                evaluations: 10,
                max_depth: rank + 1,
                ..SearchStats::default()
            },
        };
        let merged = merge_reports(
            1.0,
            vec![report(0, 1.0, &[0.5]), report(1, 3.0, &[0.2, 1.5, 2.5])],
        );
        let flos: Vec<f64> = merged.candidates.iter().map(|c| c.flo).collect();
        assert_eq!(flos, vec![0.2, 0.5]);
        assert_eq!(merged.stats.evaluations, 20);
        assert_eq!(merged.stats.max_depth, 2);
    }
}
