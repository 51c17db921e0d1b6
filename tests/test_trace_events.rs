#![cfg(feature = "trace")]

//! Step-by-step checks on the search event trace.
//!
//! Run with: cargo test --features trace test_trace_events

use std::sync::Arc;

use interval_bnb::search::{search, SearchContext};
use interval_bnb::trace::{field, TraceWriter};
use interval_bnb::FunctionRegistry;

fn num(line: &str, key: &str) -> f64 {
    field(line, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| panic!("no numeric {} in {:?}", key, line))
}

fn traced_run(name: &str, threshold: f64) -> (Arc<TraceWriter>, SearchContext) {
    let registry = FunctionRegistry::standard().unwrap();
    let func = registry.get(name).unwrap();
    let tracer = Arc::new(TraceWriter::new());
    let mut ctx = SearchContext::with_tracer(Arc::clone(&tracer));
    search(func.objective.as_ref(), &func.domain, threshold, &mut ctx);
    (tracer, ctx)
}

#[test]
fn tightened_bounds_strictly_decrease() {
    for name in ["sphere", "six_hump_camel", "rosenbrock"] {
        let (tracer, ctx) = traced_run(name, 0.1);
        let bounds: Vec<f64> = tracer
            .lines_tagged("TIGHTEN")
            .iter()
            .map(|l| num(l, "ub"))
            .collect();
        assert!(!bounds.is_empty(), "{}", name);
        assert!(bounds.windows(2).all(|w| w[1] < w[0]), "{}: {:?}", name, bounds);
        assert_eq!(*bounds.last().unwrap(), ctx.upper_bound());
        assert_eq!(bounds.len(), ctx.stats().tightenings);
    }
}

#[test]
fn every_step_respects_the_bound() {
    let (tracer, ctx) = traced_run("six_hump_camel", 0.1);
    let mut ub = f64::INFINITY;
    let mut size = 0usize;
    for line in tracer.get_lines() {
        let tag = line.split_whitespace().nth(1).unwrap_or_default();
        match tag {
            "EVAL" => assert_eq!(num(&line, "ub"), ub),
            "PRUNE" => assert!(num(&line, "flo") > ub),
            "TIGHTEN" => {
                let next = num(&line, "ub");
                assert!(next < ub);
                ub = next;
                let evicted: usize = field(&line, "evicted").unwrap().parse().unwrap();
                let kept: usize = field(&line, "kept").unwrap().parse().unwrap();
                assert_eq!(kept + evicted, size);
                size = kept;
            }
            "LEAF" => {
                let inserted = field(&line, "inserted") == Some("true");
                assert_eq!(inserted, num(&line, "flo") < ub);
                if inserted {
                    size += 1;
                }
                assert_eq!(field(&line, "size").unwrap().parse::<usize>().unwrap(), size);
            }
            "SPLIT" => assert!(num(&line, "width") > 0.1),
            other => panic!("unexpected tag {:?}", other),
        }
    }
    assert_eq!(size, ctx.candidates().len());
    assert!(ctx.invariant_holds());
}

#[test]
fn counts_match_stats() {
    let (tracer, ctx) = traced_run("booth", 0.5);
    let stats = ctx.stats();
    assert_eq!(tracer.lines_tagged("EVAL").len(), stats.evaluations);
    assert_eq!(tracer.lines_tagged("PRUNE").len(), stats.pruned);
    assert_eq!(tracer.lines_tagged("LEAF").len(), stats.leaves);
}
