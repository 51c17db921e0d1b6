//! Message passing between the workers of a distributed search.
//!
//! The coordinator protocol needs only three collectives: a one-to-all
//! broadcast of the run assignment, a minimum-reduction of the local upper
//! bounds, and an all-gather of the local reports. [`Communicator`] names
//! exactly those, plus an abort the root sends in place of a broadcast it
//! cannot make, so the protocol in [`crate::coordinator`] runs unchanged
//! over any transport that can provide them.
//!
//! [`LocalGroup`] is the in-process transport: one endpoint per worker,
//! connected by `mpsc` channels. Delivery between two endpoints is reliable
//! and FIFO. Each endpoint keeps a stash of messages that arrived before they
//! were asked for, so a fast worker entering the next collective cannot
//! confuse a slower peer still finishing the previous one.

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};

use tracing::trace;

use crate::coordinator::{Assignment, WorkerReport};
use crate::error::{Result, SearchError};

/// Collective operations available to one member of a worker group.
///
/// Every member of the group must enter the same collectives in the same
/// order; a member that never arrives blocks the others indefinitely.
pub trait Communicator {
    /// This worker's identity, in `0..size()`.
    fn rank(&self) -> usize;

    /// Number of workers in the group.
    fn size(&self) -> usize;

    /// One-to-all broadcast from `root`.
    ///
    /// The root passes `Some(assignment)` and every worker, the root included,
    /// gets back an identical copy. Non-root workers pass `None`.
    fn broadcast(&mut self, root: usize, assignment: Option<Assignment>) -> Result<Assignment>;

    /// Called by `root` in place of [`broadcast`](Self::broadcast) when it
    /// has no assignment to send. Peers waiting in `broadcast` fail with
    /// `Communication` carrying `reason`.
    fn abort(&mut self, root: usize, reason: &str) -> Result<()>;

    /// Minimum-reduction of one value per worker onto `root`.
    ///
    /// Returns `Some(min)` on the root and `None` elsewhere.
    fn reduce_min(&mut self, root: usize, value: f64) -> Result<Option<f64>>;

    /// Every worker contributes a report and receives all reports, indexed by
    /// rank.
    fn all_gather(&mut self, report: WorkerReport) -> Result<Vec<WorkerReport>>;
}

// ──────────────────────────────────────────────────────────────────────────────
// In-process transport
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Payload {
    Assignment(Assignment),
    Abort(String),
    Bound(f64),
    Report(WorkerReport),
}

impl Payload {
    fn kind(&self) -> Kind {
        match self {
            // An abort answers the broadcast it replaces.
            Self::Assignment(_) | Self::Abort(_) => Kind::Assignment,
            Self::Bound(_) => Kind::Bound,
            Self::Report(_) => Kind::Report,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Assignment,
    Bound,
    Report,
}

#[derive(Debug)]
struct Envelope {
    from: usize,
    payload: Payload,
}

/// Factory for a fully connected group of in-process endpoints.
pub struct LocalGroup;

impl LocalGroup {
    /// Create `size` connected endpoints; endpoint `i` has rank `i`.
    pub fn new(size: usize) -> Vec<LocalEndpoint> {
        let (senders, receivers): (Vec<Sender<Envelope>>, Vec<Receiver<Envelope>>) =
            (0..size).map(|_| channel()).unzip();
        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| LocalEndpoint {
                rank,
                // No sender to our own inbox, so recv fails once every peer
                // is gone instead of blocking forever.
                peers: senders
                    .iter()
                    .enumerate()
                    .map(|(r, s)| (r != rank).then(|| s.clone()))
                    .collect(),
                inbox,
                stash: VecDeque::new(),
            })
            .collect()
    }
}

/// One member of a [`LocalGroup`].
pub struct LocalEndpoint {
    rank: usize,
    peers: Vec<Option<Sender<Envelope>>>,
    inbox: Receiver<Envelope>,
    stash: VecDeque<Envelope>,
}

impl LocalEndpoint {
    fn send(&self, to: usize, payload: Payload) -> Result<()> {
        let peer = self.peers.get(to).and_then(Option::as_ref).ok_or_else(|| {
            SearchError::Communication(format!("rank {} has no peer {}", self.rank, to))
        })?;
        peer.send(Envelope {
            from: self.rank,
            payload,
        })
        .map_err(|_| {
            SearchError::Communication(format!("rank {} is no longer receiving", to))
        })
    }

    /// Next message of the given kind, optionally from a specific sender.
    fn receive(&mut self, kind: Kind, from: Option<usize>) -> Result<Envelope> {
        let wanted =
            |e: &Envelope| e.payload.kind() == kind && from.map_or(true, |f| e.from == f);

        if let Some(pos) = self.stash.iter().position(wanted) {
            if let Some(envelope) = self.stash.remove(pos) {
                return Ok(envelope);
            }
        }
        loop {
            let envelope = self.inbox.recv().map_err(|_| {
                SearchError::Communication(format!(
                    "rank {}: all peers disconnected while waiting for {:?}",
                    self.rank, kind
                ))
            })?;
            if wanted(&envelope) {
                return Ok(envelope);
            }
            trace!(rank = self.rank, from = envelope.from, "stashing early message");
            self.stash.push_back(envelope);
        }
    }

    fn others(&self) -> impl Iterator<Item = usize> {
        let me = self.rank;
        (0..self.peers.len()).filter(move |&r| r != me)
    }

    fn check_root(&self, root: usize) -> Result<()> {
        if root < self.size() {
            Ok(())
        } else {
            Err(SearchError::Communication(format!(
                "root {} outside group of {}",
                root,
                self.size()
            )))
        }
    }
}

impl Communicator for LocalEndpoint {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers.len()
    }

    fn broadcast(&mut self, root: usize, assignment: Option<Assignment>) -> Result<Assignment> {
        self.check_root(root)?;
        if self.rank == root {
            let assignment = assignment.ok_or_else(|| {
                SearchError::Communication("broadcast root has nothing to send".into())
            })?;
            for peer in self.others() {
                self.send(peer, Payload::Assignment(assignment.clone()))?;
            }
            Ok(assignment)
        } else {
            match self.receive(Kind::Assignment, Some(root))?.payload {
                Payload::Assignment(a) => Ok(a),
                Payload::Abort(reason) => Err(SearchError::Communication(format!(
                    "root {} aborted: {}",
                    root, reason
                ))),
                other => Err(unexpected(self.rank, &other)),
            }
        }
    }

    fn abort(&mut self, root: usize, reason: &str) -> Result<()> {
        self.check_root(root)?;
        if self.rank != root {
            return Err(SearchError::Communication(format!(
                "rank {} cannot abort for root {}",
                self.rank, root
            )));
        }
        for peer in self.others() {
            self.send(peer, Payload::Abort(reason.to_string()))?;
        }
        Ok(())
    }

    fn reduce_min(&mut self, root: usize, value: f64) -> Result<Option<f64>> {
        self.check_root(root)?;
        if self.rank != root {
            self.send(root, Payload::Bound(value))?;
            return Ok(None);
        }
        let mut min = value;
        for _ in self.others() {
            match self.receive(Kind::Bound, None)?.payload {
                Payload::Bound(v) => min = min.min(v),
                other => return Err(unexpected(self.rank, &other)),
            }
        }
        Ok(Some(min))
    }

    fn all_gather(&mut self, report: WorkerReport) -> Result<Vec<WorkerReport>> {
        for peer in self.others() {
            self.send(peer, Payload::Report(report.clone()))?;
        }
        let mut slots: Vec<Option<WorkerReport>> = vec![None; self.size()];
        slots[self.rank] = Some(report);
        for _ in self.others() {
            let envelope = self.receive(Kind::Report, None)?;
            match envelope.payload {
                Payload::Report(r) => slots[envelope.from] = Some(r),
                other => return Err(unexpected(self.rank, &other)),
            }
        }
        slots
            .into_iter()
            .enumerate()
            .map(|(rank, slot)| {
                slot.ok_or_else(|| {
                    SearchError::Communication(format!("no report received from rank {}", rank))
                })
            })
            .collect()
    }
}

fn unexpected(rank: usize, payload: &Payload) -> SearchError {
    SearchError::Communication(format!(
        "rank {} received unexpected {:?} message",
        rank,
        payload.kind()
    ))
}
