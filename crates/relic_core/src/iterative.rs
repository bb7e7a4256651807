//! Iterative deepening search harness.
//!
//! [`Iterative::launch`] spawns one worker thread that owns its forked
//! board and runs the root search at increasing depth, publishing one
//! principal variation per completed depth. The PV channel buffers a
//! single value and drops the undelivered predecessor, so a slow consumer
//! never blocks the search and always reads the deepest line. A partial
//! iteration is never published.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error};

use crate::board::Board;
use crate::eval::Noise;
use crate::search::{Pv, Search, SearchContext, SearchError};
use crate::time_control::TimeControl;
use crate::transposition::TranspositionTable;

/// Dynamic search options, chosen per search.
#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    /// Limits the search to the given ply depth, if set.
    pub depth_limit: Option<u32>,
    /// Limits the search duration, if set.
    pub time_control: Option<TimeControl>,
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(depth) = self.depth_limit {
            parts.push(format!("depth={depth}"));
        }
        if let Some(tc) = self.time_control {
            parts.push(format!("time={tc}"));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// A search generator. Expects an exclusive (forked) board and returns a
/// handle plus a channel of iteratively deeper principal variations. The
/// channel closes when the search is exhausted or stopped.
pub trait Launcher: Send + Sync {
    fn launch(
        &self,
        board: Board,
        tt: Arc<dyn TranspositionTable>,
        noise: Noise,
        opt: Options,
    ) -> (Arc<dyn SearchHandle>, PvReceiver);
}

/// Management interface for a running search. The driver spins off
/// searches with forked boards and abandons them when no longer needed,
/// which keeps the stopping conditions and re-synchronization trivial.
pub trait SearchHandle: Send + Sync {
    /// Halts the search, if running, and returns the last published
    /// principal variation. Idempotent.
    fn halt(&self) -> Pv;
}

// =============================================================================
// PV channel: a latest-value slot
// =============================================================================

struct Channel {
    slot: Mutex<ChannelState>,
    cv: Condvar,
}

struct ChannelState {
    value: Option<Pv>,
    closed: bool,
}

/// The sending half of a PV channel. Closes the channel when dropped.
pub struct PvSender(Arc<Channel>);

/// The receiving half of a PV channel.
pub struct PvReceiver(Arc<Channel>);

/// A channel with room for exactly one PV: sending replaces any
/// undelivered value.
pub fn pv_channel() -> (PvSender, PvReceiver) {
    let shared = Arc::new(Channel {
        slot: Mutex::new(ChannelState {
            value: None,
            closed: false,
        }),
        cv: Condvar::new(),
    });
    (PvSender(Arc::clone(&shared)), PvReceiver(shared))
}

impl PvSender {
    pub fn send(&self, pv: Pv) {
        let mut state = self.0.slot.lock().unwrap();
        state.value = Some(pv); // drop any undelivered predecessor
        self.0.cv.notify_all();
    }
}

impl Drop for PvSender {
    fn drop(&mut self) {
        let mut state = self.0.slot.lock().unwrap();
        state.closed = true;
        self.0.cv.notify_all();
    }
}

impl PvReceiver {
    /// Blocks for the next PV; `None` once the channel is closed and
    /// drained.
    pub fn recv(&self) -> Option<Pv> {
        let mut state = self.0.slot.lock().unwrap();
        loop {
            if let Some(pv) = state.value.take() {
                return Some(pv);
            }
            if state.closed {
                return None;
            }
            state = self.0.cv.wait(state).unwrap();
        }
    }

    /// The next PV if one is ready.
    pub fn try_recv(&self) -> Option<Pv> {
        self.0.slot.lock().unwrap().value.take()
    }
}

impl Iterator for PvReceiver {
    type Item = Pv;

    fn next(&mut self) -> Option<Pv> {
        self.recv()
    }
}

// =============================================================================
// Iterative deepening driver
// =============================================================================

/// The iterative deepening harness over a root search.
pub struct Iterative {
    root: Arc<dyn Search>,
}

impl Iterative {
    pub fn new(root: impl Search + 'static) -> Iterative {
        Iterative {
            root: Arc::new(root),
        }
    }
}

impl Launcher for Iterative {
    fn launch(
        &self,
        board: Board,
        tt: Arc<dyn TranspositionTable>,
        noise: Noise,
        opt: Options,
    ) -> (Arc<dyn SearchHandle>, PvReceiver) {
        let (tx, rx) = pv_channel();
        let handle = Arc::new(Handle {
            init: Latch::new(),
            done: Latch::new(),
            pv: Mutex::new(Pv::default()),
            sctx: SearchContext::new(tt, noise),
        });

        let root = Arc::clone(&self.root);
        let worker = Arc::clone(&handle);
        thread::spawn(move || worker.process(root, board, opt, tx));

        (handle, rx)
    }
}

struct Handle {
    /// Opened once the first iteration completes (or the worker exits), so
    /// a halt never interrupts the search before any result exists.
    init: Latch,
    /// Opened when the worker exits; disarms the hard timer.
    done: Latch,
    pv: Mutex<Pv>,
    sctx: SearchContext,
}

impl SearchHandle for Handle {
    fn halt(&self) -> Pv {
        self.init.wait();
        self.sctx.stop.stop();
        self.pv.lock().unwrap().clone()
    }
}

impl Handle {
    fn process(self: Arc<Self>, root: Arc<dyn Search>, mut board: Board, opt: Options, out: PvSender) {
        // Opens the init latch and disarms the timer however the worker
        // exits; dropping `out` closes the PV channel.
        let _guard = WorkerGuard(&self);

        let soft = opt.time_control.map(|tc| {
            let (soft, hard) = tc.limits(board.turn());
            debug!("time control limits: [{:?}; {:?}]", soft, hard);
            self.arm_hard_timer(hard);
            soft
        });

        let mut depth = 1;
        while !self.sctx.stop.is_stopped() {
            let start = Instant::now();

            match root.search(&self.sctx, &mut board, depth) {
                Err(err) => {
                    if err != SearchError::Halted {
                        error!("search failed on {} at depth={}: {}", board, depth, err);
                    }
                    return;
                }
                Ok((nodes, score, moves)) => {
                    let pv = Pv {
                        depth,
                        moves,
                        score,
                        nodes,
                        elapsed: start.elapsed(),
                        hash_used: self.sctx.tt.used(),
                    };

                    debug!("searched {}: {}", board.position(), pv);

                    *self.pv.lock().unwrap() = pv.clone();
                    out.send(pv);
                    self.init.open();

                    if opt.depth_limit == Some(depth) {
                        return; // halt: reached the depth limit
                    }
                    if let Some(md) = score.mate_distance()
                        && md as u32 <= depth
                    {
                        // halt: forced mate found within the full-width
                        // search. Exact result.
                        return;
                    }
                    if let Some(soft) = soft
                        && soft < start.elapsed()
                    {
                        return; // halt: exceeded the soft limit. Do not start anew.
                    }
                    depth += 1;
                }
            }
        }
    }

    /// Arms a one-shot timer that halts the search when the hard limit
    /// elapses. The timer is disarmed by the worker guard on exit.
    fn arm_hard_timer(self: &Arc<Self>, hard: Duration) {
        let handle = Arc::clone(self);
        thread::spawn(move || {
            if handle.done.wait_timeout(hard) {
                return; // search finished first
            }
            handle.halt();
        });
    }
}

/// Opens the latches on drop so that `halt` callers and the hard timer
/// never wait on an exited worker.
struct WorkerGuard<'a>(&'a Handle);

impl Drop for WorkerGuard<'_> {
    fn drop(&mut self) {
        self.0.init.open();
        self.0.done.open();
    }
}

/// A one-shot open latch.
struct Latch {
    opened: Mutex<bool>,
    cv: Condvar,
}

impl Latch {
    fn new() -> Latch {
        Latch {
            opened: Mutex::new(false),
            cv: Condvar::new(),
        }
    }

    fn open(&self) {
        let mut opened = self.opened.lock().unwrap();
        if !*opened {
            *opened = true;
            self.cv.notify_all();
        }
    }

    fn wait(&self) {
        let mut opened = self.opened.lock().unwrap();
        while !*opened {
            opened = self.cv.wait(opened).unwrap();
        }
    }

    /// Waits for the latch up to the given duration. Returns true if the
    /// latch opened.
    fn wait_timeout(&self, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        let mut opened = self.opened.lock().unwrap();
        while !*opened {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self.cv.wait_timeout(opened, deadline - now).unwrap();
            opened = guard;
        }
        true
    }
}

#[cfg(test)]
#[path = "iterative_tests.rs"]
mod iterative_tests;
