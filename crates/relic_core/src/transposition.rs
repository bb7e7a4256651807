//! Lock-free transposition table.
//!
//! The table is a flat power-of-two array of slots, each an atomic pointer
//! to an immutable heap entry. Readers load the slot pointer and verify the
//! full 64-bit hash stored in the entry, so index collisions never produce
//! false hits. Writers install fresh entries with a CAS loop; an entry is
//! never mutated after publication. The search itself is single-threaded,
//! but the table tolerates concurrent readers and writers so a parallel
//! search would need no redesign.
//!
//! Evaluation heuristics that depend on game history (say, a has-castled
//! bonus or the last move) make position-keyed caching unsound at shallow
//! depths; [`WriteLimited`] discards those writes.

use std::fmt;
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicU64, Ordering};

use log::info;

use crate::score::Score;
use crate::types::Move;
use crate::zobrist::ZobristHash;

/// The bound of a possibly inexact search score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Bound {
    #[default]
    Exact,
    /// A fail-high: the true score is at least the stored score.
    Lower,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Exact => write!(f, "Exact"),
            Bound::Lower => write!(f, "Lower"),
        }
    }
}

/// A transposition table keyed on position hashes. Must be thread-safe.
pub trait TranspositionTable: Send + Sync {
    /// The bound, depth, score and best move cached for the hash, if any.
    fn read(&self, hash: ZobristHash) -> Option<(Bound, u32, Score, Move)>;

    /// Offers an entry to the table. Returns true if it was stored, subject
    /// to the table's replacement policy.
    fn write(
        &self,
        hash: ZobristHash,
        bound: Bound,
        ply: u32,
        depth: u32,
        score: Score,
        best_move: Move,
    ) -> bool;

    /// The table capacity in bytes.
    fn size(&self) -> u64;

    /// The fraction of used slots in `[0, 1]`. Best-effort under
    /// contention; used for reporting only.
    fn used(&self) -> f64;
}

/// A cached search result. Immutable once published.
struct Entry {
    hash: ZobristHash,
    score: Score,
    best_move: Move,
    ply: u16,
    depth: u8,
    bound: Bound,
    /// Intrusive link for the retire list; entries displaced by a newer
    /// entry are kept alive here until the table is cleared or dropped, so
    /// a concurrent reader can never observe freed memory.
    stale: AtomicPtr<Entry>,
}

/// The per-entry accounting unit for sizing, as in the slot arithmetic
/// below.
const ENTRY_SIZE: u64 = 32;

/// The default lock-free [`TranspositionTable`].
pub struct Table {
    slots: Box<[AtomicPtr<Entry>]>,
    mask: u64,
    retired: AtomicPtr<Entry>,
    used: AtomicU64,
}

// Safety: slots hold pointers to heap entries that are immutable after
// publication and reclaimed only with exclusive access (`clear`/`Drop`).
unsafe impl Send for Table {}
unsafe impl Sync for Table {}

impl Table {
    /// Allocates a table of the largest power-of-two entry count that fits
    /// the requested byte size.
    pub fn new(size: u64) -> Table {
        let entries = (size / ENTRY_SIZE).max(1);
        let n = 1u64 << (63 - entries.leading_zeros());

        info!("allocating {}MB transposition table with {} entries", (n * ENTRY_SIZE) >> 20, n);

        let slots = (0..n).map(|_| AtomicPtr::new(ptr::null_mut())).collect();
        Table {
            slots,
            mask: n - 1,
            retired: AtomicPtr::new(ptr::null_mut()),
            used: AtomicU64::new(0),
        }
    }

    /// Drops every entry. Requires exclusive access, which guarantees no
    /// reader still holds a pointer into the table.
    pub fn clear(&mut self) {
        for slot in self.slots.iter() {
            let ptr = slot.swap(ptr::null_mut(), Ordering::Relaxed);
            if !ptr.is_null() {
                // Safety: exclusive access; the pointer was published once.
                drop(unsafe { Box::from_raw(ptr) });
            }
        }
        let mut ptr = self.retired.swap(ptr::null_mut(), Ordering::Relaxed);
        while !ptr.is_null() {
            // Safety: exclusive access; retired entries are reachable only
            // from this list.
            let entry = unsafe { Box::from_raw(ptr) };
            ptr = entry.stale.load(Ordering::Relaxed);
        }
        self.used.store(0, Ordering::Relaxed);
    }

    /// Pushes a displaced entry onto the retire list (lock-free Treiber
    /// stack). The CAS winner that displaced it has exclusive ownership.
    fn retire(&self, entry: *mut Entry) {
        let mut head = self.retired.load(Ordering::Relaxed);
        loop {
            // Safety: `entry` was displaced by this thread's CAS and is not
            // linked anywhere else yet.
            unsafe { (*entry).stale.store(head, Ordering::Relaxed) };
            match self.retired.compare_exchange_weak(
                head,
                entry,
                Ordering::Release,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(actual) => head = actual,
            }
        }
    }
}

/// The replacement value of an entry: deeper-or-newer wins.
fn value(ptr: *const Entry) -> u32 {
    if ptr.is_null() {
        return 0;
    }
    // Safety: non-null entries are alive until exclusive reclamation.
    let entry = unsafe { &*ptr };
    entry.ply as u32 + ((entry.depth as u32) << 1)
}

impl TranspositionTable for Table {
    fn read(&self, hash: ZobristHash) -> Option<(Bound, u32, Score, Move)> {
        let slot = &self.slots[(hash & self.mask) as usize];
        let ptr = slot.load(Ordering::Acquire);
        if ptr.is_null() {
            return None;
        }
        // Safety: published entries are immutable and outlive all readers.
        let entry = unsafe { &*ptr };
        if entry.hash != hash {
            return None;
        }
        Some((entry.bound, entry.depth as u32, entry.score, entry.best_move))
    }

    fn write(
        &self,
        hash: ZobristHash,
        bound: Bound,
        ply: u32,
        depth: u32,
        score: Score,
        best_move: Move,
    ) -> bool {
        let slot = &self.slots[(hash & self.mask) as usize];
        let fresh = Box::into_raw(Box::new(Entry {
            hash,
            score,
            best_move,
            ply: ply.min(u16::MAX as u32) as u16,
            depth: depth.min(u8::MAX as u32) as u8,
            bound,
            stale: AtomicPtr::new(ptr::null_mut()),
        }));

        let mut current = slot.load(Ordering::Acquire);
        loop {
            if value(current) > value(fresh) {
                // Skip: higher-value incumbent. The fresh entry was never
                // published, so it can be freed directly.
                // Safety: `fresh` is exclusively owned here.
                drop(unsafe { Box::from_raw(fresh) });
                return false;
            }
            match slot.compare_exchange_weak(current, fresh, Ordering::AcqRel, Ordering::Acquire) {
                Ok(prev) => {
                    if prev.is_null() {
                        self.used.fetch_add(1, Ordering::Relaxed);
                    } else {
                        self.retire(prev);
                    }
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }

    fn size(&self) -> u64 {
        self.slots.len() as u64 * ENTRY_SIZE
    }

    fn used(&self) -> f64 {
        self.used.load(Ordering::Relaxed) as f64 / self.slots.len() as f64
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        self.clear();
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TT[{} @ {}%]", self.size(), (100.0 * self.used()) as u32)
    }
}

/// A wrapper that forwards reads but discards writes below a minimum
/// depth. Useful when leaf evaluations depend on recent move history and
/// shallow cached scores would be unsound.
pub struct WriteLimited<T> {
    pub min_depth: u32,
    pub inner: T,
}

impl<T: TranspositionTable> TranspositionTable for WriteLimited<T> {
    fn read(&self, hash: ZobristHash) -> Option<(Bound, u32, Score, Move)> {
        self.inner.read(hash)
    }

    fn write(
        &self,
        hash: ZobristHash,
        bound: Bound,
        ply: u32,
        depth: u32,
        score: Score,
        best_move: Move,
    ) -> bool {
        if depth < self.min_depth {
            return false;
        }
        self.inner.write(hash, bound, ply, depth, score, best_move)
    }

    fn size(&self) -> u64 {
        self.inner.size()
    }

    fn used(&self) -> f64 {
        self.inner.used()
    }
}

/// The no-op table: always misses, never stores. Used when the engine is
/// configured without a hash table.
pub struct NoTable;

impl TranspositionTable for NoTable {
    fn read(&self, _hash: ZobristHash) -> Option<(Bound, u32, Score, Move)> {
        None
    }

    fn write(
        &self,
        _hash: ZobristHash,
        _bound: Bound,
        _ply: u32,
        _depth: u32,
        _score: Score,
        _best_move: Move,
    ) -> bool {
        false
    }

    fn size(&self) -> u64 {
        0
    }

    fn used(&self) -> f64 {
        0.0
    }
}

#[cfg(test)]
#[path = "transposition_tests.rs"]
mod transposition_tests;
