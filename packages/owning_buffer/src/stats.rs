//! Per-thread accounting of buffer allocations, copies, moves and releases.

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;

use nm::{Event, Magnitude};

const REGION_BYTES_BUCKETS: &[Magnitude] = &[
    0,
    64,
    1024,
    16 * 1024,
    256 * 1024,
    1024 * 1024,
    16 * 1024 * 1024,
];

/// Raw counters for the current thread. Only ever increase (wrapping on overflow).
#[derive(Debug)]
struct Counters {
    allocations: Cell<u64>,
    bytes_allocated: Cell<u64>,
    copies: Cell<u64>,
    bytes_copied: Cell<u64>,
    moves: Cell<u64>,
    releases: Cell<u64>,
}

impl Counters {
    const fn new() -> Self {
        Self {
            allocations: Cell::new(0),
            bytes_allocated: Cell::new(0),
            copies: Cell::new(0),
            bytes_copied: Cell::new(0),
            moves: Cell::new(0),
            releases: Cell::new(0),
        }
    }

    fn snapshot(&self) -> TransferStats {
        TransferStats {
            allocations: self.allocations.get(),
            bytes_allocated: self.bytes_allocated.get(),
            copies: self.copies.get(),
            bytes_copied: self.bytes_copied.get(),
            moves: self.moves.get(),
            releases: self.releases.get(),
        }
    }
}

fn bump(counter: &Cell<u64>, amount: u64) {
    counter.set(counter.get().wrapping_add(amount));
}

fn len_as_u64(len: usize) -> u64 {
    len.try_into().expect("usize always fits into u64")
}

thread_local! {
    static COUNTERS: Counters = const { Counters::new() };

    static REGIONS_ALLOCATED_BYTES: Event = Event::builder()
        .name("owning_buffer_regions_allocated_bytes")
        .histogram(REGION_BYTES_BUCKETS)
        .build();

    static REGIONS_COPIED_BYTES: Event = Event::builder()
        .name("owning_buffer_regions_copied_bytes")
        .histogram(REGION_BYTES_BUCKETS)
        .build();

    static REGIONS_MOVED_BYTES: Event = Event::builder()
        .name("owning_buffer_regions_moved_bytes")
        .histogram(REGION_BYTES_BUCKETS)
        .build();

    static REGIONS_RELEASED: Event = Event::builder()
        .name("owning_buffer_regions_released")
        .build();
}

pub(crate) fn record_allocation(len: usize) {
    COUNTERS.with(|c| {
        bump(&c.allocations, 1);
        bump(&c.bytes_allocated, len_as_u64(len));
    });
    REGIONS_ALLOCATED_BYTES.with(|e| e.observe(len));
}

pub(crate) fn record_copy(len: usize) {
    COUNTERS.with(|c| {
        bump(&c.copies, 1);
        bump(&c.bytes_copied, len_as_u64(len));
    });
    REGIONS_COPIED_BYTES.with(|e| e.observe(len));
}

pub(crate) fn record_move(len: usize) {
    COUNTERS.with(|c| bump(&c.moves, 1));
    REGIONS_MOVED_BYTES.with(|e| e.observe(len));
}

pub(crate) fn record_release() {
    COUNTERS.with(|c| bump(&c.releases, 1));
    REGIONS_RELEASED.with(|e| e.observe_once());
}

/// Totals of buffer activity observed on one thread.
///
/// Obtain the running totals of the current thread via [`TransferStats::current()`] or the
/// activity within a section of code via [`TransferSpan`].
///
/// Moving a buffer whose region is absent still counts as a move; the counters describe the
/// operations that were requested, not how many bytes they touched.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TransferStats {
    allocations: u64,
    bytes_allocated: u64,
    copies: u64,
    bytes_copied: u64,
    moves: u64,
    releases: u64,
}

impl TransferStats {
    /// Running totals for the current thread since it started.
    #[must_use]
    pub fn current() -> Self {
        COUNTERS.with(Counters::snapshot)
    }

    /// Number of byte regions acquired from the allocator.
    #[must_use]
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    /// Total size of all byte regions acquired from the allocator.
    #[must_use]
    pub fn bytes_allocated(&self) -> u64 {
        self.bytes_allocated
    }

    /// Number of duplications (copy-construct or copy-assign).
    #[must_use]
    pub fn copies(&self) -> u64 {
        self.copies
    }

    /// Total number of bytes duplicated.
    #[must_use]
    pub fn bytes_copied(&self) -> u64 {
        self.bytes_copied
    }

    /// Number of ownership transfers (move-construct or move-assign).
    #[must_use]
    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// Number of byte regions handed back to the allocator.
    #[must_use]
    pub fn releases(&self) -> u64 {
        self.releases
    }

    /// The activity that happened between `earlier` and `self`.
    #[must_use]
    pub fn since(&self, earlier: &Self) -> Self {
        Self {
            allocations: self.allocations.wrapping_sub(earlier.allocations),
            bytes_allocated: self.bytes_allocated.wrapping_sub(earlier.bytes_allocated),
            copies: self.copies.wrapping_sub(earlier.copies),
            bytes_copied: self.bytes_copied.wrapping_sub(earlier.bytes_copied),
            moves: self.moves.wrapping_sub(earlier.moves),
            releases: self.releases.wrapping_sub(earlier.releases),
        }
    }
}

impl fmt::Display for TransferStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} allocations ({} bytes), {} copies ({} bytes), {} moves, {} releases",
            self.allocations,
            self.bytes_allocated,
            self.copies,
            self.bytes_copied,
            self.moves,
            self.releases
        )
    }
}

/// Measures the buffer activity of the current thread from creation until inspected.
///
/// Spans are thread-bound because the counters they read are thread-local.
///
/// # Examples
///
/// ```
/// use owning_buffer::{OwningBuffer, TransferSpan};
///
/// let mut source = OwningBuffer::with_len(1024);
///
/// let span = TransferSpan::new();
/// let destination = OwningBuffer::take(&mut source);
/// let delta = span.to_delta();
///
/// assert_eq!(delta.moves(), 1);
/// assert_eq!(delta.copies(), 0);
/// assert_eq!(delta.allocations(), 0);
/// # drop(destination);
/// ```
#[derive(Debug)]
#[must_use = "Measurements are taken between creation and inspection"]
pub struct TransferSpan {
    start: TransferStats,

    _single_threaded: PhantomData<*const ()>,
}

impl TransferSpan {
    /// Starts measuring on the current thread.
    pub fn new() -> Self {
        Self {
            start: TransferStats::current(),
            _single_threaded: PhantomData,
        }
    }

    /// Activity on this thread since the span was created.
    #[must_use]
    pub fn to_delta(&self) -> TransferStats {
        TransferStats::current().since(&self.start)
    }
}

impl Default for TransferSpan {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::thread;

    use super::*;

    static_assertions::assert_not_impl_all!(TransferSpan: Send);
    static_assertions::assert_not_impl_all!(TransferSpan: Sync);
    static_assertions::assert_impl_all!(TransferStats: Send, Sync);

    #[test]
    fn span_without_activity_is_zero() {
        let span = TransferSpan::new();

        assert_eq!(span.to_delta(), TransferStats::default());
    }

    #[test]
    fn span_sees_recorded_events() {
        let span = TransferSpan::new();

        record_allocation(100);
        record_copy(100);
        record_move(100);
        record_move(0);
        record_release();

        let delta = span.to_delta();
        assert_eq!(delta.allocations(), 1);
        assert_eq!(delta.bytes_allocated(), 100);
        assert_eq!(delta.copies(), 1);
        assert_eq!(delta.bytes_copied(), 100);
        assert_eq!(delta.moves(), 2);
        assert_eq!(delta.releases(), 1);
    }

    #[test]
    fn other_threads_are_not_counted() {
        let span = TransferSpan::new();

        thread::spawn(|| {
            record_allocation(10);
            record_copy(10);
        })
        .join()
        .unwrap();

        assert_eq!(span.to_delta(), TransferStats::default());
    }

    #[test]
    fn since_subtracts_each_counter() {
        let earlier = TransferStats {
            allocations: 1,
            bytes_allocated: 10,
            copies: 2,
            bytes_copied: 20,
            moves: 3,
            releases: 4,
        };
        let later = TransferStats {
            allocations: 2,
            bytes_allocated: 30,
            copies: 2,
            bytes_copied: 25,
            moves: 7,
            releases: 5,
        };

        let delta = later.since(&earlier);

        assert_eq!(delta.allocations(), 1);
        assert_eq!(delta.bytes_allocated(), 20);
        assert_eq!(delta.copies(), 0);
        assert_eq!(delta.bytes_copied(), 5);
        assert_eq!(delta.moves(), 4);
        assert_eq!(delta.releases(), 1);
    }

    #[test]
    fn display_lists_all_counters() {
        let stats = TransferStats {
            allocations: 1,
            bytes_allocated: 2,
            copies: 3,
            bytes_copied: 4,
            moves: 5,
            releases: 6,
        };

        assert_eq!(
            stats.to_string(),
            "1 allocations (2 bytes), 3 copies (4 bytes), 5 moves, 6 releases"
        );
    }
}
