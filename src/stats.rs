//! Per-table operation counters.

use crate::sync::atomic::AtomicU64;
use crate::sync::atomic::Ordering::Relaxed;

/// Monotonic operation counters for a single table.
///
/// Counters are updated with relaxed atomic increments on every operation.
/// Exactness under concurrent mutation is not required; reads are used only
/// for operational visibility and never on the decision path of a table
/// operation.
pub(crate) struct Stats {
  insert: AtomicU64,
  remove: AtomicU64,
  search: AtomicU64,
  collision: AtomicU64,
  overwritten: AtomicU64,
  insert_err: AtomicU64,
  remove_err: AtomicU64,
  search_ok: AtomicU64,
  search_err: AtomicU64,
}

macro_rules! record {
  ($($name:ident => $counter:ident),+ $(,)?) => {
    $(
      #[inline]
      pub(crate) fn $name(&self) {
        self.$counter.fetch_add(1, Relaxed);
      }
    )+
  };
}

impl Stats {
  pub(crate) fn new() -> Self {
    Self {
      insert: AtomicU64::new(0),
      remove: AtomicU64::new(0),
      search: AtomicU64::new(0),
      collision: AtomicU64::new(0),
      overwritten: AtomicU64::new(0),
      insert_err: AtomicU64::new(0),
      remove_err: AtomicU64::new(0),
      search_ok: AtomicU64::new(0),
      search_err: AtomicU64::new(0),
    }
  }

  record! {
    record_insert => insert,
    record_remove => remove,
    record_search => search,
    record_collision => collision,
    record_overwritten => overwritten,
    record_insert_err => insert_err,
    record_remove_err => remove_err,
    record_search_ok => search_ok,
    record_search_err => search_err,
  }

  /// Returns a point-in-time copy of the counters.
  pub(crate) fn snapshot(&self) -> Snapshot {
    Snapshot {
      insert: self.insert.load(Relaxed),
      remove: self.remove.load(Relaxed),
      search: self.search.load(Relaxed),
      collision: self.collision.load(Relaxed),
      overwritten: self.overwritten.load(Relaxed),
      insert_err: self.insert_err.load(Relaxed),
      remove_err: self.remove_err.load(Relaxed),
      search_ok: self.search_ok.load(Relaxed),
      search_err: self.search_err.load(Relaxed),
    }
  }
}

// -----------------------------------------------------------------------------
// Snapshot
// -----------------------------------------------------------------------------

/// A point-in-time copy of a table's counters.
///
/// Obtained from [`HTab::stats`]. Each field is monotonically non-decreasing
/// over the table's lifetime.
///
/// # Examples
///
/// ```
/// use htab::{Bits, HTab};
///
/// let table: HTab<u64> = HTab::new("snapshot", Bits::new(4));
///
/// table.insert(3, 30);
/// table.lookup(3);
///
/// let stats = table.stats();
/// assert_eq!(stats.insert, 1);
/// assert_eq!(stats.search_ok, 1);
/// assert_eq!(stats.ops(), 2);
/// ```
///
/// [`HTab::stats`]: crate::HTab::stats
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Snapshot {
  /// Successful insertions, including same-key overwrites.
  pub insert: u64,
  /// Successful removals.
  pub remove: u64,
  /// Lookup calls, successful or not.
  pub search: u64,
  /// Probe steps that skipped a slot held by a different key.
  pub collision: u64,
  /// Insertions that replaced an existing value for the same key.
  pub overwritten: u64,
  /// Insertions that failed with a saturated probe chain.
  pub insert_err: u64,
  /// Removals that found no matching slot.
  pub remove_err: u64,
  /// Lookups that found the key.
  pub search_ok: u64,
  /// Lookups that missed.
  pub search_err: u64,
}

impl Snapshot {
  /// Column headers for the registry formatter, in [`Snapshot::columns`]
  /// order.
  pub(crate) const COLUMNS: [&'static str; 9] = [
    "Insert",
    "Remove",
    "Search",
    "Collision",
    "Overwritten",
    "Insert_err",
    "Remove_err",
    "Search_ok",
    "Search_err",
  ];

  /// Returns the total number of operations: inserts, removals, and searches.
  #[inline]
  #[must_use]
  pub const fn ops(&self) -> u64 {
    self.insert + self.remove + self.search
  }

  /// Returns the counters in registry column order.
  pub(crate) const fn columns(&self) -> [u64; 9] {
    [
      self.insert,
      self.remove,
      self.search,
      self.collision,
      self.overwritten,
      self.insert_err,
      self.remove_err,
      self.search_ok,
      self.search_err,
    ]
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
