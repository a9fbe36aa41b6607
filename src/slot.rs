//! The table cell and its state machine.
//!
//! A slot is either `FREE` (`key == KEY_EMPTY`) or `OCCUPIED(k)`. The key
//! field is the synchronization point: claiming a free slot is a single
//! compare-and-swap, and every value access is ordered through the key.

use crate::sync::atomic::AtomicU32;
use crate::sync::atomic::AtomicU64;
use crate::sync::atomic::Ordering::AcqRel;
use crate::sync::atomic::Ordering::Acquire;
use crate::sync::atomic::Ordering::Release;

/// Outcome of a successful [`Slot::claim`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Claimed {
  /// The slot was free and now belongs to the key.
  Fresh,
  /// The slot already belonged to the key; the claimant may overwrite the
  /// value.
  Existing,
}

/// One cell of the table: an atomic key and an atomic value image.
#[repr(C)]
pub(crate) struct Slot {
  key: AtomicU32,
  value: AtomicU64,
}

impl Slot {
  #[inline]
  pub(crate) fn new(key: u32, value: u64) -> Self {
    Self {
      key: AtomicU32::new(key),
      value: AtomicU64::new(value),
    }
  }

  /// Attempts to claim this slot for `key`.
  ///
  /// Returns `None` when the slot is held by a different key. A strong
  /// compare-exchange is required: a spurious failure would make the probe
  /// chain skip a genuinely free slot.
  #[inline]
  pub(crate) fn claim(&self, empty: u32, key: u32) -> Option<Claimed> {
    match self.key.compare_exchange(empty, key, AcqRel, Acquire) {
      Ok(_) => Some(Claimed::Fresh),
      Err(found) if found == key => Some(Claimed::Existing),
      Err(_) => None,
    }
  }

  #[inline]
  pub(crate) fn load_key(&self) -> u32 {
    self.key.load(Acquire)
  }

  #[inline]
  pub(crate) fn load_value(&self) -> u64 {
    self.value.load(Acquire)
  }

  /// Publishes a value image. Must follow a successful [`Slot::claim`] by the
  /// same thread.
  #[inline]
  pub(crate) fn publish(&self, value: u64) {
    self.value.store(value, Release);
  }

  /// Returns the slot to the free state.
  ///
  /// The value is cleared before the key; the release store on the key orders
  /// the value clear ahead of it, so a later claimant of this slot never
  /// exposes the retired value under its own key.
  #[inline]
  pub(crate) fn retire(&self, empty_key: u32, empty_value: u64) {
    self.value.store(empty_value, Release);
    self.key.store(empty_key, Release);
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
