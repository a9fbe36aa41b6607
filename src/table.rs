use core::fmt::Debug;
use core::fmt::DebugMap;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use core::marker::PhantomData;
use core::panic::RefUnwindSafe;
use core::panic::UnwindSafe;
use std::sync::Arc;

use crossbeam_utils::CachePadded;

use crate::array::Array;
use crate::hash::HashFn;
use crate::params;
use crate::params::Bits;
use crate::params::Params;
use crate::slot::Claimed;
use crate::slot::Slot;
use crate::stats::Snapshot;
use crate::stats::Stats;
use crate::value::Value;

#[cfg(not(loom))]
use crate::registry;
#[cfg(not(loom))]
use crate::registry::Card;

// -----------------------------------------------------------------------------
// Table State
// -----------------------------------------------------------------------------

pub(crate) struct Table<V, P>
where
  V: Value,
  P: Params + ?Sized,
{
  slots: Array<Slot>,
  stats: Arc<CachePadded<Stats>>,
  hash: HashFn,
  bits: Bits,
  value_empty: u64,
  name: String,
  marker: PhantomData<(fn(P), fn() -> V)>,
}

impl<V, P> Table<V, P>
where
  V: Value,
  P: Params + ?Sized,
{
  pub(crate) fn new(name: String, bits: Bits, hash: HashFn, value_empty: V) -> Self {
    params::validate::<P>();

    let value_empty: u64 = value_empty.into_bits();

    // `MAX_PROBES` tail slots guarantee that a chain starting at any primary
    // index stays in bounds without wrap-around.
    let slots: Array<Slot> = Array::new(bits.size() + P::MAX_PROBES, |_, slot| {
      slot.write(Slot::new(P::KEY_EMPTY, value_empty));
    });

    let this: Self = Self {
      slots,
      stats: Arc::new(CachePadded::new(Stats::new())),
      hash,
      bits,
      value_empty,
      name,
      marker: PhantomData,
    };

    #[cfg(not(loom))]
    registry::global().register(Card {
      name: this.name.clone(),
      size: this.size(),
      memory: this.memory(),
      stats: Arc::clone(&this.stats),
    });

    this
  }

  #[inline]
  pub(crate) fn name(&self) -> &str {
    &self.name
  }

  #[inline]
  pub(crate) const fn bits(&self) -> Bits {
    self.bits
  }

  #[inline]
  pub(crate) const fn size(&self) -> usize {
    self.bits.size()
  }

  #[inline]
  pub(crate) const fn memory(&self) -> usize {
    self.slots.len() * size_of::<Slot>()
  }

  #[inline]
  pub(crate) fn snapshot(&self) -> Snapshot {
    self.stats.snapshot()
  }

  /// Home index of `key`: the first slot of its probe chain.
  #[inline]
  fn home(&self, key: u32) -> usize {
    ((self.hash)(key) & self.bits.mask()) as usize
  }

  /// The probe chain starting at `start`: `MAX_PROBES` consecutive slots.
  #[inline]
  fn probe(&self, start: usize) -> impl Iterator<Item = &Slot> {
    (start..start + P::MAX_PROBES).map(move |index| self.slots.get(index))
  }

  /// Stores `value` under `key`.
  ///
  /// Returns `false` when the probe chain is saturated or `key` is the empty
  /// sentinel; the table is left unchanged in that case.
  pub(crate) fn insert(&self, key: u32, value: V) -> bool {
    if key == P::KEY_EMPTY {
      self.stats.record_insert_err();
      return false;
    }

    for slot in self.probe(self.home(key)) {
      match slot.claim(P::KEY_EMPTY, key) {
        Some(Claimed::Fresh) => {
          slot.publish(value.into_bits());
          self.stats.record_insert();
          return true;
        }
        Some(Claimed::Existing) => {
          slot.publish(value.into_bits());
          self.stats.record_insert();
          self.stats.record_overwritten();
          return true;
        }
        None => self.stats.record_collision(),
      }
    }

    self.stats.record_insert_err();
    false
  }

  /// Retrieves the value stored under `key`.
  ///
  /// Never writes to the table. A freed slot in the middle of the chain reads
  /// as a mismatch and probing continues.
  pub(crate) fn lookup(&self, key: u32) -> Option<V> {
    self.stats.record_search();

    if key == P::KEY_EMPTY {
      self.stats.record_search_err();
      return None;
    }

    for slot in self.probe(self.home(key)) {
      if slot.load_key() == key {
        let value: u64 = slot.load_value();
        self.stats.record_search_ok();
        return Some(V::from_bits(value));
      }
    }

    self.stats.record_search_err();
    None
  }

  /// Removes `key` and returns its value.
  ///
  /// The caller must hold the single-writer role for `key`: between observing
  /// the matching slot and clearing it, no other thread may transition this
  /// slot, so no compare-and-swap is needed.
  pub(crate) fn remove(&self, key: u32) -> Option<V> {
    if key == P::KEY_EMPTY {
      self.stats.record_remove_err();
      return None;
    }

    for slot in self.probe(self.home(key)) {
      if slot.load_key() == key {
        let value: u64 = slot.load_value();
        slot.retire(P::KEY_EMPTY, self.value_empty);
        self.stats.record_remove();
        return Some(V::from_bits(value));
      }
    }

    self.stats.record_remove_err();
    None
  }
}

impl<V, P> Drop for Table<V, P>
where
  V: Value,
  P: Params + ?Sized,
{
  fn drop(&mut self) {
    #[cfg(not(loom))]
    registry::global().unregister(&self.stats);
  }
}

// SAFETY:
// - The slot array is only mutated through atomic operations.
// - Values are stored as plain 64-bit images; no `V` lives in the table, so
//   transferring the table transfers value images, which is safe when `V`
//   itself may move between threads.
unsafe impl<V, P> Send for Table<V, P>
where
  V: Value + Send,
  P: Params + ?Sized,
{
}

// SAFETY:
// - All shared access to slots is mediated through atomic operations.
// - Readers receive fresh copies decoded from value images; no `&V` into the
//   table is ever exposed.
unsafe impl<V, P> Sync for Table<V, P>
where
  V: Value + Send,
  P: Params + ?Sized,
{
}

// Unconditional because operations never leave a slot half-transitioned: the
// key field moves between valid states with single atomic stores.
impl<V, P> RefUnwindSafe for Table<V, P>
where
  V: Value,
  P: Params + ?Sized,
{
}

impl<V, P> UnwindSafe for Table<V, P>
where
  V: Value,
  P: Params + ?Sized,
{
}

impl<V, P> Debug for Table<V, P>
where
  V: Value + Debug,
  P: Params + ?Sized,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    let mut debug: DebugMap<'_, '_> = f.debug_map();

    for slot in self.slots.as_slice() {
      let key: u32 = slot.load_key();

      if key != P::KEY_EMPTY {
        debug.entry(&key, &V::from_bits(slot.load_value()));
      }
    }

    debug.finish()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
