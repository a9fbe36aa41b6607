use core::fmt::Debug;
use core::fmt::Formatter;
use core::fmt::Result;
use core::marker::PhantomData;

use crate::hash;
use crate::hash::HashFn;
use crate::params::Bits;
use crate::params::DefaultParams;
use crate::params::Params;
use crate::stats::Snapshot;
use crate::table::Table;
use crate::value::Value;

// -----------------------------------------------------------------------------
// HTab
// -----------------------------------------------------------------------------

/// A lock-free, fixed-capacity hash table keyed by 32-bit integers.
///
/// `HTab` stores values of type `V` and is parameterized by `P` to configure
/// the probe bound and the empty-key sentinel at compile time.
///
/// See the [crate-level documentation][crate] for an overview, the
/// concurrency contract, and examples.
///
/// # Type Parameters
///
/// - `V`: The type of values stored in the table, convertible to a 64-bit
///   image through [`Value`].
/// - `P`: Configuration parameters implementing [`Params`]. Defaults to
///   [`DefaultParams`] (8 probes, key sentinel 0).
///
/// # Examples
///
/// Basic usage with the default configuration:
///
/// ```
/// use htab::{Bits, HTab};
///
/// let table: HTab<u64> = HTab::new("connections", Bits::new(8));
///
/// assert!(table.insert(42, 4200));
/// assert_eq!(table.lookup(42), Some(4200));
/// assert_eq!(table.remove(42), Some(4200));
/// assert_eq!(table.lookup(42), None);
/// ```
///
/// Custom configuration through the [`Builder`]:
///
/// ```
/// use htab::{Bits, ConstParams, HTab};
///
/// let table: HTab<u32, ConstParams<4>> = HTab::builder("collisions")
///   .bits(Bits::new(8))
///   .hash(htab::hash::identity)
///   .build();
///
/// // Multiples of the size collide into one chain under the identity hash.
/// assert!(table.insert(256, 1));
/// assert!(table.insert(512, 2));
/// assert_eq!(table.lookup(512), Some(2));
/// ```
pub struct HTab<V, P = DefaultParams>
where
  V: Value,
  P: Params + ?Sized,
{
  inner: Table<V, P>,
}

impl<V, P> HTab<V, P>
where
  V: Value,
  P: Params + ?Sized,
{
  /// Returns a [`Builder`] for a table with the given display name.
  #[inline]
  pub fn builder(name: impl Into<String>) -> Builder<V, P> {
    Builder::new(name)
  }

  /// Creates a table with `1 << bits` primary slots, the default hash, and a
  /// zero value sentinel.
  ///
  /// The name is used only by the [registry]. The table allocates
  /// `(1 << bits) + MAX_PROBES` slots up front and never grows.
  ///
  /// # Examples
  ///
  /// ```
  /// use htab::{Bits, HTab};
  ///
  /// let table: HTab<u64> = HTab::new("sessions", Bits::new(10));
  /// assert_eq!(table.size(), 1024);
  /// ```
  ///
  /// [registry]: crate::registry
  #[inline]
  pub fn new(name: impl Into<String>, bits: Bits) -> Self {
    Self::builder(name).bits(bits).build()
  }

  /// Stores `value` under `key`, overwriting any value the key already holds.
  ///
  /// Returns `false` when every slot of the key's probe chain is held by
  /// other keys, or when `key` equals the empty sentinel; the table is left
  /// unchanged in that case.
  ///
  /// For any key, at most one thread may insert at a time; see the
  /// [single-writer contract](crate#the-single-writer-per-key-contract).
  ///
  /// # Examples
  ///
  /// ```
  /// use htab::{Bits, HTab};
  ///
  /// let table: HTab<u64> = HTab::new("insert", Bits::new(8));
  ///
  /// assert!(table.insert(7, 70));
  /// assert!(table.insert(7, 71));
  /// assert_eq!(table.lookup(7), Some(71));
  /// ```
  #[inline]
  pub fn insert(&self, key: u32, value: V) -> bool {
    self.inner.insert(key, value)
  }

  /// Retrieves the value stored under `key`.
  ///
  /// Lookups never write to the table and never allocate. Any number of
  /// threads may look up any key concurrently.
  ///
  /// # Examples
  ///
  /// ```
  /// use htab::{Bits, HTab};
  ///
  /// let table: HTab<u64> = HTab::new("lookup", Bits::new(8));
  ///
  /// table.insert(9, 90);
  ///
  /// assert_eq!(table.lookup(9), Some(90));
  /// assert_eq!(table.lookup(10), None);
  /// ```
  #[inline]
  pub fn lookup(&self, key: u32) -> Option<V> {
    self.inner.lookup(key)
  }

  /// Removes `key` from the table and returns its value.
  ///
  /// Returns `None` when the key is not present within its probe window.
  ///
  /// For any key, at most one thread may remove at a time, and a removal must
  /// not overlap an insert of the same key; see the
  /// [single-writer contract](crate#the-single-writer-per-key-contract).
  ///
  /// # Examples
  ///
  /// ```
  /// use htab::{Bits, HTab};
  ///
  /// let table: HTab<u64> = HTab::new("remove", Bits::new(8));
  ///
  /// table.insert(11, 110);
  ///
  /// assert_eq!(table.remove(11), Some(110));
  /// assert_eq!(table.remove(11), None);
  /// ```
  #[inline]
  pub fn remove(&self, key: u32) -> Option<V> {
    self.inner.remove(key)
  }

  /// Returns the table's display name.
  #[inline]
  pub fn name(&self) -> &str {
    self.inner.name()
  }

  /// Returns the table-size exponent chosen at construction.
  #[inline]
  pub const fn bits(&self) -> Bits {
    self.inner.bits()
  }

  /// Returns the number of primary slots, `1 << bits`.
  ///
  /// The backing array additionally holds `MAX_PROBES` tail slots so probe
  /// chains never wrap around.
  #[inline]
  pub const fn size(&self) -> usize {
    self.inner.size()
  }

  /// Returns the slot array's size in bytes.
  #[inline]
  pub const fn memory(&self) -> usize {
    self.inner.memory()
  }

  /// Returns a point-in-time copy of the table's counters.
  ///
  /// # Examples
  ///
  /// ```
  /// use htab::{Bits, HTab};
  ///
  /// let table: HTab<u64> = HTab::new("stats", Bits::new(8));
  ///
  /// table.insert(1, 10);
  /// table.lookup(1);
  /// table.lookup(2);
  ///
  /// let stats = table.stats();
  ///
  /// assert_eq!(stats.insert, 1);
  /// assert_eq!(stats.search, 2);
  /// assert_eq!(stats.search_ok, 1);
  /// assert_eq!(stats.search_err, 1);
  /// ```
  #[inline]
  pub fn stats(&self) -> Snapshot {
    self.inner.snapshot()
  }
}

impl<V, P> Debug for HTab<V, P>
where
  V: Value + Debug,
  P: Params + ?Sized,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("HTab")
      .field("name", &self.inner.name())
      .field("bits", &self.inner.bits())
      .field("entries", &self.inner)
      .finish()
  }
}

// -----------------------------------------------------------------------------
// Builder
// -----------------------------------------------------------------------------

/// A builder for [`HTab`] instances.
///
/// Collects the construction-time parameters: display name, size exponent,
/// hash function, and the value sentinel written into freed slots.
///
/// # Examples
///
/// ```
/// use htab::{Bits, HTab};
///
/// let table: HTab<i64> = HTab::builder("fds")
///   .bits(Bits::new(12))
///   .value_empty(-1)
///   .build();
///
/// assert_eq!(table.size(), 4096);
/// ```
pub struct Builder<V, P = DefaultParams>
where
  V: Value,
  P: Params + ?Sized,
{
  name: String,
  bits: Bits,
  hash: HashFn,
  value_empty: V,
  marker: PhantomData<fn(P)>,
}

impl<V, P> Builder<V, P>
where
  V: Value,
  P: Params + ?Sized,
{
  #[inline]
  fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      bits: Bits::DEF,
      hash: hash::avalanche,
      value_empty: V::from_bits(0),
      marker: PhantomData,
    }
  }

  /// Sets the table-size exponent. Defaults to [`Bits::DEF`].
  #[inline]
  #[must_use]
  pub fn bits(mut self, bits: Bits) -> Self {
    self.bits = bits;
    self
  }

  /// Sets the hash function. Defaults to [`hash::avalanche`].
  ///
  /// Tests use [`hash::identity`] to force deterministic collisions.
  #[inline]
  #[must_use]
  pub fn hash(mut self, hash: HashFn) -> Self {
    self.hash = hash;
    self
  }

  /// Sets the value written into freed slots. Defaults to
  /// `V::from_bits(0)`.
  ///
  /// The sentinel is hygiene for the remove protocol; it never changes which
  /// keys are considered present.
  #[inline]
  #[must_use]
  pub fn value_empty(mut self, value: V) -> Self {
    self.value_empty = value;
    self
  }

  /// Builds the table, allocating and registering it.
  #[inline]
  #[must_use]
  pub fn build(self) -> HTab<V, P> {
    HTab {
      inner: Table::new(self.name, self.bits, self.hash, self.value_empty),
    }
  }
}

impl<V, P> Debug for Builder<V, P>
where
  V: Value + Debug,
  P: Params + ?Sized,
{
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.debug_struct("Builder")
      .field("name", &self.name)
      .field("bits", &self.bits)
      .field("value_empty", &self.value_empty)
      .finish()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
