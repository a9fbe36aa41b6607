//! A process-wide registry of live tables.
//!
//! Every table registers itself at construction and unregisters on drop, so
//! an operator can render a tabular summary of all live tables and their
//! counters with [`format_all`] or [`render`]. The registry holds at most
//! [`REGISTRY_CAPACITY`] entries; a table constructed beyond that limit is
//! still fully usable, it just goes unlisted.
//!
//! The registry is never consulted on the hot path: operations touch only
//! their own table's counters.

use core::fmt;
use std::sync::Arc;
use std::sync::OnceLock;

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use parking_lot::MutexGuard;

use crate::stats::Snapshot;
use crate::stats::Stats;

/// The maximum number of tables the registry tracks.
pub const REGISTRY_CAPACITY: usize = 64;

// -----------------------------------------------------------------------------
// Card
// -----------------------------------------------------------------------------

/// The registry's record of one live table.
///
/// The shared stats allocation doubles as the table's identity: registration
/// is idempotent per table, not per name.
pub(crate) struct Card {
  pub(crate) name: String,
  pub(crate) size: usize,
  pub(crate) memory: usize,
  pub(crate) stats: Arc<CachePadded<Stats>>,
}

// -----------------------------------------------------------------------------
// Registry
// -----------------------------------------------------------------------------

/// A bounded set of live-table records, in registration order.
pub(crate) struct Registry {
  cards: Mutex<Vec<Card>>,
}

impl Registry {
  pub(crate) fn new() -> Self {
    Self {
      cards: Mutex::new(Vec::with_capacity(REGISTRY_CAPACITY)),
    }
  }

  /// Registers a table. A second registration of the same table is a no-op.
  pub(crate) fn register(&self, card: Card) {
    let mut cards: MutexGuard<'_, Vec<Card>> = self.cards.lock();

    if cards.iter().any(|held| Arc::ptr_eq(&held.stats, &card.stats)) {
      tracing::debug!(name = %card.name, "table already registered");
      return;
    }

    if cards.len() >= REGISTRY_CAPACITY {
      tracing::warn!(
        name = %card.name,
        capacity = REGISTRY_CAPACITY,
        "registry full; table left unregistered"
      );
      return;
    }

    tracing::debug!(name = %card.name, "table registered");
    cards.push(card);
  }

  /// Removes a table's record, if present.
  pub(crate) fn unregister(&self, stats: &Arc<CachePadded<Stats>>) {
    let mut cards: MutexGuard<'_, Vec<Card>> = self.cards.lock();

    if let Some(position) = cards.iter().position(|held| Arc::ptr_eq(&held.stats, stats)) {
      let card: Card = cards.remove(position);
      tracing::debug!(name = %card.name, "table unregistered");
    }
  }

  /// Renders the header row and one row per registered table.
  pub(crate) fn format<W>(&self, out: &mut W) -> fmt::Result
  where
    W: fmt::Write,
  {
    let cards: MutexGuard<'_, Vec<Card>> = self.cards.lock();

    write!(out, "{:<25} {:>12} {:>12} {:>12}", "Name", "Size", "Memory", "Ops")?;

    for column in Snapshot::COLUMNS {
      write!(out, " {column:>12}")?;
    }

    writeln!(out)?;

    for card in cards.iter() {
      let snapshot: Snapshot = card.stats.snapshot();

      write!(
        out,
        "{:<25} {:>12} {:>12} {:>12}",
        card.name,
        card.size,
        card.memory,
        snapshot.ops(),
      )?;

      for value in snapshot.columns() {
        write!(out, " {value:>12}")?;
      }

      writeln!(out)?;
    }

    Ok(())
  }
}

// -----------------------------------------------------------------------------
// Global Accessor
// -----------------------------------------------------------------------------

/// Returns the process-wide registry, initializing it on first use.
pub(crate) fn global() -> &'static Registry {
  static GLOBAL: OnceLock<Registry> = OnceLock::new();

  GLOBAL.get_or_init(Registry::new)
}

/// Renders a fixed-width summary of all registered tables into `out`.
///
/// The header names the `Name`, `Size`, `Memory`, and `Ops` columns followed
/// by one column per counter; each table contributes one newline-terminated
/// row, in registration order. The output is meant for operator consumption,
/// not for parsing.
///
/// # Examples
///
/// ```
/// use htab::{Bits, HTab};
///
/// let table: HTab<u64> = HTab::new("visible", Bits::new(4));
/// table.insert(1, 10);
///
/// let mut out = String::new();
/// htab::registry::format_all(&mut out).unwrap();
///
/// assert!(out.starts_with("Name"));
/// assert!(out.contains("visible"));
/// ```
pub fn format_all<W>(out: &mut W) -> fmt::Result
where
  W: fmt::Write,
{
  global().format(out)
}

/// Renders the [`format_all`] summary as a `String`.
#[must_use]
pub fn render() -> String {
  let mut out: String = String::new();

  format_all(&mut out).expect("formatting into a `String` cannot fail");

  out
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
