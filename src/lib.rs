//! A lock-free, fixed-capacity hash table for short-lived integer keys.
//!
//! `htab` provides [`HTab`], an open-addressing hash table sized at
//! construction, optimized for high-frequency 32-bit keys (its motivating
//! workload is tracking trace events keyed by thread identifier) in a
//! multi-producer/multi-consumer environment. Every operation is wait-free:
//! at most `MAX_PROBES` slot inspections plus a constant number of atomic
//! operations, with no locks and no blocking calls.
//!
//! # Overview
//!
//! Each slot pairs an atomic 32-bit key with a 64-bit value image. Inserting
//! claims a free slot with a single compare-and-swap on the key; lookups and
//! removals walk the same bounded probe chain. The backing array carries
//! `MAX_PROBES` tail slots past the primary region, so a chain starting at
//! any index runs straight ahead without wrap-around or modular arithmetic.
//!
//! When a probe chain is saturated, insertion fails rather than displacing
//! or rehashing; the table never grows.
//!
//! # Usage
//!
//! ```
//! use htab::{Bits, HTab};
//!
//! // 256 primary slots, default avalanche hash.
//! let table: HTab<u64> = HTab::new("sessions", Bits::new(8));
//!
//! assert!(table.insert(42, 4200));
//! assert_eq!(table.lookup(42), Some(4200));
//! assert_eq!(table.remove(42), Some(4200));
//! assert_eq!(table.lookup(42), None);
//! ```
//!
//! # Configuration
//!
//! The probe bound and empty-key sentinel are chosen at compile time through
//! the [`Params`] trait; the size exponent, hash function, and value sentinel
//! are chosen at construction through the [`Builder`]:
//!
//! ```
//! use htab::{Bits, ConstParams, HTab};
//!
//! let table: HTab<u32, ConstParams<4>> = HTab::builder("traces")
//!   .bits(Bits::new(12))
//!   .build();
//!
//! assert_eq!(table.size(), 4096);
//! ```
//!
//! # Concurrency
//!
//! All operations take `&self` and may be called from any number of threads:
//!
//! ```
//! use htab::{Bits, HTab};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let table: Arc<HTab<u64>> = Arc::new(HTab::new("churn", Bits::new(8)));
//!
//! let handles: Vec<_> = (0..4_u32)
//!   .map(|thread_id| {
//!     let table = Arc::clone(&table);
//!     thread::spawn(move || {
//!       // Each thread owns its key: the single-writer-per-key contract.
//!       let key: u32 = 1 << (8 + thread_id);
//!       for round in 0..100_u64 {
//!         assert!(table.insert(key, round));
//!         assert_eq!(table.remove(key), Some(round));
//!       }
//!     })
//!   })
//!   .collect();
//!
//! for handle in handles {
//!   handle.join().unwrap();
//! }
//! ```
//!
//! ## The single-writer-per-key contract
//!
//! For any key `k`, at most one thread may call [`HTab::insert`] with `k` and
//! at most one thread may call [`HTab::remove`] with `k` at a time, and those
//! two calls must not overlap. Lookups of any key are unrestricted. Violating
//! the contract never corrupts the table or breaks memory safety, but the
//! outcomes can surprise: two racing inserts of one key may both report
//! success with only one value surviving.
//!
//! This contract is what lets removal run without a compare-and-swap and the
//! table forgo tombstones entirely; see the [`implementation`] notes.
//!
//! # Statistics and the registry
//!
//! Every table keeps nine monotonic operation counters, readable through
//! [`HTab::stats`]. Live tables are tracked by a process-wide bounded
//! [registry], and [`registry::format_all`] renders an operator-facing
//! summary of all of them.
//!
//! [registry]: crate::registry

mod array;
mod params;
mod public;
mod slot;
mod stats;
mod table;
mod utils;
mod value;

pub mod hash;
pub mod registry;

pub(crate) use crate::utils::alloc;
pub(crate) use crate::utils::sync;

pub mod implementation {
  #![doc = include_str!("../IMPLEMENTATION.md")]
}

#[doc(inline)]
pub use self::hash::HashFn;

pub use self::params::Bits;
pub use self::params::ConstParams;
pub use self::params::DefaultParams;
pub use self::params::Params;

pub use self::public::Builder;
pub use self::public::HTab;

pub use self::stats::Snapshot;

pub use self::value::Value;
