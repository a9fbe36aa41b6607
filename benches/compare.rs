use divan::Bencher;
use divan::bench;
use divan::bench_group;
use divan::black_box;
use divan::black_box_drop;

use dashmap::DashMap;
use papaya::HashMap as PapayaMap;

use htab::Bits;

type HTab = htab::HTab<u64, htab::ConstParams<8>>;

const OPS: &[usize] = &[
  1 << 6,
  1 << 8,
  1 << 10,
  1 << 12,
];

const THREADS: &[usize] = &[0, 1, 4, 8];

fn main() {
  divan::main();
}

// -----------------------------------------------------------------------------
// Unify APIs for Simplicity
// -----------------------------------------------------------------------------

trait Table: Sized + Send + Sync + 'static {
  fn new() -> Self;

  fn set(&self, key: u32, value: u64) -> bool;

  fn get(&self, key: u32) -> Option<u64>;

  fn del(&self, key: u32) -> Option<u64>;
}

impl Table for HTab {
  fn new() -> Self {
    htab::HTab::builder("bench").bits(Bits::new(16)).build()
  }

  fn set(&self, key: u32, value: u64) -> bool {
    self.insert(key, value)
  }

  fn get(&self, key: u32) -> Option<u64> {
    self.lookup(key)
  }

  fn del(&self, key: u32) -> Option<u64> {
    self.remove(key)
  }
}

impl Table for DashMap<u32, u64> {
  fn new() -> Self {
    DashMap::new()
  }

  fn set(&self, key: u32, value: u64) -> bool {
    self.insert(key, value);
    true
  }

  fn get(&self, key: u32) -> Option<u64> {
    self.get(&key).map(|item| *item)
  }

  fn del(&self, key: u32) -> Option<u64> {
    self.remove(&key).map(|(_, value)| value)
  }
}

impl Table for PapayaMap<u32, u64> {
  fn new() -> Self {
    PapayaMap::new()
  }

  fn set(&self, key: u32, value: u64) -> bool {
    self.pin().insert(key, value);
    true
  }

  fn get(&self, key: u32) -> Option<u64> {
    self.pin().get(&key).copied()
  }

  fn del(&self, key: u32) -> Option<u64> {
    self.pin().remove(&key).copied()
  }
}

// -----------------------------------------------------------------------------
// Actual Benchmarks
// -----------------------------------------------------------------------------

#[bench_group(name = "ReadHit", skip_ext_time, threads = THREADS)]
mod read_hit {
  use super::bench;
  use super::*;

  fn run<T>(bencher: Bencher<'_, '_>, ops: usize)
  where
    T: Table,
  {
    let this: T = T::new();

    for index in 0..ops {
      this.set(index as u32 + 1, index as u64);
    }

    bencher.counter(ops).bench(move || {
      for index in 0..ops {
        let item: Option<u64> = black_box(this.get(black_box(index as u32 + 1)));
        black_box_drop(item);
      }
    });
  }

  #[bench(args = OPS)]
  fn htab(bencher: Bencher<'_, '_>, ops: usize) {
    run::<HTab>(bencher, ops);
  }

  #[bench(args = OPS)]
  fn dashmap(bencher: Bencher<'_, '_>, ops: usize) {
    run::<DashMap<u32, u64>>(bencher, ops);
  }

  #[bench(args = OPS)]
  fn papaya(bencher: Bencher<'_, '_>, ops: usize) {
    run::<PapayaMap<u32, u64>>(bencher, ops);
  }
}

#[bench_group(name = "ReadMiss", skip_ext_time, threads = THREADS)]
mod read_miss {
  use super::bench;
  use super::*;

  fn run<T>(bencher: Bencher<'_, '_>, ops: usize)
  where
    T: Table,
  {
    let this: T = T::new();

    for index in 0..ops {
      this.set(index as u32 + 1, index as u64);
    }

    bencher.counter(ops).bench(move || {
      for index in 0..ops {
        let key: u32 = black_box(index as u32 + 1) | (1 << 24);
        black_box_drop(black_box(this.get(key)));
      }
    });
  }

  #[bench(args = OPS)]
  fn htab(bencher: Bencher<'_, '_>, ops: usize) {
    run::<HTab>(bencher, ops);
  }

  #[bench(args = OPS)]
  fn dashmap(bencher: Bencher<'_, '_>, ops: usize) {
    run::<DashMap<u32, u64>>(bencher, ops);
  }

  #[bench(args = OPS)]
  fn papaya(bencher: Bencher<'_, '_>, ops: usize) {
    run::<PapayaMap<u32, u64>>(bencher, ops);
  }
}

#[bench_group(name = "Churn", skip_ext_time, threads = THREADS)]
mod churn {
  use std::sync::atomic::AtomicU32;
  use std::sync::atomic::Ordering;

  use super::bench;
  use super::*;

  // Keys are partitioned by thread so concurrent benchers honor the
  // single-writer-per-key contract.
  fn thread_base() -> u32 {
    static NEXT: AtomicU32 = AtomicU32::new(1);

    thread_local! {
      static BASE: u32 = NEXT.fetch_add(1, Ordering::Relaxed);
    }

    BASE.with(|base| *base)
  }

  fn run<T>(bencher: Bencher<'_, '_>, ops: usize)
  where
    T: Table,
  {
    let this: T = T::new();

    bencher.counter(ops).bench(move || {
      let base: u32 = thread_base();

      for index in 0..ops {
        let key: u32 = black_box((base << 16) | (index as u32 + 1));
        black_box_drop(this.set(key, u64::from(key)));
        black_box_drop(this.del(key));
      }
    });
  }

  #[bench(args = OPS)]
  fn htab(bencher: Bencher<'_, '_>, ops: usize) {
    run::<HTab>(bencher, ops);
  }

  #[bench(args = OPS)]
  fn dashmap(bencher: Bencher<'_, '_>, ops: usize) {
    run::<DashMap<u32, u64>>(bencher, ops);
  }

  #[bench(args = OPS)]
  fn papaya(bencher: Bencher<'_, '_>, ops: usize) {
    run::<PapayaMap<u32, u64>>(bencher, ops);
  }
}
