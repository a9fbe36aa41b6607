//! Churn driver: hammers one table from several worker threads while the
//! main thread prints the registry summary once per second.
//!
//! Workers use the identity hash with keys that are multiples of the table
//! size, so every thread contends on the probe chain at slot 0.
//!
//! ```sh
//! cargo run --example churn -- --threads 4 --bits 8 --seconds 10
//! ```

use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;
use std::time::Instant;

use clap::Parser;
use htab::Bits;
use htab::ConstParams;
use htab::HTab;
use htab::hash;
use htab::registry;

type Probe4 = ConstParams<4>;
type Table = HTab<u32, Probe4>;

#[derive(Parser, Debug)]
struct Args {
  /// Number of churn workers; beyond the probe bound of 4, inserts start
  /// failing by design
  #[arg(short = 't', long, default_value_t = 4)]
  threads: usize,

  /// Table size exponent (primary slots = 1 << bits)
  #[arg(short = 'b', long, default_value_t = 8)]
  bits: u32,

  /// Seconds to run before shutting down
  #[arg(short = 's', long, default_value_t = 10)]
  seconds: u64,
}

/// One worker: insert, find, find-absent, remove, find-absent, repeat.
///
/// Any step with an unexpected outcome logs an error and stops the worker,
/// mirroring a watchdog that treats protocol violations as fatal.
fn churn(table: &Table, index: usize, key: u32, deadline: Instant) -> u64 {
  let mut rounds: u64 = 0;

  while Instant::now() < deadline {
    if !table.insert(key, key) {
      tracing::error!(worker = index, key, "failed to insert entry");
      break;
    }

    match table.lookup(key) {
      Some(found) if found == key => {}
      Some(found) => {
        tracing::error!(worker = index, key, found, "found wrong entry");
        break;
      }
      None => {
        tracing::error!(worker = index, key, "failed to find entry");
        break;
      }
    }

    if let Some(found) = table.lookup(!key) {
      tracing::error!(worker = index, key = !key, found, "found non-existing key");
      break;
    }

    match table.remove(key) {
      Some(removed) if removed == key => {}
      Some(removed) => {
        tracing::error!(worker = index, key, removed, "removed wrong entry");
        break;
      }
      None => {
        tracing::error!(worker = index, key, "failed to remove entry");
        break;
      }
    }

    if let Some(found) = table.lookup(key) {
      tracing::error!(worker = index, key, found, "found removed key");
      break;
    }

    rounds += 1;
  }

  rounds
}

fn main() {
  tracing_subscriber::fmt::init();

  let args: Args = Args::parse();

  let table: Arc<Table> = Arc::new(
    HTab::builder("churn")
      .bits(Bits::new(args.bits))
      .hash(hash::identity)
      .build(),
  );

  tracing::info!(
    threads = args.threads,
    size = table.size(),
    memory = table.memory(),
    "starting churn"
  );

  let deadline: Instant = Instant::now() + Duration::from_secs(args.seconds);

  let workers: Vec<JoinHandle<u64>> = (0..args.threads)
    .map(|index| {
      let table: Arc<Table> = Arc::clone(&table);
      let key: u32 = (table.size() << index) as u32;

      thread::spawn(move || churn(&table, index, key, deadline))
    })
    .collect();

  while Instant::now() < deadline {
    thread::sleep(Duration::from_secs(1));
    println!("{}", registry::render());
  }

  for (index, worker) in workers.into_iter().enumerate() {
    match worker.join() {
      Ok(rounds) => tracing::info!(worker = index, rounds, "worker finished"),
      Err(_) => tracing::error!(worker = index, "worker panicked"),
    }
  }
}
