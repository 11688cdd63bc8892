//! Partitioned parallel scan of the address bitmap.
//!
//! The space is cut into equal contiguous partitions, one per worker. Each
//! worker owns its partition, its trie and nothing else, so the scan needs no
//! locking. Two barriers bracket the scan: the start barrier publishes the
//! finished bitmap to every worker, and the interval between the controller's
//! two waits is the wall-clock time of the parallel phase.

use crate::config::validate_workers;
use crate::error::{Error, Result};
use crate::models::{AddressBitmap, PrefixTrie, ADDRESS_SPACE};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

/// A contiguous slice `[start, end)` of the address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub index: usize,
    pub start: u64,
    pub end: u64,
}

/// Tries in partition order plus the measured scan time.
#[derive(Debug)]
pub struct ScanOutcome {
    pub tries: Vec<PrefixTrie>,
    pub elapsed: Duration,
}

/// Split the address space into `workers` equal partitions.
pub fn partitions(workers: usize) -> Result<Vec<Partition>> {
    validate_workers(workers)?;
    let size = ADDRESS_SPACE / workers as u64;
    Ok((0..workers)
        .map(|index| Partition {
            index,
            start: size * index as u64,
            end: size * (index as u64 + 1),
        })
        .collect())
}

/// Build the minimal trie for the members inside `partition`.
///
/// Maximal runs of members are inserted as ranges, which leaves the trie in
/// the same state as inserting each member host in ascending order.
pub fn scan_partition(bitmap: &AddressBitmap, partition: &Partition) -> PrefixTrie {
    let mut trie = PrefixTrie::new();
    let mut pos = partition.start;
    let mut runs = 0usize;
    while let Some(run_start) = bitmap.next_set(pos, partition.end) {
        let run_end = bitmap.next_clear(run_start, partition.end);
        trie.insert_range(run_start, run_end);
        runs += 1;
        pos = run_end;
    }
    log::debug!(
        "partition {:2} [{:#010x}, {:#011x}) runs={} trie_nodes={}",
        partition.index,
        partition.start,
        partition.end,
        runs,
        trie.node_count()
    );
    trie
}

/// Body run by each worker between the two barriers.
type ScanFn = fn(&AddressBitmap, &Partition) -> PrefixTrie;

/// Scan every partition on its own thread.
///
/// The bitmap must be fully populated; it is only read from here on.
pub fn scan_parallel(bitmap: Arc<AddressBitmap>, workers: usize) -> Result<ScanOutcome> {
    scan_parallel_with(bitmap, workers, scan_partition)
}

fn scan_parallel_with(
    bitmap: Arc<AddressBitmap>,
    workers: usize,
    scan: ScanFn,
) -> Result<ScanOutcome> {
    let parts = partitions(workers)?;
    let barrier_start = Arc::new(Barrier::new(workers + 1));
    let barrier_end = Arc::new(Barrier::new(workers + 1));

    let mut handles = Vec::with_capacity(workers);
    for partition in parts {
        let bitmap = Arc::clone(&bitmap);
        let barrier_start = Arc::clone(&barrier_start);
        let barrier_end = Arc::clone(&barrier_end);
        let handle = thread::Builder::new()
            .name(format!("scan-{:02}", partition.index))
            .spawn(move || {
                barrier_start.wait();
                // A panicking worker must still arrive at the end barrier,
                // which never poisons.
                let trie =
                    panic::catch_unwind(AssertUnwindSafe(|| scan(&bitmap, &partition))).ok();
                barrier_end.wait();
                trie
            })
            // Workers spawned so far stay parked on the start barrier; the
            // error ends the run, and with it the process.
            .map_err(|source| Error::ThreadSpawn {
                index: partition.index,
                source,
            })?;
        handles.push(handle);
    }

    barrier_start.wait();
    let started = Instant::now();
    barrier_end.wait();
    let elapsed = started.elapsed();
    log::info!("scan of {} partitions took {:?}", workers, elapsed);

    let tries = handles
        .into_iter()
        .enumerate()
        .map(|(index, handle)| match handle.join() {
            Ok(Some(trie)) => Ok(trie),
            _ => {
                log::error!("scan worker {} panicked", index);
                Err(Error::WorkerPanicked { index })
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ScanOutcome { tries, elapsed })
}
