//! The two computation phases.
//!
//! - [`scanner`] - Parallel scan of the address bitmap, one trie per partition
//! - [`aggregator`] - Serial merge of the partition tries into the minimal result

mod aggregator;
mod scanner;

// Re-export public functions
pub use aggregator::{aggregate, dump_partitions, merge_text, Aggregate};
pub use scanner::{partitions, scan_parallel, scan_partition, Partition, ScanOutcome};
