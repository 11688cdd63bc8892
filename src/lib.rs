//! Set algebra over the whole IPv4 space.
//!
//! Computes "union of added CIDR blocks minus union of subtracted CIDR
//! blocks" and emits the result as the fewest CIDR blocks:
//! 1. the add and subtract lists are applied to an [`AddressBitmap`] (serial),
//! 2. the bitmap is scanned in equal partitions, one trie per thread,
//! 3. the partition tries are merged into one globally minimal list.

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;
pub mod signals;

use config::Config;
use error::Result;
use models::{AddressBitmap, Cidr, RunReport};
use std::sync::Arc;

/// Result of [`summarize`].
#[derive(Debug)]
pub struct Summary {
    /// Minimal blocks, ascending.
    pub blocks: Vec<Cidr>,
    /// Per-partition blocks before the merge, one per line.
    pub partials: String,
    pub report: RunReport,
}

/// Allocate the address map and apply every add block, then every
/// subtract block, in list order.
pub fn build_bitmap(add: &[Cidr], subtract: &[Cidr]) -> Result<Arc<AddressBitmap>> {
    let mut bitmap = AddressBitmap::allocate()?;
    for cidr in add {
        bitmap.set_range(*cidr);
    }
    for cidr in subtract {
        bitmap.clear_range(*cidr);
    }
    log::info!(
        "applied {} add and {} subtract subnets",
        add.len(),
        subtract.len()
    );
    Ok(Arc::new(bitmap))
}

/// Scan a populated bitmap with `workers` threads and merge the partitions.
pub fn summarize(bitmap: Arc<AddressBitmap>, workers: usize) -> Result<Summary> {
    let member_addresses = bitmap.count_ones();
    let scan = processing::scan_parallel(bitmap, workers)?;
    let merged = processing::aggregate(&scan.tries)?;
    let report = RunReport {
        member_addresses,
        workers,
        partition_blocks: merged.partition_blocks,
        block_count: merged.blocks.len(),
        scan_seconds: scan.elapsed.as_secs_f64(),
        ..Default::default()
    };
    Ok(Summary {
        blocks: merged.blocks,
        partials: merged.partials,
        report,
    })
}

/// Read the subnet lists named by `config`, compute, and write the results.
///
/// Nothing is written unless the whole computation succeeds.
pub fn run(config: &Config) -> Result<RunReport> {
    config.validate()?;
    log::info!("#Start run() threads={}", config.threads);

    let add = input::read_cidr_file(&config.add, "add")?;
    let subtract = match &config.subtract {
        Some(path) => input::read_cidr_file(path, "subtract")?,
        None => Vec::new(),
    };

    let bitmap = build_bitmap(&add, &subtract)?;
    let summary = summarize(bitmap, config.threads)?;
    let report = RunReport {
        add_count: add.len(),
        subtract_count: subtract.len(),
        ..summary.report
    };

    if let Some(path) = &config.partials {
        output::write_text(path, &summary.partials)?;
        log::info!("wrote partition subnets to {}", path.display());
    }
    if let Some(path) = &config.report {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| error::Error::io("can't serialize run report", e.into()))?;
        output::write_text(path, &json)?;
    }
    output::write_blocks(&config.output, &summary.blocks)?;

    log::info!("#End run() result subnets={}", report.block_count);
    Ok(report)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bitmap_lock;

    fn cidrs(list: &[&str]) -> Vec<Cidr> {
        list.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_summarize_subtracts_half() {
        let _guard = bitmap_lock();
        let bitmap =
            build_bitmap(&cidrs(&["192.168.0.0/24"]), &cidrs(&["192.168.0.128/25"])).unwrap();
        let summary = summarize(bitmap, 4).unwrap();
        assert_eq!(summary.blocks, cidrs(&["192.168.0.0/25"]));
        assert_eq!(summary.report.member_addresses, 128);
        assert_eq!(summary.report.partition_blocks, vec![0, 0, 0, 1]);
        assert_eq!(summary.report.block_count, 1);
        assert_eq!(summary.partials, "192.168.0.0/25\n");
    }

    #[test]
    fn test_summarize_empty_result() {
        let _guard = bitmap_lock();
        let bitmap = build_bitmap(&cidrs(&["1.2.3.4/32"]), &cidrs(&["1.2.3.4/32"])).unwrap();
        let summary = summarize(bitmap, 2).unwrap();
        assert!(summary.blocks.is_empty());
        assert_eq!(summary.partials, "");
    }
}
