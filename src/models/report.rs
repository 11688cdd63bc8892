//! Summary of one run.

use serde::Serialize;

/// Counts and timing collected while computing a result.
#[derive(Serialize, Debug, Default, Clone, PartialEq)]
pub struct RunReport {
    /// Blocks read from the add list.
    pub add_count: usize,
    /// Blocks read from the subtract list.
    pub subtract_count: usize,
    /// Member addresses after subtraction.
    pub member_addresses: u64,
    /// Worker threads used for the scan.
    pub workers: usize,
    /// Blocks emitted by each partition before the merge.
    pub partition_blocks: Vec<usize>,
    /// Blocks in the final result.
    pub block_count: usize,
    /// Wall-clock time of the parallel scan.
    pub scan_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json() {
        let report = RunReport {
            add_count: 2,
            workers: 4,
            partition_blocks: vec![1, 0, 0, 0],
            block_count: 1,
            ..Default::default()
        };
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["add_count"], 2);
        assert_eq!(json["partition_blocks"], serde_json::json!([1, 0, 0, 0]));
        assert_eq!(json["scan_seconds"], 0.0);
    }
}
