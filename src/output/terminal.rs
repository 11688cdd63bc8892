//! Terminal output.

use crate::models::RunReport;
use colored::Colorize;
use std::path::Path;

/// Left label padded to `width`, value right after it.
fn format_row<T: ToString>(label: &str, value: T, width: usize) -> String {
    format!("{label:<width$}{}", value.to_string())
}

/// Print the run summary to stdout.
pub fn print_summary(report: &RunReport, output: &Path) {
    const WIDTH: usize = 26;
    println!("{}", format_row("Add subnets count", report.add_count, WIDTH));
    println!(
        "{}",
        format_row("Subtract subnets count", report.subtract_count, WIDTH)
    );
    println!(
        "{}",
        format_row("Member addresses", report.member_addresses, WIDTH)
    );
    println!("{}", format_row("Threads", report.workers, WIDTH));
    println!(
        "{}",
        format_row(
            "Time",
            format!("{:.6} s", report.scan_seconds).green(),
            WIDTH
        )
    );
    println!(
        "{}",
        format_row(
            "Partition subnets",
            report.partition_blocks.iter().sum::<usize>(),
            WIDTH
        )
    );
    println!(
        "{} {} -> {}",
        "Result subnets".bold(),
        report.block_count.to_string().bold(),
        output.display().to_string().on_blue()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row_pads_label() {
        assert_eq!(format_row("Threads", 4, 10), "Threads   4");
    }

    #[test]
    fn test_format_row_long_label() {
        assert_eq!(format_row("Subtract subnets", "12", 4), "Subtract subnets12");
    }
}
