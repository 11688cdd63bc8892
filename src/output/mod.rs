//! Writing results.
//!
//! - [`result_file`] - The resulting subnet list, one block per line
//! - [`terminal`] - Coloured run summary

mod result_file;
mod terminal;

pub use result_file::{format_blocks, write_blocks, write_text};
pub use terminal::print_summary;
