//! Core data structures.
//!
//! - [`Cidr`] - Canonical IPv4 CIDR block and range arithmetic
//! - [`AddressBitmap`] - One membership bit per IPv4 address
//! - [`PrefixTrie`] - Collapsing binary trie that emits minimal CIDR blocks
//! - [`RunReport`] - Counts and timing of a run

mod bitmap;
mod cidr;
mod report;
mod trie;

// Re-export public types
pub use bitmap::{AddressBitmap, BITMAP_BYTES};
pub use cidr::{prefix_mask, Cidr, ADDRESS_SPACE, MAX_LENGTH};
pub use report::RunReport;
pub use trie::{Blocks, PrefixTrie, HIGHEST_BIT, HOST_STOP_BIT};
