//! Reading subnet lists.
//!
//! - [`cidr_file`] - Whitespace-separated `A.B.C.D/P` tokens from text or a file

mod cidr_file;

pub use cidr_file::{parse_cidr_tokens, read_cidr_file};
