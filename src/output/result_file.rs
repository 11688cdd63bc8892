//! Subnet list output, in the same `A.B.C.D/P` form as the inputs.

use crate::error::{Error, Result};
use crate::models::Cidr;
use itertools::Itertools;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One block per line, each line newline-terminated.
pub fn format_blocks(blocks: &[Cidr]) -> String {
    if blocks.is_empty() {
        return String::new();
    }
    format!("{}\n", blocks.iter().join("\n"))
}

/// Write `blocks` to `path`, replacing any existing file.
pub fn write_blocks(path: &Path, blocks: &[Cidr]) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| Error::io(format!("can't open {} for writing", path.display()), e))?;
    let mut writer = BufWriter::new(file);
    for block in blocks {
        writeln!(writer, "{block}")
            .map_err(|e| Error::io(format!("can't write {}", path.display()), e))?;
    }
    writer
        .flush()
        .map_err(|e| Error::io(format!("can't write {}", path.display()), e))?;
    log::info!("wrote {} blocks to {}", blocks.len(), path.display());
    Ok(())
}

/// Write already formatted text to `path`.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)
        .map_err(|e| Error::io(format!("can't write {}", path.display()), e))
}
