//! Subnet list files: whitespace-separated `A.B.C.D/P` tokens.

use crate::error::{Error, Result};
use crate::models::Cidr;
use std::path::Path;

/// Parse every token of `text` in order, stopping at the first bad one.
pub fn parse_cidr_tokens(text: &str) -> Result<Vec<Cidr>> {
    text.split_whitespace()
        .map(|token| {
            log::trace!("token {token}");
            token.parse::<Cidr>()
        })
        .collect()
}

/// Read and parse a subnet list file.
///
/// # Arguments
/// * `path` - The file to read
/// * `label` - What the list is for ("add", "subtract"), used in messages
pub fn read_cidr_file(path: &Path, label: &str) -> Result<Vec<Cidr>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::io(
            format!("can't open {label} subnets file {}", path.display()),
            e,
        )
    })?;
    let cidrs = parse_cidr_tokens(&text)?;
    log::info!(
        "{label} subnets count {} from {}",
        cidrs.len(),
        path.display()
    );
    Ok(cidrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_tokens_any_whitespace() {
        let cidrs = parse_cidr_tokens("10.0.0.0/8 192.168.1.1/24\n\n\t172.16.0.0/12\r\n").unwrap();
        let text: Vec<String> = cidrs.iter().map(|c| c.to_string()).collect();
        assert_eq!(text, vec!["10.0.0.0/8", "192.168.1.0/24", "172.16.0.0/12"]);
        assert!(parse_cidr_tokens("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_tokens_rejects_missing_prefix() {
        let err = parse_cidr_tokens("10.0.0.0/8\n10.1.0.0\n").unwrap_err();
        assert!(matches!(err, Error::MissingPrefix { token } if token == "10.1.0.0"));
    }

    #[test]
    fn test_parse_tokens_rejects_garbage_address() {
        let err = parse_cidr_tokens("300.0.0.0/8").unwrap_err();
        assert!(matches!(err, Error::InvalidCidr { .. }));
    }

    #[test]
    fn test_read_cidr_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1.2.3.4/32").unwrap();
        writeln!(file, "10.0.0.0/30 10.0.0.4/30").unwrap();
        let cidrs = read_cidr_file(file.path(), "add").unwrap();
        assert_eq!(cidrs.len(), 3);
        assert_eq!(cidrs[0].to_string(), "1.2.3.4/32");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_cidr_file(&dir.path().join("absent.txt"), "subtract").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().starts_with("can't open subtract subnets file"));
    }
}
