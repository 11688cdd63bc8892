//! Merge of the per-partition results.
//!
//! Each partition's trie is minimal only inside its partition: a block that
//! straddles a partition edge comes out as two or more pieces. Dumping every
//! partition to text and re-inserting the blocks into one fresh trie lets
//! insertion's upward collapse join those pieces, whatever order they arrive
//! in.

use crate::error::Result;
use crate::input::parse_cidr_tokens;
use crate::models::{Cidr, PrefixTrie};
use crate::output::format_blocks;

/// Result of the merge pass.
#[derive(Debug)]
pub struct Aggregate {
    /// Per-partition blocks, one per line, partition order.
    pub partials: String,
    /// Number of blocks each partition emitted.
    pub partition_blocks: Vec<usize>,
    /// Globally minimal blocks, ascending.
    pub blocks: Vec<Cidr>,
}

/// Minimal CIDR text of every partition, in partition order.
pub fn dump_partitions(tries: &[PrefixTrie]) -> Result<(String, Vec<usize>)> {
    let mut text = String::new();
    let mut counts = Vec::with_capacity(tries.len());
    for trie in tries {
        let blocks = trie.blocks()?;
        counts.push(blocks.len());
        text.push_str(&format_blocks(&blocks));
    }
    Ok((text, counts))
}

/// Re-parse a block dump and insert every block into a fresh trie.
pub fn merge_text(text: &str) -> Result<PrefixTrie> {
    let mut trie = PrefixTrie::new();
    for cidr in parse_cidr_tokens(text)? {
        trie.insert_cidr(cidr);
    }
    Ok(trie)
}

pub fn aggregate(tries: &[PrefixTrie]) -> Result<Aggregate> {
    let (partials, partition_blocks) = dump_partitions(tries)?;
    let merged = merge_text(&partials)?;
    let blocks = merged.blocks()?;
    log::info!(
        "merged {} partition blocks into {} blocks",
        partition_blocks.iter().sum::<usize>(),
        blocks.len()
    );
    Ok(Aggregate {
        partials,
        partition_blocks,
        blocks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cidr(s: &str) -> Cidr {
        s.parse().unwrap()
    }

    fn trie_of(blocks: &[&str]) -> PrefixTrie {
        let mut trie = PrefixTrie::new();
        for block in blocks {
            trie.insert_cidr(cidr(block));
        }
        trie
    }

    #[test]
    fn test_dump_partitions() {
        let tries = vec![
            trie_of(&["10.0.0.0/30", "10.0.0.4/30"]),
            PrefixTrie::new(),
            trie_of(&["192.168.0.0/24"]),
        ];
        let (text, counts) = dump_partitions(&tries).unwrap();
        assert_eq!(text, "10.0.0.0/29\n192.168.0.0/24\n");
        assert_eq!(counts, vec![1, 0, 1]);
    }

    #[test]
    fn test_merge_across_partition_edge() {
        // Partitions 0 and 1 of four each hold one half of 0.0.0.0/1.
        let tries = vec![
            trie_of(&["0.0.0.0/2"]),
            trie_of(&["64.0.0.0/2"]),
            PrefixTrie::new(),
            trie_of(&["255.255.255.255/32"]),
        ];
        let merged = aggregate(&tries).unwrap();
        assert_eq!(merged.partials, "0.0.0.0/2\n64.0.0.0/2\n255.255.255.255/32\n");
        assert_eq!(merged.partition_blocks, vec![1, 1, 0, 1]);
        assert_eq!(
            merged.blocks,
            vec![cidr("0.0.0.0/1"), cidr("255.255.255.255/32")]
        );
    }

    #[test]
    fn test_merge_text_any_order() {
        let trie = merge_text("10.0.0.6/31 10.0.0.0/30 10.0.0.4/31").unwrap();
        assert_eq!(trie.blocks().unwrap(), vec![cidr("10.0.0.0/29")]);
        assert!(merge_text("").unwrap().is_empty());
    }

    #[test]
    fn test_merge_is_idempotent() {
        let tries = vec![trie_of(&["10.0.0.0/8", "11.0.0.0/8", "12.0.0.1/32"])];
        let first = aggregate(&tries).unwrap();
        let again = aggregate(&[merge_text(&first.partials).unwrap()]).unwrap();
        assert_eq!(first.blocks, again.blocks);
        assert_eq!(format_blocks(&first.blocks), again.partials);
    }
}
