//! Binary prefix trie over address bits.
//!
//! A subtree is `Empty` (no members), `Full` (every address in its range is a
//! member) or a `Branch` that owns both halves. Insertion collapses a branch
//! whose halves are both `Full`, so the tree stays proportional to the number
//! of block boundaries rather than the number of addresses, and emission
//! yields the minimal CIDR cover directly.

use super::cidr::{Cidr, MAX_LENGTH};
use crate::error::{Error, Result};

/// Bit consulted at the root.
pub const HIGHEST_BIT: i8 = MAX_LENGTH as i8 - 1;

/// Stop bit for a single host: descend through all 32 bits.
pub const HOST_STOP_BIT: i8 = -1;

#[derive(Debug, Default)]
enum Node {
    #[default]
    Empty,
    Full,
    Branch(Box<[Node; 2]>),
}

impl Node {
    fn is_full(&self) -> bool {
        matches!(self, Node::Full)
    }

    /// Branch nodes in this subtree, itself included.
    fn branch_count(&self) -> usize {
        match self {
            Node::Branch(children) => 1 + children.iter().map(Node::branch_count).sum::<usize>(),
            _ => 0,
        }
    }
}

/// Set of IPv4 addresses stored as a collapsing binary trie.
#[derive(Debug, Default)]
pub struct PrefixTrie {
    root: Node,
    nodes: usize,
}

impl PrefixTrie {
    pub fn new() -> PrefixTrie {
        PrefixTrie::default()
    }

    /// Include every address sharing `addr`'s bits from the root down to
    /// `stop_bit + 1`, i.e. the block of prefix length `31 - stop_bit`.
    ///
    /// `stop_bit` ranges from [`HOST_STOP_BIT`] (one address) to
    /// [`HIGHEST_BIT`] (the whole space).
    pub fn insert(&mut self, addr: u32, stop_bit: i8) {
        debug_assert!((HOST_STOP_BIT..=HIGHEST_BIT).contains(&stop_bit));
        insert_at(&mut self.root, &mut self.nodes, addr, HIGHEST_BIT, stop_bit);
    }

    pub fn insert_host(&mut self, addr: u32) {
        self.insert(addr, HOST_STOP_BIT);
    }

    pub fn insert_cidr(&mut self, cidr: Cidr) {
        self.insert(cidr.base(), HIGHEST_BIT - cidr.prefix() as i8);
    }

    /// Include the half-open range `[start, end)`; same membership as
    /// inserting every host in it.
    pub fn insert_range(&mut self, start: u64, end: u64) {
        for block in Cidr::cover_range(start, end) {
            self.insert_cidr(block);
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.root, Node::Empty)
    }

    /// Live branch nodes; sentinel states are not allocations.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Release every branch and start over empty.
    pub fn clear(&mut self) {
        self.root = Node::Empty;
        self.nodes = 0;
    }

    /// Lazily emit one block per maximal full subtree, in ascending address
    /// order.
    pub fn iter(&self) -> Blocks<'_> {
        Blocks {
            stack: vec![(&self.root, 0, HIGHEST_BIT)],
        }
    }

    /// Collect [`PrefixTrie::iter`].
    pub fn blocks(&self) -> Result<Vec<Cidr>> {
        self.iter().collect()
    }
}

fn insert_at(node: &mut Node, nodes: &mut usize, addr: u32, bit: i8, stop_bit: i8) {
    if node.is_full() {
        return;
    }
    if bit <= stop_bit {
        *nodes -= node.branch_count();
        *node = Node::Full;
        return;
    }
    if matches!(node, Node::Empty) {
        *node = Node::Branch(Box::default());
        *nodes += 1;
    }
    let collapse = match node {
        Node::Branch(children) => {
            let idx = ((addr >> bit) & 1) as usize;
            insert_at(&mut children[idx], nodes, addr, bit - 1, stop_bit);
            children.iter().all(Node::is_full)
        }
        _ => false,
    };
    if collapse {
        *node = Node::Full;
        *nodes -= 1;
    }
}

/// Depth-first block iterator returned by [`PrefixTrie::iter`].
pub struct Blocks<'a> {
    stack: Vec<(&'a Node, u32, i8)>,
}

impl Iterator for Blocks<'_> {
    type Item = Result<Cidr>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, value, bit)) = self.stack.pop() {
            match node {
                Node::Empty => continue,
                Node::Full => {
                    return Some(Ok(Cidr::from_parts(value, (HIGHEST_BIT - bit) as u8)));
                }
                Node::Branch(_) if bit < 0 => {
                    self.stack.clear();
                    return Some(Err(Error::Invariant(format!(
                        "branch below the last address bit at {}",
                        std::net::Ipv4Addr::from(value)
                    ))));
                }
                Node::Branch(children) => {
                    self.stack.push((&children[1], value | (1 << bit), bit - 1));
                    self.stack.push((&children[0], value, bit - 1));
                }
            }
        }
        None
    }
}
