//! IPv4 CIDR block value type.
//!
//! Provides [`Cidr`] for representing a canonical `A.B.C.D/P` block, along
//! with the mask and range arithmetic the address map and trie rely on.

use crate::error::{Error, Result};
use regex::Regex;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::OnceLock;

/// Number of bits in an IPv4 address, also the longest prefix.
pub const MAX_LENGTH: u8 = 32;

/// Number of addresses in the whole IPv4 space.
pub const ADDRESS_SPACE: u64 = 1 << MAX_LENGTH;

static CIDR_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_cidr_regex() -> &'static Regex {
    CIDR_REGEX.get_or_init(|| {
        Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})/(\d{1,2})$").expect("Invalid Regex")
    })
}

/// Convert a prefix length to a network mask.
///
/// # Examples
/// ```
/// use subnet_calc::models::prefix_mask;
/// assert_eq!(prefix_mask(0), 0);
/// assert_eq!(prefix_mask(24), 0xFFFFFF00);
/// ```
pub fn prefix_mask(len: u8) -> u32 {
    let right_len = MAX_LENGTH - len.min(MAX_LENGTH);
    let all_bits = u32::MAX as u64;
    ((all_bits >> right_len) << right_len) as u32
}

/// A canonical CIDR block: the base address has every host bit cleared.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Cidr {
    base: u32,
    prefix: u8,
}

impl Cidr {
    /// Build a block from any address inside it, masking the host bits.
    pub fn new(addr: u32, prefix: u8) -> Result<Cidr> {
        if prefix > MAX_LENGTH {
            return Err(Error::InvalidCidr {
                token: format!("{}/{}", Ipv4Addr::from(addr), prefix),
                reason: "prefix length is longer than 32".to_string(),
            });
        }
        Ok(Cidr {
            base: addr & prefix_mask(prefix),
            prefix,
        })
    }

    /// Callers guarantee `prefix <= 32` and a canonical `base`.
    pub(crate) fn from_parts(base: u32, prefix: u8) -> Cidr {
        debug_assert!(prefix <= MAX_LENGTH);
        debug_assert_eq!(base & !prefix_mask(prefix), 0);
        Cidr { base, prefix }
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of addresses covered, `2^(32 - prefix)`.
    pub fn size(&self) -> u64 {
        1u64 << (MAX_LENGTH - self.prefix)
    }

    pub fn first(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.base)
    }

    /// Highest (broadcast) address in the block.
    pub fn last(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.base | !prefix_mask(self.prefix))
    }

    /// One past the last address, as a u64 so `/0` does not overflow.
    pub fn end(&self) -> u64 {
        self.base as u64 + self.size()
    }

    pub fn contains(&self, addr: u32) -> bool {
        addr & prefix_mask(self.prefix) == self.base
    }

    /// Split the half-open range `[start, end)` into the fewest aligned
    /// blocks, in ascending order. `end` may be `2^32`.
    pub fn cover_range(start: u64, end: u64) -> Vec<Cidr> {
        debug_assert!(end <= ADDRESS_SPACE);
        let mut blocks = Vec::new();
        let mut lo = start;
        while lo < end {
            let mut host_bits = if lo == 0 {
                MAX_LENGTH as u32
            } else {
                lo.trailing_zeros().min(MAX_LENGTH as u32)
            };
            while (1u64 << host_bits) > end - lo {
                host_bits -= 1;
            }
            blocks.push(Cidr::from_parts(
                lo as u32,
                MAX_LENGTH - host_bits as u8,
            ));
            lo += 1u64 << host_bits;
        }
        blocks
    }
}

impl FromStr for Cidr {
    type Err = Error;

    /// Parse `A.B.C.D/P`, masking the address down to the block base.
    fn from_str(token: &str) -> Result<Cidr> {
        if !token.contains('/') {
            return Err(Error::MissingPrefix {
                token: token.to_string(),
            });
        }
        let invalid = |reason: &str| Error::InvalidCidr {
            token: token.to_string(),
            reason: reason.to_string(),
        };
        let caps = get_cidr_regex()
            .captures(token)
            .ok_or_else(|| invalid("expected A.B.C.D/P"))?;
        // Octets are plain decimal, so "001" is 1.
        let mut octets = [0u8; 4];
        for (octet, text) in octets.iter_mut().zip(&[&caps[1], &caps[2], &caps[3], &caps[4]]) {
            *octet = text
                .parse()
                .map_err(|_| invalid("address octets must be 0-255"))?;
        }
        let prefix: u8 = caps[5]
            .parse()
            .map_err(|_| invalid("prefix length is not a number"))?;
        if prefix > MAX_LENGTH {
            return Err(invalid("prefix length is longer than 32"));
        }
        Ok(Cidr {
            base: u32::from(Ipv4Addr::from(octets)) & prefix_mask(prefix),
            prefix,
        })
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.first(), self.prefix)
    }
}

impl Serialize for Cidr {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Cidr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cidr::from_str(&s).map_err(de::Error::custom)
    }
}
