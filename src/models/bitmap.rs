//! One bit per IPv4 address.

use super::cidr::{Cidr, ADDRESS_SPACE};
use crate::error::{Error, Result};

const WORD_BITS: u64 = u64::BITS as u64;
const WORDS: usize = (ADDRESS_SPACE / WORD_BITS) as usize;

/// Bytes held by a fully allocated map (512 MiB).
pub const BITMAP_BYTES: usize = WORDS * std::mem::size_of::<u64>();

/// Membership table for the entire IPv4 space.
///
/// Address `a` lives in word `a / 64`, bit `a % 64`. The map is sized once by
/// [`AddressBitmap::allocate`] and never resized; it is written during the
/// serial add/subtract phase and only read afterwards.
pub struct AddressBitmap {
    words: Vec<u64>,
}

/// Mask with bits `lo..=hi` set.
fn range_mask(lo: u64, hi: u64) -> u64 {
    (u64::MAX >> (WORD_BITS - 1 - hi)) & (u64::MAX << lo)
}

impl AddressBitmap {
    /// Reserve and zero 2^32 bits.
    pub fn allocate() -> Result<AddressBitmap> {
        let mut words = Vec::new();
        words
            .try_reserve_exact(WORDS)
            .map_err(|_| Error::OutOfMemory {
                bytes: BITMAP_BYTES,
            })?;
        words.resize(WORDS, 0);
        log::debug!("allocated address bitmap of {} bytes", BITMAP_BYTES);
        Ok(AddressBitmap { words })
    }

    /// Mark every address of `cidr` as a member.
    pub fn set_range(&mut self, cidr: Cidr) {
        self.fill(cidr.base() as u64, cidr.end(), true);
    }

    /// Remove every address of `cidr`; absent addresses stay absent.
    pub fn clear_range(&mut self, cidr: Cidr) {
        self.fill(cidr.base() as u64, cidr.end(), false);
    }

    fn fill(&mut self, start: u64, end: u64, value: bool) {
        if start >= end {
            return;
        }
        let first_word = (start / WORD_BITS) as usize;
        let last_word = ((end - 1) / WORD_BITS) as usize;
        let head = start % WORD_BITS;
        let tail = (end - 1) % WORD_BITS;

        let apply = |word: &mut u64, mask: u64| {
            if value {
                *word |= mask;
            } else {
                *word &= !mask;
            }
        };

        if first_word == last_word {
            apply(&mut self.words[first_word], range_mask(head, tail));
            return;
        }
        apply(&mut self.words[first_word], range_mask(head, WORD_BITS - 1));
        let fill = if value { u64::MAX } else { 0 };
        self.words[first_word + 1..last_word].fill(fill);
        apply(&mut self.words[last_word], range_mask(0, tail));
    }

    pub fn get(&self, addr: u32) -> bool {
        let addr = addr as u64;
        (self.words[(addr / WORD_BITS) as usize] >> (addr % WORD_BITS)) & 1 == 1
    }

    /// Number of member addresses.
    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// First member address in `[from, end)`.
    pub fn next_set(&self, from: u64, end: u64) -> Option<u64> {
        let mut pos = from;
        while pos < end {
            let word_idx = (pos / WORD_BITS) as usize;
            let bits = self.words[word_idx] >> (pos % WORD_BITS);
            if bits != 0 {
                let found = pos + bits.trailing_zeros() as u64;
                return (found < end).then_some(found);
            }
            pos = (word_idx as u64 + 1) * WORD_BITS;
        }
        None
    }

    /// First non-member address in `[from, end)`, or `end` if there is none.
    pub fn next_clear(&self, from: u64, end: u64) -> u64 {
        let mut pos = from;
        while pos < end {
            let word_idx = (pos / WORD_BITS) as usize;
            let bits = !self.words[word_idx] >> (pos % WORD_BITS);
            if bits != 0 {
                return (pos + bits.trailing_zeros() as u64).min(end);
            }
            pos = (word_idx as u64 + 1) * WORD_BITS;
        }
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bitmap_lock;

    fn cidr(s: &str) -> Cidr {
        s.parse().unwrap()
    }

    #[test]
    fn test_range_mask() {
        assert_eq!(range_mask(0, 63), u64::MAX);
        assert_eq!(range_mask(0, 0), 1);
        assert_eq!(range_mask(63, 63), 1 << 63);
        assert_eq!(range_mask(4, 7), 0xF0);
    }

    #[test]
    fn test_set_clear_get() {
        let _guard = bitmap_lock();
        let mut bitmap = AddressBitmap::allocate().expect("bitmap allocation");
        assert_eq!(bitmap.count_ones(), 0);

        bitmap.set_range(cidr("10.0.0.0/24"));
        assert_eq!(bitmap.count_ones(), 256);
        assert!(bitmap.get(0x0A00_0000));
        assert!(bitmap.get(0x0A00_00FF));
        assert!(!bitmap.get(0x0A00_0100));
        assert!(!bitmap.get(0x09FF_FFFF));

        bitmap.clear_range(cidr("10.0.0.128/25"));
        assert_eq!(bitmap.count_ones(), 128);
        assert!(bitmap.get(0x0A00_007F));
        assert!(!bitmap.get(0x0A00_0080));

        // Clearing something absent is a no-op.
        bitmap.clear_range(cidr("192.168.0.0/16"));
        assert_eq!(bitmap.count_ones(), 128);

        // Unaligned to words: a /30 and a single host.
        bitmap.set_range(cidr("1.2.3.4/30"));
        bitmap.set_range(cidr("255.255.255.255/32"));
        assert_eq!(bitmap.count_ones(), 133);
        assert!(bitmap.get(u32::MAX));
    }

    #[test]
    fn test_whole_space() {
        let _guard = bitmap_lock();
        let mut bitmap = AddressBitmap::allocate().expect("bitmap allocation");
        bitmap.set_range(cidr("0.0.0.0/0"));
        assert_eq!(bitmap.count_ones(), ADDRESS_SPACE);
        assert!(bitmap.get(0));
        assert!(bitmap.get(u32::MAX));

        bitmap.clear_range(cidr("10.0.0.0/8"));
        assert_eq!(bitmap.count_ones(), ADDRESS_SPACE - (1 << 24));
        assert_eq!(bitmap.next_clear(0, ADDRESS_SPACE), 0x0A00_0000);
        assert_eq!(
            bitmap.next_set(0x0A00_0000, ADDRESS_SPACE),
            Some(0x0B00_0000)
        );

        bitmap.clear_range(cidr("0.0.0.0/0"));
        assert_eq!(bitmap.count_ones(), 0);
    }

    #[test]
    fn test_next_set_and_clear() {
        let _guard = bitmap_lock();
        let mut bitmap = AddressBitmap::allocate().expect("bitmap allocation");
        bitmap.set_range(cidr("0.0.0.60/30"));
        bitmap.set_range(cidr("0.0.0.64/27"));

        assert_eq!(bitmap.next_set(0, 1000), Some(60));
        assert_eq!(bitmap.next_clear(60, 1000), 96);
        assert_eq!(bitmap.next_set(96, 1000), None);
        // Search window ends before the member.
        assert_eq!(bitmap.next_set(0, 60), None);
        // Run truncated by the window end.
        assert_eq!(bitmap.next_clear(62, 70), 70);
        assert_eq!(bitmap.next_clear(0, 1000), 0);
    }
}
