//! Mapping between 19 bit tagged words and the three RS lane slices.
//!
//! Every tagged word is cut into three 6 bit lanes, A covering payload
//! bits 17..12, B bits 11..6 and C bits 5..0. The 7 bit RS symbol of a
//! lane is the lane value with the word's control flag in bit 6, so all
//! three slices protect the flag redundantly.
//!
//! The six parity symbols of each slice are 7 bit values as well, but the
//! parity words of a block only have room for the three 6 bit lanes. The
//! missing bit 6 of the 18 parity symbols is collected in the final word of
//! the block, the parity expansion word: bit 3*i + lane holds bit 6 of
//! parity symbol i of that lane.
use alloc::vec::Vec;

use crate::errorcode::{CODEWORD_LEN, DATA_LEN, PARITY_LEN};
use crate::{BLOCK_WORDS, DATA_WORDS};

/// Payload bits of a tagged word.
pub(crate) const PAYLOAD_MASK: u32 = 0x3FFFF;

const LANE_MASK: u32 = 0x3F;

/// Shift that moves a word's lane to the low bits, indexed A, B, C.
const LANE_SHIFT: [u32; 3] = [12, 6, 0];

fn lane_symbol(word: u32, lane: usize) -> u8 {
    let is_k = ((word >> 18) & 1) as u8;
    ((word >> LANE_SHIFT[lane]) & LANE_MASK) as u8 | (is_k << 6)
}

/// Cut 121 tagged words into the three slices' data symbols.
pub(crate) fn split_words(words: &[u32]) -> [[u8; DATA_LEN]; 3] {
    debug_assert_eq!(words.len(), DATA_WORDS);
    let mut data = [[0u8; DATA_LEN]; 3];
    for (n, &word) in words.iter().enumerate() {
        for (lane, slice) in data.iter_mut().enumerate() {
            slice[n] = lane_symbol(word, lane);
        }
    }
    data
}

/// Assemble the 128 word block from the tagged words and the three slices'
/// parity symbols.
pub(crate) fn pack_block(words: &[u32], parity: &[[u8; PARITY_LEN]; 3]) -> Vec<u32> {
    debug_assert_eq!(words.len(), DATA_WORDS);
    let mut block = Vec::with_capacity(BLOCK_WORDS);
    block.extend(words.iter().map(|w| w & (1 << 18 | PAYLOAD_MASK)));

    // parity words: the three 6 bit lanes packed A:B:C, control flag 0
    for i in 0..PARITY_LEN {
        let mut word = 0u32;
        for (lane, p) in parity.iter().enumerate() {
            word |= (u32::from(p[i]) & LANE_MASK) << LANE_SHIFT[lane];
        }
        block.push(word);
    }

    // parity expansion word: bit 6 of parity symbol i of each lane lands in
    // bit 3*i + lane
    let mut expansion = 0u32;
    for i in 0..PARITY_LEN {
        for (lane, p) in parity.iter().enumerate() {
            expansion |= u32::from(p[i] >> 6 & 1) << (3 * i + lane);
        }
    }
    block.push(expansion);

    block
}

/// Reconstruct the three received 127 symbol slices of a block, restoring
/// bit 6 of every parity symbol from the expansion word.
pub(crate) fn unpack_block(block: &[u32]) -> [[u8; CODEWORD_LEN]; 3] {
    debug_assert_eq!(block.len(), BLOCK_WORDS);
    let mut slices = [[0u8; CODEWORD_LEN]; 3];
    for (n, &word) in block[..DATA_WORDS].iter().enumerate() {
        for (lane, slice) in slices.iter_mut().enumerate() {
            slice[n] = lane_symbol(word, lane);
        }
    }

    let expansion = block[BLOCK_WORDS - 1];
    for i in 0..PARITY_LEN {
        let word = block[DATA_WORDS + i];
        for (lane, slice) in slices.iter_mut().enumerate() {
            let msb = (expansion >> (3 * i + lane) & 1) as u8;
            slice[DATA_LEN + i] = ((word >> LANE_SHIFT[lane]) & LANE_MASK) as u8 | (msb << 6);
        }
    }

    slices
}

/// Rebuild the 121 tagged words from the (corrected) slices. All three
/// slices carry the control flag in bit 6 by construction; slice A is
/// taken as canonical.
pub(crate) fn rebuild_words(slices: &[[u8; CODEWORD_LEN]; 3]) -> Vec<u32> {
    let mut words = Vec::with_capacity(DATA_WORDS);
    for n in 0..DATA_WORDS {
        let is_k = u32::from(slices[0][n] >> 6 & 1);
        let mut word = is_k << 18;
        for (lane, slice) in slices.iter().enumerate() {
            word |= (u32::from(slice[n]) & LANE_MASK) << LANE_SHIFT[lane];
        }
        words.push(word);
    }
    words
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_util::Lcg;

    #[test]
    fn split_covers_all_payload_bits() {
        let word = 0x6ABCD; // is_k = 1, payload 0x2ABCD
        let [a, b, c] = split_words(&{
            let mut words = [0u32; DATA_WORDS];
            words[7] = word;
            words
        });
        assert_eq!(a[7], 0x40 | 0x2A);
        assert_eq!(b[7], 0x40 | 0x2F);
        assert_eq!(c[7], 0x40 | 0x0D);
        // all other words are zero with is_k = 0
        assert_eq!(a[0], 0);
        assert_eq!(b[120], 0);
    }

    #[test]
    fn pack_unpack_roundtrip() {
        let mut rng = Lcg::new(0xA5A5_0000_1111_2222);
        let mut words = [0u32; DATA_WORDS];
        for w in words.iter_mut() {
            *w = rng.next_u32() & 0x7FFFF;
        }
        // synthetic parity with a mix of set and clear symbol MSBs
        let mut parity = [[0u8; PARITY_LEN]; 3];
        for p in parity.iter_mut() {
            for s in p.iter_mut() {
                *s = rng.next_below(128) as u8;
            }
        }

        let block = pack_block(&words, &parity);
        assert_eq!(block.len(), BLOCK_WORDS);
        let slices = unpack_block(&block);

        let data = split_words(&words);
        for lane in 0..3 {
            assert_eq!(slices[lane][..DATA_LEN], data[lane]);
            assert_eq!(slices[lane][DATA_LEN..], parity[lane]);
        }

        assert_eq!(rebuild_words(&slices), words);
    }

    #[test]
    fn expansion_word_layout() {
        let words = [0u32; DATA_WORDS];
        let mut parity = [[0u8; PARITY_LEN]; 3];
        // set bit 6 of A parity 0, B parity 2, C parity 5
        parity[0][0] = 0x40;
        parity[1][2] = 0x40 | 0x15;
        parity[2][5] = 0x40;

        let block = pack_block(&words, &parity);
        let expansion = block[BLOCK_WORDS - 1];
        assert_eq!(expansion, 1 << 0 | 1 << (3 * 2 + 1) | 1 << (3 * 5 + 2));

        // the 6 bit lanes of the parity words do not contain the MSB
        assert_eq!(block[DATA_WORDS], 0);
        assert_eq!(block[DATA_WORDS + 2], 0x15 << 6);
        assert_eq!(block[DATA_WORDS + 5], 0);
    }

    #[test]
    fn parity_words_have_flag_clear() {
        let mut words = [0x7FFFF_u32; DATA_WORDS];
        words[3] = 0x123;
        let parity = [[0x7F; PARITY_LEN]; 3];
        let block = pack_block(&words, &parity);
        for &word in &block[DATA_WORDS..] {
            assert_eq!(word >> 18, 0);
        }
    }
}
