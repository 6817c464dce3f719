//! Block level encoding and decoding of 19 bit tagged words.
//!
//! A block takes 121 tagged words (bit 18 is the control flag `is_k`, bits
//! 17..0 the payload) and protects them with three RS(127,121) slices plus
//! an optional CRC-18 inside the payload, producing 128 words on the wire.
//! Decoding reverses the mapping, corrects up to three symbol errors per
//! slice and reports what happened in a [`DecodeStatus`].
use alloc::vec::Vec;

use crate::errorcode;
use crate::slices::{self, PAYLOAD_MASK};
use crate::{crc, BLOCK_WORDS, DATA_WORDS};

/// Outcome flags of one block decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStatus {
    /// Symbols corrected, summed over the three slices.
    pub corrected_errors: u8,
    /// At least one slice had more errors than the code can correct and
    /// was passed through as received. The other slices still correct, so
    /// two thirds of the payload bits may survive such a block.
    pub uncorrectable: bool,
    /// Result of the CRC-18 check; `true` when the check is disabled.
    pub crc_pass: bool,
}

/// A decoded block: the recovered tagged words and the status flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOutput {
    /// The decoded tagged words: 120 with the CRC check enabled (the CRC
    /// word is consumed by the check), 121 otherwise.
    pub words: Vec<u32>,
    pub status: DecodeStatus,
}

impl DecodeOutput {
    /// The decoded payload as a bit vector, least significant bit first
    /// within each 19 bit word.
    pub fn bits(&self) -> Vec<bool> {
        let mut bits = Vec::with_capacity(self.words.len() * 19);
        for &word in &self.words {
            for i in 0..19 {
                bits.push(word >> i & 1 == 1);
            }
        }
        bits
    }
}

/// Encode 121 tagged words into a 128 word protected block.
///
/// With `crc_enable` only the first 120 words are user data: word 120's
/// payload is replaced by the CRC-18 of words 0..=119 and its control flag
/// is cleared.
///
/// # Panics
///
/// If `words` does not hold exactly 121 words or a word has bits above
/// bit 18 set.
pub fn encode(words: &[u32], crc_enable: bool) -> Vec<u32> {
    assert_eq!(words.len(), DATA_WORDS, "a block encodes exactly 121 words");
    assert!(
        words.iter().all(|w| w >> 19 == 0),
        "tagged words are 19 bit values"
    );

    let mut words = words.to_vec();
    if crc_enable {
        // the residue is 18 bits, so the control flag ends up 0
        words[DATA_WORDS - 1] = crc::checksum(&words[..DATA_WORDS - 1]);
    }

    let data = slices::split_words(&words);
    let parity = [
        errorcode::encode_slice(&data[0]),
        errorcode::encode_slice(&data[1]),
        errorcode::encode_slice(&data[2]),
    ];
    slices::pack_block(&words, &parity)
}

/// Decode a received 128 word block.
///
/// Decoding never fails: slices with more errors than the code can correct
/// are passed through as received and flagged in the status, so the intact
/// lanes of the block are still recovered.
///
/// With `crc_enable` the CRC-18 is recomputed over the decoded words
/// 0..=119 and compared against the received CRC word; the CRC word is
/// dropped from the output.
///
/// # Panics
///
/// If `block` does not hold exactly 128 words.
pub fn decode(block: &[u32], crc_enable: bool) -> DecodeOutput {
    assert_eq!(block.len(), BLOCK_WORDS, "a block holds exactly 128 words");

    let mut received = slices::unpack_block(block);
    let mut corrected_errors = 0u8;
    let mut uncorrectable = false;
    for codeword in received.iter_mut() {
        match errorcode::decode_slice(codeword) {
            Ok(n) => corrected_errors += n as u8,
            Err(_) => uncorrectable = true,
        }
    }

    let mut words = slices::rebuild_words(&received);
    let crc_pass = !crc_enable
        || crc::checksum(&words[..DATA_WORDS - 1]) == block[DATA_WORDS - 1] & PAYLOAD_MASK;
    if crc_enable {
        words.pop();
    }

    DecodeOutput {
        words,
        status: DecodeStatus {
            corrected_errors,
            uncorrectable,
            crc_pass,
        },
    }
}
