//! Reed-Solomon forward error correction for a serial link carrying
//! 19 bit tagged words.
//!
//! A block of 121 tagged words (bit 18 is the control flag `is_k`, bits
//! 17..0 the payload) is encoded into 128 protected words: the payload of
//! every word is cut into three 6 bit lanes and each lane, with the
//! control flag folded into bit 6, forms one of three independent
//! RS(127,121) codewords over GF(2^7). Six parity words and a parity
//! expansion word carry the redundancy; an optional CRC-18 is layered
//! inside the protected payload. Each slice corrects up to three symbol
//! errors, and a block with one failing slice still recovers the lanes of
//! the other two.
//!
//! # Example
//!
//! ```
//! let mut words = vec![0u32; linkfec::DATA_WORDS];
//! words[0] = 0x2ABCD;
//!
//! let mut block = linkfec::encode(&words, false);
//! block[9] ^= 0x15; // a symbol error in lane C of word 9
//!
//! let decoded = linkfec::decode(&block, false);
//! assert_eq!(decoded.words, words);
//! assert_eq!(decoded.status.corrected_errors, 1);
//! assert!(!decoded.status.uncorrectable);
//! ```
//!
//! The per-slice codec is available in [`errorcode`] for callers that
//! drive the 127 symbol codewords directly.
#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod block;
mod crc;
mod slices;
#[cfg(test)]
mod test_util;

pub mod errorcode;

pub use block::{decode, encode, DecodeOutput, DecodeStatus};
pub use crc::{CRC_INIT, CRC_POLY};

/// 8 bit feedback constant of the field polynomial x^7 + x^3 + 1.
pub const GF_POLY: u8 = 0x89;

/// Tagged words per unprotected block.
pub const DATA_WORDS: usize = 121;

/// Words per protected block.
pub const BLOCK_WORDS: usize = 128;
