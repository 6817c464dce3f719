//! The CRC-18 layered inside the RS protected payload.
//!
//! A bit-serial Galois LFSR with MSB feedback, clocked once per payload
//! bit. Each word contributes its 18 payload bits least significant bit
//! first; the control flag (bit 18) is not covered by the check.

/// Feedback mask of the CRC polynomial x^18 + x^15 + ... + 1.
pub const CRC_POLY: u32 = 0xBEA7;

/// Initial register value (all ones).
pub const CRC_INIT: u32 = 0x3FFFF;

const REG_MASK: u32 = 0x3FFFF;

/// Run the LFSR over the payloads of `words` and return the 18 bit residue.
pub(crate) fn checksum(words: &[u32]) -> u32 {
    let mut lfsr = CRC_INIT;
    for &word in words {
        for bit in 0..18 {
            let input = (word >> bit) & 1;
            let fb = (lfsr >> 17) & 1;
            lfsr = (lfsr << 1) & REG_MASK;
            lfsr |= input ^ fb;
            if fb == 1 {
                lfsr ^= CRC_POLY;
            }
        }
    }
    lfsr
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_util::Lcg;
    use crate::DATA_WORDS;

    fn random_payloads(rng: &mut Lcg) -> [u32; DATA_WORDS - 1] {
        let mut words = [0u32; DATA_WORDS - 1];
        for w in words.iter_mut() {
            *w = rng.next_u32() & 0x3FFFF;
        }
        words
    }

    #[test]
    fn residue_is_18_bits_and_stable() {
        let mut rng = Lcg::new(7);
        let words = random_payloads(&mut rng);
        let residue = checksum(&words);
        assert!(residue <= REG_MASK);
        assert_eq!(residue, checksum(&words));
    }

    #[test]
    fn control_flag_position_is_ignored() {
        let mut rng = Lcg::new(8);
        let words = random_payloads(&mut rng);
        let mut flagged = words;
        for w in flagged.iter_mut() {
            *w |= 1 << 18;
        }
        assert_eq!(checksum(&words), checksum(&flagged));
    }

    #[test]
    fn every_single_bit_flip_changes_the_residue() {
        let mut rng = Lcg::new(9);
        let words = random_payloads(&mut rng);
        let residue = checksum(&words);
        for n in 0..words.len() {
            for bit in 0..18 {
                let mut flipped = words;
                flipped[n] ^= 1 << bit;
                assert_ne!(
                    residue,
                    checksum(&flipped),
                    "flip of word {} bit {} not detected",
                    n,
                    bit
                );
            }
        }
    }

    #[test]
    fn lfsr_is_affine() {
        // With a fixed initial value the map payload -> residue is affine:
        // crc(a) ^ crc(b) ^ crc(a ^ b) ^ crc(0) = 0.
        let mut rng = Lcg::new(10);
        for _ in 0..20 {
            let a = random_payloads(&mut rng);
            let b = random_payloads(&mut rng);
            let mut xored = [0u32; DATA_WORDS - 1];
            for (x, (p, q)) in xored.iter_mut().zip(a.iter().zip(b.iter())) {
                *x = p ^ q;
            }
            let zero = [0u32; DATA_WORDS - 1];
            assert_eq!(
                checksum(&a) ^ checksum(&b) ^ checksum(&xored) ^ checksum(&zero),
                0
            );
        }
    }
}
