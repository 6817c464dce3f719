//! Reed-Solomon error correction for the link codec.
//!
//! Every protected block carries three independent RS(127,121) codewords
//! over GF(2^7), one per 6-bit lane of the 18-bit payload (plus the shared
//! control flag folded into bit 6 of every symbol, see the `slices`
//! module). Each codeword can correct up to three symbol errors.
//!
//! Encoding is the classic systematic form: the 121 data symbols are kept
//! verbatim and six parity symbols are appended so that the codeword
//! polynomial is divisible by the generator polynomial g(x).
//!
//! The decoder implemented in this module is _syndrome_ based. Such a
//! decoder is classically made of four main steps:
//!
//! 1. Compute the syndrome values.
//! 2. Compute the error locator polynomial.
//! 3. Compute the error locations.
//! 4. Compute the error values.
//!
//! We use an inversionless Berlekamp-Massey algorithm in the second step
//! (no GF divisions, only a running scale factor), a Chien search in the
//! third and Forney's formula in the fourth. See the `decoding` module.
mod decoding;
mod galois;

pub use decoding::decode as decode_slice;
pub use decoding::DecodingError;
pub use galois::GF;

#[cfg(test)]
use pretty_assertions::assert_eq;

/// Number of data symbols per slice.
pub const DATA_LEN: usize = 121;

/// Number of parity symbols per slice.
pub const PARITY_LEN: usize = 6;

/// Symbols per codeword.
pub const CODEWORD_LEN: usize = DATA_LEN + PARITY_LEN;

/// The coefficients g_0..g_5 of the generator polynomial
///
///    g(x) = (x + a^1)(x + a^2)(x + a^3)(x + a^4)(x + a^5)(x + a^6)
///
/// expanded over GF(2^7). The leading coefficient g_6 = 1 is implicit.
///
/// The coefficients are given in the link standard; `compute_generator`
/// rebuilds them from the field tables and a mismatch is rejected at
/// compile time below.
pub const GENERATOR_POLYNOMIAL: [u8; PARITY_LEN] = [0x6D, 0x22, 0x64, 0x44, 0x40, 0x7E];

/// Expand g(x) by multiplying (x + a^i) for i = 1..=6.
const fn compute_generator() -> [u8; PARITY_LEN] {
    let mut g = [0u8; PARITY_LEN + 1];
    g[0] = 1;
    let mut g_len = 1;
    let mut i = 0u8;
    while i < PARITY_LEN as u8 {
        // root = a^(i+1), computed without the tables' public API since we
        // are in a const context: a^(i+1) = a^i * a.
        let mut root = 1u8;
        let mut k = 0;
        while k <= i {
            root = galois::mul_const(root, 2);
            k += 1;
        }

        // g = g * (x + root)
        let mut next = [0u8; PARITY_LEN + 1];
        let mut j = 0;
        while j < g_len {
            next[j + 1] ^= g[j];
            next[j] ^= galois::mul_const(g[j], root);
            j += 1;
        }
        g = next;
        g_len += 1;

        i += 1;
    }

    let mut out = [0u8; PARITY_LEN];
    let mut j = 0;
    while j < PARITY_LEN {
        out[j] = g[j];
        j += 1;
    }
    out
}

// A mismatch between the field tables and the published generator
// coefficients is a fatal configuration error, rejected at compile time.
const _: () = {
    let computed = compute_generator();
    let mut i = 0;
    while i < PARITY_LEN {
        assert!(
            computed[i] == GENERATOR_POLYNOMIAL[i],
            "generator polynomial does not match the published coefficients"
        );
        i += 1;
    }
};

/// Compute the six parity symbols for one slice.
///
/// Systematic encoding with the standard Galois LFSR dividing by g(x):
/// six state registers, `s[5]` holding the highest remainder coefficient.
/// The data symbols enter highest degree first, i.e. `data[120]` is the
/// first symbol of the polynomial division (the codeword polynomial places
/// `data[i]` at degree `6 + i`, see the `decoding` module).
///
/// The encoded slice is `[data[0..121], parity[0..6]]`.
pub fn encode_slice(data: &[u8; DATA_LEN]) -> [u8; PARITY_LEN] {
    let g = GENERATOR_POLYNOMIAL.map(GF);
    let mut s = [GF(0); PARITY_LEN];
    for &d in data.iter().rev() {
        let fb = GF(d) + s[PARITY_LEN - 1];
        for j in (1..PARITY_LEN).rev() {
            s[j] = s[j - 1] + fb * g[j];
        }
        s[0] = fb * g[0];
    }
    s.map(u8::from)
}

#[test]
fn generator_matches_published_coefficients() {
    assert_eq!(compute_generator(), GENERATOR_POLYNOMIAL);
}

#[test]
fn generator_roots() {
    // g(a^i) = 0 for i = 1..=6, g(a^0) != 0.
    for i in 0..=6u8 {
        let x = GF::primitive_power(i);
        let mut acc = GF(1); // implicit leading coefficient
        for &c in GENERATOR_POLYNOMIAL.iter().rev() {
            acc = acc * x + GF(c);
        }
        if i == 0 {
            assert_ne!(acc, GF(0));
        } else {
            assert_eq!(acc, GF(0), "a^{} should be a root", i);
        }
    }
}

#[test]
fn encode_zero_data() {
    let parity = encode_slice(&[0; DATA_LEN]);
    assert_eq!(parity, [0; PARITY_LEN]);
}

#[test]
fn encode_is_systematic_with_zero_syndromes() {
    let mut data = [0u8; DATA_LEN];
    for (i, d) in data.iter_mut().enumerate() {
        *d = (i * 37 % 128) as u8;
    }
    let parity = encode_slice(&data);

    let mut codeword = [0u8; CODEWORD_LEN];
    codeword[..DATA_LEN].copy_from_slice(&data);
    codeword[DATA_LEN..].copy_from_slice(&parity);

    assert_eq!(decoding::syndromes(&codeword), [GF(0); PARITY_LEN]);
}

#[test]
fn lfsr_matches_schoolbook_division() {
    // The parity is the remainder of D(x) * x^6 modulo g(x), with data[i]
    // at degree 6 + i. Redo the division the long way and compare.
    let mut data = [0u8; DATA_LEN];
    for (i, d) in data.iter_mut().enumerate() {
        *d = ((i * 89 + 7) % 128) as u8;
    }

    let mut coeffs = [GF(0); CODEWORD_LEN];
    for (i, &d) in data.iter().enumerate() {
        coeffs[PARITY_LEN + i] = GF(d);
    }
    for deg in (PARITY_LEN..CODEWORD_LEN).rev() {
        let q = coeffs[deg];
        if q == GF(0) {
            continue;
        }
        coeffs[deg] = GF(0); // q times the implicit leading coefficient
        for (j, &g) in GENERATOR_POLYNOMIAL.iter().enumerate() {
            coeffs[deg - PARITY_LEN + j] += q * GF(g);
        }
    }

    let remainder: [u8; PARITY_LEN] = core::array::from_fn(|i| coeffs[i].into());
    assert_eq!(encode_slice(&data), remainder);
}

#[test]
fn single_symbol_data_hits_every_parity_register() {
    // data[0] sits at degree 6, so its remainder modulo the monic degree-6
    // g(x) is g(x) minus the leading term: the parity equals g_0..g_5.
    let mut data = [0u8; DATA_LEN];
    data[0] = 1;
    let parity = encode_slice(&data);
    assert_eq!(parity, GENERATOR_POLYNOMIAL);
}
