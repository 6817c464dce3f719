//! The per-slice decoding pipeline: syndromes, inversionless
//! Berlekamp-Massey, Chien search, Forney magnitudes, correction.
use arrayvec::ArrayVec;

use super::{chien_search, derivative, error_evaluator, eval, syndromes, DecodingError};
use crate::errorcode::galois::GF;
use crate::errorcode::{CODEWORD_LEN, DATA_LEN, PARITY_LEN};

/// Correctable symbol errors per slice.
const T: usize = PARITY_LEN / 2;

/// Decode one received slice in place.
///
/// Returns the number of corrected symbols. On [`DecodingError`] the slice
/// is left exactly as received so that the caller can still salvage the
/// other lanes of the block.
pub fn decode(codeword: &mut [u8; CODEWORD_LEN]) -> Result<usize, DecodingError> {
    let synd = syndromes(codeword);
    if synd.iter().all(|s| *s == GF(0)) {
        return Ok(0);
    }

    let (sigma, deg) = error_locator(&synd);
    if deg > T {
        return Err(DecodingError::TooManyErrors);
    }
    if deg == 0 {
        // Non-zero syndromes but a constant locator: the errors are outside
        // anything the locator can describe.
        return Err(DecodingError::Malfunction);
    }
    let sigma = &sigma[..=deg];

    // A locator of degree v must split into exactly v roots, otherwise the
    // error pattern exceeded the capacity and sigma is meaningless. This
    // cross-check is the main defense against miscorrection.
    let roots = chien_search(sigma);
    if roots.len() != deg {
        return Err(DecodingError::Malfunction);
    }

    let omega = error_evaluator(&synd, sigma);
    let sigma_deriv = derivative(sigma);

    // Forney: e_j = omega(x^-j) / sigma'(x^-j). The corrections are staged
    // so that a failing slice is returned untouched.
    let mut fixes: ArrayVec<(usize, u8), T> = ArrayVec::new();
    for &j in &roots {
        let x_inv = GF::primitive_power_neg(j);
        let num = eval(&omega, x_inv);
        let den = eval(&sigma_deriv, x_inv);
        if den == GF(0) {
            return Err(DecodingError::Malfunction);
        }
        fixes.push((degree_to_index(j), (num / den).into()));
    }

    let mut corrected = *codeword;
    for &(idx, e) in &fixes {
        corrected[idx] ^= e;
    }
    if syndromes(&corrected) != [GF(0); PARITY_LEN] {
        return Err(DecodingError::Malfunction);
    }
    *codeword = corrected;

    Ok(roots.len())
}

/// Map an error degree emitted by the Chien search back into the
/// `[data, parity]` slice layout: data occupies degrees 6..=126 (`data[i]`
/// at degree `6 + i`), parity degrees 0..=5.
fn degree_to_index(degree: u8) -> usize {
    let degree = degree as usize;
    if degree >= PARITY_LEN {
        degree - PARITY_LEN
    } else {
        DATA_LEN + degree
    }
}

/// The inversionless Berlekamp-Massey algorithm.
///
/// Instead of dividing by the previous discrepancy, the connection
/// polynomial is rescaled with a running factor, so the loop needs no GF
/// inversions. The result is the error locator up to a non-zero scalar,
/// which cancels in Forney's quotient.
///
/// Returns the locator coefficients (ascending) and its degree.
fn error_locator(synd: &[GF; PARITY_LEN]) -> ([GF; PARITY_LEN + 1], usize) {
    let mut c = [GF(0); PARITY_LEN + 1]; // connection polynomial
    let mut b = [GF(0); PARITY_LEN + 1]; // previous connection polynomial
    c[0] = GF(1);
    b[0] = GF(1);
    let mut l = 0; // current register length
    let mut gamma = GF(1); // discrepancy scale

    for k in 0..2 * T {
        // discrepancy of the next predicted syndrome, synd[i] holds S_{i+1}
        let mut delta = GF(0);
        for j in 0..=l {
            delta += c[j] * synd[k - j];
        }

        // c <- gamma * c + delta * x * b
        let prev = c;
        for (i, ci) in c.iter_mut().enumerate() {
            *ci = gamma * *ci;
            if i > 0 {
                *ci += delta * b[i - 1];
            }
        }

        if delta == GF(0) || 2 * l > k {
            // b <- x * b
            for i in (1..b.len()).rev() {
                b[i] = b[i - 1];
            }
            b[0] = GF(0);
        } else {
            b = prev;
            l = k + 1 - l;
            gamma = delta;
        }
    }

    let deg = c.iter().rposition(|x| *x != GF(0)).unwrap_or(0);
    (c, deg)
}
