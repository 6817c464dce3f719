//! Shared pieces of the syndrome based decoder: syndrome computation,
//! polynomial helpers over GF(2^7) and the Chien search. The decoding
//! pipeline itself lives in `berlekamp`.
mod berlekamp;

use arrayvec::ArrayVec;

use super::galois::GF;
use super::{CODEWORD_LEN, DATA_LEN, PARITY_LEN};

pub use berlekamp::decode;

/// A slice that could not be corrected. The slice is left exactly as it
/// was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodingError {
    /// The error locator polynomial has a degree above the correction
    /// capacity of three symbols.
    TooManyErrors,
    /// An internal cross-check failed: the number of locator roots does not
    /// match the locator degree, the locator derivative vanished at a root,
    /// or the corrected word is still not a codeword.
    Malfunction,
}

/// Compute the six syndromes S_1..S_6 of a received slice.
///
/// The codeword polynomial places `codeword[i]` (data) at degree `6 + i`
/// and `codeword[121 + i]` (parity) at degree `i`, so the Horner evaluation
/// runs over the data part in reverse followed by the parity part in
/// reverse. All six accumulators run in lockstep over a single pass.
pub(super) fn syndromes(codeword: &[u8; CODEWORD_LEN]) -> [GF; PARITY_LEN] {
    let mut synd = [GF(0); PARITY_LEN];
    let alphas: [GF; PARITY_LEN] = core::array::from_fn(|j| GF::primitive_power(j as u8 + 1));
    let descending = codeword[..DATA_LEN]
        .iter()
        .rev()
        .chain(codeword[DATA_LEN..].iter().rev());
    for &v in descending {
        for (s, a) in synd.iter_mut().zip(alphas.iter()) {
            *s = *s * *a + GF(v);
        }
    }
    synd
}

/// Evaluate a polynomial given by ascending coefficients at `x`.
pub(super) fn eval(poly: &[GF], x: GF) -> GF {
    poly.iter().rev().fold(GF(0), |acc, c| acc * x + *c)
}

/// Formal derivative in characteristic 2: the derivative of x^(2k) is 0 and
/// the derivative of x^(2k+1) is x^(2k), so odd coefficients move down one
/// position and even ones vanish.
pub(super) fn derivative(poly: &[GF]) -> ArrayVec<GF, PARITY_LEN> {
    poly[1..]
        .iter()
        .enumerate()
        .map(|(i, c)| if i % 2 == 0 { *c } else { GF(0) })
        .collect()
}

/// The error evaluator polynomial from the key equation,
/// omega(x) = S(x) * sigma(x) mod x^6 with S(x) = S_1 + S_2 x + ... + S_6 x^5.
pub(super) fn error_evaluator(synd: &[GF; PARITY_LEN], sigma: &[GF]) -> [GF; PARITY_LEN] {
    let mut omega = [GF(0); PARITY_LEN];
    for (i, o) in omega.iter_mut().enumerate() {
        for (j, s) in sigma.iter().enumerate().take(i + 1) {
            *o += *s * synd[i - j];
        }
    }
    omega
}

/// Find the roots of the error locator polynomial among x^0..x^126.
///
/// Four registers are initialized with sigma_0..sigma_3 and multiplied by
/// the constants x^0, x^-1, x^-2, x^-3 each cycle; cycle j emits j when the
/// register sum is zero, i.e. sigma(x^-j) = 0. The emitted values are the
/// 0-based error degrees. A non-zero polynomial of degree at most three has
/// at most three roots, which bounds the result.
pub(super) fn chien_search(sigma: &[GF]) -> ArrayVec<u8, 3> {
    debug_assert!(!sigma.is_empty() && sigma.len() <= 4);
    let mut regs = [GF(0); 4];
    regs[..sigma.len()].copy_from_slice(sigma);
    let mults: [GF; 4] = core::array::from_fn(|i| GF::primitive_power_neg(i as u8));

    let mut roots = ArrayVec::new();
    for j in 0..CODEWORD_LEN as u8 {
        let sum: GF = regs.iter().cloned().sum();
        if sum == GF(0) {
            roots.push(j);
        }
        for (r, m) in regs.iter_mut().zip(mults.iter()) {
            *r *= *m;
        }
    }
    roots
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn syndromes_of_zero_codeword() {
    assert_eq!(syndromes(&[0; CODEWORD_LEN]), [GF(0); PARITY_LEN]);
}

#[test]
fn syndrome_of_single_error_is_scaled_power() {
    // An error e at degree position k gives S_j = e * x^(j*k).
    let mut codeword = [0u8; CODEWORD_LEN];
    // data index 10 sits at degree 16
    codeword[10] = 0x55;
    let synd = syndromes(&codeword);
    for (j, s) in synd.iter().enumerate() {
        let power = ((j + 1) * 16 % 127) as u8;
        assert_eq!(*s, GF(0x55) * GF::primitive_power(power));
    }

    // parity index 2 sits at degree 2
    let mut codeword = [0u8; CODEWORD_LEN];
    codeword[DATA_LEN + 2] = 3;
    let synd = syndromes(&codeword);
    for (j, s) in synd.iter().enumerate() {
        let power = ((j + 1) * 2 % 127) as u8;
        assert_eq!(*s, GF(3) * GF::primitive_power(power));
    }
}

#[test]
fn test_eval() {
    // p(x) = 5 + x + 3x^2 at x = 2: 5 ^ 2 ^ (3 * 4)
    let p = [GF(5), GF(1), GF(3)];
    assert_eq!(eval(&p, GF(2)), GF(5) + GF(2) + GF(3) * GF(4));
    assert_eq!(eval(&p, GF(0)), GF(5));
    assert_eq!(eval(&[], GF(7)), GF(0));
}

#[test]
fn test_derivative() {
    // d/dx (c0 + c1 x + c2 x^2 + c3 x^3) = c1 + c3 x^2
    let p = [GF(9), GF(4), GF(17), GF(80)];
    let d = derivative(&p);
    assert_eq!(&d[..], &[GF(4), GF(0), GF(80)]);
    assert_eq!(&derivative(&[GF(1)])[..], &[]);
}

#[test]
fn chien_finds_constructed_roots() {
    // sigma(x) = (1 + x^5 x)(1 + x^40 x) has roots x^-5 and x^-40, so the
    // search must emit the degrees 5 and 40.
    let a5 = GF::primitive_power(5);
    let a40 = GF::primitive_power(40);
    let sigma = [GF(1), a5 + a40, a5 * a40];
    let roots = chien_search(&sigma);
    assert_eq!(&roots[..], &[5, 40]);
}

#[test]
fn chien_on_rootless_polynomial() {
    // sigma(x) = 1 + x + x^2 + ... checked against direct evaluation.
    let sigma = [GF(1), GF(1), GF(1)];
    let roots = chien_search(&sigma);
    for j in 0..127u8 {
        let direct = eval(&sigma, GF::primitive_power_neg(j));
        assert_eq!(roots.contains(&j), direct == GF(0));
    }
}

#[test]
fn error_evaluator_single_error() {
    // One error e at degree k: sigma = 1 + x^k x and
    // omega = S * sigma mod x^6 collapses to the constant e * x^k.
    let e = GF(19);
    let k = 33u8;
    let xk = GF::primitive_power(k);
    let mut synd = [GF(0); PARITY_LEN];
    for (j, s) in synd.iter_mut().enumerate() {
        *s = e * GF::primitive_power(((j + 1) * k as usize % 127) as u8);
    }
    let sigma = [GF(1), xk];
    let omega = error_evaluator(&synd, &sigma);
    assert_eq!(omega[0], e * xk);
    for o in &omega[1..] {
        assert_eq!(*o, GF(0));
    }
}
