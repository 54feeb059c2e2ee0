//! Arbitrary-precision helpers on top of [`BigUint`]: modular exponentiation,
//! modular inverse and the DER signed-integer byte form.

use num_bigint::Sign::Plus;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::errors::EncodingError;

/// Computes `base^exp mod modulus` by left-to-right square-and-multiply.
///
/// # Panics
///
/// Panics if `modulus` is zero.
pub fn mod_pow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    assert!(!modulus.is_zero(), "modulus must not be zero");
    if modulus.is_one() {
        return BigUint::zero();
    }

    let base = base % modulus;
    let mut acc = BigUint::one();

    for byte in exp.to_bytes_be() {
        for shift in (0..8).rev() {
            acc = &acc * &acc % modulus;
            if (byte >> shift) & 1 == 1 {
                acc = acc * &base % modulus;
            }
        }
    }

    acc
}

/// Calculates the [modular multiplicative
/// inverse](https://en.wikipedia.org/wiki/Modular_multiplicative_inverse) of
/// `a` modulo `m` with the extended Euclidean algorithm.
///
/// Returns `None` if `a` and `m` are not coprime or `m < 2`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m <= &BigUint::one() {
        return None;
    }

    let modulus = BigInt::from_biguint(Plus, m.clone());
    let mut old_r = BigInt::from_biguint(Plus, a % m);
    let mut r = modulus.clone();
    let mut old_s = BigInt::one();
    let mut s = BigInt::zero();

    while !r.is_zero() {
        let q = &old_r / &r;

        let next_r = &old_r - &q * &r;
        old_r = core::mem::replace(&mut r, next_r);

        let next_s = &old_s - &q * &s;
        old_s = core::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return None;
    }

    old_s.mod_floor(&modulus).to_biguint()
}

/// Big-endian content octets of a DER INTEGER holding `x`.
///
/// A `0x00` byte is prepended when the top bit of the first byte is set so the
/// value is not read back as negative.
pub fn to_der_integer_bytes(x: &BigUint) -> Vec<u8> {
    let mut bytes = x.to_bytes_be();
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0);
    }
    bytes
}

/// Parses the content octets of a DER INTEGER as an unsigned value.
pub fn from_der_integer_bytes(bytes: &[u8]) -> Result<BigUint, EncodingError> {
    match bytes {
        [] => Err(EncodingError::EmptyInteger),
        [0x00, next, ..] if next & 0x80 == 0 => Err(EncodingError::NonMinimalInteger),
        [0xff, next, ..] if next & 0x80 != 0 => Err(EncodingError::NonMinimalInteger),
        [first, ..] if first & 0x80 != 0 => Err(EncodingError::NegativeInteger),
        _ => Ok(BigUint::from_bytes_be(bytes)),
    }
}
