//! Generic RSA implementation

use std::borrow::Cow;

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::errors::{Error, Result};
use crate::math::{mod_inverse, mod_pow};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// Raw RSA encryption of m with the public key. No padding is performed.
#[inline]
pub fn rsa_encrypt<K: PublicKeyParts + ?Sized>(key: &K, m: &BigUint) -> BigUint {
    mod_pow(m, key.e(), key.n())
}

/// Performs raw RSA decryption with no padding or error checking.
///
/// Returns a plaintext `BigUint`. Uses the CRT values of the key and performs
/// RSA blinding if an `Rng` is passed.
pub fn rsa_decrypt<R: CryptoRngCore + ?Sized>(
    mut rng: Option<&mut R>,
    priv_key: &impl PrivateKeyParts,
    c: &BigUint,
) -> Result<BigUint> {
    if priv_key.n().is_zero() {
        return Err(Error::InvalidModulus);
    }

    if c >= priv_key.n() {
        return Err(Error::CiphertextOutOfRange);
    }

    let [p, q] = priv_key.primes() else {
        return Err(Error::InvalidPrime);
    };

    let mut ir = None;

    let c = if let Some(ref mut rng) = rng {
        let (blinded, unblinder) = blind(rng, priv_key, c);
        ir = Some(unblinder);
        Cow::Owned(blinded)
    } else {
        Cow::Borrowed(c)
    };

    // m1 = c^dP mod p, m2 = c^dQ mod q
    let mut m1 = mod_pow(&c, priv_key.dp(), p);
    let mut m2 = mod_pow(&c, priv_key.dq(), q);

    // h = qInv * (m1 - m2) mod p
    let m2_mod_p = &m2 % p;
    let mut h = if m1 >= m2_mod_p {
        &m1 - &m2_mod_p
    } else {
        &m1 + p - &m2_mod_p
    };
    h = h * priv_key.qinv() % p;

    // m = m2 + h * q
    let m = &m2 + &h * q;

    m1.zeroize();
    m2.zeroize();
    h.zeroize();

    match ir {
        Some(mut ir) => {
            let unblinded = unblind(priv_key, &m, &ir);
            ir.zeroize();
            Ok(unblinded)
        }
        None => Ok(m),
    }
}

/// Performs raw RSA decryption with no padding.
///
/// Returns a plaintext `BigUint`. Performs RSA blinding if an `Rng` is passed.
/// This will also check for errors in the CRT computation.
pub fn rsa_decrypt_and_check<R: CryptoRngCore + ?Sized>(
    priv_key: &impl PrivateKeyParts,
    rng: Option<&mut R>,
    c: &BigUint,
) -> Result<BigUint> {
    let m = rsa_decrypt(rng, priv_key, c)?;

    // In order to defend against errors in the CRT computation, m^e is
    // calculated, which should match the original ciphertext.
    let check = rsa_encrypt(priv_key, &m);

    if c != &check {
        log::warn!("CRT decryption result failed the re-encryption check");
        return Err(Error::Internal);
    }

    Ok(m)
}

/// Returns the blinded c, along with the unblinding factor.
fn blind<R: CryptoRngCore + ?Sized, K: PublicKeyParts>(
    rng: &mut R,
    key: &K,
    c: &BigUint,
) -> (BigUint, BigUint) {
    // Blinding involves multiplying c by r^e.
    // Then the decryption operation performs (m^e * r^e)^d mod n
    // which equals mr mod n. The factor of r can then be removed
    // by multiplying by the multiplicative inverse of r.

    let mut r: BigUint;
    let unblinder;
    loop {
        r = rng.gen_biguint_below(key.n());
        if r.is_zero() {
            r = BigUint::one();
        }
        if let Some(ir) = mod_inverse(&r, key.n()) {
            unblinder = ir;
            break;
        }
    }

    let c = {
        let mut rpowe = mod_pow(&r, key.e(), key.n());
        let mut c = c * &rpowe;
        c %= key.n();

        rpowe.zeroize();
        r.zeroize();

        c
    };

    (c, unblinder)
}

/// Given an m and and unblinding factor, unblind the m.
fn unblind(key: &impl PublicKeyParts, m: &BigUint, unblinder: &BigUint) -> BigUint {
    (m * unblinder) % key.n()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy_rng::DummyRng;
    use crate::key::RsaPrivateKey;
    use num_traits::FromPrimitive;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    fn big(x: u64) -> BigUint {
        BigUint::from_u64(x).unwrap()
    }

    fn toy_key() -> RsaPrivateKey {
        RsaPrivateKey::from_components(big(3233), big(17), big(2753), big(61), big(53)).unwrap()
    }

    #[test]
    fn test_textbook_vector() {
        let key = toy_key();
        assert_eq!(rsa_encrypt(&key, &big(65)), big(2790));

        let m = rsa_decrypt_and_check(&key, None::<&mut DummyRng>, &big(2790)).unwrap();
        assert_eq!(m, big(65));
    }

    #[test]
    fn test_crt_matches_plain_exponentiation() {
        let key = toy_key();
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        for c in 0..3233u64 {
            let c = big(c);
            let expected = mod_pow(&c, key.d(), key.n());
            assert_eq!(rsa_decrypt(None::<&mut DummyRng>, &key, &c).unwrap(), expected);
            assert_eq!(rsa_decrypt(Some(&mut rng), &key, &c).unwrap(), expected);
        }
    }

    #[test]
    fn test_ciphertext_out_of_range() {
        let key = toy_key();
        for c in [3233u64, 3234, 10_000] {
            let res = rsa_decrypt(None::<&mut DummyRng>, &key, &big(c));
            assert!(matches!(res, Err(Error::CiphertextOutOfRange)));
        }
    }
}
