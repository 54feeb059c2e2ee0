//! PKCS#1 v1.5 encryption as described in [RFC8017 § 7.2].
//!
//! A message of at most `k - 11` bytes, where `k` is the modulus length in
//! bytes, is framed as `0x00 || 0x02 || PS || 0x00 || M` and raised to the
//! public exponent. Decryption reverses this with the CRT.
//!
//! [RFC8017 § 7.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.2

use num_bigint::BigUint;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

use crate::algorithms::pad::{uint_to_be_pad, uint_to_zeroizing_be_pad};
use crate::algorithms::pkcs1v15::*;
use crate::algorithms::rsa::{rsa_decrypt_and_check, rsa_encrypt};
use crate::dummy_rng::DummyRng;
use crate::errors::{Error, Result};
use crate::key::{self, RsaPrivateKey, RsaPublicKey};
use crate::traits::PublicKeyParts;

/// Largest message, in bytes, that fits in one block under `pub_key`.
pub fn max_message_len(pub_key: &impl PublicKeyParts) -> usize {
    pub_key.size().saturating_sub(PKCS1V15_OVERHEAD)
}

/// Encrypts the given message with RSA and the padding
/// scheme from PKCS#1 v1.5. The message must be no longer than the
/// length of the public modulus minus 11 bytes.
///
/// The ciphertext is exactly `k` bytes long, left padded with zeros.
pub fn encrypt<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    pub_key: &RsaPublicKey,
    msg: &[u8],
) -> Result<Vec<u8>> {
    key::check_public(pub_key)?;

    let k = pub_key.size();
    let em = pkcs1v15_encrypt_pad(rng, msg, k)?;
    let m = Zeroizing::new(BigUint::from_bytes_be(&em));
    uint_to_be_pad(rsa_encrypt(pub_key, &m), k)
}

/// Decrypts a plaintext using RSA and the padding scheme from PKCS#1 v1.5.
///
/// The ciphertext must be exactly `k` bytes and, read as an integer, smaller
/// than the modulus; otherwise [`Error::CiphertextOutOfRange`] is returned.
pub fn decrypt(priv_key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    decrypt_inner(None::<&mut DummyRng>, priv_key, ciphertext)
}

/// Like [`decrypt`], but uses RSA blinding with randomness from `rng` to avoid
/// timing side-channel attacks.
pub fn decrypt_blinded<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    priv_key: &RsaPrivateKey,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    decrypt_inner(Some(rng), priv_key, ciphertext)
}

#[inline]
fn decrypt_inner<R: CryptoRngCore + ?Sized>(
    rng: Option<&mut R>,
    priv_key: &RsaPrivateKey,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    key::check_public(priv_key)?;

    let k = priv_key.size();
    if ciphertext.len() != k {
        return Err(Error::CiphertextOutOfRange);
    }

    let c = BigUint::from_bytes_be(ciphertext);
    let em = rsa_decrypt_and_check(priv_key, rng, &c)?;
    let em = uint_to_zeroizing_be_pad(em, k)?;

    pkcs1v15_encrypt_unpad(&em, k)
}
