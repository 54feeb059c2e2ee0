#![warn(missing_docs)]

//! RSA key pairs as PEM and `<RSAKeyValue>` XML, and PKCS#1 v1.5 encryption
//! round trips through them.
//!
//! # Usage
//!
//! ## Generate, encrypt and decrypt
//! ```
//! use cryptotests::{decrypt, encrypt, generate_keypair, RsaPublicKey};
//!
//! let mut rng = rand::thread_rng(); // rand@0.8
//!
//! let private_key = generate_keypair(&mut rng, 1024).expect("failed to generate a key");
//! let public_key = RsaPublicKey::from(&private_key);
//!
//! let data = b"Test Message!";
//! let enc_data = encrypt(&mut rng, &public_key, &data[..]).expect("failed to encrypt");
//! assert_eq!(enc_data.len(), 128);
//!
//! let dec_data = decrypt(&private_key, &enc_data).expect("failed to decrypt");
//! assert_eq!(&data[..], &dec_data[..]);
//! ```
//!
//! ## PEM encoding
//!
//! Private keys are written as PKCS#1 `RSA PRIVATE KEY` documents and public
//! keys as `PUBLIC KEY` (`SubjectPublicKeyInfo`) documents. PKCS#1
//! `RSA PUBLIC KEY` documents are accepted when decoding.
//!
//! ```
//! use cryptotests::{decode_pem, RsaKeyParameters};
//!
//! let pem = "-----BEGIN RSA PUBLIC KEY-----
//! MIIBCgKCAQEAtsQsUV8QpqrygsY+2+JCQ6Fw8/omM71IM2N/R8pPbzbgOl0p78MZ
//! GsgPOQ2HSznjD0FPzsH8oO2B5Uftws04LHb2HJAYlz25+lN5cqfHAfa3fgmC38Ff
//! wBkn7l582UtPWZ/wcBOnyCgb3yLcvJrXyrt8QxHJgvWO23ITrUVYszImbXQ67YGS
//! 0YhMrbixRzmo2tpm3JcIBtnHrEUMsT0NfFdfsZhTT8YbxBvA8FdODgEwx7u/vf3J
//! 9qbi4+Kv8cvqyJuleIRSjVXPsIMnoejIn04APPKIjpMyQdnWlby7rNyQtE4+CV+j
//! cFjqJbE/Xilcvqxt6DirjFCvYeKYl1uHLwIDAQAB
//! -----END RSA PUBLIC KEY-----";
//!
//! let params = decode_pem(pem).expect("failed to decode");
//! assert!(matches!(params, RsaKeyParameters::Public(_)));
//! ```
//!
//! ## XML encoding
//! ```
//! use cryptotests::{from_xml, to_xml, RsaKeyParameters};
//!
//! let xml = "<RSAKeyValue><Modulus>DKE=</Modulus><Exponent>EQ==</Exponent></RSAKeyValue>";
//! let params = from_xml(xml).expect("failed to decode");
//! assert_eq!(to_xml(&params).unwrap().as_str(), xml);
//! ```

pub use num_bigint::BigUint;
pub use rand_core;

pub mod algorithms;
pub mod cmd;
pub mod errors;
pub mod keystore;
pub mod math;
pub mod pem;
pub mod pkcs1v15;
pub mod prime;
pub mod traits;
pub mod xml;

mod der;
mod dummy_rng;
mod encoding;
mod key;

use rand_core::CryptoRngCore;

pub use crate::{
    encoding::{decode_pem, encode_pem, RSA_ENCRYPTION_OID},
    errors::{EncodingError, Error, Result},
    key::{RsaKeyParameters, RsaPrivateKey, RsaPublicKey},
    traits::{PrivateKeyParts, PublicKeyParts},
    xml::{from_xml, to_xml},
};

/// Generates a two-prime RSA key pair with a `bits`-bit modulus and public
/// exponent 65537.
pub fn generate_keypair<R: CryptoRngCore + ?Sized>(rng: &mut R, bits: usize) -> Result<RsaPrivateKey> {
    RsaPrivateKey::new(rng, bits)
}

/// Encrypts `msg` under `key` with PKCS#1 v1.5 type 2 padding.
pub fn encrypt<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    key: &RsaPublicKey,
    msg: &[u8],
) -> Result<Vec<u8>> {
    pkcs1v15::encrypt(rng, key, msg)
}

/// Decrypts a PKCS#1 v1.5 ciphertext.
pub fn decrypt(key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    pkcs1v15::decrypt(key, ciphertext)
}

/// Decrypts a PKCS#1 v1.5 ciphertext using RSA blinding.
pub fn decrypt_blinded<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    key: &RsaPrivateKey,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    pkcs1v15::decrypt_blinded(rng, key, ciphertext)
}
