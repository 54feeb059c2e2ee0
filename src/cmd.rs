//! The commands behind the `cryptotests` binary.
//!
//! Each command takes its inputs explicitly and returns what it produced; the
//! binary does the printing.

use std::path::Path;

use anyhow::{anyhow, bail, Context};
use base64ct::{Base64, Encoding};
use rand_core::CryptoRngCore;

use crate::keystore::{load_key, KeyFile, KeyFormat, KeyStore};
use crate::{RsaKeyParameters, RsaPrivateKey};

/// Message used when none is given.
pub const DEFAULT_MESSAGE: &str = "Test Message!";

/// Modulus size used by `gen` when none is given.
pub const DEFAULT_BITS: usize = 2048;

/// Generates a key pair of `bits` bits and writes the four key files.
pub fn generate<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    store: &KeyStore,
    bits: usize,
) -> anyhow::Result<RsaPrivateKey> {
    log::info!("generating a {}-bit key pair", bits);
    let key = crate::generate_keypair(rng, bits)
        .with_context(|| format!("failed to generate a {bits}-bit key"))?;
    store
        .save(&key)
        .with_context(|| format!("failed to save keys under {}", store.base().display()))?;
    Ok(key)
}

/// Encrypts `message` with the public key file of `format` and decrypts it with
/// the private one, failing unless the message comes back unchanged.
///
/// Returns the ciphertext.
pub fn round_trip<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    store: &KeyStore,
    format: KeyFormat,
    message: &str,
) -> anyhow::Result<Vec<u8>> {
    let (public_file, private_file) = match format {
        KeyFormat::Pem => (KeyFile::PublicPem, KeyFile::PrivatePem),
        KeyFormat::Xml => (KeyFile::PublicXml, KeyFile::PrivateXml),
    };

    let public = store
        .load(public_file)
        .with_context(|| format!("failed to load {}", public_file.file_name()))?
        .public_view();
    let private = private_key(
        store
            .load(private_file)
            .with_context(|| format!("failed to load {}", private_file.file_name()))?,
        &store.path(private_file),
    )?;

    let ciphertext = crate::encrypt(rng, &public, message.as_bytes())
        .context("failed to encrypt the message")?;
    let plaintext = crate::decrypt(&private, &ciphertext).context("failed to decrypt the message")?;

    if plaintext != message.as_bytes() {
        bail!("decrypted message does not match the original");
    }

    log::info!("{:?} round trip succeeded", format);
    Ok(ciphertext)
}

/// Encrypts `message` with the key in `key_path` and returns the base64 ciphertext.
pub fn encrypt_message<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    key_path: &Path,
    message: &str,
) -> anyhow::Result<String> {
    let public = load_key(key_path)
        .with_context(|| format!("failed to load {}", key_path.display()))?
        .public_view();
    let ciphertext = crate::encrypt(rng, &public, message.as_bytes())
        .context("failed to encrypt the message")?;
    Ok(Base64::encode_string(&ciphertext))
}

/// Decrypts the base64 `ciphertext` with the private key in `key_path`.
pub fn decrypt_message(key_path: &Path, ciphertext: &str) -> anyhow::Result<String> {
    let private = private_key(
        load_key(key_path).with_context(|| format!("failed to load {}", key_path.display()))?,
        key_path,
    )?;
    let ciphertext = Base64::decode_vec(ciphertext.trim())
        .map_err(|err| anyhow!("ciphertext is not valid base64: {err}"))?;
    let plaintext = crate::decrypt(&private, &ciphertext).context("failed to decrypt the message")?;
    String::from_utf8(plaintext).context("decrypted message is not UTF-8 text")
}

fn private_key(params: RsaKeyParameters, path: &Path) -> anyhow::Result<RsaPrivateKey> {
    params
        .into_private()
        .ok_or_else(|| anyhow!("{} does not hold a private key", path.display()))
}
