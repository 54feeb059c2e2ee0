//! PKCS#1 and X.509 `SubjectPublicKeyInfo` encoding support, in DER and PEM.
//!
//! | structure                 | PEM label         |
//! |---------------------------|-------------------|
//! | PKCS#1 `RSAPrivateKey`    | `RSA PRIVATE KEY` |
//! | PKCS#1 `RSAPublicKey`     | `RSA PUBLIC KEY`  |
//! | `SubjectPublicKeyInfo`    | `PUBLIC KEY`      |

use const_oid::ObjectIdentifier;
use zeroize::Zeroizing;

use crate::der::{Decoder, Encoder};
use crate::errors::{EncodingError, Result};
use crate::key::{RsaKeyParameters, RsaPrivateKey, RsaPublicKey};
use crate::pem::{self, PemLabel};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// ObjectID for `rsaEncryption`.
pub const RSA_ENCRYPTION_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// The only `RSAPrivateKey` version supported: two-prime.
const TWO_PRIME_VERSION: u64 = 0;

impl RsaPrivateKey {
    /// Serialize as a PKCS#1 `RSAPrivateKey`:
    ///
    /// ```text
    /// RSAPrivateKey ::= SEQUENCE {
    ///     version           Version,
    ///     modulus           INTEGER,  -- n
    ///     publicExponent    INTEGER,  -- e
    ///     privateExponent   INTEGER,  -- d
    ///     prime1            INTEGER,  -- p
    ///     prime2            INTEGER,  -- q
    ///     exponent1         INTEGER,  -- d mod (p-1)
    ///     exponent2         INTEGER,  -- d mod (q-1)
    ///     coefficient       INTEGER   -- (inverse of q) mod p
    /// }
    /// ```
    pub fn to_pkcs1_der(&self) -> Zeroizing<Vec<u8>> {
        let mut enc = Encoder::new();
        enc.sequence(|seq| {
            seq.small_integer(TWO_PRIME_VERSION)
                .integer(self.n())
                .integer(self.e())
                .integer(self.d());
            for prime in self.primes() {
                seq.integer(prime);
            }
            seq.integer(self.dp())
                .integer(self.dq())
                .integer(self.qinv());
        });
        Zeroizing::new(enc.finish())
    }

    /// Parse a PKCS#1 `RSAPrivateKey`.
    ///
    /// The CRT values must be consistent with `d`, `p` and `q`.
    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self> {
        let mut dec = Decoder::new(der);
        let [n, e, d, p, q, dp, dq, qinv] = dec.sequence(|seq| {
            let version = seq.small_integer()?;
            if version != TWO_PRIME_VERSION {
                // Multi-prime RSA keys not currently supported
                return Err(EncodingError::UnsupportedVersion(version));
            }
            Ok([
                seq.integer()?,
                seq.integer()?,
                seq.integer()?,
                seq.integer()?,
                seq.integer()?,
                seq.integer()?,
                seq.integer()?,
                seq.integer()?,
            ])
        })?;
        dec.finish()?;

        RsaPrivateKey::from_crt_components(n, e, d, p, q, dp, dq, qinv)
    }

    /// Serialize as PEM with the `RSA PRIVATE KEY` label.
    pub fn to_pkcs1_pem(&self) -> Zeroizing<String> {
        pem::encode(PemLabel::RsaPrivateKey, &self.to_pkcs1_der())
    }
}

impl RsaPublicKey {
    /// Serialize as a PKCS#1 `RSAPublicKey`: `SEQUENCE { modulus, publicExponent }`.
    pub fn to_pkcs1_der(&self) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.sequence(|seq| {
            seq.integer(self.n()).integer(self.e());
        });
        enc.finish()
    }

    /// Parse a PKCS#1 `RSAPublicKey`.
    pub fn from_pkcs1_der(der: &[u8]) -> Result<Self> {
        let mut dec = Decoder::new(der);
        let (n, e) = dec.sequence(|seq| Ok((seq.integer()?, seq.integer()?)))?;
        dec.finish()?;

        RsaPublicKey::new(n, e)
    }

    /// Serialize as an X.509 `SubjectPublicKeyInfo`:
    ///
    /// ```text
    /// SubjectPublicKeyInfo ::= SEQUENCE {
    ///     algorithm         AlgorithmIdentifier,  -- rsaEncryption, NULL
    ///     subjectPublicKey  BIT STRING            -- RSAPublicKey
    /// }
    /// ```
    pub fn to_public_key_der(&self) -> Vec<u8> {
        let pkcs1 = self.to_pkcs1_der();
        let mut enc = Encoder::new();
        enc.sequence(|spki| {
            spki.sequence(|algorithm| {
                algorithm.oid(&RSA_ENCRYPTION_OID).null();
            })
            .bit_string(&pkcs1);
        });
        enc.finish()
    }

    /// Parse an X.509 `SubjectPublicKeyInfo` holding an `rsaEncryption` key.
    pub fn from_public_key_der(der: &[u8]) -> Result<Self> {
        let mut dec = Decoder::new(der);
        let pkcs1 = dec.sequence(|spki| {
            spki.sequence(|algorithm| {
                if algorithm.oid()? != RSA_ENCRYPTION_OID.as_bytes() {
                    return Err(EncodingError::UnsupportedAlgorithm);
                }
                algorithm.null()
            })?;
            spki.bit_string()
        })?;
        dec.finish()?;

        Self::from_pkcs1_der(pkcs1)
    }

    /// Serialize as PEM with the `RSA PUBLIC KEY` label.
    pub fn to_pkcs1_pem(&self) -> String {
        pem::encode(PemLabel::RsaPublicKey, &self.to_pkcs1_der()).to_string()
    }

    /// Serialize as PEM with the `PUBLIC KEY` label.
    pub fn to_public_key_pem(&self) -> String {
        pem::encode(PemLabel::PublicKey, &self.to_public_key_der()).to_string()
    }
}

/// Encodes key parameters as PEM: `RSA PRIVATE KEY` when the private
/// parameters are present, otherwise `PUBLIC KEY`.
pub fn encode_pem(params: &RsaKeyParameters) -> Zeroizing<String> {
    match params {
        RsaKeyParameters::Private(key) => key.to_pkcs1_pem(),
        RsaKeyParameters::Public(key) => Zeroizing::new(key.to_public_key_pem()),
    }
}

/// Decodes the first PEM document in `input` into key parameters.
///
/// Accepts `RSA PRIVATE KEY`, `RSA PUBLIC KEY` and `PUBLIC KEY` documents.
pub fn decode_pem(input: &str) -> Result<RsaKeyParameters> {
    let record = pem::decode(input)?;
    let params = match record.label {
        PemLabel::RsaPrivateKey => RsaPrivateKey::from_pkcs1_der(&record.der)?.into(),
        PemLabel::RsaPublicKey => RsaPublicKey::from_pkcs1_der(&record.der)?.into(),
        PemLabel::PublicKey => RsaPublicKey::from_public_key_der(&record.der)?.into(),
    };
    log::trace!("decoded {} document", record.label);
    Ok(params)
}
