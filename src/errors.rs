//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Alias for [`core::result::Result`] with the `cryptotests` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    /// Key material could not be decoded.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(#[from] EncodingError),

    /// The decrypted block is not a valid PKCS#1 v1.5 type 2 block.
    #[error("invalid padding")]
    InvalidPadding,

    /// Plaintext does not fit in a single padded block.
    #[error("message too long")]
    MessageTooLong,

    /// Ciphertext is not the modulus length or is not smaller than the modulus.
    #[error("ciphertext out of range")]
    CiphertextOutOfRange,

    /// Prime search ran out of attempts.
    #[error("key generation failed after {attempts} attempts")]
    KeyGenerationFailure {
        /// Number of attempts made before giving up.
        attempts: usize,
    },

    /// Requested modulus size is below the supported minimum.
    #[error("modulus of {0} bits is too small")]
    ModulusTooSmall(usize),

    /// Invalid prime value.
    #[error("invalid prime value")]
    InvalidPrime,

    /// Invalid modulus.
    #[error("invalid modulus")]
    InvalidModulus,

    /// Invalid exponent.
    #[error("invalid exponent")]
    InvalidExponent,

    /// Invalid coefficient.
    #[error("invalid coefficient")]
    InvalidCoefficient,

    /// Public exponent too small.
    #[error("public exponent too small")]
    PublicExponentTooSmall,

    /// Public exponent too large.
    #[error("public exponent too large")]
    PublicExponentTooLarge,

    /// A private operation produced a result that failed its consistency check.
    #[error("internal error")]
    Internal,

    /// A key file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File the operation was acting on.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Reasons a DER, PEM or XML document was rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum EncodingError {
    /// Tag byte differs from the one the structure requires.
    #[error("unexpected tag {actual:#04x}, expected {expected:#04x}")]
    UnexpectedTag {
        /// Tag the structure requires.
        expected: u8,
        /// Tag found in the input.
        actual: u8,
    },

    /// Input ended inside a tag, length or value.
    #[error("truncated input")]
    Truncated,

    /// Indefinite-length form, which DER forbids.
    #[error("indefinite length")]
    IndefiniteLength,

    /// Long-form length that could have been encoded shorter.
    #[error("non-minimal length encoding")]
    NonMinimalLength,

    /// INTEGER with redundant leading `0x00` or `0xFF` bytes.
    #[error("non-minimal integer encoding")]
    NonMinimalInteger,

    /// INTEGER with no content octets.
    #[error("empty integer")]
    EmptyInteger,

    /// Negative INTEGER where a key component was expected.
    #[error("negative integer")]
    NegativeInteger,

    /// Bytes left over after the outermost structure.
    #[error("trailing data")]
    TrailingData,

    /// Private key version other than two-prime (0).
    #[error("unsupported version {0}")]
    UnsupportedVersion(u64),

    /// INTEGER too large for the field it was read into.
    #[error("integer too large")]
    IntegerTooLarge,

    /// AlgorithmIdentifier is not `rsaEncryption` with NULL parameters.
    #[error("unsupported algorithm identifier")]
    UnsupportedAlgorithm,

    /// BIT STRING with unused bits, which a key cannot have.
    #[error("invalid bit string")]
    InvalidBitString,

    /// No `-----BEGIN <LABEL>-----` line was found.
    #[error("missing PEM pre-encapsulation boundary")]
    MissingBegin,

    /// No `-----END <LABEL>-----` line followed the BEGIN line.
    #[error("missing PEM post-encapsulation boundary")]
    MissingEnd,

    /// BEGIN and END lines carry different labels.
    #[error("PEM BEGIN and END labels differ")]
    LabelMismatch,

    /// PEM label is not one of the RSA key labels.
    #[error("unknown PEM label")]
    UnknownLabel,

    /// Body is not valid base64.
    #[error("invalid base64")]
    InvalidBase64,

    /// Key file is not valid UTF-8 text.
    #[error("key file is not UTF-8 text")]
    NotUtf8,

    /// A required XML element is absent.
    #[error("missing XML element <{0}>")]
    MissingElement(&'static str),
}

impl From<base64ct::Error> for EncodingError {
    fn from(_: base64ct::Error) -> Self {
        EncodingError::InvalidBase64
    }
}

impl From<base64ct::Error> for Error {
    fn from(err: base64ct::Error) -> Self {
        Error::MalformedEncoding(err.into())
    }
}
