//! Building blocks for reading and writing the DER subset used by RSA key
//! structures: INTEGER, BIT STRING, NULL, OBJECT IDENTIFIER and SEQUENCE.
//!
//! Decoding is strict. Lengths must use the shortest form, integers must be
//! minimal and non-negative, and the indefinite-length form is rejected.

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::errors::EncodingError;
use crate::math::{from_der_integer_bytes, to_der_integer_bytes};

pub(crate) const CONSTRUCTED: u8 = 1 << 5;

/// Longest length-of-length this decoder accepts, in bytes.
const MAX_LENGTH_OCTETS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Tag {
    Integer = 0x02,
    BitString = 0x03,
    Null = 0x05,
    Oid = 0x06,
    Sequence = CONSTRUCTED | 0x10, // 0x30
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as Self
    }
}

/// Accumulates a DER encoding.
#[derive(Debug, Default)]
pub(crate) struct Encoder {
    out: Vec<u8>,
}

impl Encoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn tlv(&mut self, tag: Tag, value: &[u8]) {
        self.out.push(tag.into());
        encode_length(&mut self.out, value.len());
        self.out.extend_from_slice(value);
    }

    pub(crate) fn integer(&mut self, value: &BigUint) -> &mut Self {
        let bytes = zeroize::Zeroizing::new(to_der_integer_bytes(value));
        self.tlv(Tag::Integer, &bytes);
        self
    }

    pub(crate) fn small_integer(&mut self, value: u64) -> &mut Self {
        self.integer(&BigUint::from(value))
    }

    pub(crate) fn null(&mut self) -> &mut Self {
        self.tlv(Tag::Null, &[]);
        self
    }

    pub(crate) fn oid(&mut self, oid: &const_oid::ObjectIdentifier) -> &mut Self {
        self.tlv(Tag::Oid, oid.as_bytes());
        self
    }

    /// Writes a BIT STRING with no unused bits.
    pub(crate) fn bit_string(&mut self, bytes: &[u8]) -> &mut Self {
        let mut value = Vec::with_capacity(bytes.len() + 1);
        value.push(0);
        value.extend_from_slice(bytes);
        self.tlv(Tag::BitString, &value);
        self
    }

    /// Writes a SEQUENCE whose contents are produced by `write_value`.
    pub(crate) fn sequence<F>(&mut self, write_value: F) -> &mut Self
    where
        F: FnOnce(&mut Encoder),
    {
        let mut inner = Encoder::new();
        write_value(&mut inner);
        let inner = zeroize::Zeroizing::new(inner.finish());
        self.tlv(Tag::Sequence, &inner);
        self
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.out
    }
}

/// Appends the DER length octets for `len`: short form below 128, otherwise
/// `0x80 | n` followed by the `n` minimal big-endian bytes of `len`.
pub(crate) fn encode_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }

    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    let significant = &bytes[skip..];
    out.push(0x80 | significant.len() as u8);
    out.extend_from_slice(significant);
}

/// Reads DER values off the front of a byte slice.
#[derive(Debug)]
pub(crate) struct Decoder<'a> {
    input: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self {
        Self { input }
    }

    fn read_byte(&mut self) -> Result<u8, EncodingError> {
        let (&first, rest) = self.input.split_first().ok_or(EncodingError::Truncated)?;
        self.input = rest;
        Ok(first)
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], EncodingError> {
        if self.input.len() < len {
            return Err(EncodingError::Truncated);
        }
        let (value, rest) = self.input.split_at(len);
        self.input = rest;
        Ok(value)
    }

    fn read_length(&mut self) -> Result<usize, EncodingError> {
        // If the high order bit of the first byte is set to zero then the length
        // is encoded in the seven remaining bits of that byte. Otherwise, those
        // seven bits represent the number of bytes used to encode the length.
        match self.read_byte()? {
            n if n & 0x80 == 0 => Ok(usize::from(n)),
            0x80 => Err(EncodingError::IndefiniteLength),
            n => {
                let count = usize::from(n & 0x7f);
                if count > MAX_LENGTH_OCTETS {
                    return Err(EncodingError::NonMinimalLength);
                }
                let bytes = self.read_bytes(count)?;
                if bytes[0] == 0 {
                    return Err(EncodingError::NonMinimalLength);
                }
                let len = bytes
                    .iter()
                    .fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
                if len < 0x80 {
                    return Err(EncodingError::NonMinimalLength);
                }
                Ok(len)
            }
        }
    }

    /// Reads one TLV and returns its value if the tag is `tag`.
    pub(crate) fn tlv(&mut self, tag: Tag) -> Result<&'a [u8], EncodingError> {
        let actual = self.read_byte()?;
        if actual != u8::from(tag) {
            return Err(EncodingError::UnexpectedTag {
                expected: tag.into(),
                actual,
            });
        }
        let len = self.read_length()?;
        self.read_bytes(len)
    }

    pub(crate) fn integer(&mut self) -> Result<BigUint, EncodingError> {
        from_der_integer_bytes(self.tlv(Tag::Integer)?)
    }

    /// Reads an INTEGER that fits in a `u64`, as used for version numbers.
    pub(crate) fn small_integer(&mut self) -> Result<u64, EncodingError> {
        self.integer()?
            .to_u64()
            .ok_or(EncodingError::IntegerTooLarge)
    }

    pub(crate) fn null(&mut self) -> Result<(), EncodingError> {
        match self.tlv(Tag::Null)? {
            [] => Ok(()),
            _ => Err(EncodingError::UnsupportedAlgorithm),
        }
    }

    pub(crate) fn oid(&mut self) -> Result<&'a [u8], EncodingError> {
        self.tlv(Tag::Oid)
    }

    /// Reads a BIT STRING that has no unused bits and returns its payload.
    pub(crate) fn bit_string(&mut self) -> Result<&'a [u8], EncodingError> {
        match self.tlv(Tag::BitString)?.split_first() {
            Some((0, rest)) => Ok(rest),
            _ => Err(EncodingError::InvalidBitString),
        }
    }

    /// Reads a SEQUENCE and decodes its contents with `decoder`, which must
    /// consume all of them.
    pub(crate) fn sequence<F, T>(&mut self, decoder: F) -> Result<T, EncodingError>
    where
        F: FnOnce(&mut Decoder<'a>) -> Result<T, EncodingError>,
    {
        let mut inner = Decoder::new(self.tlv(Tag::Sequence)?);
        let value = decoder(&mut inner)?;
        inner.finish()?;
        Ok(value)
    }

    /// Checks that the whole input has been consumed.
    pub(crate) fn finish(self) -> Result<(), EncodingError> {
        if self.input.is_empty() {
            Ok(())
        } else {
            Err(EncodingError::TrailingData)
        }
    }
}
