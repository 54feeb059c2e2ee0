//! The `<RSAKeyValue>` key-parameter format.
//!
//! ```text
//! <RSAKeyValue>
//!   <Modulus>..</Modulus><Exponent>..</Exponent>
//!   <P>..</P><Q>..</Q><DP>..</DP><DQ>..</DQ><InverseQ>..</InverseQ><D>..</D>
//! </RSAKeyValue>
//! ```
//!
//! Each value is the base64 of an unsigned big-endian integer. Public
//! documents stop after `<Exponent>`.

use base64ct::{Base64, Encoding};
use num_bigint::BigUint;
use zeroize::Zeroizing;

use crate::algorithms::pad::left_pad;
use crate::errors::{EncodingError, Error, Result};
use crate::key::{RsaKeyParameters, RsaPrivateKey, RsaPublicKey};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

const ROOT: &str = "RSAKeyValue";

fn push_element(out: &mut String, name: &str, value: &[u8]) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    out.push_str(&Zeroizing::new(Base64::encode_string(value)));
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn push_integer(out: &mut String, name: &str, value: &BigUint, len: usize) -> Result<()> {
    let bytes = Zeroizing::new(value.to_bytes_be());
    let padded = Zeroizing::new(left_pad(&bytes, len.max(bytes.len()))?);
    push_element(out, name, &padded);
    Ok(())
}

/// Serializes key parameters as an `<RSAKeyValue>` document on a single line.
///
/// Private values are left padded: P, Q, DP, DQ and InverseQ to half the
/// modulus length, D to the full modulus length.
pub fn to_xml(params: &RsaKeyParameters) -> Result<Zeroizing<String>> {
    let k = params.size();
    let half = (k + 1) / 2;

    let mut out = Zeroizing::new(String::new());
    out.push('<');
    out.push_str(ROOT);
    out.push('>');

    push_integer(&mut out, "Modulus", params.n(), 0)?;
    push_integer(&mut out, "Exponent", params.e(), 0)?;

    if let RsaKeyParameters::Private(key) = params {
        let [p, q] = key.primes() else {
            return Err(Error::InvalidPrime);
        };
        push_integer(&mut out, "P", p, half)?;
        push_integer(&mut out, "Q", q, half)?;
        push_integer(&mut out, "DP", key.dp(), half)?;
        push_integer(&mut out, "DQ", key.dq(), half)?;
        push_integer(&mut out, "InverseQ", key.qinv(), half)?;
        push_integer(&mut out, "D", key.d(), k)?;
    }

    out.push_str("</");
    out.push_str(ROOT);
    out.push('>');
    Ok(out)
}

/// Returns the text between `<name>` and `</name>`, if the element is present.
fn element<'a>(doc: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let start = doc.find(&open)? + open.len();
    let len = doc[start..].find(&close)?;
    Some(doc[start..start + len].trim())
}

fn required_integer(doc: &str, name: &'static str) -> Result<BigUint> {
    let text = element(doc, name).ok_or(EncodingError::MissingElement(name))?;
    let bytes = Zeroizing::new(Base64::decode_vec(text)?);
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Parses an `<RSAKeyValue>` document.
///
/// The document holds a private key when `<D>` is present; then all of the
/// private elements are required.
pub fn from_xml(input: &str) -> Result<RsaKeyParameters> {
    let doc = element(input, ROOT).ok_or(EncodingError::MissingElement(ROOT))?;

    let n = required_integer(doc, "Modulus")?;
    let e = required_integer(doc, "Exponent")?;

    if element(doc, "D").is_none() {
        return Ok(RsaPublicKey::new(n, e)?.into());
    }

    let key = RsaPrivateKey::from_crt_components(
        n,
        e,
        required_integer(doc, "D")?,
        required_integer(doc, "P")?,
        required_integer(doc, "Q")?,
        required_integer(doc, "DP")?,
        required_integer(doc, "DQ")?,
        required_integer(doc, "InverseQ")?,
    )?;
    Ok(key.into())
}
