use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithms::generate::generate_key;
use crate::errors::{Error, Result};
use crate::math::mod_inverse;
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// Represents the public part of an RSA key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    /// Modulus: product of prime numbers `p` and `q`
    n: BigUint,
    /// Public exponent: power to which a plaintext message is raised in
    /// order to encrypt it.
    ///
    /// Typically 0x10001 (65537)
    e: BigUint,
}

/// Represents a whole RSA key, public and private parts.
#[derive(Debug, Clone)]
pub struct RsaPrivateKey {
    /// Public components of the private key.
    pubkey_components: RsaPublicKey,
    /// Private exponent
    pub(crate) d: BigUint,
    /// Prime factors of N, exactly `[p, q]`.
    pub(crate) primes: Vec<BigUint>,
    /// CRT values derived from `d`, `p` and `q`.
    pub(crate) precomputed: PrecomputedValues,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PrecomputedValues {
    /// D mod (P-1)
    pub(crate) dp: BigUint,
    /// D mod (Q-1)
    pub(crate) dq: BigUint,
    /// Q^-1 mod P
    pub(crate) qinv: BigUint,
}

impl Zeroize for PrecomputedValues {
    fn zeroize(&mut self) {
        self.dp.zeroize();
        self.dq.zeroize();
        self.qinv.zeroize();
    }
}

impl Eq for RsaPrivateKey {}
impl PartialEq for RsaPrivateKey {
    #[inline]
    fn eq(&self, other: &RsaPrivateKey) -> bool {
        self.pubkey_components == other.pubkey_components
            && self.d == other.d
            && self.primes == other.primes
            && self.precomputed == other.precomputed
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.d.zeroize();
        self.primes.zeroize();
        self.precomputed.zeroize();
    }
}

impl ZeroizeOnDrop for RsaPrivateKey {}

impl From<RsaPrivateKey> for RsaPublicKey {
    fn from(private_key: RsaPrivateKey) -> Self {
        (&private_key).into()
    }
}

impl From<&RsaPrivateKey> for RsaPublicKey {
    fn from(private_key: &RsaPrivateKey) -> Self {
        private_key.public_view()
    }
}

impl PublicKeyParts for RsaPublicKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

impl RsaPublicKey {
    /// Minimum value of the public exponent `e`.
    pub const MIN_PUB_EXPONENT: u64 = 2;

    /// Maximum value of the public exponent `e`.
    pub const MAX_PUB_EXPONENT: u64 = (1 << 33) - 1;

    /// Create a new public key from its components.
    pub fn new(n: BigUint, e: BigUint) -> Result<Self> {
        let k = Self { n, e };
        check_public(&k)?;
        Ok(k)
    }
}

impl PublicKeyParts for RsaPrivateKey {
    fn n(&self) -> &BigUint {
        &self.pubkey_components.n
    }

    fn e(&self) -> &BigUint {
        &self.pubkey_components.e
    }
}

impl RsaPrivateKey {
    /// Default exponent for RSA keys.
    const EXP: u64 = 65537;

    /// Generate a new RSA key pair of the given bit size using the passed in
    /// `rng` and the public exponent 65537.
    pub fn new<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_size: usize) -> Result<RsaPrivateKey> {
        generate_key(rng, bit_size, &BigUint::from(Self::EXP))
    }

    /// Constructs an RSA key pair from the individual components, computing
    /// the CRT values `dP`, `dQ` and `qInv`.
    pub fn from_components(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        p: BigUint,
        q: BigUint,
    ) -> Result<RsaPrivateKey> {
        let precomputed = precompute(&d, &p, &q)?;
        let k = RsaPrivateKey {
            pubkey_components: RsaPublicKey { n, e },
            d,
            primes: vec![p, q],
            precomputed,
        };
        k.validate()?;
        Ok(k)
    }

    /// Constructs an RSA key pair from components that already carry the CRT
    /// values, as stored in PKCS#1 and XML documents.
    ///
    /// The CRT values must agree with the ones derived from `d`, `p` and `q`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_crt_components(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        p: BigUint,
        q: BigUint,
        dp: BigUint,
        dq: BigUint,
        qinv: BigUint,
    ) -> Result<RsaPrivateKey> {
        let k = Self::from_components(n, e, d, p, q)?;
        if k.precomputed.dp != dp || k.precomputed.dq != dq {
            return Err(Error::InvalidExponent);
        }
        if k.precomputed.qinv != qinv {
            return Err(Error::InvalidCoefficient);
        }
        Ok(k)
    }

    /// Get the public half `{n, e}` of this key pair.
    pub fn public_view(&self) -> RsaPublicKey {
        self.pubkey_components.clone()
    }

    /// Same as [`RsaPrivateKey::public_view`].
    pub fn to_public_key(&self) -> RsaPublicKey {
        self.public_view()
    }

    /// Performs basic sanity checks on the key.
    /// Returns `Ok(())` if everything is good, otherwise an appropriate error.
    pub fn validate(&self) -> Result<()> {
        check_public(self)?;

        let one = BigUint::one();
        let [p, q] = self.primes.as_slice() else {
            return Err(Error::InvalidPrime);
        };

        // Check that p and q are distinct primes > 1.
        if p <= &one || q <= &one || p == q {
            return Err(Error::InvalidPrime);
        }

        // Check that p * q == n.
        if &(p * q) != self.n() {
            return Err(Error::InvalidModulus);
        }

        // Check that de ≡ 1 mod p-1, and de ≡ 1 mod q-1.
        //
        // Together these imply de ≡ 1 mod lcm(p-1, q-1), so a^de ≡ a mod n for
        // every a.
        let de = &self.d * self.e();
        for prime in [p, q] {
            let congruence = &de % (prime - &one);
            if !congruence.is_one() {
                return Err(Error::InvalidExponent);
            }
        }

        Ok(())
    }
}

impl PrivateKeyParts for RsaPrivateKey {
    fn d(&self) -> &BigUint {
        &self.d
    }

    fn primes(&self) -> &[BigUint] {
        &self.primes
    }

    fn dp(&self) -> &BigUint {
        &self.precomputed.dp
    }

    fn dq(&self) -> &BigUint {
        &self.precomputed.dq
    }

    fn qinv(&self) -> &BigUint {
        &self.precomputed.qinv
    }
}

/// Computes `d mod (p-1)`, `d mod (q-1)` and `q^-1 mod p`.
fn precompute(d: &BigUint, p: &BigUint, q: &BigUint) -> Result<PrecomputedValues> {
    let one = BigUint::one();
    if p <= &one || q <= &one {
        return Err(Error::InvalidPrime);
    }

    let dp = d % (p - &one);
    let dq = d % (q - &one);
    let qinv = mod_inverse(q, p).ok_or(Error::InvalidPrime)?;

    Ok(PrecomputedValues { dp, dq, qinv })
}

/// Check that the public key is well formed and has an exponent within acceptable bounds.
#[inline]
pub(crate) fn check_public(public_key: &impl PublicKeyParts) -> Result<()> {
    let n = public_key.n();
    if n.is_zero() || n.is_even() {
        return Err(Error::InvalidModulus);
    }

    let e = public_key
        .e()
        .to_u64()
        .ok_or(Error::PublicExponentTooLarge)?;

    if e < RsaPublicKey::MIN_PUB_EXPONENT {
        return Err(Error::PublicExponentTooSmall);
    }

    if e > RsaPublicKey::MAX_PUB_EXPONENT {
        return Err(Error::PublicExponentTooLarge);
    }

    if public_key.e() >= n {
        return Err(Error::InvalidExponent);
    }

    Ok(())
}

/// An RSA key parameter set: either a public key or a full private key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RsaKeyParameters {
    /// Modulus and public exponent only.
    Public(RsaPublicKey),
    /// All parameters, including the prime factors and CRT values.
    Private(RsaPrivateKey),
}

impl RsaKeyParameters {
    /// Returns `true` if the private parameters are present.
    pub fn is_private(&self) -> bool {
        matches!(self, RsaKeyParameters::Private(_))
    }

    /// Get the public half `{n, e}` of these parameters.
    pub fn public_view(&self) -> RsaPublicKey {
        match self {
            RsaKeyParameters::Public(key) => key.clone(),
            RsaKeyParameters::Private(key) => key.public_view(),
        }
    }

    /// Returns the private key, if these parameters hold one.
    pub fn into_private(self) -> Option<RsaPrivateKey> {
        match self {
            RsaKeyParameters::Private(key) => Some(key),
            RsaKeyParameters::Public(_) => None,
        }
    }
}

impl PublicKeyParts for RsaKeyParameters {
    fn n(&self) -> &BigUint {
        match self {
            RsaKeyParameters::Public(key) => key.n(),
            RsaKeyParameters::Private(key) => key.n(),
        }
    }

    fn e(&self) -> &BigUint {
        match self {
            RsaKeyParameters::Public(key) => key.e(),
            RsaKeyParameters::Private(key) => key.e(),
        }
    }
}

impl From<RsaPublicKey> for RsaKeyParameters {
    fn from(key: RsaPublicKey) -> Self {
        RsaKeyParameters::Public(key)
    }
}

impl From<RsaPrivateKey> for RsaKeyParameters {
    fn from(key: RsaPrivateKey) -> Self {
        RsaKeyParameters::Private(key)
    }
}
