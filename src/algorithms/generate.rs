//! Generate prime components for the RSA Private Key

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand_core::CryptoRngCore;

use crate::errors::{Error, Result};
use crate::key::RsaPrivateKey;
use crate::math::mod_inverse;
use crate::prime::{coprime_to_exponent, generate_prime};

/// Smallest modulus size accepted by [`generate_key`].
pub const MIN_KEY_BITS: usize = 64;

/// Number of prime pairs drawn before key generation gives up.
pub(crate) const MAX_KEY_ATTEMPTS: usize = 64;

/// Generates a two-prime RSA keypair of the given bit size, public exponent,
/// and the given random source.
///
/// The primes have `bit_size / 2` and `bit_size - bits(p)` bits with their top
/// two bits set, so `n = p * q` has exactly `bit_size` bits. Pairs where
/// `p == q` or where `e` shares a factor with `p - 1` or `q - 1` are redrawn.
/// The private exponent is `e^-1 mod lcm(p - 1, q - 1)`.
pub(crate) fn generate_key<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_size: usize,
    exp: &BigUint,
) -> Result<RsaPrivateKey> {
    if bit_size < MIN_KEY_BITS {
        return Err(Error::ModulusTooSmall(bit_size));
    }

    let one = BigUint::one();

    for attempt in 1..=MAX_KEY_ATTEMPTS {
        let p = generate_prime(rng, bit_size / 2)
            .ok_or(Error::KeyGenerationFailure { attempts: attempt })?;
        let q = generate_prime(rng, bit_size - p.bits())
            .ok_or(Error::KeyGenerationFailure { attempts: attempt })?;

        if p == q {
            continue;
        }

        if !coprime_to_exponent(&p, exp) || !coprime_to_exponent(&q, exp) {
            log::trace!("prime pair rejected: not coprime to e");
            continue;
        }

        let n = &p * &q;
        if n.bits() != bit_size {
            // generate_prime sets the top two bits in each prime, so this
            // should never happen.
            continue;
        }

        let lambda = (&p - &one).lcm(&(&q - &one));
        let Some(d) = mod_inverse(exp, &lambda) else {
            continue;
        };

        log::debug!("generated {}-bit key after {} attempt(s)", bit_size, attempt);
        return RsaPrivateKey::from_components(n, exp.clone(), d, p, q);
    }

    Err(Error::KeyGenerationFailure {
        attempts: MAX_KEY_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{PrivateKeyParts, PublicKeyParts};
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    use rand_core::{CryptoRng, RngCore};

    const EXP: u64 = 65537;

    #[test]
    fn test_impossible_keys() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let exp = BigUint::from(EXP);
        for i in 0..MIN_KEY_BITS {
            let res = generate_key(&mut rng, i, &exp);
            assert!(matches!(res, Err(Error::ModulusTooSmall(bits)) if bits == i));
        }
    }

    macro_rules! key_generation {
        ($name:ident, $size:expr) => {
            #[test]
            fn $name() {
                let mut rng = ChaCha8Rng::from_seed([42; 32]);
                let exp = BigUint::from(EXP);

                for _ in 0..5 {
                    let private_key = generate_key(&mut rng, $size, &exp).unwrap();
                    assert_eq!(private_key.n().bits(), $size);
                    assert_eq!(private_key.e(), &exp);
                    assert_eq!(private_key.primes().len(), 2);
                    assert!(private_key.validate().is_ok());
                }
            }
        };
    }

    key_generation!(key_generation_64, 64);
    key_generation!(key_generation_128, 128);
    key_generation!(key_generation_512, 512);
    key_generation!(key_generation_1024, 1024);

    #[test]
    fn test_odd_bit_size() {
        let mut rng = ChaCha8Rng::from_seed([7; 32]);
        let key = generate_key(&mut rng, 521, &BigUint::from(EXP)).unwrap();
        assert_eq!(key.n().bits(), 521);
        let [p, q] = key.primes() else {
            panic!("expected two primes")
        };
        assert_eq!(p.bits(), 260);
        assert_eq!(q.bits(), 261);
    }

    /// Produces only zero bytes, so every prime candidate is the same number.
    struct StuckRng;

    impl RngCore for StuckRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    impl CryptoRng for StuckRng {}

    #[test]
    fn test_generation_failure() {
        let res = generate_key(&mut StuckRng, 512, &BigUint::from(EXP));
        assert!(matches!(res, Err(Error::KeyGenerationFailure { .. })));
    }
}
