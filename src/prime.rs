//! Probabilistic primality testing and generation of random primes.

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::math::mod_pow;

/// Number of Miller-Rabin rounds applied to prime candidates.
pub const MILLER_RABIN_ROUNDS: usize = 20;

/// Number of candidates [`generate_prime`] examines before giving up.
const MAX_PRIME_CANDIDATES: usize = 1 << 14;

/// A list of small, prime numbers that allows us to rapidly
/// exclude some fraction of composite candidates when searching for a random
/// prime. This list is truncated at the point where `SMALL_PRIMES_PRODUCT`
/// exceeds a u64. It does not include two because we ensure that the
/// candidates are odd by construction.
const SMALL_PRIMES: [u8; 15] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// The product of the values in `SMALL_PRIMES`. A candidate is reduced by this
/// number once, after which coprimality with every small prime can be checked
/// in u64 arithmetic.
const SMALL_PRIMES_PRODUCT: u64 = 16_294_579_238_595_022_365;

/// Reports whether `x` is probably prime.
///
/// Values below 54 are answered exactly from `SMALL_PRIMES`; larger ones are
/// trial-divided and then put through `reps` rounds of Miller-Rabin, the first
/// with base 2 and the rest with bases drawn from `rng`. The probability of
/// accepting a composite is at most ¼ʳᵉᵖˢ.
pub fn probably_prime<R: CryptoRngCore + ?Sized>(rng: &mut R, x: &BigUint, reps: usize) -> bool {
    if let Some(small) = x.to_u64() {
        if small < 2 {
            return false;
        }
        if small == 2 {
            return true;
        }
        if small <= 53 {
            return SMALL_PRIMES.iter().any(|&p| u64::from(p) == small);
        }
    }

    if x.is_even() {
        return false;
    }

    let rem = (x % SMALL_PRIMES_PRODUCT).to_u64().unwrap_or(0);
    if SMALL_PRIMES.iter().any(|&p| rem % u64::from(p) == 0) {
        return false;
    }

    miller_rabin(rng, x, reps.max(1))
}

/// Reports whether the odd number `n > 53` passes `reps` rounds of the
/// Miller-Rabin test.
/// See Handbook of Applied Cryptography, p. 139, Algorithm 4.24.
fn miller_rabin<R: CryptoRngCore + ?Sized>(rng: &mut R, n: &BigUint, reps: usize) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let nm1 = n - &one;
    let nm3 = n - BigUint::from(3u32);

    // n - 1 = q * 2^k with q odd
    let mut q = nm1.clone();
    let mut k = 0usize;
    while q.is_even() {
        q >>= 1;
        k += 1;
    }

    'next: for round in 0..reps {
        let a = if round == 0 {
            two.clone()
        } else {
            rng.gen_biguint_below(&nm3) + &two
        };

        let mut y = mod_pow(&a, &q, n);
        if y.is_one() || y == nm1 {
            continue;
        }

        for _ in 1..k {
            y = &y * &y % n;
            if y == nm1 {
                continue 'next;
            }
            if y.is_one() {
                return false;
            }
        }
        return false;
    }

    true
}

/// Generates a random prime of exactly `bit_size` bits whose top two bits are
/// set, so the product of two such primes is never one bit short.
///
/// Returns `None` if no prime was found among the candidates examined.
pub fn generate_prime<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_size: usize) -> Option<BigUint> {
    if bit_size < 2 {
        return None;
    }

    let mut b = bit_size % 8;
    if b == 0 {
        b = 8;
    }

    let bytes_len = (bit_size + 7) / 8;
    let mut bytes = vec![0u8; bytes_len];

    for _ in 0..MAX_PRIME_CANDIDATES {
        rng.fill_bytes(&mut bytes);
        // Clear bits in the first byte to make sure the candidate has a size <= bits.
        bytes[0] &= ((1u32 << b) - 1) as u8;

        if b >= 2 {
            bytes[0] |= 3u8.wrapping_shl(b as u32 - 2);
        } else {
            // Here b==1, because b cannot be zero.
            bytes[0] |= 1;
            if bytes_len > 1 {
                bytes[1] |= 0x80;
            }
        }

        // Make the value odd since an even number this large certainly isn't prime.
        bytes[bytes_len - 1] |= 1u8;

        let mut p = BigUint::from_bytes_be(&bytes);
        let rem = (&p % SMALL_PRIMES_PRODUCT).to_u64().unwrap_or(0);

        'delta: for delta in (0..1u64 << 20).step_by(2) {
            let m = rem + delta;

            for &prime in SMALL_PRIMES.iter() {
                let prime = u64::from(prime);
                if m % prime == 0 && (bit_size > 6 || m != prime) {
                    continue 'delta;
                }
            }

            if delta > 0 {
                p += delta;
            }

            break;
        }

        // Adding delta may have made the number one bit too long.
        if p.bits() == bit_size && probably_prime(rng, &p, MILLER_RABIN_ROUNDS) {
            bytes.zeroize();
            return Some(p);
        }
    }

    log::debug!("no {}-bit prime after {} candidates", bit_size, MAX_PRIME_CANDIDATES);
    None
}

/// Reports whether `p` is coprime to `e`, i.e. `gcd(e, p - 1)` is one.
pub(crate) fn coprime_to_exponent(p: &BigUint, e: &BigUint) -> bool {
    if p.is_zero() {
        return false;
    }
    e.gcd(&(p - BigUint::one())).is_one()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    #[test]
    fn test_small_values() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let primes: Vec<u64> = (0..200u64)
            .filter(|&n| probably_prime(&mut rng, &BigUint::from_u64(n).unwrap(), 10))
            .collect();

        assert_eq!(
            primes,
            vec![
                2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73,
                79, 83, 89, 97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163,
                167, 173, 179, 181, 191, 193, 197, 199
            ]
        );
    }

    #[test]
    fn test_composites() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        // Carmichael numbers and a strong pseudoprime to base 2.
        for n in [561u64, 1105, 1729, 2465, 2821, 6601, 8911, 2047, 3215031751] {
            assert!(
                !probably_prime(&mut rng, &BigUint::from_u64(n).unwrap(), MILLER_RABIN_ROUNDS),
                "{} is composite",
                n
            );
        }
    }

    #[test]
    fn test_large_primes() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        // 2^127 - 1 and 2^521 - 1 are Mersenne primes.
        for exp in [127usize, 521] {
            let p = (BigUint::one() << exp) - BigUint::one();
            assert!(probably_prime(&mut rng, &p, MILLER_RABIN_ROUNDS));
            let composite = &p * BigUint::from(3u32);
            assert!(!probably_prime(&mut rng, &composite, MILLER_RABIN_ROUNDS));
        }
    }

    #[test]
    fn test_prime_small() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        for n in 2..10 {
            let p = generate_prime(&mut rng, n).unwrap();

            assert_eq!(p.bits(), n);
            assert!(probably_prime(&mut rng, &p, 32));
        }
    }

    #[test]
    fn test_gen_prime_1024() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        let p = generate_prime(&mut rng, 1024).unwrap();
        assert_eq!(p.bits(), 1024);
    }

    #[test]
    fn test_gen_prime_too_small() {
        let mut rng = ChaCha8Rng::from_seed([0u8; 32]);
        assert_eq!(generate_prime(&mut rng, 1), None);
    }
}
