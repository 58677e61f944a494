//! Modular arithmetic over a configurable order
//!
//! Elements are arbitrary-precision integers ([`FieldElement`] = `BigUint`)
//! kept in canonical form `[0, order)`. Every operation returns a freshly
//! reduced value and never mutates its inputs.
//!
//! Operations do **not** run in constant time. This module is not meant to
//! resist side channels.
//!
//! The order is usually the scalar field of a pairing-friendly curve (see
//! [`Field::bn254`]), but any modulus `>= 2` is accepted so that small test
//! rings (mod 2, mod 100) behave exactly like the reference tables. When the
//! modulus is not prime some elements have no inverse, and [`Field::div`]
//! surfaces that as [`FieldError::NoInverse`].

#![forbid(unsafe_code)]

use ark_ff::PrimeField;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use std::fmt;

/// Canonical field element: an integer in `[0, order)`.
pub type FieldElement = BigUint;

/// Errors raised by field arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// `value` shares a nontrivial factor with the order (always true for 0).
    #[error("{value} has no multiplicative inverse modulo {order}")]
    NoInverse {
        /// The non-invertible operand.
        value: FieldElement,
        /// The field order.
        order: BigUint,
    },
    /// A precondition on an argument was violated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The caller-supplied random source failed.
    #[error("random source failed: {0}")]
    RandomSource(String),
}

/// Residues modulo `order`. Immutable once constructed.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Field {
    order: BigUint,
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").field("order", &self.order.to_str_radix(10)).finish()
    }
}

impl Field {
    /// Create a field of the given order (at least 2).
    pub fn new(order: BigUint) -> Result<Self, FieldError> {
        if order < BigUint::from(2u8) {
            return Err(FieldError::InvalidArgument(format!(
                "field order must be >= 2 (got {order})"
            )));
        }
        Ok(Self { order })
    }

    /// Field whose order is the modulus of an arkworks prime field.
    pub fn from_prime_field<Fp: PrimeField>() -> Self {
        Self { order: Fp::MODULUS.into() }
    }

    /// The BN254 scalar field, matching the default pairing groups.
    pub fn bn254() -> Self {
        Self::from_prime_field::<ark_bn254::Fr>()
    }

    /// The field order.
    #[inline]
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    /// Reduce an arbitrary unsigned integer into the field.
    #[inline]
    pub fn reduce(&self, x: &BigUint) -> FieldElement {
        x % &self.order
    }

    /// Reduce a signed integer into the field (negative values wrap around).
    pub fn reduce_bigint(&self, x: &BigInt) -> FieldElement {
        let order = BigInt::from_biguint(Sign::Plus, self.order.clone());
        // mod_floor keeps the sign of the modulus, so the result is non-negative.
        x.mod_floor(&order)
            .to_biguint()
            .unwrap_or_else(BigUint::zero)
    }

    /// Reduce an `i64` into the field.
    #[inline]
    pub fn reduce_i64(&self, x: i64) -> FieldElement {
        self.reduce_bigint(&BigInt::from(x))
    }

    /// Embed a small unsigned value.
    #[inline]
    pub fn element(&self, x: u64) -> FieldElement {
        self.reduce(&BigUint::from(x))
    }

    /// `x + y mod order`.
    #[inline]
    pub fn add(&self, x: &FieldElement, y: &FieldElement) -> FieldElement {
        (x + y) % &self.order
    }

    /// `x - y mod order`.
    pub fn sub(&self, x: &FieldElement, y: &FieldElement) -> FieldElement {
        let x = self.reduce(x);
        let y = self.reduce(y);
        if x >= y {
            x - y
        } else {
            &self.order - (y - x)
        }
    }

    /// `-x mod order`.
    #[inline]
    pub fn neg(&self, x: &FieldElement) -> FieldElement {
        self.sub(&BigUint::zero(), x)
    }

    /// `x * y mod order`.
    #[inline]
    pub fn mul(&self, x: &FieldElement, y: &FieldElement) -> FieldElement {
        (x * y) % &self.order
    }

    /// `x^y mod order`.
    #[inline]
    pub fn exp(&self, x: &FieldElement, y: &BigUint) -> FieldElement {
        x.modpow(y, &self.order)
    }

    /// Multiplicative inverse of `x`.
    ///
    /// Fails with [`FieldError::NoInverse`] when `gcd(x, order) != 1`.
    pub fn multiplicative_inverse(&self, x: &FieldElement) -> Result<FieldElement, FieldError> {
        let x = self.reduce(x);
        x.modinv(&self.order).ok_or_else(|| FieldError::NoInverse {
            value: x,
            order: self.order.clone(),
        })
    }

    /// `x * y^-1 mod order`.
    pub fn div(&self, x: &FieldElement, y: &FieldElement) -> Result<FieldElement, FieldError> {
        let inv = self.multiplicative_inverse(y)?;
        Ok(self.mul(x, &inv))
    }

    /// Draw a uniformly random element of `[0, order)`.
    ///
    /// Uses rejection sampling over `bits(order)`-bit candidates, so the
    /// expected number of draws is below two.
    pub fn random_element<R>(&self, rng: &mut R) -> Result<FieldElement, FieldError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let bits = self.order.bits();
        let n_bytes = ((bits + 7) / 8) as usize;
        // Bits to clear in the most significant byte.
        let excess = (n_bytes as u64) * 8 - bits;
        let top_mask = 0xffu8 >> excess;

        let mut buf = vec![0u8; n_bytes];
        loop {
            rng.try_fill_bytes(&mut buf)
                .map_err(|e| FieldError::RandomSource(e.to_string()))?;
            buf[0] &= top_mask;
            let candidate = BigUint::from_bytes_be(&buf);
            if candidate < self.order {
                return Ok(candidate);
            }
        }
    }

    /// Random nonzero element, resampling on zero.
    pub fn random_nonzero_element<R>(&self, rng: &mut R) -> Result<FieldElement, FieldError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        loop {
            let x = self.random_element(rng)?;
            if !x.is_zero() {
                return Ok(x);
            }
        }
    }

    /// A random `n`-th root of unity; `n` must be even and nonzero.
    ///
    /// If `n` does not divide `order - 1` the only root available is `1`,
    /// which is returned whatever `primitive` says. Otherwise a random
    /// nonzero `x` is raised to `(order - 1) / n`. A primitive root must also
    /// satisfy `root^(n/2) != 1`; candidates failing that are resampled.
    ///
    /// In a prime field a primitive candidate is accepted with probability at
    /// least 1/2, so the loop terminates with probability 1 but has no fixed
    /// bound on the number of draws.
    ///
    /// Candidates that share a factor with the order are resampled, so the
    /// result is always a unit. With a composite order the result need not be
    /// an `n`-th root of unity; use a prime order for meaningful roots.
    pub fn nth_root_of_unity<R>(
        &self,
        rng: &mut R,
        n: u64,
        primitive: bool,
    ) -> Result<FieldElement, FieldError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        if n == 0 || n % 2 == 1 {
            return Err(FieldError::InvalidArgument(format!(
                "can only calculate nonzero even roots of unity; n = {n}"
            )));
        }

        let big_n = BigUint::from(n);
        let q_sub_1 = &self.order - BigUint::one();
        let (exponent, rem) = q_sub_1.div_rem(&big_n);
        if !rem.is_zero() {
            return Ok(BigUint::one());
        }

        let half_n = BigUint::from(n / 2);
        let mut attempts = 0u64;
        loop {
            attempts += 1;
            let x = self.random_nonzero_element(rng)?;
            if !x.gcd(&self.order).is_one() {
                continue;
            }
            let root = self.exp(&x, &exponent);
            if !primitive || !self.exp(&root, &half_n).is_one() {
                tracing::trace!(n, primitive, attempts, "found root of unity");
                return Ok(root);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn small(order: u64) -> Field {
        Field::new(BigUint::from(order)).expect("valid order")
    }

    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0)
        }
        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy pool drained"))
        }
    }

    impl CryptoRng for BrokenRng {}

    #[test]
    fn rejects_degenerate_orders() {
        assert!(Field::new(BigUint::zero()).is_err());
        assert!(Field::new(BigUint::one()).is_err());
        assert!(Field::new(BigUint::from(2u32)).is_ok());
        assert!(Field::new(BigUint::from(100u32)).is_ok());
    }

    #[test]
    fn basic_ops_stay_reduced() {
        let f = small(7);
        let (a, b) = (f.element(5), f.element(4));
        assert_eq!(f.add(&a, &b), f.element(2));
        assert_eq!(f.sub(&b, &a), f.element(6));
        assert_eq!(f.mul(&a, &b), f.element(6));
        assert_eq!(f.neg(&a), f.element(2));
        assert_eq!(f.neg(&BigUint::zero()), BigUint::zero());
        assert_eq!(f.exp(&f.element(3), &BigUint::from(6u8)), BigUint::one());
        assert_eq!(f.reduce_i64(-1), f.element(6));
        assert_eq!(f.reduce_i64(-15), f.element(6));
    }

    #[test]
    fn inverse_and_division() {
        let f = small(7);
        assert_eq!(f.multiplicative_inverse(&f.element(3)).unwrap(), f.element(5));
        assert_eq!(f.div(&f.element(6), &f.element(3)).unwrap(), f.element(2));

        let err = f.multiplicative_inverse(&BigUint::zero()).unwrap_err();
        assert!(matches!(err, FieldError::NoInverse { .. }));
    }

    #[test]
    fn composite_order_reports_missing_inverse() {
        let f = small(100);
        let err = f.div(&f.element(1), &f.element(10)).unwrap_err();
        assert_eq!(
            err,
            FieldError::NoInverse { value: f.element(10), order: BigUint::from(100u32) }
        );
        assert_eq!(f.multiplicative_inverse(&f.element(3)).unwrap(), f.element(67));
    }

    #[test]
    fn random_elements_are_in_range() {
        let f = small(257);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert!(f.random_element(&mut rng).unwrap() < *f.order());
        }
        let big = Field::bn254();
        assert!(big.random_element(&mut rng).unwrap() < *big.order());
    }

    #[test]
    fn random_source_failure_is_surfaced() {
        let f = small(257);
        let err = f.random_element(&mut BrokenRng).unwrap_err();
        assert!(matches!(err, FieldError::RandomSource(msg) if msg.contains("drained")));
    }

    #[test]
    fn roots_of_unity() {
        let f = small(17);
        let mut rng = StdRng::seed_from_u64(1);

        let root = f.nth_root_of_unity(&mut rng, 8, false).unwrap();
        assert!(f.exp(&root, &BigUint::from(8u8)).is_one());

        for _ in 0..20 {
            let root = f.nth_root_of_unity(&mut rng, 4, true).unwrap();
            assert!(f.exp(&root, &BigUint::from(4u8)).is_one());
            assert!(!f.exp(&root, &BigUint::from(2u8)).is_one());
        }
    }

    #[test]
    fn root_of_unity_edge_cases() {
        let f = small(17);
        let mut rng = StdRng::seed_from_u64(2);
        assert!(matches!(
            f.nth_root_of_unity(&mut rng, 3, false),
            Err(FieldError::InvalidArgument(_))
        ));
        assert!(f.nth_root_of_unity(&mut rng, 0, true).is_err());
        // 6 does not divide 16.
        assert_eq!(f.nth_root_of_unity(&mut rng, 6, true).unwrap(), BigUint::one());
        // order - 1 is odd for an even order, so no even n divides it.
        assert_eq!(small(100).nth_root_of_unity(&mut rng, 2, true).unwrap(), BigUint::one());
    }

    #[test]
    fn roots_over_composite_orders_are_units() {
        // mod 9: 3^4 = 0 would pass the primitive test if 3 were drawn.
        let f = small(9);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let root = f.nth_root_of_unity(&mut rng, 2, true).unwrap();
            assert!(!root.is_zero());
            assert!(f.multiplicative_inverse(&root).is_ok());
        }
    }

    #[test]
    fn bn254_order_matches_arkworks() {
        let f = Field::bn254();
        let minus_one: BigUint = (-ark_bn254::Fr::from(1u64)).into();
        assert_eq!(f.neg(&BigUint::one()), minus_one);
    }
}
