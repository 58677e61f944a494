//! Powers of a scalar and evaluation "in the exponent"
//!
//! [`compute_powers`] produces `[x^0, …, x^(n-1)]` in the field. Once those
//! powers are encoded as group elements (`x^i · G`), a polynomial can be
//! evaluated against them with [`evaluate_on_encoded_powers`] without ever
//! knowing `x`: the result is `p(x) · G`. This is how a committer evaluates
//! at the SRS secret.
//!
//! The group side is abstracted by [`GroupEncoding`], which every arkworks
//! [`CurveGroup`] implements.

#![forbid(unsafe_code)]

use ark_ec::CurveGroup;
use ark_ff::{PrimeField, Zero};

use crate::field::{Field, FieldElement};
use crate::polynomial::Polynomial;

/// Errors raised while evaluating against encoded powers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// Coefficient count and encoded-power count differ.
    #[error("len(coefficients) != len(powers): {coefficients} != {powers}")]
    LengthMismatch {
        /// Number of stored polynomial coefficients.
        coefficients: usize,
        /// Number of encoded powers supplied.
        powers: usize,
    },
}

/// Capability set required from a pairing group.
///
/// Scalars are field elements in canonical form; implementations reduce
/// them into their own scalar field.
pub trait GroupEncoding: Sized + Clone {
    /// The additive identity.
    fn identity() -> Self;
    /// `self + other`.
    fn add(&self, other: &Self) -> Self;
    /// `-self`.
    fn neg(&self) -> Self;
    /// `scalar · self`.
    fn scalar_mul(&self, scalar: &FieldElement) -> Self;
    /// `scalar · G` for the group's fixed generator `G`.
    fn base_mul(scalar: &FieldElement) -> Self;
}

impl<G: CurveGroup> GroupEncoding for G {
    #[inline]
    fn identity() -> Self {
        G::zero()
    }

    #[inline]
    fn add(&self, other: &Self) -> Self {
        *self + *other
    }

    #[inline]
    fn neg(&self) -> Self {
        -*self
    }

    fn scalar_mul(&self, scalar: &FieldElement) -> Self {
        let s = G::ScalarField::from(scalar.clone());
        if s.is_zero() {
            return G::zero();
        }
        self.mul_bigint(s.into_bigint())
    }

    fn base_mul(scalar: &FieldElement) -> Self {
        G::generator().scalar_mul(scalar)
    }
}

/// `[x^0, x^1, …, x^(n-1)]` by repeated multiplication; empty for `n = 0`.
pub fn compute_powers(x: &FieldElement, n: usize, field: &Field) -> Vec<FieldElement> {
    let mut xs = Vec::with_capacity(n);
    if n == 0 {
        return xs;
    }
    xs.push(field.reduce(&FieldElement::from(1u8)));
    for i in 1..n {
        let next = field.mul(&xs[i - 1], x);
        xs.push(next);
    }
    xs
}

/// Encode each scalar as `s · G`.
pub fn encode_powers<G: GroupEncoding>(powers: &[FieldElement]) -> Vec<G> {
    powers.iter().map(G::base_mul).collect()
}

/// `Σ coeff[i] · powers[i]`, starting from the identity.
///
/// `p` must carry exactly one coefficient per encoded power (trailing zero
/// slots included); use [`Polynomial::trimmed`] to drop padding first.
pub fn evaluate_on_encoded_powers<G: GroupEncoding>(
    p: &Polynomial,
    powers: &[G],
) -> Result<G, EncodeError> {
    let coeffs = p.coefficients();
    if coeffs.len() != powers.len() {
        return Err(EncodeError::LengthMismatch {
            coefficients: coeffs.len(),
            powers: powers.len(),
        });
    }

    let mut acc = G::identity();
    for (c, base) in coeffs.iter().zip(powers) {
        acc = acc.add(&base.scalar_mul(c));
    }
    Ok(acc)
}
