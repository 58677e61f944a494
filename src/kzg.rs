//! KZG commitments: commit, open, verify
//!
//! # Protocol
//!
//! Given an [`Srs`] encoding powers of a discarded secret `s`:
//!
//! - **Commit** `p`: `C = p(s)·G₁`, computed from the encoded powers.
//! - **Open** at `z`: `y = p(z)` and `q(v) = (p(v) − y) / (v − z)`. The
//!   division is exact iff `p(z) = y`; a nonzero remainder is reported as
//!   [`KzgError::InvalidEvaluation`] and no proof is produced. The proof is
//!   `q(s)` encoded in G2 (default) or G1.
//! - **Verify** `(C, z, y, π)` with a single pairing-product check:
//!
//! ```text
//! π ∈ G2:  e([s]₁ − z·G₁, π) · e(−(C − y·G₁), G₂) = 1
//! π ∈ G1:  e(π, [s]₂ − z·G₂) · e(−(C − y·G₁), G₂) = 1
//! ```
//!
//! Both sides equal `e(G₁, G₂)^{(s−z)·q(s) − (p(s)−y)}`, so the check holds
//! exactly when `p(s) − y = (s − z)·q(s)`. Which group carries the quotient
//! does not change the outcome (bilinearity).
//!
//! Every function here is pure: the SRS is borrowed immutably and all
//! results are freshly allocated.
//!
//! ## Set membership
//! Encode a hidden set as the roots of `p` ([`Polynomial::from_roots`]). An
//! opening at `z` with `y = 0` that verifies proves `z` is in the set without
//! revealing the other members.

#![forbid(unsafe_code)]

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, Group};
use ark_ff::One;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, Read, SerializationError, Valid, Validate,
    Write,
};
use std::fmt;
use std::str::FromStr;

use crate::field::FieldElement;
use crate::polynomial::{PolyError, Polynomial};
use crate::powers::{evaluate_on_encoded_powers, EncodeError, GroupEncoding};
use crate::srs_setup::Srs;

/// Errors raised by commit/open.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KzgError {
    /// The polynomial needs more powers than the SRS carries.
    #[error("polynomial degree {degree} exceeds SRS max degree {max_degree}")]
    DegreeTooLarge {
        /// Degree of the polynomial.
        degree: usize,
        /// Maximum degree supported by the SRS.
        max_degree: usize,
    },
    /// `(p − y) / (v − z)` left a remainder: `p(z) != y`.
    #[error(
        "claimed evaluation is inconsistent at point {point}: dividing a degree-{dividend_degree} \
         polynomial by (v - z) left a degree-{remainder_degree} remainder"
    )]
    InvalidEvaluation {
        /// The evaluation point `z`.
        point: FieldElement,
        /// Degree of `p − y`.
        dividend_degree: usize,
        /// Degree of the nonzero remainder.
        remainder_degree: usize,
    },
    /// Coefficient/power count mismatch.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// Polynomial arithmetic failed.
    #[error(transparent)]
    Poly(#[from] PolyError),
}

/// Which pairing group carries the opening proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuotientGroup {
    /// Quotient encoded in G1; verifier uses `[s]₂`.
    G1,
    /// Quotient encoded in G2; verifier uses `[s]₁`.
    #[default]
    G2,
}

impl QuotientGroup {
    /// The other group.
    #[inline]
    pub fn swapped(self) -> Self {
        match self {
            QuotientGroup::G1 => QuotientGroup::G2,
            QuotientGroup::G2 => QuotientGroup::G1,
        }
    }
}

impl fmt::Display for QuotientGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuotientGroup::G1 => write!(f, "g1"),
            QuotientGroup::G2 => write!(f, "g2"),
        }
    }
}

impl FromStr for QuotientGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "g1" | "1" => Ok(QuotientGroup::G1),
            "g2" | "2" => Ok(QuotientGroup::G2),
            other => Err(format!("unknown quotient group `{other}` (expected g1 or g2)")),
        }
    }
}

/// Commitment to a polynomial: `p(s)·G₁`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commitment<E: Pairing>(pub E::G1Affine);

impl<E: Pairing> CanonicalSerialize for Commitment<E> {
    fn serialize_with_mode<W: Write>(
        &self,
        w: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        self.0.serialize_with_mode(w, compress)
    }

    fn serialized_size(&self, compress: Compress) -> usize {
        self.0.serialized_size(compress)
    }
}

impl<E: Pairing> CanonicalDeserialize for Commitment<E> {
    fn deserialize_with_mode<R: Read>(
        r: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        Ok(Commitment(E::G1Affine::deserialize_with_mode(r, compress, validate)?))
    }
}

impl<E: Pairing> Valid for Commitment<E> {
    fn check(&self) -> Result<(), SerializationError> {
        self.0.check()
    }
}

/// Opening proof: the quotient `q(s)` in G1 or G2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpeningProof<E: Pairing> {
    /// `q(s)·G₁`.
    G1(E::G1Affine),
    /// `q(s)·G₂`.
    G2(E::G2Affine),
}

impl<E: Pairing> OpeningProof<E> {
    /// Group carrying this proof.
    #[inline]
    pub fn group(&self) -> QuotientGroup {
        match self {
            OpeningProof::G1(_) => QuotientGroup::G1,
            OpeningProof::G2(_) => QuotientGroup::G2,
        }
    }
}

// Manual canonical ser/de: a one-byte group tag followed by the point.
impl<E: Pairing> CanonicalSerialize for OpeningProof<E> {
    fn serialize_with_mode<W: Write>(
        &self,
        mut w: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        match self {
            OpeningProof::G1(p) => {
                w.write_all(&[1u8])?;
                p.serialize_with_mode(w, compress)
            }
            OpeningProof::G2(p) => {
                w.write_all(&[2u8])?;
                p.serialize_with_mode(w, compress)
            }
        }
    }

    fn serialized_size(&self, compress: Compress) -> usize {
        1 + match self {
            OpeningProof::G1(p) => p.serialized_size(compress),
            OpeningProof::G2(p) => p.serialized_size(compress),
        }
    }
}

impl<E: Pairing> CanonicalDeserialize for OpeningProof<E> {
    fn deserialize_with_mode<R: Read>(
        mut r: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let mut tag = [0u8; 1];
        r.read_exact(&mut tag)?;
        match tag[0] {
            1 => Ok(OpeningProof::G1(E::G1Affine::deserialize_with_mode(r, compress, validate)?)),
            2 => Ok(OpeningProof::G2(E::G2Affine::deserialize_with_mode(r, compress, validate)?)),
            _ => Err(SerializationError::InvalidData),
        }
    }
}

impl<E: Pairing> Valid for OpeningProof<E> {
    fn check(&self) -> Result<(), SerializationError> {
        match self {
            OpeningProof::G1(p) => p.check(),
            OpeningProof::G2(p) => p.check(),
        }
    }
}

/// A claimed evaluation `p(point) = value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationClaim {
    /// Evaluation point `z`.
    pub point: FieldElement,
    /// Claimed value `y`.
    pub value: FieldElement,
}

/// Result of [`open`]: the claim and its proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opening<E: Pairing> {
    /// `(z, y)` with `y = p(z)`.
    pub claim: EvaluationClaim,
    /// Quotient commitment.
    pub proof: OpeningProof<E>,
}

fn ensure_fits<E: Pairing>(srs: &Srs<E>, degree: usize) -> Result<(), KzgError> {
    if degree + 1 > srs.len() {
        return Err(KzgError::DegreeTooLarge { degree, max_degree: srs.max_degree() });
    }
    Ok(())
}

/// Commit to `p`: evaluate it against the G1 powers.
pub fn commit<E: Pairing>(srs: &Srs<E>, p: &Polynomial) -> Result<Commitment<E>, KzgError> {
    let degree = p.degree();
    ensure_fits(srs, degree)?;
    let c = evaluate_on_encoded_powers(&p.trimmed(), &srs.g1_powers()[..=degree])?;
    tracing::debug!(degree, "committed polynomial");
    Ok(Commitment(c.into_affine()))
}

/// Open `p` at `z`, computing the value `y = p(z)` and the proof.
pub fn open<E: Pairing>(
    srs: &Srs<E>,
    p: &Polynomial,
    z: &FieldElement,
    group: QuotientGroup,
) -> Result<Opening<E>, KzgError> {
    let y = p.evaluate(z, srs.field());
    open_claimed(srs, p, z, &y, group)
}

/// Open `p` at `z` for a value supplied by the prover.
///
/// Fails with [`KzgError::DegreeTooLarge`] if `p` could not have been
/// committed, and with [`KzgError::InvalidEvaluation`] if `p(z) != y`.
pub fn open_claimed<E: Pairing>(
    srs: &Srs<E>,
    p: &Polynomial,
    z: &FieldElement,
    y: &FieldElement,
    group: QuotientGroup,
) -> Result<Opening<E>, KzgError> {
    ensure_fits(srs, p.degree())?;
    let field = srs.field();
    let z = field.reduce(z);
    let y = field.reduce(y);

    let numerator = p.sub(&Polynomial::constant(y.clone(), field), field);
    let (q, r) = numerator.divide(&Polynomial::linear_factor(&z, field), field)?;
    if !r.is_zero() {
        return Err(KzgError::InvalidEvaluation {
            point: z,
            dividend_degree: numerator.degree(),
            remainder_degree: r.degree(),
        });
    }

    let degree = q.degree();
    ensure_fits(srs, degree)?;
    let q = q.trimmed();
    let proof = match group {
        QuotientGroup::G1 => {
            OpeningProof::G1(evaluate_on_encoded_powers(&q, &srs.g1_powers()[..=degree])?.into_affine())
        }
        QuotientGroup::G2 => {
            OpeningProof::G2(evaluate_on_encoded_powers(&q, &srs.g2_powers()[..=degree])?.into_affine())
        }
    };
    tracing::debug!(quotient_degree = degree, %group, "opened polynomial");

    Ok(Opening { claim: EvaluationClaim { point: z, value: y }, proof })
}

/// Check that `commitment` opens to `y` at `z`.
///
/// Returns `true` only if the pairing product is the identity.
pub fn verify<E: Pairing>(
    srs: &Srs<E>,
    commitment: &Commitment<E>,
    z: &FieldElement,
    y: &FieldElement,
    proof: &OpeningProof<E>,
) -> bool {
    let g1 = E::G1::generator();
    let g2 = E::G2::generator();

    // −(C − y·G₁)
    let minus_c_minus_y = -(commitment.0.into_group() - E::G1::base_mul(y));

    let ok = match proof {
        OpeningProof::G2(pi) => {
            // [s − z]₁
            let s_minus_z = srs.g1_powers()[1] - g1.scalar_mul(z);
            pairing_check::<E>(&[s_minus_z, minus_c_minus_y], &[pi.into_group(), g2])
        }
        OpeningProof::G1(pi) => {
            // [s − z]₂
            let s_minus_z = srs.g2_powers()[1] - g2.scalar_mul(z);
            pairing_check::<E>(&[pi.into_group(), minus_c_minus_y], &[s_minus_z, g2])
        }
    };
    tracing::debug!(group = %proof.group(), ok, "verified opening");
    ok
}

/// [`verify`] for an [`Opening`] returned by [`open`].
pub fn verify_opening<E: Pairing>(
    srs: &Srs<E>,
    commitment: &Commitment<E>,
    opening: &Opening<E>,
) -> bool {
    verify(srs, commitment, &opening.claim.point, &opening.claim.value, &opening.proof)
}

/// `∏ e(g1s[i], g2s[i]) == 1`.
///
/// Mismatched lengths are rejected; an empty product is the identity.
pub fn pairing_check<E: Pairing>(g1s: &[E::G1], g2s: &[E::G2]) -> bool {
    if g1s.len() != g2s.len() {
        return false;
    }
    let a: Vec<E::G1Prepared> = g1s.iter().map(E::G1Prepared::from).collect();
    let b: Vec<E::G2Prepared> = g2s.iter().map(E::G2Prepared::from).collect();

    let mlo = E::multi_miller_loop(a, b);
    match E::final_exponentiation(mlo) {
        Some(fe) => fe.0.is_one(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use ark_bn254::Bn254;
    use rand::{rngs::StdRng, SeedableRng};

    fn srs(max_degree: usize) -> Srs<Bn254> {
        Srs::from_secret(Field::bn254(), FieldElement::from(1337u32), max_degree).expect("setup")
    }

    fn members(f: &Field, xs: &[i64]) -> Vec<FieldElement> {
        xs.iter().map(|&x| f.reduce_i64(x)).collect()
    }

    #[test]
    fn membership_roundtrip_in_both_groups() {
        let srs = srs(100);
        let f = srs.field().clone();
        let p = Polynomial::from_roots(&members(&f, &[1, 2]), &f);
        let c = commit(&srs, &p).unwrap();
        let z = f.element(5);

        for group in [QuotientGroup::G2, QuotientGroup::G1] {
            let opening = open(&srs, &p, &z, group).unwrap();
            assert_eq!(opening.claim.value, f.element(12));
            assert_eq!(opening.proof.group(), group);
            assert!(verify_opening(&srs, &c, &opening), "{group} proof rejected");
        }
    }

    #[test]
    fn members_evaluate_to_zero() {
        let srs = srs(16);
        let f = srs.field().clone();
        let set = members(&f, &[3, -8, 1_000_000, 42]);
        let p = Polynomial::from_roots(&set, &f);
        let c = commit(&srs, &p).unwrap();
        for m in &set {
            let opening = open(&srs, &p, m, QuotientGroup::G2).unwrap();
            assert_eq!(opening.claim.value, FieldElement::from(0u8));
            assert!(verify_opening(&srs, &c, &opening));
        }
    }

    #[test]
    fn mutated_claims_are_rejected() {
        let srs = srs(8);
        let f = srs.field().clone();
        let p = Polynomial::from_i64s(&[7, -3, 0, 5], &f);
        let c = commit(&srs, &p).unwrap();
        let z = f.element(9);

        for group in [QuotientGroup::G2, QuotientGroup::G1] {
            let Opening { claim, proof } = open(&srs, &p, &z, group).unwrap();
            assert!(verify(&srs, &c, &claim.point, &claim.value, &proof));

            let wrong_y = f.add(&claim.value, &f.element(1));
            assert!(!verify(&srs, &c, &claim.point, &wrong_y, &proof));

            let wrong_z = f.add(&claim.point, &f.element(1));
            assert!(!verify(&srs, &c, &wrong_z, &claim.value, &proof));

            let other = open(&srs, &p, &f.element(10), group).unwrap().proof;
            assert!(!verify(&srs, &c, &claim.point, &claim.value, &other));
        }
    }

    #[test]
    fn commitment_to_a_different_polynomial_is_rejected() {
        let srs = srs(8);
        let f = srs.field().clone();
        let p = Polynomial::from_roots(&members(&f, &[1, 2]), &f);
        // Simulates a prover that does not know the committed polynomial.
        let forged = p.add(&Polynomial::one(), &f);
        let c = commit(&srs, &p).unwrap();
        let opening = open(&srs, &forged, &f.element(5), QuotientGroup::G2).unwrap();
        assert!(!verify_opening(&srs, &c, &opening));
    }

    #[test]
    fn wrong_claimed_value_cannot_be_opened() {
        let srs = srs(8);
        let f = srs.field().clone();
        let p = Polynomial::from_roots(&members(&f, &[1, 2]), &f);
        let err = open_claimed(&srs, &p, &f.element(5), &f.element(13), QuotientGroup::G2).unwrap_err();
        assert!(matches!(
            err,
            KzgError::InvalidEvaluation { dividend_degree: 2, remainder_degree: 0, .. }
        ));
        assert!(open_claimed(&srs, &p, &f.element(5), &f.element(12), QuotientGroup::G1).is_ok());
    }

    #[test]
    fn degree_bound_is_enforced() {
        let srs = srs(2);
        let f = srs.field().clone();
        let p = Polynomial::from_roots(&members(&f, &[1, 2, 3]), &f);
        assert_eq!(
            commit(&srs, &p).unwrap_err(),
            KzgError::DegreeTooLarge { degree: 3, max_degree: 2 }
        );
        // Trailing zero slots do not count towards the degree.
        let padded = Polynomial::from_i64s(&[4, 1, 0, 0, 0, 0], &f);
        assert!(commit(&srs, &padded).is_ok());
        assert!(open(&srs, &padded, &f.element(3), QuotientGroup::G2).is_ok());
    }

    #[test]
    fn uncommittable_polynomials_cannot_be_opened() {
        let srs = srs(2);
        let f = srs.field().clone();
        let p = Polynomial::from_roots(&members(&f, &[1, 2, 3]), &f);
        for group in [QuotientGroup::G2, QuotientGroup::G1] {
            assert_eq!(
                open(&srs, &p, &f.element(5), group).unwrap_err(),
                KzgError::DegreeTooLarge { degree: 3, max_degree: 2 }
            );
            // Degree is checked before the claimed value.
            assert_eq!(
                open_claimed(&srs, &p, &f.element(1), &f.element(0), group).unwrap_err(),
                KzgError::DegreeTooLarge { degree: 3, max_degree: 2 }
            );
        }
    }

    #[test]
    fn constant_polynomials_open_with_identity_proof() {
        let srs = srs(2);
        let f = srs.field().clone();
        let p = Polynomial::from_i64s(&[17], &f);
        let c = commit(&srs, &p).unwrap();
        let opening = open(&srs, &p, &f.element(3), QuotientGroup::G1).unwrap();
        assert_eq!(opening.claim.value, f.element(17));
        assert!(verify_opening(&srs, &c, &opening));
    }

    #[test]
    fn random_setup_accepts_honest_openings() {
        let mut rng = StdRng::seed_from_u64(99);
        let srs = Srs::<Bn254>::setup(Field::bn254(), &mut rng, 10).unwrap();
        let f = srs.field().clone();
        let p = Polynomial::from_i64s(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11], &f);
        let c = commit(&srs, &p).unwrap();
        let z = f.random_element(&mut rng).unwrap();
        let opening = open(&srs, &p, &z, QuotientGroup::G2).unwrap();
        assert_eq!(opening.claim.value, p.evaluate(&z, &f));
        assert!(verify_opening(&srs, &c, &opening));
    }

    #[test]
    fn pairing_check_rejects_shape_mismatch() {
        let g1 = <Bn254 as Pairing>::G1::generator();
        let g2 = <Bn254 as Pairing>::G2::generator();
        assert!(!pairing_check::<Bn254>(&[g1], &[g2, g2]));
        assert!(pairing_check::<Bn254>(&[g1, -g1], &[g2, g2]));
        assert!(!pairing_check::<Bn254>(&[g1, g1], &[g2, g2]));
    }

    #[test]
    fn proofs_roundtrip_through_canonical_encoding() {
        let srs = srs(4);
        let f = srs.field().clone();
        let p = Polynomial::from_i64s(&[2, 0, 1], &f);
        for group in [QuotientGroup::G1, QuotientGroup::G2] {
            let proof = open(&srs, &p, &f.element(4), group).unwrap().proof;
            let mut bytes = Vec::new();
            proof.serialize_compressed(&mut bytes).unwrap();
            assert_eq!(bytes.len(), proof.compressed_size());
            let back = OpeningProof::<Bn254>::deserialize_compressed(bytes.as_slice()).unwrap();
            assert_eq!(back, proof);
        }
        assert!(OpeningProof::<Bn254>::deserialize_compressed(&[9u8][..]).is_err());

        let c = commit(&srs, &p).unwrap();
        let mut bytes = Vec::new();
        c.serialize_compressed(&mut bytes).unwrap();
        assert_eq!(Commitment::<Bn254>::deserialize_compressed(bytes.as_slice()).unwrap(), c);
    }

    #[test]
    fn quotient_group_parsing() {
        assert_eq!("G1".parse::<QuotientGroup>().unwrap(), QuotientGroup::G1);
        assert_eq!("g2".parse::<QuotientGroup>().unwrap(), QuotientGroup::G2);
        assert!("g3".parse::<QuotientGroup>().is_err());
        assert_eq!(QuotientGroup::G1.swapped(), QuotientGroup::G2);
    }
}
