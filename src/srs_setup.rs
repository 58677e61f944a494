//! Structured Reference String (SRS) construction and persistence
//!
//! # What is an SRS?
//!
//! The public parameters of a KZG commitment: two parallel vectors of group
//! elements encoding powers of a secret scalar `s`,
//!
//! - **G1 powers**: `[s⁰·G₁, s¹·G₁, …, sᵈ·G₁]`
//! - **G2 powers**: `[s⁰·G₂, s¹·G₂, …, sᵈ·G₂]`
//!
//! where `d` is the maximum supported degree. Committing needs the G1 side;
//! the verifier needs `s·G₂` (or `s·G₁` when the quotient travels in G1).
//!
//! # Toxic waste
//!
//! Anyone who learns `s` can forge openings for any polynomial. The setup
//! functions take the secret **by value** and drop it (together with the
//! scalar powers) before returning. No method of [`Srs`] exposes it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  SECURITY ASSUMPTION: s is unknown and destroyed            │
//! │                                                             │
//! │  IF attacker knows s:                                       │
//! │    → Can open a commitment to any value at any point        │
//! │    → Membership proofs become meaningless                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Lifecycle
//!
//! An SRS is built (or loaded) once per deployment and is immutable
//! afterwards. It is `Send + Sync` and shared by reference between any
//! number of committers and verifiers. Regenerating it invalidates every
//! commitment and proof made against the previous one.
//!
//! # File format
//!
//! Arkworks-serialized (compressed) affine vectors, one file per group:
//!
//! ```text
//! G1.bin: Vec<G1Affine>   // [G₁, s·G₁, …, sᵈ·G₁]
//! G2.bin: Vec<G2Affine>   // [G₂, s·G₂, …, sᵈ·G₂]
//! ```

#![forbid(unsafe_code)]

use ark_ec::{pairing::Pairing, CurveGroup, Group};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use blake3::Hasher;
use rand::{CryptoRng, RngCore};
use std::path::Path;

use crate::field::{Field, FieldElement, FieldError};
use crate::powers::{compute_powers, encode_powers};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during SRS setup, loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum SrsSetupError {
    /// File I/O error (file not found, permissions, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to (de)serialize SRS points
    #[error("serialization error: {0}")]
    Deserialize(String),

    /// SRS failed a structural check
    #[error("SRS validation failed: {0}")]
    Validation(String),

    /// Pairing check failed (indicates corrupted or malicious SRS)
    #[error("pairing check failed: {0}")]
    PairingCheck(String),

    /// Sampling the secret or a parameter check failed
    #[error(transparent)]
    Field(#[from] FieldError),
}

// ============================================================================
// The SRS value
// ============================================================================

/// Encoded powers of a discarded secret, in both pairing groups.
#[derive(Clone, Debug)]
pub struct Srs<E: Pairing> {
    field: Field,
    g1_powers: Vec<E::G1>,
    g2_powers: Vec<E::G2>,
}

impl<E: Pairing> Srs<E> {
    /// Run a fresh setup with a secret drawn from `rng`.
    ///
    /// `field` must be the scalar field of `E` and `max_degree >= 1`.
    pub fn setup<R>(field: Field, rng: &mut R, max_degree: usize) -> Result<Self, SrsSetupError>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let secret = field.random_nonzero_element(rng)?;
        Self::from_secret(field, secret, max_degree)
    }

    /// Build the SRS from a caller-chosen secret, consuming it.
    ///
    /// Meant for reproducible tests and development parameters; production
    /// deployments use [`Srs::setup`] or load ceremony output.
    pub fn from_secret(
        field: Field,
        secret: FieldElement,
        max_degree: usize,
    ) -> Result<Self, SrsSetupError> {
        check_field::<E>(&field)?;
        if max_degree == 0 {
            return Err(FieldError::InvalidArgument(
                "SRS max_degree must be at least 1 (verification needs s·G)".into(),
            )
            .into());
        }

        let powers = compute_powers(&secret, max_degree + 1, &field);
        drop(secret);
        let g1_powers = encode_powers::<E::G1>(&powers);
        let g2_powers = encode_powers::<E::G2>(&powers);
        drop(powers);

        tracing::info!(max_degree, "SRS generated");
        Ok(Self { field, g1_powers, g2_powers })
    }

    /// Field the SRS was built over.
    #[inline]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Maximum supported polynomial degree.
    #[inline]
    pub fn max_degree(&self) -> usize {
        self.g1_powers.len() - 1
    }

    /// Number of encoded powers per group (`max_degree + 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.g1_powers.len()
    }

    /// Always `false`: construction guarantees at least two powers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.g1_powers.is_empty()
    }

    /// `[s^i]·G₁` for `i = 0..=max_degree`.
    #[inline]
    pub fn g1_powers(&self) -> &[E::G1] {
        &self.g1_powers
    }

    /// `[s^i]·G₂` for `i = 0..=max_degree`.
    #[inline]
    pub fn g2_powers(&self) -> &[E::G2] {
        &self.g2_powers
    }

    /// Check the two vectors encode the same secret.
    ///
    /// Verifies `e([s]G₁, G₂) = e(G₁, [s]G₂)` and the same relation at the
    /// highest power, and that `[s]G₂` is not the identity. This proves
    /// algebraic consistency only, not that the secret was destroyed.
    pub fn validate(&self) -> Result<(), SrsSetupError> {
        if self.g1_powers.len() < 2 || self.g1_powers.len() != self.g2_powers.len() {
            return Err(SrsSetupError::Validation(format!(
                "need two equally long power vectors with >= 2 entries (G1: {}, G2: {})",
                self.g1_powers.len(),
                self.g2_powers.len()
            )));
        }
        if self.g1_powers[0] != E::G1::generator() || self.g2_powers[0] != E::G2::generator() {
            return Err(SrsSetupError::Validation(
                "first SRS element is not the generator (possible corruption or wrong curve)".into(),
            ));
        }
        if self.g2_powers[1].is_zero() {
            return Err(SrsSetupError::Validation(
                "s·G₂ is the point at infinity (invalid SRS)".into(),
            ));
        }

        let g1 = E::G1::generator();
        let g2 = E::G2::generator();
        for idx in [1, self.max_degree()] {
            if E::pairing(self.g1_powers[idx], g2) != E::pairing(g1, self.g2_powers[idx]) {
                return Err(SrsSetupError::PairingCheck(format!(
                    "G1 and G2 powers disagree at index {idx}: e([s^i]G₁, G₂) != e(G₁, [s^i]G₂)"
                )));
            }
        }
        Ok(())
    }

    // ----------------------- File I/O -----------------------

    /// Save the G1 powers as a compressed `Vec<G1Affine>`.
    pub fn save_g1_powers(&self, path: impl AsRef<Path>) -> Result<(), SrsSetupError> {
        write_points(path.as_ref(), &E::G1::normalize_batch(&self.g1_powers))
    }

    /// Save the G2 powers as a compressed `Vec<G2Affine>`.
    pub fn save_g2_powers(&self, path: impl AsRef<Path>) -> Result<(), SrsSetupError> {
        write_points(path.as_ref(), &E::G2::normalize_batch(&self.g2_powers))
    }

    /// Load both power files and validate them.
    ///
    /// # Validation performed
    ///
    /// 1. **Deserialization**: points are well-formed and on-curve
    /// 2. **Degree check**: at least `min_degree + 1` powers per group
    /// 3. **Structure**: equal lengths, generators at index 0
    /// 4. **Pairing consistency**: see [`Srs::validate`]
    pub fn load(
        field: Field,
        g1_path: impl AsRef<Path>,
        g2_path: impl AsRef<Path>,
        min_degree: usize,
    ) -> Result<Self, SrsSetupError> {
        check_field::<E>(&field)?;
        let g1: Vec<E::G1Affine> = read_points(g1_path.as_ref(), "G1")?;
        let g2: Vec<E::G2Affine> = read_points(g2_path.as_ref(), "G2")?;

        if g1.len() < min_degree + 1 {
            return Err(SrsSetupError::Validation(format!(
                "G1 SRS has {} powers, need at least {} for degree {}",
                g1.len(),
                min_degree + 1,
                min_degree
            )));
        }

        let srs = Self {
            field,
            g1_powers: g1.into_iter().map(Into::into).collect(),
            g2_powers: g2.into_iter().map(Into::into).collect(),
        };
        srs.validate()?;
        tracing::info!(max_degree = srs.max_degree(), "SRS loaded and validated");
        Ok(srs)
    }

    // ----------------------- Digests -----------------------

    /// BLAKE3 digest of the compressed G1 powers.
    pub fn g1_digest(&self) -> Result<[u8; 32], SrsSetupError> {
        digest_points(&E::G1::normalize_batch(&self.g1_powers))
    }

    /// BLAKE3 digest of the compressed G2 powers.
    pub fn g2_digest(&self) -> Result<[u8; 32], SrsSetupError> {
        digest_points(&E::G2::normalize_batch(&self.g2_powers))
    }
}

#[cfg(feature = "dev-srs")]
impl Srs<ark_bn254::Bn254> {
    /// Deterministic BN254 SRS with a **publicly known** secret.
    ///
    /// The secret comes from `StdRng::from_seed([42; 32])`. Anyone can
    /// recompute it and forge proofs, so this is for local development and
    /// tests only.
    pub fn dev(max_degree: usize) -> Result<Self, SrsSetupError> {
        use rand::{rngs::StdRng, SeedableRng};

        tracing::warn!(
            max_degree,
            "generating DEVELOPMENT SRS (seed=42, secret is PUBLIC); never use in production"
        );
        let mut rng = StdRng::from_seed([42u8; 32]);
        Self::setup(Field::bn254(), &mut rng, max_degree)
    }
}

fn check_field<E: Pairing>(field: &Field) -> Result<(), SrsSetupError> {
    let expected = Field::from_prime_field::<E::ScalarField>();
    if field != &expected {
        return Err(SrsSetupError::Validation(format!(
            "field order {} does not match the pairing scalar field {}",
            field.order(),
            expected.order()
        )));
    }
    Ok(())
}

fn write_points<P: CanonicalSerialize>(path: &Path, points: &[P]) -> Result<(), SrsSetupError> {
    let mut bytes = Vec::new();
    points
        .serialize_compressed(&mut bytes)
        .map_err(|e| SrsSetupError::Deserialize(format!("serialize: {e}")))?;
    std::fs::write(path, bytes)?;
    Ok(())
}

fn read_points<P: CanonicalDeserialize>(path: &Path, label: &str) -> Result<Vec<P>, SrsSetupError> {
    let bytes = std::fs::read(path)?;
    let points: Vec<P> = CanonicalDeserialize::deserialize_compressed(bytes.as_slice())
        .map_err(|e| SrsSetupError::Deserialize(format!("{label} SRS: {e}")))?;
    if points.is_empty() {
        return Err(SrsSetupError::Validation(format!("{label} SRS file is empty")));
    }
    Ok(points)
}

fn digest_points<P: CanonicalSerialize>(points: &[P]) -> Result<[u8; 32], SrsSetupError> {
    let mut h = Hasher::new();
    h.update(b"KZGSET.SRS.v1");
    h.update(&(points.len() as u64).to_be_bytes());
    let mut tmp = Vec::new();
    for p in points {
        tmp.clear();
        p.serialize_compressed(&mut tmp)
            .map_err(|e| SrsSetupError::Deserialize(format!("serialize: {e}")))?;
        h.update(&(tmp.len() as u64).to_be_bytes());
        h.update(&tmp);
    }
    Ok(*h.finalize().as_bytes())
}

// ============================================================================
// Tests
// ============================================================================
