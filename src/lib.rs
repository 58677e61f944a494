//! Crate root: public surface and protocol-wide invariants
//!
//! KZG polynomial commitments over a pairing-friendly curve, specialised for
//! proving membership in a hidden set. The set's elements are the roots of
//! the committed polynomial; opening at `z` with value `0` shows `z` is a
//! member while revealing nothing else about the set.
//!
//! ## Layers (leaves first)
//!
//! - [`field`]: modular arithmetic on arbitrary-precision integers.
//! - [`polynomial`]: dense coefficient-vector algebra with exact long
//!   division.
//! - [`powers`]: powers of a scalar and evaluation against group-encoded
//!   powers ("in the exponent").
//! - [`srs_setup`] + [`kzg`]: structured reference string, then
//!   commit / open / verify.
//!
//! ## Invariants
//!
//! - **Curve.** The protocol is generic over any
//!   [`ark_ec::pairing::Pairing`]; BN254 ([`ark_bn254::Bn254`]) is the default
//!   and the field used for coefficients must be that engine's scalar field.
//! - **Toxic waste.** The SRS secret is consumed by setup and never stored or
//!   returned. An [`Srs`] is immutable once built and is shared by reference.
//! - **Degree convention.** The zero polynomial has degree `0`.
//! - **Errors.** Every precondition violation is a typed error returned to the
//!   caller; no operation produces a partially valid proof. Arithmetic is not
//!   constant-time.
//!
//! ```no_run
//! use membership_kzg::{commit, open, verify_opening, Bn254Srs, Field, Polynomial, QuotientGroup};
//!
//! # fn main() -> anyhow::Result<()> {
//! let field = Field::bn254();
//! let srs = Bn254Srs::setup(field.clone(), &mut rand::rngs::OsRng, 16)?;
//! let set = [field.element(1), field.element(2)];
//! let p = Polynomial::from_roots(&set, &field);
//!
//! let c = commit(&srs, &p)?;
//! let opening = open(&srs, &p, &field.element(5), QuotientGroup::G2)?;
//! assert_eq!(opening.claim.value, field.element(12));
//! assert!(verify_opening(&srs, &c, &opening));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(missing_docs)]

/// Modular arithmetic over `[0, order)`.
pub mod field;
/// Dense polynomials over a [`Field`].
pub mod polynomial;
/// Scalar powers and evaluation against encoded powers.
pub mod powers;
/// SRS construction, persistence and validation.
pub mod srs_setup;
/// Commit / open / verify and the pairing check.
pub mod kzg;
/// Driver configuration (flags + environment).
pub mod config;

// ============================================================================
// Root-level re-exports
// ============================================================================

pub use crate::field::{Field, FieldElement, FieldError};
pub use crate::kzg::{
    commit, open, open_claimed, pairing_check, verify, verify_opening, Commitment,
    EvaluationClaim, KzgError, Opening, OpeningProof, QuotientGroup,
};
pub use crate::polynomial::{PolyError, Polynomial};
pub use crate::powers::{
    compute_powers, encode_powers, evaluate_on_encoded_powers, EncodeError, GroupEncoding,
};
pub use crate::srs_setup::{Srs, SrsSetupError};

/// SRS over BN254, the default curve.
pub type Bn254Srs = Srs<ark_bn254::Bn254>;
