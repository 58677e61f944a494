//! Dense univariate polynomials over a [`Field`]
//!
//! A polynomial is a coefficient vector in ascending powers of the
//! indeterminate `v`; index `i` holds the coefficient of `v^i`. The backing
//! storage may carry trailing zero slots, so two polynomials compare equal
//! whenever their coefficients agree up to the degree.
//!
//! ## Degree convention
//! [`Polynomial::degree`] is the highest index holding a nonzero
//! coefficient, and the zero polynomial has degree **0** (not `-inf`). Long
//! division relies on this for its termination test, in particular when the
//! dividend is zero.
//!
//! Every operation allocates a new polynomial; inputs are never mutated.

#![forbid(unsafe_code)]

use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::fmt;

use crate::field::{Field, FieldElement, FieldError};

/// Errors raised by polynomial arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolyError {
    /// The divisor is the zero polynomial.
    #[error("division by the zero polynomial (dividend degree {dividend_degree})")]
    DivisionByZero {
        /// Degree of the dividend.
        dividend_degree: usize,
    },
    /// A coefficient operation failed (e.g. non-invertible leading coefficient).
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Dense polynomial, coefficients low→high.
#[derive(Clone, Debug)]
pub struct Polynomial {
    coeffs: Vec<FieldElement>,
}

impl Polynomial {
    /// Build from coefficients (low→high), reducing each into the field.
    ///
    /// An empty vector yields the zero polynomial.
    pub fn new(coeffs: Vec<FieldElement>, field: &Field) -> Self {
        let coeffs: Vec<FieldElement> = coeffs.iter().map(|c| field.reduce(c)).collect();
        Self::from_reduced(coeffs)
    }

    /// Build from signed machine integers; negative values wrap around.
    pub fn from_i64s(coeffs: &[i64], field: &Field) -> Self {
        Self::from_reduced(coeffs.iter().map(|&c| field.reduce_i64(c)).collect())
    }

    fn from_reduced(mut coeffs: Vec<FieldElement>) -> Self {
        if coeffs.is_empty() {
            coeffs.push(BigUint::zero());
        }
        Self { coeffs }
    }

    /// All-zero storage able to hold a polynomial of the given degree.
    fn zeroed(degree: usize) -> Self {
        Self { coeffs: vec![BigUint::zero(); degree + 1] }
    }

    /// The zero polynomial `[0]`.
    pub fn zero() -> Self {
        Self::zeroed(0)
    }

    /// The constant polynomial `1`.
    pub fn one() -> Self {
        Self { coeffs: vec![BigUint::one()] }
    }

    /// Constant polynomial `c`.
    pub fn constant(c: FieldElement, field: &Field) -> Self {
        Self { coeffs: vec![field.reduce(&c)] }
    }

    /// The monic linear factor `v - z`.
    pub fn linear_factor(z: &FieldElement, field: &Field) -> Self {
        Self { coeffs: vec![field.neg(z), BigUint::one()] }
    }

    /// `∏ (v - r)` over `roots`; the polynomial vanishing exactly on the set.
    ///
    /// An empty set yields the constant `1`.
    pub fn from_roots<'a, I>(roots: I, field: &Field) -> Self
    where
        I: IntoIterator<Item = &'a FieldElement>,
    {
        roots
            .into_iter()
            .fold(Self::one(), |acc, r| acc.mul(&Self::linear_factor(r, field), field))
    }

    /// Raw coefficient storage (may include trailing zeros).
    #[inline]
    pub fn coefficients(&self) -> &[FieldElement] {
        &self.coeffs
    }

    /// Highest index with a nonzero coefficient; `0` for the zero polynomial.
    pub fn degree(&self) -> usize {
        self.coeffs
            .iter()
            .rposition(|c| !c.is_zero())
            .unwrap_or(0)
    }

    /// `true` iff every coefficient is zero.
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(Zero::is_zero)
    }

    /// Coefficient at [`degree`](Self::degree).
    #[inline]
    pub fn leading_coefficient(&self) -> &FieldElement {
        &self.coeffs[self.degree()]
    }

    /// Copy without trailing zero slots (length `degree + 1`).
    pub fn trimmed(&self) -> Self {
        Self { coeffs: self.coeffs[..=self.degree()].to_vec() }
    }

    /// Multiply every coefficient by `c`.
    pub fn scale(&self, c: &FieldElement, field: &Field) -> Self {
        Self { coeffs: self.coeffs.iter().map(|a| field.mul(a, c)).collect() }
    }

    /// Coefficient-wise sum, the shorter operand implicitly zero-padded.
    pub fn add(&self, other: &Self, field: &Field) -> Self {
        let mut out = Self::zeroed(self.degree().max(other.degree()));
        for (i, a) in self.coeffs[..=self.degree()].iter().enumerate() {
            out.coeffs[i] = field.add(&out.coeffs[i], a);
        }
        for (i, b) in other.coeffs[..=other.degree()].iter().enumerate() {
            out.coeffs[i] = field.add(&out.coeffs[i], b);
        }
        out
    }

    /// `self + (-1)·other`.
    pub fn sub(&self, other: &Self, field: &Field) -> Self {
        let minus_one = field.neg(&BigUint::one());
        self.add(&other.scale(&minus_one, field), field)
    }

    /// Schoolbook product; quadratic in the operand degrees.
    pub fn mul(&self, other: &Self, field: &Field) -> Self {
        let (da, db) = (self.degree(), other.degree());
        let mut out = Self::zeroed(da + db);
        for (i, a) in self.coeffs[..=da].iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs[..=db].iter().enumerate() {
                let term = field.mul(a, b);
                out.coeffs[i + j] = field.add(&out.coeffs[i + j], &term);
            }
        }
        out
    }

    /// Long division: returns `(quotient, remainder)` with
    /// `quotient · divisor + remainder = self`.
    ///
    /// The remainder is re-derived from the original dividend after each
    /// quotient coefficient is fixed. The loop stops once the remainder's
    /// degree drops below the divisor's, or the remainder is zero.
    pub fn divide(&self, divisor: &Self, field: &Field) -> Result<(Self, Self), PolyError> {
        if divisor.is_zero() {
            return Err(PolyError::DivisionByZero { dividend_degree: self.degree() });
        }

        let dd = divisor.degree();
        let lead = divisor.leading_coefficient();
        let mut quotient = Self::zeroed(self.degree().saturating_sub(dd));
        let mut remainder = self.clone();

        while remainder.degree() >= dd {
            let dr = remainder.degree();
            quotient.coeffs[dr - dd] = field.div(&remainder.coeffs[dr], lead)?;
            remainder = self.sub(&divisor.mul(&quotient, field), field);
            if remainder.is_zero() {
                break;
            }
        }

        Ok((quotient, remainder))
    }

    /// Horner evaluation at `x`, from the highest stored coefficient down.
    pub fn evaluate(&self, x: &FieldElement, field: &Field) -> FieldElement {
        self.coeffs.iter().rev().fold(BigUint::zero(), |acc, c| {
            field.add(&field.mul(&acc, x), c)
        })
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        let d = self.degree();
        d == other.degree() && self.coeffs[..=d] == other.coeffs[..=d]
    }
}

impl Eq for Polynomial {}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (i, c) in self.coeffs.iter().enumerate().filter(|(_, c)| !c.is_zero()) {
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            match (i, c.is_one()) {
                (0, _) => write!(f, "{c}")?,
                (1, true) => write!(f, "v")?,
                (1, false) => write!(f, "{c}·v")?,
                (_, true) => write!(f, "v^{i}")?,
                (_, false) => write!(f, "{c}·v^{i}")?,
            }
        }
        Ok(())
    }
}
