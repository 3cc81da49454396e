//! Shamir secret sharing and Feldman verifiable commitments
//!
//! A secret is the constant term of a random [`Polynomial`] over the group's scalar
//! field. Evaluations of that polynomial at non-zero points are the shares, and the
//! element-wise commitment `[base^c_0, ..., base^c_{t-1}]` lets every share holder
//! verify their share without learning anybody else's ([`verify_public_key_share`]).
//! Any `threshold` distinct shares reconstruct the secret via Lagrange interpolation
//! at zero ([`combine_shares`]).

use core::fmt;

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::group::Group;

/// Secret polynomial over the scalar field of `G`
///
/// Holds exactly `threshold` coefficients, none of which is zero and no two of which
/// are equal; both properties are enforced at construction. The coefficients are
/// overwritten with zeroes on drop, and the protocol additionally erases them
/// explicitly as soon as the second round completes.
#[derive(Clone)]
pub struct Polynomial<G: Group>(Vec<G::Scalar>);

impl<G: Group> Polynomial<G> {
    /// Samples a fresh polynomial with `threshold` independent random coefficients
    ///
    /// `threshold` must be at least 1: a polynomial without a constant term shares
    /// no secret.
    pub fn random(
        threshold: u16,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Self, PolynomialError> {
        if threshold == 0 {
            return Err(PolynomialError::ZeroThreshold);
        }
        let coefficients = (0..threshold).map(|_| G::random_scalar(rng)).collect();
        Ok(Self(coefficients))
    }

    /// Builds a polynomial from caller-supplied coefficients
    ///
    /// The coefficients are validated before use: their number must equal
    /// `threshold` (which must be at least 1), none may be the additive identity,
    /// and no two may be equal.
    pub fn from_coefficients(
        threshold: u16,
        coefficients: Vec<G::Scalar>,
    ) -> Result<Self, PolynomialError> {
        if threshold == 0 {
            return Err(PolynomialError::ZeroThreshold);
        }
        if coefficients.len() != usize::from(threshold) {
            return Err(PolynomialError::InvalidLength {
                expected: threshold,
                got: coefficients.len(),
            });
        }
        for (i, coefficient) in coefficients.iter().enumerate() {
            if G::is_zero_scalar(coefficient) {
                return Err(PolynomialError::ZeroCoefficient);
            }
            if coefficients[..i].contains(coefficient) {
                return Err(PolynomialError::DuplicateCoefficient);
            }
        }
        Ok(Self(coefficients))
    }

    /// Number of coefficients, i.e. the threshold the polynomial was built for
    pub fn threshold(&self) -> u16 {
        // length is bounded by the u16 threshold at construction
        self.0.len() as u16
    }

    /// The coefficients, constant term first
    pub fn coefficients(&self) -> &[G::Scalar] {
        &self.0
    }

    /// The constant term — the secret being shared
    pub fn constant_term(&self) -> &G::Scalar {
        &self.0[0]
    }

    /// Evaluates the polynomial at `x` via Horner's method
    pub fn evaluate(&self, x: &G::Scalar) -> G::Scalar {
        let mut value = G::scalar_zero();
        for coefficient in self.0.iter().rev() {
            value = value * *x + *coefficient;
        }
        value
    }

    /// Evaluates the polynomial at a participant identifier
    pub fn evaluate_at(&self, id: u16) -> G::Scalar {
        self.evaluate(&G::scalar_from_u64(u64::from(id)))
    }

    /// Whether every coefficient has been overwritten with zero
    ///
    /// Construction never admits a zero coefficient, so this unambiguously marks a
    /// polynomial whose secrets were already consumed.
    pub(crate) fn is_zeroed(&self) -> bool {
        self.0.iter().all(G::is_zero_scalar)
    }
}

impl<G: Group> Zeroize for Polynomial<G> {
    fn zeroize(&mut self) {
        for coefficient in self.0.iter_mut() {
            *coefficient = G::scalar_zero();
        }
    }
}

impl<G: Group> Drop for Polynomial<G> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<G: Group> fmt::Debug for Polynomial<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never leak coefficients through Debug output
        f.debug_struct("Polynomial")
            .field("threshold", &self.threshold())
            .finish_non_exhaustive()
    }
}

/// Feldman commitment to a polynomial: one `base^coefficient` element per coefficient
pub fn commit<G: Group>(polynomial: &Polynomial<G>) -> Vec<G::Element> {
    polynomial
        .coefficients()
        .iter()
        .map(|coefficient| G::generator() * *coefficient)
        .collect()
}

/// Public value of `polynomial(id)` implied by a Feldman commitment
///
/// Computes `∏ commitment[k]^(id^k)` without knowledge of the polynomial itself.
pub fn pubkey_for_commitment<G: Group>(
    id: u16,
    commitment: &[G::Element],
) -> Result<G::Element, ShareError> {
    if commitment.is_empty() {
        return Err(ShareError::EmptyCommitment);
    }
    if id == 0 {
        return Err(ShareError::ZeroIdentifier);
    }

    let x = G::scalar_from_u64(u64::from(id));
    let mut x_pow = G::scalar_one();
    let mut public_key = G::identity();
    for element in commitment {
        public_key = public_key + *element * x_pow;
        x_pow = x_pow * x;
    }

    Ok(public_key)
}

/// Verifies a candidate public key share against the sender's Feldman commitment
///
/// Returns true iff `candidate` equals the public value the commitment implies for
/// `id`. This is how a received secret share is checked without revealing it: the
/// recipient lifts the share to `base^share` and compares.
pub fn verify_public_key_share<G: Group>(
    id: u16,
    candidate: &G::Element,
    commitment: &[G::Element],
) -> bool {
    match pubkey_for_commitment::<G>(id, commitment) {
        Ok(public_key) => public_key == *candidate,
        Err(_) => false,
    }
}

/// One participant's share of the jointly generated secret
#[derive(Debug, Clone, Copy)]
pub struct Share<G: Group> {
    /// Identifier of the share holder
    pub id: u16,
    /// The secret evaluation held by that participant
    pub secret: G::Scalar,
}

/// Reconstructs the shared secret from at least `threshold` distinct shares
///
/// Lagrange interpolation of the degree-0 coefficient at `x = 0`. Shares with
/// duplicate identifiers are rejected rather than deduplicated, and fewer than
/// `threshold` shares are never accepted.
pub fn combine_shares<G: Group>(
    threshold: u16,
    shares: &[Share<G>],
) -> Result<G::Scalar, ShareError> {
    if shares.len() < usize::from(threshold) {
        return Err(ShareError::TooFewShares {
            threshold,
            got: shares.len(),
        });
    }
    for (i, share) in shares.iter().enumerate() {
        if share.id == 0 {
            return Err(ShareError::ZeroIdentifier);
        }
        if shares[..i].iter().any(|other| other.id == share.id) {
            return Err(ShareError::DuplicateIdentifier(share.id));
        }
    }

    let mut secret = G::scalar_zero();
    for share in shares {
        let x_i = G::scalar_from_u64(u64::from(share.id));
        let mut numerator = G::scalar_one();
        let mut denominator = G::scalar_one();
        for other in shares {
            if other.id == share.id {
                continue;
            }
            let x_j = G::scalar_from_u64(u64::from(other.id));
            numerator = numerator * x_j;
            denominator = denominator * (x_j - x_i);
        }
        // identifiers are distinct 16-bit values, so the denominator cannot vanish
        let denominator = G::invert_scalar(&denominator)
            .ok_or(ShareError::DuplicateIdentifier(share.id))?;
        secret = secret + share.secret * numerator * denominator;
    }

    Ok(secret)
}

/// Invalid caller-supplied polynomial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolynomialError {
    /// The threshold is zero
    ZeroThreshold,
    /// Number of coefficients differs from the threshold
    InvalidLength {
        /// Expected number of coefficients
        expected: u16,
        /// Number of coefficients supplied
        got: usize,
    },
    /// A coefficient is the additive identity
    ZeroCoefficient,
    /// Two coefficients are equal
    DuplicateCoefficient,
}

impl fmt::Display for PolynomialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroThreshold => f.write_str("threshold is 0"),
            Self::InvalidLength { expected, got } => {
                write!(f, "invalid polynomial length: expected {expected} got {got}")
            }
            Self::ZeroCoefficient => f.write_str("polynomial has a zero coefficient"),
            Self::DuplicateCoefficient => f.write_str("polynomial has duplicate coefficients"),
        }
    }
}

impl std::error::Error for PolynomialError {}

/// Invalid input to share combination or commitment evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareError {
    /// Fewer shares than the threshold requires
    TooFewShares {
        /// Minimum number of shares needed
        threshold: u16,
        /// Number of shares supplied
        got: usize,
    },
    /// The same identifier appears more than once
    DuplicateIdentifier(u16),
    /// An identifier is zero
    ZeroIdentifier,
    /// A commitment holds no elements
    EmptyCommitment,
}

impl fmt::Display for ShareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewShares { threshold, got } => {
                write!(f, "not enough shares: need at least {threshold} got {got}")
            }
            Self::DuplicateIdentifier(id) => write!(f, "duplicate share identifier: {id}"),
            Self::ZeroIdentifier => f.write_str("identifier is 0"),
            Self::EmptyCommitment => f.write_str("commitment is empty"),
        }
    }
}

impl std::error::Error for ShareError {}
