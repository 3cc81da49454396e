//! Prime-order group abstraction
//!
//! [`Group`] is the algebraic foundation of the protocol: scalars of the prime field
//! $\mathbb{Z}_n$, group elements, fixed-length encodings and hashing-to-scalar. One
//! concrete instantiation exists per supported [`Ciphersuite`](crate::Ciphersuite):
//!
//! * [`Ristretto255`] — `curve25519-dalek` Ristretto group, SHA-512
//! * [`Edwards25519`] — `curve25519-dalek` Edwards group, SHA-512
//! * [`P256`] — NIST P-256 via the `p256` crate, SHA-256
//! * [`Secp256k1`] — secp256k1 via the `k256` crate, SHA-256
//!
//! All scalar and element encodings are fixed-length and byte-for-byte compatible with
//! the deployed wire format: 32-byte little-endian scalars and 32-byte compressed
//! points for the dalek groups, 32-byte big-endian scalars and 33-byte SEC1 compressed
//! points for the Weierstrass groups.

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use rand_core::{CryptoRng, RngCore};

use crate::ciphersuite::Ciphersuite;

mod edwards25519;
mod p256;
mod ristretto255;
mod secp256k1;

pub use edwards25519::Edwards25519;
pub use p256::P256;
pub use ristretto255::Ristretto255;
pub use secp256k1::Secp256k1;

/// Prime-order group with its scalar field, as required by the key generation protocol
///
/// Arithmetic is exposed through the standard operator traits on the associated
/// [`Scalar`](Group::Scalar) and [`Element`](Group::Element) types; everything that is
/// not an operator (constants, encoding, hashing, randomness) lives on the trait
/// itself. Equality on both types is constant-time in all provided instantiations.
pub trait Group: Clone + Copy + fmt::Debug + PartialEq + Eq + 'static {
    /// Ciphersuite this group instantiates
    const CIPHERSUITE: Ciphersuite;
    /// Byte size of an encoded scalar
    const SCALAR_LENGTH: usize;
    /// Byte size of an encoded group element
    const ELEMENT_LENGTH: usize;

    /// Element of the scalar field $\mathbb{Z}_n$, where $n$ is the group order
    type Scalar: Clone
        + Copy
        + fmt::Debug
        + PartialEq
        + Eq
        + Add<Self::Scalar, Output = Self::Scalar>
        + Sub<Self::Scalar, Output = Self::Scalar>
        + Mul<Self::Scalar, Output = Self::Scalar>
        + Neg<Output = Self::Scalar>;

    /// Group element (curve point)
    type Element: Clone
        + Copy
        + fmt::Debug
        + PartialEq
        + Eq
        + Add<Self::Element, Output = Self::Element>
        + Sub<Self::Element, Output = Self::Element>
        + Neg<Output = Self::Element>
        + Mul<Self::Scalar, Output = Self::Element>;

    /// Byte array that fits an encoded scalar
    type ScalarBytes: AsRef<[u8]>;
    /// Byte array that fits an encoded group element
    type ElementBytes: AsRef<[u8]>;

    /// The additive identity of the scalar field
    fn scalar_zero() -> Self::Scalar;
    /// The multiplicative identity of the scalar field
    fn scalar_one() -> Self::Scalar;
    /// Scalar representing the integer `n`
    fn scalar_from_u64(n: u64) -> Self::Scalar;
    /// Uniformly random scalar, never the additive identity
    ///
    /// Retries until a non-zero scalar is produced.
    fn random_scalar(rng: &mut (impl RngCore + CryptoRng)) -> Self::Scalar;
    /// Multiplicative inverse, or `None` for the additive identity
    fn invert_scalar(scalar: &Self::Scalar) -> Option<Self::Scalar>;
    /// Whether the scalar is the additive identity
    fn is_zero_scalar(scalar: &Self::Scalar) -> bool {
        *scalar == Self::scalar_zero()
    }

    /// The group's canonical generator (base point)
    fn generator() -> Self::Element;
    /// The neutral group element (point at infinity)
    fn identity() -> Self::Element;
    /// Whether the element is the neutral element
    fn is_identity(element: &Self::Element) -> bool {
        *element == Self::identity()
    }

    /// Fixed-length encoding of a scalar
    fn serialize_scalar(scalar: &Self::Scalar) -> Self::ScalarBytes;
    /// Decodes a scalar, rejecting wrong lengths and out-of-range values
    fn deserialize_scalar(bytes: &[u8]) -> Result<Self::Scalar, InvalidScalar>;
    /// Fixed-length (compressed) encoding of a group element
    fn serialize_element(element: &Self::Element) -> Self::ElementBytes;
    /// Decodes a group element, rejecting wrong lengths, off-curve or non-canonical
    /// encodings, and the encoding of the identity
    fn deserialize_element(bytes: &[u8]) -> Result<Self::Element, InvalidElement>;

    /// Maps arbitrary input to a uniformly distributed scalar
    ///
    /// `dst` is the domain separation tag; it must not be empty. The construction is
    /// the one fixed by the ciphersuite: wide reduction of `H(dst || input)` for the
    /// dalek groups, RFC 9380 `hash_to_field` for the Weierstrass groups.
    fn hash_to_scalar(input: &[u8], dst: &[u8]) -> Self::Scalar;
}

/// Scalar decoding failure
///
/// Length and value failures are distinct so that callers can tell transport
/// corruption from a deliberately malformed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidScalar {
    /// Input has the wrong number of bytes
    InvalidLength {
        /// Fixed encoding length of the group
        expected: usize,
        /// Length of the rejected input
        got: usize,
    },
    /// Input is correctly sized but encodes a value at or above the group order
    OutOfRange,
}

/// Group element decoding failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidElement {
    /// Input has the wrong number of bytes
    InvalidLength {
        /// Fixed encoding length of the group
        expected: usize,
        /// Length of the rejected input
        got: usize,
    },
    /// Input is correctly sized but is off-curve, non-canonical, or encodes
    /// the identity
    InvalidEncoding,
}

impl fmt::Display for InvalidScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, got } => {
                write!(f, "invalid scalar length: expected {expected} got {got}")
            }
            Self::OutOfRange => f.write_str("scalar is not within the field order"),
        }
    }
}

impl fmt::Display for InvalidElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, got } => {
                write!(f, "invalid element length: expected {expected} got {got}")
            }
            Self::InvalidEncoding => f.write_str("invalid element encoding"),
        }
    }
}

impl std::error::Error for InvalidScalar {}
impl std::error::Error for InvalidElement {}
