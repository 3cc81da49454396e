use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};

use super::{Group, InvalidElement, InvalidScalar};
use crate::ciphersuite::Ciphersuite;

/// Edwards25519 group with SHA-512
///
/// Shares its scalar field with [`Ristretto255`](super::Ristretto255), but elements
/// are plain Edwards points with the usual RFC 8032 encoding. Decoding requires the
/// canonical representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edwards25519;

impl Group for Edwards25519 {
    const CIPHERSUITE: Ciphersuite = Ciphersuite::Edwards25519Sha512;
    const SCALAR_LENGTH: usize = 32;
    const ELEMENT_LENGTH: usize = 32;

    type Scalar = Scalar;
    type Element = EdwardsPoint;

    type ScalarBytes = [u8; 32];
    type ElementBytes = [u8; 32];

    fn scalar_zero() -> Scalar {
        Scalar::ZERO
    }

    fn scalar_one() -> Scalar {
        Scalar::ONE
    }

    fn scalar_from_u64(n: u64) -> Scalar {
        Scalar::from(n)
    }

    fn random_scalar(rng: &mut (impl RngCore + CryptoRng)) -> Scalar {
        loop {
            let mut bytes = [0u8; 64];
            rng.fill_bytes(&mut bytes);
            let scalar = Scalar::from_bytes_mod_order_wide(&bytes);
            if scalar != Scalar::ZERO {
                return scalar;
            }
        }
    }

    fn invert_scalar(scalar: &Scalar) -> Option<Scalar> {
        if *scalar == Scalar::ZERO {
            None
        } else {
            Some(scalar.invert())
        }
    }

    fn generator() -> EdwardsPoint {
        ED25519_BASEPOINT_POINT
    }

    fn identity() -> EdwardsPoint {
        EdwardsPoint::identity()
    }

    fn serialize_scalar(scalar: &Scalar) -> [u8; 32] {
        scalar.to_bytes()
    }

    fn deserialize_scalar(bytes: &[u8]) -> Result<Scalar, InvalidScalar> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| InvalidScalar::InvalidLength {
                expected: Self::SCALAR_LENGTH,
                got: bytes.len(),
            })?;
        Option::from(Scalar::from_canonical_bytes(bytes)).ok_or(InvalidScalar::OutOfRange)
    }

    fn serialize_element(element: &EdwardsPoint) -> [u8; 32] {
        element.compress().to_bytes()
    }

    fn deserialize_element(bytes: &[u8]) -> Result<EdwardsPoint, InvalidElement> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| InvalidElement::InvalidLength {
                expected: Self::ELEMENT_LENGTH,
                got: bytes.len(),
            })?;
        let compressed = CompressedEdwardsY(bytes);
        let element = compressed
            .decompress()
            .ok_or(InvalidElement::InvalidEncoding)?;
        // decompression accepts a few non-canonical encodings; require canonical form
        if element.compress() != compressed {
            return Err(InvalidElement::InvalidEncoding);
        }
        if element == EdwardsPoint::identity() {
            return Err(InvalidElement::InvalidEncoding);
        }
        Ok(element)
    }

    fn hash_to_scalar(input: &[u8], dst: &[u8]) -> Scalar {
        let digest = Sha512::new().chain_update(dst).chain_update(input).finalize();
        Scalar::from_bytes_mod_order_wide(&digest.into())
    }
}
