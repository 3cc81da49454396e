use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::Identity;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};

use super::{Group, InvalidElement, InvalidScalar};
use crate::ciphersuite::Ciphersuite;

/// Ristretto255 group with SHA-512
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ristretto255;

impl Group for Ristretto255 {
    const CIPHERSUITE: Ciphersuite = Ciphersuite::Ristretto255Sha512;
    const SCALAR_LENGTH: usize = 32;
    const ELEMENT_LENGTH: usize = 32;

    type Scalar = Scalar;
    type Element = RistrettoPoint;

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

    fn generator() -> RistrettoPoint {
        RISTRETTO_BASEPOINT_POINT
    }

    fn identity() -> RistrettoPoint {
        RistrettoPoint::identity()
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

    fn serialize_element(element: &RistrettoPoint) -> [u8; 32] {
        element.compress().to_bytes()
    }

    fn deserialize_element(bytes: &[u8]) -> Result<RistrettoPoint, InvalidElement> {
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| InvalidElement::InvalidLength {
                expected: Self::ELEMENT_LENGTH,
                got: bytes.len(),
            })?;
        let element = CompressedRistretto(bytes)
            .decompress()
            .ok_or(InvalidElement::InvalidEncoding)?;
        if element == RistrettoPoint::identity() {
            return Err(InvalidElement::InvalidEncoding);
        }
        Ok(element)
    }

    fn hash_to_scalar(input: &[u8], dst: &[u8]) -> Scalar {
        let digest = Sha512::new().chain_update(dst).chain_update(input).finalize();
        Scalar::from_bytes_mod_order_wide(&digest.into())
    }
}
