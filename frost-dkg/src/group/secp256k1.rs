use k256::elliptic_curve::generic_array::typenum::Unsigned;
use k256::elliptic_curve::hash2curve::{ExpandMsgXmd, FromOkm, GroupDigest};
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::{Field, PrimeField};
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};

use super::{Group, InvalidElement, InvalidScalar};
use crate::ciphersuite::Ciphersuite;

/// secp256k1 group with SHA-256
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1;

impl Group for Secp256k1 {
    const CIPHERSUITE: Ciphersuite = Ciphersuite::Secp256k1Sha256;
    const SCALAR_LENGTH: usize = 32;
    const ELEMENT_LENGTH: usize = 33;

    type Scalar = Scalar;
    type Element = ProjectivePoint;

    type ScalarBytes = [u8; 32];
    type ElementBytes = [u8; 33];

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
            let scalar = Scalar::random(&mut *rng);
            if scalar != Scalar::ZERO {
                return scalar;
            }
        }
    }

    fn invert_scalar(scalar: &Scalar) -> Option<Scalar> {
        Option::from(scalar.invert())
    }

    fn generator() -> ProjectivePoint {
        ProjectivePoint::GENERATOR
    }

    fn identity() -> ProjectivePoint {
        ProjectivePoint::IDENTITY
    }

    fn serialize_scalar(scalar: &Scalar) -> [u8; 32] {
        scalar.to_bytes().into()
    }

    fn deserialize_scalar(bytes: &[u8]) -> Result<Scalar, InvalidScalar> {
        if bytes.len() != Self::SCALAR_LENGTH {
            return Err(InvalidScalar::InvalidLength {
                expected: Self::SCALAR_LENGTH,
                got: bytes.len(),
            });
        }
        let repr = *FieldBytes::from_slice(bytes);
        Option::from(Scalar::from_repr(repr)).ok_or(InvalidScalar::OutOfRange)
    }

    fn serialize_element(element: &ProjectivePoint) -> [u8; 33] {
        let mut out = [0u8; 33];
        if *element != ProjectivePoint::IDENTITY {
            out.copy_from_slice(element.to_affine().to_encoded_point(true).as_bytes());
        }
        out
    }

    fn deserialize_element(bytes: &[u8]) -> Result<ProjectivePoint, InvalidElement> {
        if bytes.len() != Self::ELEMENT_LENGTH {
            return Err(InvalidElement::InvalidLength {
                expected: Self::ELEMENT_LENGTH,
                got: bytes.len(),
            });
        }
        let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| InvalidElement::InvalidEncoding)?;
        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or(InvalidElement::InvalidEncoding)?;
        let element = ProjectivePoint::from(affine);
        if element == ProjectivePoint::IDENTITY {
            return Err(InvalidElement::InvalidEncoding);
        }
        Ok(element)
    }

    fn hash_to_scalar(input: &[u8], dst: &[u8]) -> Scalar {
        // According to the doc, `k256::Secp256k1::hash_to_scalar` returns error if:
        // * dst.is_empty()
        // * len_in_bytes == 0
        // * len_in_bytes > u16::MAX
        // * len_in_bytes > 255 * HashT::OutputSize
        // where len_in_bytes = <Self::FieldElement as FromOkm>::Length

        // All call sites pass a non-empty dst, but also we enforce it via debug
        // assert below:
        debug_assert!(!dst.is_empty(), "dst must not be empty");

        // The other conditions are checked statically below
        #[allow(dead_code)]
        {
            const LENGTH_IN_BYTES: usize = <<Scalar as FromOkm>::Length as Unsigned>::USIZE;
            const SHA256_OUTPUT_SIZE: usize =
                <<sha2::Sha256 as sha2::digest::OutputSizeUser>::OutputSize as Unsigned>::USIZE;
            use static_assertions as sa;

            sa::const_assert!(LENGTH_IN_BYTES > 0);
            sa::const_assert!(LENGTH_IN_BYTES <= u16::MAX as _);
            sa::const_assert!(LENGTH_IN_BYTES <= 255 * SHA256_OUTPUT_SIZE);
        }

        // So, we can safely unwrap the result
        #[allow(clippy::expect_used)]
        k256::Secp256k1::hash_to_scalar::<ExpandMsgXmd<sha2::Sha256>>(&[input], &[dst])
            .expect("should never fail")
    }
}
