//! Schnorr proof of knowledge of a secret scalar
//!
//! Each participant proves knowledge of its polynomial's constant term in round 1.
//! The proof is a plain Schnorr signature over a Fiat-Shamir challenge that binds the
//! prover's identifier, its public key and the nonce commitment, all domain-separated
//! by the ciphersuite's context string.

use rand_core::{CryptoRng, RngCore};
use serde::ser::SerializeStruct;

use crate::encoding::{self, DecodeError};
use crate::group::Group;

/// Schnorr signature acting as a proof of knowledge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature<G: Group> {
    /// Commitment to the proof nonce, `base * k`
    pub r: G::Element,
    /// Response scalar, `k + secret * challenge`
    pub z: G::Scalar,
}

impl<G: Group> Signature<G> {
    /// Compact binary encoding: ciphersuite byte, then `r` and `z`
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + G::ELEMENT_LENGTH + G::SCALAR_LENGTH);
        out.push(G::CIPHERSUITE.to_byte());
        out.extend_from_slice(G::serialize_element(&self.r).as_ref());
        out.extend_from_slice(G::serialize_scalar(&self.z).as_ref());
        out
    }

    /// Decodes the compact encoding produced by [`encode`](Self::encode)
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let expected = 1 + G::ELEMENT_LENGTH + G::SCALAR_LENGTH;
        if data.len() != expected {
            return Err(DecodeError::InvalidLength {
                expected,
                got: data.len(),
            });
        }
        encoding::expect_ciphersuite::<G>(data[0])?;

        let mut offset = 1;
        let r = encoding::read_element::<G>(data, &mut offset).map_err(DecodeError::InvalidProofR)?;
        let z = encoding::read_scalar::<G>(data, &mut offset).map_err(DecodeError::InvalidProofZ)?;
        Ok(Self { r, z })
    }

    /// Hexadecimal form of the binary encoding
    pub fn to_hex(&self) -> String {
        hex::encode(self.encode())
    }

    /// Decodes the hexadecimal form produced by [`to_hex`](Self::to_hex)
    pub fn from_hex(input: &str) -> Result<Self, DecodeError> {
        Self::decode(&encoding::decode_hex(input)?)
    }

    /// Decodes the JSON form produced by the [`serde::Serialize`] implementation,
    /// reporting failures through the codec error type
    pub fn from_json(input: &str) -> Result<Self, DecodeError> {
        Self::from_json_value(&encoding::json_parse(input)?)
    }

    pub(crate) fn from_json_value(value: &serde_json::Value) -> Result<Self, DecodeError> {
        encoding::json_ciphersuite::<G>(value)?;
        let r = G::deserialize_element(&encoding::json_hex_bytes(value, "r")?)
            .map_err(DecodeError::InvalidProofR)?;
        let z = G::deserialize_scalar(&encoding::json_hex_bytes(value, "z")?)
            .map_err(DecodeError::InvalidProofZ)?;
        Ok(Self { r, z })
    }

    /// Overwrites both components with neutral values
    pub fn clear(&mut self) {
        self.r = G::identity();
        self.z = G::scalar_zero();
    }
}

impl<G: Group> serde::Serialize for Signature<G> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Signature", 3)?;
        state.serialize_field("r", &hex::encode(G::serialize_element(&self.r)))?;
        state.serialize_field("z", &hex::encode(G::serialize_scalar(&self.z)))?;
        state.serialize_field("group", &G::CIPHERSUITE.to_byte())?;
        state.end()
    }
}

impl<'de, G: Group> serde::Deserialize<'de> for Signature<G> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_json_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Fiat-Shamir challenge binding the prover's identifier, public key and nonce
/// commitment
///
/// Every field of the transcript carries a single-byte length prefix, and the
/// domain separation tag is the ciphersuite context string followed by `"dkg"`.
pub(crate) fn challenge<G: Group>(id: u16, public_key: &G::Element, r: &G::Element) -> G::Scalar {
    // element and scalar lengths of every supported group fit a single byte
    let mut input =
        Vec::with_capacity(2 * (1 + G::ELEMENT_LENGTH) + (1 + G::SCALAR_LENGTH) + 4);
    input.push(G::SCALAR_LENGTH as u8);
    input.extend_from_slice(G::serialize_scalar(&G::scalar_from_u64(u64::from(id))).as_ref());
    input.push(3);
    input.extend_from_slice(b"dkg");
    input.push(G::ELEMENT_LENGTH as u8);
    input.extend_from_slice(G::serialize_element(public_key).as_ref());
    input.push(G::ELEMENT_LENGTH as u8);
    input.extend_from_slice(G::serialize_element(r).as_ref());

    let mut dst = Vec::with_capacity(G::CIPHERSUITE.context().len() + 3);
    dst.extend_from_slice(G::CIPHERSUITE.context().as_bytes());
    dst.extend_from_slice(b"dkg");

    G::hash_to_scalar(&input, &dst)
}

/// Proves knowledge of `secret` under the prover's identifier
///
/// `public_key` must equal `base * secret`.
pub fn generate_proof<G: Group>(
    id: u16,
    secret: &G::Scalar,
    public_key: &G::Element,
    rng: &mut (impl RngCore + CryptoRng),
) -> Signature<G> {
    generate_proof_with_nonce(id, secret, public_key, &G::random_scalar(rng))
}

/// Like [`generate_proof`], but with a caller-chosen nonce
///
/// Only useful for deterministic tests against fixed vectors; the nonce must be
/// uniformly random and never reused in production.
pub fn generate_proof_with_nonce<G: Group>(
    id: u16,
    secret: &G::Scalar,
    public_key: &G::Element,
    k: &G::Scalar,
) -> Signature<G> {
    let r = G::generator() * *k;
    let c = challenge::<G>(id, public_key, &r);
    let z = *k + *secret * c;
    Signature { r, z }
}

/// Verifies a proof of knowledge against the prover's identifier and public key
pub fn verify_proof<G: Group>(id: u16, public_key: &G::Element, proof: &Signature<G>) -> bool {
    let c = challenge::<G>(id, public_key, &proof.r);
    let recomputed = G::generator() * proof.z - *public_key * c;
    proof.r == recomputed
}
