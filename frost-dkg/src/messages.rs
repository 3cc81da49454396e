//! Protocol messages exchanged between participants
//!
//! [`Round1Data`] is broadcast to every participant; [`Round2Data`] is sent privately
//! to its single recipient. Both carry the three codecs described in
//! [`encoding`](crate::encoding).

use serde::ser::SerializeStruct;

use crate::encoding::{self, DecodeError, MAX_COMMITMENT_LENGTH};
use crate::group::Group;
use crate::nizk::Signature;

/// Broadcast output of the first round
///
/// Carries the sender's Feldman commitment and its proof of knowledge of the
/// committed constant term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round1Data<G: Group> {
    /// Identifier of the sending participant
    pub sender_identifier: u16,
    /// Feldman commitment to the sender's secret polynomial
    pub commitment: Vec<G::Element>,
    /// Schnorr proof of knowledge of the committed secret
    pub proof_of_knowledge: Signature<G>,
}

impl<G: Group> Round1Data<G> {
    /// Compact binary encoding
    ///
    /// Layout: ciphersuite byte, sender identifier and commitment length as
    /// little-endian 16-bit integers, the proof's `r` and `z`, then the commitment
    /// elements in order.
    pub fn encode(&self) -> Vec<u8> {
        debug_assert!(self.commitment.len() <= MAX_COMMITMENT_LENGTH);
        let size = 5 + G::ELEMENT_LENGTH + G::SCALAR_LENGTH
            + self.commitment.len() * G::ELEMENT_LENGTH;
        let mut out = Vec::with_capacity(size);
        out.push(G::CIPHERSUITE.to_byte());
        out.extend_from_slice(&self.sender_identifier.to_le_bytes());
        out.extend_from_slice(&(self.commitment.len() as u16).to_le_bytes());
        out.extend_from_slice(G::serialize_element(&self.proof_of_knowledge.r).as_ref());
        out.extend_from_slice(G::serialize_scalar(&self.proof_of_knowledge.z).as_ref());
        for element in &self.commitment {
            out.extend_from_slice(G::serialize_element(element).as_ref());
        }
        out
    }

    /// Decodes the binary encoding produced by [`encode`](Self::encode)
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let min = 5 + G::ELEMENT_LENGTH + G::SCALAR_LENGTH;
        if data.len() <= 5 {
            return Err(DecodeError::InvalidLength {
                expected: min,
                got: data.len(),
            });
        }
        encoding::expect_ciphersuite::<G>(data[0])?;

        let sender_identifier = u16::from_le_bytes([data[1], data[2]]);
        let commitment_length = usize::from(u16::from_le_bytes([data[3], data[4]]));
        let expected = min + commitment_length * G::ELEMENT_LENGTH;
        if data.len() != expected {
            return Err(DecodeError::InvalidLength {
                expected,
                got: data.len(),
            });
        }

        let mut offset = 5;
        let r = encoding::read_element::<G>(data, &mut offset).map_err(DecodeError::InvalidProofR)?;
        let z = encoding::read_scalar::<G>(data, &mut offset).map_err(DecodeError::InvalidProofZ)?;
        let mut commitment = Vec::with_capacity(commitment_length);
        for _ in 0..commitment_length {
            let element = encoding::read_element::<G>(data, &mut offset)
                .map_err(DecodeError::InvalidCommitment)?;
            commitment.push(element);
        }

        Ok(Self {
            sender_identifier,
            commitment,
            proof_of_knowledge: Signature { r, z },
        })
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

    fn from_json_value(value: &serde_json::Value) -> Result<Self, DecodeError> {
        encoding::json_ciphersuite::<G>(value)?;
        let sender_identifier = encoding::json_u16(value, "senderId")?;
        let proof = value
            .get("proof")
            .ok_or(DecodeError::JsonStructure("missing or malformed proof"))?;
        let proof_of_knowledge = Signature::from_json_value(proof)?;

        let entries = encoding::json_commitment(value)?;
        if entries.is_empty() {
            return Err(DecodeError::MissingCommitment);
        }
        let mut commitment = Vec::with_capacity(entries.len());
        for entry in entries {
            let text = entry
                .as_str()
                .ok_or(DecodeError::JsonStructure("missing or malformed commitment"))?;
            let element = G::deserialize_element(&encoding::decode_hex(text)?)
                .map_err(DecodeError::InvalidCommitment)?;
            commitment.push(element);
        }

        Ok(Self {
            sender_identifier,
            commitment,
            proof_of_knowledge,
        })
    }
}

impl<G: Group> serde::Serialize for Round1Data<G> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let commitment = self
            .commitment
            .iter()
            .map(|element| hex::encode(G::serialize_element(element)))
            .collect::<Vec<_>>();

        let mut state = serializer.serialize_struct("Round1Data", 4)?;
        state.serialize_field("proof", &self.proof_of_knowledge)?;
        state.serialize_field("commitment", &commitment)?;
        state.serialize_field("senderId", &self.sender_identifier)?;
        state.serialize_field("group", &G::CIPHERSUITE.to_byte())?;
        state.end()
    }
}

impl<'de, G: Group> serde::Deserialize<'de> for Round1Data<G> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_json_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Peer-to-peer output of the second round
///
/// Carries one evaluation of the sender's secret polynomial, addressed to exactly one
/// recipient. It must be transmitted over a confidential, authenticated channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round2Data<G: Group> {
    /// Identifier of the sending participant
    pub sender_identifier: u16,
    /// Identifier of the intended recipient
    pub recipient_identifier: u16,
    /// Evaluation of the sender's polynomial at the recipient's identifier
    pub secret_share: G::Scalar,
}

impl<G: Group> Round2Data<G> {
    /// Compact binary encoding: ciphersuite byte, sender and recipient identifiers
    /// as little-endian 16-bit integers, then the share
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(5 + G::SCALAR_LENGTH);
        out.push(G::CIPHERSUITE.to_byte());
        out.extend_from_slice(&self.sender_identifier.to_le_bytes());
        out.extend_from_slice(&self.recipient_identifier.to_le_bytes());
        out.extend_from_slice(G::serialize_scalar(&self.secret_share).as_ref());
        out
    }

    /// Decodes the binary encoding produced by [`encode`](Self::encode)
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let expected = 5 + G::SCALAR_LENGTH;
        if data.len() <= 5 {
            return Err(DecodeError::InvalidLength {
                expected,
                got: data.len(),
            });
        }
        encoding::expect_ciphersuite::<G>(data[0])?;
        if data.len() != expected {
            return Err(DecodeError::InvalidLength {
                expected,
                got: data.len(),
            });
        }

        let sender_identifier = u16::from_le_bytes([data[1], data[2]]);
        let recipient_identifier = u16::from_le_bytes([data[3], data[4]]);
        let mut offset = 5;
        let secret_share = encoding::read_scalar::<G>(data, &mut offset)
            .map_err(DecodeError::InvalidSecretShare)?;

        Ok(Self {
            sender_identifier,
            recipient_identifier,
            secret_share,
        })
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

    fn from_json_value(value: &serde_json::Value) -> Result<Self, DecodeError> {
        encoding::json_ciphersuite::<G>(value)?;
        let sender_identifier = encoding::json_u16(value, "senderId")?;
        let recipient_identifier = encoding::json_u16(value, "recipientId")?;
        let secret_share = G::deserialize_scalar(&encoding::json_hex_bytes(value, "secretShare")?)
            .map_err(DecodeError::InvalidSecretShare)?;

        Ok(Self {
            sender_identifier,
            recipient_identifier,
            secret_share,
        })
    }
}

impl<G: Group> serde::Serialize for Round2Data<G> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Round2Data", 4)?;
        state.serialize_field(
            "secretShare",
            &hex::encode(G::serialize_scalar(&self.secret_share)),
        )?;
        state.serialize_field("senderId", &self.sender_identifier)?;
        state.serialize_field("recipientId", &self.recipient_identifier)?;
        state.serialize_field("group", &G::CIPHERSUITE.to_byte())?;
        state.end()
    }
}

impl<'de, G: Group> serde::Deserialize<'de> for Round2Data<G> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_json_value(&value).map_err(serde::de::Error::custom)
    }
}
