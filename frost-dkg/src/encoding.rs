//! Message codecs
//!
//! Every protocol message has three codecs that round-trip losslessly into each other:
//!
//! * a fixed-layout binary encoding — a single ciphersuite byte, little-endian
//!   16-bit identifier fields, then the fixed-length scalar/element encodings in
//!   declared order;
//! * hex — the hexadecimal form of the binary encoding;
//! * JSON — scalars and elements as lowercase hex strings, identifiers and the
//!   ciphersuite tag as numbers.
//!
//! Decoding is strict: any length mismatch, unknown ciphersuite, or invalid
//! scalar/element is an error naming the offending sub-field, and never leaves a
//! partially updated value behind. JSON decoding is performed in two passes — the raw
//! document is first parsed into an untyped [`serde_json::Value`] to learn the
//! ciphersuite tag (and, for round 1 messages, the commitment length) before any
//! group-typed field is built.

use core::fmt;

use crate::ciphersuite::Ciphersuite;
use crate::group::{Group, InvalidElement, InvalidScalar};

/// Maximum number of commitment elements a message may declare
pub(crate) const MAX_COMMITMENT_LENGTH: usize = u16::MAX as usize;

/// Message decoding failure
///
/// Length errors ([`InvalidLength`](Self::InvalidLength)) are always distinguished
/// from value errors (invalid scalar/element contents) so callers can tell transport
/// corruption from a deliberately malformed payload.
#[derive(Debug)]
pub enum DecodeError {
    /// Buffer length does not match the fixed layout; `expected` is the exact
    /// length when it can be derived from the buffer, or the minimal one otherwise
    InvalidLength {
        /// Expected buffer length
        expected: usize,
        /// Length of the rejected buffer
        got: usize,
    },
    /// Leading ciphersuite byte is unknown or reserved
    UnknownCiphersuite(u8),
    /// Ciphersuite tag is valid but does not match the expected group
    CiphersuiteMismatch {
        /// Ciphersuite the caller expected
        expected: Ciphersuite,
        /// Ciphersuite the message declares
        got: Ciphersuite,
    },
    /// The proof's R component failed to decode
    InvalidProofR(InvalidElement),
    /// The proof's z component failed to decode
    InvalidProofZ(InvalidScalar),
    /// A commitment element failed to decode
    InvalidCommitment(InvalidElement),
    /// The secret share failed to decode
    InvalidSecretShare(InvalidScalar),
    /// Declared commitment length exceeds the protocol maximum of 65535
    CommitmentLengthOverflow(usize),
    /// A round 1 message carries no commitment
    MissingCommitment,
    /// Input is not valid hex
    InvalidHex(hex::FromHexError),
    /// Input is not valid JSON
    JsonSyntax(serde_json::Error),
    /// JSON document misses a field or holds one of the wrong type
    JsonStructure(&'static str),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { expected, got } => {
                write!(f, "invalid encoding length: expected {expected} got {got}")
            }
            Self::UnknownCiphersuite(byte) => write!(f, "invalid ciphersuite: {byte}"),
            Self::CiphersuiteMismatch { expected, got } => {
                write!(f, "ciphersuite mismatch: expected {expected} got {got}")
            }
            Self::InvalidProofR(err) => write!(f, "invalid encoding of R proof: {err}"),
            Self::InvalidProofZ(err) => write!(f, "invalid encoding of z proof: {err}"),
            Self::InvalidCommitment(err) => write!(f, "invalid encoding of commitment: {err}"),
            Self::InvalidSecretShare(err) => write!(f, "invalid encoding of secret share: {err}"),
            Self::CommitmentLengthOverflow(len) => {
                write!(f, "invalid commitment length (exceeds uint16 limit 65535): {len}")
            }
            Self::MissingCommitment => f.write_str("missing commitment"),
            Self::InvalidHex(err) => write!(f, "invalid hex encoding: {err}"),
            Self::JsonSyntax(err) => write!(f, "invalid JSON encoding: {err}"),
            Self::JsonStructure(what) => write!(f, "invalid JSON encoding: {what}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidProofR(err) | Self::InvalidCommitment(err) => Some(err),
            Self::InvalidProofZ(err) | Self::InvalidSecretShare(err) => Some(err),
            Self::InvalidHex(err) => Some(err),
            Self::JsonSyntax(err) => Some(err),
            Self::InvalidLength { .. }
            | Self::UnknownCiphersuite(_)
            | Self::CiphersuiteMismatch { .. }
            | Self::CommitmentLengthOverflow(_)
            | Self::MissingCommitment
            | Self::JsonStructure(_) => None,
        }
    }
}

/// Validates the leading ciphersuite byte against the expected group
pub(crate) fn expect_ciphersuite<G: Group>(byte: u8) -> Result<(), DecodeError> {
    let got = Ciphersuite::from_byte(byte).ok_or(DecodeError::UnknownCiphersuite(byte))?;
    if got != G::CIPHERSUITE {
        return Err(DecodeError::CiphersuiteMismatch {
            expected: G::CIPHERSUITE,
            got,
        });
    }
    Ok(())
}

/// Reads the next fixed-length scalar from `data`, advancing `offset`
///
/// The caller must have validated the total buffer length beforehand.
pub(crate) fn read_scalar<G: Group>(
    data: &[u8],
    offset: &mut usize,
) -> Result<G::Scalar, InvalidScalar> {
    let end = *offset + G::SCALAR_LENGTH;
    let scalar = G::deserialize_scalar(&data[*offset..end])?;
    *offset = end;
    Ok(scalar)
}

/// Reads the next fixed-length element from `data`, advancing `offset`
pub(crate) fn read_element<G: Group>(
    data: &[u8],
    offset: &mut usize,
) -> Result<G::Element, InvalidElement> {
    let end = *offset + G::ELEMENT_LENGTH;
    let element = G::deserialize_element(&data[*offset..end])?;
    *offset = end;
    Ok(element)
}

pub(crate) fn decode_hex(input: &str) -> Result<Vec<u8>, DecodeError> {
    hex::decode(input).map_err(DecodeError::InvalidHex)
}

/// First pass of JSON decoding: raw text into an untyped document
pub(crate) fn json_parse(input: &str) -> Result<serde_json::Value, DecodeError> {
    serde_json::from_str(input).map_err(DecodeError::JsonSyntax)
}

/// Reads the ciphersuite tag out of an untyped JSON document
///
/// The tag must be an integer within 0..=63 identifying an available ciphersuite that
/// matches the expected group.
pub(crate) fn json_ciphersuite<G: Group>(value: &serde_json::Value) -> Result<(), DecodeError> {
    let tag = value
        .get("group")
        .and_then(serde_json::Value::as_u64)
        .ok_or(DecodeError::JsonStructure("missing or malformed group tag"))?;
    let byte = u8::try_from(tag)
        .ok()
        .filter(|byte| *byte <= 63)
        .ok_or(DecodeError::JsonStructure("group tag out of range"))?;
    expect_ciphersuite::<G>(byte)
}

pub(crate) fn json_u16(value: &serde_json::Value, field: &'static str) -> Result<u16, DecodeError> {
    value
        .get(field)
        .and_then(serde_json::Value::as_u64)
        .and_then(|n| u16::try_from(n).ok())
        .ok_or(DecodeError::JsonStructure("missing or malformed identifier"))
}

pub(crate) fn json_hex_bytes(
    value: &serde_json::Value,
    field: &'static str,
) -> Result<Vec<u8>, DecodeError> {
    let text = value
        .get(field)
        .and_then(serde_json::Value::as_str)
        .ok_or(DecodeError::JsonStructure("missing or malformed hex field"))?;
    decode_hex(text)
}

/// Reads the commitment array out of an untyped JSON document, enforcing the
/// protocol's length cap before any group-typed allocation happens
pub(crate) fn json_commitment<'v>(
    value: &'v serde_json::Value,
) -> Result<&'v [serde_json::Value], DecodeError> {
    let entries = value
        .get("commitment")
        .and_then(serde_json::Value::as_array)
        .ok_or(DecodeError::JsonStructure("missing or malformed commitment"))?;
    if entries.len() > MAX_COMMITMENT_LENGTH {
        return Err(DecodeError::CommitmentLengthOverflow(entries.len()));
    }
    Ok(entries)
}
