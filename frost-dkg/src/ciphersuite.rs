//! Ciphersuite identifiers
//!
//! A [`Ciphersuite`] is the single-byte wire identifier of a (group, hash) pair. Every
//! protocol message starts with this byte, and all parties of one protocol run must
//! agree on it. Unknown or reserved values are always rejected, never defaulted.

use core::fmt;

/// Identifier of the elliptic curve group and hash function used in a protocol run
///
/// The discriminants are part of the wire format and must never change. Values
/// 2 (decaf448), 4 (P-384) and 5 (P-521) are reserved and unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Ciphersuite {
    /// Ristretto255 group with SHA-512
    Ristretto255Sha512 = 1,
    /// NIST P-256 group with SHA-256
    P256Sha256 = 3,
    /// Edwards25519 group with SHA-512
    Edwards25519Sha512 = 6,
    /// secp256k1 group with SHA-256
    Secp256k1Sha256 = 7,
}

impl Ciphersuite {
    /// Parses a wire identifier, returning `None` for any unknown or reserved value
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::Ristretto255Sha512),
            3 => Some(Self::P256Sha256),
            6 => Some(Self::Edwards25519Sha512),
            7 => Some(Self::Secp256k1Sha256),
            _ => None,
        }
    }

    /// Wire identifier of the ciphersuite
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// FROST context string, used for domain separation of every hash invocation
    pub const fn context(self) -> &'static str {
        match self {
            Self::Ristretto255Sha512 => "FROST-RISTRETTO255-SHA512-v1",
            Self::P256Sha256 => "FROST-P256-SHA256-v1",
            Self::Edwards25519Sha512 => "FROST-ED25519-SHA512-v1",
            Self::Secp256k1Sha256 => "FROST-secp256k1-SHA256-v1",
        }
    }

    /// Byte size of an encoded scalar in this ciphersuite
    pub const fn scalar_length(self) -> usize {
        match self {
            Self::Ristretto255Sha512
            | Self::P256Sha256
            | Self::Edwards25519Sha512
            | Self::Secp256k1Sha256 => 32,
        }
    }

    /// Byte size of an encoded group element in this ciphersuite
    pub const fn element_length(self) -> usize {
        match self {
            Self::Ristretto255Sha512 | Self::Edwards25519Sha512 => 32,
            Self::P256Sha256 | Self::Secp256k1Sha256 => 33,
        }
    }
}

impl fmt::Display for Ciphersuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.context())
    }
}
