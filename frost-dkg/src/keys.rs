//! Key material produced by a protocol run
//!
//! [`KeyShare`] is one participant's private output; [`PublicKeyShare`] is the public
//! half every other party may hold; [`KeyShareRegistry`] collects the public shares of
//! a whole signing group and pins the group's verification key.
//!
//! None of these types carries a codec. How long-term key material is stored is the
//! caller's concern, and serializing secrets by accident is worse than requiring a
//! deliberate export.

use core::fmt;
use std::collections::BTreeMap;

use zeroize::Zeroize;

use crate::group::Group;

/// Public output of one participant: its share's public key and VSS commitment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyShare<G: Group> {
    /// Identifier of the participant this share belongs to
    pub id: u16,
    /// Public key of the participant's secret share, `base * share`
    pub public_key: G::Element,
    /// The participant's Feldman commitment from round 1
    pub vss_commitment: Vec<G::Element>,
}

/// One participant's full output of a protocol run
#[derive(Debug, Clone)]
pub struct KeyShare<G: Group> {
    /// The participant's long-term secret share
    pub secret: G::Scalar,
    /// The group's verification key, identical for all participants
    pub verification_key: G::Element,
    /// Public half of this key share
    pub public_key_share: PublicKeyShare<G>,
}

impl<G: Group> KeyShare<G> {
    /// Identifier of the participant holding this share
    pub fn identifier(&self) -> u16 {
        self.public_key_share.id
    }

    /// Public key of the secret share
    pub fn public_key(&self) -> &G::Element {
        &self.public_key_share.public_key
    }
}

impl<G: Group> Zeroize for KeyShare<G> {
    fn zeroize(&mut self) {
        self.secret = G::scalar_zero();
    }
}

/// Registry of the public key shares of one signing group
///
/// Tracks the protocol configuration, one [`PublicKeyShare`] per participant, and the
/// group's verification key once it is known. Identifiers are validated on insertion,
/// so a filled registry always holds internally consistent data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyShareRegistry<G: Group> {
    threshold: u16,
    total: u16,
    participants: BTreeMap<u16, PublicKeyShare<G>>,
    verification_key: Option<G::Element>,
}

impl<G: Group> KeyShareRegistry<G> {
    /// Creates an empty registry for a group of `total` participants with the given
    /// signing threshold
    pub fn new(threshold: u16, total: u16) -> Result<Self, RegistryError> {
        if threshold == 0 || threshold > total {
            return Err(RegistryError::InvalidThreshold { threshold, total });
        }
        Ok(Self {
            threshold,
            total,
            participants: BTreeMap::new(),
            verification_key: None,
        })
    }

    /// The signing threshold of the group
    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    /// The number of participants of the group
    pub fn total(&self) -> u16 {
        self.total
    }

    /// Adds a participant's public key share
    ///
    /// Rejects identifiers outside `1..=total` and refuses to overwrite an already
    /// registered share.
    pub fn add(&mut self, share: PublicKeyShare<G>) -> Result<(), RegistryError> {
        if share.id == 0 {
            return Err(RegistryError::IdentifierZero);
        }
        if share.id > self.total {
            return Err(RegistryError::IdentifierOutOfRange {
                id: share.id,
                total: self.total,
            });
        }
        if self.participants.contains_key(&share.id) {
            return Err(RegistryError::AlreadyRegistered(share.id));
        }
        self.participants.insert(share.id, share);
        Ok(())
    }

    /// The public key share of one participant, if registered
    pub fn get(&self, id: u16) -> Option<&PublicKeyShare<G>> {
        self.participants.get(&id)
    }

    /// Iterates the registered public key shares in identifier order
    pub fn iter(&self) -> impl Iterator<Item = &PublicKeyShare<G>> {
        self.participants.values()
    }

    /// The VSS commitments of all registered participants, in identifier order
    pub fn vss_commitments(&self) -> Vec<&[G::Element]> {
        self.participants
            .values()
            .map(|share| share.vss_commitment.as_slice())
            .collect()
    }

    /// Pins the group's verification key
    ///
    /// A key may be set only once; replacing an already pinned key is an error.
    pub fn set_verification_key(&mut self, key: G::Element) -> Result<(), RegistryError> {
        if self.verification_key.is_some() {
            return Err(RegistryError::VerificationKeyAlreadySet);
        }
        self.verification_key = Some(key);
        Ok(())
    }

    /// The pinned verification key, if any
    pub fn verification_key(&self) -> Option<&G::Element> {
        self.verification_key.as_ref()
    }
}

/// Invalid operation on a [`KeyShareRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The threshold is zero or larger than the group
    InvalidThreshold {
        /// Rejected threshold
        threshold: u16,
        /// Number of participants of the group
        total: u16,
    },
    /// A participant identifier is zero
    IdentifierZero,
    /// A participant identifier exceeds the group size
    IdentifierOutOfRange {
        /// Rejected identifier
        id: u16,
        /// Number of participants of the group
        total: u16,
    },
    /// A share for this identifier is already registered
    AlreadyRegistered(u16),
    /// The verification key is already pinned
    VerificationKeyAlreadySet,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThreshold { threshold, total } => {
                write!(f, "invalid threshold: {threshold} for {total} participants")
            }
            Self::IdentifierZero => f.write_str("identifier is 0"),
            Self::IdentifierOutOfRange { id, total } => {
                write!(f, "identifier {id} exceeds the group size {total}")
            }
            Self::AlreadyRegistered(id) => {
                write!(f, "a share for identifier {id} is already registered")
            }
            Self::VerificationKeyAlreadySet => {
                f.write_str("the verification key is already set")
            }
        }
    }
}

impl std::error::Error for RegistryError {}
