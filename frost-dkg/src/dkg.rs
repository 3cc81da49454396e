//! Distributed key generation state machine
//!
//! A [`Participant`] walks through the three rounds of the FROST key generation:
//!
//! 1. [`start`](Participant::start) — commit to a fresh secret polynomial and prove
//!    knowledge of its constant term; the result is broadcast to every peer.
//! 2. [`proceed`](Participant::proceed) — verify every peer's proof and produce one
//!    private share per peer. On success the polynomial is erased.
//! 3. [`finalize`](Participant::finalize) — verify every received share against its
//!    sender's commitment and fold everything into the participant's [`KeyShare`].
//!
//! Any verification failure aborts the run for this participant and names the
//! culprit, so the group can exclude it and restart. The free functions at the bottom
//! derive and check public values from broadcast data alone, for parties that only
//! observe the protocol.

use core::fmt;
use std::collections::BTreeMap;

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::group::Group;
use crate::keys::{KeyShare, KeyShareRegistry, PublicKeyShare};
use crate::messages::{Round1Data, Round2Data};
use crate::nizk;
use crate::sharing::{self, Polynomial, PolynomialError};

/// One party of the key generation protocol
///
/// The same instance must be used for the whole run: the secret polynomial sampled at
/// construction links the rounds together. Secrets are erased as soon as the round
/// that needs them completes, and a round whose secrets are gone refuses to run
/// again.
pub struct Participant<G: Group> {
    identifier: u16,
    threshold: u16,
    max_signers: u16,
    polynomial: Polynomial<G>,
    secret_share: G::Scalar,
    commitment: Vec<G::Element>,
}

impl<G: Group> Participant<G> {
    /// Creates a participant with a freshly sampled secret polynomial
    ///
    /// `identifier` must be unique within the group and within `1..=max_signers`;
    /// `threshold` must be within `1..=max_signers`.
    pub fn new(
        identifier: u16,
        threshold: u16,
        max_signers: u16,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Self, DkgError> {
        check_config(identifier, threshold, max_signers)?;
        let polynomial = Polynomial::random(threshold, rng)?;
        Ok(Self::init(identifier, threshold, max_signers, polynomial))
    }

    /// Creates a participant from a caller-supplied polynomial
    ///
    /// Re-instantiates the same participant across process restarts when the same
    /// coefficients are provided. The coefficients are validated like
    /// [`Polynomial::from_coefficients`] does.
    pub fn from_polynomial(
        identifier: u16,
        threshold: u16,
        max_signers: u16,
        coefficients: Vec<G::Scalar>,
    ) -> Result<Self, DkgError> {
        check_config(identifier, threshold, max_signers)?;
        let polynomial = Polynomial::from_coefficients(threshold, coefficients)?;
        Ok(Self::init(identifier, threshold, max_signers, polynomial))
    }

    fn init(identifier: u16, threshold: u16, max_signers: u16, polynomial: Polynomial<G>) -> Self {
        let secret_share = polynomial.evaluate_at(identifier);
        let commitment = sharing::commit(&polynomial);
        Self {
            identifier,
            threshold,
            max_signers,
            polynomial,
            secret_share,
            commitment,
        }
    }

    /// This participant's identifier
    pub fn identifier(&self) -> u16 {
        self.identifier
    }

    /// The signing threshold of the run
    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    /// The number of participants of the run
    pub fn max_signers(&self) -> u16 {
        self.max_signers
    }

    /// The participant's Feldman commitment
    pub fn commitment(&self) -> &[G::Element] {
        &self.commitment
    }

    /// First round: the broadcast package carrying the commitment and the proof of
    /// knowledge of the committed secret
    pub fn start(&self, rng: &mut (impl RngCore + CryptoRng)) -> Result<Round1Data<G>, DkgError> {
        self.start_with_nonce(&G::random_scalar(rng))
    }

    /// Like [`start`](Participant::start), but with a caller-chosen proof nonce
    ///
    /// Only useful for deterministic tests; the nonce must be uniformly random and
    /// never reused in production.
    pub fn start_with_nonce(&self, nonce: &G::Scalar) -> Result<Round1Data<G>, DkgError> {
        if self.polynomial.is_zeroed() {
            return Err(DkgError::RoundAlreadyProcessed);
        }
        let proof_of_knowledge = nizk::generate_proof_with_nonce(
            self.identifier,
            self.polynomial.constant_term(),
            &self.commitment[0],
            nonce,
        );
        Ok(Round1Data {
            sender_identifier: self.identifier,
            commitment: self.commitment.clone(),
            proof_of_knowledge,
        })
    }

    /// Second round: verifies every peer's broadcast package and produces the
    /// private share addressed to each peer, keyed by recipient identifier
    ///
    /// `round1` must hold one package per participant; the participant's own package
    /// may be present or omitted. On success the secret polynomial is erased and the
    /// round cannot run again.
    pub fn proceed(
        &mut self,
        round1: &[Round1Data<G>],
    ) -> Result<BTreeMap<u16, Round2Data<G>>, DkgError> {
        if self.polynomial.is_zeroed() {
            return Err(DkgError::RoundAlreadyProcessed);
        }
        check_round1_count(round1.len(), self.max_signers)?;

        let mut round2 = BTreeMap::new();
        for data in round1 {
            let peer = data.sender_identifier;
            if peer == self.identifier {
                continue;
            }

            match data.commitment.first() {
                None => return Err(DkgError::IdentityCommitmentElement),
                Some(first) if G::is_identity(first) => {
                    return Err(DkgError::IdentityCommitmentElement)
                }
                Some(_) => {}
            }
            if !nizk::verify_proof(peer, &data.commitment[0], &data.proof_of_knowledge) {
                return Err(DkgError::InvalidProofOfKnowledge { culprit: peer });
            }

            round2.insert(
                peer,
                Round2Data {
                    sender_identifier: self.identifier,
                    recipient_identifier: peer,
                    secret_share: self.polynomial.evaluate_at(peer),
                },
            );
        }

        self.polynomial.zeroize();
        Ok(round2)
    }

    /// Third round: verifies every received share and folds the run's outputs into
    /// this participant's [`KeyShare`]
    ///
    /// `round1` is the same broadcast set given to [`proceed`](Participant::proceed);
    /// `round2` must hold exactly one package from every peer, addressed to this
    /// participant. On success the intermediary secret share is erased and the round
    /// cannot run again.
    pub fn finalize(
        &mut self,
        round1: &[Round1Data<G>],
        round2: &[Round2Data<G>],
    ) -> Result<KeyShare<G>, DkgError> {
        if G::is_zero_scalar(&self.secret_share) {
            return Err(DkgError::RoundAlreadyProcessed);
        }
        check_round1_count(round1.len(), self.max_signers)?;
        if round2.len() != usize::from(self.max_signers - 1) {
            return Err(DkgError::Round2CountMismatch {
                expected: self.max_signers - 1,
                got: round2.len(),
            });
        }

        let mut secret = G::scalar_zero();
        let mut verification_key = G::identity();
        for data in round2 {
            let peer_commitment = self.verify_round2_data(round1, data)?;
            secret = secret + data.secret_share;
            verification_key = verification_key + peer_commitment;
        }

        secret = secret + self.secret_share;
        self.secret_share = G::scalar_zero();
        verification_key = verification_key + self.commitment[0];

        Ok(KeyShare {
            secret,
            verification_key,
            public_key_share: PublicKeyShare {
                id: self.identifier,
                public_key: G::generator() * secret,
                vss_commitment: self.commitment.clone(),
            },
        })
    }

    fn verify_round2_data(
        &self,
        round1: &[Round1Data<G>],
        data: &Round2Data<G>,
    ) -> Result<G::Element, DkgError> {
        if data.recipient_identifier == data.sender_identifier {
            return Err(DkgError::Round2SameSenderAndRecipient);
        }
        if data.sender_identifier == self.identifier {
            return Err(DkgError::Round2PackageFromSelf);
        }
        if data.recipient_identifier != self.identifier {
            return Err(DkgError::Round2InvalidRecipient);
        }

        let commitment = find_commitment(round1, data.sender_identifier)?;

        let public_key = G::generator() * data.secret_share;
        if !sharing::verify_public_key_share::<G>(self.identifier, &public_key, commitment) {
            return Err(DkgError::InvalidSecretShare {
                culprit: data.sender_identifier,
            });
        }

        Ok(commitment[0])
    }
}

impl<G: Group> Zeroize for Participant<G> {
    fn zeroize(&mut self) {
        self.polynomial.zeroize();
        self.secret_share = G::scalar_zero();
    }
}

impl<G: Group> Drop for Participant<G> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<G: Group> fmt::Debug for Participant<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Participant")
            .field("identifier", &self.identifier)
            .field("threshold", &self.threshold)
            .field("max_signers", &self.max_signers)
            .finish_non_exhaustive()
    }
}

fn check_config(identifier: u16, threshold: u16, max_signers: u16) -> Result<(), DkgError> {
    if identifier == 0 {
        return Err(DkgError::IdentifierZero);
    }
    if identifier > max_signers {
        return Err(DkgError::IdentifierOutOfRange {
            id: identifier,
            max_signers,
        });
    }
    if threshold == 0 || threshold > max_signers {
        return Err(DkgError::InvalidThreshold {
            threshold,
            max_signers,
        });
    }
    Ok(())
}

fn check_round1_count(got: usize, max_signers: u16) -> Result<(), DkgError> {
    // the participant's own broadcast package may be included or left out
    if got != usize::from(max_signers) && got != usize::from(max_signers - 1) {
        return Err(DkgError::Round1CountMismatch { max_signers, got });
    }
    Ok(())
}

fn find_commitment<G: Group>(
    round1: &[Round1Data<G>],
    id: u16,
) -> Result<&[G::Element], DkgError> {
    for data in round1 {
        if data.sender_identifier == id {
            if data.commitment.is_empty() {
                return Err(DkgError::EmptyCommitment { id });
            }
            return Ok(&data.commitment);
        }
    }
    Err(DkgError::CommitmentNotFound { id })
}

/// The group's verification key, derived from the full round 1 broadcast set
pub fn verification_key_from_round1<G: Group>(
    round1: &[Round1Data<G>],
) -> Result<G::Element, DkgError> {
    let mut key = G::identity();
    for data in round1 {
        let first = data
            .commitment
            .first()
            .ok_or(DkgError::MissingCommitment)?;
        key = key + *first;
    }
    Ok(key)
}

/// The group's verification key, derived from every participant's VSS commitment
pub fn verification_key_from_commitments<G: Group>(
    commitments: &[&[G::Element]],
) -> Result<G::Element, DkgError> {
    let mut key = G::identity();
    for commitment in commitments {
        let first = commitment.first().ok_or(DkgError::MissingCommitment)?;
        key = key + *first;
    }
    Ok(key)
}

/// The public key of participant `id`'s secret share, derived from every
/// participant's VSS commitment
pub fn participant_public_key<G: Group>(
    id: u16,
    commitments: &[&[G::Element]],
) -> Result<G::Element, DkgError> {
    if commitments.is_empty() {
        return Err(DkgError::MissingCommitment);
    }

    let mut public_key = G::identity();
    for commitment in commitments {
        if commitment.is_empty() {
            return Err(DkgError::MissingCommitment);
        }
        let contribution = sharing::pubkey_for_commitment::<G>(id, commitment)
            .map_err(|_| DkgError::IdentifierZero)?;
        public_key = public_key + contribution;
    }
    Ok(public_key)
}

/// Verifies that `public_key` is the correct public key share of participant `id`
/// under the group's VSS commitments
pub fn verify_participant_public_key<G: Group>(
    id: u16,
    public_key: &G::Element,
    commitments: &[&[G::Element]],
) -> Result<(), DkgError> {
    let expected = participant_public_key::<G>(id, commitments)?;
    if expected != *public_key {
        return Err(DkgError::VerificationShareMismatch { id });
    }
    Ok(())
}

/// Verifies the internal consistency of a filled registry
///
/// Every registered public key share is checked against the full commitment set, and
/// the pinned verification key against the one the commitments imply.
pub fn verify_registry<G: Group>(registry: &KeyShareRegistry<G>) -> Result<(), DkgError> {
    let commitments = registry.vss_commitments();
    for share in registry.iter() {
        verify_participant_public_key::<G>(share.id, &share.public_key, &commitments)?;
    }

    let expected = verification_key_from_commitments::<G>(&commitments)?;
    let pinned = registry
        .verification_key()
        .ok_or(DkgError::MissingVerificationKey)?;
    if *pinned != expected {
        return Err(DkgError::VerificationKeyMismatch);
    }
    Ok(())
}

/// Protocol failure
///
/// The `ABORT` variants mean a peer misbehaved: the named culprit must be excluded
/// and the whole run restarted from scratch. Every other variant is a local usage or
/// input error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DkgError {
    /// The participant identifier is zero
    IdentifierZero,
    /// The participant identifier exceeds the group size
    IdentifierOutOfRange {
        /// Rejected identifier
        id: u16,
        /// Number of participants of the run
        max_signers: u16,
    },
    /// The threshold is zero or larger than the group
    InvalidThreshold {
        /// Rejected threshold
        threshold: u16,
        /// Number of participants of the run
        max_signers: u16,
    },
    /// The caller-supplied polynomial is invalid
    InvalidPolynomial(PolynomialError),
    /// The round 1 broadcast set has the wrong number of packages
    Round1CountMismatch {
        /// Number of participants of the run
        max_signers: u16,
        /// Number of packages received
        got: usize,
    },
    /// The round 2 set has the wrong number of packages
    Round2CountMismatch {
        /// Expected number of packages, one per peer
        expected: u16,
        /// Number of packages received
        got: usize,
    },
    /// A peer's proof of knowledge failed to verify; the run must abort
    InvalidProofOfKnowledge {
        /// Identifier of the misbehaving peer
        culprit: u16,
    },
    /// A peer's secret share contradicts its commitment; the run must abort
    InvalidSecretShare {
        /// Identifier of the misbehaving peer
        culprit: u16,
    },
    /// A round 1 commitment is empty or starts with the neutral element
    IdentityCommitmentElement,
    /// No round 1 package from the given sender
    CommitmentNotFound {
        /// Identifier whose commitment is missing
        id: u16,
    },
    /// The given sender's round 1 package has an empty commitment
    EmptyCommitment {
        /// Identifier whose commitment is empty
        id: u16,
    },
    /// A round 2 package names the same sender and recipient
    Round2SameSenderAndRecipient,
    /// A round 2 package claims to come from this participant
    Round2PackageFromSelf,
    /// A round 2 package is addressed to somebody else
    Round2InvalidRecipient,
    /// The round already ran and its secrets have been erased
    RoundAlreadyProcessed,
    /// A commitment set is empty or holds an empty commitment
    MissingCommitment,
    /// A public key share does not match the commitments
    VerificationShareMismatch {
        /// Identifier whose share failed verification
        id: u16,
    },
    /// The registry's verification key does not match the commitments
    VerificationKeyMismatch,
    /// The registry has no verification key pinned
    MissingVerificationKey,
}

impl From<PolynomialError> for DkgError {
    fn from(err: PolynomialError) -> Self {
        Self::InvalidPolynomial(err)
    }
}

impl fmt::Display for DkgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdentifierZero => f.write_str("identifier is 0"),
            Self::IdentifierOutOfRange { id, max_signers } => {
                write!(f, "identifier is above authorized range [1:{max_signers}]: {id}")
            }
            Self::InvalidThreshold {
                threshold,
                max_signers,
            } => write!(f, "invalid threshold {threshold} for {max_signers} participants"),
            Self::InvalidPolynomial(err) => write!(f, "invalid polynomial: {err}"),
            Self::Round1CountMismatch { .. } => {
                f.write_str("invalid number of expected round 1 data packets")
            }
            Self::Round2CountMismatch { .. } => {
                f.write_str("invalid number of expected round 2 data packets")
            }
            Self::InvalidProofOfKnowledge { culprit } => {
                write!(f, "ABORT - invalid signature: participant {culprit}")
            }
            Self::InvalidSecretShare { culprit } => {
                write!(f, "ABORT - invalid secret share received from peer: {culprit}")
            }
            Self::IdentityCommitmentElement => f.write_str("commitment has neutral element"),
            Self::CommitmentNotFound { id } => {
                write!(f, "commitment not found in round 1 data for participant: {id}")
            }
            Self::EmptyCommitment { id } => write!(f, "commitment is empty: {id}"),
            Self::Round2SameSenderAndRecipient => {
                f.write_str("malformed round 2 package: sender and recipient are the same")
            }
            Self::Round2PackageFromSelf => {
                f.write_str("mixed packages: received a round 2 package from itself")
            }
            Self::Round2InvalidRecipient => f.write_str("invalid receiver in round 2 package"),
            Self::RoundAlreadyProcessed => {
                f.write_str("round already processed: secrets have been erased")
            }
            Self::MissingCommitment => f.write_str("missing commitment"),
            Self::VerificationShareMismatch { id } => {
                write!(f, "failed to compute correct verification share for participant {id}")
            }
            Self::VerificationKeyMismatch => {
                f.write_str("verification key does not match the commitments")
            }
            Self::MissingVerificationKey => f.write_str("no verification key set"),
        }
    }
}

impl std::error::Error for DkgError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPolynomial(err) => Some(err),
            _ => None,
        }
    }
}
