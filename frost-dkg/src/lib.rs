//! Distributed Key Generation for FROST threshold signatures
//!
//! This crate implements the three-round key generation protocol described in the
//! [FROST IETF Draft][draft], in which `n` participants jointly produce key shares
//! for a `t`-out-of-`n` threshold Schnorr setup without ever materializing the group's
//! secret key in one place.
//!
//! A run proceeds through a [`Participant`]:
//! 1. [`start`](dkg::Participant::start) produces a [`Round1Data`] package to
//!    broadcast to every other participant;
//! 2. [`proceed`](dkg::Participant::proceed) consumes all broadcast packages and
//!    produces one private [`Round2Data`] package per peer, to be sent over
//!    confidential authenticated channels;
//! 3. [`finalize`](dkg::Participant::finalize) consumes the private packages and
//!    yields the participant's [`KeyShare`].
//!
//! Misbehavior is detected, not tolerated: a bad proof or share aborts the run with
//! an error naming the culprit, and the group restarts without it. Public outputs can
//! be cross-checked by anyone holding the broadcast data via the free functions of
//! the [`dkg`] module, and collected in a [`KeyShareRegistry`].
//!
//! Four ciphersuites are supported, selected at compile time through the [`Group`]
//! parameter: Ristretto255, edwards25519, NIST P-256 and secp256k1.
//!
//! [draft]: https://www.ietf.org/archive/id/draft-irtf-cfrg-frost-15.html

#![forbid(unsafe_code, unused_crate_dependencies)]
#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
#![deny(missing_docs)]

pub mod ciphersuite;
pub mod dkg;
pub mod encoding;
pub mod group;
pub mod keys;
pub mod messages;
pub mod nizk;
pub mod sharing;

pub use ciphersuite::Ciphersuite;
pub use dkg::{DkgError, Participant};
pub use encoding::DecodeError;
pub use group::Group;
pub use keys::{KeyShare, KeyShareRegistry, PublicKeyShare};
pub use messages::{Round1Data, Round2Data};
pub use nizk::Signature;
