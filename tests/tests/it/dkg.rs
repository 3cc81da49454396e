#[generic_tests::define(attrs(test_case::case, test))]
mod generic {
    use frost_dkg::dkg::{self, DkgError};
    use frost_dkg::group::Group;
    use rand::seq::SliceRandom;
    use frost_dkg::sharing::{combine_shares, Share};
    use frost_dkg::{KeyShareRegistry, Participant};
    use frost_dkg_tests::{incoming_shares, run_dkg, run_until_finalize};

    #[test_case::case(2, 3; "t2n3")]
    #[test_case::case(3, 5; "t3n5")]
    #[test_case::case(5, 5; "t5n5")]
    fn honest_run_produces_consistent_key_shares<G: Group>(t: u16, n: u16) {
        let mut rng = rand_dev::DevRng::new();
        let key_shares = run_dkg::<G>(t, n, &mut rng);

        // everybody agrees on the verification key
        let verification_key = key_shares[0].verification_key;
        assert!(key_shares
            .iter()
            .all(|ks| ks.verification_key == verification_key));

        // each public key share matches the secret and the commitments
        let commitments = key_shares
            .iter()
            .map(|ks| ks.public_key_share.vss_commitment.as_slice())
            .collect::<Vec<_>>();
        for ks in &key_shares {
            assert_eq!(
                ks.public_key_share.public_key,
                <G as Group>::generator() * ks.secret
            );
            dkg::verify_participant_public_key::<G>(
                ks.identifier(),
                ks.public_key(),
                &commitments,
            )
            .unwrap();
        }
        assert_eq!(
            dkg::verification_key_from_commitments::<G>(&commitments).unwrap(),
            verification_key
        );

        // any t shares reconstruct a secret matching the verification key
        let shares = key_shares
            .iter()
            .map(|ks| Share::<G> {
                id: ks.identifier(),
                secret: ks.secret,
            })
            .collect::<Vec<_>>();
        let group_secret = combine_shares::<G>(t, &shares[..usize::from(t)]).unwrap();
        assert_eq!(<G as Group>::generator() * group_secret, verification_key);
        let subset = shares
            .choose_multiple(&mut rng, usize::from(t))
            .copied()
            .collect::<Vec<_>>();
        assert_eq!(combine_shares::<G>(t, &subset).unwrap(), group_secret);
    }

    #[test]
    fn broadcast_data_alone_determines_public_outputs<G: Group>() {
        let mut rng = rand_dev::DevRng::new();
        let (mut participants, round1, round2) = run_until_finalize::<G>(2, 3, &mut rng);

        let from_round1 = dkg::verification_key_from_round1::<G>(&round1).unwrap();

        for participant in &mut participants {
            let incoming = incoming_shares(&round2, participant.identifier());
            let key_share = participant.finalize(&round1, &incoming).unwrap();
            assert_eq!(key_share.verification_key, from_round1);
        }
    }

    #[test]
    fn tampered_proof_aborts_naming_the_culprit<G: Group>() {
        let mut rng = rand_dev::DevRng::new();
        let participants = (1..=3u16)
            .map(|id| Participant::<G>::new(id, 2, 3, &mut rng).unwrap())
            .collect::<Vec<_>>();
        let mut round1 = participants
            .iter()
            .map(|p| p.start(&mut rng).unwrap())
            .collect::<Vec<_>>();

        let mut observer = Participant::<G>::new(2, 2, 3, &mut rng).unwrap();

        // response tampered
        let mut tampered = round1.clone();
        tampered[0].proof_of_knowledge.z =
            tampered[0].proof_of_knowledge.z + <G as Group>::scalar_one();
        assert_eq!(
            observer.proceed(&tampered).unwrap_err(),
            DkgError::InvalidProofOfKnowledge { culprit: 1 }
        );

        // nonce commitment tampered
        let mut tampered = round1.clone();
        tampered[2].proof_of_knowledge.r =
            tampered[2].proof_of_knowledge.r + <G as Group>::generator();
        assert_eq!(
            observer.proceed(&tampered).unwrap_err(),
            DkgError::InvalidProofOfKnowledge { culprit: 3 }
        );

        // proof bound to the wrong identifier
        round1[0].sender_identifier = 3;
        round1[2].sender_identifier = 1;
        assert!(matches!(
            observer.proceed(&round1).unwrap_err(),
            DkgError::InvalidProofOfKnowledge { .. }
        ));
    }

    #[test]
    fn neutral_commitment_element_aborts<G: Group>() {
        let mut rng = rand_dev::DevRng::new();
        let participants = (1..=3u16)
            .map(|id| Participant::<G>::new(id, 2, 3, &mut rng).unwrap())
            .collect::<Vec<_>>();
        let mut round1 = participants
            .iter()
            .map(|p| p.start(&mut rng).unwrap())
            .collect::<Vec<_>>();

        let mut observer = Participant::<G>::new(2, 2, 3, &mut rng).unwrap();

        round1[0].commitment[0] = <G as Group>::identity();
        assert_eq!(
            observer.proceed(&round1).unwrap_err(),
            DkgError::IdentityCommitmentElement
        );

        round1[0].commitment.clear();
        assert_eq!(
            observer.proceed(&round1).unwrap_err(),
            DkgError::IdentityCommitmentElement
        );
    }

    // Two colluding participants cannot trick the third into accepting a bad share:
    // participant 2 sends a share inconsistent with its broadcast commitment, and
    // participant 3 aborts naming participant 2.
    #[test]
    fn corrupted_share_aborts_naming_the_culprit<G: Group>() {
        let mut rng = rand_dev::DevRng::new();
        let (mut participants, round1, mut round2) = run_until_finalize::<G>(2, 3, &mut rng);

        let package = round2[1].get_mut(&3).unwrap();
        package.secret_share = package.secret_share + <G as Group>::scalar_one();

        let incoming = incoming_shares(&round2, 3);
        assert_eq!(
            participants[2].finalize(&round1, &incoming).unwrap_err(),
            DkgError::InvalidSecretShare { culprit: 2 }
        );
    }

    #[test]
    fn misrouted_round2_packages_are_rejected<G: Group>() {
        let mut rng = rand_dev::DevRng::new();
        let (mut participants, round1, round2) = run_until_finalize::<G>(2, 3, &mut rng);
        let finalizer = &mut participants[2];

        let valid = incoming_shares(&round2, 3);

        // addressed to somebody else
        let mut packages = valid.clone();
        packages[0].recipient_identifier = 2;
        assert_eq!(
            finalizer.finalize(&round1, &packages).unwrap_err(),
            DkgError::Round2InvalidRecipient
        );

        // claims to come from the receiver itself
        let mut packages = valid.clone();
        packages[0].sender_identifier = 3;
        packages[0].recipient_identifier = 1;
        assert_eq!(
            finalizer.finalize(&round1, &packages).unwrap_err(),
            DkgError::Round2PackageFromSelf
        );

        // sender and recipient are the same
        let mut packages = valid.clone();
        packages[0].sender_identifier = 1;
        packages[0].recipient_identifier = 1;
        assert_eq!(
            finalizer.finalize(&round1, &packages).unwrap_err(),
            DkgError::Round2SameSenderAndRecipient
        );

        // sender has no round 1 package
        let mut packages = valid;
        packages[0].sender_identifier = 2;
        let partial_round1 = round1
            .iter()
            .filter(|d| d.sender_identifier != 2)
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(
            finalizer.finalize(&partial_round1, &packages).unwrap_err(),
            DkgError::CommitmentNotFound { id: 2 }
        );
    }

    #[test]
    fn package_counts_are_checked<G: Group>() {
        let mut rng = rand_dev::DevRng::new();
        let participants = (1..=3u16)
            .map(|id| Participant::<G>::new(id, 2, 3, &mut rng).unwrap())
            .collect::<Vec<_>>();
        let round1 = participants
            .iter()
            .map(|p| p.start(&mut rng).unwrap())
            .collect::<Vec<_>>();

        let mut observer = Participant::<G>::new(1, 2, 3, &mut rng).unwrap();

        // own package may be present or absent, anything else is rejected
        assert_eq!(
            observer.proceed(&round1[..1]).unwrap_err(),
            DkgError::Round1CountMismatch {
                max_signers: 3,
                got: 1
            }
        );
        observer.proceed(&round1[1..]).unwrap();

        let (mut participants, round1, round2) = run_until_finalize::<G>(2, 3, &mut rng);
        let incoming = incoming_shares(&round2, 1);
        assert_eq!(
            participants[0].finalize(&round1[..1], &incoming).unwrap_err(),
            DkgError::Round1CountMismatch {
                max_signers: 3,
                got: 1
            }
        );
        assert_eq!(
            participants[0].finalize(&round1, &incoming[..1]).unwrap_err(),
            DkgError::Round2CountMismatch {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn rounds_run_at_most_once<G: Group>() {
        let mut rng = rand_dev::DevRng::new();
        let (mut participants, round1, round2) = run_until_finalize::<G>(2, 3, &mut rng);

        // the polynomial was erased by the second round
        assert_eq!(
            participants[0].proceed(&round1).unwrap_err(),
            DkgError::RoundAlreadyProcessed
        );
        assert_eq!(
            participants[0].start(&mut rng).unwrap_err(),
            DkgError::RoundAlreadyProcessed
        );

        let incoming = incoming_shares(&round2, 1);
        participants[0].finalize(&round1, &incoming).unwrap();
        assert_eq!(
            participants[0].finalize(&round1, &incoming).unwrap_err(),
            DkgError::RoundAlreadyProcessed
        );
    }

    #[test]
    fn registry_verification_detects_tampering<G: Group>() {
        let mut rng = rand_dev::DevRng::new();
        let key_shares = run_dkg::<G>(2, 3, &mut rng);
        let verification_key = key_shares[0].verification_key;

        let mut registry = KeyShareRegistry::<G>::new(2, 3).unwrap();
        for ks in &key_shares {
            registry.add(ks.public_key_share.clone()).unwrap();
        }

        assert_eq!(
            dkg::verify_registry(&registry).unwrap_err(),
            DkgError::MissingVerificationKey
        );

        let mut pinned = registry.clone();
        pinned.set_verification_key(verification_key).unwrap();
        dkg::verify_registry(&pinned).unwrap();

        // wrong verification key
        let mut wrong_key = registry.clone();
        wrong_key
            .set_verification_key(<G as Group>::generator())
            .unwrap();
        assert_eq!(
            dkg::verify_registry(&wrong_key).unwrap_err(),
            DkgError::VerificationKeyMismatch
        );

        // tampered public key share
        let mut tampered = KeyShareRegistry::<G>::new(2, 3).unwrap();
        for ks in &key_shares {
            let mut share = ks.public_key_share.clone();
            if share.id == 2 {
                share.public_key = share.public_key + <G as Group>::generator();
            }
            tampered.add(share).unwrap();
        }
        tampered.set_verification_key(verification_key).unwrap();
        assert_eq!(
            dkg::verify_registry(&tampered).unwrap_err(),
            DkgError::VerificationShareMismatch { id: 2 }
        );
    }

    #[instantiate_tests(<frost_dkg::group::Ristretto255>)]
    mod ristretto255 {}
    #[instantiate_tests(<frost_dkg::group::Edwards25519>)]
    mod edwards25519 {}
    #[instantiate_tests(<frost_dkg::group::P256>)]
    mod p256 {}
    #[instantiate_tests(<frost_dkg::group::Secp256k1>)]
    mod secp256k1 {}
}
