use frost_dkg::encoding::DecodeError;
use frost_dkg::group::{Edwards25519, Ristretto255};
use frost_dkg::{Ciphersuite, Round1Data, Round2Data};

#[generic_tests::define]
mod generic {
    use frost_dkg::encoding::DecodeError;
    use frost_dkg::group::Group;
    use frost_dkg::nizk;
    use frost_dkg::{Participant, Round1Data, Round2Data, Signature};

    fn sample_round1<G: Group>(rng: &mut rand_dev::DevRng) -> Round1Data<G> {
        Participant::<G>::new(1, 3, 5, rng).unwrap().start(rng).unwrap()
    }

    fn sample_round2<G: Group>(rng: &mut rand_dev::DevRng) -> Round2Data<G> {
        Round2Data {
            sender_identifier: 1,
            recipient_identifier: 2,
            secret_share: G::random_scalar(rng),
        }
    }

    fn sample_signature<G: Group>(rng: &mut rand_dev::DevRng) -> Signature<G> {
        let secret = G::random_scalar(rng);
        let public = G::generator() * secret;
        nizk::generate_proof(7, &secret, &public, rng)
    }

    #[test]
    fn round1_codecs_round_trip<G: Group>() {
        let mut rng = rand_dev::DevRng::new();
        let data = sample_round1::<G>(&mut rng);

        assert_eq!(Round1Data::<G>::decode(&data.encode()).unwrap(), data);
        assert_eq!(Round1Data::<G>::from_hex(&data.to_hex()).unwrap(), data);

        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(Round1Data::<G>::from_json(&json).unwrap(), data);
        assert_eq!(serde_json::from_str::<Round1Data<G>>(&json).unwrap(), data);
    }

    #[test]
    fn round2_codecs_round_trip<G: Group>() {
        let mut rng = rand_dev::DevRng::new();
        let data = sample_round2::<G>(&mut rng);

        assert_eq!(Round2Data::<G>::decode(&data.encode()).unwrap(), data);
        assert_eq!(Round2Data::<G>::from_hex(&data.to_hex()).unwrap(), data);

        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(Round2Data::<G>::from_json(&json).unwrap(), data);
        assert_eq!(serde_json::from_str::<Round2Data<G>>(&json).unwrap(), data);
    }

    #[test]
    fn signature_codecs_round_trip<G: Group>() {
        let mut rng = rand_dev::DevRng::new();
        let signature = sample_signature::<G>(&mut rng);

        assert_eq!(Signature::<G>::decode(&signature.encode()).unwrap(), signature);
        assert_eq!(Signature::<G>::from_hex(&signature.to_hex()).unwrap(), signature);

        let json = serde_json::to_string(&signature).unwrap();
        assert_eq!(Signature::<G>::from_json(&json).unwrap(), signature);
        assert_eq!(serde_json::from_str::<Signature<G>>(&json).unwrap(), signature);
    }

    #[test]
    fn truncated_and_padded_buffers_are_rejected<G: Group>() {
        let mut rng = rand_dev::DevRng::new();

        let bytes = sample_round1::<G>(&mut rng).encode();
        assert!(matches!(
            Round1Data::<G>::decode(&bytes[..bytes.len() - 1]),
            Err(DecodeError::InvalidLength { expected, got })
                if expected == bytes.len() && got == bytes.len() - 1
        ));
        let mut padded = bytes.clone();
        padded.push(0);
        assert!(matches!(
            Round1Data::<G>::decode(&padded),
            Err(DecodeError::InvalidLength { .. })
        ));
        assert!(matches!(
            Round1Data::<G>::decode(&bytes[..3]),
            Err(DecodeError::InvalidLength { .. })
        ));
        assert!(matches!(
            Round1Data::<G>::decode(&[]),
            Err(DecodeError::InvalidLength { .. })
        ));

        let bytes = sample_round2::<G>(&mut rng).encode();
        assert!(matches!(
            Round2Data::<G>::decode(&bytes[..bytes.len() - 1]),
            Err(DecodeError::InvalidLength { expected, got })
                if expected == bytes.len() && got == bytes.len() - 1
        ));

        let bytes = sample_signature::<G>(&mut rng).encode();
        assert!(matches!(
            Signature::<G>::decode(&bytes[..bytes.len() - 1]),
            Err(DecodeError::InvalidLength { expected, got })
                if expected == bytes.len() && got == bytes.len() - 1
        ));
    }

    #[test]
    fn unknown_ciphersuite_byte_is_rejected<G: Group>() {
        let mut rng = rand_dev::DevRng::new();

        let mut bytes = sample_round1::<G>(&mut rng).encode();
        bytes[0] = 0;
        assert!(matches!(
            Round1Data::<G>::decode(&bytes),
            Err(DecodeError::UnknownCiphersuite(0))
        ));

        // 2 is reserved for decaf448
        let mut bytes = sample_round2::<G>(&mut rng).encode();
        bytes[0] = 2;
        assert!(matches!(
            Round2Data::<G>::decode(&bytes),
            Err(DecodeError::UnknownCiphersuite(2))
        ));

        let mut bytes = sample_signature::<G>(&mut rng).encode();
        bytes[0] = 255;
        assert!(matches!(
            Signature::<G>::decode(&bytes),
            Err(DecodeError::UnknownCiphersuite(255))
        ));
    }

    #[test]
    fn corrupted_fields_name_the_subfield<G: Group>() {
        let mut rng = rand_dev::DevRng::new();

        // proof components come right after the 5-byte header
        let bytes = sample_round1::<G>(&mut rng).encode();
        let mut corrupted = bytes.clone();
        corrupted[5..5 + G::ELEMENT_LENGTH].fill(0xff);
        assert!(matches!(
            Round1Data::<G>::decode(&corrupted),
            Err(DecodeError::InvalidProofR(_))
        ));

        let z_offset = 5 + G::ELEMENT_LENGTH;
        let mut corrupted = bytes.clone();
        corrupted[z_offset..z_offset + G::SCALAR_LENGTH].fill(0xff);
        assert!(matches!(
            Round1Data::<G>::decode(&corrupted),
            Err(DecodeError::InvalidProofZ(_))
        ));

        let commitment_offset = z_offset + G::SCALAR_LENGTH;
        let mut corrupted = bytes;
        corrupted[commitment_offset..commitment_offset + G::ELEMENT_LENGTH].fill(0xff);
        assert!(matches!(
            Round1Data::<G>::decode(&corrupted),
            Err(DecodeError::InvalidCommitment(_))
        ));

        let mut bytes = sample_round2::<G>(&mut rng).encode();
        bytes[5..].fill(0xff);
        assert!(matches!(
            Round2Data::<G>::decode(&bytes),
            Err(DecodeError::InvalidSecretShare(_))
        ));
    }

    #[test]
    fn malformed_hex_is_rejected<G: Group>() {
        let mut rng = rand_dev::DevRng::new();

        let hex = sample_round1::<G>(&mut rng).to_hex();
        // odd length
        assert!(matches!(
            Round1Data::<G>::from_hex(&hex[..hex.len() - 1]),
            Err(DecodeError::InvalidHex(_))
        ));
        // non-hex character
        let garbled = format!("0g{}", &hex[2..]);
        assert!(matches!(
            Round1Data::<G>::from_hex(&garbled),
            Err(DecodeError::InvalidHex(_))
        ));
    }

    #[test]
    fn json_structure_is_validated<G: Group>() {
        let mut rng = rand_dev::DevRng::new();
        let data = sample_round1::<G>(&mut rng);
        let document = serde_json::to_value(&data).unwrap();

        assert!(matches!(
            Round1Data::<G>::from_json("not json"),
            Err(DecodeError::JsonSyntax(_))
        ));

        let mut missing_sender = document.clone();
        missing_sender.as_object_mut().unwrap().remove("senderId");
        assert!(matches!(
            Round1Data::<G>::from_json(&missing_sender.to_string()),
            Err(DecodeError::JsonStructure(_))
        ));

        let mut missing_proof = document.clone();
        missing_proof.as_object_mut().unwrap().remove("proof");
        assert!(matches!(
            Round1Data::<G>::from_json(&missing_proof.to_string()),
            Err(DecodeError::JsonStructure(_))
        ));

        // group tags are confined to a single octet range
        let mut out_of_range = document.clone();
        out_of_range["group"] = serde_json::json!(64);
        assert!(matches!(
            Round1Data::<G>::from_json(&out_of_range.to_string()),
            Err(DecodeError::JsonStructure(_))
        ));

        let mut text_tag = document.clone();
        text_tag["group"] = serde_json::json!("1");
        assert!(matches!(
            Round1Data::<G>::from_json(&text_tag.to_string()),
            Err(DecodeError::JsonStructure(_))
        ));

        let mut no_commitment = document.clone();
        no_commitment["commitment"] = serde_json::json!([]);
        assert!(matches!(
            Round1Data::<G>::from_json(&no_commitment.to_string()),
            Err(DecodeError::MissingCommitment)
        ));

        let mut scalar_commitment = document.clone();
        scalar_commitment["commitment"] = serde_json::json!(42);
        assert!(matches!(
            Round1Data::<G>::from_json(&scalar_commitment.to_string()),
            Err(DecodeError::JsonStructure(_))
        ));

        let round2 = sample_round2::<G>(&mut rng);
        let mut document = serde_json::to_value(round2).unwrap();
        document["secretShare"] = serde_json::json!("abc");
        assert!(matches!(
            Round2Data::<G>::from_json(&document.to_string()),
            Err(DecodeError::InvalidHex(_))
        ));
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

// Ristretto255 and edwards25519 share their encoding lengths, so a mixed-up message
// has the right size and must be caught by the ciphersuite tag alone.
#[test]
fn foreign_ciphersuite_tag_is_a_mismatch_not_unknown() {
    let mut rng = rand_dev::DevRng::new();
    let data = frost_dkg::Participant::<Ristretto255>::new(1, 2, 3, &mut rng)
        .unwrap()
        .start(&mut rng)
        .unwrap();

    let err = Round1Data::<Edwards25519>::decode(&data.encode()).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::CiphersuiteMismatch {
            expected: Ciphersuite::Edwards25519Sha512,
            got: Ciphersuite::Ristretto255Sha512,
        }
    ));

    let mut document = serde_json::to_value(&data).unwrap();
    document["group"] = serde_json::json!(Ciphersuite::Edwards25519Sha512.to_byte());
    let err = Round1Data::<Ristretto255>::from_json(&document.to_string()).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::CiphersuiteMismatch {
            expected: Ciphersuite::Ristretto255Sha512,
            got: Ciphersuite::Edwards25519Sha512,
        }
    ));
}

#[test]
fn json_commitment_length_is_capped() {
    let mut rng = rand_dev::DevRng::new();
    let data = frost_dkg::Participant::<Ristretto255>::new(1, 2, 3, &mut rng)
        .unwrap()
        .start(&mut rng)
        .unwrap();

    let mut document = serde_json::to_value(&data).unwrap();
    document["commitment"] = serde_json::json!(vec!["00"; 65536]);
    let err = Round1Data::<Ristretto255>::from_json(&document.to_string()).unwrap_err();
    assert!(matches!(err, DecodeError::CommitmentLengthOverflow(65536)));
}

#[test]
fn round2_json_is_stable() {
    let share = [1u8; 32];
    let secret_share =
        <Ristretto255 as frost_dkg::Group>::deserialize_scalar(&share).unwrap();
    let data = Round2Data::<Ristretto255> {
        sender_identifier: 1,
        recipient_identifier: 2,
        secret_share,
    };
    assert_eq!(
        serde_json::to_string(&data).unwrap(),
        format!(
            "{{\"secretShare\":\"{}\",\"senderId\":1,\"recipientId\":2,\"group\":1}}",
            hex::encode(share)
        )
    );
}
