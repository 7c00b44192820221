// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use pot_vdf::class_group::discriminant::Discriminant;
use pot_vdf::class_group::QuadraticForm;
use pot_vdf::error::VdfError;
use pot_vdf::math::parameterized_group::{Parameter, ParameterizedGroupElement};
use pot_vdf::proof_of_time::{decode_elements, ProofType};
use pot_vdf::ToBytes;

fn setup(seed: &[u8]) -> (Discriminant, QuadraticForm) {
    let discriminant = Discriminant::from_seed(seed, 512).unwrap();
    let input = QuadraticForm::generator(&discriminant).unwrap();
    (discriminant, input)
}

#[test]
fn wesolowski_from_zero_seed() {
    let (discriminant, input) = setup(&[0u8; 32]);

    let (output, proof) = ProofType::Wesolowski
        .prove(&discriminant, &input, 1000)
        .unwrap();
    assert_eq!(output.len(), QuadraticForm::serialized_length(&discriminant));
    assert_eq!(proof.len(), QuadraticForm::serialized_length(&discriminant));

    // Proving is deterministic
    assert_eq!(
        ProofType::Wesolowski
            .prove(&discriminant, &input, 1000)
            .unwrap(),
        (output.clone(), proof.clone())
    );

    let blob = [output, proof].concat();
    assert!(ProofType::Wesolowski
        .verify(&discriminant, &input, 1000, &blob)
        .unwrap());
    assert!(!ProofType::Wesolowski
        .verify(&discriminant, &input, 999, &blob)
        .unwrap());
}

#[test]
fn constructions_agree_on_output() {
    let (discriminant, input) = setup(b"agree");
    let iterations = 257;

    let (wesolowski, _) = ProofType::Wesolowski
        .prove(&discriminant, &input, iterations)
        .unwrap();
    let (pietrzak, _) = ProofType::Pietrzak
        .prove(&discriminant, &input, iterations)
        .unwrap();
    let (n_wesolowski, _) = ProofType::NWesolowski { depth: 3 }
        .prove(&discriminant, &input, iterations)
        .unwrap();

    assert_eq!(wesolowski, pietrzak);
    assert_eq!(wesolowski, n_wesolowski);
    assert_eq!(
        wesolowski,
        input.repeated_doubling(iterations).to_bytes()
    );
}

#[test]
fn n_wesolowski_segments() {
    let (discriminant, input) = setup(b"segments");

    for (iterations, depth) in [(300u64, 3usize), (301, 3), (10, 4)] {
        let proof_type = ProofType::NWesolowski { depth };
        let (output, proof) = proof_type.prove(&discriminant, &input, iterations).unwrap();

        // The segment outputs are the intermediate values of the squaring chain
        let elements = decode_elements(&proof, &discriminant).unwrap();
        assert_eq!(elements.len(), 2 * depth);
        let segment_length = iterations / depth as u64;
        for (i, pair) in elements.chunks_exact(2).enumerate().take(depth - 1) {
            assert_eq!(
                pair[0],
                input.repeated_doubling(segment_length * (i as u64 + 1))
            );
        }
        assert_eq!(elements[2 * depth - 2].to_bytes(), output);

        let blob = [output, proof].concat();
        assert!(proof_type
            .verify(&discriminant, &input, iterations, &blob)
            .unwrap());

        // Verifying with another depth is a structural error
        assert_eq!(
            ProofType::NWesolowski { depth: depth + 1 }.verify(
                &discriminant,
                &input,
                iterations,
                &blob
            ),
            Err(VdfError::SegmentCountMismatch {
                expected: depth + 1,
                actual: depth
            })
        );
    }
}

#[test]
fn pietrzak_even_and_odd_iterations() {
    let (discriminant, input) = setup(b"pietrzak");

    for iterations in [1000u64, 1001, 8, 0] {
        let (output, proof) = ProofType::Pietrzak
            .prove(&discriminant, &input, iterations)
            .unwrap();
        let blob = [output, proof].concat();
        assert!(ProofType::Pietrzak
            .verify(&discriminant, &input, iterations, &blob)
            .unwrap());
    }

    // A proof for an odd number of iterations does not verify for the neighbouring even number
    let (output, proof) = ProofType::Pietrzak
        .prove(&discriminant, &input, 1001)
        .unwrap();
    let blob = [output, proof].concat();
    assert!(!ProofType::Pietrzak
        .verify(&discriminant, &input, 1000, &blob)
        .unwrap());
}

#[test]
fn proofs_are_bound_to_the_discriminant() {
    let (discriminant, input) = setup(b"first");
    let other_discriminant = Discriminant::from_seed(b"second", 512).unwrap();
    let other_input = QuadraticForm::generator(&other_discriminant).unwrap();

    let (output, proof) = ProofType::Wesolowski
        .prove(&discriminant, &input, 100)
        .unwrap();
    let blob = [output, proof].concat();

    // The elements are either not valid in the other group or the proof does not verify there
    assert!(!ProofType::Wesolowski
        .verify(&other_discriminant, &other_input, 100, &blob)
        .unwrap());
}
