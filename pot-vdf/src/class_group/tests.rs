// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::class_group::discriminant::Discriminant;
use crate::class_group::QuadraticForm;
use crate::error::VdfError;
use crate::math::parameterized_group::{multiply, Parameter, ParameterizedGroupElement};
use crate::ToBytes;
use num_bigint::{BigInt, BigUint};
use proptest::prelude::*;

#[test]
fn test_multiplication() {
    let discriminant = Discriminant::try_from(BigInt::from(-47)).unwrap();
    let generator = QuadraticForm::generator(&discriminant).unwrap();
    let mut current = QuadraticForm::zero(&discriminant);
    for i in 0..1000u32 {
        assert_eq!(
            current,
            multiply(&generator, &BigUint::from(i), &discriminant)
        );
        current = current + &generator;
    }
}

#[test]
fn test_large_multiplication() {
    let discriminant = Discriminant::from_seed(b"discriminant seed", 800).unwrap();
    let generator = QuadraticForm::generator(&discriminant).unwrap();
    let mut current = QuadraticForm::zero(&discriminant);
    for i in 0..200u32 {
        assert_eq!(
            current,
            multiply(&generator, &BigUint::from(i), &discriminant)
        );
        current = current + &generator;
    }
}

#[test]
fn test_composition() {
    // The order of the class group (the class number) for -223 is 7 (see https://mathworld.wolfram.com/ClassNumber.html).
    let discriminant = Discriminant::try_from(BigInt::from(-223)).unwrap();
    let g = QuadraticForm::generator(&discriminant).unwrap();

    for i in 1..=6u32 {
        assert_ne!(
            QuadraticForm::zero(&discriminant),
            multiply(&g, &BigUint::from(i), &discriminant)
        );
    }
    assert_eq!(
        QuadraticForm::zero(&discriminant),
        multiply(&g, &BigUint::from(7u32), &discriminant)
    );
}

#[test]
fn test_normalization_and_reduction() {
    let discriminant = Discriminant::try_from(BigInt::from(-223)).unwrap();
    let mut quadratic_form =
        QuadraticForm::from_coefficients(BigInt::from(41), BigInt::from(49), &discriminant)
            .unwrap();
    assert_eq!(quadratic_form.c, BigInt::from(16));

    quadratic_form.normalize();
    assert!(quadratic_form.is_normal());
    assert_eq!(quadratic_form.a, BigInt::from(41));
    assert_eq!(quadratic_form.b, BigInt::from(-33));
    assert_eq!(quadratic_form.c, BigInt::from(8));

    quadratic_form.reduce();
    assert!(quadratic_form.is_reduced());
    assert_eq!(quadratic_form.a, BigInt::from(7));
    assert_eq!(quadratic_form.b, BigInt::from(-1));
    assert_eq!(quadratic_form.c, BigInt::from(8));

    // Reduction is idempotent
    let reduced = quadratic_form.clone();
    quadratic_form.reduce();
    assert_eq!(quadratic_form, reduced);

    // The public constructor reduces
    let form =
        QuadraticForm::from_a_b_and_discriminant(BigInt::from(41), BigInt::from(49), &discriminant)
            .unwrap();
    assert_eq!(form, reduced);
    assert_eq!(form.to_string(), "(7, -1, 8)");
}

#[test]
fn test_invalid_coefficients() {
    let discriminant = Discriminant::try_from(BigInt::from(-223)).unwrap();

    // a must be positive
    assert_eq!(
        QuadraticForm::from_a_b_and_discriminant(BigInt::from(0), BigInt::from(1), &discriminant),
        Err(VdfError::MalformedForm)
    );
    assert_eq!(
        QuadraticForm::from_a_b_and_discriminant(BigInt::from(-2), BigInt::from(1), &discriminant),
        Err(VdfError::MalformedForm)
    );

    // 4a must divide b^2 - d
    assert_eq!(
        QuadraticForm::from_a_b_and_discriminant(BigInt::from(3), BigInt::from(1), &discriminant),
        Err(VdfError::MalformedForm)
    );

    // (3, 3, 3) has discriminant -27 but is not primitive
    let discriminant = Discriminant::try_from(BigInt::from(-27)).unwrap();
    assert_eq!(
        QuadraticForm::from_a_b_and_discriminant(BigInt::from(3), BigInt::from(3), &discriminant),
        Err(VdfError::MalformedForm)
    );
}

#[test]
fn test_generator_requires_one_mod_eight() {
    let discriminant = Discriminant::try_from(BigInt::from(-3)).unwrap();
    assert_eq!(
        QuadraticForm::generator(&discriminant),
        Err(VdfError::MalformedForm)
    );

    let discriminant = Discriminant::try_from(BigInt::from(-223)).unwrap();
    let generator = QuadraticForm::generator(&discriminant).unwrap();
    assert_eq!(generator.a(), &BigInt::from(2));
    assert_eq!(generator.b(), &BigInt::from(1));
    assert_eq!(generator.c(), &BigInt::from(28));
}

#[test]
fn test_identity_and_inverse() {
    let discriminant = Discriminant::from_seed(b"identity seed", 512).unwrap();
    let zero = QuadraticForm::zero(&discriminant);
    assert!(zero.is_reduced());
    assert_eq!(zero.discriminant(), discriminant);
    assert_eq!(zero.double(), zero);

    let g = QuadraticForm::generator(&discriminant).unwrap();
    let h = g.repeated_doubling(10) + &g;
    assert_eq!(h.clone() + &zero, h);
    assert_eq!(&zero + &h, h);
    assert_eq!(h.clone() + (-h.clone()), zero);
    assert_eq!(-zero.clone(), zero);
    assert!(h.is_in_group(&discriminant));
}

#[test]
fn test_compose_checks_discriminant() {
    let discriminant = Discriminant::from_seed(b"seed", 256).unwrap();
    let other_discriminant = Discriminant::from_seed(b"other seed", 256).unwrap();
    let g = QuadraticForm::generator(&discriminant).unwrap();
    let h = QuadraticForm::generator(&other_discriminant).unwrap();

    assert_eq!(g.compose(&h), Err(VdfError::DiscriminantMismatch));
    assert_eq!(g.compose(&g), Ok(g.double()));
    assert!(!h.is_in_group(&discriminant));
}

#[test]
fn test_serialization() {
    let discriminant = Discriminant::from_seed(&[0u8; 32], 512).unwrap();
    assert_eq!(QuadraticForm::serialized_length(&discriminant), 66);

    let g = QuadraticForm::generator(&discriminant).unwrap();
    let bytes = g.to_bytes();
    assert_eq!(bytes.len(), 66);
    assert_eq!(bytes[32], 2);
    assert_eq!(bytes[65], 1);
    assert!(bytes[..32].iter().chain(&bytes[33..65]).all(|b| *b == 0));

    // Negative b coefficients are sign extended
    let inverse = -g;
    assert_eq!(inverse.b(), &BigInt::from(-1));
    let bytes = inverse.to_bytes();
    assert!(bytes[33..].iter().all(|b| *b == 0xff));
    assert_eq!(
        QuadraticForm::from_bytes(&bytes, &discriminant).unwrap(),
        inverse
    );
}

#[test]
fn test_malformed_bytes() {
    let discriminant = Discriminant::from_seed(&[0u8; 32], 512).unwrap();
    let g = QuadraticForm::generator(&discriminant).unwrap();
    let bytes = g.to_bytes();

    // Wrong length
    assert_eq!(
        QuadraticForm::from_bytes(&bytes[1..], &discriminant),
        Err(VdfError::MalformedForm)
    );
    assert_eq!(
        QuadraticForm::from_bytes(&[bytes.clone(), vec![0]].concat(), &discriminant),
        Err(VdfError::MalformedForm)
    );

    // All zeros gives a = 0
    assert_eq!(
        QuadraticForm::from_bytes(&[0u8; 66], &discriminant),
        Err(VdfError::MalformedForm)
    );

    // 8 does not divide 2^2 - d
    let mut modified = bytes.clone();
    modified[65] = 2;
    assert_eq!(
        QuadraticForm::from_bytes(&modified, &discriminant),
        Err(VdfError::MalformedForm)
    );

    // (2, 3, c) is a form of the right discriminant but it is not normal
    let mut modified = bytes.clone();
    modified[65] = 3;
    assert_eq!(
        QuadraticForm::from_bytes(&modified, &discriminant),
        Err(VdfError::MalformedForm)
    );

    // A form of another discriminant
    let other_discriminant = Discriminant::from_seed(&[1u8; 32], 512).unwrap();
    let h = g.repeated_doubling(3);
    assert_eq!(
        QuadraticForm::from_bytes(&h.to_bytes(), &other_discriminant),
        Err(VdfError::MalformedForm)
    );
}

#[test]
fn test_non_reduced_encoding_is_rejected() {
    // (8, 1, 7) is normal but not reduced, (7, -1, 8) is its reduction.
    let discriminant = Discriminant::try_from(BigInt::from(-223)).unwrap();
    assert_eq!(QuadraticForm::serialized_length(&discriminant), 2);
    assert_eq!(
        QuadraticForm::from_bytes(&[8, 1], &discriminant),
        Err(VdfError::MalformedForm)
    );
    let form = QuadraticForm::from_bytes(&[7, 0xff], &discriminant).unwrap();
    assert_eq!(form.c(), &BigInt::from(8));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_group_laws(e1 in any::<u64>(), e2 in any::<u64>()) {
        let discriminant = Discriminant::from_seed(b"proptest seed", 256).unwrap();
        let g = QuadraticForm::generator(&discriminant).unwrap();

        let x = multiply(&g, &BigUint::from(e1), &discriminant);
        let y = multiply(&g, &BigUint::from(e2), &discriminant);
        let sum = multiply(&g, &(BigUint::from(e1) + e2), &discriminant);

        prop_assert_eq!(x.clone() + &y, sum);
        prop_assert_eq!(&x + &y, &y + &x);
        prop_assert_eq!(x.double(), x.clone() + &x);
        prop_assert_eq!(x.clone() + QuadraticForm::zero(&discriminant), x.clone());
        prop_assert!(x.is_reduced());
    }

    #[test]
    fn test_serialization_roundtrip(e in any::<u64>(), negate in any::<bool>()) {
        let discriminant = Discriminant::from_seed(b"proptest seed", 256).unwrap();
        let g = QuadraticForm::generator(&discriminant).unwrap();
        let mut x = multiply(&g, &BigUint::from(e), &discriminant);
        if negate {
            x = -x;
        }
        let bytes = x.to_bytes();
        prop_assert_eq!(bytes.len(), QuadraticForm::serialized_length(&discriminant));
        prop_assert_eq!(QuadraticForm::from_bytes(&bytes, &discriminant).unwrap(), x);
    }
}
