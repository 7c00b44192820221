// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Multi-scalar multiplication in parameterized groups.

use crate::math::parameterized_group::ParameterizedGroupElement;
use num_bigint::BigUint;
use std::cmp::max;

/// Compute `a * x + b * y` using Straus' method (also known as Shamir's trick): both scalars are
/// processed bit by bit from the most significant bit, so the doublings are shared between the two
/// products.
pub fn two_scalar_mul<G: ParameterizedGroupElement>(
    x: &G,
    a: &BigUint,
    y: &G,
    b: &BigUint,
    parameter: &G::ParameterType,
) -> G {
    let x_plus_y = x.clone() + y;

    // The accumulator is None while it is equal to the identity, so the leading doublings are skipped.
    let mut result: Option<G> = None;
    for i in (0..max(a.bits(), b.bits())).rev() {
        result = result.map(|r| r.double());
        let summand = match (a.bit(i), b.bit(i)) {
            (true, true) => Some(&x_plus_y),
            (true, false) => Some(x),
            (false, true) => Some(y),
            (false, false) => None,
        };
        if let Some(summand) = summand {
            result = Some(match result {
                Some(r) => r + summand,
                None => summand.clone(),
            });
        }
    }
    result.unwrap_or_else(|| G::zero(parameter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_group::discriminant::Discriminant;
    use crate::class_group::QuadraticForm;
    use crate::math::parameterized_group::{multiply, Parameter};
    use rand::{thread_rng, RngCore};

    #[test]
    fn test_two_scalar_mul() {
        let discriminant = Discriminant::from_seed(b"two scalar seed", 256).unwrap();
        let g = QuadraticForm::generator(&discriminant).unwrap();
        let h = g.double() + &g;

        let mut rng = thread_rng();
        for _ in 0..10 {
            let mut bytes = [0u8; 12];
            rng.fill_bytes(&mut bytes);
            let a = BigUint::from_bytes_be(&bytes[..8]);
            let b = BigUint::from_bytes_be(&bytes[8..]);

            let expected = multiply(&g, &a, &discriminant) + multiply(&h, &b, &discriminant);
            assert_eq!(two_scalar_mul(&g, &a, &h, &b, &discriminant), expected);
        }

        let zero = BigUint::from(0u8);
        assert_eq!(
            two_scalar_mul(&g, &zero, &h, &zero, &discriminant),
            QuadraticForm::zero(&discriminant)
        );
        assert_eq!(
            two_scalar_mul(&g, &BigUint::from(1u8), &h, &zero, &discriminant),
            g
        );
    }
}
