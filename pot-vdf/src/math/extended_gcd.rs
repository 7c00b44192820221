// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! This module contains an implementation of the extended Euclidean algorithm for [BigInt]`s.
//! Besides the gcd and the Bezout coefficients, it also returns the quotients of the two inputs
//! divided by the GCD since these are used by the NUCOMP and NUDUPL algorithms and come out for
//! free while computing the Bezout coefficients.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::mem;
use std::ops::Neg;

/// The output of the extended Euclidean algorithm on inputs `a` and `b`: The Bezout coefficients `x`
/// and `y` such that `ax + by = gcd`. The quotients `a / gcd` and `b / gcd` are also returned.
pub struct EuclideanAlgorithmOutput {
    pub gcd: BigInt,
    pub x: BigInt,
    pub y: BigInt,
    pub a_divided_by_gcd: BigInt,
    pub b_divided_by_gcd: BigInt,
}

impl EuclideanAlgorithmOutput {
    fn flip(self) -> Self {
        Self {
            gcd: self.gcd,
            x: self.y,
            y: self.x,
            a_divided_by_gcd: self.b_divided_by_gcd,
            b_divided_by_gcd: self.a_divided_by_gcd,
        }
    }
}

/// Compute the greatest common divisor gcd of a and b. The output also returns the Bezout coefficients
/// x and y such that ax + by = gcd and also the quotients a / gcd and b / gcd.
pub fn extended_euclidean_algorithm(a: &BigInt, b: &BigInt) -> EuclideanAlgorithmOutput {
    if b < a {
        return extended_euclidean_algorithm(b, a).flip();
    }

    let mut s = (BigInt::zero(), BigInt::one());
    let mut t = (BigInt::one(), BigInt::zero());
    let mut r = (a.clone(), b.clone());

    while !r.0.is_zero() {
        let (q, r_prime) = r.1.div_rem(&r.0);
        r.1 = mem::replace(&mut r.0, r_prime);

        let step = |mut x: (BigInt, BigInt)| {
            mem::swap(&mut x.0, &mut x.1);
            x.0 -= &q * &x.1;
            x
        };
        s = step(s);
        t = step(t);
    }

    // The last coefficients are equal to +/- a / gcd(a,b) and b / gcd(a,b) respectively.
    let a_divided_by_gcd = if a.sign() != s.0.sign() {
        s.0.neg()
    } else {
        s.0
    };
    let b_divided_by_gcd = if b.sign() != t.0.sign() {
        t.0.neg()
    } else {
        t.0
    };

    if !r.1.is_negative() {
        EuclideanAlgorithmOutput {
            gcd: r.1,
            x: t.1,
            y: s.1,
            a_divided_by_gcd,
            b_divided_by_gcd,
        }
    } else {
        EuclideanAlgorithmOutput {
            gcd: r.1.neg(),
            x: t.1.neg(),
            y: s.1.neg(),
            a_divided_by_gcd,
            b_divided_by_gcd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::extended_euclidean_algorithm;
    use num_bigint::{BigInt, Sign};
    use num_integer::Integer;
    use rand::{thread_rng, RngCore};

    fn check_xgcd(a: BigInt, b: BigInt) {
        let output = extended_euclidean_algorithm(&a, &b);
        assert_eq!(output.gcd, a.gcd(&b));
        assert_eq!(&output.x * &a + &output.y * &b, output.gcd);
        assert_eq!(output.a_divided_by_gcd, &a / &output.gcd);
        assert_eq!(output.b_divided_by_gcd, &b / &output.gcd);
    }

    #[test]
    fn test_xgcd() {
        check_xgcd(BigInt::from(240), BigInt::from(46));
        check_xgcd(BigInt::from(-240), BigInt::from(46));
        check_xgcd(BigInt::from(240), BigInt::from(-46));
        check_xgcd(BigInt::from(-240), BigInt::from(-46));
        check_xgcd(BigInt::from(17), BigInt::from(17));
        check_xgcd(BigInt::from(0), BigInt::from(5));
        check_xgcd(BigInt::from(5), BigInt::from(0));
    }

    #[test]
    fn test_large_xgcd() {
        let bytes = 128;
        let mut rng = thread_rng();
        for _ in 0..100 {
            let mut a_bytes = vec![0u8; bytes];
            rng.fill_bytes(&mut a_bytes);
            let mut b_bytes = vec![0u8; bytes];
            rng.fill_bytes(&mut b_bytes);
            check_xgcd(
                BigInt::from_bytes_be(Sign::Plus, &a_bytes),
                BigInt::from_bytes_be(Sign::Minus, &b_bytes),
            );
        }
    }
}
