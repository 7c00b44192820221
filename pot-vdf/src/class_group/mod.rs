// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! This module contains implementation of imaginary class groups. Elements are represented by
//! binary quadratic forms which forms a group under composition. Here we use additive notation
//! for the composition.

use crate::class_group::discriminant::Discriminant;
use crate::error::{VdfError, VdfResult};
use crate::math::extended_gcd::{extended_euclidean_algorithm, EuclideanAlgorithmOutput};
use crate::math::parameterized_group::ParameterizedGroupElement;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::fmt::{Display, Formatter};
use std::mem::swap;
use std::ops::{Add, Neg};

pub mod discriminant;
mod reduction;
mod serialization;

#[cfg(test)]
mod tests;

/// A binary quadratic form, (a, b, c) for arbitrary integers a, b, and c.
///
/// The `partial_gcd_limit` variable must be equal to `|discriminant|^{1/4}` and is used to speed up
/// the composition algorithm.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct QuadraticForm {
    a: BigInt,
    b: BigInt,
    c: BigInt,
    partial_gcd_limit: BigInt,
}

impl QuadraticForm {
    /// Create a new quadratic form given only the a and b coefficients and the discriminant. The
    /// c coefficient is computed as `(b^2 - discriminant) / 4a` and the returned form is reduced.
    ///
    /// Fails with [VdfError::MalformedForm] if `a` is not positive, if `4a` does not divide
    /// `b^2 - discriminant` or if the form is not primitive.
    pub fn from_a_b_and_discriminant(
        a: BigInt,
        b: BigInt,
        discriminant: &Discriminant,
    ) -> VdfResult<Self> {
        let mut form = Self::from_coefficients(a, b, discriminant)?;
        form.reduce();
        Ok(form)
    }

    /// Like [QuadraticForm::from_a_b_and_discriminant] but without reducing the form.
    pub(crate) fn from_coefficients(
        a: BigInt,
        b: BigInt,
        discriminant: &Discriminant,
    ) -> VdfResult<Self> {
        if !a.is_positive() {
            return Err(VdfError::MalformedForm);
        }
        let numerator = &b * &b - discriminant.as_bigint();
        let denominator = &a << 2;
        let (c, remainder) = numerator.div_rem(&denominator);
        if !remainder.is_zero() || !a.gcd(&b).gcd(&c).is_one() {
            return Err(VdfError::MalformedForm);
        }
        Ok(Self {
            a,
            b,
            c,
            // This limit is used by `partial_euclidean_algorithm` in the composition and doubling.
            partial_gcd_limit: discriminant.as_bigint().abs().nth_root(4),
        })
    }

    /// Return a generator (or, more precisely, an element with a presumed large order) in a class
    /// group with a given discriminant. We use the element `(2, 1, c)` where `c` is determined from
    /// the discriminant, so this fails with [VdfError::MalformedForm] unless the discriminant is
    /// 1 mod 8.
    pub fn generator(discriminant: &Discriminant) -> VdfResult<Self> {
        if !discriminant.is_one_mod_eight() {
            return Err(VdfError::MalformedForm);
        }
        Self::from_a_b_and_discriminant(BigInt::from(2), BigInt::one(), discriminant)
    }

    /// Compute the discriminant `b^2 - 4ac` for this quadratic form.
    pub fn discriminant(&self) -> Discriminant {
        Discriminant::from_trusted_bigint(&self.b * &self.b - ((&self.a * &self.c) << 2))
    }

    pub fn a(&self) -> &BigInt {
        &self.a
    }

    pub fn b(&self) -> &BigInt {
        &self.b
    }

    pub fn c(&self) -> &BigInt {
        &self.c
    }

    /// Compute the composition of this quadratic form with another quadratic form. Fails with
    /// [VdfError::DiscriminantMismatch] if the two forms belong to different class groups.
    pub fn compose(&self, rhs: &QuadraticForm) -> VdfResult<QuadraticForm> {
        if self.discriminant() != rhs.discriminant() {
            return Err(VdfError::DiscriminantMismatch);
        }
        Ok(self.nucomp(rhs))
    }

    /// Composition of two forms of the same discriminant.
    fn nucomp(&self, rhs: &QuadraticForm) -> QuadraticForm {
        // Slightly optimised version of Algorithm 1 from Jacobson, Jr, Michael & Poorten, Alfred
        // (2002). "Computational aspects of NUCOMP", Lecture Notes in Computer Science.
        // (https://www.researchgate.net/publication/221451638_Computational_aspects_of_NUCOMP)
        // The paragraph numbers and variable names follow the paper.

        let u1 = &self.a;
        let v1 = &self.b;
        let w1 = &self.c;
        let u2 = &rhs.a;
        let v2 = &rhs.b;
        let w2 = &rhs.c;

        // 1.
        let s: BigInt = (v1 + v2) >> 1;
        let m = v2 - &s;

        // 2.
        let EuclideanAlgorithmOutput {
            gcd: f,
            x: b,
            y: c,
            a_divided_by_gcd: mut capital_cy,
            b_divided_by_gcd: mut capital_by,
        } = extended_euclidean_algorithm(u2, u1);

        let (q, r) = s.div_rem(&f);
        let (g, capital_bx, capital_dy) = if r.is_zero() {
            (f, &m * &b, q)
        } else {
            // 3.
            let EuclideanAlgorithmOutput {
                gcd: g,
                x: _,
                y,
                a_divided_by_gcd: h,
                b_divided_by_gcd,
            } = extended_euclidean_algorithm(&f, &s);
            capital_by *= &h;
            capital_cy *= &h;

            // 4.
            let l = (&y * (&b * (w1.mod_floor(&h)) + &c * (w2.mod_floor(&h)))).mod_floor(&h);
            (
                g,
                &b * (&m / &h) + &l * (&capital_by / &h),
                b_divided_by_gcd,
            )
        };

        // 5. (partial xgcd)
        let PartialEuclideanOutput { bx, by, x, y, z } = partial_euclidean_algorithm(
            capital_bx.mod_floor(&capital_by),
            capital_by.clone(),
            &self.partial_gcd_limit,
        );

        let u3: BigInt;
        let w3: BigInt;
        let v3: BigInt;

        if z == 0 {
            // 6.
            let q = &capital_cy * &bx;
            let cx = (&q - &m) / &capital_by;
            let dx = (&bx * &capital_dy - w2) / &capital_by;
            u3 = &by * &capital_cy;
            w3 = &bx * &cx - &g * &dx;
            v3 = v2 - (&q << 1);
        } else {
            // 7.
            let cx = (&capital_cy * &bx - &m * &x) / &capital_by;
            let q1 = &by * &cx;
            let q2 = &q1 + &m;
            let dx = (&capital_dy * &bx - w2 * &x) / &capital_by;
            let q3 = &y * &dx;
            let q4 = &q3 + &capital_dy;
            let dy = &q4 / &x;
            let cy = if !b.is_zero() {
                &q2 / &bx
            } else {
                (&cx * &dy - w1) / &dx
            };

            u3 = &by * &cy - &g * &y * &dy;
            w3 = &bx * &cx - &g * &x * &dx;
            v3 = &g * (&q3 + &q4) - &q1 - &q2;
        }

        let mut form = QuadraticForm {
            a: u3,
            b: v3,
            c: w3,
            partial_gcd_limit: self.partial_gcd_limit.clone(),
        };
        form.reduce();
        form
    }
}

/// The state of the extended Euclidean algorithm on `(by, bx)` when `|by|` first drops below the
/// limit. `z` is the number of steps taken, and the signs of `by` and `y` are flipped if it is odd.
struct PartialEuclideanOutput {
    bx: BigInt,
    by: BigInt,
    x: BigInt,
    y: BigInt,
    z: u32,
}

fn partial_euclidean_algorithm(
    mut bx: BigInt,
    mut by: BigInt,
    limit: &BigInt,
) -> PartialEuclideanOutput {
    let mut x = BigInt::one();
    let mut y = BigInt::zero();
    let mut z = 0u32;

    while by.abs() > *limit && !bx.is_zero() {
        let (q, t) = by.div_rem(&bx);
        by = bx;
        bx = t;
        swap(&mut x, &mut y);
        x -= &q * &y;
        z += 1;
    }

    if z.is_odd() {
        by = -by;
        y = -y;
    }

    PartialEuclideanOutput { bx, by, x, y, z }
}

impl ParameterizedGroupElement for QuadraticForm {
    /// The discriminant of a quadratic form defines the class group.
    type ParameterType = Discriminant;

    fn zero(discriminant: &Self::ParameterType) -> Self {
        // (1, 1, (1 - d) / 4) is always reduced and primitive.
        let d = discriminant.as_bigint();
        Self {
            a: BigInt::one(),
            b: BigInt::one(),
            c: (BigInt::one() - d) >> 2,
            partial_gcd_limit: d.abs().nth_root(4),
        }
    }

    fn double(&self) -> Self {
        // Slightly optimised version of Algorithm 2 from Jacobson, Jr, Michael & Poorten, Alfred
        // (2002). "Computational aspects of NUCOMP", Lecture Notes in Computer Science.
        // (https://www.researchgate.net/publication/221451638_Computational_aspects_of_NUCOMP)
        // The paragraph numbers and variable names follow the paper.

        let u = &self.a;
        let v = &self.b;
        let w = &self.c;

        let EuclideanAlgorithmOutput {
            gcd: g,
            x: _,
            y,
            a_divided_by_gcd: capital_by,
            b_divided_by_gcd: capital_dy,
        } = extended_euclidean_algorithm(u, v);

        let PartialEuclideanOutput { bx, by, x, y, z } = partial_euclidean_algorithm(
            (&y * w).mod_floor(&capital_by),
            capital_by.clone(),
            &self.partial_gcd_limit,
        );

        let mut u3: BigInt;
        let mut w3: BigInt;
        let mut v3: BigInt;

        if z == 0 {
            let dx = (&bx * &capital_dy - w) / &capital_by;
            u3 = &by * &by;
            w3 = &bx * &bx;
            let s = &bx + &by;
            v3 = v - &s * &s + &u3 + &w3;
            w3 = &w3 - &g * &dx;
        } else {
            let dx = (&bx * &capital_dy - w * &x) / &capital_by;
            let q1 = &dx * &y;
            let mut dy = &q1 + &capital_dy;
            v3 = &g * (&dy + &q1);
            dy = &dy / &x;
            u3 = &by * &by;
            w3 = &bx * &bx;
            v3 = &v3 - (&bx + &by).pow(2) + &u3 + &w3;

            u3 = &u3 - &g * &y * &dy;
            w3 = &w3 - &g * &x * &dx;
        }

        let mut form = QuadraticForm {
            a: u3,
            b: v3,
            c: w3,
            partial_gcd_limit: self.partial_gcd_limit.clone(),
        };
        form.reduce();
        form
    }

    fn is_in_group(&self, discriminant: &Discriminant) -> bool {
        self.discriminant() == *discriminant
    }
}

impl Add<&QuadraticForm> for QuadraticForm {
    type Output = QuadraticForm;

    fn add(self, rhs: &QuadraticForm) -> Self::Output {
        self.nucomp(rhs)
    }
}

impl Add<QuadraticForm> for QuadraticForm {
    type Output = QuadraticForm;

    fn add(self, rhs: QuadraticForm) -> Self::Output {
        self.nucomp(&rhs)
    }
}

impl Add<&QuadraticForm> for &QuadraticForm {
    type Output = QuadraticForm;

    fn add(self, rhs: &QuadraticForm) -> Self::Output {
        self.nucomp(rhs)
    }
}

impl Neg for QuadraticForm {
    type Output = Self;

    fn neg(self) -> Self::Output {
        let mut form = Self {
            a: self.a,
            b: self.b.neg(),
            c: self.c,
            partial_gcd_limit: self.partial_gcd_limit,
        };
        // Only needed when a = |b| or a = c.
        form.reduce();
        form
    }
}

impl Display for QuadraticForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.a, self.b, self.c)
    }
}
