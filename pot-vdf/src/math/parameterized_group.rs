// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::error::VdfResult;
use crate::ToBytes;
use num_bigint::BigUint;
use std::fmt::Debug;
use std::ops::Add;

/// This trait is implemented by types which can be used as parameters for a parameterized group.
/// See [ParameterizedGroupElement].
pub trait Parameter: Eq + Clone + Debug + ToBytes + Sized {
    /// Compute a random instance of a given size from a seed.
    fn from_seed(seed: &[u8], size_in_bits: usize) -> VdfResult<Self>;
}

/// Trait implemented by elements of an additive group where the group is parameterized, for example
/// by the discriminant in case of class groups. The group operation is written as addition, so
/// "doubling" is squaring and "multiplying" by a scalar is exponentiation in multiplicative notation.
pub trait ParameterizedGroupElement:
    Sized + Clone + for<'a> Add<&'a Self, Output = Self> + Add<Output = Self> + Eq + Debug
{
    /// The type of the parameter which uniquely defines this group.
    type ParameterType: Parameter;

    /// Return an instance of the identity element in this group.
    fn zero(parameter: &Self::ParameterType) -> Self;

    /// Compute 2 * self.
    fn double(&self) -> Self;

    /// Returns true if this is an element of the group defined by `parameter`.
    fn is_in_group(&self, parameter: &Self::ParameterType) -> bool;

    /// Compute 2^n * self.
    fn repeated_doubling(&self, n: u64) -> Self {
        let mut result = self.clone();
        for _ in 0..n {
            result = result.double();
        }
        result
    }
}

/// Compute scale * element using double-and-add.
pub fn multiply<G: ParameterizedGroupElement>(
    element: &G,
    scale: &BigUint,
    parameter: &G::ParameterType,
) -> G {
    (0..scale.bits())
        .rev()
        .map(|i| scale.bit(i))
        .fold(G::zero(parameter), |acc, bit| {
            let mut res = acc.double();
            if bit {
                res = res + element;
            }
            res
        })
}
