// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::class_group::discriminant::Discriminant;
use crate::class_group::QuadraticForm;
use crate::error::{VdfError, VdfResult};
use crate::ToBytes;
use num_bigint::BigInt;
use num_traits::Signed;

impl QuadraticForm {
    /// The number of bytes used to encode a single coefficient of a form with the given
    /// discriminant. A reduced form has `|b| <= a <= sqrt(|d| / 3)`, so this leaves room for the
    /// sign bit.
    fn coefficient_length(discriminant: &Discriminant) -> usize {
        (discriminant.bits() + 16) >> 4
    }

    /// The length of the serialization of a form with the given discriminant. See
    /// [QuadraticForm::to_bytes].
    pub fn serialized_length(discriminant: &Discriminant) -> usize {
        2 * Self::coefficient_length(discriminant)
    }

    /// Create a new quadratic form from a serialization as produced by [QuadraticForm::to_bytes].
    ///
    /// The c coefficient is computed from a, b and the discriminant. Fails with
    /// [VdfError::MalformedForm] if the length is wrong or if the coefficients do not describe a
    /// reduced, primitive and positive definite form of the given discriminant.
    pub fn from_bytes(bytes: &[u8], discriminant: &Discriminant) -> VdfResult<Self> {
        if bytes.len() != Self::serialized_length(discriminant) {
            return Err(VdfError::MalformedForm);
        }
        let (a_bytes, b_bytes) = bytes.split_at(Self::coefficient_length(discriminant));
        let form = Self::from_coefficients(
            BigInt::from_signed_bytes_be(a_bytes),
            BigInt::from_signed_bytes_be(b_bytes),
            discriminant,
        )?;

        // Only the reduced representative is accepted, so equal elements have equal encodings.
        if !form.is_reduced() {
            return Err(VdfError::MalformedForm);
        }
        Ok(form)
    }
}

impl ToBytes for QuadraticForm {
    /// Serialize this form as `a || b` where both coefficients are encoded as big-endian two's
    /// complement integers of `(bits(d) + 16) / 16` bytes.
    fn to_bytes(&self) -> Vec<u8> {
        let length = Self::coefficient_length(&self.discriminant());
        let mut result = Vec::with_capacity(2 * length);
        for coefficient in [&self.a, &self.b] {
            let bytes = coefficient.to_signed_bytes_be();
            let padding = if coefficient.is_negative() { 0xff } else { 0x00 };
            result.extend(std::iter::repeat(padding).take(length.saturating_sub(bytes.len())));
            result.extend_from_slice(&bytes);
        }
        result
    }
}
