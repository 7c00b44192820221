// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::error::{VdfError, VdfResult};
use crate::math::hash_prime::{expand, is_probable_prime};
use crate::math::parameterized_group::Parameter;
use crate::ToBytes;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::Signed;
use std::fmt::{Display, Formatter};
use tracing::debug;

/// The smallest bit length accepted by [Discriminant::from_seed].
pub const MINIMUM_DISCRIMINANT_SIZE_IN_BITS: usize = 16;

/// The number of candidates tested by [Discriminant::from_seed] per bit of the requested length
/// before giving up. By the prime number theorem, about one in `ln(2) * bits / 4` candidates which
/// are 7 mod 8 is prime, so this bound is only reached with negligible probability.
const CANDIDATES_PER_BIT: usize = 16;

/// A discriminant for an imaginary class group. The discriminant is a negative integer congruent to
/// 1 mod 4.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Discriminant(BigInt);

impl TryFrom<BigInt> for Discriminant {
    type Error = VdfError;

    fn try_from(value: BigInt) -> VdfResult<Self> {
        if !value.is_negative() || value.mod_floor(&BigInt::from(4)) != BigInt::from(1) {
            return Err(VdfError::MalformedForm);
        }
        Ok(Self(value))
    }
}

impl Discriminant {
    /// Return the number of bits needed to represent this discriminant, not including the sign bit.
    pub fn bits(&self) -> usize {
        self.0.bits() as usize
    }

    /// Borrow a reference to the underlying big integer.
    pub(crate) fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    /// Wrap a value computed as `b^2 - 4ac` from a valid form.
    pub(crate) fn from_trusted_bigint(value: BigInt) -> Self {
        Self(value)
    }

    pub(crate) fn is_one_mod_eight(&self) -> bool {
        self.0.mod_floor(&BigInt::from(8)) == BigInt::from(1)
    }

    /// Try to create a discriminant from a big-endian byte representation of the absolute value.
    pub fn try_from_be_bytes(bytes: &[u8]) -> VdfResult<Self> {
        Self::try_from(BigInt::from_bytes_be(Sign::Minus, bytes))
    }
}

impl ToBytes for Discriminant {
    /// Big-endian bytes of the absolute value.
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes_be().1
    }
}

impl Display for Discriminant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Parameter for Discriminant {
    /// Compute a valid discriminant (aka a negative prime equal to 1 mod 8) of exactly
    /// `size_in_bits` bits based on the given seed.
    fn from_seed(seed: &[u8], size_in_bits: usize) -> VdfResult<Discriminant> {
        if size_in_bits < MINIMUM_DISCRIMINANT_SIZE_IN_BITS {
            return Err(VdfError::InvalidLength {
                minimum: MINIMUM_DISCRIMINANT_SIZE_IN_BITS,
                actual: size_in_bits,
            });
        }

        let mut candidate = expand(seed, size_in_bits);

        // Set the top bit to get the right length and the lower three bits to ensure that the prime
        // is 7 mod 8 which makes the discriminant 1 mod 8.
        for bit in [0, 1, 2, size_in_bits - 1] {
            candidate.set_bit(bit as u64, true);
        }

        let smallest = (BigUint::from(1u8) << (size_in_bits - 1)) + 7u8;
        let max_candidates = CANDIDATES_PER_BIT * size_in_bits;
        for _ in 0..max_candidates {
            if is_probable_prime(&candidate) {
                debug!(bits = size_in_bits, "Found discriminant");
                return Ok(Self(BigInt::from_biguint(Sign::Minus, candidate)));
            }
            candidate += 8u8;
            if candidate.bits() > size_in_bits as u64 {
                candidate = smallest.clone();
            }
        }
        Err(VdfError::DiscriminantSearchExhausted(max_candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_seed() {
        let discriminant = Discriminant::from_seed(&[0u8; 32], 512).unwrap();
        assert_eq!(discriminant.bits(), 512);
        assert!(discriminant.is_one_mod_eight());
        assert!(is_probable_prime(discriminant.as_bigint().magnitude()));

        // Deterministic
        assert_eq!(
            discriminant,
            Discriminant::from_seed(&[0u8; 32], 512).unwrap()
        );

        // Seed and length matter
        assert_ne!(
            discriminant,
            Discriminant::from_seed(&[1u8; 32], 512).unwrap()
        );
        assert_ne!(
            discriminant,
            Discriminant::from_seed(&[0u8; 32], 520).unwrap()
        );

        // Lengths which are not a multiple of eight
        for bits in [16, 17, 100, 257] {
            let discriminant = Discriminant::from_seed(b"odd lengths", bits).unwrap();
            assert_eq!(discriminant.bits(), bits);
            assert!(discriminant.is_one_mod_eight());
        }
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(
            Discriminant::from_seed(&[0u8; 32], 15),
            Err(VdfError::InvalidLength {
                minimum: 16,
                actual: 15
            })
        );
        assert!(Discriminant::from_seed(&[], 0).is_err());
    }

    #[test]
    fn test_discriminant_to_from_bytes() {
        assert!(Discriminant::try_from_be_bytes(&[0x01]).is_err());
        assert!(Discriminant::try_from_be_bytes(&[0x02]).is_err());
        assert!(Discriminant::try_from_be_bytes(&[0x07]).is_ok());
        assert!(Discriminant::try_from(BigInt::from(5)).is_err());

        let discriminant = Discriminant::try_from(BigInt::from(-223)).unwrap();
        let bytes = discriminant.to_bytes();
        let discriminant2 = Discriminant::try_from_be_bytes(&bytes).unwrap();
        assert_eq!(discriminant, discriminant2);
        assert_eq!(discriminant.to_string(), "-223");

        let discriminant = Discriminant::from_seed(&[0x01, 0x02, 0x03], 512).unwrap();
        let bytes = discriminant.to_bytes();
        let discriminant2 = Discriminant::try_from_be_bytes(&bytes).unwrap();
        assert_eq!(discriminant, discriminant2);
    }
}
