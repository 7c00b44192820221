// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fiat-Shamir challenges for the non-interactive VDF proofs.

use crate::math::hash_prime::{expand, hash_prime};
use crate::ToBytes;
use num_bigint::BigUint;
use serde::Serialize;
use tracing::trace;

/// The kind of integer derived from a [Transcript].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeKind {
    /// A probable prime of exactly the requested bit length.
    Prime,
    /// A uniformly distributed integer smaller than `2^bit_length`.
    BoundedInteger,
}

/// The public values a challenge is bound to, as an ordered list of byte strings. The list is
/// serialized with BCS, so both the list and each element are length-prefixed.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Transcript(Vec<Vec<u8>>);

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the canonical serialization of an element.
    pub fn append<T: ToBytes + ?Sized>(mut self, element: &T) -> Self {
        self.0.push(element.to_bytes());
        self
    }

    /// Append an integer as 8 big-endian bytes.
    pub fn append_u64(mut self, value: u64) -> Self {
        self.0.push(value.to_be_bytes().to_vec());
        self
    }

    /// Derive a challenge of the given kind and bit length from this transcript.
    pub fn challenge(&self, kind: ChallengeKind, bit_length: usize) -> BigUint {
        let seed = bcs::to_bytes(self).expect("Failed to serialize Fiat-Shamir transcript");
        let challenge = match kind {
            ChallengeKind::Prime => hash_prime(&seed, bit_length, &[0, bit_length - 1], 2),
            ChallengeKind::BoundedInteger => expand(&seed, bit_length),
        };
        trace!(?kind, bit_length, %challenge, "Derived challenge");
        challenge
    }
}
