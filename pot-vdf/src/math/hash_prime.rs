// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Deterministic expansion of a seed into integers of a given bit length, and the hash-and-search
//! method for generating probable primes from such integers.

use num_bigint::BigUint;
use num_prime::nt_funcs::is_prime;
use num_prime::PrimalityTestConfig;
use sha2::{Digest, Sha256};
use std::cmp::min;
use std::iter::successors;

/// An infinite stream of pseudo-random integers of `bit_length` bits derived from a seed. Block `i`
/// of the underlying byte stream is `SHA-256(seed || i)` where `i` is a 4 byte big-endian counter,
/// and each integer is made from the next `ceil(bit_length / 8)` bytes with the surplus low bits
/// dropped.
pub struct HashStream {
    seed: Vec<u8>,
    counter: u32,
    bit_length: usize,
}

impl HashStream {
    pub fn new(seed: &[u8], bit_length: usize) -> Self {
        Self {
            seed: seed.to_vec(),
            counter: 0,
            bit_length,
        }
    }

    fn next_integer(&mut self) -> BigUint {
        let length_in_bytes = self.bit_length.div_ceil(8);
        let mut blob = Vec::with_capacity(length_in_bytes);
        while blob.len() < length_in_bytes {
            let block = Sha256::new()
                .chain_update(&self.seed)
                .chain_update(self.counter.to_be_bytes())
                .finalize();
            self.counter = self.counter.wrapping_add(1);
            blob.extend_from_slice(&block[..min(block.len(), length_in_bytes - blob.len())]);
        }
        BigUint::from_bytes_be(&blob) >> (8 * length_in_bytes - self.bit_length)
    }
}

impl Iterator for HashStream {
    type Item = BigUint;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_integer())
    }
}

/// Return the first integer of the [HashStream] of the given seed.
pub fn expand(seed: &[u8], bit_length: usize) -> BigUint {
    HashStream::new(seed, bit_length).next_integer()
}

/// Check if the input is a probable prime.
///
/// We use the Baillie-PSW primality test here. This is in accordance with the recommendations of "Prime and
/// Prejudice: Primality Testing Under Adversarial Conditions" by Albrecht et al. (https://eprint.iacr.org/2018/749)
/// because the candidates are derived from inputs an adversary could influence.
pub fn is_probable_prime(x: &BigUint) -> bool {
    is_prime(x, Some(PrimalityTestConfig::bpsw())).probably()
}

/// Generate a probable prime from a seed: take the first integer of the [HashStream] of the seed,
/// set the bits in `bitmask` and search forward in steps of `step` for a probable prime.
pub fn hash_prime(seed: &[u8], bit_length: usize, bitmask: &[usize], step: u32) -> BigUint {
    let mut candidate = expand(seed, bit_length);
    for bit in bitmask {
        candidate.set_bit(*bit as u64, true);
    }
    successors(Some(candidate), |x| Some(x + step))
        .find(is_probable_prime)
        .expect("The iterator is infinite")
}
