// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::error::{VdfError, VdfResult};
use crate::math::parameterized_group::{multiply, ParameterizedGroupElement};
use crate::vdf::fiat_shamir::{ChallengeKind, Transcript};
use crate::vdf::squaring;
use crate::vdf::VDF;
use crate::ToBytes;
use num_bigint::BigUint;
use num_integer::Integer;
use std::collections::BTreeSet;
use std::mem;
use tracing::debug;

/// Size in bits of the Fiat-Shamir challenge used in proving and verification.
///
/// This is based on Pietrzak (2018), "Simple Verifiable Delay Functions" (https://eprint.iacr.org/2018/627.pdf)
/// which states that the challenge should be 2^l bits (see section 6), where l is the security
/// parameter. Soundness is proven in section 6.3 in this paper.
pub const CHALLENGE_SIZE_IN_BITS: usize = 128;

/// The recursion stops once the number of iterations is at most this. The verifier computes the
/// remaining iterations directly.
pub const BASE_CASE_ITERATIONS: u64 = 8;

/// The prover takes `mu` from the squaring chain in at most this many leading rounds, so the chain
/// keeps less than `2^(MAXIMUM_CHECKPOINT_ROUNDS + 1)` elements.
const MAXIMUM_CHECKPOINT_ROUNDS: usize = 10;

/// This implements Pietrzak's VDF construction from https://eprint.iacr.org/2018/627.pdf.
///
/// The VDF is, as in [crate::vdf::wesolowski::WesolowskisVDF], based on the repeated squaring of an
/// element in a group of unknown order. However, in this construction, proofs are larger and
/// verification is slower than in Wesolowski's construction, but proving is faster for the same
/// number of iterations.
pub struct PietrzaksVDF<G: ParameterizedGroupElement> {
    group_parameter: G::ParameterType,
    iterations: u64,
}

impl<G: ParameterizedGroupElement + ToBytes> PietrzaksVDF<G> {
    /// Create a new VDF using the group defined by the given group parameter. Evaluating this VDF
    /// will require computing `2^iterations * input` which requires `iterations` group operations.
    pub fn new(group_parameter: G::ParameterType, iterations: u64) -> Self {
        Self {
            group_parameter,
            iterations,
        }
    }

    /// Compute the Fiat-Shamir challenge used in Pietrzak's VDF construction.
    fn compute_challenge(&self, input: &G, output: &G, mu: &G, iterations: u64) -> BigUint {
        Transcript::new()
            .append(&self.group_parameter)
            .append(input)
            .append(output)
            .append(mu)
            .append_u64(iterations)
            .challenge(ChallengeKind::BoundedInteger, CHALLENGE_SIZE_IN_BITS)
    }

    /// Given a claim `output = 2^iterations * input` where `iterations` is even, and `mu` which
    /// should be `2^(iterations / 2) * input`, compute the claim for the next round. The challenge
    /// `r` of the round is also returned.
    fn halve(&self, input: &G, output: &G, mu: &G, iterations: u64) -> (G, G, BigUint) {
        let r = self.compute_challenge(input, output, mu, iterations);
        (
            multiply(input, &r, &self.group_parameter) + mu,
            multiply(mu, &r, &self.group_parameter) + output,
            r,
        )
    }
}

/// The number of iterations of the claim of each round after halving: in round `i`, `mu` is the
/// input of the round doubled `halvings[i]` times.
fn halvings(mut iterations: u64) -> Vec<u64> {
    let mut halvings = Vec::new();
    while iterations > BASE_CASE_ITERATIONS {
        check_parity_and_iterate(&mut iterations);
        halvings.push(iterations);
    }
    halvings
}

/// The input of round `i` is `prod_{k < i} (r_k + 2^halvings[k]) * x` where `x` is the input of the
/// VDF, so `mu` of that round is a combination of `2^i` elements of the squaring chain of `x`. This
/// returns the number of leading rounds for which the `2^i - 1` multiplications by challenges
/// this takes are cheaper than doubling the input of the round `halvings[i]` times.
fn checkpoint_rounds(halvings: &[u64]) -> usize {
    halvings
        .iter()
        .take(MAXIMUM_CHECKPOINT_ROUNDS)
        .enumerate()
        .take_while(|(i, halving)| ((1u64 << i) - 1) * (CHALLENGE_SIZE_IN_BITS as u64) < **halving)
        .count()
}

/// The number of doublings of the VDF input of each of the `2^round` terms of `mu` in the given
/// round. Bit `k` of the index of a term is set if the term contains `2^halvings[k]` rather than
/// `r_k` from round `k`.
fn term_offsets(halvings: &[u64], round: usize) -> impl Iterator<Item = u64> + '_ {
    (0..1usize << round).map(move |mask| {
        halvings[..round]
            .iter()
            .enumerate()
            .filter(|(k, _)| (mask >> k) & 1 == 1)
            .fold(halvings[round], |offset, (_, halving)| offset.saturating_add(*halving))
    })
}

/// The number of rounds, and hence the number of elements in a proof, for the given number of
/// iterations.
pub fn rounds(mut iterations: u64) -> usize {
    let mut rounds = 0;
    while iterations > BASE_CASE_ITERATIONS {
        check_parity_and_iterate(&mut iterations);
        rounds += 1;
    }
    rounds
}

impl<G: ParameterizedGroupElement + ToBytes> VDF for PietrzaksVDF<G> {
    type InputType = G;
    type OutputType = G;
    type ProofType = Vec<G>;

    fn evaluate(&self, input: &G) -> VdfResult<(G, Vec<G>)> {
        if !input.is_in_group(&self.group_parameter) {
            return Err(VdfError::DiscriminantMismatch);
        }

        // The elements needed for mu in the first rounds are recorded while computing the output.
        let halvings = halvings(self.iterations);
        let checkpoint_rounds = checkpoint_rounds(&halvings);
        let points = (0..checkpoint_rounds)
            .flat_map(|round| term_offsets(&halvings, round))
            .filter(|offset| *offset <= self.iterations)
            .collect::<BTreeSet<_>>();
        let chain = squaring::evaluate_with_points(input, self.iterations, None, &points)?;
        let output = chain.output().clone();
        let element_at = |offset: u64| -> VdfResult<G> {
            if offset <= self.iterations {
                chain.element_at(offset)
            } else {
                Ok(output.repeated_doubling(offset - self.iterations))
            }
        };

        let mut x = input.clone();
        let mut y = output.clone();
        let mut t = self.iterations;
        let mut challenges = Vec::with_capacity(checkpoint_rounds);
        let mut proof = Vec::with_capacity(halvings.len());

        for round in 0..halvings.len() {
            if check_parity_and_iterate(&mut t) {
                y = y.double();
            }

            let mu = if round < checkpoint_rounds {
                // Sum the terms pairwise, multiplying by the challenges in the order of the rounds.
                let mut terms = term_offsets(&halvings, round)
                    .map(&element_at)
                    .collect::<VdfResult<Vec<G>>>()?;
                for r in &challenges {
                    terms = terms
                        .chunks_exact(2)
                        .map(|pair| multiply(&pair[0], r, &self.group_parameter) + &pair[1])
                        .collect();
                }
                terms.pop().expect("A single term remains")
            } else {
                x.repeated_doubling(t)
            };

            let (next_x, next_y, r) = self.halve(&x, &y, &mu, 2 * t);
            (x, y) = (next_x, next_y);
            if challenges.len() < checkpoint_rounds {
                challenges.push(r);
            }
            proof.push(mu);
        }
        debug!(iterations = self.iterations, rounds = proof.len(), "Computed Pietrzak proof");

        Ok((output, proof))
    }

    fn verify(&self, input: &G, output: &G, proof: &Vec<G>) -> VdfResult<bool> {
        if !input.is_in_group(&self.group_parameter)
            || !output.is_in_group(&self.group_parameter)
            || !proof.iter().all(|mu| mu.is_in_group(&self.group_parameter))
        {
            return Err(VdfError::DiscriminantMismatch);
        }

        if proof.len() != rounds(self.iterations) {
            debug!(
                expected = rounds(self.iterations),
                actual = proof.len(),
                "Pietrzak proof has the wrong length"
            );
            return Ok(false);
        }

        let mut x = input.clone();
        let mut y = output.clone();
        let mut t = self.iterations;

        for mu in proof {
            if check_parity_and_iterate(&mut t) {
                y = y.double();
            }
            (x, y, _) = self.halve(&x, &y, mu, 2 * t);
        }

        let valid = x.repeated_doubling(t) == y;
        if !valid {
            debug!(iterations = self.iterations, "Invalid Pietrzak proof");
        }
        Ok(valid)
    }
}

/// Replace t with (t+1) >> 1 and return true iff the input was odd.
#[inline]
fn check_parity_and_iterate(t: &mut u64) -> bool {
    mem::replace(t, (*t >> 1) + (*t & 1)).is_odd()
}
