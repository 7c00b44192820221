// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use num_bigint::BigUint;
use std::cmp::min;
use tracing::debug;

use crate::error::{VdfError, VdfResult};
use crate::math::multiplier::two_scalar_mul;
use crate::math::parameterized_group::{multiply, ParameterizedGroupElement};
use crate::vdf::fiat_shamir::{ChallengeKind, Transcript};
use crate::vdf::squaring::{self, SquaringChain};
use crate::vdf::VDF;
use crate::ToBytes;

/// Size in bits of the Fiat-Shamir challenge used in proving and verification.
///
/// From Wesolowski (2018), "Efficient verifiable delay functions" (https://eprint.iacr.org/2018/623),
/// we get that the challenge must be a random prime among the first 2^{2k} primes where k is the
/// security parameter in bits. Setting k = 128, and recalling that the prime number theorem states
/// that the n-th prime number is approximately n * ln(n), we can estimate the number of bits required
/// to represent the n-th prime as log2(n * ln(n)). For n = 2^{2*128}, this is approximately 264 bits.
/// This is also the challenge size used by chiavdf.
pub const CHALLENGE_SIZE_IN_BITS: usize = 264;

/// Upper bound on the block width used by the prover. The prover keeps `2^width` buckets.
pub const MAXIMUM_BLOCK_WIDTH: u64 = 16;

/// Upper bound on the number of checkpoints kept by the prover. A checkpoint is a group element,
/// so with 2048 bit discriminants this keeps the memory used by the prover below a few hundred MB
/// regardless of the number of iterations.
pub const MAXIMUM_CHECKPOINTS: u64 = 1 << 18;

/// An implementation of Wesolowski's VDF construction (https://eprint.iacr.org/2018/623) over a
/// group of unknown order.
pub struct WesolowskisVDF<G: ParameterizedGroupElement> {
    group_parameter: G::ParameterType,
    iterations: u64,
}

impl<G: ParameterizedGroupElement + ToBytes> WesolowskisVDF<G> {
    /// Create a new VDF using the group defined by the given group parameter. Evaluating this VDF
    /// will require computing `2^iterations * input` which requires `iterations` group operations.
    pub fn new(group_parameter: G::ParameterType, iterations: u64) -> Self {
        Self {
            group_parameter,
            iterations,
        }
    }

    /// The prime challenge bound to the group, the input, the output and the number of iterations.
    fn compute_challenge(&self, input: &G, output: &G) -> BigUint {
        Transcript::new()
            .append(&self.group_parameter)
            .append(input)
            .append(output)
            .append_u64(self.iterations)
            .challenge(ChallengeKind::Prime, CHALLENGE_SIZE_IN_BITS)
    }

    /// Compute the proof `floor(2^iterations / l) * input` for the challenge `l` from a squaring
    /// chain of this many iterations. The chain should record checkpoints at the interval given by
    /// [prover_parameters], otherwise the missing ones are recomputed.
    pub(crate) fn prove_from_chain(&self, input: &G, chain: &SquaringChain<G>) -> VdfResult<G> {
        self.prove_with_parameters(input, chain, prover_parameters(self.iterations))
    }

    /// Writing the quotient in base `2^k` where `k` is the block width, the proof is the sum of
    /// `digit_i * 2^(k * i) * input`. Only every `l`'th of these multiples is taken from the chain,
    /// so block `i = l * m + j` is `2^(k * j)` times checkpoint `m`. For each `j`, the checkpoints
    /// are grouped by their digit, so only `2^k` scalar multiplications with small scalars are
    /// needed, and the `l` partial sums are combined with Horner's rule. This is the approach from
    /// section 4.1 of Wesolowski's paper, also used by chiavdf.
    fn prove_with_parameters(
        &self,
        input: &G,
        chain: &SquaringChain<G>,
        parameters: ProverParameters,
    ) -> VdfResult<G> {
        let challenge = self.compute_challenge(input, chain.output());
        let k = parameters.block_width;
        let l = parameters.blocks_per_checkpoint;
        let blocks = self.iterations / k;

        let checkpoints = (0..blocks.div_ceil(l))
            .map(|m| chain.element_at(m * k * l))
            .collect::<VdfResult<Vec<G>>>()?;

        // The digit of block i is floor(2^k * r_i / challenge) where r_i = 2^(iterations - k(i+1))
        // mod challenge is the remainder of the long division of 2^iterations by the challenge
        // before that block. Going l blocks down multiplies the remainder by 2^(k * l).
        let two = BigUint::from(2u8);
        let step = two.modpow(&BigUint::from(k * l), &challenge);

        let mut result = G::zero(&self.group_parameter);
        for j in (0..l).rev() {
            // buckets[b] is the sum of the checkpoints whose digit is b.
            let mut buckets: Vec<Option<G>> = vec![None; 1 << k];
            if j < blocks {
                let mut m = (blocks - j).div_ceil(l) - 1;
                let exponent = self.iterations - k * (m * l + j + 1);
                let mut remainder = two.modpow(&BigUint::from(exponent), &challenge);
                loop {
                    let digit = ((&remainder << k) / &challenge)
                        .iter_u64_digits()
                        .next()
                        .unwrap_or(0) as usize;
                    let checkpoint = &checkpoints[m as usize];
                    buckets[digit] = Some(match buckets[digit].take() {
                        Some(sum) => sum + checkpoint,
                        None => checkpoint.clone(),
                    });
                    if m == 0 {
                        break;
                    }
                    m -= 1;
                    remainder = (remainder * &step) % &challenge;
                }
            }
            result = result.repeated_doubling(k)
                + combine_buckets(&buckets, k, &self.group_parameter);
        }
        Ok(result)
    }
}

/// Return `sum_b b * buckets[b]`. The index is split as `b = b1 * 2^k0 + b0`, so this needs
/// `2^k1 + 2^k0` scalar multiplications with scalars of at most `k` bits.
fn combine_buckets<G: ParameterizedGroupElement>(
    buckets: &[Option<G>],
    k: u64,
    parameter: &G::ParameterType,
) -> G {
    let k1 = k / 2;
    let k0 = k - k1;

    let sum = |indices: &mut dyn Iterator<Item = usize>| -> Option<G> {
        indices
            .filter_map(|b| buckets[b].as_ref())
            .fold(None, |acc: Option<G>, element| match acc {
                Some(acc) => Some(acc + element),
                None => Some(element.clone()),
            })
    };

    let mut result = G::zero(parameter);
    for b1 in 0..(1usize << k1) {
        if let Some(z) = sum(&mut (0..(1usize << k0)).map(|b0| (b1 << k0) | b0)) {
            result = result + multiply(&z, &BigUint::from(b1 << k0), parameter);
        }
    }
    for b0 in 0..(1usize << k0) {
        if let Some(z) = sum(&mut (0..(1usize << k1)).map(|b1| (b1 << k0) | b0)) {
            result = result + multiply(&z, &BigUint::from(b0), parameter);
        }
    }
    result
}

/// The parameters of the prover: the quotient is split in blocks of `block_width` bits, and the
/// chain keeps one checkpoint every `blocks_per_checkpoint` blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ProverParameters {
    pub(crate) block_width: u64,
    pub(crate) blocks_per_checkpoint: u64,
}

impl ProverParameters {
    /// The number of iterations between two checkpoints of the squaring chain.
    pub(crate) fn checkpoint_interval(&self) -> u64 {
        self.block_width * self.blocks_per_checkpoint
    }
}

/// Choose the prover parameters for the given number of iterations. The chain keeps at most about
/// [MAXIMUM_CHECKPOINTS] checkpoints, so for large iteration counts each checkpoint covers more
/// than one block. This trades memory for `blocks_per_checkpoint * 2^(block_width + 1)` extra
/// group operations.
pub(crate) fn prover_parameters(iterations: u64) -> ProverParameters {
    let mut blocks_per_checkpoint = 1;
    let mut width = block_width(iterations, blocks_per_checkpoint);
    if iterations / width > MAXIMUM_CHECKPOINTS {
        blocks_per_checkpoint = iterations.div_ceil(width * MAXIMUM_CHECKPOINTS);
        width = block_width(iterations, blocks_per_checkpoint);
        blocks_per_checkpoint = iterations.div_ceil(width * MAXIMUM_CHECKPOINTS);
    }
    ProverParameters {
        block_width: width,
        blocks_per_checkpoint,
    }
}

/// Choose the width of the blocks of the quotient in the prover. With width `k` and `l` blocks per
/// checkpoint, the prover does roughly `iterations / k + l * 2^(k+1)` group operations to compute
/// the proof. This is minimized around `k = ln(x) - ln(ln(x))` where
/// `x = iterations * ln(2) / (2 * l)`.
pub(crate) fn block_width(iterations: u64, blocks_per_checkpoint: u64) -> u64 {
    if iterations < 8 {
        return 1;
    }
    let x = iterations as f64 * std::f64::consts::LN_2 / (2.0 * blocks_per_checkpoint as f64);
    if x <= std::f64::consts::E {
        return 1;
    }
    let k = (x.ln() - x.ln().ln() + 0.25).round();
    min(MAXIMUM_BLOCK_WIDTH, k.max(1.0) as u64)
}

impl<G: ParameterizedGroupElement + ToBytes> VDF for WesolowskisVDF<G> {
    type InputType = G;
    type OutputType = G;
    type ProofType = G;

    fn evaluate(&self, input: &G) -> VdfResult<(G, G)> {
        if !input.is_in_group(&self.group_parameter) {
            return Err(VdfError::DiscriminantMismatch);
        }

        let interval = prover_parameters(self.iterations).checkpoint_interval();
        let chain = squaring::evaluate(input, self.iterations, Some(interval))?;
        let proof = self.prove_from_chain(input, &chain)?;
        debug!(iterations = self.iterations, "Computed Wesolowski proof");

        Ok((chain.output().clone(), proof))
    }

    fn verify(&self, input: &G, output: &G, proof: &G) -> VdfResult<bool> {
        if !input.is_in_group(&self.group_parameter)
            || !output.is_in_group(&self.group_parameter)
            || !proof.is_in_group(&self.group_parameter)
        {
            return Err(VdfError::DiscriminantMismatch);
        }

        let challenge = self.compute_challenge(input, output);
        let r = BigUint::from(2u8).modpow(&BigUint::from(self.iterations), &challenge);

        let valid = two_scalar_mul(proof, &challenge, input, &r, &self.group_parameter) == *output;
        if !valid {
            debug!(iterations = self.iterations, "Invalid Wesolowski proof");
        }
        Ok(valid)
    }
}
