// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use rayon::prelude::*;
use tracing::debug;

use crate::error::{VdfError, VdfResult};
use crate::math::parameterized_group::ParameterizedGroupElement;
use crate::vdf::squaring;
use crate::vdf::wesolowski::{prover_parameters, WesolowskisVDF};
use crate::vdf::VDF;
use crate::ToBytes;

/// The proof of a single segment of an [NWesolowskisVDF]: the output of the segment and a
/// Wesolowski proof that it is the input of the segment doubled the number of iterations of the
/// segment. The input of the first segment is the input of the VDF, and the input of every other
/// segment is the output of the previous one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentProof<G> {
    pub output: G,
    pub proof: G,
}

/// Wesolowski's construction iterated over `depth` consecutive segments. Every segment has
/// `iterations / depth` iterations, except the last which also takes the remaining
/// `iterations % depth`. The squaring is sequential, but the segment proofs are independent and
/// are computed in parallel.
pub struct NWesolowskisVDF<G: ParameterizedGroupElement> {
    group_parameter: G::ParameterType,
    iterations: u64,
    depth: usize,
}

impl<G: ParameterizedGroupElement + ToBytes> NWesolowskisVDF<G> {
    /// Create a new VDF with `depth` segments. Fails with [VdfError::SegmentCountMismatch] if the
    /// depth is zero or exceeds the number of iterations (a single segment is allowed for zero
    /// iterations).
    pub fn new(
        group_parameter: G::ParameterType,
        iterations: u64,
        depth: usize,
    ) -> VdfResult<Self> {
        check_depth(depth, iterations)?;
        Ok(Self {
            group_parameter,
            iterations,
            depth,
        })
    }

    /// The number of iterations of each segment.
    pub fn segment_lengths(&self) -> impl Iterator<Item = u64> {
        let depth = self.depth as u64;
        let length = self.iterations / depth;
        let remainder = self.iterations % depth;
        (0..depth).map(move |i| {
            if i == depth - 1 {
                length + remainder
            } else {
                length
            }
        })
    }

    fn segment_vdf(&self, iterations: u64) -> WesolowskisVDF<G> {
        WesolowskisVDF::new(self.group_parameter.clone(), iterations)
    }
}

/// A proof has between one segment and one segment per iteration. A depth outside this range is
/// reported as a mismatch with the nearest bound.
pub(crate) fn check_depth(depth: usize, iterations: u64) -> VdfResult<()> {
    let maximum = usize::try_from(iterations.max(1)).unwrap_or(usize::MAX);
    if depth == 0 || depth > maximum {
        return Err(VdfError::SegmentCountMismatch {
            expected: depth.clamp(1, maximum),
            actual: depth,
        });
    }
    Ok(())
}

impl<G> VDF for NWesolowskisVDF<G>
where
    G: ParameterizedGroupElement + ToBytes + Send + Sync,
    G::ParameterType: Send + Sync,
{
    type InputType = G;
    type OutputType = G;
    type ProofType = Vec<SegmentProof<G>>;

    fn evaluate(&self, input: &G) -> VdfResult<(G, Vec<SegmentProof<G>>)> {
        if !input.is_in_group(&self.group_parameter) {
            return Err(VdfError::DiscriminantMismatch);
        }

        // The squaring is sequential: the input of each segment is the output of the previous one.
        let mut chains = Vec::with_capacity(self.depth);
        let mut segment_input = input.clone();
        for length in self.segment_lengths() {
            let interval = prover_parameters(length).checkpoint_interval();
            let chain = squaring::evaluate(&segment_input, length, Some(interval))?;
            let next_input = chain.output().clone();
            chains.push((segment_input, chain));
            segment_input = next_input;
        }

        // Once all chains are known, the segment proofs can be computed independently.
        let proof = chains
            .par_iter()
            .enumerate()
            .map(|(i, (segment_input, chain))| {
                debug!(segment = i, iterations = chain.iterations(), "Proving segment");
                Ok(SegmentProof {
                    output: chain.output().clone(),
                    proof: self
                        .segment_vdf(chain.iterations())
                        .prove_from_chain(segment_input, chain)?,
                })
            })
            .collect::<VdfResult<Vec<_>>>()?;

        Ok((segment_input, proof))
    }

    fn verify(&self, input: &G, output: &G, proof: &Vec<SegmentProof<G>>) -> VdfResult<bool> {
        if proof.len() != self.depth {
            return Err(VdfError::SegmentCountMismatch {
                expected: self.depth,
                actual: proof.len(),
            });
        }

        // The segments must be chained and end in the claimed output.
        if proof.last().map(|segment| &segment.output) != Some(output) {
            debug!("The last segment does not end in the output");
            return Ok(false);
        }
        let inputs = std::iter::once(input).chain(proof.iter().map(|segment| &segment.output));

        let segments = inputs
            .zip(proof)
            .zip(self.segment_lengths())
            .collect::<Vec<_>>();
        let results = segments
            .par_iter()
            .map(|((segment_input, segment), length)| {
                self.segment_vdf(*length)
                    .verify(segment_input, &segment.output, &segment.proof)
            })
            .collect::<VdfResult<Vec<bool>>>()?;
        Ok(results.into_iter().all(|valid| valid))
    }
}
