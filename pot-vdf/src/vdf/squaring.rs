// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The sequential part of the VDF evaluation: repeated squaring (doubling in additive notation) of
//! a group element, keeping checkpoints for the provers.

use crate::error::{VdfError, VdfResult};
use crate::math::parameterized_group::ParameterizedGroupElement;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// The result of squaring an element a given number of times, with some of the intermediate
/// elements kept as checkpoints.
///
/// The input (at iteration zero) and the output (at the last iteration) are always recorded.
/// Besides these, the chain records the element after every multiple of the checkpoint interval,
/// if one is given, and after every extra iteration requested by the caller.
pub struct SquaringChain<G> {
    /// Maps an iteration `i` to the input doubled `i` times.
    recorded: BTreeMap<u64, G>,
    interval: Option<u64>,
    iterations: u64,
    output: G,
}

/// Double `input` exactly `iterations` times, recording the element after every multiple of
/// `checkpoint_interval` doublings. Fails with [VdfError::InvalidIterationCount] if the interval is
/// zero.
pub fn evaluate<G: ParameterizedGroupElement>(
    input: &G,
    iterations: u64,
    checkpoint_interval: Option<u64>,
) -> VdfResult<SquaringChain<G>> {
    evaluate_with_points(input, iterations, checkpoint_interval, &BTreeSet::new())
}

/// Like [evaluate], but also record the element after each of the given numbers of doublings.
/// Fails with [VdfError::InvalidIterationCount] if one of the points exceeds `iterations`.
pub fn evaluate_with_points<G: ParameterizedGroupElement>(
    input: &G,
    iterations: u64,
    checkpoint_interval: Option<u64>,
    points: &BTreeSet<u64>,
) -> VdfResult<SquaringChain<G>> {
    if checkpoint_interval == Some(0) {
        return Err(VdfError::InvalidIterationCount(0));
    }
    if let Some(&last) = points.last() {
        if last > iterations {
            return Err(VdfError::InvalidIterationCount(last));
        }
    }
    debug!(iterations, ?checkpoint_interval, points = points.len(), "Start squaring");

    let is_checkpoint = |i: u64| {
        checkpoint_interval.map_or(false, |interval| i % interval == 0) || points.contains(&i)
    };

    let mut recorded = BTreeMap::new();
    let mut current = input.clone();
    recorded.insert(0, current.clone());
    for i in 1..=iterations {
        current = current.double();
        if i == iterations || is_checkpoint(i) {
            recorded.insert(i, current.clone());
        }
    }

    debug!(iterations, checkpoints = recorded.len(), "Finished squaring");
    Ok(SquaringChain {
        recorded,
        interval: checkpoint_interval,
        iterations,
        output: current,
    })
}

impl<G: ParameterizedGroupElement> SquaringChain<G> {
    /// The input doubled `iterations` times.
    pub fn output(&self) -> &G {
        &self.output
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn interval(&self) -> Option<u64> {
        self.interval
    }

    /// The recorded `(iteration, element)` pairs ordered by iteration. The first is the input at
    /// iteration zero and the last is the output.
    pub fn checkpoints(&self) -> impl Iterator<Item = (u64, &G)> {
        self.recorded.iter().map(|(i, element)| (*i, element))
    }

    /// Return the input doubled `i` times. This doubles the closest recorded element before `i`,
    /// so it is free if `i` is recorded. Fails with [VdfError::InvalidIterationCount] if `i`
    /// exceeds the number of iterations of this chain.
    pub fn element_at(&self, i: u64) -> VdfResult<G> {
        if i > self.iterations {
            return Err(VdfError::InvalidIterationCount(i));
        }
        let (start, element) = self
            .recorded
            .range(..=i)
            .next_back()
            .expect("The input is always recorded");
        Ok(element.repeated_doubling(i - start))
    }
}
