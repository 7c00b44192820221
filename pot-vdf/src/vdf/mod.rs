// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! This module contains implementations of verifiable delay functions (VDF) based on repeated
//! squaring in groups of unknown order, using Wesolowski's and Pietrzak's constructions.

use crate::error::VdfResult;

pub mod fiat_shamir;
pub mod n_wesolowski;
pub mod pietrzak;
pub mod squaring;
pub mod wesolowski;

/// This represents a Verifiable Delay Function (VDF) construction.
pub trait VDF {
    /// The type of the input to the VDF.
    type InputType;

    /// The type of the output from the VDF.
    type OutputType;

    /// The type of the proof of correctness for this VDF.
    type ProofType;

    /// Evaluate this VDF and return the output and a proof of correctness.
    fn evaluate(&self, input: &Self::InputType)
        -> VdfResult<(Self::OutputType, Self::ProofType)>;

    /// Verify the output and proof from a VDF. Returns `Ok(false)` if the proof is not valid and an
    /// error only if the inputs cannot be used at all.
    fn verify(
        &self,
        input: &Self::InputType,
        output: &Self::OutputType,
        proof: &Self::ProofType,
    ) -> VdfResult<bool>;
}
