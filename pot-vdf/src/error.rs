// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Collection of errors returned by the VDF engine.
//!
//! All errors describe inputs that are structurally unusable. A proof that is well-formed but does
//! not verify is not an error: verifiers return `Ok(false)` in that case.

use thiserror::Error;

pub type VdfResult<T> = Result<T, VdfError>;

/// Collection of errors returned by the VDF engine.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum VdfError {
    /// The requested discriminant size is too small.
    #[error("Discriminant size must be at least {minimum} bits, got {actual}")]
    InvalidLength { minimum: usize, actual: usize },

    /// No prime was found among the allowed number of candidates.
    #[error("No prime discriminant found among {0} candidates")]
    DiscriminantSearchExhausted(usize),

    /// The coefficients or bytes do not describe a reduced primitive form of the discriminant.
    #[error("Input is not a valid reduced quadratic form of the given discriminant")]
    MalformedForm,

    /// A serialized sequence of elements whose length is not a whole number of elements.
    #[error("Proof length {actual} is not a positive multiple of the element length {element_length}")]
    InvalidProofLength { element_length: usize, actual: usize },

    /// The group elements belong to class groups with different discriminants.
    #[error("Group elements have different discriminants")]
    DiscriminantMismatch,

    /// An iteration count or checkpoint interval which cannot be used.
    #[error("Invalid iteration count: {0}")]
    InvalidIterationCount(u64),

    /// The number of n-Wesolowski segments does not match the expected depth.
    #[error("Expected {expected} proof segments, got {actual}")]
    SegmentCountMismatch { expected: usize, actual: usize },
}
