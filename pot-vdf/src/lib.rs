// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Verifiable delay functions over imaginary class groups.
//!
//! The crate contains the class group arithmetic ([class_group]), the sequential squaring loop and
//! three proof constructions ([vdf]) and a byte level interface selecting one of them
//! ([proof_of_time]).

pub mod class_group;
pub mod error;
pub mod math;
pub mod proof_of_time;
pub mod vdf;

/// Trait impl'd by types that have a canonical byte representation.
pub trait ToBytes {
    /// Serialize this object into bytes.
    fn to_bytes(&self) -> Vec<u8>;
}
