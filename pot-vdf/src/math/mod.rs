// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

pub(crate) mod extended_gcd;
pub mod hash_prime;
pub mod multiplier;
pub mod parameterized_group;
