// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Byte level interface to the VDF constructions over class groups.
//!
//! A proof of time is the output of the VDF followed by the proof, both as a concatenation of
//! serialized group elements of [QuadraticForm::serialized_length] bytes each:
//!
//! * Wesolowski: `y || proof`,
//! * n-Wesolowski: `y || y_1 || proof_1 || ... || y_depth || proof_depth`,
//! * Pietrzak: `y || mu_1 || ... || mu_rounds`.

use crate::class_group::discriminant::Discriminant;
use crate::class_group::QuadraticForm;
use crate::error::{VdfError, VdfResult};
use crate::vdf::n_wesolowski::{check_depth, NWesolowskisVDF, SegmentProof};
use crate::vdf::pietrzak::PietrzaksVDF;
use crate::vdf::wesolowski::WesolowskisVDF;
use crate::vdf::VDF;
use crate::ToBytes;
use tracing::debug;

/// Default size in bits of the discriminant.
pub const DEFAULT_DISCRIMINANT_SIZE_IN_BITS: usize = 2048;

/// Default number of segments of an n-Wesolowski proof.
pub const DEFAULT_DEPTH: usize = 2;

/// The VDF construction used to prove and verify a proof of time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProofType {
    Wesolowski,
    NWesolowski { depth: usize },
    Pietrzak,
}

impl ProofType {
    /// Evaluate the VDF on `input` and return the serialized output and proof.
    pub fn prove(
        &self,
        discriminant: &Discriminant,
        input: &QuadraticForm,
        iterations: u64,
    ) -> VdfResult<(Vec<u8>, Vec<u8>)> {
        debug!(proof_type = ?self, iterations, bits = discriminant.bits(), "Proving");
        let (output, proof) = match *self {
            ProofType::Wesolowski => {
                let (output, proof) = WesolowskisVDF::<QuadraticForm>::new(discriminant.clone(), iterations)
                    .evaluate(input)?;
                (output, vec![proof])
            }
            ProofType::NWesolowski { depth } => {
                let (output, segments) =
                    NWesolowskisVDF::<QuadraticForm>::new(discriminant.clone(), iterations, depth)?
                        .evaluate(input)?;
                let proof = segments
                    .into_iter()
                    .flat_map(|segment| [segment.output, segment.proof])
                    .collect();
                (output, proof)
            }
            ProofType::Pietrzak => {
                PietrzaksVDF::<QuadraticForm>::new(discriminant.clone(), iterations)
                    .evaluate(input)?
            }
        };
        Ok((output.to_bytes(), encode_elements(&proof)))
    }

    /// Verify a proof of time given as the serialized output followed by the serialized proof, as
    /// returned by [ProofType::prove].
    ///
    /// Returns [VdfError::InvalidProofLength] if the length of `output_and_proof` is not a positive
    /// multiple of the element size, and, for n-Wesolowski, [VdfError::SegmentCountMismatch] if
    /// the depth is out of range or the proof does not contain `depth` segments. If the bytes
    /// have the right structure but do not decode to valid group elements, the proof is invalid
    /// and `Ok(false)` is returned.
    pub fn verify(
        &self,
        discriminant: &Discriminant,
        input: &QuadraticForm,
        iterations: u64,
        output_and_proof: &[u8],
    ) -> VdfResult<bool> {
        let element_length = QuadraticForm::serialized_length(discriminant);
        if output_and_proof.is_empty() || output_and_proof.len() % element_length != 0 {
            return Err(VdfError::InvalidProofLength {
                element_length,
                actual: output_and_proof.len(),
            });
        }
        let count = output_and_proof.len() / element_length - 1;

        if let ProofType::NWesolowski { depth } = *self {
            check_depth(depth, iterations)?;
            if depth.checked_mul(2) != Some(count) {
                return Err(VdfError::SegmentCountMismatch {
                    expected: depth,
                    actual: count / 2,
                });
            }
        }

        let elements = match decode_elements(output_and_proof, discriminant) {
            Ok(elements) => elements,
            Err(VdfError::MalformedForm) => {
                debug!("Proof of time does not consist of valid group elements");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        let (output, proof) = elements.split_first().expect("Length is checked above");

        match *self {
            ProofType::Wesolowski => match proof {
                [proof] => WesolowskisVDF::<QuadraticForm>::new(discriminant.clone(), iterations)
                    .verify(input, output, proof),
                _ => Ok(false),
            },
            ProofType::NWesolowski { depth } => {
                let segments = proof
                    .chunks_exact(2)
                    .map(|pair| SegmentProof {
                        output: pair[0].clone(),
                        proof: pair[1].clone(),
                    })
                    .collect();
                NWesolowskisVDF::<QuadraticForm>::new(discriminant.clone(), iterations, depth)?
                    .verify(input, output, &segments)
            }
            ProofType::Pietrzak => PietrzaksVDF::<QuadraticForm>::new(discriminant.clone(), iterations)
                .verify(input, output, &proof.to_vec()),
        }
    }
}

/// Concatenate the serializations of the given elements.
pub fn encode_elements(elements: &[QuadraticForm]) -> Vec<u8> {
    elements.iter().flat_map(|element| element.to_bytes()).collect()
}

/// Split the bytes into serialized elements of the given discriminant and decode them. Fails with
/// [VdfError::InvalidProofLength] if the length is not a multiple of the element size and with
/// [VdfError::MalformedForm] if any of the elements is invalid.
pub fn decode_elements(
    bytes: &[u8],
    discriminant: &Discriminant,
) -> VdfResult<Vec<QuadraticForm>> {
    let element_length = QuadraticForm::serialized_length(discriminant);
    if bytes.len() % element_length != 0 {
        return Err(VdfError::InvalidProofLength {
            element_length,
            actual: bytes.len(),
        });
    }
    bytes
        .chunks_exact(element_length)
        .map(|chunk| QuadraticForm::from_bytes(chunk, discriminant))
        .collect()
}
