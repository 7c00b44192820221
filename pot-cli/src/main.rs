// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use clap::{Parser, ValueEnum};
use pot_vdf::class_group::discriminant::Discriminant;
use pot_vdf::class_group::QuadraticForm;
use pot_vdf::math::parameterized_group::Parameter;
use pot_vdf::proof_of_time::{ProofType, DEFAULT_DEPTH, DEFAULT_DISCRIMINANT_SIZE_IN_BITS};
use std::io::{Error, ErrorKind};
use std::time::Instant;

mod logging;

/// Exit code when a proof does not verify.
const INVALID_PROOF: i32 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Construction {
    Wesolowski,
    #[value(name = "n-wesolowski")]
    NWesolowski,
    Pietrzak,
}

#[derive(Parser, Clone, Debug)]
#[command(name = "pot")]
#[command(about = "Generate or verify a proof of time using a verifiable delay function over imaginary class groups", long_about = None)]
struct Arguments {
    /// The type of proof.
    #[clap(short = 't', long = "type", value_enum, default_value_t = Construction::Wesolowski)]
    proof_type: Construction,

    /// The number of bits of the discriminant.
    #[clap(short, long, default_value_t = DEFAULT_DISCRIMINANT_SIZE_IN_BITS)]
    length: usize,

    /// The number of segments of an n-Wesolowski proof.
    #[clap(short, long, default_value_t = DEFAULT_DEPTH)]
    depth: usize,

    /// Print the parameters of the proof and the time it took to compute it.
    #[clap(short, long)]
    verbose: bool,

    /// A hex encoded challenge used to derive the discriminant.
    discriminant_challenge: String,

    /// The number of iterations.
    iterations: u64,

    /// The hex encoded output and proof. If given, the proof is verified, otherwise a proof is
    /// generated.
    proof: Option<String>,
}

/// The lines to print and whether the command succeeded.
#[derive(Debug, PartialEq, Eq)]
struct Outcome {
    lines: Vec<String>,
    valid: bool,
}

fn main() {
    let arguments = Arguments::parse();
    if let Err(e) = logging::init(arguments.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match execute(arguments) {
        Ok(outcome) => {
            for line in &outcome.lines {
                println!("{}", line);
            }
            std::process::exit(if outcome.valid {
                exitcode::OK
            } else {
                INVALID_PROOF
            });
        }
        Err(e) => {
            println!("Error: {}", e);
            std::process::exit(exitcode::DATAERR);
        }
    }
}

fn execute(arguments: Arguments) -> Result<Outcome, Error> {
    let challenge = hex::decode(&arguments.discriminant_challenge)
        .map_err(|_| Error::new(ErrorKind::InvalidInput, "Invalid discriminant challenge."))?;
    let proof = arguments
        .proof
        .as_ref()
        .map(hex::decode)
        .transpose()
        .map_err(|_| Error::new(ErrorKind::InvalidInput, "Invalid proof hex string."))?;

    let proof_type = match arguments.proof_type {
        Construction::Wesolowski => ProofType::Wesolowski,
        Construction::NWesolowski => ProofType::NWesolowski {
            depth: arguments.depth,
        },
        Construction::Pietrzak => ProofType::Pietrzak,
    };

    let discriminant = Discriminant::from_seed(&challenge, arguments.length)
        .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;
    let input = QuadraticForm::generator(&discriminant)
        .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;

    let mut lines = Vec::new();
    if arguments.verbose {
        lines.push(format!(
            "proof type: {}",
            arguments
                .proof_type
                .to_possible_value()
                .map(|value| value.get_name().to_string())
                .unwrap_or_default()
        ));
        lines.push(format!("discriminant: {}", discriminant));
        lines.push(format!("discriminant size: {}", arguments.length));
        lines.push(format!("x: {}", input));
    }

    match proof {
        Some(proof) => {
            let valid = proof_type
                .verify(&discriminant, &input, arguments.iterations, &proof)
                .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
            lines.push(if valid { "Proof is valid" } else { "** INVALID PROOF" }.to_string());
            Ok(Outcome { lines, valid })
        }
        None => {
            let start = Instant::now();
            let (output, proof) = proof_type
                .prove(&discriminant, &input, arguments.iterations)
                .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;
            if arguments.verbose {
                lines.push(format!(
                    "Finished in {:.2} ms",
                    start.elapsed().as_secs_f64() * 1000.0
                ));
            }
            lines.push(format!("{}{}", hex::encode(output), hex::encode(proof)));
            Ok(Outcome { lines, valid: true })
        }
    }
}
