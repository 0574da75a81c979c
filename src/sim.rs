//! Simulator to evaluate performance of the code over a binary symmetric channel
//!
//! Each block of random information bits is encoded, passed through a binary symmetric channel
//! (BSC) that flips every code bit independently with a given probability, and decoded. Blocks are
//! simulated in runs of a fixed number of blocks, processed in parallel, until enough block errors
//! have been seen or the maximum number of runs is reached.
//!
//! # Examples
//!
//! ```
//! use convcode::sim::{self, SimParams};
//! use convcode::PolynomialSet;
//!
//! let params = SimParams {
//!     num_info_bits_per_block: 40,
//!     flip_prob: 0.02,
//!     num_block_errors_min: 10,
//!     num_blocks_per_run: 100,
//!     num_runs_min: 1,
//!     num_runs_max: 5,
//! };
//! let results = sim::run_bsc_sim(&params, &PolynomialSet::default())?;
//! assert!(results.num_blocks >= 100);
//! assert!(results.ber() <= 1.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::BufWriter;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{decode, encode, utils, Error, PolynomialSet};

/// Parameters for convolutional code simulation over binary symmetric channel
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct SimParams {
    /// Number of information bits per block
    pub num_info_bits_per_block: u32,
    /// Probability with which the channel flips each code bit
    pub flip_prob: f64,
    /// Desired minimum number of block errors
    pub num_block_errors_min: u32,
    /// Number of blocks to be transmitted per run
    pub num_blocks_per_run: u32,
    /// Minimum number of runs of blocks to be simulated
    pub num_runs_min: u32,
    /// Maximum number of runs of blocks to be simulated
    pub num_runs_max: u32,
}

/// Results from convolutional code simulation over binary symmetric channel
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct SimResults {
    /// Simulation parameters
    pub params: SimParams,
    /// Generator polynomials of the simulated code
    pub polys: PolynomialSet,
    /// Number of runs simulated
    pub num_runs: u32,
    /// Number of blocks transmitted
    pub num_blocks: u32,
    /// Number of information bits transmitted
    pub num_info_bits: u64,
    /// Number of block errors
    pub num_block_errors: u32,
    /// Number of information bit errors
    pub num_info_bit_errors: u64,
}

impl SimResults {
    /// Returns initialized simulation results.
    #[must_use]
    fn new(params: &SimParams, polys: &PolynomialSet) -> Self {
        Self {
            params: *params,
            polys: *polys,
            num_runs: 0,
            num_blocks: 0,
            num_info_bits: 0,
            num_block_errors: 0,
            num_info_bit_errors: 0,
        }
    }

    /// Returns bit error rate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ber(&self) -> f64 {
        if self.num_info_bits > 0 {
            self.num_info_bit_errors as f64 / self.num_info_bits as f64
        } else {
            0.0
        }
    }

    /// Returns block error rate.
    #[must_use]
    pub fn bler(&self) -> f64 {
        if self.num_blocks > 0 {
            f64::from(self.num_block_errors) / f64::from(self.num_blocks)
        } else {
            0.0
        }
    }

    /// Returns `true` iff no more runs need to be simulated.
    fn run_complete(&self) -> bool {
        self.num_runs >= self.params.num_runs_max
            || (self.num_runs >= self.params.num_runs_min
                && self.num_block_errors >= self.params.num_block_errors_min)
    }

    /// Updates results with the number of information bit errors in each block of a run.
    fn update_after_run(&mut self, all_num_info_bit_errors: &[usize]) {
        self.num_runs += 1;
        for &num_errors in all_num_info_bit_errors {
            self.num_blocks += 1;
            self.num_info_bits += u64::from(self.params.num_info_bits_per_block);
            if num_errors > 0 {
                self.num_block_errors += 1;
                self.num_info_bit_errors += num_errors as u64;
            }
        }
    }
}

impl std::fmt::Display for SimResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "G1 = {}, G2 = {}, {} bits/block, flip probability {:.4}: BER = {:.3e}, \
            BLER = {:.3e} ({} block errors in {} blocks)",
            self.polys.g1,
            self.polys.g2,
            self.params.num_info_bits_per_block,
            self.params.flip_prob,
            self.ber(),
            self.bler(),
            self.num_block_errors,
            self.num_blocks
        )
    }
}

/// Runs simulation of convolutional code over binary symmetric channel.
///
/// # Parameters
///
/// - `params`: Parameters for the simulation.
///
/// - `polys`: Generator polynomials for the code.
///
/// # Returns
///
/// - `results`: Results from the simulation.
///
/// # Errors
///
/// Returns an error if `params.num_info_bits_per_block` is `0`, if `params.flip_prob` is not in
/// the range `[0, 1]`, if `params.num_blocks_per_run` is `0`, or if `params.num_runs_min` exceeds
/// `params.num_runs_max`.
pub fn run_bsc_sim(params: &SimParams, polys: &PolynomialSet) -> Result<SimResults, Error> {
    check_sim_params(params)?;
    let mut results = SimResults::new(params, polys);
    while !results.run_complete() {
        let all_num_info_bit_errors = (0 .. params.num_blocks_per_run)
            .into_par_iter()
            .map(|_| bsc_block_errors(params, polys))
            .collect::<Result<Vec<usize>, Error>>()?;
        results.update_after_run(&all_num_info_bit_errors);
    }
    tracing::info!(%results, "simulation point complete");
    Ok(results)
}

/// Runs simulations of convolutional code over binary symmetric channel and saves results.
///
/// # Parameters
///
/// - `all_params`: Parameters for each simulation scenario of interest.
///
/// - `polys`: Generator polynomials for the code.
///
/// - `json_filename`: Name of the JSON file to which all simulation results must be written.
///
/// # Errors
///
/// Returns an error if any element of `all_params` is invalid (see [`run_bsc_sim`]), or if the
/// results cannot be written to the JSON file.
pub fn run_bsc_sims(
    all_params: &[SimParams],
    polys: &PolynomialSet,
    json_filename: &str,
) -> Result<Vec<SimResults>, Error> {
    let mut all_results = Vec::with_capacity(all_params.len());
    for params in all_params {
        let results = run_bsc_sim(params, polys)?;
        println!("{results}");
        all_results.push(results);
    }
    save_all_results_to_file(&all_results, json_filename)?;
    Ok(all_results)
}

/// Saves all simulation results to a JSON file.
fn save_all_results_to_file(all_results: &[SimResults], json_filename: &str) -> Result<(), Error> {
    let writer = BufWriter::new(File::create(json_filename)?);
    serde_json::to_writer_pretty(writer, all_results)?;
    tracing::debug!(json_filename, num_results = all_results.len(), "results saved");
    Ok(())
}

/// Returns number of information bit errors in one block transmitted over the channel.
fn bsc_block_errors(params: &SimParams, polys: &PolynomialSet) -> Result<usize, Error> {
    let info_bits = utils::random_bits(params.num_info_bits_per_block as usize);
    let code_bits = encode(&info_bits, polys);
    let code_bits_hat = utils::bsc_channel(&code_bits, params.flip_prob)?;
    let info_bits_hat = decode(&code_bits_hat, polys)?;
    Ok(utils::error_count(&info_bits_hat, &info_bits))
}

/// Checks validity of simulation parameters.
fn check_sim_params(params: &SimParams) -> Result<(), Error> {
    if params.num_info_bits_per_block == 0 {
        return Err(Error::InvalidInput(
            "Number of information bits per block cannot be zero".to_string(),
        ));
    }
    if !(0.0 ..= 1.0).contains(&params.flip_prob) {
        return Err(Error::InvalidInput(format!(
            "Flip probability must be in the range [0, 1] (found {})",
            params.flip_prob
        )));
    }
    if params.num_blocks_per_run == 0 {
        return Err(Error::InvalidInput(
            "Number of blocks per run cannot be zero".to_string(),
        ));
    }
    if params.num_runs_min > params.num_runs_max {
        return Err(Error::InvalidInput(format!(
            "Minimum number of runs ({}) exceeds maximum number of runs ({})",
            params.num_runs_min, params.num_runs_max
        )));
    }
    Ok(())
}


#[cfg(test)]
mod tests_of_functions {
    use float_eq::assert_float_eq;

    use super::*;

    #[test]
    fn test_check_sim_params() {
        let valid_params = SimParams {
            num_info_bits_per_block: 40,
            flip_prob: 0.05,
            num_block_errors_min: 10,
            num_blocks_per_run: 1,
            num_runs_min: 1,
            num_runs_max: 2,
        };
        // Invalid input
        let params = SimParams {
            num_info_bits_per_block: 0,
            ..valid_params
        };
        assert!(check_sim_params(&params).is_err());
        let params = SimParams {
            flip_prob: 1.5,
            ..valid_params
        };
        assert!(check_sim_params(&params).is_err());
        let params = SimParams {
            num_blocks_per_run: 0,
            ..valid_params
        };
        assert!(check_sim_params(&params).is_err());
        let params = SimParams {
            num_runs_min: 2,
            num_runs_max: 1,
            ..valid_params
        };
        assert!(check_sim_params(&params).is_err());
        // Valid input
        assert!(check_sim_params(&valid_params).is_ok());
    }

    #[test]
    fn test_bsc_block_errors() {
        let params = SimParams {
            num_info_bits_per_block: 100,
            flip_prob: 0.0,
            num_block_errors_min: 1,
            num_blocks_per_run: 1,
            num_runs_min: 1,
            num_runs_max: 1,
        };
        let polys = PolynomialSet::default();
        assert_eq!(bsc_block_errors(&params, &polys).unwrap(), 0);
    }

    #[test]
    fn test_run_bsc_sim() {
        let polys = PolynomialSet::default();
        // Invalid input
        let params = SimParams {
            num_info_bits_per_block: 40,
            flip_prob: 0.0,
            num_block_errors_min: 1,
            num_blocks_per_run: 0,
            num_runs_min: 1,
            num_runs_max: 1,
        };
        assert!(run_bsc_sim(&params, &polys).is_err());
        // Error-free channel: all runs are simulated, and nothing is wrong
        let params = SimParams {
            num_info_bits_per_block: 40,
            flip_prob: 0.0,
            num_block_errors_min: 1,
            num_blocks_per_run: 8,
            num_runs_min: 1,
            num_runs_max: 3,
        };
        let results = run_bsc_sim(&params, &polys).unwrap();
        assert_eq!(results.num_runs, 3);
        assert_eq!(results.num_blocks, 24);
        assert_eq!(results.num_info_bits, 960);
        assert_eq!(results.num_block_errors, 0);
        assert_float_eq!(results.ber(), 0.0, abs <= 1e-12);
        // Channel that flips everything: every block is in error, so the minimum number of runs
        // suffices
        let params = SimParams {
            num_info_bits_per_block: 40,
            flip_prob: 1.0,
            num_block_errors_min: 1,
            num_blocks_per_run: 8,
            num_runs_min: 1,
            num_runs_max: 3,
        };
        let results = run_bsc_sim(&params, &polys).unwrap();
        assert_eq!(results.num_runs, 1);
        assert_eq!(results.num_block_errors, 8);
        assert_float_eq!(results.bler(), 1.0, abs <= 1e-12);
    }

    #[test]
    fn test_run_bsc_sims() {
        let json_filename = std::env::temp_dir().join("convcode_test_run_bsc_sims.json");
        let json_filename = json_filename.to_str().unwrap();
        let all_params: Vec<SimParams> = [0.0, 0.01]
            .into_iter()
            .map(|flip_prob| SimParams {
                num_info_bits_per_block: 16,
                flip_prob,
                num_block_errors_min: 1,
                num_blocks_per_run: 4,
                num_runs_min: 1,
                num_runs_max: 2,
            })
            .collect();
        let polys = PolynomialSet::default();
        let all_results = run_bsc_sims(&all_params, &polys, json_filename).unwrap();
        assert_eq!(all_results.len(), 2);
        let saved: Vec<SimResults> =
            serde_json::from_reader(File::open(json_filename).unwrap()).unwrap();
        assert_eq!(saved, all_results);
        std::fs::remove_file(json_filename).unwrap();
    }
}
