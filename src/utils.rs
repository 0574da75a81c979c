//! # Some useful functions for exercising the code
//!
//! The [`bits_from_str`] and [`bits_to_string`] functions convert between bits and their textual
//! form (one `'0'`/`'1'` character per bit); [`positions_from_str`] parses a comma-separated list
//! of bit positions. The [`inject_errors`] function flips code bits at given positions, and the
//! [`bsc_channel`] function flips each code bit independently with a given probability. The
//! [`random_bits`] function returns a given number of random bits, and the [`error_count`]
//! function returns the number of errors in a sequence with respect to a reference sequence.
//!
//! # Examples
//!
//! The code below illustrates the usage of the functions in this module.
//! ```
//! use convcode::utils;
//!
//! let code_bits = utils::bits_from_str("1101010001")?;
//! let positions = utils::positions_from_str("0, 2")?;
//! let received = utils::inject_errors(&code_bits, &positions);
//! assert_eq!(utils::bits_to_string(&received), "0111010001");
//! assert_eq!(utils::error_count(&received, &code_bits), 2);
//!
//! let bits = utils::random_bits(40);
//! let bits_hat = utils::bsc_channel(&bits, 0.1)?;
//! assert_eq!(bits_hat.len(), bits.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use itertools::Itertools;
use rand::Rng;
use rand_distr::Bernoulli;

use crate::{Bit, Error};

/// Returns bits corresponding to a string of `'0'` and `'1'` characters.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `s` contains any other character.
pub fn bits_from_str(s: &str) -> Result<Vec<Bit>, Error> {
    s.chars().map(Bit::try_from).collect()
}

/// Returns string of `'0'` and `'1'` characters corresponding to given bits.
#[must_use]
pub fn bits_to_string(bits: &[Bit]) -> String {
    bits.iter().join("")
}

/// Returns bit positions parsed from a comma-separated list such as `"0,2"`.
///
/// Whitespace around each position is ignored, as is an empty list.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if any entry is not a non-negative integer.
pub fn positions_from_str(s: &str) -> Result<Vec<usize>, Error> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .map(|entry| {
            entry.trim().parse::<usize>().map_err(|_| {
                Error::InvalidInput(format!(
                    "Expected non-negative integer bit position (found {:?})",
                    entry.trim()
                ))
            })
        })
        .collect()
}

/// Returns copy of given bits with the bits at given positions flipped.
///
/// # Parameters
///
/// - `code_bits`: Bits to be corrupted.
///
/// - `positions`: Positions of bits to be flipped. Positions outside `[0, code_bits.len())` are
///   ignored, and a position listed twice is flipped twice (leaving the bit unchanged).
///
/// # Returns
///
/// - `corrupted_bits`: Bits after flipping.
#[must_use]
pub fn inject_errors(code_bits: &[Bit], positions: &[usize]) -> Vec<Bit> {
    let mut corrupted_bits = code_bits.to_vec();
    for &pos in positions {
        if let Some(bit) = corrupted_bits.get_mut(pos) {
            *bit = bit.flipped();
        }
    }
    corrupted_bits
}

/// Returns given number of random bits.
///
/// # Parameters
///
/// - `num_bits`: Number of random bits to be generated.
///
/// # Returns
///
/// - `bits`: Random bits.
#[must_use]
pub fn random_bits(num_bits: usize) -> Vec<Bit> {
    let mut rng = rand::rng();
    (0 .. num_bits)
        .map(|_| {
            if rng.random_bool(0.5) {
                Bit::One
            } else {
                Bit::Zero
            }
        })
        .collect()
}

/// Returns output of a binary symmetric channel for given input bits.
///
/// # Parameters
///
/// - `bits`: Bits to be transmitted over the channel.
///
/// - `flip_prob`: Probability with which each bit is flipped, independently of all other bits.
///
/// # Returns
///
/// - `bits_hat`: Bits at the channel output.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `flip_prob` is not in the range `[0, 1]`.
pub fn bsc_channel(bits: &[Bit], flip_prob: f64) -> Result<Vec<Bit>, Error> {
    let flip_dist = Bernoulli::new(flip_prob).map_err(|_| {
        Error::InvalidInput(format!(
            "Flip probability must be in the range [0, 1] (found {flip_prob})"
        ))
    })?;
    let mut rng = rand::rng();
    Ok(bits
        .iter()
        .map(|&b| if rng.sample(flip_dist) { b.flipped() } else { b })
        .collect())
}

/// Returns number of errors in a sequence with respect to a reference sequence.
///
/// # Parameters
///
/// - `seq`: Sequence in which errors must be counted.
///
/// - `ref_seq`: Reference sequence to which the given sequence is compared.
///
/// # Returns
///
/// - `err_count`: Number of positions in which the two sequences differ. If they are of different
///   lengths, then the longer sequence is effectively truncated to the length of the shorter one.
pub fn error_count<T: PartialEq>(seq: &[T], ref_seq: &[T]) -> usize {
    ref_seq
        .iter()
        .zip(seq.iter())
        .filter(|&(x, y)| x != y)
        .count()
}
