//! This crate implements encoding and decoding functionality for a rate-1/2 convolutional code
//! with memory length 2. The encoder passes each input bit through a two-stage shift register and
//! emits two code bits per input bit, each being the XOR of the register taps selected by one of
//! two 3-tap generator polynomials. The decoder is a hard-decision Viterbi decoder that finds the
//! input sequence whose code sequence is closest in Hamming distance to the received sequence.
//!
//! The shift register is never flushed: the encoder emits exactly `2 * n` code bits for `n` input
//! bits, and the decoder returns one bit per received symbol pair. As a result, the last one or
//! two decoded bits are less reliable than the rest.
//!
//! # Examples
//!
//! ```
//! use convcode::{decode, encode, utils, PolynomialSet};
//!
//! let polys = PolynomialSet::new("111", "101")?;
//! let bits = utils::bits_from_str("11011")?;
//! let code_bits = encode(&bits, &polys);
//! assert_eq!(utils::bits_to_string(&code_bits), "1101010001");
//! let received = utils::inject_errors(&code_bits, &[3]);
//! assert_eq!(decode(&received, &polys)?, bits);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod encoder;
mod polynomial;
pub mod sim;
pub mod trellis;
pub mod utils;
mod viterbi;

pub use encoder::encode;
pub use polynomial::{GeneratorPolynomial, PolynomialSet};
pub use viterbi::{decode, decode_path, DecodedPath};

/// Custom error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid generator polynomial error
    #[error("{0}")]
    InvalidPolynomial(String),
    /// Invalid input error
    #[error("{0}")]
    InvalidInput(String),
    /// File read/write error
    #[error("{0}")]
    FileReadWriteError(#[from] std::io::Error),
    /// Serde read/write error
    #[error("{0}")]
    SerdeReadWriteError(#[from] serde_json::Error),
}

/// Enumeration of binary symbol values
#[derive(Clone, Eq, Hash, PartialEq, Debug, Copy, Default, Deserialize, Serialize)]
pub enum Bit {
    /// Binary symbol `0`
    #[default]
    Zero = 0,
    /// Binary symbol `1`
    One = 1,
}

impl Bit {
    /// Returns the other binary symbol.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Bit::Zero => Bit::One,
            Bit::One => Bit::Zero,
        }
    }
}

impl std::ops::BitXor for Bit {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        if self == rhs {
            Bit::Zero
        } else {
            Bit::One
        }
    }
}

impl std::ops::BitAnd for Bit {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Bit::One, Bit::One) => Bit::One,
            _ => Bit::Zero,
        }
    }
}

impl TryFrom<char> for Bit {
    type Error = Error;

    fn try_from(symbol: char) -> Result<Self, Error> {
        match symbol {
            '0' => Ok(Bit::Zero),
            '1' => Ok(Bit::One),
            _ => Err(Error::InvalidInput(format!(
                "Expected binary symbol '0' or '1' (found {symbol:?})"
            ))),
        }
    }
}

impl TryFrom<u8> for Bit {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Bit::Zero),
            1 => Ok(Bit::One),
            _ => Err(Error::InvalidInput(format!(
                "Expected binary value 0 or 1 (found {value})"
            ))),
        }
    }
}

impl std::fmt::Display for Bit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bit::Zero => write!(f, "0"),
            Bit::One => write!(f, "1"),
        }
    }
}
