//! Generator polynomials for the rate-1/2 code

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::trellis::State;
use crate::{Bit, Error};

/// Number of taps in a generator polynomial (memory length 2)
pub(crate) const NUM_TAPS: usize = 3;

/// Generator polynomial with taps for the current input bit and the two previous register bits
///
/// Tap `0` multiplies the current input bit, tap `1` the previous input bit (register `R1`), and
/// tap `2` the input bit before that (register `R2`).
#[derive(Clone, Eq, Hash, PartialEq, Debug, Copy, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct GeneratorPolynomial([Bit; NUM_TAPS]);

impl GeneratorPolynomial {
    /// Returns the taps of the polynomial.
    #[must_use]
    pub fn taps(&self) -> [Bit; NUM_TAPS] {
        self.0
    }

    /// Returns the XOR of the register contents selected by the taps.
    fn apply(&self, input_bit: Bit, r1: Bit, r2: Bit) -> Bit {
        (input_bit & self.0[0]) ^ (r1 & self.0[1]) ^ (r2 & self.0[2])
    }
}

impl FromStr for GeneratorPolynomial {
    type Err = Error;

    /// Parses a polynomial from exactly three `'0'`/`'1'` characters, e.g. `"101"`.
    fn from_str(s: &str) -> Result<Self, Error> {
        let taps = s
            .chars()
            .map(|c| Bit::try_from(c).ok())
            .collect::<Option<Vec<Bit>>>();
        match taps {
            Some(taps) if taps.len() == NUM_TAPS => Self::try_from(taps.as_slice()),
            _ => Err(invalid_polynomial_error(s)),
        }
    }
}

impl TryFrom<&[Bit]> for GeneratorPolynomial {
    type Error = Error;

    fn try_from(taps: &[Bit]) -> Result<Self, Error> {
        <[Bit; NUM_TAPS]>::try_from(taps)
            .map(Self)
            .map_err(|_| {
                Error::InvalidPolynomial(format!(
                    "Expected {NUM_TAPS} polynomial taps (found {})",
                    taps.len()
                ))
            })
    }
}

impl TryFrom<String> for GeneratorPolynomial {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Error> {
        s.parse()
    }
}

impl From<GeneratorPolynomial> for String {
    fn from(poly: GeneratorPolynomial) -> Self {
        poly.to_string()
    }
}

impl std::fmt::Display for GeneratorPolynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for tap in self.0 {
            write!(f, "{tap}")?;
        }
        Ok(())
    }
}

/// Pair of generator polynomials defining the code
///
/// The same set must be used for encoding and decoding.
#[derive(Clone, Eq, Hash, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct PolynomialSet {
    /// Polynomial for the first code bit of each symbol pair
    pub g1: GeneratorPolynomial,
    /// Polynomial for the second code bit of each symbol pair
    pub g2: GeneratorPolynomial,
}

impl PolynomialSet {
    /// Returns polynomial set corresponding to two textual polynomials.
    ///
    /// # Parameters
    ///
    /// - `g1`: First generator polynomial, as exactly three `'0'`/`'1'` characters.
    ///
    /// - `g2`: Second generator polynomial, in the same format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPolynomial`] if either polynomial does not consist of exactly three
    /// binary symbols.
    ///
    /// # Examples
    ///
    /// ```
    /// use convcode::PolynomialSet;
    ///
    /// let polys = PolynomialSet::new("111", "101")?;
    /// assert_eq!(polys, PolynomialSet::default());
    /// assert!(PolynomialSet::new("11", "101").is_err());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(g1: &str, g2: &str) -> Result<Self, Error> {
        Ok(Self {
            g1: g1.parse()?,
            g2: g2.parse()?,
        })
    }

    /// Returns the two code bits emitted on input `input_bit` from register state `state`.
    #[must_use]
    pub fn output_pair(&self, input_bit: Bit, state: State) -> [Bit; 2] {
        let (r1, r2) = (state.r1(), state.r2());
        [
            self.g1.apply(input_bit, r1, r2),
            self.g2.apply(input_bit, r1, r2),
        ]
    }
}

impl Default for PolynomialSet {
    /// Returns the set with `G1 = 111` and `G2 = 101`.
    fn default() -> Self {
        Self {
            g1: GeneratorPolynomial([Bit::One, Bit::One, Bit::One]),
            g2: GeneratorPolynomial([Bit::One, Bit::Zero, Bit::One]),
        }
    }
}

/// Returns error for a polynomial string that is not exactly three binary symbols.
fn invalid_polynomial_error(s: &str) -> Error {
    Error::InvalidPolynomial(format!(
        "Expected generator polynomial of {NUM_TAPS} binary symbols (found {s:?})"
    ))
}


#[cfg(test)]
mod tests_of_polynomial_set {
    use super::*;
    use Bit::{One, Zero};

    #[test]
    fn test_new() {
        // Invalid input
        assert!(matches!(
            PolynomialSet::new("11", "101"),
            Err(Error::InvalidPolynomial(_))
        ));
        assert!(matches!(
            PolynomialSet::new("111", "1x1"),
            Err(Error::InvalidPolynomial(_))
        ));
        // Valid input
        let polys = PolynomialSet::new("110", "011").unwrap();
        assert_eq!(polys.g1.taps(), [One, One, Zero]);
        assert_eq!(polys.g2.taps(), [Zero, One, One]);
    }

    #[test]
    fn test_default() {
        let polys = PolynomialSet::default();
        assert_eq!(polys.g1.to_string(), "111");
        assert_eq!(polys.g2.to_string(), "101");
    }

    #[test]
    fn test_output_pair() {
        let polys = PolynomialSet::default();
        let correct_output_pairs_for_zero = [[Zero, Zero], [One, One], [One, Zero], [Zero, One]];
        let correct_output_pairs_for_one = [[One, One], [Zero, Zero], [Zero, One], [One, Zero]];
        for state in State::ALL {
            assert_eq!(
                polys.output_pair(Zero, state),
                correct_output_pairs_for_zero[state.index()]
            );
            assert_eq!(
                polys.output_pair(One, state),
                correct_output_pairs_for_one[state.index()]
            );
        }
    }
}
