//! Convolutional encoder

use crate::trellis::State;
use crate::{Bit, PolynomialSet};

/// Returns code bits from the convolutional encoder for given input bits.
///
/// # Parameters
///
/// - `input_bits`: Bits to be encoded.
///
/// - `polys`: Generator polynomials for the code.
///
/// # Returns
///
/// - `code_bits`: Code bits, two per input bit. The shift register starts in state `00` and is
///   not flushed after the last input bit, so `code_bits.len() == 2 * input_bits.len()`.
///
/// # Examples
///
/// ```
/// use convcode::{encode, Bit, PolynomialSet};
/// use Bit::{One, Zero};
///
/// let polys = PolynomialSet::new("111", "101")?;
/// let code_bits = encode(&[One, One, Zero, One, One], &polys);
/// assert_eq!(
///     code_bits,
///     [One, One, Zero, One, Zero, One, Zero, Zero, Zero, One]
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn encode(input_bits: &[Bit], polys: &PolynomialSet) -> Vec<Bit> {
    let mut state = State::S00;
    let mut code_bits = Vec::with_capacity(2 * input_bits.len());
    for &input_bit in input_bits {
        code_bits.extend(polys.output_pair(input_bit, state));
        state = state.next(input_bit);
    }
    tracing::debug!(
        num_input_bits = input_bits.len(),
        num_code_bits = code_bits.len(),
        "encoded"
    );
    code_bits
}

#[cfg(test)]
mod tests_of_functions {
    use super::*;
    use crate::utils::{bits_from_str, bits_to_string};
    use Bit::{One, Zero};

    fn encode_str(input: &str, g1: &str, g2: &str) -> String {
        let polys = PolynomialSet::new(g1, g2).unwrap();
        bits_to_string(&encode(&bits_from_str(input).unwrap(), &polys))
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode_str("11011", "111", "101"), "1101010001");
        assert_eq!(encode_str("0", "111", "101"), "00");
        assert_eq!(encode_str("1", "111", "101"), "11");
        assert_eq!(encode_str("10", "111", "101"), "1110");
        assert_eq!(encode_str("01", "111", "101"), "0011");
        assert_eq!(encode_str("101100", "111", "101"), "111000010111");
        assert_eq!(encode_str("1011", "110", "011"), "10111101");
    }

    #[test]
    fn test_encode_empty() {
        assert!(encode(&[], &PolynomialSet::default()).is_empty());
    }

    #[test]
    fn test_encode_length_and_determinism() {
        let polys = PolynomialSet::default();
        let input_bits = [One, Zero, One, One, Zero, Zero, One, Zero, One];
        let code_bits = encode(&input_bits, &polys);
        assert_eq!(code_bits.len(), 2 * input_bits.len());
        for _ in 0 .. 3 {
            assert_eq!(encode(&input_bits, &polys), code_bits);
        }
    }

    #[test]
    fn test_encode_state_is_local_to_call() {
        let polys = PolynomialSet::default();
        // A trailing `One` must not leak into the next call's register
        let _ = encode(&[One, One], &polys);
        assert_eq!(encode(&[Zero, Zero], &polys), [Zero; 4]);
    }
}
