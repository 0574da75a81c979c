//! Hard-decision Viterbi decoder
//!
//! Decoding runs forward through the trellis one received symbol pair at a time, keeping for each
//! state the smallest accumulated Hamming distance (path metric) of any path ending there, along
//! with the survivor edge into that state. After the last symbol pair, the decoded bits are
//! recovered by tracing survivors back from the state with the smallest metric.
//!
//! Ties are broken deterministically. When two edges into a state give the same candidate metric,
//! the one found first in the order `00, 01, 10, 11` (source state) and `0, 1` (input bit) is
//! kept. When several states share the smallest final metric, the first of them in the order
//! `00, 01, 10, 11` is chosen.

use crate::trellis::{Edge, State, Trellis, NUM_STATES};
use crate::{Bit, Error, PolynomialSet};

/// Result of decoding a received sequence
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DecodedPath {
    /// Decoded bits, one per received symbol pair
    pub bits: Vec<Bit>,
    /// States visited by the decoded path, starting with `00` (one more than the number of bits)
    pub states: Vec<State>,
    /// Hamming distance between the received sequence and the code sequence of the decoded bits
    pub metric: u32,
}

/// Survivor edge into a state at one time instant
#[derive(Clone, Eq, PartialEq, Debug, Copy, Default)]
struct Survivor {
    /// State the survivor path came from
    from: State,
    /// Input bit on the survivor edge
    input_bit: Bit,
}

/// Calculator for path metrics
#[derive(Debug)]
struct PathMetricCalculator {
    /// Path metrics for all states before a symbol pair (`None` for unreachable states)
    metric_val: [Option<u32>; NUM_STATES],
    /// Path metrics for all states at next time instant
    metric_val_next: [Option<u32>; NUM_STATES],
    /// Survivors for all states after each symbol pair processed so far
    all_survivors: Vec<[Survivor; NUM_STATES]>,
}

impl PathMetricCalculator {
    /// Returns new calculator for path metrics.
    fn new(num_symbols: usize) -> Self {
        Self {
            metric_val: [None; NUM_STATES],
            metric_val_next: [None; NUM_STATES],
            all_survivors: Vec::with_capacity(num_symbols),
        }
    }

    /// Initializes path metrics for all states before the first symbol pair.
    fn init_metric_values_before_first_symbol(&mut self) {
        self.metric_val = [None; NUM_STATES];
        self.metric_val[State::S00.index()] = Some(0);
        self.all_survivors.clear();
    }

    /// Initializes path metrics and survivors for all states at next time instant.
    fn init_next_metric_values(&mut self) {
        self.metric_val_next = [None; NUM_STATES];
        // Survivors of states left unreached are never traced back.
        self.all_survivors.push([Survivor::default(); NUM_STATES]);
    }

    /// Updates path metric and survivor for the destination state of an edge.
    fn update_next_metric_value(&mut self, edge: &Edge, received: [Bit; 2]) {
        let Some(metric) = self.metric_val[edge.from.index()] else {
            return;
        };
        let cand_metric = metric + hamming_distance(edge.output, received);
        let next_metric = &mut self.metric_val_next[edge.to.index()];
        if next_metric.map_or(true, |m| cand_metric < m) {
            *next_metric = Some(cand_metric);
            if let Some(survivors) = self.all_survivors.last_mut() {
                survivors[edge.to.index()] = Survivor {
                    from: edge.from,
                    input_bit: edge.input_bit,
                };
            }
        }
    }

    /// Updates path metrics for all states before the next symbol pair.
    fn update_metric_values_before_next_symbol(&mut self) {
        std::mem::swap(&mut self.metric_val, &mut self.metric_val_next);
    }

    /// Returns the state with the smallest path metric, and that metric.
    fn best_state(&self) -> (State, u32) {
        let mut best = (State::S00, u32::MAX);
        for state in State::ALL {
            if let Some(metric) = self.metric_val[state.index()] {
                if metric < best.1 {
                    best = (state, metric);
                }
            }
        }
        best
    }

    /// Returns the decoded path ending in given state.
    fn trace_back(&self, final_state: State, metric: u32) -> DecodedPath {
        let num_symbols = self.all_survivors.len();
        let mut bits = Vec::with_capacity(num_symbols);
        let mut states = Vec::with_capacity(num_symbols + 1);
        let mut state = final_state;
        states.push(state);
        for survivors in self.all_survivors.iter().rev() {
            let survivor = survivors[state.index()];
            bits.push(survivor.input_bit);
            state = survivor.from;
            states.push(state);
        }
        bits.reverse();
        states.reverse();
        DecodedPath {
            bits,
            states,
            metric,
        }
    }
}

/// Returns decisions on the input bits from the Viterbi decoder for given received bits.
///
/// # Parameters
///
/// - `code_bits`: Received code bits, possibly with some bits flipped relative to the output of
///   [`encode`](crate::encode) for the same `polys`.
///
/// - `polys`: Generator polynomials for the code.
///
/// # Returns
///
/// - `input_bits_hat`: Decisions on the input bits, one per received symbol pair. If the received
///   bits are corrupted beyond what the code can correct, this is still the closest candidate,
///   and may differ from the encoded bits.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `code_bits.len()` is odd.
///
/// # Examples
///
/// ```
/// use convcode::{decode, Bit, PolynomialSet};
/// use Bit::{One, Zero};
///
/// let polys = PolynomialSet::new("111", "101")?;
/// // Code bits for `11011`, with bit 2 flipped
/// let code_bits = [One, One, One, One, Zero, One, Zero, Zero, Zero, One];
/// assert_eq!(decode(&code_bits, &polys)?, [One, One, Zero, One, One]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode(code_bits: &[Bit], polys: &PolynomialSet) -> Result<Vec<Bit>, Error> {
    Ok(decode_path(code_bits, polys)?.bits)
}

/// Returns the decoded path from the Viterbi decoder for given received bits.
///
/// This is the same as [`decode`], but also returns the visited states and the path metric of the
/// decision, e.g. for highlighting the path on a trellis diagram.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `code_bits.len()` is odd.
///
/// # Examples
///
/// ```
/// use convcode::trellis::State;
/// use convcode::{decode_path, utils, PolynomialSet};
///
/// let code_bits = utils::bits_from_str("1101010001")?;
/// let path = decode_path(&code_bits, &PolynomialSet::default())?;
/// assert_eq!(utils::bits_to_string(&path.bits), "11011");
/// assert_eq!(
///     path.states,
///     [State::S00, State::S10, State::S11, State::S01, State::S10, State::S11]
/// );
/// assert_eq!(path.metric, 0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode_path(code_bits: &[Bit], polys: &PolynomialSet) -> Result<DecodedPath, Error> {
    check_decoder_input(code_bits)?;
    let trellis = Trellis::new(polys);
    let num_symbols = code_bits.len() / 2;
    let mut calc = PathMetricCalculator::new(num_symbols);
    calc.init_metric_values_before_first_symbol();
    for chunk in code_bits.chunks_exact(2) {
        let received = [chunk[0], chunk[1]];
        calc.init_next_metric_values();
        for edge in trellis.edges() {
            calc.update_next_metric_value(edge, received);
        }
        calc.update_metric_values_before_next_symbol();
    }
    let (final_state, metric) = calc.best_state();
    let path = calc.trace_back(final_state, metric);
    tracing::debug!(
        num_symbols,
        metric,
        final_state = %final_state,
        "decoded"
    );
    Ok(path)
}

/// Checks validity of decoder input.
fn check_decoder_input(code_bits: &[Bit]) -> Result<(), Error> {
    if code_bits.len() % 2 == 0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "Expected an even number of code bits (found {})",
            code_bits.len()
        )))
    }
}

/// Returns number of positions in which two symbol pairs differ.
fn hamming_distance(x: [Bit; 2], y: [Bit; 2]) -> u32 {
    u32::from(x[0] != y[0]) + u32::from(x[1] != y[1])
}

#[cfg(test)]
mod tests_of_path_metric_calculator {
    use super::*;
    use Bit::{One, Zero};

    fn run_steps(received: &[[Bit; 2]]) -> PathMetricCalculator {
        let trellis = Trellis::new(&PolynomialSet::default());
        let mut calc = PathMetricCalculator::new(received.len());
        calc.init_metric_values_before_first_symbol();
        for &pair in received {
            calc.init_next_metric_values();
            for edge in trellis.edges() {
                calc.update_next_metric_value(edge, pair);
            }
            calc.update_metric_values_before_next_symbol();
        }
        calc
    }

    #[test]
    fn test_init_metric_values_before_first_symbol() {
        let calc = run_steps(&[]);
        assert_eq!(calc.metric_val, [Some(0), None, None, None]);
        assert!(calc.all_survivors.is_empty());
        assert_eq!(calc.best_state(), (State::S00, 0));
    }

    #[test]
    fn test_first_step_reaches_two_states() {
        let calc = run_steps(&[[One, Zero]]);
        assert_eq!(calc.metric_val, [Some(1), None, Some(1), None]);
        // Equal metrics in `00` and `10`: the first state wins
        assert_eq!(calc.best_state(), (State::S00, 1));
    }

    #[test]
    fn test_metric_values() {
        let calc = run_steps(&[[One, One], [Zero, One], [Zero, One]]);
        assert_eq!(calc.metric_val, [Some(3), Some(0), Some(3), Some(2)]);
        assert_eq!(calc.best_state(), (State::S01, 0));
        let path = calc.trace_back(State::S01, 0);
        assert_eq!(path.bits, [One, One, Zero]);
        assert_eq!(
            path.states,
            [State::S00, State::S10, State::S11, State::S01]
        );
    }

    #[test]
    fn test_ties_keep_first_survivor() {
        // After `00 00 01 00`, two edges into state `10` tie with metric 3: the one from state `00`
        // (path `0001`) is found before the one from state `01` (path `1101`).
        let calc = run_steps(&[[Zero, Zero], [Zero, Zero], [Zero, One], [Zero, Zero]]);
        assert_eq!(calc.metric_val, [Some(1), Some(2), Some(3), Some(2)]);
        let path = calc.trace_back(State::S10, 3);
        assert_eq!(path.bits, [Zero, Zero, Zero, One]);
    }

    #[test]
    fn test_hamming_distance() {
        assert_eq!(hamming_distance([Zero, One], [Zero, One]), 0);
        assert_eq!(hamming_distance([Zero, One], [One, One]), 1);
        assert_eq!(hamming_distance([Zero, One], [Zero, Zero]), 1);
        assert_eq!(hamming_distance([Zero, One], [One, Zero]), 2);
    }
}
