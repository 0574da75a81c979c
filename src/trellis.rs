//! Trellis of the rate-1/2 code with memory length 2
//!
//! The encoder has four states, one for each possible content `(R1, R2)` of its shift register,
//! where `R1` is the previous input bit and `R2` the one before that. Each state has two outgoing
//! edges, one per input bit, so the trellis for a given [`PolynomialSet`] has eight edges in
//! total. The edges are always enumerated in the order `00, 01, 10, 11` for the source state and
//! `0, 1` for the input bit; the decoder relies on this order to break ties.
//!
//! # Examples
//!
//! ```
//! use convcode::trellis::{State, Trellis};
//! use convcode::{Bit, PolynomialSet};
//!
//! let trellis = Trellis::new(&PolynomialSet::default());
//! let edge = trellis.edge(State::S01, Bit::One);
//! assert_eq!(edge.to, State::S10);
//! assert_eq!(edge.output, [Bit::Zero, Bit::Zero]);
//! ```

use crate::{Bit, PolynomialSet};

/// Number of encoder states
pub const NUM_STATES: usize = 4;

/// Number of trellis edges (two per state)
pub const NUM_EDGES: usize = 2 * NUM_STATES;

/// State of the encoder shift register, named by its contents `R1 R2`
#[derive(Clone, Eq, Hash, PartialEq, Debug, Copy, Default)]
pub enum State {
    /// `R1 = 0`, `R2 = 0` (initial state)
    #[default]
    S00,
    /// `R1 = 0`, `R2 = 1`
    S01,
    /// `R1 = 1`, `R2 = 0`
    S10,
    /// `R1 = 1`, `R2 = 1`
    S11,
}

impl State {
    /// All states, in enumeration order
    pub const ALL: [State; NUM_STATES] = [State::S00, State::S01, State::S10, State::S11];

    /// Returns state with given register contents.
    #[must_use]
    pub fn from_bits(r1: Bit, r2: Bit) -> Self {
        match (r1, r2) {
            (Bit::Zero, Bit::Zero) => State::S00,
            (Bit::Zero, Bit::One) => State::S01,
            (Bit::One, Bit::Zero) => State::S10,
            (Bit::One, Bit::One) => State::S11,
        }
    }

    /// Returns position of the state in [`State::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the previous input bit held in the register.
    #[must_use]
    pub fn r1(self) -> Bit {
        match self {
            State::S00 | State::S01 => Bit::Zero,
            State::S10 | State::S11 => Bit::One,
        }
    }

    /// Returns the input bit before the previous one held in the register.
    #[must_use]
    pub fn r2(self) -> Bit {
        match self {
            State::S00 | State::S10 => Bit::Zero,
            State::S01 | State::S11 => Bit::One,
        }
    }

    /// Returns the state after shifting `input_bit` into the register.
    #[must_use]
    pub fn next(self, input_bit: Bit) -> Self {
        State::from_bits(input_bit, self.r1())
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.r1(), self.r2())
    }
}

/// Transition from one state to another on a given input bit
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub struct Edge {
    /// State before the transition
    pub from: State,
    /// Input bit causing the transition
    pub input_bit: Bit,
    /// State after the transition
    pub to: State,
    /// Code bits emitted during the transition
    pub output: [Bit; 2],
}

/// Table of all trellis edges for a polynomial set
///
/// The table is read-only once built, and can be shared freely between threads.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Trellis {
    /// Edges, with the edge for state `s` and input bit `b` at index `2 * s + b`
    edges: [Edge; NUM_EDGES],
}

impl Trellis {
    /// Returns trellis for given polynomial set.
    #[must_use]
    pub fn new(polys: &PolynomialSet) -> Self {
        let edges = std::array::from_fn(|edge_index| {
            let from = State::ALL[edge_index / 2];
            let input_bit = bit_from_index(edge_index % 2);
            Edge {
                from,
                input_bit,
                to: from.next(input_bit),
                output: polys.output_pair(input_bit, from),
            }
        });
        Self { edges }
    }

    /// Returns edge leaving `state` on input `input_bit`.
    #[must_use]
    pub fn edge(&self, state: State, input_bit: Bit) -> &Edge {
        &self.edges[2 * state.index() + input_bit as usize]
    }

    /// Returns all edges, in enumeration order.
    #[must_use]
    pub fn edges(&self) -> &[Edge; NUM_EDGES] {
        &self.edges
    }
}

/// Returns bit corresponding to given index.
fn bit_from_index(bit_index: usize) -> Bit {
    match bit_index {
        0 => Bit::Zero,
        _ => Bit::One,
    }
}

#[cfg(test)]
mod tests_of_state {
    use super::*;
    use Bit::{One, Zero};

    #[test]
    fn test_from_bits() {
        assert_eq!(State::from_bits(Zero, Zero), State::S00);
        assert_eq!(State::from_bits(Zero, One), State::S01);
        assert_eq!(State::from_bits(One, Zero), State::S10);
        assert_eq!(State::from_bits(One, One), State::S11);
        for state in State::ALL {
            assert_eq!(State::from_bits(state.r1(), state.r2()), state);
        }
    }

    #[test]
    fn test_index() {
        for (idx, state) in State::ALL.into_iter().enumerate() {
            assert_eq!(state.index(), idx);
        }
    }

    #[test]
    fn test_next() {
        let correct_next_state_for_zero = [State::S00, State::S00, State::S01, State::S01];
        let correct_next_state_for_one = [State::S10, State::S10, State::S11, State::S11];
        for state in State::ALL {
            assert_eq!(
                state.next(Zero),
                correct_next_state_for_zero[state.index()]
            );
            assert_eq!(state.next(One), correct_next_state_for_one[state.index()]);
        }
    }

    #[test]
    fn test_display() {
        let names: Vec<String> = State::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["00", "01", "10", "11"]);
    }
}

#[cfg(test)]
mod tests_of_trellis {
    use super::*;
    use Bit::{One, Zero};

    #[test]
    fn test_new() {
        let trellis = Trellis::new(&PolynomialSet::default());
        let correct_edges = [
            (State::S00, Zero, State::S00, [Zero, Zero]),
            (State::S00, One, State::S10, [One, One]),
            (State::S01, Zero, State::S00, [One, One]),
            (State::S01, One, State::S10, [Zero, Zero]),
            (State::S10, Zero, State::S01, [One, Zero]),
            (State::S10, One, State::S11, [Zero, One]),
            (State::S11, Zero, State::S01, [Zero, One]),
            (State::S11, One, State::S11, [One, Zero]),
        ];
        for (edge, &(from, input_bit, to, output)) in trellis.edges().iter().zip(&correct_edges) {
            assert_eq!(
                *edge,
                Edge {
                    from,
                    input_bit,
                    to,
                    output
                }
            );
        }
    }

    #[test]
    fn test_edge() {
        let trellis = Trellis::new(&PolynomialSet::new("110", "011").unwrap());
        for state in State::ALL {
            for input_bit in [Zero, One] {
                let edge = trellis.edge(state, input_bit);
                assert_eq!(edge.from, state);
                assert_eq!(edge.input_bit, input_bit);
                assert_eq!(edge.to, state.next(input_bit));
            }
        }
        // `110` taps the input and `R1`; `011` taps `R1` and `R2`
        assert_eq!(trellis.edge(State::S01, One).output, [One, One]);
        assert_eq!(trellis.edge(State::S10, One).output, [Zero, One]);
        assert_eq!(trellis.edge(State::S11, Zero).output, [One, Zero]);
    }

    #[test]
    fn test_bit_from_index() {
        assert_eq!(bit_from_index(0), Zero);
        assert_eq!(bit_from_index(1), One);
    }
}
