//! This crate provides a command-line interface to the rate-1/2 convolutional code: encoding a bit
//! string, Viterbi-decoding a received bit string, running a full encode/corrupt/decode round trip,
//! and simulating BER-versus-flip-probability and BLER-versus-flip-probability performance over a
//! binary symmetric channel (with simulation results saved to a JSON file).
//!
//! Build the executable with `cargo build --release` and then run `./target/release/convcode -h`
//! for help on the command-line interface. Set `RUST_LOG` (or pass `-v`/`-vv`) for log output.

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

use anyhow::Result;
use clap::parser::ValueSource;
use clap::{crate_name, crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};
use convcode::{decode_path, encode, sim, utils, PolynomialSet};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Main function
fn main() -> Result<()> {
    let timer = Instant::now();
    let matches = command_line_parser().get_matches();
    init_logging(verbosity_from_matches(&matches));
    let polys = polys_from_matches(&matches)?;
    match matches.subcommand() {
        Some(("encode", sub_matches)) => {
            println!("{}", encode_text(&bits_from_matches(sub_matches), &polys)?);
        }
        Some(("decode", sub_matches)) => {
            println!("{}", decode_text(&bits_from_matches(sub_matches), &polys)?);
        }
        Some(("run", sub_matches)) => {
            let report = round_trip(
                &bits_from_matches(sub_matches),
                &error_positions_from_matches(sub_matches),
                &polys,
            )?;
            println!("{report}");
        }
        Some(("sim", sub_matches)) => {
            let json_filename = &json_filename_from_matches(sub_matches);
            sim::run_bsc_sims(&all_sim_params(sub_matches), &polys, json_filename)?;
        }
        _ => unreachable!("subcommand is required"),
    }
    eprintln!("Elapsed time: {:.3?}", timer.elapsed());
    Ok(())
}

/// Installs the global log subscriber, writing to `stderr`.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Outcome of an encode/corrupt/decode round trip
#[derive(Clone, Eq, PartialEq, Debug)]
struct RoundTrip {
    /// Code bits after corruption
    coded: String,
    /// Decoded bits
    decoded: String,
    /// Original input bits
    original: String,
    /// Path metric of the decoded bits
    metric: u32,
}

impl RoundTrip {
    /// Returns `true` iff the decoded bits equal the original input bits.
    fn is_match(&self) -> bool {
        self.decoded == self.original
    }
}

impl std::fmt::Display for RoundTrip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Coded sequence:    {}", self.coded)?;
        writeln!(f, "Decoded sequence:  {}", self.decoded)?;
        writeln!(f, "Original input:    {}", self.original)?;
        writeln!(f, "Path metric:       {}", self.metric)?;
        if self.is_match() {
            write!(f, "Decoding correct (matches input)")
        } else {
            write!(f, "Warning: decoded sequence does not match input")
        }
    }
}

/// Returns code bits, as text, for input bits given as text.
fn encode_text(bits: &str, polys: &PolynomialSet) -> Result<String, convcode::Error> {
    let input_bits = utils::bits_from_str(bits)?;
    Ok(utils::bits_to_string(&encode(&input_bits, polys)))
}

/// Returns decoded bits, as text, for received code bits given as text.
fn decode_text(code_bits: &str, polys: &PolynomialSet) -> Result<String, convcode::Error> {
    let received = utils::bits_from_str(code_bits)?;
    Ok(utils::bits_to_string(&decode_path(&received, polys)?.bits))
}

/// Encodes input bits, flips code bits at given positions, and decodes the result.
fn round_trip(
    bits: &str,
    error_positions: &str,
    polys: &PolynomialSet,
) -> Result<RoundTrip, convcode::Error> {
    let input_bits = utils::bits_from_str(bits)?;
    let positions = utils::positions_from_str(error_positions)?;
    let code_bits = utils::inject_errors(&encode(&input_bits, polys), &positions);
    let path = decode_path(&code_bits, polys)?;
    let report = RoundTrip {
        coded: utils::bits_to_string(&code_bits),
        decoded: utils::bits_to_string(&path.bits),
        original: bits.to_string(),
        metric: path.metric,
    };
    if !report.is_match() {
        tracing::warn!(
            decoded = %report.decoded,
            original = %report.original,
            "decoded sequence does not match input"
        );
    }
    Ok(report)
}

/// Returns command line parser.
fn command_line_parser() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .about("Rate-1/2 convolutional encoder and hard-decision Viterbi decoder")
        .subcommand_required(true)
        .arg(g1())
        .arg(g2())
        .arg(verbose())
        .subcommand(
            Command::new("encode")
                .about("Encodes a bit string")
                .arg(bits().required(true).help("Input bits, e.g. 11011")),
        )
        .subcommand(
            Command::new("decode")
                .about("Decodes a received bit string")
                .arg(bits().required(true).help("Received code bits (even length)")),
        )
        .subcommand(
            Command::new("run")
                .about("Encodes a bit string, flips some code bits, and decodes the result")
                .arg(bits().help("Input bits").default_value("11011"))
                .arg(error_positions()),
        )
        .subcommand(
            Command::new("sim")
                .about("Evaluates the performance of the code over a binary symmetric channel")
                .arg(num_info_bits_per_block())
                .arg(first_flip_prob())
                .arg(flip_prob_step())
                .arg(num_flip_prob())
                .arg(num_block_errors_min())
                .arg(num_blocks_per_run())
                .arg(num_runs_min())
                .arg(num_runs_max())
                .arg(json_filename()),
        )
}

/// Returns argument for first generator polynomial.
fn g1() -> Arg {
    Arg::new("g1")
        .long("g1")
        .global(true)
        .default_value("111")
        .help("First generator polynomial (3 binary symbols)")
}

/// Returns argument for second generator polynomial.
fn g2() -> Arg {
    Arg::new("g2")
        .long("g2")
        .global(true)
        .default_value("101")
        .help("Second generator polynomial (3 binary symbols)")
}

/// Returns argument for log verbosity.
fn verbose() -> Arg {
    Arg::new("verbose")
        .short('v')
        .global(true)
        .action(ArgAction::Count)
        .help("Increases log verbosity (-v for info, -vv for debug)")
}

/// Returns argument for a bit string.
fn bits() -> Arg {
    Arg::new("bits")
}

/// Returns argument for positions of code bits to be flipped.
fn error_positions() -> Arg {
    Arg::new("error_positions")
        .short('e')
        .default_value("")
        .help("Comma-separated positions of code bits to be flipped, e.g. 0,2")
}

/// Returns argument for number of information bits per block.
fn num_info_bits_per_block() -> Arg {
    Arg::new("num_info_bits_per_block")
        .short('i')
        .value_parser(value_parser!(u32))
        .default_value("100")
        .help("Number of information bits per block")
}

/// Returns argument for first flip probability.
fn first_flip_prob() -> Arg {
    Arg::new("first_flip_prob")
        .short('r')
        .value_parser(value_parser!(f64))
        .default_value("0.01")
        .help("First flip probability")
}

/// Returns argument for flip probability step.
fn flip_prob_step() -> Arg {
    Arg::new("flip_prob_step")
        .short('p')
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .default_value("0.01")
        .help("Flip probability step")
}

/// Returns argument for number of flip probability values.
fn num_flip_prob() -> Arg {
    Arg::new("num_flip_prob")
        .short('s')
        .value_parser(value_parser!(u32))
        .default_value("5")
        .help("Number of flip probability values")
}

/// Returns argument for desired minimum number of block errors.
fn num_block_errors_min() -> Arg {
    Arg::new("num_block_errors_min")
        .short('e')
        .value_parser(value_parser!(u32))
        .default_value("500")
        .help("Desired minimum number of block errors")
}

/// Returns argument for number of blocks to be transmitted per run.
fn num_blocks_per_run() -> Arg {
    Arg::new("num_blocks_per_run")
        .short('b')
        .value_parser(value_parser!(u32))
        .default_value("1000")
        .help("Number of blocks to be transmitted per run")
}

/// Returns argument for minimum number of runs of blocks to be simulated.
fn num_runs_min() -> Arg {
    Arg::new("num_runs_min")
        .short('n')
        .value_parser(value_parser!(u32))
        .default_value("10")
        .help("Minimum number of runs of blocks to be simulated")
}

/// Returns argument for maximum number of runs of blocks to be simulated.
fn num_runs_max() -> Arg {
    Arg::new("num_runs_max")
        .short('x')
        .value_parser(value_parser!(u32))
        .default_value("100")
        .help("Maximum number of runs of blocks to be simulated")
}

/// Returns argument for name of JSON file to which results must be saved.
fn json_filename() -> Arg {
    Arg::new("json_filename")
        .short('f')
        .default_value("results.json")
        .help("Name of JSON file to which results must be saved")
}

// OK to unwrap in the `*_from_matches` functions below: every argument read there is either
// required or has a default value, so it is always present.

/// Returns log verbosity.
fn verbosity_from_matches(matches: &ArgMatches) -> u8 {
    matches.get_count("verbose")
}

/// Returns generator polynomials.
fn polys_from_matches(matches: &ArgMatches) -> Result<PolynomialSet, convcode::Error> {
    PolynomialSet::new(
        matches.get_one::<String>("g1").unwrap(),
        matches.get_one::<String>("g2").unwrap(),
    )
}

/// Returns bit string.
fn bits_from_matches(matches: &ArgMatches) -> String {
    matches.get_one::<String>("bits").unwrap().to_string()
}

/// Returns positions of code bits to be flipped, as text.
fn error_positions_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("error_positions")
        .unwrap()
        .to_string()
}

/// Returns simulation parameters based on command-line arguments.
fn all_sim_params(matches: &ArgMatches) -> Vec<sim::SimParams> {
    let mut num_runs_min = num_runs_min_from_matches(matches);
    let mut num_runs_max = num_runs_max_from_matches(matches);
    if num_runs_min > num_runs_max {
        if let Some(ValueSource::DefaultValue) = matches.value_source("num_runs_min") {
            num_runs_min = num_runs_max;
        }
        if let Some(ValueSource::DefaultValue) = matches.value_source("num_runs_max") {
            num_runs_max = num_runs_min;
        }
    }
    all_flip_prob_from_matches(matches)
        .into_iter()
        .map(|flip_prob| sim::SimParams {
            num_info_bits_per_block: num_info_bits_per_block_from_matches(matches),
            flip_prob,
            num_block_errors_min: num_block_errors_min_from_matches(matches),
            num_blocks_per_run: num_blocks_per_run_from_matches(matches),
            num_runs_min,
            num_runs_max,
        })
        .collect()
}

/// Returns number of information bits per block.
fn num_info_bits_per_block_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_info_bits_per_block").unwrap()
}

/// Returns all flip probability values.
fn all_flip_prob_from_matches(matches: &ArgMatches) -> Vec<f64> {
    let first_flip_prob: f64 = *matches.get_one("first_flip_prob").unwrap();
    let flip_prob_step: f64 = *matches.get_one("flip_prob_step").unwrap();
    let num_flip_prob: u32 = *matches.get_one("num_flip_prob").unwrap();
    (0 .. num_flip_prob)
        .map(|n| first_flip_prob + flip_prob_step * f64::from(n))
        .collect()
}

/// Returns desired minimum number of block errors.
fn num_block_errors_min_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_block_errors_min").unwrap()
}

/// Returns number of blocks to be transmitted per run.
fn num_blocks_per_run_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_blocks_per_run").unwrap()
}

/// Returns minimum number of runs of blocks to be simulated.
fn num_runs_min_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_runs_min").unwrap()
}

/// Returns maximum number of runs of blocks to be simulated.
fn num_runs_max_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_runs_max").unwrap()
}

/// Returns name of JSON file to which simulation results must be saved.
fn json_filename_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("json_filename")
        .unwrap()
        .to_string()
}
