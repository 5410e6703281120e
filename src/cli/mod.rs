//! Command-line parsing for the sinf coefficient search.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! search/scan code. Defaults come from `domain::constants`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    CoefBase, DEFAULT_AXIS_LOWER, DEFAULT_AXIS_STEP, DEFAULT_AXIS_UPPER, DEFAULT_DOMAIN_BOUND,
    DEFAULT_ORDER_MAX, DEFAULT_ORDER_MIN, DEFAULT_OUTPUT_DIR, MAX_WORKERS,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "sinf-search",
    version,
    about = "Brute-force search for sine polynomial coefficients over every f32 input"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan every grid point around the base coefficients and write one report each.
    Search(SearchArgs),
    /// Scan a single coefficient set and print its report.
    Scan(ScanArgs),
    /// Find the best reports in a results directory.
    Analyze(AnalyzeArgs),
}

/// Which inputs a scan covers.
#[derive(Debug, Args, Clone)]
pub struct DomainArgs {
    /// Inputs with a magnitude above this are skipped.
    #[arg(long, default_value_t = DEFAULT_DOMAIN_BOUND)]
    pub bound: f32,

    /// First bit pattern to scan (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_bits, default_value = "0")]
    pub first_bits: u32,

    /// Last bit pattern to scan, inclusive (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_bits, default_value = "0xffffffff")]
    pub last_bits: u32,
}

/// Options for the grid search.
#[derive(Debug, Args, Clone)]
pub struct SearchArgs {
    /// Coefficient table to perturb.
    #[arg(long, value_enum, default_value_t = CoefBase::Exact)]
    pub base: CoefBase,

    /// Lower offset bound for every axis.
    #[arg(long, default_value_t = DEFAULT_AXIS_LOWER, allow_hyphen_values = true)]
    pub lower: i32,

    /// Upper offset bound for every axis.
    #[arg(long, default_value_t = DEFAULT_AXIS_UPPER, allow_hyphen_values = true)]
    pub upper: i32,

    /// Offset step for every axis.
    #[arg(long, default_value_t = DEFAULT_AXIS_STEP)]
    pub step: i32,

    /// Per-axis override, `<axis>=<lower>:<upper>:<step>` (repeatable).
    #[arg(long = "axis", value_name = "AXIS=LO:HI:STEP", value_parser = parse_axis_override)]
    pub axis_overrides: Vec<AxisOverride>,

    /// Lowest approximation order to search (0 = constant term only).
    #[arg(long, default_value_t = DEFAULT_ORDER_MIN)]
    pub order_min: u8,

    /// Highest approximation order to search (5 = full series).
    #[arg(long, default_value_t = DEFAULT_ORDER_MAX)]
    pub order_max: u8,

    /// Maximum number of concurrent scans.
    #[arg(short = 'j', long, default_value_t = MAX_WORKERS)]
    pub workers: usize,

    /// Directory for result files.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Print reports to stdout instead of writing files.
    #[arg(long)]
    pub stdout: bool,

    #[command(flatten)]
    pub domain: DomainArgs,
}

/// Options for a single scan.
#[derive(Debug, Args, Clone)]
pub struct ScanArgs {
    /// Coefficient table to start from.
    #[arg(long, value_enum, default_value_t = CoefBase::Exact)]
    pub base: CoefBase,

    /// Bit offsets applied to the base coefficients, comma separated (6 values).
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        default_value = "0,0,0,0,0,0"
    )]
    pub offsets: Vec<i32>,

    /// Approximation order (0 = constant term only, 5 = full series).
    #[arg(long, default_value_t = DEFAULT_ORDER_MAX)]
    pub order: u8,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub domain: DomainArgs,
}

/// Options for analyzing a results directory.
#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// Directory containing result files.
    #[arg(default_value = DEFAULT_OUTPUT_DIR)]
    pub dir: PathBuf,

    /// Print the selection as JSON.
    #[arg(long)]
    pub json: bool,
}

/// A parsed `--axis` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisOverride {
    pub axis: usize,
    pub lower: i32,
    pub upper: i32,
    pub step: i32,
}

/// Parse `<axis>=<lower>:<upper>:<step>`.
pub fn parse_axis_override(s: &str) -> Result<AxisOverride, String> {
    let (axis, range) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <axis>=<lower>:<upper>:<step>, got '{s}'"))?;
    let axis: usize = axis
        .trim()
        .parse()
        .map_err(|e| format!("invalid axis index '{axis}': {e}"))?;

    let parts: Vec<&str> = range.split(':').collect();
    let [lower, upper, step] = parts.as_slice() else {
        return Err(format!("expected <lower>:<upper>:<step>, got '{range}'"));
    };
    let num = |v: &str| v.trim().parse::<i32>().map_err(|e| format!("invalid number '{v}': {e}"));

    Ok(AxisOverride {
        axis,
        lower: num(*lower)?,
        upper: num(*upper)?,
        step: num(*step)?,
    })
}

/// Parse a bit pattern as decimal or `0x` hex.
pub fn parse_bits(s: &str) -> Result<u32, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid bit pattern '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_override_parses_negative_bounds() {
        let o = parse_axis_override("3=-4:6:2").unwrap();
        assert_eq!(o, AxisOverride { axis: 3, lower: -4, upper: 6, step: 2 });
    }

    #[test]
    fn axis_override_rejects_malformed_values() {
        assert!(parse_axis_override("3").is_err());
        assert!(parse_axis_override("3=1:2").is_err());
        assert!(parse_axis_override("x=1:2:1").is_err());
    }

    #[test]
    fn bits_accept_hex_and_decimal() {
        assert_eq!(parse_bits("0x3fc9_0fdb").unwrap(), 0x3fc9_0fdb);
        assert_eq!(parse_bits("1065353216").unwrap(), 0x3f80_0000);
        assert!(parse_bits("0xfffffffff").is_err());
    }

    #[test]
    fn search_defaults_match_reference_setup() {
        let cli = Cli::parse_from(["sinf-search", "search"]);
        let Command::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!((args.lower, args.upper, args.step), (-10, 10, 2));
        assert_eq!(args.workers, 10);
        assert_eq!(args.domain.last_bits, u32::MAX);
        assert!(!args.stdout);
    }

    #[test]
    fn scan_takes_six_offsets() {
        let cli = Cli::parse_from(["sinf-search", "scan", "--offsets", "500,0,0,0,-2,0"]);
        let Command::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.offsets, vec![500, 0, 0, 0, -2, 0]);
    }
}
