//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs the diagnostic log subscriber
//! - parses CLI arguments into a `SearchConfig`
//! - runs the grid search, a single scan, or the results analyzer
//! - prints reports

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{AnalyzeArgs, Command, DomainArgs, ScanArgs, SearchArgs};
use crate::domain::{
    ApproxOrder, AxisRange, COEF_COUNT, Offsets, ScanDomain, ScanOutcome, SearchConfig, SinkMode,
};
use crate::error::{AppError, EXIT_TASKS_FAILED};
use crate::kernel::PolynomialKernel;
use crate::math::perturb_set;

pub mod pipeline;

/// Entry point for the `sinf-search` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    // `sinf-search` alone (or followed by flags) means `sinf-search search`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Search(args) => handle_search(args),
        Command::Scan(args) => handle_scan(args),
        Command::Analyze(args) => handle_analyze(args),
    }
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .try_init();
}

fn handle_search(args: SearchArgs) -> Result<(), AppError> {
    let config = search_config_from_args(&args)?;
    let summary = pipeline::run_search(&config)?;

    if !summary.failed.is_empty() {
        return Err(AppError::new(
            EXIT_TASKS_FAILED,
            format!(
                "{} of {} tasks failed to persist their report (first: {}: {}).",
                summary.failed.len(),
                summary.dispatched,
                summary.failed[0].0,
                summary.failed[0].1
            ),
        ));
    }
    Ok(())
}

fn handle_scan(args: ScanArgs) -> Result<(), AppError> {
    let offsets: [i32; COEF_COUNT] = args.offsets.as_slice().try_into().map_err(|_| {
        AppError::config(format!(
            "--offsets needs exactly {COEF_COUNT} values, got {}.",
            args.offsets.len()
        ))
    })?;
    let order = ApproxOrder::new(args.order)?;
    let coefs = perturb_set(&args.base.coefs(), &Offsets(offsets));
    let domain = scan_domain_from_args(&args.domain)?;

    info!(?offsets, %order, "scanning single coefficient set");
    let outcome = crate::scan::scan(&PolynomialKernel::new(order, coefs), &domain);

    match outcome {
        ScanOutcome::Completed(report) if args.json => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| AppError::io(format!("Failed to encode report as JSON: {e}")))?;
            println!("{json}");
        }
        ScanOutcome::Completed(report) => {
            print!("{}", crate::report::format_report(&coefs, &report));
        }
        ScanOutcome::Aborted { at, value } => {
            println!("{}", crate::report::format_coefficients(&coefs).trim_end());
            println!("aborted: approximation returned {value} at x = {at}");
        }
    }
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let ingested = crate::io::ingest::load_reports(&args.dir)?;
    for skipped in &ingested.skipped {
        warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipping result file");
    }
    info!(
        parsed = ingested.reports.len(),
        skipped = ingested.skipped.len(),
        "results loaded"
    );

    let best = crate::report::select_best(&ingested.reports);
    if args.json {
        let json = serde_json::to_string_pretty(&best)
            .map_err(|e| AppError::io(format!("Failed to encode analysis as JSON: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_best(&best));
    }
    Ok(())
}

pub fn scan_domain_from_args(args: &DomainArgs) -> Result<ScanDomain, AppError> {
    if !(args.bound.is_finite() && args.bound >= 0.0) {
        return Err(AppError::config(format!(
            "Invalid domain bound {} (must be finite and >= 0).",
            args.bound
        )));
    }
    if args.first_bits > args.last_bits {
        return Err(AppError::config(format!(
            "Invalid bit range 0x{:08x}..=0x{:08x} (first must be <= last).",
            args.first_bits, args.last_bits
        )));
    }
    Ok(ScanDomain::slice(args.bound, args.first_bits, args.last_bits))
}

pub fn search_config_from_args(args: &SearchArgs) -> Result<SearchConfig, AppError> {
    let default_axis = AxisRange::new(args.lower, args.upper, args.step)?;
    let mut axes = [default_axis; COEF_COUNT];
    for o in &args.axis_overrides {
        let Some(slot) = axes.get_mut(o.axis) else {
            return Err(AppError::config(format!(
                "Invalid axis index {} (must be 0..{COEF_COUNT}).",
                o.axis
            )));
        };
        *slot = AxisRange::new(o.lower, o.upper, o.step)?;
    }
    if crate::search::grid_len(&axes).is_none() {
        return Err(AppError::config("Offset grid is too large to enumerate."));
    }

    let order_min = ApproxOrder::new(args.order_min)?;
    let order_max = ApproxOrder::new(args.order_max)?;
    if order_min > order_max {
        return Err(AppError::config(format!(
            "Invalid order range {order_min}..={order_max} (min must be <= max)."
        )));
    }
    if args.workers == 0 {
        return Err(AppError::config("Worker count must be >= 1."));
    }

    Ok(SearchConfig {
        base: args.base,
        axes,
        order_min,
        order_max,
        max_workers: args.workers,
        output_dir: args.output.clone(),
        sink: if args.stdout { SinkMode::Stdout } else { SinkMode::Files },
        domain: scan_domain_from_args(&args.domain)?,
    })
}

/// Rewrite argv so `sinf-search` defaults to `sinf-search search`.
///
/// Rules:
/// - `sinf-search`                     -> `sinf-search search`
/// - `sinf-search -j 4 ...`            -> `sinf-search search -j 4 ...`
/// - `sinf-search --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("search".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "search".to_string());
    }
    argv
}
