//! The grid search workflow behind `sinf-search search`.
//!
//! output directories -> run header -> worker pool -> one pass per order
//! (grid tasks streamed into the pool) -> summary.
//!
//! `app` only turns flags into a `SearchConfig` and maps the summary to an exit
//! code; everything observable on the console during a run happens here.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use tracing::info;

use crate::domain::{ApproxOrder, SearchConfig, SinkMode};
use crate::error::AppError;
use crate::io::export::{FileSink, ensure_output_dir};
use crate::report::{ConsoleSink, ReportSink, format_run_header};
use crate::search::{OffsetGrid, PoolSummary, WorkerPool};

/// Where reports of one order are written.
pub fn order_dir(config: &SearchConfig, order: ApproxOrder) -> PathBuf {
    if config.multi_order() {
        config.output_dir.join(format!("order_{order}"))
    } else {
        config.output_dir.clone()
    }
}

/// Run every grid point for every configured order.
///
/// Returns once all tasks have finished. Per-task sink failures are collected
/// in the summary rather than aborting the run.
pub fn run_search(config: &SearchConfig) -> Result<PoolSummary, AppError> {
    let base = config.base.coefs();
    let grid = OffsetGrid::new(config.axes, base)?;

    // Directories before any work: a failure here is fatal.
    if config.sink == SinkMode::Files {
        ensure_output_dir(&config.output_dir)?;
        for order in config.orders() {
            ensure_output_dir(&order_dir(config, order))?;
        }
    }

    println!("{}", format_run_header(&base));
    info!(
        started_at = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        base = ?config.base,
        grid_points = grid.len(),
        order_min = %config.order_min,
        order_max = %config.order_max,
        "search started"
    );

    let pool = WorkerPool::new(config.max_workers)?;
    let started = Instant::now();
    let mut total = PoolSummary::default();

    for order in config.orders() {
        // Legacy numbering: level 0 is the full series.
        println!("fm_sinf_approx; approx level {}:", order.legacy_level());

        let sink: Box<dyn ReportSink> = match config.sink {
            SinkMode::Files => Box::new(FileSink::new(order_dir(config, order))),
            SinkMode::Stdout => Box::new(ConsoleSink),
        };

        let summary = pool.run(grid.tasks(order), &config.domain, sink.as_ref(), |task| {
            println!("{}", task.id);
        });
        total.absorb(summary);
    }

    println!("Finished.");
    info!(
        dispatched = total.dispatched,
        completed = total.completed,
        aborted = total.aborted,
        failed = total.failed.len(),
        elapsed_s = started.elapsed().as_secs_f64(),
        "search finished"
    );
    Ok(total)
}
