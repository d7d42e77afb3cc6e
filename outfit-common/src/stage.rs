//! Stage instrumentation
//!
//! Pipeline stages are wrapped with [`observe_stage`], which measures the
//! stage and hands a [`StageReport`] to a [`StageObserver`]. The default
//! observer writes one debug line per stage through `tracing`.

use std::time::{Duration, Instant};
use tracing::debug;

/// Outcome of one completed stage
#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    /// Stage name (also used for dump file names)
    pub stage: &'static str,
    /// Wall-clock time spent in the stage
    pub elapsed: Duration,
    /// Rows produced by the stage
    pub rows: usize,
}

impl StageReport {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Receives a report after every successful stage
pub trait StageObserver {
    fn stage_finished(&self, report: &StageReport);
}

impl<F> StageObserver for F
where
    F: Fn(&StageReport),
{
    fn stage_finished(&self, report: &StageReport) {
        self(report)
    }
}

/// Logs stage timings at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StageObserver for TracingObserver {
    fn stage_finished(&self, report: &StageReport) {
        debug!(
            stage = report.stage,
            rows = report.rows,
            "{:10.3} ms : {}",
            report.elapsed_ms(),
            report.stage
        );
    }
}

/// Number of rows a stage output holds
pub trait RowCount {
    fn row_count(&self) -> usize;
}

impl<T> RowCount for Vec<T> {
    fn row_count(&self) -> usize {
        self.len()
    }
}

/// Run a stage, reporting its duration and output size on success
///
/// Failed stages are not reported; the error propagates unchanged.
pub fn observe_stage<R, E, F>(
    stage: &'static str,
    observer: &dyn StageObserver,
    f: F,
) -> Result<R, E>
where
    R: RowCount,
    F: FnOnce() -> Result<R, E>,
{
    let start = Instant::now();
    let output = f()?;
    observer.stage_finished(&StageReport {
        stage,
        elapsed: start.elapsed(),
        rows: output.row_count(),
    });
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_observer_receives_report() {
        let seen = RefCell::new(Vec::new());
        let observer = |report: &StageReport| seen.borrow_mut().push((report.stage, report.rows));

        let out: Result<Vec<u32>, String> =
            observe_stage("double", &observer, || Ok(vec![1, 2, 3]));

        assert_eq!(out.unwrap().len(), 3);
        assert_eq!(seen.into_inner(), vec![("double", 3)]);
    }

    #[test]
    fn test_failed_stage_not_reported() {
        let seen = RefCell::new(0usize);
        let observer = |_: &StageReport| *seen.borrow_mut() += 1;

        let out: Result<Vec<u32>, String> =
            observe_stage("broken", &observer, || Err("boom".to_string()));

        assert_eq!(out.unwrap_err(), "boom");
        assert_eq!(seen.into_inner(), 0);
    }
}
