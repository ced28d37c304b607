//! Tick timing utilities.
//!
//! Measures how long each [`Scheduler::tick`](sprig::ecs::Scheduler::tick) takes in a realistic
//! loop and summarizes the durations together with the tick reports.

use std::{
    fmt,
    time::{Duration, Instant},
};

use sprig::ecs::schedule::TickReport;

/// Statistics collected from a run of ticks.
#[derive(Debug, Clone)]
pub struct TickStats {
    /// Total duration of all ticks.
    pub total_duration: Duration,
    /// Systems run across all ticks.
    pub systems_run: usize,
    /// Ticks that stopped on a dependency cycle.
    pub stalled_ticks: usize,
    /// Sorted tick times for percentile calculations.
    sorted_times: Vec<Duration>,
}

impl TickStats {
    /// Build stats from per-tick durations and reports.
    pub fn from_ticks(ticks: Vec<(Duration, TickReport)>) -> Self {
        let total_duration = ticks.iter().map(|(time, _)| *time).sum();
        let systems_run = ticks.iter().map(|(_, report)| report.ran).sum();
        let stalled_ticks = ticks
            .iter()
            .filter(|(_, report)| report.is_stalled())
            .count();

        let mut sorted_times: Vec<Duration> = ticks.into_iter().map(|(time, _)| time).collect();
        sorted_times.sort();

        Self {
            total_duration,
            systems_run,
            stalled_ticks,
            sorted_times,
        }
    }

    pub fn tick_count(&self) -> usize {
        self.sorted_times.len()
    }

    pub fn min(&self) -> Duration {
        self.sorted_times.first().copied().unwrap_or_default()
    }

    pub fn max(&self) -> Duration {
        self.sorted_times.last().copied().unwrap_or_default()
    }

    pub fn average(&self) -> Duration {
        match self.tick_count() {
            0 => Duration::ZERO,
            n => self.total_duration / n as u32,
        }
    }

    /// Get a specific percentile (0-100).
    pub fn percentile(&self, p: usize) -> Duration {
        if self.sorted_times.is_empty() {
            return Duration::ZERO;
        }
        let index = (self.sorted_times.len() * p.min(100) / 100).min(self.sorted_times.len() - 1);
        self.sorted_times[index]
    }

    /// 99th percentile (worst 1% of ticks).
    pub fn p99(&self) -> Duration {
        self.percentile(99)
    }
}

impl fmt::Display for TickStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks, avg: {:.3}ms, p99: {:.3}ms, min: {:.3}ms, max: {:.3}ms, {} systems run, {} stalled",
            self.tick_count(),
            self.average().as_secs_f64() * 1000.0,
            self.p99().as_secs_f64() * 1000.0,
            self.min().as_secs_f64() * 1000.0,
            self.max().as_secs_f64() * 1000.0,
            self.systems_run,
            self.stalled_ticks,
        )
    }
}

/// Call `tick_fn` `tick_count` times and time each call.
///
/// `tick_fn` receives the zero-based tick number and returns the scheduler's report for it.
pub fn measure_ticks<F>(tick_count: usize, mut tick_fn: F) -> TickStats
where
    F: FnMut(usize) -> TickReport,
{
    let mut ticks = Vec::with_capacity(tick_count);
    for tick in 0..tick_count {
        let start = Instant::now();
        let report = tick_fn(tick);
        ticks.push((start.elapsed(), report));
    }
    TickStats::from_ticks(ticks)
}
