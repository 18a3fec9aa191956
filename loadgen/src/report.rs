//! Summaries of generated schedules and replay results.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use bytesize::ByteSize;
use sketches_ddsketch::DDSketch;
use yansi::Paint;

use crate::replay::{DispatchRecord, Outcome};
use crate::schedule::{ProcessParameters, Schedule};

/// Aggregated results of a replay.
#[derive(Default)]
pub struct Report {
    /// Latency of requests that received a response, in seconds.
    latency: DDSketch,
    /// Number of responses per status code.
    statuses: BTreeMap<u16, u64>,
    /// Requests that did not receive a response.
    failures: u64,
    /// Total size of all response bodies.
    bytes_received: u64,
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Report")
            .field("responses", &self.latency.count())
            .field("statuses", &self.statuses)
            .field("failures", &self.failures)
            .field("bytes_received", &self.bytes_received)
            .finish()
    }
}

impl Report {
    /// Aggregates the given records.
    pub fn from_records(records: &[DispatchRecord]) -> Self {
        let mut report = Self::default();
        for record in records {
            report.add(record);
        }
        report
    }

    /// Adds a single record.
    pub fn add(&mut self, record: &DispatchRecord) {
        match &record.outcome {
            Outcome::Response { status, body } => {
                self.latency.add(record.latency.as_secs_f64());
                *self.statuses.entry(*status).or_default() += 1;
                self.bytes_received += body.len() as u64;
            }
            Outcome::Failed { .. } => self.failures += 1,
        }
    }

    /// Total number of dispatched requests.
    pub fn requests(&self) -> u64 {
        self.responses() + self.failures
    }

    /// Number of requests that received a response.
    pub fn responses(&self) -> u64 {
        self.latency.count() as u64
    }

    /// Number of requests without a response.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Number of responses per status code.
    pub fn statuses(&self) -> &BTreeMap<u16, u64> {
        &self.statuses
    }

    /// Prints the summary to stdout. `elapsed` is the wall-clock time of the replay.
    pub fn print(&self, elapsed: Duration) {
        println!();
        print!("{} ({} requests", "## REPLAY".bold(), self.requests().bold());
        if self.failures > 0 {
            print!(", {}", format!("{} FAILURES", self.failures).bold().red());
        }
        println!(")");

        let rate = self.requests() as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        println!("  {:.2} requests/s over {:.2?}", rate.bold(), elapsed);

        for (status, count) in &self.statuses {
            let status = if (200..300).contains(status) {
                status.green()
            } else {
                status.yellow()
            };
            println!("  {}: {count}", status.bold());
        }

        if self.responses() > 0 {
            println!(
                "  received {}",
                ByteSize::b(self.bytes_received).bold()
            );
            print_percentiles(&self.latency, Duration::from_secs_f64);
        }
    }
}

/// Prints a short description of a schedule without replaying it.
pub fn print_schedule(schedule: &Schedule, params: &ProcessParameters) {
    println!(
        "{} ({} requests, expected {:.1})",
        "## SCHEDULE".bold(),
        schedule.len().bold(),
        params.expected_arrivals()
    );
    println!(
        "  base rate: {}/s; decay rate: {}/s; window: {:.2?}",
        params.base_rate,
        params.decay_rate,
        Duration::from_secs_f64(params.duration)
    );

    let Some(last) = schedule.offsets().last() else {
        return;
    };
    println!(
        "  last request at {:.2?}",
        Duration::from_secs_f64(last).bold()
    );

    let mut delays = DDSketch::default();
    for &delay in schedule.delays() {
        delays.add(delay);
    }
    print!("  delay");
    print_percentiles(&delays, Duration::from_secs_f64);
}

fn print_percentiles<T: fmt::Debug>(sketch: &DDSketch, map: impl Fn(f64) -> T) {
    let quantile = |q| sketch.quantile(q).ok().flatten().map(&map);

    let ops = sketch.count();
    let avg = sketch.sum().map(|sum| map(sum / ops as f64));
    let (Some(avg), Some(p50), Some(p90), Some(p99)) =
        (avg, quantile(0.5), quantile(0.9), quantile(0.99))
    else {
        return;
    };

    println!(
        "  avg: {:.2?}; p50: {p50:.2?}; p90: {p90:.2?}; p99: {p99:.2?}",
        avg.bold()
    );
}
