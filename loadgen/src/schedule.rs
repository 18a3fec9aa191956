//! Generation of request [`Schedule`]s from a decaying Poisson arrival process.
//!
//! The arrival intensity at elapsed time `t` is `base_rate * exp(-decay_rate * t)`. Starting at
//! `t = 0`, each step draws the waiting time to the next arrival from an exponential distribution
//! parameterized with the *instantaneous* rate, and appends it to the schedule until the next
//! arrival would fall outside of the test window.
//!
//! Randomness is injected through the [`ArrivalSource`] trait. Use [`RandomArrivals`] with a
//! fixed seed to get reproducible schedules.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Exp};
use thiserror::Error;

/// How many times a zero-length draw is retried before the process is considered exhausted.
const MAX_REDRAWS: usize = 16;

/// Errors raised while building a [`Schedule`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ScheduleError {
    /// The arrival process is not well-defined for the given parameters.
    #[error("invalid process parameters: {0}")]
    InvalidParameters(&'static str),

    /// An explicitly provided delay is not a positive, finite number of seconds.
    #[error("invalid delay at index {index}: {delay}")]
    InvalidDelay {
        /// Position of the offending delay.
        index: usize,
        /// The rejected value.
        delay: f64,
    },
}

/// Parameters of the decaying arrival process.
///
/// All times are in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessParameters {
    /// Arrivals per second at the start of the test.
    pub base_rate: f64,
    /// Exponential decay constant applied to `base_rate` over elapsed time.
    pub decay_rate: f64,
    /// Length of the test window. No arrival is scheduled at or beyond this point.
    pub duration: f64,
}

impl ProcessParameters {
    /// Creates a new set of parameters. Use [`validate`](Self::validate) to check them.
    pub fn new(base_rate: f64, decay_rate: f64, duration: f64) -> Self {
        Self {
            base_rate,
            decay_rate,
            duration,
        }
    }

    /// Checks that the process is well-defined.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if !self.base_rate.is_finite() || self.base_rate <= 0.0 {
            return Err(ScheduleError::InvalidParameters(
                "base_rate must be a positive number",
            ));
        }
        if !self.decay_rate.is_finite() || self.decay_rate < 0.0 {
            return Err(ScheduleError::InvalidParameters(
                "decay_rate must be a non-negative number",
            ));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ScheduleError::InvalidParameters(
                "duration must be a positive number",
            ));
        }
        if Duration::try_from_secs_f64(self.duration).is_err() {
            return Err(ScheduleError::InvalidParameters("duration is out of range"));
        }
        Ok(())
    }

    /// The instantaneous arrival rate after `elapsed` seconds.
    pub fn rate_at(&self, elapsed: f64) -> f64 {
        self.base_rate * (-self.decay_rate * elapsed).exp()
    }

    /// The expected number of arrivals within the test window.
    ///
    /// This is the integral of [`rate_at`](Self::rate_at) over `[0, duration)`.
    pub fn expected_arrivals(&self) -> f64 {
        if self.decay_rate == 0.0 {
            return self.base_rate * self.duration;
        }
        self.base_rate / self.decay_rate * (1.0 - (-self.decay_rate * self.duration).exp())
    }
}

/// A source of inter-arrival times.
pub trait ArrivalSource {
    /// Draws the waiting time until the next arrival of a process with the given `rate`.
    ///
    /// A rate of zero means no further arrivals; implementations should return infinity.
    fn next_interval(&mut self, rate: f64) -> f64;
}

/// An [`ArrivalSource`] that draws exponentially distributed intervals from a seeded RNG.
#[derive(Clone, Debug)]
pub struct RandomArrivals {
    seed: u64,
    rng: SmallRng,
}

impl RandomArrivals {
    /// Creates a source that yields the same intervals for the same seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Creates a source with a random seed.
    ///
    /// The chosen seed is available via [`seed`](Self::seed) to reproduce a run.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    /// The seed this source was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl ArrivalSource for RandomArrivals {
    fn next_interval(&mut self, rate: f64) -> f64 {
        match Exp::new(rate) {
            Ok(exp) => exp.sample(&mut self.rng),
            Err(_) => f64::INFINITY,
        }
    }
}

/// An ordered plan of inter-arrival delays, in seconds.
///
/// Every delay is strictly positive and finite. A schedule is built once and then replayed
/// front to back; see [`run`](crate::replay::run).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schedule {
    delays: Vec<f64>,
}

impl Schedule {
    /// Builds a schedule from explicit delays.
    pub fn from_delays(delays: Vec<f64>) -> Result<Self, ScheduleError> {
        for (index, &delay) in delays.iter().enumerate() {
            if !delay.is_finite() || delay <= 0.0 {
                return Err(ScheduleError::InvalidDelay { index, delay });
            }
        }

        let schedule = Self { delays };
        if Duration::try_from_secs_f64(schedule.total()).is_err() {
            return Err(ScheduleError::InvalidParameters(
                "total schedule length is out of range",
            ));
        }
        Ok(schedule)
    }

    /// Number of requests in this schedule.
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    /// Returns `true` if no request is scheduled.
    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    /// The raw delays in seconds, in dispatch order.
    pub fn delays(&self) -> &[f64] {
        &self.delays
    }

    /// Time from the start of the schedule to the last arrival, in seconds.
    pub fn total(&self) -> f64 {
        self.delays.iter().sum()
    }

    /// Arrival times relative to the start of the schedule, in seconds.
    pub fn offsets(&self) -> impl Iterator<Item = f64> + '_ {
        self.delays.iter().scan(0.0, |elapsed, delay| {
            *elapsed += delay;
            Some(*elapsed)
        })
    }

    /// The delays as [`Duration`]s.
    pub fn durations(&self) -> impl Iterator<Item = Duration> + '_ {
        self.delays.iter().map(|&delay| Duration::from_secs_f64(delay))
    }
}

/// Generates the schedule of a decaying Poisson arrival process.
///
/// Arrivals are appended while they fall strictly inside the test window. The first draw that
/// would reach or cross `duration` ends the schedule and is discarded, so the sum of every prefix
/// of the result is strictly less than `duration`.
pub fn generate_schedule<S>(
    params: &ProcessParameters,
    source: &mut S,
) -> Result<Schedule, ScheduleError>
where
    S: ArrivalSource + ?Sized,
{
    params.validate()?;

    let mut delays = Vec::new();
    let mut elapsed = 0.0;

    while elapsed < params.duration {
        let rate = params.rate_at(elapsed);
        let Some(delta) = draw_positive(source, rate) else {
            break;
        };

        let next = elapsed + delta;
        if delta >= params.duration || next >= params.duration {
            break;
        }

        delays.push(delta);
        elapsed = next;
    }

    tracing::trace!(
        requests = delays.len(),
        elapsed,
        "arrival process exhausted"
    );
    Ok(Schedule { delays })
}

/// Draws the next interval, retrying zero-length draws.
///
/// Returns `None` if the source keeps yielding zero or returns something that is not a positive
/// number of seconds.
fn draw_positive<S>(source: &mut S, rate: f64) -> Option<f64>
where
    S: ArrivalSource + ?Sized,
{
    for _ in 0..MAX_REDRAWS {
        let delta = source.next_interval(rate);
        if delta == 0.0 {
            continue;
        }
        return (delta > 0.0).then_some(delta);
    }
    None
}
