//! A load generator replaying a decaying Poisson arrival process against an HTTP endpoint.
//!
//! The arrival rate starts at `base_rate` requests per second and decays exponentially with
//! `decay_rate` over a fixed test window. The process is first turned into a [`Schedule`] of
//! inter-arrival delays, which is then replayed in real time by [`run`], sending one empty `POST`
//! request per entry and collecting a [`DispatchRecord`] for each.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use loadgen::{HttpTarget, ProcessParameters, RandomArrivals, generate_schedule};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let params = ProcessParameters::new(80.0, 0.001, 500.0);
//! let schedule = generate_schedule(&params, &mut RandomArrivals::from_seed(42))?;
//!
//! let target = HttpTarget::new("localhost", 8080, "heavywork", Duration::from_secs(5))?;
//! let records = loadgen::run(&schedule, &target, &CancellationToken::new(), |record| {
//!     println!("{record}");
//! })
//! .await;
//! assert!(records.len() <= schedule.len());
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod http;
pub mod observability;
pub mod replay;
pub mod report;
pub mod schedule;

pub use crate::http::HttpTarget;
pub use crate::replay::{DispatchRecord, Outcome, run};
pub use crate::schedule::{
    ArrivalSource, ProcessParameters, RandomArrivals, Schedule, ScheduleError, generate_schedule,
};
