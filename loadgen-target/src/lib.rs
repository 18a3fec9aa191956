//! A stub HTTP service used as the receiving end of generated load.
//!
//! The service exposes three endpoints:
//!
//! - `POST /heavywork` answers `202 Accepted` and counts the request.
//! - `POST /lightwork` answers `200 OK`.
//! - `GET /up` is the liveness probe.
//!
//! `GET /metrics` reports the request counters in plain text.

pub mod cli;
pub mod config;
pub mod endpoints;
pub mod healthcheck;
pub mod observability;
pub mod state;
pub mod web;
