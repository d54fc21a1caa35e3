//! Candidate ranking reports for recruitment postings.
//!
//! The crate owns the asynchronous report lifecycle: a posting's scored
//! candidates are aggregated into a ranked report by a background task while
//! the requester polls a job record until it reaches a terminal state. All
//! collaborators with real infrastructure behind them (candidate scoring,
//! posting storage, PDF rendering, email) sit behind traits so the service
//! binary and the tests can supply their own adapters.

pub mod config;
pub mod error;
pub mod postings;
pub mod reports;
pub mod telemetry;
