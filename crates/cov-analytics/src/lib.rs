//! # cov-analytics
//!
//! The Covboard aggregator: turns denormalized objective rows handed over by
//! a [`DataProvider`](cov_core::provider::DataProvider) into coverage counts,
//! execution breakdowns, progress percentages, a failing-item listing and a
//! per-module test-case census.
//!
//! Every stage except [`pipeline`] is a pure function or a single provider
//! round trip. [`pipeline::Dashboard`] runs one aggregation pass at a time
//! per filter change and keeps the last good values when a stage fails.

pub mod census;
pub mod classify;
pub mod error;
pub mod execution;
pub mod failures;
pub mod filter;
pub mod pipeline;
pub mod scope;

#[cfg(test)]
mod test_support;

pub use error::AnalyticsError;
