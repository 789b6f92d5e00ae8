//! # cov-core
//!
//! Core types, identifiers, and error types for Covboard.
//!
//! This crate provides the foundational types shared across all Covboard crates:
//! - Entity structs for the test-execution domain (objectives, scenarios, TORs, modules, ...)
//! - Result, severity, and fix-type enums
//! - The `RecordId` identifier type and ID prefix constants
//! - The provider-neutral query description (`ObjectiveQuery`)
//! - The `DataProvider` trait the aggregator reads through
//! - The explicit session capability context
//! - Cross-cutting error types

pub mod context;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod provider;
pub mod query;
