//! Core domain models for the lead router
//!
//! This crate contains the shared data structures used across
//! the router: Rule, conditions, distribution descriptors, Lead,
//! and RouteOutcome.

pub mod models;

pub use models::*;
