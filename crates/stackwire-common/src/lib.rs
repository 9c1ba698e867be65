//! # stackwire-common
//!
//! Shared types, error definitions, secret values, the configuration
//! loader, and constants used across the entire Stackwire workspace.
//!
//! This crate is the leaf of the dependency graph. It depends on no other
//! internal crate and provides the primitives the descriptor model and the
//! service declarations build upon.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
pub mod secret;
pub mod types;
