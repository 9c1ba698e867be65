//! # stackwire-compose
//!
//! Declarative model of the Docker resources a stack consists of.
//!
//! Handles:
//! - **Resource**: Descriptors for remote images, networks and containers.
//! - **Builder**: Fluent construction of container descriptors.
//! - **Stack**: The descriptor set of one stack plus its exported outputs.
//! - **Graph**: Dependency graph construction and topological resolution.
//! - **Validator**: Reference and uniqueness checks before hand-off.
//! - **Snapshot**: The JSON hand-off document and change detection.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod builder;
pub mod graph;
pub mod resource;
pub mod snapshot;
pub mod stack;
pub mod validator;
