//! Task management for taskdesk.
//!
//! This module implements task and category records, the status partition
//! list queries (search, category filter and ordering), status transitions,
//! and the monthly calendar grid. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
