//! Taskdesk: a small task-management web application.
//!
//! Tasks carry a title, description, due date, priority and category, and
//! move between pending, completed and postponed lists. A monthly calendar
//! shows pending work by due date.
//!
//! # Architecture
//!
//! Taskdesk follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Task and category model, list queries and calendar grid
//! - [`web`]: HTTP routes, handlers and HTML templates
//! - [`config`]: Layered runtime configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod task;
pub mod telemetry;
pub mod web;
