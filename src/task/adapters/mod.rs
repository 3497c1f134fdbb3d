//! Persistence adapters for the task module.
//!
//! Adapters implement the [`TaskRepository`] and [`CategoryRepository`] ports.
//!
//! - [`memory::InMemoryTaskRepository`]: thread-safe in-memory storage for
//!   tests and zero-configuration runs
//! - [`postgres::PostgresTaskRepository`]: `PostgreSQL` persistence using
//!   Diesel ORM
//!
//! [`TaskRepository`]: crate::task::ports::TaskRepository
//! [`CategoryRepository`]: crate::task::ports::CategoryRepository

pub mod memory;
pub mod postgres;
