//! MobyPark Database Layer
//!
//! This crate provides PostgreSQL database access and repository implementations
//! for the MobyPark backend. It includes:
//!
//! - Connection pool management with sqlx
//! - Embedded schema migrations
//! - Repository implementations for parking lots, vehicles, sessions and payments

pub mod pool;
pub mod repositories;

pub use pool::{create_pool, run_migrations};
pub use repositories::*;

// Re-export commonly used types
pub use mobypark_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres};
