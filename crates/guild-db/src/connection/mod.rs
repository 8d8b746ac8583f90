//! Database connection management

mod postgres;

pub use postgres::{release, ConnectionFactory};

// Re-export PgConnection for convenience
pub use sqlx::postgres::PgConnection;
