//! # guild-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `guild-core`. It handles:
//!
//! - Per-operation connections through a [`ConnectionFactory`]
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ model mappers, including view rows ↔ sink cells
//! - The view query builder that splices only whitelisted directives
//!
//! The schema is managed outside this repository.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guild_common::AppConfig;
//! use guild_core::traits::GuildRepository;
//! use guild_db::{ConnectionFactory, PgGuildRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let connections = ConnectionFactory::new(&config.database)?;
//!     let guilds = PgGuildRepository::new(connections).list_guilds().await?;
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod mappers;
pub mod models;
pub mod queries;
pub mod repositories;

// Re-export commonly used types
pub use connection::ConnectionFactory;
pub use repositories::{
    map_db_error, PgActivityLogRepository, PgArchiveRepository, PgGuildRepository,
    PgMemberRepository, PgViewRepository,
};
