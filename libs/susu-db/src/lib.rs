//! Database plumbing shared by susu modules.
//!
//! - [`DbConfig`] / [`connect`]: pool configuration and connection setup.
//! - [`migration_runner`]: applies a module's migrations once each, recording
//!   them in a per-module ledger table.
//! - [`schema`]: declarative migration steps that check whether they are already
//!   satisfied before touching the schema, and verify themselves afterwards.

pub mod config;
mod connect;
pub mod migration_runner;
pub mod schema;

pub use config::{DbConfig, Engine, redact_credentials_in_dsn};
pub use connect::connect;
pub use sea_orm::ConnectionTrait as DbConnTrait;
pub use migration_runner::{MigrationError, MigrationResult, get_pending_migrations, run_migrations};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("unsupported DSN: {0}")]
    UnknownDsn(String),

    #[error("database feature not enabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("invalid database configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
