use std::path::Path;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::{DbConfig, Engine, redact_credentials_in_dsn, sqlite_file_path};
use crate::DbError;

/// Open a connection pool for the configured database.
///
/// For file-backed SQLite the parent directory is created first.
///
/// # Errors
/// Returns [`DbError`] when the configuration is invalid, the backend is not
/// compiled in, or the database cannot be reached.
pub async fn connect(cfg: &DbConfig) -> Result<DatabaseConnection, DbError> {
    let engine = cfg.validate()?;
    ensure_backend_enabled(engine)?;

    let mut max_conns = cfg.max_conns;
    if engine == Engine::Sqlite {
        match sqlite_file_path(&cfg.dsn) {
            Some(path) => prepare_sqlite_dir(Path::new(path))?,
            // Every pooled connection to `:memory:` would see its own empty database.
            None => max_conns = 1,
        }
    }

    let mut opts = ConnectOptions::new(cfg.dsn.clone());
    opts.max_connections(max_conns)
        .min_connections(cfg.min_conns.min(max_conns))
        .acquire_timeout(cfg.acquire_timeout)
        .idle_timeout(cfg.idle_timeout)
        .sqlx_logging(cfg.sqlx_logging);

    let db = Database::connect(opts).await?;
    tracing::info!(
        dsn = %redact_credentials_in_dsn(Some(&cfg.dsn)),
        ?engine,
        max_conns,
        "database connected"
    );
    Ok(db)
}

fn ensure_backend_enabled(engine: Engine) -> Result<(), DbError> {
    match engine {
        Engine::Sqlite if !cfg!(feature = "sqlite") => {
            Err(DbError::FeatureDisabled("sqlite"))
        }
        Engine::Postgres if !cfg!(feature = "pg") => Err(DbError::FeatureDisabled("pg")),
        Engine::Sqlite | Engine::Postgres => Ok(()),
    }
}

fn prepare_sqlite_dir(path: &Path) -> Result<(), DbError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
