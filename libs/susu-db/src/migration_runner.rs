//! Ledger-backed migration runner.
//!
//! Each module gets its own ledger table `susu_migrations__<prefix>__<hash8>`
//! (`<hash8>` is derived from the module name with `xxh3_64`), holding one row
//! per applied migration. Migrations run in name order; each one runs in a
//! transaction together with its ledger row, so a failing migration leaves
//! neither schema changes (where the backend supports transactional DDL) nor a
//! ledger entry behind.

use std::collections::HashSet;

use sea_orm::sea_query::{Alias, ColumnDef, Expr, Query, Table};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, FromQueryResult, TransactionTrait,
};
use sea_orm_migration::{MigrationTrait, SchemaManager};
use thiserror::Error;
use tracing::{debug, info, warn};
use xxhash_rust::xxh3::xxh3_64;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to create migration ledger for module '{module}': {source}")]
    CreateLedger { module: String, source: DbErr },

    #[error("failed to read migration ledger for module '{module}': {source}")]
    ReadLedger { module: String, source: DbErr },

    #[error("migration '{migration}' failed for module '{module}': {source}")]
    MigrationFailed {
        module: String,
        migration: String,
        source: DbErr,
    },

    #[error("failed to record migration '{migration}' for module '{module}': {source}")]
    RecordFailed {
        module: String,
        migration: String,
        source: DbErr,
    },

    #[error("duplicate migration name '{name}' for module '{module}'")]
    DuplicateMigrationName { module: String, name: String },
}

/// Outcome of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationResult {
    pub applied: usize,
    pub skipped: usize,
    pub applied_names: Vec<String>,
}

#[derive(Debug, FromQueryResult)]
struct LedgerRow {
    version: String,
}

const VERSION: &str = "version";
const APPLIED_AT: &str = "applied_at";

fn sanitize_module_name(name: &str) -> String {
    let out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() { "_".to_owned() } else { out }
}

/// Ledger table name for a module, capped at the 63-byte Postgres identifier limit.
pub(crate) fn ledger_table_name(module_name: &str) -> String {
    const PREFIX: &str = "susu_migrations__";
    const SEP: &str = "__";
    const HASH_LEN: usize = 8;
    const PG_IDENT_MAX: usize = 63;

    let hash = format!("{:016x}", xxh3_64(module_name.as_bytes()));
    let max_prefix = PG_IDENT_MAX - PREFIX.len() - SEP.len() - HASH_LEN;
    let mut fragment = sanitize_module_name(module_name);
    fragment.truncate(max_prefix);

    format!("{PREFIX}{fragment}{SEP}{}", &hash[..HASH_LEN])
}

async fn ensure_ledger(
    conn: &impl ConnectionTrait,
    table: &str,
    module: &str,
) -> Result<(), MigrationError> {
    let stmt = Table::create()
        .table(Alias::new(table))
        .if_not_exists()
        .col(
            ColumnDef::new(Alias::new(VERSION))
                .string_len(255)
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Alias::new(APPLIED_AT))
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned();

    conn.execute(conn.get_database_backend().build(&stmt))
        .await
        .map_err(|source| MigrationError::CreateLedger {
            module: module.to_owned(),
            source,
        })?;
    Ok(())
}

async fn applied_versions(
    conn: &impl ConnectionTrait,
    table: &str,
    module: &str,
) -> Result<HashSet<String>, MigrationError> {
    let query = Query::select()
        .column(Alias::new(VERSION))
        .from(Alias::new(table))
        .to_owned();

    let rows = LedgerRow::find_by_statement(conn.get_database_backend().build(&query))
        .all(conn)
        .await
        .map_err(|source| MigrationError::ReadLedger {
            module: module.to_owned(),
            source,
        })?;

    Ok(rows.into_iter().map(|r| r.version).collect())
}

async fn record(
    conn: &impl ConnectionTrait,
    table: &str,
    module: &str,
    migration: &str,
) -> Result<(), MigrationError> {
    let failed = |source: DbErr| MigrationError::RecordFailed {
        module: module.to_owned(),
        migration: migration.to_owned(),
        source,
    };

    let mut insert = Query::insert();
    insert
        .into_table(Alias::new(table))
        .columns([Alias::new(VERSION)])
        .values([migration.into()])
        .map_err(|e| failed(DbErr::Custom(e.to_string())))?;

    conn.execute(conn.get_database_backend().build(&insert))
        .await
        .map_err(failed)?;
    Ok(())
}

fn reject_duplicates(
    module: &str,
    migrations: &[Box<dyn MigrationTrait>],
) -> Result<(), MigrationError> {
    let mut seen = HashSet::new();
    for m in migrations {
        if !seen.insert(m.name()) {
            return Err(MigrationError::DuplicateMigrationName {
                module: module.to_owned(),
                name: m.name().to_owned(),
            });
        }
    }
    Ok(())
}

/// Apply every migration of `module` that the ledger does not list yet.
///
/// # Errors
/// Returns [`MigrationError`] when the ledger cannot be created or read, the
/// list contains duplicate names, or a migration fails. Migrations applied
/// before the failing one stay applied.
pub async fn run_migrations(
    db: &DatabaseConnection,
    module: &str,
    mut migrations: Vec<Box<dyn MigrationTrait>>,
) -> Result<MigrationResult, MigrationError> {
    let mut result = MigrationResult::default();
    if migrations.is_empty() {
        debug!(module, "no migrations to run");
        return Ok(result);
    }
    reject_duplicates(module, &migrations)?;

    let table = ledger_table_name(module);
    ensure_ledger(db, &table, module).await?;
    let applied = applied_versions(db, &table, module).await?;

    migrations.sort_by(|a, b| a.name().cmp(b.name()));
    let known: HashSet<&str> = migrations.iter().map(|m| m.name()).collect();
    for unknown in applied.iter().filter(|v| !known.contains(v.as_str())) {
        warn!(module, migration = %unknown, "ledger lists a migration this build does not know");
    }

    for migration in migrations {
        let name = migration.name().to_owned();
        if applied.contains(&name) {
            debug!(module, migration = %name, "migration already applied");
            result.skipped += 1;
            continue;
        }

        info!(module, migration = %name, "applying migration");
        let failed = |source: DbErr| MigrationError::MigrationFailed {
            module: module.to_owned(),
            migration: name.clone(),
            source,
        };

        // Dropping the transaction on an error path rolls it back.
        let txn = db.begin().await.map_err(failed)?;
        migration
            .up(&SchemaManager::new(&txn))
            .await
            .map_err(failed)?;
        record(&txn, &table, module, &name).await?;
        txn.commit().await.map_err(failed)?;

        result.applied += 1;
        result.applied_names.push(name);
    }

    info!(
        module,
        applied = result.applied,
        skipped = result.skipped,
        "migration run complete"
    );
    Ok(result)
}

/// Names of migrations not yet recorded in the module's ledger, in run order.
///
/// # Errors
/// Returns [`MigrationError::ReadLedger`] when the ledger cannot be inspected.
pub async fn get_pending_migrations(
    db: &DatabaseConnection,
    module: &str,
    migrations: &[Box<dyn MigrationTrait>],
) -> Result<Vec<String>, MigrationError> {
    let table = ledger_table_name(module);
    let exists = SchemaManager::new(db)
        .has_table(&table)
        .await
        .map_err(|source| MigrationError::ReadLedger {
            module: module.to_owned(),
            source,
        })?;

    let applied = if exists {
        applied_versions(db, &table, module).await?
    } else {
        HashSet::new()
    };

    let mut pending: Vec<String> = migrations
        .iter()
        .map(|m| m.name().to_owned())
        .filter(|n| !applied.contains(n))
        .collect();
    pending.sort();
    Ok(pending)
}
