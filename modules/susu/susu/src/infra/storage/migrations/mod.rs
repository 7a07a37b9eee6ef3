//! Schema history of the susu module.
//!
//! Migrations are applied in name order by `susu_db::run_migrations` and are
//! built from checked [`SchemaStep`](susu_db::schema::SchemaStep)s, so each one
//! can be re-run against a database where it was partially applied.

use sea_orm_migration::prelude::*;

mod idens;
mod m20240101_000001_core_tables;
mod m20240115_000002_savings_tables;
mod m20240201_000003_audit_columns;
mod m20240301_000004_units_and_addresses;
mod m20240401_000005_commissions;
mod m20240501_000006_marking_payments;
mod m20240601_000007_active_business;
mod m20240701_000008_account_progress;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_core_tables::Migration),
            Box::new(m20240115_000002_savings_tables::Migration),
            Box::new(m20240201_000003_audit_columns::Migration),
            Box::new(m20240301_000004_units_and_addresses::Migration),
            Box::new(m20240401_000005_commissions::Migration),
            Box::new(m20240501_000006_marking_payments::Migration),
            Box::new(m20240601_000007_active_business::Migration),
            Box::new(m20240701_000008_account_progress::Migration),
        ]
    }
}

fn pk(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

/// All four audit columns, for tables created after audit attribution existed.
fn audit_columns(t: &mut TableCreateStatement) {
    use idens::Audit;

    t.col(ColumnDef::new(Audit::CreatedBy).integer().null())
        .col(
            ColumnDef::new(Audit::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(ColumnDef::new(Audit::UpdatedBy).integer().null())
        .col(ColumnDef::new(Audit::UpdatedAt).timestamp_with_time_zone().null());
}

/// SQLite allows a single alteration per `ALTER TABLE`, so columns go one at a time.
async fn drop_columns<T>(manager: &SchemaManager<'_>, table: T, columns: &[&str]) -> Result<(), DbErr>
where
    T: IntoIden + Clone + 'static,
{
    for column in columns {
        if manager.has_column(table.clone().into_iden().to_string(), *column).await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(table.clone())
                        .drop_column(Alias::new(*column))
                        .to_owned(),
                )
                .await?;
        }
    }
    Ok(())
}
