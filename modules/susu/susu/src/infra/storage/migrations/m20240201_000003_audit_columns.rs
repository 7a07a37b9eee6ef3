//! Bring every audited table up to the full set of audit columns.
//!
//! Tables created earlier carry at most `created_at`. Added columns are
//! nullable: neither SQLite nor a populated Postgres table accepts a new
//! `NOT NULL` column without a constant default. `user_settings.created_at` is
//! backfilled and, on Postgres, tightened to `NOT NULL` afterwards.

use sea_orm_migration::prelude::*;
use susu_db::schema::{SchemaStep, apply_steps};

use super::drop_columns;
use super::idens::{Audit, Businesses, SavingsAccounts, SavingsMarkings, UserSettings, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn audited_tables() -> [(DynIden, &'static str); 5] {
    [
        (Users::Table.into_iden(), "users"),
        (Businesses::Table.into_iden(), "businesses"),
        (UserSettings::Table.into_iden(), "user_settings"),
        (SavingsAccounts::Table.into_iden(), "savings_accounts"),
        (SavingsMarkings::Table.into_iden(), "savings_markings"),
    ]
}

fn steps() -> Vec<SchemaStep> {
    let mut steps = vec![
        SchemaStep::add_column(
            UserSettings::Table,
            Audit::CreatedAt,
            ColumnDef::new(Audit::CreatedAt).timestamp_with_time_zone().null(),
        ),
        SchemaStep::backfill(
            UserSettings::Table,
            Audit::CreatedAt,
            Expr::current_timestamp().into(),
            Expr::col(Audit::CreatedAt).is_null(),
        ),
        SchemaStep::set_not_null(UserSettings::Table, Audit::CreatedAt),
    ];

    for (table, name) in audited_tables() {
        steps.push(SchemaStep::add_column(
            table.clone(),
            Audit::CreatedBy,
            ColumnDef::new(Audit::CreatedBy).integer().null(),
        ));
        steps.push(SchemaStep::add_column(
            table.clone(),
            Audit::UpdatedBy,
            ColumnDef::new(Audit::UpdatedBy).integer().null(),
        ));
        steps.push(SchemaStep::add_column(
            table.clone(),
            Audit::UpdatedAt,
            ColumnDef::new(Audit::UpdatedAt).timestamp_with_time_zone().null(),
        ));
        for (actor, column) in [(Audit::CreatedBy, "created_by"), (Audit::UpdatedBy, "updated_by")] {
            steps.push(SchemaStep::add_foreign_key(
                &format!("fk_{name}_{column}"),
                (table.clone(), actor),
                (Users::Table, Users::Id),
                ForeignKeyAction::SetNull,
            ));
        }
    }

    steps
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        apply_steps(manager, steps()).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, _) in audited_tables() {
            drop_columns(manager, table, &["created_by", "updated_by", "updated_at"]).await?;
        }
        drop_columns(manager, UserSettings::Table, &["created_at"]).await
    }
}
