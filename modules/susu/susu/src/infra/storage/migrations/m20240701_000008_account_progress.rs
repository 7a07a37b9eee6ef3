//! Account progress (`not_started`, `in_progress`, `completed`) and the
//! target amount. Accounts that already have paid markings start out
//! `in_progress`.

use sea_orm_migration::prelude::*;
use susu_db::schema::{SchemaStep, apply_steps};

use super::drop_columns;
use super::idens::{SavingsAccounts, SavingsMarkings};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn has_payments() -> SimpleExpr {
    Expr::col(SavingsAccounts::Id).in_subquery(
        Query::select()
            .column(SavingsMarkings::SavingsAccountId)
            .from(SavingsMarkings::Table)
            .and_where(Expr::col(SavingsMarkings::PaymentMethod).is_not_null())
            .to_owned(),
    )
}

fn steps() -> Vec<SchemaStep> {
    vec![
        SchemaStep::add_column(
            SavingsAccounts::Table,
            SavingsAccounts::TargetAmount,
            ColumnDef::new(SavingsAccounts::TargetAmount).big_integer().null(),
        ),
        SchemaStep::add_column(
            SavingsAccounts::Table,
            SavingsAccounts::Status,
            ColumnDef::new(SavingsAccounts::Status)
                .string_len(20)
                .not_null()
                .default("not_started"),
        ),
        SchemaStep::backfill(
            SavingsAccounts::Table,
            SavingsAccounts::Status,
            Expr::value("in_progress"),
            Expr::col(SavingsAccounts::Status)
                .eq("not_started")
                .and(has_payments()),
        ),
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        apply_steps(manager, steps()).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_columns(manager, SavingsAccounts::Table, &["status", "target_amount"]).await
    }
}
