//! Payment details on markings, plus normalization of legacy upper-case
//! status values (`PENDING`, `PAID`) to the lower-case form used by the
//! configured status domain.

use sea_orm_migration::prelude::*;
use susu_db::schema::{SchemaStep, apply_steps};

use super::drop_columns;
use super::idens::{SavingsMarkings, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn steps() -> Vec<SchemaStep> {
    vec![
        SchemaStep::add_column(
            SavingsMarkings::Table,
            SavingsMarkings::PaymentMethod,
            ColumnDef::new(SavingsMarkings::PaymentMethod).string_len(20).null(),
        ),
        SchemaStep::add_column(
            SavingsMarkings::Table,
            SavingsMarkings::PaymentReference,
            ColumnDef::new(SavingsMarkings::PaymentReference)
                .string_len(100)
                .null(),
        ),
        SchemaStep::add_column(
            SavingsMarkings::Table,
            SavingsMarkings::MarkedById,
            ColumnDef::new(SavingsMarkings::MarkedById).integer().null(),
        ),
        SchemaStep::add_foreign_key(
            "fk_savings_markings_marked_by_id",
            (SavingsMarkings::Table, SavingsMarkings::MarkedById),
            (Users::Table, Users::Id),
            ForeignKeyAction::SetNull,
        ),
        SchemaStep::backfill(
            SavingsMarkings::Table,
            SavingsMarkings::Status,
            Func::lower(Expr::col(SavingsMarkings::Status)).into(),
            Expr::col(SavingsMarkings::Status).ne(Func::lower(Expr::col(SavingsMarkings::Status))),
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
        drop_columns(
            manager,
            SavingsMarkings::Table,
            &["marked_by_id", "payment_reference", "payment_method"],
        )
        .await
    }
}
