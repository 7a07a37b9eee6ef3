use sea_orm_migration::prelude::*;
use susu_db::schema::{SchemaStep, apply_steps};

use super::idens::{Businesses, SavingsAccounts, SavingsMarkings, Units};
use super::{audit_columns, drop_columns, pk};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn steps() -> Vec<SchemaStep> {
    vec![
        SchemaStep::create_table(Units::Table, |t| {
            t.col(pk(Units::Id))
                .col(ColumnDef::new(Units::BusinessId).integer().not_null())
                .col(ColumnDef::new(Units::Name).string_len(255).not_null())
                .col(ColumnDef::new(Units::Location).string_len(255).null());
            audit_columns(t);
            t.foreign_key(
                ForeignKey::create()
                    .name("fk_units_business_id")
                    .from(Units::Table, Units::BusinessId)
                    .to(Businesses::Table, Businesses::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        }),
        SchemaStep::create_index(Units::Table, "idx_units_business_id", [Units::BusinessId], false),
        SchemaStep::rename_column(Businesses::Table, Businesses::Location, Businesses::Address),
        SchemaStep::create_index(
            Businesses::Table,
            "idx_businesses_agent_id",
            [Businesses::AgentId],
            false,
        ),
        SchemaStep::add_column(
            SavingsAccounts::Table,
            SavingsAccounts::UnitId,
            ColumnDef::new(SavingsAccounts::UnitId).integer().null(),
        ),
        SchemaStep::add_column(
            SavingsMarkings::Table,
            SavingsMarkings::UnitId,
            ColumnDef::new(SavingsMarkings::UnitId).integer().null(),
        ),
        SchemaStep::add_foreign_key(
            "fk_savings_accounts_unit_id",
            (SavingsAccounts::Table, SavingsAccounts::UnitId),
            (Units::Table, Units::Id),
            ForeignKeyAction::SetNull,
        ),
        SchemaStep::add_foreign_key(
            "fk_savings_markings_unit_id",
            (SavingsMarkings::Table, SavingsMarkings::UnitId),
            (Units::Table, Units::Id),
            ForeignKeyAction::SetNull,
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
        drop_columns(manager, SavingsMarkings::Table, &["unit_id"]).await?;
        drop_columns(manager, SavingsAccounts::Table, &["unit_id"]).await?;
        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .name("idx_businesses_agent_id")
                    .table(Businesses::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .alter_table(
                Table::alter()
                    .table(Businesses::Table)
                    .rename_column(Businesses::Address, Businesses::Location)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Units::Table).if_exists().to_owned())
            .await
    }
}
