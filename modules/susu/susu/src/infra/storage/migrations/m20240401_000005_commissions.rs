use sea_orm_migration::prelude::*;
use susu_db::schema::{SchemaStep, apply_steps};

use super::idens::{Commissions, SavingsAccounts, Users};
use super::{audit_columns, pk};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn steps() -> Vec<SchemaStep> {
    vec![
        SchemaStep::create_table(Commissions::Table, |t| {
            t.col(pk(Commissions::Id))
                .col(ColumnDef::new(Commissions::SavingsAccountId).integer().not_null())
                .col(ColumnDef::new(Commissions::AgentId).integer().not_null())
                .col(ColumnDef::new(Commissions::Amount).big_integer().not_null())
                .col(ColumnDef::new(Commissions::CommissionDate).date().not_null());
            audit_columns(t);
            t.foreign_key(
                ForeignKey::create()
                    .name("fk_commissions_savings_account_id")
                    .from(Commissions::Table, Commissions::SavingsAccountId)
                    .to(SavingsAccounts::Table, SavingsAccounts::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_commissions_agent_id")
                    .from(Commissions::Table, Commissions::AgentId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Restrict),
            );
        }),
        SchemaStep::create_index(
            Commissions::Table,
            "idx_commissions_agent_id",
            [Commissions::AgentId],
            false,
        ),
        SchemaStep::create_index(
            Commissions::Table,
            "idx_commissions_savings_account_id",
            [Commissions::SavingsAccountId],
            false,
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
        manager
            .drop_table(Table::drop().table(Commissions::Table).if_exists().to_owned())
            .await
    }
}
