use sea_orm_migration::prelude::*;
use susu_db::schema::{SchemaStep, apply_steps};

use super::idens::{Audit, Businesses, SavingsAccounts, SavingsMarkings, Users};
use super::pk;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn steps() -> Vec<SchemaStep> {
    vec![
        SchemaStep::create_table(SavingsAccounts::Table, |t| {
            t.col(pk(SavingsAccounts::Id))
                .col(ColumnDef::new(SavingsAccounts::CustomerId).integer().not_null())
                .col(ColumnDef::new(SavingsAccounts::BusinessId).integer().not_null())
                .col(
                    ColumnDef::new(SavingsAccounts::TrackingNumber)
                        .string_len(10)
                        .not_null()
                        .unique_key(),
                )
                .col(
                    ColumnDef::new(SavingsAccounts::SavingsType)
                        .string_len(20)
                        .not_null()
                        .default("daily"),
                )
                .col(ColumnDef::new(SavingsAccounts::DailyAmount).big_integer().not_null())
                .col(ColumnDef::new(SavingsAccounts::DurationMonths).integer().not_null())
                .col(ColumnDef::new(SavingsAccounts::StartDate).date().not_null())
                .col(ColumnDef::new(SavingsAccounts::EndDate).date().not_null())
                .col(
                    ColumnDef::new(SavingsAccounts::CommissionDays)
                        .integer()
                        .not_null()
                        .default(30),
                )
                .col(
                    ColumnDef::new(SavingsAccounts::CommissionAmount)
                        .big_integer()
                        .not_null(),
                )
                .col(
                    ColumnDef::new(Audit::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp()),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_savings_accounts_customer_id")
                        .from(SavingsAccounts::Table, SavingsAccounts::CustomerId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Restrict),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_savings_accounts_business_id")
                        .from(SavingsAccounts::Table, SavingsAccounts::BusinessId)
                        .to(Businesses::Table, Businesses::Id)
                        .on_delete(ForeignKeyAction::Restrict),
                );
        }),
        SchemaStep::create_table(SavingsMarkings::Table, |t| {
            t.col(pk(SavingsMarkings::Id))
                .col(
                    ColumnDef::new(SavingsMarkings::SavingsAccountId)
                        .integer()
                        .not_null(),
                )
                .col(ColumnDef::new(SavingsMarkings::MarkedDate).date().not_null())
                .col(ColumnDef::new(SavingsMarkings::Amount).big_integer().not_null())
                .col(
                    ColumnDef::new(SavingsMarkings::Status)
                        .string_len(20)
                        .not_null()
                        .default("pending"),
                )
                .col(
                    ColumnDef::new(Audit::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp()),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_savings_markings_account_id")
                        .from(SavingsMarkings::Table, SavingsMarkings::SavingsAccountId)
                        .to(SavingsAccounts::Table, SavingsAccounts::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                );
        }),
        SchemaStep::create_index(
            SavingsMarkings::Table,
            "uq_savings_markings_account_date",
            [SavingsMarkings::SavingsAccountId, SavingsMarkings::MarkedDate],
            true,
        ),
        SchemaStep::create_index(
            SavingsAccounts::Table,
            "idx_savings_accounts_customer_id",
            [SavingsAccounts::CustomerId],
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
        for table in [
            SavingsMarkings::Table.into_iden(),
            SavingsAccounts::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}
