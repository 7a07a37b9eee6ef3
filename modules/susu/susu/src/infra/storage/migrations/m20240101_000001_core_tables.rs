use sea_orm_migration::prelude::*;
use susu_db::schema::{SchemaStep, apply_steps};

use super::idens::{Audit, Businesses, UserBusiness, UserSettings, Users};
use super::pk;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn steps() -> Vec<SchemaStep> {
    vec![
        SchemaStep::create_table(Users::Table, |t| {
            t.col(pk(Users::Id))
                .col(ColumnDef::new(Users::FullName).string_len(255).not_null())
                .col(
                    ColumnDef::new(Users::PhoneNumber)
                        .string_len(20)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Users::Email).string_len(255).null().unique_key())
                .col(
                    ColumnDef::new(Users::Username)
                        .string_len(100)
                        .not_null()
                        .unique_key(),
                )
                .col(
                    ColumnDef::new(Users::Role)
                        .string_len(20)
                        .not_null()
                        .default("customer"),
                )
                .col(
                    ColumnDef::new(Users::IsActive)
                        .boolean()
                        .not_null()
                        .default(true),
                )
                .col(
                    ColumnDef::new(Audit::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp()),
                );
        }),
        SchemaStep::create_table(Businesses::Table, |t| {
            t.col(pk(Businesses::Id))
                .col(ColumnDef::new(Businesses::Name).string_len(255).not_null())
                .col(ColumnDef::new(Businesses::AgentId).integer().not_null())
                .col(ColumnDef::new(Businesses::Location).string_len(255).null())
                .col(
                    ColumnDef::new(Businesses::UniqueCode)
                        .string_len(20)
                        .not_null()
                        .unique_key(),
                )
                .col(
                    ColumnDef::new(Businesses::IsDefault)
                        .boolean()
                        .not_null()
                        .default(false),
                )
                .col(
                    ColumnDef::new(Audit::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp()),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_businesses_agent_id")
                        .from(Businesses::Table, Businesses::AgentId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Restrict),
                );
        }),
        SchemaStep::create_table(UserBusiness::Table, |t| {
            t.col(ColumnDef::new(UserBusiness::UserId).integer().not_null())
                .col(ColumnDef::new(UserBusiness::BusinessId).integer().not_null())
                .primary_key(
                    Index::create()
                        .col(UserBusiness::UserId)
                        .col(UserBusiness::BusinessId),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_user_business_user_id")
                        .from(UserBusiness::Table, UserBusiness::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_user_business_business_id")
                        .from(UserBusiness::Table, UserBusiness::BusinessId)
                        .to(Businesses::Table, Businesses::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                );
        }),
        SchemaStep::create_table(UserSettings::Table, |t| {
            t.col(pk(UserSettings::Id))
                .col(
                    ColumnDef::new(UserSettings::UserId)
                        .integer()
                        .not_null()
                        .unique_key(),
                )
                .col(
                    ColumnDef::new(UserSettings::NotificationMethod)
                        .string_len(20)
                        .not_null()
                        .default("both"),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_user_settings_user_id")
                        .from(UserSettings::Table, UserSettings::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                );
        }),
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
            UserSettings::Table.into_iden(),
            UserBusiness::Table.into_iden(),
            Businesses::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}
