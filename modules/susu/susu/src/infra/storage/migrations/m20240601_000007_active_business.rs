use sea_orm_migration::prelude::*;
use susu_db::schema::{SchemaStep, apply_steps};

use super::drop_columns;
use super::idens::{Businesses, UserBusiness, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn steps() -> Vec<SchemaStep> {
    vec![
        SchemaStep::add_column(
            Users::Table,
            Users::ActiveBusinessId,
            ColumnDef::new(Users::ActiveBusinessId).integer().null(),
        ),
        SchemaStep::add_foreign_key(
            "fk_users_active_business_id",
            (Users::Table, Users::ActiveBusinessId),
            (Businesses::Table, Businesses::Id),
            ForeignKeyAction::SetNull,
        ),
        SchemaStep::create_index(
            UserBusiness::Table,
            "idx_user_business_business_id",
            [UserBusiness::BusinessId],
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
            .drop_index(
                Index::drop()
                    .if_exists()
                    .name("idx_user_business_business_id")
                    .table(UserBusiness::Table)
                    .to_owned(),
            )
            .await?;
        drop_columns(manager, Users::Table, &["active_business_id"]).await
    }
}
