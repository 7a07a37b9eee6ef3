//! `user_business` link table.
//!
//! Links are inserted with `ON CONFLICT DO NOTHING` after an existence check,
//! so a concurrent insert of the same pair is absorbed instead of surfacing as
//! a duplicate-key error. The row is not audited and goes through
//! `Entity::insert` directly.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use susu_db::DbConnTrait;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::repos::MembershipsRepository;

use super::entity::user_business::{ActiveModel, Column, Entity as UserBusinessEntity};

#[derive(Clone, Default)]
pub struct OrmMembershipsRepository;

#[async_trait]
impl MembershipsRepository for OrmMembershipsRepository {
    async fn is_linked<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
        business_id: i32,
    ) -> Result<bool, DomainError> {
        let count = UserBusinessEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::BusinessId.eq(business_id))
            .count(conn)
            .await?;
        Ok(count > 0)
    }

    async fn link<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
        business_id: i32,
    ) -> Result<bool, DomainError> {
        if self.is_linked(conn, user_id, business_id).await? {
            debug!(user_id, business_id, "already linked");
            return Ok(false);
        }
        let row = ActiveModel {
            user_id: Set(user_id),
            business_id: Set(business_id),
        };
        let inserted = UserBusinessEntity::insert(row)
            .on_conflict(
                OnConflict::columns([Column::UserId, Column::BusinessId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await?;
        Ok(inserted > 0)
    }

    async fn unlink<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
        business_id: Option<i32>,
    ) -> Result<u64, DomainError> {
        let mut delete = UserBusinessEntity::delete_many().filter(Column::UserId.eq(user_id));
        if let Some(business_id) = business_id {
            delete = delete.filter(Column::BusinessId.eq(business_id));
        }
        let result = delete.exec(conn).await?;
        Ok(result.rows_affected)
    }

    async fn list_business_ids<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<Vec<i32>, DomainError> {
        let ids = UserBusinessEntity::find()
            .select_only()
            .column(Column::BusinessId)
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::BusinessId)
            .into_tuple::<i32>()
            .all(conn)
            .await?;
        Ok(ids)
    }

    async fn list_user_ids<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        business_id: i32,
    ) -> Result<Vec<i32>, DomainError> {
        let ids = UserBusinessEntity::find()
            .select_only()
            .column(Column::UserId)
            .filter(Column::BusinessId.eq(business_id))
            .order_by_asc(Column::UserId)
            .into_tuple::<i32>()
            .all(conn)
            .await?;
        Ok(ids)
    }
}
