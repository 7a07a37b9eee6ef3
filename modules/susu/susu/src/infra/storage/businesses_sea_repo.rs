use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use susu_audit::ActorId;
use susu_db::DbConnTrait;
use susu_sdk::{Business, NewBusiness, NewUnit, Unit};

use crate::domain::error::DomainError;
use crate::domain::repos::BusinessesRepository;

use super::entity::business::{self, Entity as BusinessEntity};
use super::entity::unit::{self, Entity as UnitEntity};

#[derive(Clone, Default)]
pub struct OrmBusinessesRepository;

#[async_trait]
impl BusinessesRepository for OrmBusinessesRepository {
    async fn get<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<Business>, DomainError> {
        let found = BusinessEntity::find_by_id(id).one(conn).await?;
        Ok(found.map(Into::into))
    }

    async fn code_exists<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        code: &str,
    ) -> Result<bool, DomainError> {
        let count = BusinessEntity::find()
            .filter(business::Column::UniqueCode.eq(code))
            .count(conn)
            .await?;
        Ok(count > 0)
    }

    async fn create<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        business: NewBusiness,
        unique_code: String,
        actor: Option<ActorId>,
    ) -> Result<Business, DomainError> {
        let m = business::ActiveModel {
            name: Set(business.name),
            agent_id: Set(business.agent_id),
            address: Set(business.address),
            unique_code: Set(unique_code),
            is_default: Set(business.is_default),
            created_by: Set(actor),
            ..Default::default()
        };
        Ok(m.insert(conn).await?.into())
    }

    async fn create_unit<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        business_id: i32,
        unit: NewUnit,
        actor: Option<ActorId>,
    ) -> Result<Unit, DomainError> {
        let m = unit::ActiveModel {
            business_id: Set(business_id),
            name: Set(unit.name),
            location: Set(unit.location),
            created_by: Set(actor),
            ..Default::default()
        };
        Ok(m.insert(conn).await?.into())
    }

    async fn get_unit<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i32,
    ) -> Result<Option<Unit>, DomainError> {
        let found = UnitEntity::find_by_id(id).one(conn).await?;
        Ok(found.map(Into::into))
    }

    async fn list_units<C: DbConnTrait + Send + Sync>(
        &self,
        conn: &C,
        business_id: i32,
    ) -> Result<Vec<Unit>, DomainError> {
        let units = UnitEntity::find()
            .filter(unit::Column::BusinessId.eq(business_id))
            .order_by_asc(unit::Column::Id)
            .all(conn)
            .await?;
        Ok(units.into_iter().map(Into::into).collect())
    }
}
