use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "businesses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub agent_id: i32,
    pub address: Option<String>,
    #[sea_orm(unique)]
    pub unique_code: String,
    pub is_default: bool,
    pub created_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_by: Option<i32>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AgentId",
        to = "super::user::Column::Id"
    )]
    Agent,
    #[sea_orm(has_many = "super::unit::Entity")]
    Units,
    #[sea_orm(has_many = "super::user_business::Entity")]
    Memberships,
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Units.def()
    }
}

impl Related<super::user_business::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

susu_audit::impl_audited!(ActiveModel);
