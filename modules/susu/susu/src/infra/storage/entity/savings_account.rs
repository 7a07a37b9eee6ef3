use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "savings_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: i32,
    pub business_id: i32,
    pub unit_id: Option<i32>,
    #[sea_orm(unique)]
    pub tracking_number: String,
    pub savings_type: String,
    pub daily_amount: i64,
    pub duration_months: i32,
    pub start_date: Date,
    pub end_date: Date,
    pub target_amount: Option<i64>,
    pub commission_days: i32,
    pub commission_amount: i64,
    pub status: String,
    pub created_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_by: Option<i32>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::savings_marking::Entity")]
    Markings,
    #[sea_orm(has_many = "super::commission::Entity")]
    Commissions,
}

impl Related<super::savings_marking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Markings.def()
    }
}

impl Related<super::commission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commissions.def()
    }
}

susu_audit::impl_audited!(ActiveModel);
