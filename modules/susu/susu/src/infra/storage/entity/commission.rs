use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "commissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub savings_account_id: i32,
    pub agent_id: i32,
    pub amount: i64,
    pub commission_date: Date,
    pub created_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_by: Option<i32>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::savings_account::Entity",
        from = "Column::SavingsAccountId",
        to = "super::savings_account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::savings_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

susu_audit::impl_audited!(ActiveModel);
