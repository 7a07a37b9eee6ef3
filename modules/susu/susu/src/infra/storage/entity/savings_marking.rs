use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "savings_markings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub savings_account_id: i32,
    pub unit_id: Option<i32>,
    pub marked_date: Date,
    pub amount: i64,
    pub status: String,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub marked_by_id: Option<i32>,
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
