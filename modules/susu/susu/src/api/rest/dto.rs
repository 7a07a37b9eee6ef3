use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use susu_audit::AuditFields;
use susu_sdk::{
    Business, Commission, MarkPayment, Marking, NewBusiness, NewSavingsAccount, NewTargetSavings,
    NewUnit, NewUser, Role, SavingsAccount, Unit, User, UserPatch, UserSettings,
};
use utoipa::ToSchema;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditDto {
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<AuditFields> for AuditDto {
    fn from(a: AuditFields) -> Self {
        Self {
            created_by: a.created_by,
            created_at: a.created_at,
            updated_by: a.updated_by,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub full_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub username: String,
    pub role: String,
    pub is_active: bool,
    pub active_business_id: Option<i32>,
    pub audit: AuditDto,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            full_name: u.full_name,
            phone_number: u.phone_number,
            email: u.email,
            username: u.username,
            role: u.role.to_string(),
            is_active: u.is_active,
            active_business_id: u.active_business_id,
            audit: u.audit.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub full_name: String,
    pub phone_number: String,
    #[serde(default)]
    pub email: Option<String>,
    pub username: String,
    /// Defaults to `customer`.
    #[serde(default)]
    pub role: Option<String>,
}

impl TryFrom<CreateUserRequest> for NewUser {
    type Error = DomainError;

    fn try_from(req: CreateUserRequest) -> Result<Self, Self::Error> {
        let role = match req.role.as_deref() {
            Some(role) => role.parse()?,
            None => Role::Customer,
        };
        Ok(Self {
            full_name: req.full_name,
            phone_number: req.phone_number,
            email: req.email,
            username: req.username,
            role,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchUserRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<PatchUserRequest> for UserPatch {
    fn from(req: PatchUserRequest) -> Self {
        Self {
            full_name: req.full_name,
            email: req.email,
            is_active: req.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDto {
    pub user_id: i32,
    pub notification_method: String,
    /// `false` when these are the defaults and nothing is stored yet.
    pub stored: bool,
    pub audit: Option<AuditDto>,
}

impl From<UserSettings> for SettingsDto {
    fn from(s: UserSettings) -> Self {
        Self {
            user_id: s.user_id,
            notification_method: s.notification_method.to_string(),
            stored: s.is_stored(),
            audit: s.audit.map(Into::into),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub notification_method: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessIdsDto {
    pub business_ids: Vec<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnlinkResultDto {
    pub removed: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwitchActiveBusinessRequest {
    pub business_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDto {
    pub id: i32,
    pub name: String,
    pub agent_id: i32,
    pub address: Option<String>,
    pub unique_code: String,
    pub is_default: bool,
    pub audit: AuditDto,
}

impl From<Business> for BusinessDto {
    fn from(b: Business) -> Self {
        Self {
            id: b.id,
            name: b.name,
            agent_id: b.agent_id,
            address: b.address,
            unique_code: b.unique_code,
            is_default: b.is_default,
            audit: b.audit.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessRequest {
    pub name: String,
    pub agent_id: i32,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub unique_code: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl From<CreateBusinessRequest> for NewBusiness {
    fn from(req: CreateBusinessRequest) -> Self {
        Self {
            name: req.name,
            agent_id: req.agent_id,
            address: req.address,
            unique_code: req.unique_code,
            is_default: req.is_default,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitDto {
    pub id: i32,
    pub business_id: i32,
    pub name: String,
    pub location: Option<String>,
    pub audit: AuditDto,
}

impl From<Unit> for UnitDto {
    fn from(u: Unit) -> Self {
        Self {
            id: u.id,
            business_id: u.business_id,
            name: u.name,
            location: u.location,
            audit: u.audit.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitRequest {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl From<CreateUnitRequest> for NewUnit {
    fn from(req: CreateUnitRequest) -> Self {
        Self {
            name: req.name,
            location: req.location,
        }
    }
}

/// Amounts are minor currency units.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavingsAccountDto {
    pub id: i32,
    pub customer_id: i32,
    pub business_id: i32,
    pub unit_id: Option<i32>,
    pub tracking_number: String,
    pub savings_type: String,
    pub daily_amount: i64,
    pub duration_months: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_amount: Option<i64>,
    pub commission_days: i32,
    pub commission_amount: i64,
    pub total_commission: i64,
    /// `not_started`, `in_progress` or `completed`.
    pub status: String,
    pub audit: AuditDto,
}

impl From<SavingsAccount> for SavingsAccountDto {
    fn from(a: SavingsAccount) -> Self {
        let total_commission = crate::domain::service::schedule::total_commission(&a);
        Self {
            id: a.id,
            customer_id: a.customer_id,
            business_id: a.business_id,
            unit_id: a.unit_id,
            tracking_number: a.tracking_number,
            savings_type: a.savings_type.to_string(),
            daily_amount: a.daily_amount,
            duration_months: a.duration_months,
            start_date: a.start_date,
            end_date: a.end_date,
            target_amount: a.target_amount,
            commission_days: a.commission_days,
            commission_amount: a.commission_amount,
            total_commission,
            status: a.status.to_string(),
            audit: a.audit.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSavingsRequest {
    pub customer_id: i32,
    pub business_id: i32,
    #[serde(default)]
    pub unit_id: Option<i32>,
    pub daily_amount: i64,
    pub duration_months: i32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub commission_days: Option<i32>,
    #[serde(default)]
    pub commission_amount: Option<i64>,
}

impl From<CreateSavingsRequest> for NewSavingsAccount {
    fn from(req: CreateSavingsRequest) -> Self {
        Self {
            customer_id: req.customer_id,
            business_id: req.business_id,
            unit_id: req.unit_id,
            daily_amount: req.daily_amount,
            duration_months: req.duration_months,
            start_date: req.start_date,
            commission_days: req.commission_days,
            commission_amount: req.commission_amount,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetSavingsRequest {
    pub customer_id: i32,
    pub business_id: i32,
    #[serde(default)]
    pub unit_id: Option<i32>,
    pub target_amount: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub commission_days: Option<i32>,
    #[serde(default)]
    pub commission_amount: Option<i64>,
}

impl From<CreateTargetSavingsRequest> for NewTargetSavings {
    fn from(req: CreateTargetSavingsRequest) -> Self {
        Self {
            customer_id: req.customer_id,
            business_id: req.business_id,
            unit_id: req.unit_id,
            target_amount: req.target_amount,
            start_date: req.start_date,
            end_date: req.end_date,
            commission_days: req.commission_days,
            commission_amount: req.commission_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkingDto {
    pub id: i32,
    pub savings_account_id: i32,
    pub unit_id: Option<i32>,
    pub marked_date: NaiveDate,
    pub amount: i64,
    pub status: String,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub marked_by_id: Option<i32>,
    pub audit: AuditDto,
}

impl From<Marking> for MarkingDto {
    fn from(m: Marking) -> Self {
        Self {
            id: m.id,
            savings_account_id: m.savings_account_id,
            unit_id: m.unit_id,
            marked_date: m.marked_date,
            amount: m.amount,
            status: m.status,
            payment_method: m.payment_method.map(|p| p.to_string()),
            payment_reference: m.payment_reference,
            marked_by_id: m.marked_by_id,
            audit: m.audit.into(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaymentRequest {
    pub payment_method: String,
    #[serde(default)]
    pub payment_reference: Option<String>,
}

impl TryFrom<MarkPaymentRequest> for MarkPayment {
    type Error = DomainError;

    fn try_from(req: MarkPaymentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            payment_method: req.payment_method.parse()?,
            payment_reference: req.payment_reference,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMarkingStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommissionDto {
    pub id: i32,
    pub savings_account_id: i32,
    pub agent_id: i32,
    pub amount: i64,
    pub commission_date: NaiveDate,
    pub audit: AuditDto,
}

impl From<Commission> for CommissionDto {
    fn from(c: Commission) -> Self {
        Self {
            id: c.id,
            savings_account_id: c.savings_account_id,
            agent_id: c.agent_id,
            amount: c.amount,
            commission_date: c.commission_date,
            audit: c.audit.into(),
        }
    }
}
