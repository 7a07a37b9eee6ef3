//! Conversions between sea-orm models and SDK types.
//!
//! Enum columns are stored as text; a value that does not parse is reported as
//! a `DbErr::Type`, the same error sea-orm raises for undecodable columns.

use std::str::FromStr;

use sea_orm::DbErr;
use susu_audit::{ActorId, AuditFields, Timestamp};
use susu_sdk::{
    Business, Commission, Marking, NotificationMethod, PaymentMethod, SavingsAccount, Unit, User,
    UserSettings,
};

use super::entity::{business, commission, savings_account, savings_marking, unit, user, user_settings};

fn audit(
    created_by: Option<ActorId>,
    created_at: Timestamp,
    updated_by: Option<ActorId>,
    updated_at: Option<Timestamp>,
) -> AuditFields {
    AuditFields {
        created_by,
        created_at,
        updated_by,
        updated_at,
    }
}

fn parse_column<T: FromStr>(column: &str, value: &str) -> Result<T, DbErr> {
    value
        .parse()
        .map_err(|_| DbErr::Type(format!("{column}: unexpected value '{value}'")))
}

impl TryFrom<user::Model> for User {
    type Error = DbErr;

    fn try_from(m: user::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            role: parse_column("users.role", &m.role)?,
            full_name: m.full_name,
            phone_number: m.phone_number,
            email: m.email,
            username: m.username,
            is_active: m.is_active,
            active_business_id: m.active_business_id,
            audit: audit(m.created_by, m.created_at, m.updated_by, m.updated_at),
        })
    }
}

impl From<business::Model> for Business {
    fn from(m: business::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            agent_id: m.agent_id,
            address: m.address,
            unique_code: m.unique_code,
            is_default: m.is_default,
            audit: audit(m.created_by, m.created_at, m.updated_by, m.updated_at),
        }
    }
}

impl From<unit::Model> for Unit {
    fn from(m: unit::Model) -> Self {
        Self {
            id: m.id,
            business_id: m.business_id,
            name: m.name,
            location: m.location,
            audit: audit(m.created_by, m.created_at, m.updated_by, m.updated_at),
        }
    }
}

impl TryFrom<user_settings::Model> for UserSettings {
    type Error = DbErr;

    fn try_from(m: user_settings::Model) -> Result<Self, Self::Error> {
        let notification_method: NotificationMethod =
            parse_column("user_settings.notification_method", &m.notification_method)?;
        Ok(Self {
            user_id: m.user_id,
            notification_method,
            audit: Some(audit(m.created_by, m.created_at, m.updated_by, m.updated_at)),
        })
    }
}

impl TryFrom<savings_account::Model> for SavingsAccount {
    type Error = DbErr;

    fn try_from(m: savings_account::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: m.id,
            savings_type: parse_column("savings_accounts.savings_type", &m.savings_type)?,
            status: parse_column("savings_accounts.status", &m.status)?,
            customer_id: m.customer_id,
            business_id: m.business_id,
            unit_id: m.unit_id,
            tracking_number: m.tracking_number,
            daily_amount: m.daily_amount,
            duration_months: m.duration_months,
            start_date: m.start_date,
            end_date: m.end_date,
            target_amount: m.target_amount,
            commission_days: m.commission_days,
            commission_amount: m.commission_amount,
            audit: audit(m.created_by, m.created_at, m.updated_by, m.updated_at),
        })
    }
}

impl TryFrom<savings_marking::Model> for Marking {
    type Error = DbErr;

    fn try_from(m: savings_marking::Model) -> Result<Self, Self::Error> {
        let payment_method = m
            .payment_method
            .as_deref()
            .map(|v| parse_column::<PaymentMethod>("savings_markings.payment_method", v))
            .transpose()?;
        Ok(Self {
            id: m.id,
            savings_account_id: m.savings_account_id,
            unit_id: m.unit_id,
            marked_date: m.marked_date,
            amount: m.amount,
            status: m.status,
            payment_method,
            payment_reference: m.payment_reference,
            marked_by_id: m.marked_by_id,
            audit: audit(m.created_by, m.created_at, m.updated_by, m.updated_at),
        })
    }
}

impl From<commission::Model> for Commission {
    fn from(m: commission::Model) -> Self {
        Self {
            id: m.id,
            savings_account_id: m.savings_account_id,
            agent_id: m.agent_id,
            amount: m.amount,
            commission_date: m.commission_date,
            audit: audit(m.created_by, m.created_at, m.updated_by, m.updated_at),
        }
    }
}
