//! Transport-agnostic models shared between the susu module and its consumers.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use susu_audit::AuditFields;

use crate::errors::SusuError;

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &[$name] = &[$($name::$variant),+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = SusuError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(SusuError::validation(
                        $field,
                        format!("unknown value '{other}'"),
                    )),
                }
            }
        }
    };
}

string_enum!(
    /// Role of a user within the platform.
    Role, "role" {
        SuperAdmin => "super_admin",
        Admin => "admin",
        Agent => "agent",
        SubAgent => "sub_agent",
        Customer => "customer",
    }
);

string_enum!(
    /// Channel used to reach a user.
    NotificationMethod, "notification_method" {
        Whatsapp => "whatsapp",
        Email => "email",
        Sms => "sms",
        Both => "both",
    }
);

string_enum!(
    SavingsType, "savings_type" {
        Daily => "daily",
        Target => "target",
    }
);

string_enum!(
    /// Progress of a savings account through its schedule.
    AccountStatus, "status" {
        NotStarted => "not_started",
        InProgress => "in_progress",
        Completed => "completed",
    }
);

string_enum!(
    PaymentMethod, "payment_method" {
        Cash => "cash",
        Card => "card",
        BankTransfer => "bank_transfer",
        MobileMoney => "mobile_money",
    }
);

impl Default for NotificationMethod {
    fn default() -> Self {
        Self::Both
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub username: String,
    pub role: Role,
    pub is_active: bool,
    pub active_business_id: Option<i32>,
    pub audit: AuditFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub full_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub username: String,
    pub role: Role,
}

/// Partial update of a user; `None` leaves the field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Business {
    pub id: i32,
    pub name: String,
    pub agent_id: i32,
    pub address: Option<String>,
    pub unique_code: String,
    pub is_default: bool,
    pub audit: AuditFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBusiness {
    pub name: String,
    pub agent_id: i32,
    pub address: Option<String>,
    /// Generated when absent.
    pub unique_code: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: i32,
    pub business_id: i32,
    pub name: String,
    pub location: Option<String>,
    pub audit: AuditFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUnit {
    pub name: String,
    pub location: Option<String>,
}

/// Notification preferences of a user.
///
/// `audit` is `None` for the synthesized default returned when nothing is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSettings {
    pub user_id: i32,
    pub notification_method: NotificationMethod,
    pub audit: Option<AuditFields>,
}

impl UserSettings {
    #[must_use]
    pub fn default_for(user_id: i32) -> Self {
        Self {
            user_id,
            notification_method: NotificationMethod::default(),
            audit: None,
        }
    }

    #[must_use]
    pub fn is_stored(&self) -> bool {
        self.audit.is_some()
    }
}

/// Amounts are in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavingsAccount {
    pub id: i32,
    pub customer_id: i32,
    pub business_id: i32,
    pub unit_id: Option<i32>,
    pub tracking_number: String,
    pub savings_type: SavingsType,
    pub daily_amount: i64,
    pub duration_months: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Amount saved once every marking is paid. `None` on accounts opened
    /// before targets were recorded.
    pub target_amount: Option<i64>,
    pub commission_days: i32,
    pub commission_amount: i64,
    pub status: AccountStatus,
    pub audit: AuditFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSavingsAccount {
    pub customer_id: i32,
    pub business_id: i32,
    pub unit_id: Option<i32>,
    pub daily_amount: i64,
    pub duration_months: i32,
    pub start_date: NaiveDate,
    /// Defaults to 30.
    pub commission_days: Option<i32>,
    /// Defaults to the daily amount.
    pub commission_amount: Option<i64>,
}

/// Savings toward a fixed amount between two dates.
///
/// The daily amount is the target spread evenly over the days, rounded to the
/// nearest minor unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTargetSavings {
    pub customer_id: i32,
    pub business_id: i32,
    pub unit_id: Option<i32>,
    pub target_amount: i64,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    /// Defaults to 30.
    pub commission_days: Option<i32>,
    /// Defaults to the daily amount.
    pub commission_amount: Option<i64>,
}

/// One scheduled contribution day of a savings account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marking {
    pub id: i32,
    pub savings_account_id: i32,
    pub unit_id: Option<i32>,
    pub marked_date: NaiveDate,
    pub amount: i64,
    /// Member of the configured marking status domain.
    pub status: String,
    pub payment_method: Option<PaymentMethod>,
    pub payment_reference: Option<String>,
    pub marked_by_id: Option<i32>,
    pub audit: AuditFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkPayment {
    pub payment_method: PaymentMethod,
    pub payment_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commission {
    pub id: i32,
    pub savings_account_id: i32,
    pub agent_id: i32,
    pub amount: i64,
    pub commission_date: NaiveDate,
    pub audit: AuditFields,
}

/// Result of detaching super admins from every business.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetachReport {
    pub users: Vec<i32>,
    pub links_removed: u64,
}
