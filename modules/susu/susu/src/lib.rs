//! Susu module implementation
//!
//! The public contract lives in `susu-sdk` and is re-exported here.

pub use susu_sdk::{
    AccountStatus, Business, Commission, DetachReport, MarkPayment, Marking, NewBusiness,
    NewSavingsAccount, NewTargetSavings, NewUnit, NewUser, NotificationMethod, PaymentMethod,
    Role, SavingsAccount, SavingsType, SusuClientV1, SusuError, Unit, User, UserPatch,
    UserSettings,
};

pub mod module;
pub use module::SusuModule;

pub mod local_client;

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
