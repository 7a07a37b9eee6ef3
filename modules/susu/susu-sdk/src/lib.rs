//! Susu SDK
//!
//! Public contract of the susu module:
//! - `SusuClientV1` trait, implemented in-process by the module's local client
//! - model types for users, businesses, settings, savings and commissions
//! - error type (`SusuError`)

pub mod client;
pub mod errors;
pub mod models;

pub use client::SusuClientV1;
pub use errors::SusuError;
pub use models::{
    AccountStatus, Business, Commission, DetachReport, Marking, MarkPayment, NewBusiness,
    NewSavingsAccount, NewTargetSavings, NewUnit, NewUser, NotificationMethod, PaymentMethod, Role,
    SavingsAccount, SavingsType, Unit, User, UserPatch, UserSettings,
};
