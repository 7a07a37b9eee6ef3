//! sea-orm entities.
//!
//! Every table except `user_business` carries the audit columns and gets its
//! timestamps from `susu_audit::impl_audited!`.

pub mod business;
pub mod commission;
pub mod savings_account;
pub mod savings_marking;
pub mod unit;
pub mod user;
pub mod user_business;
pub mod user_settings;
