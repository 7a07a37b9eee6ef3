//! `SusuClientV1` trait.
//!
//! Every call takes the caller's `SecurityContext`; the actor it carries is what
//! gets recorded in `created_by` / `updated_by`.

use async_trait::async_trait;
use chrono::NaiveDate;
use susu_security::SecurityContext;

use crate::errors::SusuError;
use crate::models::{
    MarkPayment, Marking, NotificationMethod, SavingsAccount, User, UserSettings,
};

#[async_trait]
pub trait SusuClientV1: Send + Sync {
    async fn get_user(&self, ctx: &SecurityContext, id: i32) -> Result<User, SusuError>;

    /// Stored settings, or the default (`both`) when none are stored.
    async fn get_settings(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
    ) -> Result<UserSettings, SusuError>;

    async fn update_notification_method(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
        method: NotificationMethod,
    ) -> Result<UserSettings, SusuError>;

    async fn is_linked(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
        business_id: i32,
    ) -> Result<bool, SusuError>;

    /// Link a user to a business; linking twice is not an error.
    async fn link(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
        business_id: i32,
    ) -> Result<(), SusuError>;

    /// Remove one link, or all links of the user when `business_id` is `None`.
    ///
    /// Returns the number of links removed.
    async fn unlink(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
        business_id: Option<i32>,
    ) -> Result<u64, SusuError>;

    async fn list_business_ids(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
    ) -> Result<Vec<i32>, SusuError>;

    async fn get_savings_account(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<SavingsAccount, SusuError>;

    async fn mark_payment(
        &self,
        ctx: &SecurityContext,
        account_id: i32,
        date: NaiveDate,
        payment: MarkPayment,
    ) -> Result<Marking, SusuError>;
}
