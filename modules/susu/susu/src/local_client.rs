use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use susu_sdk::{
    MarkPayment, Marking, NotificationMethod, SavingsAccount, SusuClientV1, SusuError, User,
    UserSettings,
};
use susu_security::SecurityContext;

use crate::api::rest::routes::ConcreteAppServices;

/// In-process implementation of [`SusuClientV1`] over the domain services.
pub struct SusuLocalClient {
    services: Arc<ConcreteAppServices>,
}

impl SusuLocalClient {
    #[must_use]
    pub fn new(services: Arc<ConcreteAppServices>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl SusuClientV1 for SusuLocalClient {
    async fn get_user(&self, ctx: &SecurityContext, id: i32) -> Result<User, SusuError> {
        self.services.users.get_user(ctx, id).await.map_err(Into::into)
    }

    async fn get_settings(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
    ) -> Result<UserSettings, SusuError> {
        self.services
            .settings
            .get_settings(ctx, user_id)
            .await
            .map_err(Into::into)
    }

    async fn update_notification_method(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
        method: NotificationMethod,
    ) -> Result<UserSettings, SusuError> {
        self.services
            .settings
            .update_notification_method(ctx, user_id, method)
            .await
            .map_err(Into::into)
    }

    async fn is_linked(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
        business_id: i32,
    ) -> Result<bool, SusuError> {
        self.services
            .memberships
            .is_linked(ctx, user_id, business_id)
            .await
            .map_err(Into::into)
    }

    async fn link(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
        business_id: i32,
    ) -> Result<(), SusuError> {
        self.services
            .memberships
            .link(ctx, user_id, business_id)
            .await
            .map_err(Into::into)
    }

    async fn unlink(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
        business_id: Option<i32>,
    ) -> Result<u64, SusuError> {
        self.services
            .memberships
            .unlink(ctx, user_id, business_id)
            .await
            .map_err(Into::into)
    }

    async fn list_business_ids(
        &self,
        ctx: &SecurityContext,
        user_id: i32,
    ) -> Result<Vec<i32>, SusuError> {
        self.services
            .memberships
            .list_business_ids(ctx, user_id)
            .await
            .map_err(Into::into)
    }

    async fn get_savings_account(
        &self,
        ctx: &SecurityContext,
        id: i32,
    ) -> Result<SavingsAccount, SusuError> {
        self.services
            .savings
            .get_savings_account(ctx, id)
            .await
            .map_err(Into::into)
    }

    async fn mark_payment(
        &self,
        ctx: &SecurityContext,
        account_id: i32,
        date: NaiveDate,
        payment: MarkPayment,
    ) -> Result<Marking, SusuError> {
        self.services
            .savings
            .mark_payment(ctx, account_id, date, payment)
            .await
            .map_err(Into::into)
    }
}
