//! Domain services.
//!
//! Each service owns the database connection and the repositories it needs.
//! Writes run inside one transaction per call: everything goes through the
//! transaction handle, and any early return drops it, which rolls back.
//! The acting user comes from the caller's `SecurityContext` and is copied
//! into `created_by` / `updated_by`; timestamps are left to the save hook.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use susu_db::DbConnTrait;
use susu_sdk::{Business, SavingsAccount, User};

use crate::config::SusuConfig;
use crate::domain::error::DomainError;
use crate::domain::repos::{
    BusinessesRepository, MembershipsRepository, SavingsRepository, SettingsRepository,
    UsersRepository,
};

mod businesses;
mod memberships;
mod savings;
pub mod schedule;
mod settings;
mod users;

pub use businesses::BusinessesService;
pub use memberships::MembershipService;
pub use savings::SavingsService;
pub use settings::SettingsService;
pub use users::UsersService;

#[cfg(test)]
mod service_test;

/// DI container of all domain services.
pub struct AppServices<UR, BR, MR, SR, VR>
where
    UR: UsersRepository + 'static,
    BR: BusinessesRepository + 'static,
    MR: MembershipsRepository + 'static,
    SR: SettingsRepository + 'static,
    VR: SavingsRepository + 'static,
{
    pub users: Arc<UsersService<UR, SR>>,
    pub businesses: Arc<BusinessesService<BR, MR, UR>>,
    pub memberships: Arc<MembershipService<MR, UR, BR>>,
    pub settings: Arc<SettingsService<SR, UR>>,
    pub savings: Arc<SavingsService<VR, UR, BR, MR>>,
}

impl<UR, BR, MR, SR, VR> AppServices<UR, BR, MR, SR, VR>
where
    UR: UsersRepository + 'static,
    BR: BusinessesRepository + 'static,
    MR: MembershipsRepository + 'static,
    SR: SettingsRepository + 'static,
    VR: SavingsRepository + 'static,
{
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        repos: (UR, BR, MR, SR, VR),
        config: SusuConfig,
    ) -> Self {
        let (users_repo, businesses_repo, memberships_repo, settings_repo, savings_repo) = repos;
        let config = Arc::new(config);
        let users_repo = Arc::new(users_repo);
        let businesses_repo = Arc::new(businesses_repo);
        let memberships_repo = Arc::new(memberships_repo);
        let settings_repo = Arc::new(settings_repo);

        Self {
            users: Arc::new(UsersService::new(
                db.clone(),
                Arc::clone(&users_repo),
                Arc::clone(&settings_repo),
                Arc::clone(&config),
            )),
            businesses: Arc::new(BusinessesService::new(
                db.clone(),
                Arc::clone(&businesses_repo),
                Arc::clone(&memberships_repo),
                Arc::clone(&users_repo),
                Arc::clone(&config),
            )),
            memberships: Arc::new(MembershipService::new(
                db.clone(),
                Arc::clone(&memberships_repo),
                Arc::clone(&users_repo),
                Arc::clone(&businesses_repo),
            )),
            settings: Arc::new(SettingsService::new(
                db.clone(),
                settings_repo,
                Arc::clone(&users_repo),
            )),
            savings: Arc::new(SavingsService::new(
                db,
                Arc::new(savings_repo),
                users_repo,
                businesses_repo,
                memberships_repo,
                config,
            )),
        }
    }
}

impl<UR, BR, MR, SR, VR> Clone for AppServices<UR, BR, MR, SR, VR>
where
    UR: UsersRepository + 'static,
    BR: BusinessesRepository + 'static,
    MR: MembershipsRepository + 'static,
    SR: SettingsRepository + 'static,
    VR: SavingsRepository + 'static,
{
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            businesses: Arc::clone(&self.businesses),
            memberships: Arc::clone(&self.memberships),
            settings: Arc::clone(&self.settings),
            savings: Arc::clone(&self.savings),
        }
    }
}

/// Widths of the bounded text columns. Text fields are checked against the
/// smaller of their column width and `max_field_length`.
mod width {
    pub const NAME: usize = 255;
    pub const EMAIL: usize = 255;
    pub const ADDRESS: usize = 255;
    pub const USERNAME: usize = 100;
    pub const PHONE_NUMBER: usize = 20;
    pub const BUSINESS_CODE: usize = 20;
}

/// Non-empty after trimming and at most `max` characters.
fn validate_text(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    if value.chars().count() > max {
        return Err(DomainError::validation(
            field,
            format!("exceeds maximum length of {max}"),
        ));
    }
    Ok(())
}

async fn require_user<U, C>(repo: &U, conn: &C, id: i32) -> Result<User, DomainError>
where
    U: UsersRepository,
    C: DbConnTrait + Send + Sync,
{
    repo.get(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", id))
}

async fn require_business<B, C>(repo: &B, conn: &C, id: i32) -> Result<Business, DomainError>
where
    B: BusinessesRepository,
    C: DbConnTrait + Send + Sync,
{
    repo.get(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found("Business", id))
}

async fn require_account<V, C>(repo: &V, conn: &C, id: i32) -> Result<SavingsAccount, DomainError>
where
    V: SavingsRepository,
    C: DbConnTrait + Send + Sync,
{
    repo.get_account(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found("SavingsAccount", id))
}
