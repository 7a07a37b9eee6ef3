use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use susu_db::{MigrationError, MigrationResult};
use susu_sdk::SusuClientV1;
use tracing::info;
use utoipa::OpenApi;

use crate::api::rest::openapi::SusuApiDoc;
use crate::api::rest::routes::{self, ConcreteAppServices};
use crate::config::{ConfigError, SusuConfig};
use crate::domain::service::AppServices;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{
    OrmBusinessesRepository, OrmMembershipsRepository, OrmSavingsRepository,
    OrmSettingsRepository, OrmUsersRepository,
};
use crate::local_client::SusuLocalClient;

/// The susu module: owns the wired services and exposes them over REST and
/// the in-process client.
#[derive(Clone)]
pub struct SusuModule {
    services: Arc<ConcreteAppServices>,
}

impl SusuModule {
    /// Module name; also keys the migration ledger table.
    pub const NAME: &'static str = "susu";

    /// Apply pending migrations.
    ///
    /// # Errors
    /// Returns [`MigrationError`] when the ledger is unusable or a migration fails.
    pub async fn migrate(db: &DatabaseConnection) -> Result<MigrationResult, MigrationError> {
        info!(module = Self::NAME, "running database migrations");
        susu_db::run_migrations(db, Self::NAME, Migrator::migrations()).await
    }

    /// Names of migrations that [`SusuModule::migrate`] would apply.
    ///
    /// # Errors
    /// Returns [`MigrationError`] when the ledger cannot be read.
    pub async fn pending_migrations(db: &DatabaseConnection) -> Result<Vec<String>, MigrationError> {
        susu_db::get_pending_migrations(db, Self::NAME, &Migrator::migrations()).await
    }

    /// Wire the services to the sea-orm repositories.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the module configuration is inconsistent.
    pub fn new(db: DatabaseConnection, config: SusuConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let services = AppServices::new(
            db,
            (
                OrmUsersRepository,
                OrmBusinessesRepository,
                OrmMembershipsRepository,
                OrmSettingsRepository,
                OrmSavingsRepository,
            ),
            config,
        );
        info!(module = Self::NAME, "module initialized");
        Ok(Self {
            services: Arc::new(services),
        })
    }

    #[must_use]
    pub fn services(&self) -> Arc<ConcreteAppServices> {
        Arc::clone(&self.services)
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn SusuClientV1> {
        Arc::new(SusuLocalClient::new(self.services()))
    }

    /// Mount the `/susu/v1` routes onto `router`.
    #[must_use]
    pub fn register_rest(&self, router: Router) -> Router {
        routes::register_routes(router, self.services())
    }

    #[must_use]
    pub fn openapi() -> utoipa::openapi::OpenApi {
        SusuApiDoc::openapi()
    }
}
