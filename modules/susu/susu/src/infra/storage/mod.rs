//! Persistence: sea-orm entities, model mapping, migrations, and the ORM
//! implementations of the domain repository traits.

pub mod entity;
pub mod mapper;
pub mod migrations;

mod businesses_sea_repo;
mod memberships_sea_repo;
mod savings_sea_repo;
mod settings_sea_repo;
mod users_sea_repo;

#[cfg(test)]
mod mapper_test;

pub use businesses_sea_repo::OrmBusinessesRepository;
pub use memberships_sea_repo::OrmMembershipsRepository;
pub use savings_sea_repo::OrmSavingsRepository;
pub use settings_sea_repo::OrmSettingsRepository;
pub use users_sea_repo::OrmUsersRepository;
