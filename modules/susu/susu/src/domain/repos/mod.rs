mod businesses_repo;
mod memberships_repo;
mod savings_repo;
mod settings_repo;
mod users_repo;

pub use businesses_repo::BusinessesRepository;
pub use memberships_repo::MembershipsRepository;
pub use savings_repo::{AccountDraft, SavingsRepository};
pub use settings_repo::SettingsRepository;
pub use users_repo::UsersRepository;
