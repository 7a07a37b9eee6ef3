use std::sync::Arc;

use axum::routing::{get, patch, post, put};
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::AppServices;
use crate::infra::storage::{
    OrmBusinessesRepository, OrmMembershipsRepository, OrmSavingsRepository,
    OrmSettingsRepository, OrmUsersRepository,
};

/// Services wired to the sea-orm repositories.
pub type ConcreteAppServices = AppServices<
    OrmUsersRepository,
    OrmBusinessesRepository,
    OrmMembershipsRepository,
    OrmSettingsRepository,
    OrmSavingsRepository,
>;

pub const BASE_PATH: &str = "/susu/v1";

/// All `/susu/v1` routes with the services attached as an extension.
pub fn register_routes(router: Router, services: Arc<ConcreteAppServices>) -> Router {
    let api = Router::new()
        .route("/users", post(handlers::create_user).get(handlers::list_users))
        .route("/users/{id}", get(handlers::get_user).patch(handlers::patch_user))
        .route(
            "/users/{id}/settings",
            get(handlers::get_settings)
                .put(handlers::update_settings)
                .delete(handlers::delete_settings),
        )
        .route(
            "/users/{id}/businesses",
            get(handlers::list_user_businesses).delete(handlers::unlink_all_businesses),
        )
        .route("/users/{id}/active-business", put(handlers::switch_active_business))
        .route("/businesses", post(handlers::create_business))
        .route("/businesses/{id}", get(handlers::get_business))
        .route(
            "/businesses/{id}/units",
            post(handlers::create_unit).get(handlers::list_units),
        )
        .route("/businesses/{id}/members", get(handlers::list_members))
        .route(
            "/businesses/{id}/members/{user_id}",
            put(handlers::add_member).delete(handlers::remove_member),
        )
        .route("/savings", post(handlers::create_savings_account))
        .route("/savings/target", post(handlers::create_target_savings))
        .route("/savings/{id}", get(handlers::get_savings_account))
        .route("/savings/{id}/end", post(handlers::end_savings_account))
        .route("/savings/{id}/markings", get(handlers::list_markings))
        .route("/savings/{id}/markings/{date}/pay", post(handlers::pay_marking))
        .route("/savings/{id}/commissions", get(handlers::list_commissions))
        .route(
            "/markings/{id}/status",
            patch(handlers::update_marking_status),
        )
        .layer(Extension(services));

    router.nest(BASE_PATH, api)
}
