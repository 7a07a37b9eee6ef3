use utoipa::OpenApi;

use super::{dto, handlers};

/// OpenAPI document of the `/susu/v1` surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Susu API",
        description = "Savings collection: users, businesses, memberships, settings, savings and commissions."
    ),
    tags(
        (name = "users", description = "User accounts"),
        (name = "settings", description = "Per-user notification preferences"),
        (name = "memberships", description = "User to business links and the active business"),
        (name = "businesses", description = "Businesses and their units"),
        (name = "savings", description = "Savings accounts, daily markings and commissions")
    ),
    paths(
        handlers::create_user,
        handlers::list_users,
        handlers::get_user,
        handlers::patch_user,
        handlers::get_settings,
        handlers::update_settings,
        handlers::delete_settings,
        handlers::list_user_businesses,
        handlers::unlink_all_businesses,
        handlers::switch_active_business,
        handlers::add_member,
        handlers::remove_member,
        handlers::list_members,
        handlers::create_business,
        handlers::get_business,
        handlers::create_unit,
        handlers::list_units,
        handlers::create_savings_account,
        handlers::create_target_savings,
        handlers::get_savings_account,
        handlers::end_savings_account,
        handlers::list_markings,
        handlers::pay_marking,
        handlers::list_commissions,
        handlers::update_marking_status,
    ),
    components(schemas(
        susu_errors::Problem,
        susu_errors::Violation,
        dto::AuditDto,
        dto::UserDto,
        dto::SettingsDto,
        dto::BusinessDto,
        dto::UnitDto,
        dto::SavingsAccountDto,
        dto::MarkingDto,
        dto::CommissionDto,
    ))
)]
pub struct SusuApiDoc;
