//! HTTP handlers for `/susu/v1`.
//!
//! Handlers only translate between DTOs and service calls; every rule lives in
//! the domain services.

use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use susu_errors::Problem;
use susu_sdk::{MarkPayment, NewUser, NotificationMethod};

use crate::domain::error::DomainError;

use super::dto::{
    BusinessDto, BusinessIdsDto, CommissionDto, CreateBusinessRequest, CreateSavingsRequest,
    CreateTargetSavingsRequest, CreateUnitRequest, CreateUserRequest, MarkPaymentRequest, MarkingDto, PatchUserRequest,
    SavingsAccountDto, SettingsDto, SwitchActiveBusinessRequest, UnitDto, UnlinkResultDto,
    UpdateMarkingStatusRequest, UpdateSettingsRequest, UserDto,
};
use super::error::ApiResult;
use super::extract::Actor;
use super::routes::ConcreteAppServices;

type Services = Extension<Arc<ConcreteAppServices>>;

// --- users ---

#[utoipa::path(
    post,
    path = "/susu/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 409, description = "Username or phone number taken", body = Problem),
        (status = 422, description = "Invalid field", body = Problem)
    ),
    tag = "users"
)]
pub async fn create_user(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserDto>)> {
    let new_user = NewUser::try_from(req)?;
    let user = svc.users.create_user(&ctx, new_user).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    get,
    path = "/susu/v1/users",
    responses((status = 200, description = "All users", body = [UserDto])),
    tag = "users"
)]
pub async fn list_users(Actor(ctx): Actor, Extension(svc): Services) -> ApiResult<Json<Vec<UserDto>>> {
    let users = svc.users.list_users(&ctx).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/susu/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "No such user", body = Problem)
    ),
    tag = "users"
)]
pub async fn get_user(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
) -> ApiResult<Json<UserDto>> {
    let user = svc.users.get_user(&ctx, id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    patch,
    path = "/susu/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = PatchUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 404, description = "No such user", body = Problem),
        (status = 422, description = "Invalid field", body = Problem)
    ),
    tag = "users"
)]
pub async fn patch_user(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
    Json(req): Json<PatchUserRequest>,
) -> ApiResult<Json<UserDto>> {
    let user = svc.users.update_user(&ctx, id, req.into()).await?;
    Ok(Json(user.into()))
}

// --- settings ---

#[utoipa::path(
    get,
    path = "/susu/v1/users/{id}/settings",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Stored settings, or the defaults", body = SettingsDto),
        (status = 404, description = "No such user", body = Problem)
    ),
    tag = "settings"
)]
pub async fn get_settings(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
) -> ApiResult<Json<SettingsDto>> {
    let settings = svc.settings.get_settings(&ctx, id).await?;
    Ok(Json(settings.into()))
}

#[utoipa::path(
    put,
    path = "/susu/v1/users/{id}/settings",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings stored", body = SettingsDto),
        (status = 404, description = "No such user", body = Problem),
        (status = 422, description = "Unknown notification method", body = Problem)
    ),
    tag = "settings"
)]
pub async fn update_settings(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
    Json(req): Json<UpdateSettingsRequest>,
) -> ApiResult<Json<SettingsDto>> {
    let method = req
        .notification_method
        .parse::<NotificationMethod>()
        .map_err(DomainError::from)?;
    let settings = svc.settings.update_notification_method(&ctx, id, method).await?;
    Ok(Json(settings.into()))
}

#[utoipa::path(
    delete,
    path = "/susu/v1/users/{id}/settings",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "Settings removed"),
        (status = 404, description = "Nothing stored for the user", body = Problem)
    ),
    tag = "settings"
)]
pub async fn delete_settings(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    if svc.settings.delete_settings(&ctx, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(DomainError::not_found("UserSettings", id).into())
    }
}

// --- memberships ---

#[utoipa::path(
    get,
    path = "/susu/v1/users/{id}/businesses",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Linked business ids, ascending", body = BusinessIdsDto),
        (status = 404, description = "No such user", body = Problem)
    ),
    tag = "memberships"
)]
pub async fn list_user_businesses(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
) -> ApiResult<Json<BusinessIdsDto>> {
    let business_ids = svc.memberships.list_business_ids(&ctx, id).await?;
    Ok(Json(BusinessIdsDto { business_ids }))
}

#[utoipa::path(
    delete,
    path = "/susu/v1/users/{id}/businesses",
    params(("id" = i32, Path, description = "User id")),
    responses((status = 200, description = "All links of the user removed", body = UnlinkResultDto)),
    tag = "memberships"
)]
pub async fn unlink_all_businesses(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
) -> ApiResult<Json<UnlinkResultDto>> {
    let removed = svc.memberships.unlink(&ctx, id, None).await?;
    Ok(Json(UnlinkResultDto { removed }))
}

#[utoipa::path(
    put,
    path = "/susu/v1/users/{id}/active-business",
    params(("id" = i32, Path, description = "User id")),
    request_body = SwitchActiveBusinessRequest,
    responses(
        (status = 200, description = "Active business switched", body = UserDto),
        (status = 422, description = "User is not linked to the business", body = Problem)
    ),
    tag = "memberships"
)]
pub async fn switch_active_business(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
    Json(req): Json<SwitchActiveBusinessRequest>,
) -> ApiResult<Json<UserDto>> {
    let user = svc
        .memberships
        .switch_active_business(&ctx, id, req.business_id)
        .await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/susu/v1/businesses/{id}/members/{user_id}",
    params(
        ("id" = i32, Path, description = "Business id"),
        ("user_id" = i32, Path, description = "User id")
    ),
    responses(
        (status = 204, description = "Linked; linking twice is not an error"),
        (status = 404, description = "No such user or business", body = Problem)
    ),
    tag = "memberships"
)]
pub async fn add_member(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path((business_id, user_id)): Path<(i32, i32)>,
) -> ApiResult<StatusCode> {
    svc.memberships.link(&ctx, user_id, business_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/susu/v1/businesses/{id}/members/{user_id}",
    params(
        ("id" = i32, Path, description = "Business id"),
        ("user_id" = i32, Path, description = "User id")
    ),
    responses((status = 200, description = "Link removed if it existed", body = UnlinkResultDto)),
    tag = "memberships"
)]
pub async fn remove_member(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path((business_id, user_id)): Path<(i32, i32)>,
) -> ApiResult<Json<UnlinkResultDto>> {
    let removed = svc.memberships.unlink(&ctx, user_id, Some(business_id)).await?;
    Ok(Json(UnlinkResultDto { removed }))
}

#[utoipa::path(
    get,
    path = "/susu/v1/businesses/{id}/members",
    params(("id" = i32, Path, description = "Business id")),
    responses(
        (status = 200, description = "Users linked to the business", body = [UserDto]),
        (status = 404, description = "No such business", body = Problem)
    ),
    tag = "memberships"
)]
pub async fn list_members(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<UserDto>>> {
    let users = svc.businesses.list_members(&ctx, id).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

// --- businesses ---

#[utoipa::path(
    post,
    path = "/susu/v1/businesses",
    request_body = CreateBusinessRequest,
    responses(
        (status = 201, description = "Business created and agent linked", body = BusinessDto),
        (status = 404, description = "No such agent", body = Problem),
        (status = 409, description = "Unique code taken", body = Problem),
        (status = 422, description = "Invalid field", body = Problem)
    ),
    tag = "businesses"
)]
pub async fn create_business(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Json(req): Json<CreateBusinessRequest>,
) -> ApiResult<(StatusCode, Json<BusinessDto>)> {
    let business = svc.businesses.create_business(&ctx, req.into()).await?;
    Ok((StatusCode::CREATED, Json(business.into())))
}

#[utoipa::path(
    get,
    path = "/susu/v1/businesses/{id}",
    params(("id" = i32, Path, description = "Business id")),
    responses(
        (status = 200, description = "Business found", body = BusinessDto),
        (status = 404, description = "No such business", body = Problem)
    ),
    tag = "businesses"
)]
pub async fn get_business(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
) -> ApiResult<Json<BusinessDto>> {
    let business = svc.businesses.get_business(&ctx, id).await?;
    Ok(Json(business.into()))
}

#[utoipa::path(
    post,
    path = "/susu/v1/businesses/{id}/units",
    params(("id" = i32, Path, description = "Business id")),
    request_body = CreateUnitRequest,
    responses(
        (status = 201, description = "Unit created", body = UnitDto),
        (status = 404, description = "No such business", body = Problem),
        (status = 422, description = "Invalid field", body = Problem)
    ),
    tag = "businesses"
)]
pub async fn create_unit(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
    Json(req): Json<CreateUnitRequest>,
) -> ApiResult<(StatusCode, Json<UnitDto>)> {
    let unit = svc.businesses.add_unit(&ctx, id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(unit.into())))
}

#[utoipa::path(
    get,
    path = "/susu/v1/businesses/{id}/units",
    params(("id" = i32, Path, description = "Business id")),
    responses(
        (status = 200, description = "Units of the business", body = [UnitDto]),
        (status = 404, description = "No such business", body = Problem)
    ),
    tag = "businesses"
)]
pub async fn list_units(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<UnitDto>>> {
    let units = svc.businesses.list_units(&ctx, id).await?;
    Ok(Json(units.into_iter().map(Into::into).collect()))
}

// --- savings ---

#[utoipa::path(
    post,
    path = "/susu/v1/savings",
    request_body = CreateSavingsRequest,
    responses(
        (status = 201, description = "Account opened with its marking schedule", body = SavingsAccountDto),
        (status = 404, description = "No such customer or business", body = Problem),
        (status = 422, description = "Invalid field, unit of another business or customer not a member", body = Problem)
    ),
    tag = "savings"
)]
pub async fn create_savings_account(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Json(req): Json<CreateSavingsRequest>,
) -> ApiResult<(StatusCode, Json<SavingsAccountDto>)> {
    let account = svc.savings.create_savings_account(&ctx, req.into()).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

#[utoipa::path(
    post,
    path = "/susu/v1/savings/target",
    request_body = CreateTargetSavingsRequest,
    responses(
        (status = 201, description = "Target account opened with its marking schedule", body = SavingsAccountDto),
        (status = 404, description = "No such customer or business", body = Problem),
        (status = 422, description = "Invalid field, unit of another business or customer not a member", body = Problem)
    ),
    tag = "savings"
)]
pub async fn create_target_savings(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Json(req): Json<CreateTargetSavingsRequest>,
) -> ApiResult<(StatusCode, Json<SavingsAccountDto>)> {
    let account = svc.savings.create_target_savings(&ctx, req.into()).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

#[utoipa::path(
    post,
    path = "/susu/v1/savings/{id}/end",
    params(("id" = i32, Path, description = "Savings account id")),
    responses(
        (status = 200, description = "Account completed", body = SavingsAccountDto),
        (status = 404, description = "No such account", body = Problem),
        (status = 409, description = "Account already completed", body = Problem)
    ),
    tag = "savings"
)]
pub async fn end_savings_account(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
) -> ApiResult<Json<SavingsAccountDto>> {
    let account = svc.savings.end_savings_account(&ctx, id).await?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    get,
    path = "/susu/v1/savings/{id}",
    params(("id" = i32, Path, description = "Savings account id")),
    responses(
        (status = 200, description = "Account found", body = SavingsAccountDto),
        (status = 404, description = "No such account", body = Problem)
    ),
    tag = "savings"
)]
pub async fn get_savings_account(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
) -> ApiResult<Json<SavingsAccountDto>> {
    let account = svc.savings.get_savings_account(&ctx, id).await?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    get,
    path = "/susu/v1/savings/{id}/markings",
    params(("id" = i32, Path, description = "Savings account id")),
    responses(
        (status = 200, description = "Markings ordered by date", body = [MarkingDto]),
        (status = 404, description = "No such account", body = Problem)
    ),
    tag = "savings"
)]
pub async fn list_markings(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<MarkingDto>>> {
    let markings = svc.savings.list_markings(&ctx, id).await?;
    Ok(Json(markings.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/susu/v1/savings/{id}/markings/{date}/pay",
    params(
        ("id" = i32, Path, description = "Savings account id"),
        ("date" = String, Path, description = "Scheduled day, YYYY-MM-DD")
    ),
    request_body = MarkPaymentRequest,
    responses(
        (status = 200, description = "Marking paid", body = MarkingDto),
        (status = 404, description = "No such account", body = Problem),
        (status = 409, description = "Marking is not awaiting payment or the account is completed", body = Problem),
        (status = 422, description = "Date outside the schedule or unknown payment method", body = Problem)
    ),
    tag = "savings"
)]
pub async fn pay_marking(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path((id, date)): Path<(i32, NaiveDate)>,
    Json(req): Json<MarkPaymentRequest>,
) -> ApiResult<Json<MarkingDto>> {
    let payment = MarkPayment::try_from(req)?;
    let marking = svc.savings.mark_payment(&ctx, id, date, payment).await?;
    Ok(Json(marking.into()))
}

#[utoipa::path(
    get,
    path = "/susu/v1/savings/{id}/commissions",
    params(("id" = i32, Path, description = "Savings account id")),
    responses(
        (status = 200, description = "Commissions accrued on the account", body = [CommissionDto]),
        (status = 404, description = "No such account", body = Problem)
    ),
    tag = "savings"
)]
pub async fn list_commissions(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
) -> ApiResult<Json<Vec<CommissionDto>>> {
    let commissions = svc.savings.list_commissions(&ctx, id).await?;
    Ok(Json(commissions.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    patch,
    path = "/susu/v1/markings/{id}/status",
    params(("id" = i32, Path, description = "Marking id")),
    request_body = UpdateMarkingStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = MarkingDto),
        (status = 404, description = "No such marking", body = Problem),
        (status = 409, description = "Account is completed", body = Problem),
        (status = 422, description = "Status outside the configured domain", body = Problem)
    ),
    tag = "savings"
)]
pub async fn update_marking_status(
    Actor(ctx): Actor,
    Extension(svc): Services,
    Path(id): Path<i32>,
    Json(req): Json<UpdateMarkingStatusRequest>,
) -> ApiResult<Json<MarkingDto>> {
    let marking = svc
        .savings
        .update_marking_status(&ctx, id, &req.status)
        .await?;
    Ok(Json(marking.into()))
}
