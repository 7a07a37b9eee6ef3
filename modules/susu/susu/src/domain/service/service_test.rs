//! Validation paths that reject input before any database access, so the
//! services run against a disconnected handle.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use susu_sdk::{NewBusiness, NewSavingsAccount, NewTargetSavings, NewUser, Role, UserPatch};
use susu_security::SecurityContext;

use super::*;
use crate::config::SusuConfig;
use crate::infra::storage::{
    OrmBusinessesRepository, OrmMembershipsRepository, OrmSavingsRepository,
    OrmSettingsRepository, OrmUsersRepository,
};

type Services = AppServices<
    OrmUsersRepository,
    OrmBusinessesRepository,
    OrmMembershipsRepository,
    OrmSettingsRepository,
    OrmSavingsRepository,
>;

fn services(config: SusuConfig) -> Services {
    AppServices::new(
        DatabaseConnection::default(),
        (
            OrmUsersRepository,
            OrmBusinessesRepository,
            OrmMembershipsRepository,
            OrmSettingsRepository,
            OrmSavingsRepository,
        ),
        config,
    )
}

fn field_of(err: DomainError) -> String {
    match err {
        DomainError::Validation { field, .. } => field,
        other => panic!("expected validation error, got {other:?}"),
    }
}

fn new_user(full_name: &str) -> NewUser {
    NewUser {
        full_name: full_name.to_owned(),
        phone_number: "0244000000".to_owned(),
        email: None,
        username: "kofi".to_owned(),
        role: Role::Customer,
    }
}

fn new_account() -> NewSavingsAccount {
    NewSavingsAccount {
        customer_id: 1,
        business_id: 1,
        unit_id: None,
        daily_amount: 500,
        duration_months: 1,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        commission_days: None,
        commission_amount: None,
    }
}

fn new_target() -> NewTargetSavings {
    NewTargetSavings {
        customer_id: 1,
        business_id: 1,
        unit_id: None,
        target_amount: 30_000,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        commission_days: None,
        commission_amount: None,
    }
}

fn new_business(unique_code: Option<&str>) -> NewBusiness {
    NewBusiness {
        name: "Makola".to_owned(),
        agent_id: 1,
        address: None,
        unique_code: unique_code.map(str::to_owned),
        is_default: false,
    }
}

#[test]
fn validate_text_counts_characters_not_bytes() {
    assert!(validate_text("name", "Adwoa", 5).is_ok());
    assert!(validate_text("name", "\u{c9}w\u{e9}", 3).is_ok());
    assert_eq!(field_of(validate_text("name", "   ", 5).unwrap_err()), "name");
    assert!(validate_text("name", "Adwoa!", 5).is_err());
}

#[tokio::test]
async fn create_user_rejects_blank_and_oversized_names() {
    let svc = services(SusuConfig {
        max_field_length: 8,
        ..SusuConfig::default()
    });
    let ctx = SecurityContext::for_actor(1);

    let err = svc.users.create_user(&ctx, new_user("")).await.unwrap_err();
    assert_eq!(field_of(err), "full_name");

    let err = svc
        .users
        .create_user(&ctx, new_user("Kofi Annan Junior"))
        .await
        .unwrap_err();
    assert_eq!(field_of(err), "full_name");
}

#[tokio::test]
async fn text_fields_are_capped_at_their_column_width() {
    let svc = services(SusuConfig::default());
    let ctx = SecurityContext::for_actor(1);

    let user = NewUser {
        phone_number: "0".repeat(21),
        ..new_user("Kofi")
    };
    let err = svc.users.create_user(&ctx, user).await.unwrap_err();
    assert_eq!(field_of(err), "phone_number");

    let err = svc
        .businesses
        .create_business(&ctx, new_business(Some("CODE-0123456789-LONGX")))
        .await
        .unwrap_err();
    assert_eq!(field_of(err), "unique_code");
}

#[tokio::test]
async fn update_user_validates_patch_fields() {
    let svc = services(SusuConfig::default());
    let patch = UserPatch {
        email: Some(String::new()),
        ..UserPatch::default()
    };
    let err = svc
        .users
        .update_user(&SecurityContext::system(), 1, patch)
        .await
        .unwrap_err();
    assert_eq!(field_of(err), "email");
}

#[tokio::test]
async fn create_business_requires_a_name() {
    let svc = services(SusuConfig::default());
    let err = svc
        .businesses
        .create_business(
            &SecurityContext::for_actor(1),
            NewBusiness {
                name: " ".to_owned(),
                ..new_business(None)
            },
        )
        .await
        .unwrap_err();
    assert_eq!(field_of(err), "name");
}

#[tokio::test]
async fn savings_account_amounts_must_be_positive() {
    let svc = services(SusuConfig::default());
    let ctx = SecurityContext::for_actor(1);

    let cases = [
        (NewSavingsAccount { daily_amount: 0, ..new_account() }, "daily_amount"),
        (NewSavingsAccount { duration_months: -1, ..new_account() }, "duration_months"),
        (NewSavingsAccount { duration_months: 61, ..new_account() }, "duration_months"),
        (NewSavingsAccount { duration_months: 2_000_000, ..new_account() }, "duration_months"),
        (NewSavingsAccount { commission_days: Some(0), ..new_account() }, "commission_days"),
        (NewSavingsAccount { commission_amount: Some(-10), ..new_account() }, "commission_amount"),
    ];
    for (account, field) in cases {
        let err = svc
            .savings
            .create_savings_account(&ctx, account)
            .await
            .unwrap_err();
        assert_eq!(field_of(err), field);
    }
}

#[tokio::test]
async fn duration_cap_follows_configuration() {
    let svc = services(SusuConfig {
        max_duration_months: 3,
        ..SusuConfig::default()
    });
    let err = svc
        .savings
        .create_savings_account(
            &SecurityContext::for_actor(1),
            NewSavingsAccount { duration_months: 4, ..new_account() },
        )
        .await
        .unwrap_err();
    assert_eq!(field_of(err), "duration_months");
}

#[tokio::test]
async fn target_savings_plan_is_checked() {
    let svc = services(SusuConfig::default());
    let ctx = SecurityContext::for_actor(1);
    let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

    let cases = [
        (NewTargetSavings { target_amount: 0, ..new_target() }, "target_amount"),
        (NewTargetSavings { end_date: day(2023, 12, 31), ..new_target() }, "end_date"),
        (NewTargetSavings { end_date: day(2029, 1, 1), ..new_target() }, "end_date"),
        // 40 units over 91 days rounds to nothing per day
        (NewTargetSavings { target_amount: 40, ..new_target() }, "target_amount"),
        (NewTargetSavings { commission_days: Some(0), ..new_target() }, "commission_days"),
    ];
    for (target, field) in cases {
        let err = svc
            .savings
            .create_target_savings(&ctx, target)
            .await
            .unwrap_err();
        assert_eq!(field_of(err), field);
    }
}

#[tokio::test]
async fn marking_status_must_be_in_the_configured_domain() {
    let svc = services(SusuConfig::default());
    let err = svc
        .savings
        .update_marking_status(&SecurityContext::for_actor(1), 4, "settled")
        .await
        .unwrap_err();
    assert_eq!(field_of(err), "status");
}

#[test]
fn services_share_one_container() {
    let svc = services(SusuConfig::default());
    let copy = svc.clone();
    assert!(Arc::ptr_eq(&svc.users, &copy.users));
    assert!(Arc::ptr_eq(&svc.savings, &copy.savings));
}
