#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::DbErr;
use susu_sdk::{Marking, NotificationMethod, PaymentMethod, Role, User, UserSettings};

use super::entity::{savings_marking, user, user_settings};

fn created() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).single().unwrap()
}

fn user_model(role: &str) -> user::Model {
    user::Model {
        id: 3,
        full_name: "Ama Mensah".to_owned(),
        phone_number: "0240000003".to_owned(),
        email: None,
        username: "ama".to_owned(),
        role: role.to_owned(),
        is_active: true,
        active_business_id: Some(2),
        created_by: Some(1),
        created_at: created(),
        updated_by: None,
        updated_at: None,
    }
}

#[test]
fn user_model_maps_role_and_audit_fields() {
    let user = User::try_from(user_model("sub_agent")).unwrap();
    assert_eq!(user.role, Role::SubAgent);
    assert_eq!(user.active_business_id, Some(2));
    assert_eq!(user.audit.created_by, Some(1));
    assert_eq!(user.audit.created_at, created());
    assert_eq!(user.audit.updated_at, None);
}

#[test]
fn unknown_role_is_a_type_error() {
    let err = User::try_from(user_model("overlord")).unwrap_err();
    assert!(matches!(err, DbErr::Type(ref msg) if msg.contains("users.role")));
}

#[test]
fn stored_settings_carry_audit_data() {
    let settings = UserSettings::try_from(user_settings::Model {
        id: 1,
        user_id: 3,
        notification_method: "sms".to_owned(),
        created_by: None,
        created_at: created(),
        updated_by: Some(4),
        updated_at: Some(created()),
    })
    .unwrap();
    assert_eq!(settings.notification_method, NotificationMethod::Sms);
    assert!(settings.is_stored());
    assert_eq!(settings.audit.unwrap().updated_by, Some(4));
}

#[test]
fn marking_payment_method_is_optional() {
    let mut model = savings_marking::Model {
        id: 10,
        savings_account_id: 2,
        unit_id: None,
        marked_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        amount: 500,
        status: "pending".to_owned(),
        payment_method: None,
        payment_reference: None,
        marked_by_id: None,
        created_by: Some(1),
        created_at: created(),
        updated_by: None,
        updated_at: None,
    };
    assert_eq!(Marking::try_from(model.clone()).unwrap().payment_method, None);

    model.payment_method = Some("bank_transfer".to_owned());
    assert_eq!(
        Marking::try_from(model).unwrap().payment_method,
        Some(PaymentMethod::BankTransfer)
    );
}
