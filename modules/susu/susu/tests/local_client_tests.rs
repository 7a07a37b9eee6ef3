#![allow(clippy::unwrap_used, clippy::expect_used)]

//! The in-process client maps domain errors to `SusuError`.

mod common;

use susu::{NotificationMethod, Role, SusuError};

#[tokio::test]
async fn client_round_trips_through_services() {
    let (_db, module) = common::setup().await;
    let client = module.client();
    let agent = common::seed_user(&module, "agent", Role::Agent).await;
    let business = common::seed_business(&module, agent.id, "Osu").await;
    let ctx = common::as_actor(agent.id);

    let user = client.get_user(&ctx, agent.id).await.unwrap();
    assert_eq!(user.username, "agent");
    assert_eq!(client.list_business_ids(&ctx, agent.id).await.unwrap(), vec![business.id]);

    let settings = client
        .update_notification_method(&ctx, agent.id, NotificationMethod::Email)
        .await
        .unwrap();
    assert_eq!(settings.notification_method, NotificationMethod::Email);

    assert_eq!(client.unlink(&ctx, agent.id, None).await.unwrap(), 1);
    assert!(!client.is_linked(&ctx, agent.id, business.id).await.unwrap());
}

#[tokio::test]
async fn client_reports_missing_records() {
    let (_db, module) = common::setup().await;

    let err = module
        .client()
        .get_savings_account(&common::system(), 5)
        .await
        .unwrap_err();

    assert_eq!(err, SusuError::not_found("SavingsAccount", 5));
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let (_db, module) = common::setup().await;
    common::seed_user(&module, "dup", Role::Customer).await;

    let err = module
        .services()
        .users
        .create_user(
            &common::system(),
            susu::NewUser {
                full_name: "Other".to_owned(),
                phone_number: "0555000000".to_owned(),
                email: None,
                username: "dup".to_owned(),
                role: Role::Customer,
            },
        )
        .await
        .unwrap_err();

    assert!(err.is_unique_violation());
    assert!(matches!(SusuError::from(err), SusuError::Conflict { .. }));
}
