#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Audit attribution through the ORM save hook against a real database.

mod common;

use chrono::{TimeZone, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use susu::domain::repos::UsersRepository;
use susu::infra::storage::OrmUsersRepository;
use susu::infra::storage::entity::user_settings;
use susu::{NewUser, Role, UserPatch};

fn new_user(username: &str) -> NewUser {
    NewUser {
        full_name: "Efua Owusu".to_owned(),
        phone_number: format!("020{username}"),
        email: None,
        username: username.to_owned(),
        role: Role::Agent,
    }
}

fn rename(name: &str) -> UserPatch {
    UserPatch {
        full_name: Some(name.to_owned()),
        ..UserPatch::default()
    }
}

#[tokio::test]
async fn create_then_update_records_both_actors() {
    let db = common::migrated_db().await;
    let repo = OrmUsersRepository;

    let before = Utc::now();
    let created = repo.create(&db, new_user("efua"), Some(7)).await.unwrap();
    let after = Utc::now();

    assert_eq!(created.audit.created_by, Some(7));
    assert!(created.audit.created_at >= before && created.audit.created_at <= after);
    assert_eq!(created.audit.updated_at, None);
    assert_eq!(created.audit.updated_by, None);

    let updated = repo
        .update(&db, created.id, rename("Efua A. Owusu"), Some(9))
        .await
        .unwrap();

    assert_eq!(updated.audit.updated_by, Some(9));
    assert_eq!(updated.audit.created_by, Some(7));
    assert_eq!(updated.audit.created_at, created.audit.created_at);
    assert!(updated.audit.updated_at.unwrap() > updated.audit.created_at);
}

#[tokio::test]
async fn update_without_actor_keeps_previous_updated_by() {
    let db = common::migrated_db().await;
    let repo = OrmUsersRepository;
    let user = repo.create(&db, new_user("kwame"), Some(1)).await.unwrap();

    repo.update(&db, user.id, rename("first"), Some(4)).await.unwrap();
    let second = repo.update(&db, user.id, rename("second"), None).await.unwrap();

    assert_eq!(second.audit.updated_by, Some(4));
    assert_eq!(second.full_name, "second");
}

#[tokio::test]
async fn successive_updates_strictly_increase_updated_at() {
    let db = common::migrated_db().await;
    let repo = OrmUsersRepository;
    let user = repo.create(&db, new_user("abena"), None).await.unwrap();

    let mut last = user.audit.created_at;
    for i in 0..5 {
        let updated = repo
            .update(&db, user.id, rename(&format!("name {i}")), Some(2))
            .await
            .unwrap();
        let stamped = updated.audit.updated_at.unwrap();
        assert!(stamped > last, "update {i} did not move updated_at forward");
        assert_eq!(updated.audit.created_at, user.audit.created_at);
        last = stamped;
    }
}

#[tokio::test]
async fn explicit_created_at_is_preserved() {
    let db = common::migrated_db().await;
    let user = OrmUsersRepository
        .create(&db, new_user("yaw"), None)
        .await
        .unwrap();
    // create_user is bypassed, so no settings row exists yet
    let explicit = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();

    let inserted = user_settings::ActiveModel {
        user_id: Set(user.id),
        notification_method: Set("sms".to_owned()),
        created_at: Set(explicit),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    assert_eq!(inserted.created_at, explicit);
    let stored = user_settings::Entity::find_by_id(inserted.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.created_at, explicit);
    assert_eq!(stored.updated_at, None);
}

#[tokio::test]
async fn system_writes_leave_actor_columns_empty() {
    let (_db, module) = common::setup().await;

    let user = common::seed_user(&module, "system", Role::Customer).await;

    assert_eq!(user.audit.created_by, None);
    let settings = module
        .services()
        .settings
        .get_settings(&common::system(), user.id)
        .await
        .unwrap();
    assert!(settings.is_stored());
    assert_eq!(settings.audit.unwrap().created_by, None);
}
