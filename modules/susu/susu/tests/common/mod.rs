#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Shared setup for susu integration tests: an in-memory SQLite database with
//! the full migration chain applied, plus seed helpers.

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use susu::config::SusuConfig;
use susu::{Business, NewBusiness, NewUser, Role, SusuModule, User};
use susu_db::DbConfig;
use susu_security::SecurityContext;

pub async fn migrated_db() -> DatabaseConnection {
    let db = susu_db::connect(&DbConfig::in_memory()).await.unwrap();
    SusuModule::migrate(&db).await.unwrap();
    db
}

pub async fn setup() -> (DatabaseConnection, SusuModule) {
    let db = migrated_db().await;
    let module = SusuModule::new(db.clone(), SusuConfig::default()).unwrap();
    (db, module)
}

pub fn system() -> SecurityContext {
    SecurityContext::system()
}

pub fn as_actor(id: i32) -> SecurityContext {
    SecurityContext::for_actor(id)
}

pub async fn seed_user(module: &SusuModule, username: &str, role: Role) -> User {
    let new_user = NewUser {
        full_name: format!("{username} test"),
        phone_number: format!("024{username}"),
        email: None,
        username: username.to_owned(),
        role,
    };
    module
        .services()
        .users
        .create_user(&system(), new_user)
        .await
        .unwrap()
}

pub async fn seed_business(module: &SusuModule, agent_id: i32, name: &str) -> Business {
    let business = NewBusiness {
        name: name.to_owned(),
        agent_id,
        address: None,
        unique_code: None,
        is_default: false,
    };
    module
        .services()
        .businesses
        .create_business(&as_actor(agent_id), business)
        .await
        .unwrap()
}

pub async fn link(module: &SusuModule, user_id: i32, business_id: i32) {
    module
        .services()
        .memberships
        .link(&system(), user_id, business_id)
        .await
        .unwrap();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
