#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Ledger runner and checked schema steps against in-memory SQLite.

use sea_orm::sea_query::{ColumnDef, Expr};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use sea_orm_migration::{MigrationName, MigrationTrait, SchemaManager};
use susu_db::schema::{SchemaStep, StepReport, apply_steps};
use susu_db::{DbConfig, MigrationError, connect, get_pending_migrations, run_migrations};

#[derive(sea_orm::DeriveIden)]
enum Widgets {
    Table,
    Id,
    Label,
    Location,
    Address,
    Status,
}

fn v1_steps() -> Vec<SchemaStep> {
    vec![
        SchemaStep::create_table(Widgets::Table, |t| {
            t.col(
                ColumnDef::new(Widgets::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Widgets::Label).string().not_null())
            .col(ColumnDef::new(Widgets::Location).string().null());
        }),
        SchemaStep::create_index(Widgets::Table, "idx_widgets_label", [Widgets::Label], false),
    ]
}

fn v2_steps() -> Vec<SchemaStep> {
    vec![
        SchemaStep::rename_column(Widgets::Table, Widgets::Location, Widgets::Address),
        SchemaStep::add_column(
            Widgets::Table,
            Widgets::Status,
            ColumnDef::new(Widgets::Status).string().null(),
        ),
        SchemaStep::backfill(
            Widgets::Table,
            Widgets::Status,
            Expr::value("pending"),
            Expr::col(Widgets::Status).is_null(),
        ),
    ]
}

struct StepsMigration {
    name: &'static str,
    steps: fn() -> Vec<SchemaStep>,
}

impl MigrationName for StepsMigration {
    fn name(&self) -> &str {
        self.name
    }
}

#[async_trait::async_trait]
impl MigrationTrait for StepsMigration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        apply_steps(manager, (self.steps)()).await.map(|_| ())
    }
}

struct BrokenMigration;

impl MigrationName for BrokenMigration {
    fn name(&self) -> &str {
        "m003_broken"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for BrokenMigration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("CREATE TABLE half_done (id INTEGER PRIMARY KEY)")
            .await?;
        manager
            .get_connection()
            .execute_unprepared("THIS IS NOT SQL")
            .await?;
        Ok(())
    }
}

fn chain() -> Vec<Box<dyn MigrationTrait>> {
    vec![
        Box::new(StepsMigration {
            name: "m002_widget_status",
            steps: v2_steps,
        }),
        Box::new(StepsMigration {
            name: "m001_widgets",
            steps: v1_steps,
        }),
    ]
}

async fn db() -> DatabaseConnection {
    connect(&DbConfig::in_memory()).await.unwrap()
}

#[tokio::test]
async fn chain_applies_in_name_order_then_skips() {
    let db = db().await;

    let first = run_migrations(&db, "widgets", chain()).await.unwrap();
    assert_eq!(first.applied_names, vec!["m001_widgets", "m002_widget_status"]);

    let second = run_migrations(&db, "widgets", chain()).await.unwrap();
    assert_eq!(second.applied, 0);
    assert_eq!(second.skipped, 2);

    let manager = SchemaManager::new(&db);
    assert!(manager.has_column("widgets", "address").await.unwrap());
    assert!(!manager.has_column("widgets", "location").await.unwrap());
}

#[tokio::test]
async fn rerunning_steps_on_migrated_schema_is_a_no_op() {
    let db = db().await;
    let manager = SchemaManager::new(&db);

    let first = apply_steps(&manager, v1_steps()).await.unwrap();
    assert_eq!(first.applied, 2);

    let again = apply_steps(&manager, v1_steps()).await.unwrap();
    assert_eq!(
        again,
        StepReport {
            applied: 0,
            already_satisfied: 2,
            not_applicable: 0,
        }
    );
}

#[tokio::test]
async fn partially_migrated_schema_converges() {
    let db = db().await;
    let manager = SchemaManager::new(&db);
    apply_steps(&manager, v1_steps()).await.unwrap();

    // Someone already renamed the column by hand.
    db.execute_unprepared(r#"ALTER TABLE "widgets" RENAME COLUMN "location" TO "address""#)
        .await
        .unwrap();

    // Rename already done; the table is empty so the backfill has nothing pending.
    let report = apply_steps(&manager, v2_steps()).await.unwrap();
    assert_eq!(report.applied, 1);
    assert_eq!(report.already_satisfied, 2);
    assert_eq!(report.not_applicable, 0);
}

#[tokio::test]
async fn backfill_updates_pending_rows_only() {
    let db = db().await;
    let manager = SchemaManager::new(&db);
    apply_steps(&manager, v1_steps()).await.unwrap();
    db.execute_unprepared(r#"INSERT INTO "widgets" ("label") VALUES ('a'), ('b')"#)
        .await
        .unwrap();

    let report = apply_steps(&manager, v2_steps()).await.unwrap();
    assert_eq!(report.applied, 3);

    let row = db
        .query_one(sea_orm::Statement::from_string(
            db.get_database_backend(),
            r#"SELECT COUNT(*) AS n FROM "widgets" WHERE "status" = 'pending'"#,
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.try_get::<i64>("", "n").unwrap(), 2);
}

#[tokio::test]
async fn postgres_only_steps_are_not_applicable_on_sqlite() {
    let db = db().await;
    let manager = SchemaManager::new(&db);
    apply_steps(&manager, v1_steps()).await.unwrap();

    let report = apply_steps(
        &manager,
        vec![SchemaStep::set_not_null(Widgets::Table, Widgets::Label)],
    )
    .await
    .unwrap();
    assert_eq!(report.not_applicable, 1);
}

#[tokio::test]
async fn failed_migration_is_not_recorded() {
    let db = db().await;

    let mut migrations = chain();
    migrations.push(Box::new(BrokenMigration));
    let err = run_migrations(&db, "widgets", migrations).await.unwrap_err();
    assert!(matches!(err, MigrationError::MigrationFailed { ref migration, .. } if migration == "m003_broken"));

    let mut migrations = chain();
    migrations.push(Box::new(BrokenMigration));
    let pending = get_pending_migrations(&db, "widgets", &migrations).await.unwrap();
    assert_eq!(pending, vec!["m003_broken"]);

    let manager = SchemaManager::new(&db);
    assert!(!manager.has_table("half_done").await.unwrap());
}

#[tokio::test]
async fn pending_lists_everything_before_first_run() {
    let db = db().await;
    let pending = get_pending_migrations(&db, "fresh", &chain()).await.unwrap();
    assert_eq!(pending, vec!["m001_widgets", "m002_widget_status"]);
}

#[tokio::test]
async fn duplicate_names_are_rejected() {
    let db = db().await;
    let migrations: Vec<Box<dyn MigrationTrait>> = vec![
        Box::new(StepsMigration {
            name: "m001_widgets",
            steps: v1_steps,
        }),
        Box::new(StepsMigration {
            name: "m001_widgets",
            steps: v1_steps,
        }),
    ];
    let err = run_migrations(&db, "dups", migrations).await.unwrap_err();
    assert!(matches!(err, MigrationError::DuplicateMigrationName { .. }));
}
