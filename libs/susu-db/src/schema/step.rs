use sea_orm::sea_query::{
    Alias, ColumnDef, DynIden, Expr, ForeignKey, ForeignKeyAction, Index, IntoColumnDef,
    IntoIden, Query, SimpleExpr, Table, TableCreateStatement,
};
use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr, Statement};
use sea_orm_migration::SchemaManager;
use tracing::{debug, info};

/// One idempotent schema change.
#[derive(Debug, Clone)]
pub enum SchemaStep {
    CreateTable {
        table: DynIden,
        create: TableCreateStatement,
    },
    AddColumn {
        table: DynIden,
        column: DynIden,
        def: ColumnDef,
    },
    RenameColumn {
        table: DynIden,
        from: DynIden,
        to: DynIden,
    },
    CreateIndex {
        table: DynIden,
        name: String,
        columns: Vec<DynIden>,
        unique: bool,
    },
    /// Postgres only: SQLite cannot add constraints to an existing table.
    AddForeignKey {
        name: String,
        from_table: DynIden,
        from_column: DynIden,
        to_table: DynIden,
        to_column: DynIden,
        on_delete: ForeignKeyAction,
    },
    /// Postgres only: SQLite cannot change nullability in place.
    SetNotNull { table: DynIden, column: DynIden },
    /// `UPDATE table SET column = value WHERE pending`; done once no row matches `pending`.
    Backfill {
        table: DynIden,
        column: DynIden,
        value: SimpleExpr,
        pending: SimpleExpr,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    AlreadySatisfied,
    /// The step does not exist on this backend.
    NotApplicable,
}

/// Per-outcome counts of a list of steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub applied: usize,
    pub already_satisfied: usize,
    pub not_applicable: usize,
}

impl StepReport {
    fn add(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Applied => self.applied += 1,
            StepOutcome::AlreadySatisfied => self.already_satisfied += 1,
            StepOutcome::NotApplicable => self.not_applicable += 1,
        }
    }
}

impl SchemaStep {
    /// `build` receives a `CREATE TABLE` statement with the table name already set.
    pub fn create_table<T: IntoIden>(table: T, build: impl FnOnce(&mut TableCreateStatement)) -> Self {
        let table = table.into_iden();
        let mut create = Table::create();
        create.table(table.clone());
        build(&mut create);
        Self::CreateTable { table, create }
    }

    pub fn add_column<T: IntoIden, C: IntoIden>(table: T, column: C, def: impl IntoColumnDef) -> Self {
        Self::AddColumn {
            table: table.into_iden(),
            column: column.into_iden(),
            def: def.into_column_def(),
        }
    }

    pub fn rename_column<T: IntoIden, F: IntoIden, N: IntoIden>(table: T, from: F, to: N) -> Self {
        Self::RenameColumn {
            table: table.into_iden(),
            from: from.into_iden(),
            to: to.into_iden(),
        }
    }

    pub fn create_index<T, C, I>(table: T, name: &str, columns: I, unique: bool) -> Self
    where
        T: IntoIden,
        C: IntoIden,
        I: IntoIterator<Item = C>,
    {
        Self::CreateIndex {
            table: table.into_iden(),
            name: name.to_owned(),
            columns: columns.into_iter().map(IntoIden::into_iden).collect(),
            unique,
        }
    }

    pub fn add_foreign_key<FT, FC, TT, TC>(
        name: &str,
        (from_table, from_column): (FT, FC),
        (to_table, to_column): (TT, TC),
        on_delete: ForeignKeyAction,
    ) -> Self
    where
        FT: IntoIden,
        FC: IntoIden,
        TT: IntoIden,
        TC: IntoIden,
    {
        Self::AddForeignKey {
            name: name.to_owned(),
            from_table: from_table.into_iden(),
            from_column: from_column.into_iden(),
            to_table: to_table.into_iden(),
            to_column: to_column.into_iden(),
            on_delete,
        }
    }

    pub fn set_not_null<T: IntoIden, C: IntoIden>(table: T, column: C) -> Self {
        Self::SetNotNull {
            table: table.into_iden(),
            column: column.into_iden(),
        }
    }

    pub fn backfill<T: IntoIden, C: IntoIden>(
        table: T,
        column: C,
        value: SimpleExpr,
        pending: SimpleExpr,
    ) -> Self {
        Self::Backfill {
            table: table.into_iden(),
            column: column.into_iden(),
            value,
            pending,
        }
    }

    /// Human-readable label for logs and errors.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::CreateTable { table, .. } => format!("create table {}", table.to_string()),
            Self::AddColumn { table, column, .. } => {
                format!("add column {}.{}", table.to_string(), column.to_string())
            }
            Self::RenameColumn { table, from, to } => format!(
                "rename column {}.{} to {}",
                table.to_string(),
                from.to_string(),
                to.to_string()
            ),
            Self::CreateIndex { name, .. } => format!("create index {name}"),
            Self::AddForeignKey { name, .. } => format!("add foreign key {name}"),
            Self::SetNotNull { table, column } => {
                format!("set not null {}.{}", table.to_string(), column.to_string())
            }
            Self::Backfill { table, column, .. } => {
                format!("backfill {}.{}", table.to_string(), column.to_string())
            }
        }
    }

    fn applies_to(&self, backend: DatabaseBackend) -> bool {
        match self {
            Self::AddForeignKey { .. } | Self::SetNotNull { .. } => {
                backend == DatabaseBackend::Postgres
            }
            _ => true,
        }
    }

    /// Whether the effect of this step is already present.
    ///
    /// # Errors
    /// Returns [`DbErr`] if the catalog query fails.
    pub async fn is_satisfied(&self, manager: &SchemaManager<'_>) -> Result<bool, DbErr> {
        match self {
            Self::CreateTable { table, .. } => manager.has_table(table.to_string()).await,
            Self::AddColumn { table, column, .. } => {
                manager.has_column(table.to_string(), column.to_string()).await
            }
            Self::RenameColumn { table, from, to } => {
                let has_to = manager.has_column(table.to_string(), to.to_string()).await?;
                let has_from = manager.has_column(table.to_string(), from.to_string()).await?;
                Ok(has_to && !has_from)
            }
            Self::CreateIndex { table, name, .. } => {
                manager.has_index(table.to_string(), name).await
            }
            Self::AddForeignKey { from_table, name, .. } => {
                pg_constraint_exists(manager, &from_table.to_string(), name).await
            }
            Self::SetNotNull { table, column } => {
                pg_column_not_null(manager, &table.to_string(), &column.to_string()).await
            }
            Self::Backfill { table, pending, .. } => {
                Ok(pending_rows(manager, table, pending).await? == 0)
            }
        }
    }

    async fn apply(self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        match self {
            Self::CreateTable { create, .. } => manager.create_table(create).await,
            Self::AddColumn { table, def, .. } => {
                manager
                    .alter_table(Table::alter().table(table).add_column(def).to_owned())
                    .await
            }
            Self::RenameColumn { table, from, to } => {
                manager
                    .alter_table(Table::alter().table(table).rename_column(from, to).to_owned())
                    .await
            }
            Self::CreateIndex {
                table,
                name,
                columns,
                unique,
            } => {
                let mut index = Index::create();
                index.name(name).table(table);
                for column in columns {
                    index.col(column);
                }
                if unique {
                    index.unique();
                }
                manager.create_index(index).await
            }
            Self::AddForeignKey {
                name,
                from_table,
                from_column,
                to_table,
                to_column,
                on_delete,
            } => {
                manager
                    .create_foreign_key(
                        ForeignKey::create()
                            .name(name)
                            .from(from_table, from_column)
                            .to(to_table, to_column)
                            .on_delete(on_delete)
                            .to_owned(),
                    )
                    .await
            }
            Self::SetNotNull { table, column } => {
                let sql = format!(
                    r#"ALTER TABLE "{}" ALTER COLUMN "{}" SET NOT NULL"#,
                    table.to_string(),
                    column.to_string()
                );
                manager.get_connection().execute_unprepared(&sql).await?;
                Ok(())
            }
            Self::Backfill {
                table,
                column,
                value,
                pending,
            } => {
                let update = Query::update()
                    .table(table)
                    .value(column, value)
                    .and_where(pending)
                    .to_owned();
                let conn = manager.get_connection();
                let res = conn.execute(conn.get_database_backend().build(&update)).await?;
                debug!(rows = res.rows_affected(), "backfill updated rows");
                Ok(())
            }
        }
    }
}

async fn pending_rows(
    manager: &SchemaManager<'_>,
    table: &DynIden,
    pending: &SimpleExpr,
) -> Result<i64, DbErr> {
    let query = Query::select()
        .expr_as(Expr::cust("COUNT(*)"), Alias::new("n"))
        .from(table.clone())
        .and_where(pending.clone())
        .to_owned();
    let conn = manager.get_connection();
    let row = conn.query_one(conn.get_database_backend().build(&query)).await?;
    match row {
        Some(row) => row.try_get::<i64>("", "n"),
        None => Ok(0),
    }
}

async fn pg_constraint_exists(
    manager: &SchemaManager<'_>,
    table: &str,
    name: &str,
) -> Result<bool, DbErr> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        "SELECT COUNT(*) AS n FROM information_schema.table_constraints \
         WHERE table_schema = current_schema() AND table_name = $1 AND constraint_name = $2",
        [table.into(), name.into()],
    );
    count_is_positive(manager, stmt).await
}

async fn pg_column_not_null(
    manager: &SchemaManager<'_>,
    table: &str,
    column: &str,
) -> Result<bool, DbErr> {
    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        "SELECT COUNT(*) AS n FROM information_schema.columns \
         WHERE table_schema = current_schema() AND table_name = $1 AND column_name = $2 \
         AND is_nullable = 'NO'",
        [table.into(), column.into()],
    );
    count_is_positive(manager, stmt).await
}

async fn count_is_positive(manager: &SchemaManager<'_>, stmt: Statement) -> Result<bool, DbErr> {
    let row = manager.get_connection().query_one(stmt).await?;
    Ok(match row {
        Some(row) => row.try_get::<i64>("", "n")? > 0,
        None => false,
    })
}

/// Apply `steps` in order, skipping those already satisfied.
///
/// # Errors
/// Returns [`DbErr`] when a step fails, or [`DbErr::Migration`] when a step's
/// postcondition does not hold after it was applied.
pub async fn apply_steps(
    manager: &SchemaManager<'_>,
    steps: Vec<SchemaStep>,
) -> Result<StepReport, DbErr> {
    let backend = manager.get_database_backend();
    let mut report = StepReport::default();

    for step in steps {
        let label = step.describe();
        let outcome = if !step.applies_to(backend) {
            StepOutcome::NotApplicable
        } else if step.is_satisfied(manager).await? {
            StepOutcome::AlreadySatisfied
        } else {
            let check = step.clone();
            step.apply(manager).await?;
            if !check.is_satisfied(manager).await? {
                return Err(DbErr::Migration(format!(
                    "step '{label}' did not take effect"
                )));
            }
            StepOutcome::Applied
        };

        match outcome {
            StepOutcome::Applied => info!(step = %label, "schema step applied"),
            StepOutcome::AlreadySatisfied => debug!(step = %label, "schema step already satisfied"),
            StepOutcome::NotApplicable => debug!(step = %label, ?backend, "schema step not applicable"),
        }
        report.add(outcome);
    }

    Ok(report)
}
