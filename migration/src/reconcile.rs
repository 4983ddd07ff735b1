use crate::m20261017_000001_create_snippets::{Snippet, additive_columns};
use sea_orm_migration::prelude::*;

/// Adds every declared `snippets` column that the live table is missing.
///
/// Columns are only ever added; nothing is dropped or renamed. Returns the
/// names of the columns that were added.
pub async fn reconcile_columns(manager: &SchemaManager<'_>) -> Result<Vec<String>, DbErr> {
    let table = Snippet::Table.to_string();
    let mut added = Vec::new();

    for (column, mut definition) in additive_columns() {
        let name = column.to_string();
        if manager.has_column(&table, &name).await? {
            continue;
        }

        manager
            .alter_table(
                Table::alter()
                    .table(Snippet::Table)
                    .add_column(&mut definition)
                    .to_owned(),
            )
            .await?;
        added.push(name);
    }

    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Migrator, MigratorTrait};
    use sea_orm_migration::sea_orm::{
        ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement,
    };

    async fn connect(dir: &tempfile::TempDir) -> DatabaseConnection {
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("reconcile.db").display()
        );
        Database::connect(&url).await.unwrap()
    }

    async fn count_rows(db: &DatabaseConnection) -> i64 {
        let row = db
            .query_one(Statement::from_string(
                DbBackend::Sqlite,
                "SELECT COUNT(*) AS n FROM snippets",
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get::<i64>("", "n").unwrap()
    }

    #[tokio::test]
    async fn fresh_schema_needs_no_reconciliation() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = connect(&dir).await;
        Migrator::up(&db, None).await.unwrap();

        let manager = SchemaManager::new(&db);
        let added = reconcile_columns(&manager).await.unwrap();

        assert!(added.is_empty());
        assert!(manager.has_column("snippets", "deleted_at").await.unwrap());
    }

    #[tokio::test]
    async fn legacy_table_gains_missing_columns_and_keeps_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = connect(&dir).await;
        db.execute_unprepared(
            "CREATE TABLE snippets (\
                id INTEGER PRIMARY KEY AUTOINCREMENT, \
                title TEXT NOT NULL DEFAULT '', \
                created_at TEXT NOT NULL, \
                updated_at TEXT NOT NULL)",
        )
        .await
        .unwrap();
        db.execute_unprepared(
            "INSERT INTO snippets (title, created_at, updated_at) \
             VALUES ('kept', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
        )
        .await
        .unwrap();

        Migrator::up(&db, None).await.unwrap();
        let manager = SchemaManager::new(&db);
        let added = reconcile_columns(&manager).await.unwrap();

        assert_eq!(added, vec!["body".to_string(), "deleted_at".to_string()]);
        assert!(manager.has_column("snippets", "body").await.unwrap());
        assert_eq!(count_rows(&db).await, 1);

        let again = reconcile_columns(&manager).await.unwrap();
        assert!(again.is_empty());
    }
}
