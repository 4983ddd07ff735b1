use crate::persistence::{SnippetModel, SnippetPayload};
use crate::repository::snippet_repository::SnippetRepository;
use crate::service::error::StoreError;
use chrono::{DateTime, TimeDelta, Utc};
use migration::{Migrator, MigratorTrait, SchemaManager, reconcile_columns};
use sea_orm::{
    ActiveValue::Set, Database, DatabaseConnection, DbErr, IntoActiveModel, TransactionTrait,
};
use std::{path::Path, sync::Arc};
use tracing::{info, warn};

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

/// Path ids that do not fit the primary key can never match a row.
fn parse_id(raw_id: &str) -> Result<i32, StoreError> {
    raw_id
        .parse::<i32>()
        .map_err(|_| StoreError::not_found(raw_id))
}

/// `updated_at` must move forward on every write, even when two writes land
/// inside the same clock tick.
fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + TimeDelta::microseconds(1))
}

/// Owner of the snippet database handle. Cloning shares the same pool.
#[derive(Clone)]
pub(crate) struct SnippetStore {
    db: Arc<DatabaseConnection>,
}

impl SnippetStore {
    /// Opens (creating if missing) the SQLite file at `path` and brings the
    /// `snippets` schema up to date.
    pub(crate) async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let db = Database::connect(sqlite_url(path))
            .await
            .map_err(StoreError::Unavailable)?;

        Migrator::up(&db, None)
            .await
            .map_err(StoreError::Unavailable)?;

        let added = reconcile_columns(&SchemaManager::new(&db))
            .await
            .map_err(StoreError::Unavailable)?;
        for column in &added {
            info!(column = %column, "Added missing column to snippets table");
        }

        info!(path = %path.display(), "Snippet store opened");
        Ok(Self { db: Arc::new(db) })
    }

    pub(crate) async fn list(&self) -> Result<Vec<SnippetModel>, StoreError> {
        Ok(SnippetRepository::list_live(self.db.as_ref()).await?)
    }

    pub(crate) async fn get(&self, raw_id: &str) -> Result<SnippetModel, StoreError> {
        let id = parse_id(raw_id)?;
        SnippetRepository::find_live_by_id(self.db.as_ref(), id)
            .await?
            .ok_or_else(|| StoreError::not_found(raw_id))
    }

    pub(crate) async fn create(&self, payload: SnippetPayload) -> Result<SnippetModel, StoreError> {
        let now = Utc::now();
        let mut active_model = payload.into_active_model();
        active_model.created_at = Set(now);
        active_model.updated_at = Set(now);
        active_model.deleted_at = Set(None);

        SnippetRepository::insert_and_reload(self.db.as_ref(), active_model)
            .await?
            .ok_or_else(|| {
                StoreError::Database(DbErr::RecordNotFound(
                    "failed to reload newly created snippet".to_string(),
                ))
            })
    }

    pub(crate) async fn update(
        &self,
        raw_id: &str,
        payload: SnippetPayload,
    ) -> Result<SnippetModel, StoreError> {
        let id = parse_id(raw_id)?;
        let txn = self.db.begin().await?;

        let Some(existing) = SnippetRepository::find_live_by_id(&txn, id).await? else {
            return Err(StoreError::not_found(raw_id));
        };

        let updated_at = next_updated_at(existing.updated_at);
        let mut active_model = existing.into_active_model();
        payload.apply_to(&mut active_model);
        active_model.updated_at = Set(updated_at);

        let updated = SnippetRepository::update(&txn, active_model).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Soft-deletes the row and returns its image from before the delete.
    pub(crate) async fn delete(&self, raw_id: &str) -> Result<SnippetModel, StoreError> {
        let id = parse_id(raw_id)?;
        let txn = self.db.begin().await?;

        let Some(existing) = SnippetRepository::find_live_by_id(&txn, id).await? else {
            return Err(StoreError::not_found(raw_id));
        };

        let rows_affected = SnippetRepository::soft_delete_by_id(&txn, id, Utc::now()).await?;
        if rows_affected == 0 {
            return Err(StoreError::not_found(raw_id));
        }

        txn.commit().await?;
        Ok(existing)
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    pub(crate) async fn close(self) -> Result<(), StoreError> {
        match Arc::try_unwrap(self.db) {
            Ok(db) => db.close().await?,
            Err(_) => {
                warn!("Snippet store still shared at close; pool is released with the last handle")
            }
        }

        info!("Snippet store closed");
        Ok(())
    }
}
