use crate::persistence::{SnippetActiveModel, SnippetColumn, SnippetEntity, SnippetModel};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    sea_query::Expr,
};

pub(crate) struct SnippetRepository;

impl SnippetRepository {
    pub(crate) async fn list_live<C>(db: &C) -> Result<Vec<SnippetModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        SnippetEntity::find()
            .filter(SnippetColumn::DeletedAt.is_null())
            .order_by_asc(SnippetColumn::Id)
            .all(db)
            .await
    }

    pub(crate) async fn find_live_by_id<C>(db: &C, id: i32) -> Result<Option<SnippetModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        SnippetEntity::find_by_id(id)
            .filter(SnippetColumn::DeletedAt.is_null())
            .one(db)
            .await
    }

    pub(crate) async fn insert_and_reload<C>(
        db: &C,
        active_model: SnippetActiveModel,
    ) -> Result<Option<SnippetModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        let insert_result = SnippetEntity::insert(active_model).exec(db).await?;

        SnippetEntity::find_by_id(insert_result.last_insert_id)
            .one(db)
            .await
    }

    pub(crate) async fn update<C>(
        db: &C,
        active_model: SnippetActiveModel,
    ) -> Result<SnippetModel, DbErr>
    where
        C: ConnectionTrait,
    {
        active_model.update(db).await
    }

    /// Marks a live row as deleted. Returns 0 when the row is missing or was
    /// already deleted.
    pub(crate) async fn soft_delete_by_id<C>(
        db: &C,
        id: i32,
        deleted_at: DateTime<Utc>,
    ) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = SnippetEntity::update_many()
            .col_expr(SnippetColumn::DeletedAt, Expr::value(deleted_at))
            .filter(SnippetColumn::Id.eq(id))
            .filter(SnippetColumn::DeletedAt.is_null())
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
