use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Snippet::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Snippet::Id)
                    .integer()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(Snippet::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Snippet::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            );

        for (_, mut column) in additive_columns() {
            table.col(&mut column);
        }

        manager.create_table(table.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Snippet::Table).if_exists().to_owned())
            .await
    }
}

/// Columns that can be added to an existing `snippets` table without a rewrite.
///
/// Every entry must be nullable or carry a constant default, since SQLite
/// refuses `ADD COLUMN ... NOT NULL` otherwise.
pub(crate) fn additive_columns() -> Vec<(Snippet, ColumnDef)> {
    vec![
        (
            Snippet::Title,
            ColumnDef::new(Snippet::Title)
                .string()
                .not_null()
                .default("")
                .to_owned(),
        ),
        (
            Snippet::Body,
            ColumnDef::new(Snippet::Body)
                .text()
                .not_null()
                .default("")
                .to_owned(),
        ),
        (
            Snippet::DeletedAt,
            ColumnDef::new(Snippet::DeletedAt)
                .timestamp_with_time_zone()
                .null()
                .to_owned(),
        ),
    ]
}

#[derive(DeriveIden)]
pub(crate) enum Snippet {
    #[sea_orm(iden = "snippets")]
    Table,
    Id,
    Title,
    Body,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
