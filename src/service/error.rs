use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    /// The database could not be opened or its schema brought up to date.
    #[error("snippet store unavailable: {0}")]
    Unavailable(#[source] DbErr),
    /// No live row for the id, carried exactly as the caller supplied it.
    #[error("Snippet with ID: {0} not found")]
    NotFound(String),
    #[error("{0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    pub(crate) fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }
}
