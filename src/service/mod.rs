pub(crate) mod error;
pub(crate) mod snippet_store;
