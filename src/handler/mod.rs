mod error_mapper;
pub(crate) mod snippet_handler;

pub(crate) use error_mapper::HttpError;
pub(crate) use snippet_handler::is_snippet_route;

use crate::service::snippet_store::SnippetStore;
use axum::{
    Router,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub(crate) fn api_router(store: SnippetStore) -> Router {
    Router::new().merge(snippet_handler::router(store))
}

pub(super) fn json_response<T: Serialize>(
    status: StatusCode,
    data: &T,
) -> Result<Response, HttpError> {
    let body =
        serde_json::to_vec(data).map_err(|error| HttpError::internal(error.to_string()))?;
    Ok((status, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}
