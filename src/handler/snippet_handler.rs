use crate::handler::{HttpError, json_response};
use crate::logging::RequestId;
use crate::persistence::{SnippetModel, SnippetPayload};
use crate::service::{error::StoreError, snippet_store::SnippetStore};
use axum::{
    Router,
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
    response::Response,
    routing::get,
};
use tracing::{error, warn};

pub(crate) fn router(store: SnippetStore) -> Router {
    let list_store = store.clone();
    let create_store = store.clone();
    let get_store = store.clone();
    let update_store = store.clone();
    let delete_store = store;

    Router::new()
        .route(
            "/snippets",
            get(move |Extension(request_id): Extension<RequestId>| {
                list_snippets(list_store.clone(), request_id)
            })
            .post(
                move |Extension(request_id): Extension<RequestId>, body: Bytes| {
                    create_snippet(create_store.clone(), request_id, body)
                },
            ),
        )
        .route(
            "/snippets/{id}",
            get(
                move |Path(id): Path<String>, Extension(request_id): Extension<RequestId>| {
                    get_snippet(get_store.clone(), request_id, id)
                },
            )
            .patch(
                move |Path(id): Path<String>,
                      Extension(request_id): Extension<RequestId>,
                      body: Bytes| {
                    update_snippet(update_store.clone(), request_id, id, body)
                },
            )
            .delete(
                move |Path(id): Path<String>, Extension(request_id): Extension<RequestId>| {
                    delete_snippet(delete_store.clone(), request_id, id)
                },
            ),
        )
}

/// Whether `path` has the shape of `/snippets` or `/snippets/{id}`.
pub(crate) fn is_snippet_route(path: &str) -> bool {
    match path.strip_prefix("/snippets") {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('/')
            .is_some_and(|id| !id.is_empty() && !id.contains('/')),
        None => false,
    }
}

fn decode_payload(request_id: &RequestId, body: &[u8]) -> Result<SnippetPayload, HttpError> {
    SnippetPayload::from_slice(body).map_err(|error| {
        warn!(request_id = %request_id.0, error = %error, "Decode error");
        HttpError::bad_request(error.to_string())
    })
}

/// Any failure to look the row up is reported as a missing snippet.
async fn find_snippet(
    store: &SnippetStore,
    request_id: &RequestId,
    id: &str,
) -> Result<SnippetModel, HttpError> {
    store.get(id).await.map_err(|error| {
        if !matches!(error, StoreError::NotFound(_)) {
            error!(request_id = %request_id.0, id = %id, error = %error, "Error retrieving snippet");
        }
        HttpError::snippet_not_found(id)
    })
}

async fn list_snippets(store: SnippetStore, request_id: RequestId) -> Result<Response, HttpError> {
    // A failed listing answers 404 rather than 500; clients rely on it.
    let snippets = store.list().await.map_err(|error| {
        error!(request_id = %request_id.0, error = %error, "Error retrieving snippets");
        HttpError::not_found(error.to_string())
    })?;
    json_response(StatusCode::OK, &snippets)
}

async fn create_snippet(
    store: SnippetStore,
    request_id: RequestId,
    body: Bytes,
) -> Result<Response, HttpError> {
    let payload = decode_payload(&request_id, &body)?;
    let snippet = store.create(payload).await.map_err(|error| {
        error!(request_id = %request_id.0, error = %error, "Error creating snippet");
        HttpError::bad_request(error.to_string())
    })?;
    json_response(StatusCode::CREATED, &snippet)
}

async fn get_snippet(
    store: SnippetStore,
    request_id: RequestId,
    id: String,
) -> Result<Response, HttpError> {
    let snippet = find_snippet(&store, &request_id, &id).await?;
    json_response(StatusCode::OK, &snippet)
}

async fn update_snippet(
    store: SnippetStore,
    request_id: RequestId,
    id: String,
    body: Bytes,
) -> Result<Response, HttpError> {
    find_snippet(&store, &request_id, &id).await?;
    let payload = decode_payload(&request_id, &body)?;

    let snippet = store
        .update(&id, payload)
        .await
        .map_err(|error| match error {
            StoreError::NotFound(_) => HttpError::snippet_not_found(&id),
            other => {
                error!(request_id = %request_id.0, id = %id, error = %other, "Error updating snippet");
                HttpError::bad_request(other.to_string())
            }
        })?;
    json_response(StatusCode::OK, &snippet)
}

async fn delete_snippet(
    store: SnippetStore,
    request_id: RequestId,
    id: String,
) -> Result<Response, HttpError> {
    find_snippet(&store, &request_id, &id).await?;

    let snippet = store.delete(&id).await.map_err(|error| match error {
        StoreError::NotFound(_) => HttpError::snippet_not_found(&id),
        other => {
            error!(request_id = %request_id.0, id = %id, error = %other, "Error deleting snippet");
            HttpError::bad_request(format!("Error deleting snippet: {other}"))
        }
    })?;
    json_response(StatusCode::OK, &snippet)
}
