use crate::config::{Cli, DEFAULT_DB_PATH};
use crate::handler::api_router;
use crate::logging::init_logging;
use crate::server::{Server, ServerConfig};
use crate::service::snippet_store::SnippetStore;
use tracing::error;

pub(crate) async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let store = SnippetStore::open(DEFAULT_DB_PATH).await.inspect_err(|e| {
        error!(path = DEFAULT_DB_PATH, error = %e, "Failed to open snippet store");
    })?;

    let server = Server::new(ServerConfig::new(cli.addr), api_router(store.clone()));
    let served = server.start().await;
    if let Err(e) = &served {
        error!(error = %e, "Server terminated");
    }

    store.close().await?;
    served
}
