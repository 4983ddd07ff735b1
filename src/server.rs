//! Server bootstrap: listen address, middleware assembly and the serve loop.

use crate::handler::{HttpError, is_snippet_route};
use crate::logging::structured_logging_middleware;
use axum::{
    Router,
    extract::Request,
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use tracing::{error, info};

#[derive(Debug, Clone)]
pub(crate) struct ServerConfig {
    pub(crate) addr: String,
}

impl ServerConfig {
    pub(crate) fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// Only rejects what can never bind. Host names and port 0 are left to
    /// the resolver and the OS.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.addr.trim().is_empty() {
            return Err(ConfigError::EmptyAddress);
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("Empty listen address")]
    EmptyAddress,
}

pub(crate) struct Server {
    config: ServerConfig,
    router: Router,
}

impl Server {
    pub(crate) fn new(config: ServerConfig, router: Router) -> Self {
        Self { config, router }
    }

    /// Binds the listener and serves until Ctrl+C or SIGTERM.
    pub(crate) async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = self.bind().await?;
        let addr = listener.local_addr()?;
        info!(addr = %addr, "Server listening on http://{}", addr);

        axum::serve(listener, build_app(self.router))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }

    async fn bind(&self) -> Result<tokio::net::TcpListener, Box<dyn std::error::Error>> {
        self.config
            .validate()
            .map_err(|e| format!("Invalid server configuration: {e}"))?;

        let addr = self.config.addr.as_str();
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!(addr = %addr, error = %e, "Failed to bind listener");
            e
        })?;
        Ok(listener)
    }
}

/// Finalizes the routed app: fallback first, so every layer below also wraps
/// unmatched requests.
pub(crate) fn build_app(router: Router) -> Router {
    router
        .fallback(fallback_handler)
        .layer(middleware::from_fn(redirect_trailing_slash))
        .layer(middleware::from_fn(structured_logging_middleware))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

async fn fallback_handler() -> HttpError {
    HttpError::not_found("404 page not found")
}

/// `/snippets/` and `/snippets/1/` are answered with a 301 to the path
/// without trailing slashes. Paths that would not match a route after
/// trimming fall through to the 404.
async fn redirect_trailing_slash(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/');
        if is_snippet_route(trimmed) {
            let location = match request.uri().query() {
                Some(query) => format!("{trimmed}?{query}"),
                None => trimmed.to_string(),
            };
            return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)])
                .into_response();
        }
    }

    next.run(request).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM signal handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "Ctrl+C",
        _ = terminate => "SIGTERM",
    };

    info!(signal, "Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get};
    use tower::ServiceExt;

    #[test]
    fn accepts_addresses_the_resolver_handles() {
        for addr in ["127.0.0.1:8080", "localhost:8080", "[::1]:8080", "127.0.0.1:0"] {
            ServerConfig::new(addr)
                .validate()
                .unwrap_or_else(|e| panic!("{addr} should be accepted: {e}"));
        }
    }

    #[test]
    fn rejects_empty_address() {
        assert!(matches!(
            ServerConfig::new("").validate(),
            Err(ConfigError::EmptyAddress)
        ));
        assert!(matches!(
            ServerConfig::new("   ").validate(),
            Err(ConfigError::EmptyAddress)
        ));
    }

    #[tokio::test]
    async fn binds_host_names_and_ephemeral_ports() {
        let server = Server::new(ServerConfig::new("localhost:0"), Router::new());

        let listener = server.bind().await.expect("localhost:0 should bind");
        let addr = listener.local_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn unresolvable_address_fails_to_bind() {
        let server = Server::new(ServerConfig::new("no-port-here"), Router::new());
        assert!(server.bind().await.is_err());
    }

    #[tokio::test]
    async fn root_path_is_not_redirected() {
        let app = build_app(Router::new().route("/", get(|| async { "ok" })));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn repeated_trailing_slashes_collapse() {
        let app = build_app(Router::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/snippets//")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some("/snippets")
        );
    }

    #[tokio::test]
    async fn unregistered_paths_are_not_redirected() {
        for uri in ["/nope/", "/snippetsx/", "/snippets/1/2/"] {
            let response = build_app(Router::new())
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            assert!(response.headers().get(header::LOCATION).is_none(), "{uri}");
        }
    }
}
