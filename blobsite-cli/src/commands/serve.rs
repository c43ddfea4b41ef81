//! Serve command - answer HTTP requests from the site registry.
//!
//! Every request is offered to the gateway. Declined requests (other
//! methods, unregistered paths) get a 404; everything else gets the
//! gateway's response, including its 502 on exhausted retrieval.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::Extension;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use blobsite::gateway::{GatewayError, Interception, SiteGateway, SiteRequest, SiteResponse};
use blobsite::transport::{AsyncHttpClient, AsyncReqwestClient};
use tracing::{error, info, warn};

use super::common::{build_runtime, load_config, load_site, start_logging};
use crate::error::CliError;

type SharedGateway<C = AsyncReqwestClient> = Arc<SiteGateway<C>>;

/// Arguments for the serve command.
pub struct ServeArgs {
    pub config: Option<PathBuf>,
    pub bind: Option<String>,
    pub no_cache: bool,
    pub verbose: bool,
}

/// Run the serve command.
pub async fn run(args: ServeArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let _log_guard = start_logging(&config, args.verbose)?;

    let runtime = build_runtime(&config, !args.no_cache).await?;
    let summary = load_site(&runtime.gateway, &config)?;

    let mut events = runtime.hub.subscribe();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            info!(kind = event.kind(), ?event, "Site event");
        }
    });

    let gateway: SharedGateway = Arc::new(runtime.gateway);
    let status = gateway.status();
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());

    println!("Blobsite v{}", blobsite::VERSION);
    println!("================================");
    println!();
    println!("Listening:  http://{}", bind);
    println!("Resources:  {}", summary.registered);
    println!("Endpoints:  {}", status.endpoints.join(", "));
    println!(
        "Cache:      {}",
        status.cache.as_deref().unwrap_or("disabled")
    );
    println!();
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .map_err(|e| CliError::Server(format!("cannot bind {}: {}", bind, e)))?;

    let app = Router::new()
        .fallback(handle_site::<AsyncReqwestClient>)
        .layer(Extension(Arc::clone(&gateway)));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CliError::Server(e.to_string()))?;

    info!(
        pending = gateway.pending_writes(),
        "Server stopped, waiting for background cache writes"
    );
    gateway.settle().await;
    Ok(())
}

async fn handle_site<C: AsyncHttpClient + 'static>(
    Extension(gateway): Extension<SharedGateway<C>>,
    method: Method,
    uri: Uri,
) -> Response {
    let request = SiteRequest::new(method.as_str(), uri.to_string());

    match gateway.handle(&request).await {
        Ok(Interception::Respond(response)) => into_http(response),
        Ok(Interception::Declined) => (StatusCode::NOT_FOUND, "not found\n").into_response(),
        Err(GatewayError::NotInitialized) => {
            (StatusCode::SERVICE_UNAVAILABLE, "site not loaded\n").into_response()
        }
        Err(e) => {
            error!(request = %request, error = %e, "Request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

fn into_http(response: SiteResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (
        status,
        [(header::CONTENT_TYPE, response.content_type)],
        response.body,
    )
        .into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl+C; stop the process to exit");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
