use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use htmlworks_core::{Config, RelativePath};
use htmlworks_renderer::{PageRenderer, RenderError};

use crate::error::{io_err, ServerError};
use crate::route;

/// How long in-flight requests may run after a shutdown signal.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct AppState {
    config: Arc<Config>,
}

/// Build the request router for `config`.
///
/// `/<resources_dir_name>/…` is served straight from the resources root;
/// every other path is rendered from the contents root on each request.
pub fn router(config: Config) -> Router {
    let prefix = format!("/{}", config.resources_dir_name());
    let resources = ServeDir::new(&config.directories.resources);

    Router::new()
        .nest_service(&prefix, resources)
        .fallback(render_page)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState {
            config: Arc::new(config),
        })
}

/// Start the dev server and block the current thread until it exits.
pub fn start_blocking(config: Config) -> Result<(), ServerError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(config, shutdown_signal()))
}

/// Bind `0.0.0.0:<port>` and serve until `shutdown` resolves.
pub async fn run<F>(config: Config, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    serve(listener, config, shutdown).await
}

/// Serve on an already-bound listener until `shutdown` resolves, then give
/// in-flight requests up to [`SHUTDOWN_GRACE`] to finish.
pub async fn serve<F>(listener: TcpListener, config: Config, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send,
{
    let addr = listener
        .local_addr()
        .map_err(|e| io_err("tcp-listener", e))?;
    info!("Start Server: http://localhost:{}/", addr.port());
    info!("Quit the server with CONTROL-C.");

    let app = router(config);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        _ = shutdown => {}
        finished = &mut server => {
            return finished?.map_err(|e| io_err("http-server", e));
        }
    }

    info!(
        "shutting down, waiting up to {}s for in-flight requests",
        SHUTDOWN_GRACE.as_secs()
    );
    let _ = stop_tx.send(());
    match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
        Ok(joined) => joined?.map_err(|e| io_err("http-server", e)),
        Err(_) => {
            warn!("grace window elapsed, dropping remaining connections");
            server.abort();
            Ok(())
        }
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

async fn render_page(State(state): State<AppState>, uri: Uri) -> Response {
    let started = Instant::now();
    let Some(rel) = route::to_relative_path(uri.path()) else {
        info!("not found: {}", uri.path());
        return not_found();
    };

    let contents = state.config.directories.contents.clone();
    let target = rel.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        let renderer = PageRenderer::load(&contents)?;
        renderer.render_file(&contents, &target)
    })
    .await;

    match rendered {
        Ok(Ok(body)) => {
            info!(
                "rendered {} ({} bytes, {}µs)",
                rel,
                body.len(),
                started.elapsed().as_micros()
            );
            let content_type = route::content_type(Path::new(rel.as_str()));
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Ok(Err(err)) => render_failure(&rel, err),
        Err(join) => {
            error!("render task for {rel} failed: {join}");
            internal_error()
        }
    }
}

fn render_failure(rel: &RelativePath, err: RenderError) -> Response {
    match err {
        RenderError::Io { .. } | RenderError::Scan(_) => {
            if err.is_missing_source() {
                info!("not found: {rel}");
            } else {
                warn!("cannot read {rel}: {}", err.detail());
            }
            not_found()
        }
        other => {
            error!("render failed for {rel}: {}", other.detail());
            internal_error()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "500 internal server error").into_response()
}
