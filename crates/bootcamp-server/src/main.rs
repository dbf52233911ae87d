mod config;

use std::net::SocketAddr;
use std::pin::pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bootcamp_http::{BootcampHttp, GeocodeError, Geocoder, NoopGeocoder, StaticGeocoder};
use bootcamp_store::{MemoryStore, RedbStore, Store, StoreError};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::signal::unix::{SignalKind, signal};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
    #[error("failed to load geocoder table: {0}")]
    Geocoder(#[from] GeocodeError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}

async fn handle(
    req: Request<Incoming>,
    handler: Arc<BootcampHttp>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let body_bytes = body.collect().await?.to_bytes().to_vec();
    let http_req = Request::from_parts(parts, body_bytes);
    let method = http_req.method().clone();
    let uri = http_req.uri().clone();

    // Store calls block; keep them off the async workers.
    let http_resp = match tokio::task::spawn_blocking(move || handler.handle(http_req)).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(%method, %uri, error = %e, "handler panicked");
            let mut resp = Response::new(
                br#"{"success":false,"message":"Server Error"}"#.to_vec(),
            );
            *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            resp
        }
    };

    tracing::info!(
        %method,
        %uri,
        status = http_resp.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );

    let (parts, body_bytes) = http_resp.into_parts();
    Ok(Response::from_parts(
        parts,
        Full::new(Bytes::from(body_bytes)),
    ))
}

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Keep calling `accept` until it yields a connection. Failures such as
/// EMFILE or ECONNABORTED are logged and retried after `backoff`.
async fn accept_with_retry<F, Fut, T, E>(mut accept: F, backoff: Duration) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(T, SocketAddr), E>>,
    E: std::fmt::Display,
{
    loop {
        match accept().await {
            Ok((stream, _)) => return stream,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                tokio::time::sleep(backoff).await;
            }
        }
    }
}

async fn shutdown_signal() {
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = terminate => {}
        _ = tokio::signal::ctrl_c() => {}
    }
}

fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.environment.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn open_store(config: &ServerConfig) -> Result<Box<dyn Store>, StartupError> {
    match &config.db_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "opening redb store");
            Ok(Box::new(RedbStore::open(path)?))
        }
        None => {
            tracing::warn!("BOOTCAMPS_DB_PATH not set; using an in-memory store");
            Ok(Box::new(MemoryStore::new()))
        }
    }
}

fn open_geocoder(config: &ServerConfig) -> Result<Box<dyn Geocoder>, StartupError> {
    match &config.geocoder_table {
        Some(path) => {
            let geocoder = StaticGeocoder::from_file(path)?;
            tracing::info!(path = %path.display(), zipcodes = geocoder.len(), "loaded geocoder table");
            Ok(Box::new(geocoder))
        }
        None => {
            tracing::warn!("BOOTCAMPS_GEOCODER_TABLE not set; radius search will find no zipcodes");
            Ok(Box::new(NoopGeocoder))
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), StartupError> {
    let handler = Arc::new(BootcampHttp::new(
        open_store(&config)?,
        open_geocoder(&config)?,
    ));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: bind_addr.clone(),
            source,
        })?;

    tracing::info!(addr = %bind_addr, env = %config.environment, "listening");

    let http = http1::Builder::new();
    let graceful = GracefulShutdown::new();
    let mut signal = pin!(shutdown_signal());

    loop {
        tokio::select! {
            stream = accept_with_retry(|| listener.accept(), ACCEPT_BACKOFF) => {
                let io = TokioIo::new(stream);
                let handler = Arc::clone(&handler);
                let conn = http.serve_connection(io, service_fn(move |req| {
                    let handler = Arc::clone(&handler);
                    handle(req, handler)
                }));
                let fut = graceful.watch(conn);
                tokio::spawn(async move {
                    if let Err(e) = fut.await {
                        tracing::debug!(error = %e, "connection error");
                    }
                });
            }
            _ = &mut signal => {
                tracing::info!("shutdown signal received");
                drop(listener);
                break;
            }
        }
    }

    let timeout = config.shutdown_timeout;
    tokio::select! {
        _ = graceful.shutdown() => {
            tracing::info!("shutdown complete");
        }
        _ = tokio::time::sleep(timeout) => {
            tracing::warn!(timeout_secs = timeout.as_secs(), "shutdown timed out");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("{e}");
        std::process::exit(1);
    });
    init_tracing(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[tokio::test]
    async fn accept_errors_do_not_stop_the_loop() {
        let addr: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        let mut attempts = 0;
        let stream = accept_with_retry(
            || {
                attempts += 1;
                let result = if attempts < 3 {
                    Err(io::Error::from_raw_os_error(24))
                } else {
                    Ok((attempts, addr))
                };
                std::future::ready(result)
            },
            Duration::ZERO,
        )
        .await;
        assert_eq!(stream, 3);
    }
}
