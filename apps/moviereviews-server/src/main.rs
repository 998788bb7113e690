//! Movie reviews server.
//!
//! Serves the movie reviews REST API over HTTP/1.1 and HTTP/2.
//!
//! # Usage
//!
//! ```text
//! SESSION_SECRET=change-me moviereviews-server
//! moviereviews-server --issue-session alice
//! moviereviews-server --health-check
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SERVER_LISTEN` | `0.0.0.0:3000` | Bind address |
//! | `SESSION_SECRET` | *(unset)* | HMAC key for session tokens; writes are refused without it |
//! | `SESSION_TTL_SECS` | `3600` | Lifetime of tokens minted by `--issue-session` |
//! | `SKIP_AUTHORIZATION` | `false` | Let writes through without a session |
//! | `MAX_BODY_BYTES` | `65536` | Largest accepted request body |
//! | `REVIEWS_STORAGE` | `memory` | `memory` or `dynamodb` |
//! | `REVIEWS_TABLE_NAME` | `Reviews` | DynamoDB table |
//! | `TRANSLATE_ENABLED` | `false` | Call the translation service |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use moviereviews_auth::{Authorizer, SessionCookieAuthorizer, SessionSigner};
use moviereviews_core::config::ReviewsConfig;
use moviereviews_core::handler::MovieReviewsHandler;
use moviereviews_core::provider::MovieReviews;
use moviereviews_http::service::DEFAULT_MAX_BODY_BYTES;
use moviereviews_http::{ReviewHttpConfig, ReviewHttpService};

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_LISTEN: &str = "0.0.0.0:3000";
const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// Process-level settings that sit outside [`ReviewsConfig`].
#[derive(Clone)]
struct ServerConfig {
    listen_addr: String,
    log_level: String,
    session_secret: Option<String>,
    session_ttl_secs: i64,
    skip_authorization: bool,
    max_body_bytes: usize,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("listen_addr", &self.listen_addr)
            .field("log_level", &self.log_level)
            .field("session_secret", &self.session_secret.as_ref().map(|_| "***"))
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("skip_authorization", &self.skip_authorization)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl ServerConfig {
    fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            listen_addr: var("SERVER_LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.to_owned()),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_owned()),
            session_secret: var("SESSION_SECRET"),
            session_ttl_secs: var("SESSION_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),
            skip_authorization: var("SKIP_AUTHORIZATION").is_some_and(|v| parse_bool(&v)),
            max_body_bytes: var("MAX_BODY_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
        }
    }

    fn signer(&self) -> Option<SessionSigner> {
        self.session_secret.as_deref().map(SessionSigner::new)
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the [`ReviewHttpConfig`] from the server settings.
fn build_http_config(config: &ServerConfig) -> ReviewHttpConfig {
    let authorizer = config
        .signer()
        .map(|signer| Arc::new(SessionCookieAuthorizer::new(signer)) as Arc<dyn Authorizer>);

    if authorizer.is_none() && !config.skip_authorization {
        warn!("SESSION_SECRET is not set, write operations will be refused");
    }

    ReviewHttpConfig {
        skip_authorization: config.skip_authorization,
        authorizer,
        max_body_bytes: config.max_body_bytes,
    }
}

/// Mint a session token for `username` valid for the configured lifetime.
fn issue_session_token(config: &ServerConfig, username: &str, now: i64) -> Result<String> {
    let signer = config
        .signer()
        .context("SESSION_SECRET must be set to issue session tokens")?;
    anyhow::ensure!(!username.is_empty(), "username must not be empty");
    Ok(signer.issue(username, now + config.session_ttl_secs))
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(
    listener: TcpListener,
    service: ReviewHttpService<MovieReviewsHandler>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Perform a health check by requesting the health endpoint.
///
/// Succeeds if the response is 200 OK and reports the reviews service running.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

/// Value following `flag` on the command line, if the flag is present.
fn flag_value(args: &[String], flag: &str) -> Option<Option<String>> {
    let pos = args.iter().position(|a| a == flag)?;
    Some(args.get(pos + 1).cloned())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Handle --health-check flag for Docker HEALTHCHECK.
    if args.iter().any(|a| a == "--health-check") {
        let addr = config.listen_addr.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    if let Some(username) = flag_value(&args, "--issue-session") {
        let username = username.context("usage: moviereviews-server --issue-session <username>")?;
        let token = issue_session_token(&config, &username, chrono::Utc::now().timestamp())?;
        println!("{token}");
        return Ok(());
    }

    init_tracing(&config.log_level)?;

    let reviews_config = ReviewsConfig::from_env();
    info!(
        storage = ?reviews_config.storage,
        table = %reviews_config.table_name,
        region = %reviews_config.region,
        translate_enabled = reviews_config.translate_enabled,
        "initializing movie reviews service",
    );

    let provider = MovieReviews::from_config(&reviews_config);
    let handler = MovieReviewsHandler::new(Arc::new(provider));
    let http_config = build_http_config(&config);
    info!(
        skip_authorization = http_config.skip_authorization,
        max_body_bytes = http_config.max_body_bytes,
        "configured HTTP layer",
    );
    let service = ReviewHttpService::new(Arc::new(handler), http_config);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.listen_addr))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, version = VERSION, "starting movie reviews server");

    serve(listener, service).await
}
