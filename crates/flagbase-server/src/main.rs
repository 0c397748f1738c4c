//! flagbase server: items and feature flags over HTTP/JSON and gRPC.
//!
//! Reads configuration from environment variables (see [`Config`]), opens
//! (or creates) the SQLite store, then serves the REST API and the gRPC
//! services concurrently until one listener fails or SIGINT arrives.
//!
//! ## Quick start
//!
//! ```bash
//! # Development (./data.db, HTTP 8080, gRPC 50051, info log)
//! cargo run --bin flagbase-server --release
//!
//! # Custom config
//! FLAGBASE_DB_PATH=/var/lib/flagbase/data.db \
//! FLAGBASE_HTTP_PORT=9080 \
//! FLAGBASE_LOG_LEVEL=debug \
//!   cargo run --bin flagbase-server --release
//! ```

use std::net::SocketAddr;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use flagbase_api::{FeatureServer, ItemServer, FLAGBASE_DESCRIPTOR};
use flagbase_server::config::Config;
use flagbase_server::{build_state, rest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Tracing ───────────────────────────────────────────────────────────────
    let config = Config::from_env();

    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .compact()
        .init();

    info!(
        version   = env!("CARGO_PKG_VERSION"),
        db_path   = %config.db_path,
        http_port = config.http_port,
        grpc_port = config.grpc_port,
        "flagbase starting"
    );

    // ── Store + repositories ──────────────────────────────────────────────────
    let state = build_state(&config)
        .map_err(|e| anyhow::anyhow!("failed to open store at {}: {e}", config.db_path))?;

    if config.force_active_on_create {
        warn!("FLAGBASE_FORCE_ACTIVE_ON_CREATE=true: features created with active=false are stored as active");
    }

    // ── gRPC server ───────────────────────────────────────────────────────────
    let grpc_addr: SocketAddr = format!("0.0.0.0:{}", config.grpc_port).parse()?;
    let item_service = ItemServer::new(state.items.clone(), state.metrics.clone()).into_service();
    let feature_service =
        FeatureServer::new(state.features.clone(), state.metrics.clone()).into_service();

    let reflection = if config.grpc_reflection {
        Some(
            tonic_reflection::server::Builder::configure()
                .register_encoded_file_descriptor_set(FLAGBASE_DESCRIPTOR)
                .build_v1()?,
        )
    } else {
        info!("gRPC reflection disabled (FLAGBASE_GRPC_REFLECTION=false)");
        None
    };

    let grpc = tonic::transport::Server::builder()
        .add_optional_service(reflection)
        .add_service(item_service)
        .add_service(feature_service)
        .serve(grpc_addr);
    info!(addr = %grpc_addr, "gRPC server listening");

    // ── HTTP server ───────────────────────────────────────────────────────────
    let http = rest::serve(state, config.http_port);

    tokio::select! {
        result = grpc => {
            if let Err(e) = result {
                error!(error = %e, "gRPC server error");
                return Err(anyhow::anyhow!("gRPC server error: {e}"));
            }
        }
        result = http => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server error");
                return Err(anyhow::anyhow!("HTTP server error: {e}"));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received SIGINT, shutting down");
        }
    }

    info!("flagbase shutdown complete");
    Ok(())
}
