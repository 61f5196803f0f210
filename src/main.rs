//! Taper Schedule Generator (tapergen)
//!
//! HTTP server exposing the taper engine.

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use tapergen::api;
use tapergen::build_info;

/// Get the bind address from environment or use default
fn get_bind_address() -> SocketAddr {
    std::env::var("TAPERGEN_BIND")
        .ok()
        .and_then(|addr| addr.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 5000)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tapergen=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();

    let addr = get_bind_address();
    let app = api::create_router();

    tracing::info!(%addr, "starting HTTP server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
