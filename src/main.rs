//! approuter demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                     APPROUTER                        │
//!                     │                                                      │
//!   Client Request    │  ┌─────────┐   ┌──────────┐   ┌──────────────────┐   │
//!   ──────────────────┼─▶│  http   │──▶│ routing  │──▶│ registry/matcher │   │
//!                     │  │ server  │   │ dispatch │   │ method → template│   │
//!                     │  └─────────┘   └────┬─────┘   └──────────────────┘   │
//!                     │                     │                                │
//!                     │        ┌────────────┴────────────┐                   │
//!                     │        ▼                         ▼                   │
//!                     │  ┌────────────┐           ┌────────────┐             │
//!   Client Response   │  │  buffered  │           │ raw (file) │             │
//!   ◀─────────────────┼──│ app handle │           │   handle   │             │
//!                     │  └────────────┘           └────────────┘             │
//!                     │                                                      │
//!                     │  Cross-cutting: config · security hook ·             │
//!                     │                 observability · lifecycle            │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use serde_json::json;

use approuter::http::{AppError, RequestIdExt};
use approuter::lifecycle::{signals, startup, Shutdown};
use approuter::observability::init_logging;
use approuter::security::Session;
use approuter::HttpServer;

#[derive(Parser)]
#[command(name = "approuter")]
#[command(about = "Minimal HTTP request router", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = startup::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability)?;
    tracing::info!("approuter v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        root = %config.routing.root,
        api_prefix = %config.routing.api_prefix,
        auth = config.security.api_key.is_some(),
        "Configuration loaded"
    );

    let router = startup::configure_router(&config)
        .get("/", |w, _req, _ps| {
            w.write_all(b"<html><body>Hello World!</body></html>")?;
            Ok(())
        })
        .get("/healthz", |w, _req, _ps| {
            w.write_all(b"ok")?;
            Ok(())
        })
        .get("/api/latest/:entry/:tag/:offset", |w, req, ps| {
            let offset: u32 = ps
                .require("offset")?
                .parse()
                .map_err(|_| AppError::bad_request("offset must be a number"))?;
            let body = json!({
                "entry": ps.require("entry")?,
                "tag": ps.require("tag")?,
                "offset": offset,
                "request_id": req.request_id(),
            });
            serde_json::to_writer(w, &body).map_err(AppError::other)
        })
        .get("/api/latest/:entry/:offset", |w, req, ps| {
            let body = json!({
                "entry": ps.require("entry")?,
                "offset": ps.require("offset")?,
                "request_id": req.request_id(),
            });
            serde_json::to_writer(w, &body).map_err(AppError::other)
        })
        .get("/api/session", |w, req, _ps| {
            let path = req
                .extensions()
                .get::<Session>()
                .map(|s| s.path.as_str())
                .unwrap_or("anonymous");
            write!(w, "session for {}", path)?;
            Ok(())
        })
        .build();

    let listener = startup::bind(&config).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, router);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
