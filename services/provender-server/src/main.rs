//! Provender Server
//!
//! Runs the settlement process plus one HTTP process per built-in vendor
//! on consecutive ports:
//!
//! ```bash
//! # settlement on 8080, vendors on 8081 and 8082
//! provender-server
//!
//! # custom base port and a flakier settlement rail
//! provender-server --port 9000 --settlement-success 0.5
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use provender_api::{settlement_router, vendor_router, with_middleware};
use provender_catalog::{premium_catalog, standard_catalog};
use provender_settlement::{SettlementService, SimulatedBackend};
use provender_vendor::{Vendor, VendorProfile};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Provender - vendor negotiation and signed-mandate settlement
#[derive(Parser, Debug)]
#[command(name = "provender-server", about, version)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1", env = "PROVENDER_HOST")]
    host: String,

    /// Base port; settlement binds here, vendors on the ports after it
    #[arg(short, long, default_value = "8080", env = "PROVENDER_PORT")]
    port: u16,

    /// Simulated settlement resolution delay in milliseconds
    #[arg(long, default_value = "2000", env = "PROVENDER_SETTLEMENT_DELAY_MS")]
    settlement_delay_ms: u64,

    /// Simulated settlement success probability (0.0 - 1.0)
    #[arg(long, default_value = "0.9", env = "PROVENDER_SETTLEMENT_SUCCESS")]
    settlement_success: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "provender_server=info,provender_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Provender");

    let backend = Arc::new(SimulatedBackend::new(
        Duration::from_millis(args.settlement_delay_ms),
        args.settlement_success,
    ));
    let settlement = with_middleware(settlement_router(SettlementService::new(backend)));

    let vendors = vec![
        {
            let profile = VendorProfile::standard();
            let catalog = standard_catalog(profile.id.clone());
            Vendor::new(profile, catalog)
        },
        {
            let profile = VendorProfile::premium();
            let catalog = premium_catalog(profile.id.clone());
            Vendor::new(profile, catalog)
        },
    ];

    let mut port = args.port;
    let settlement_addr: SocketAddr = format!("{}:{}", args.host, port).parse()?;
    tracing::info!("Settlement listening on {settlement_addr}");

    for vendor in vendors {
        port += 1;
        let addr: SocketAddr = format!("{}:{}", args.host, port).parse()?;
        tracing::info!("Vendor '{}' listening on {addr}", vendor.profile.id);
        let router = with_middleware(vendor_router(vendor));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("vendor server exited: {e}");
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(settlement_addr).await?;
    axum::serve(listener, settlement).await?;

    Ok(())
}
