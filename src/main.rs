//! Ducky alert light daemon
//!
//! Receives Alertmanager webhooks and drives the keyboard backlight: blinking
//! red while alerts fire, rainbow once everything has cleared.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use ducky_alertd::webhook::{self, WEBHOOK_PATH};
use ducky_alertd::{AlertCounter, SignalLoop};
use ducky_keyboard::Keyboard;
use ducky_transport::{HidDiscovery, TransportError};
use tracing::{error, info, warn};

// CLI definitions
mod cli;
use cli::Cli;

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    fmt().with_env_filter(filter).with_target(false).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let discovery = HidDiscovery::new().context("Failed to initialize hidapi")?;
    let transport = discovery
        .open_control()
        .inspect_err(|e| {
            if matches!(e, TransportError::HidPermissionDenied(_)) {
                warn!("Grant access to the 04d9:0348 hidraw nodes with a udev rule");
            }
        })
        .context("Failed to open keyboard")?;

    let kb = Keyboard::new(transport).with_read_timeout(cli.read_timeout_ms);
    let version = kb
        .get_firmware_version()
        .context("Failed to query firmware version")?;
    info!("Firmware version: {}", version);

    let addr = cli.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let counter = Arc::new(AlertCounter::new());
    let shutdown = Arc::new(AtomicBool::new(false));

    // HID I/O blocks, so the loop gets its own thread and owns the keyboard
    let signal = SignalLoop::new(kb, Arc::clone(&counter));
    let signal_shutdown = Arc::clone(&shutdown);
    let signal_thread = std::thread::Builder::new()
        .name("signal-loop".into())
        .spawn(move || signal.run(signal_shutdown))
        .context("Failed to spawn signal loop")?;

    info!("Listening on {} (POST {})", listener.local_addr()?, WEBHOOK_PATH);

    let served = axum::serve(listener, webhook::router(counter))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // Stop the loop before returning so the device closes on every path
    shutdown.store(true, Ordering::SeqCst);
    if signal_thread.join().is_err() {
        warn!("Signal loop panicked");
    }

    served.context("HTTP server failed")?;
    info!("Done.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
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
    info!("Shutting down");
}
