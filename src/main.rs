use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cam_relay::config::{self, AppConfig};
use cam_relay::state::AppState;
use cam_relay::stream::attach_cameras;
use cam_relay::transport::{FrameSource, SyntheticSource};
use cam_relay::video::JpegEncoder;
use cam_relay::web;

/// Log level for the application
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Verbose,
    Debug,
    Trace,
}

/// cam-relay command line arguments
#[derive(Parser, Debug)]
#[command(name = "cam-relay")]
#[command(version, about = "Relay camera topics to browsers as MJPEG over HTTP", long_about = None)]
struct CliArgs {
    /// Path to a TOML configuration file (built-in defaults if omitted)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short = 'a', long, value_name = "ADDRESS")]
    address: Option<String>,

    /// HTTP port (overrides config)
    #[arg(short = 'p', long, value_name = "PORT")]
    http_port: Option<u16>,

    /// Maximum frames per second sent to each client (overrides config)
    #[arg(long, value_name = "FPS")]
    max_fps: Option<u32>,

    /// JPEG quality 1-100 (overrides config)
    #[arg(long, value_name = "QUALITY")]
    jpeg_quality: Option<u8>,

    /// Log level (error, warn, info, verbose, debug, trace)
    #[arg(short = 'l', long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,

    /// Increase verbosity (-v for verbose, -vv for debug, -vvv for trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl CliArgs {
    /// Apply command line overrides on top of the loaded configuration
    fn apply(&self, config: &mut AppConfig) {
        if let Some(address) = &self.address {
            config.web.bind_address = address.clone();
        }
        if let Some(port) = self.http_port {
            config.web.http_port = port;
        }
        if let Some(fps) = self.max_fps {
            config.stream.max_fps = fps;
        }
        if let Some(quality) = self.jpeg_quality {
            config.stream.jpeg_quality = quality;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    init_logging(args.log_level, args.verbose);

    tracing::info!("Starting cam-relay v{}", env!("CARGO_PKG_VERSION"));

    let mut config = config::load(args.config.as_deref()).await?;
    args.apply(&mut config);
    config.validate()?;

    let state = AppState::from_config(config.clone())?;
    tracing::info!(
        "Registered {} camera(s), streaming at up to {} fps",
        state.registry.len(),
        config.stream.max_fps
    );

    // Subscribe every camera before accepting connections
    let source = SyntheticSource::new(config.source.clone());
    tracing::info!("Subscribing cameras to {}:", source.name());
    let failures = attach_cameras(
        &state.registry,
        &source,
        Arc::new(JpegEncoder::new()),
        config.stream.jpeg_quality,
    );
    if !failures.is_empty() {
        tracing::warn!(
            "{} of {} camera(s) have no frame source",
            failures.len(),
            state.registry.len()
        );
        for e in &failures {
            tracing::warn!("  {}", e);
        }
    }

    let app = web::create_router(state.clone());

    let address = config.http_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Starting HTTP server on {}", listener.local_addr()?);
    for camera in state.registry.iter() {
        tracing::info!("  http://{}/stream/{}", address, camera.id());
    }

    // Open MJPEG streams never finish on their own, so the server future is
    // dropped on shutdown instead of drained
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for CTRL+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received");
    };

    tokio::select! {
        _ = shutdown_signal => {}
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                tracing::error!("HTTP server error: {}", e);
            }
        }
    }

    source.shutdown().await;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initialize logging with tracing
fn init_logging(level: LogLevel, verbose_count: u8) {
    // Verbose count overrides log level
    let effective_level = match verbose_count {
        0 => level,
        1 => LogLevel::Verbose,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    };

    let filter = match effective_level {
        LogLevel::Error => "cam_relay=error,tower_http=error",
        LogLevel::Warn => "cam_relay=warn,tower_http=warn",
        LogLevel::Info => "cam_relay=info,tower_http=info",
        LogLevel::Verbose => "cam_relay=debug,tower_http=info",
        LogLevel::Debug => "cam_relay=debug,tower_http=debug",
        LogLevel::Trace => "cam_relay=trace,tower_http=debug",
    };

    // Environment variable takes highest priority
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if let Err(err) = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
    {
        eprintln!("failed to initialize tracing: {}", err);
    }
}
