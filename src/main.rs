//! Upload Drop - An authenticated file upload endpoint.
//!
//! This binary reads the configuration, starts the HTTP server and serves
//! until killed.

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use upload_drop::{create_router, Config, RouterConfig, StartupError};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    match run_serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_serve(config: Config) -> Result<(), StartupError> {
    config.validate()?;

    info!("Configuration:");
    info!("  Upload path: {}", config.upload_path.display());
    if config.public_url.is_empty() {
        info!("  Public URL: (none, returning relative URLs)");
    } else {
        info!("  Public URL: {}", config.public_url);
    }
    match config.max_upload_bytes {
        Some(limit) => info!("  Max upload size: {} bytes", limit),
        None => info!("  Max upload size: unlimited"),
    }

    check_upload_path(&config);

    let router = create_router(RouterConfig::from_config(&config));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Listen {
            addr: addr.clone(),
            source,
        })?;

    info!("Upload server listening on http://{}", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(StartupError::Serve)?;

    Ok(())
}

/// Warn when the upload directory is unusable. Uploads fail with 500 until it is fixed.
fn check_upload_path(config: &Config) {
    let path = if config.upload_path.as_os_str().is_empty() {
        std::path::Path::new(".")
    } else {
        config.upload_path.as_path()
    };

    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => warn!("  Upload path {} is not a directory", path.display()),
        Err(e) => warn!("  Upload path {} is not accessible: {}", path.display(), e),
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "upload_drop=debug,tower_http=debug"
    } else {
        "upload_drop=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
