mod bitmap;
mod config;
mod errors;
mod frontend;
mod hotspot;
mod layout;
mod navigation;
mod page_client;

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{Config, Mode};
use crate::errors::AppError;
use crate::frontend::graphical::GraphicalFrontend;
use crate::frontend::plain::PlainFrontend;
use crate::frontend::screen::ScreenFrontend;
use crate::frontend::Frontend;
use crate::navigation::NavigationController;
use crate::page_client::{PageClient, PageSource};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::from_env()?.apply_args(std::env::args().skip(1))?;

    init_tracing(&config)?;

    info!("Starting texttv v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Service: {} (timeout {}s), mode: {:?}",
        config.base_url, config.timeout_secs, config.mode
    );

    let client = PageClient::new(
        config.base_url.clone(),
        Duration::from_secs(config.timeout_secs),
    )
    .context("failed to build HTTP client")?;

    let mut controller = NavigationController::new(client, config.start_page);

    if let Err(e) = session(&mut controller, config.mode).await {
        // The terminal has been restored by the time the session returns.
        error!("{e}");
        eprintln!("texttv: {e}");
        std::process::exit(e.exit_code());
    }

    Ok(())
}

/// Loads the start page, then hands the terminal to the selected frontend until quit.
async fn session<S: PageSource>(
    controller: &mut NavigationController<S>,
    mode: Mode,
) -> Result<(), AppError> {
    controller.start().await?;

    let mut frontend: Box<dyn Frontend> = match mode {
        Mode::Plain => Box::new(PlainFrontend::stdio()),
        Mode::Screen => Box::new(ScreenFrontend::new()?),
        Mode::Graphical => Box::new(GraphicalFrontend::new()?),
    };

    navigation::run(controller, frontend.as_mut()).await
}

/// Structured logging. Full-screen modes only log when a log file is configured.
fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
    });

    let fmt_layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .boxed(),
            )
        }
        None if config.mode == Mode::Plain => {
            Some(fmt::layer().with_writer(std::io::stderr).boxed())
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
