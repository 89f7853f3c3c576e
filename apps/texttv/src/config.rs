use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

const DEFAULT_BASE_URL: &str = "https://www.svt.se/text-tv/api";
/// Root page of the service. Every session starts here unless overridden.
pub const DEFAULT_START_PAGE: u32 = 100;

/// Presentation mode selected at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Full-screen character-cell terminal.
    #[default]
    Screen,
    /// Line-oriented stdin/stdout.
    Plain,
    /// Bitmap page with clickable hotspots.
    Graphical,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "screen" => Ok(Mode::Screen),
            "plain" => Ok(Mode::Plain),
            "graphical" => Ok(Mode::Graphical),
            other => bail!("unknown mode '{other}' (expected screen, plain or graphical)"),
        }
    }
}

/// Application configuration loaded from environment variables and flags.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub start_page: u32,
    pub timeout_secs: u64,
    pub mode: Mode,
    pub log_file: Option<PathBuf>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let start_page = std::env::var("TEXTTV_START_PAGE")
            .unwrap_or_else(|_| DEFAULT_START_PAGE.to_string())
            .parse::<u32>()
            .context("TEXTTV_START_PAGE must be a positive page number")?;
        if start_page == 0 {
            bail!("TEXTTV_START_PAGE must be a positive page number");
        }

        let timeout_secs = std::env::var("TEXTTV_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .context("TEXTTV_TIMEOUT_SECS must be a number of seconds")?;
        if timeout_secs == 0 {
            bail!("TEXTTV_TIMEOUT_SECS must be greater than zero");
        }

        let mode = match std::env::var("TEXTTV_MODE") {
            Ok(raw) => raw.parse().context("TEXTTV_MODE is invalid")?,
            Err(_) => Mode::default(),
        };

        Ok(Config {
            base_url: std::env::var("TEXTTV_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            start_page,
            timeout_secs,
            mode,
            log_file: std::env::var_os("TEXTTV_LOG_FILE").map(PathBuf::from),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Applies command-line flags on top of the environment. The last mode flag wins.
    pub fn apply_args<I, S>(mut self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.mode = match arg.as_ref() {
                "-g" | "--graphical" => Mode::Graphical,
                "-p" | "--plain" => Mode::Plain,
                "-s" | "--screen" => Mode::Screen,
                other => bail!("unrecognized argument '{other}' (usage: texttv [-g|-p|-s])"),
            };
        }
        Ok(self)
    }
}
