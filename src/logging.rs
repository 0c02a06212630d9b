use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing_subscriber::EnvFilter;

/// Sends tracing output to `routine-calendar.log` in `dir`; the terminal is
/// owned by the UI. `RUST_LOG` takes precedence over `default_filter`.
pub fn init(dir: &Path, default_filter: &str) -> Result<()> {
    fs::create_dir_all(dir).wrap_err_with(|| format!("creating {}", dir.display()))?;
    let path = dir.join(format!("{}.log", crate::config::APP_NAME));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("opening {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .wrap_err("invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("installing log subscriber: {e}"))?;
    Ok(())
}
