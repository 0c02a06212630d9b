use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Deserialize;

use crate::calendar::parse_reference_date;

pub const APP_NAME: &str = "routine-calendar";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Weekday in the first grid column, 0 = Sunday.
    pub week_start: u32,
    pub user_id: String,
    pub data_dir: PathBuf,
    /// Pins "today" instead of reading the system clock.
    pub today: Option<NaiveDate>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            week_start: 0,
            user_id: "local".to_string(),
            data_dir: default_data_dir(),
            today: None,
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    week_start: Option<u32>,
    user_id: Option<String>,
    data_dir: Option<PathBuf>,
    today: Option<String>,
    log_filter: Option<String>,
}

impl Settings {
    /// Reads `config.toml` from the user config directory; a missing file
    /// means defaults.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content).wrap_err_with(|| format!("in {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(content)?;
        let mut settings = Self::default();

        if let Some(week_start) = file.week_start {
            if week_start > 6 {
                return Err(eyre!("week_start must be within 0..=6, got {week_start}"));
            }
            settings.week_start = week_start;
        }
        if let Some(user_id) = file.user_id {
            settings.user_id = user_id;
        }
        if let Some(dir) = file.data_dir {
            settings.data_dir = dir;
        }
        if let Some(today) = file.today {
            settings.today = Some(parse_reference_date(&today)?);
        }
        if let Some(filter) = file.log_filter {
            settings.log_filter = filter;
        }

        Ok(settings)
    }
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}
