//! Top-level configuration at ~/.config/filter-calendar/config.toml

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;
use crate::error::{FilterCalError, FilterCalResult};

static DEFAULT_CALENDAR_DIR: &str = "~/calendar";

fn default_calendar_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CALENDAR_DIR)
}

/// Where tracked calendars live, plus one entry per filtered calendar.
///
/// ```toml
/// calendar_dir = "~/calendar"
///
/// [[calendars]]
/// name = "Work"
/// tracking_calendar_id = "roster"
/// filter = "Shift"
/// exclude_types = ["Public Holiday"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_calendar_dir")]
    pub calendar_dir: PathBuf,

    #[serde(default)]
    pub calendars: Vec<FilterConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            calendar_dir: default_calendar_dir(),
            calendars: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> FilterCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FilterCalError::Config("Could not determine config directory".into()))?
            .join("filter-calendar");

        Ok(config_dir.join("config.toml"))
    }

    /// Load and check the config file. Filters are compiled separately, when
    /// a calendar is built from its entry.
    pub fn load(path: &Path) -> FilterCalResult<Self> {
        if !path.exists() {
            return Err(FilterCalError::Config(format!(
                "Config file not found at {}",
                path.display()
            )));
        }

        let config: AppConfig = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()
            .map_err(|e| FilterCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| FilterCalError::Config(e.to_string()))?;

        config.check()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> FilterCalResult<Self> {
        let config: AppConfig =
            toml::from_str(content).map_err(|e| FilterCalError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> FilterCalResult<()> {
        let mut names = HashSet::new();
        for calendar in &self.calendars {
            calendar.check_fields()?;
            if !names.insert(calendar.name.as_str()) {
                return Err(FilterCalError::Config(format!(
                    "Calendar '{}' is configured more than once",
                    calendar.name
                )));
            }
        }
        Ok(())
    }

    /// `calendar_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str =
            shellexpand::tilde(&self.calendar_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn calendar(&self, name: &str) -> Option<&FilterConfig> {
        self.calendars.iter().find(|c| c.name == name)
    }
}
