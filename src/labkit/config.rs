use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "viewer.json";
const DEFAULT_SURVEY_PREFIX: &str = "codelab-survey";

/// How the viewer mirrors state into the address bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryMode {
    /// Index state in the query string, step selection in the fragment.
    #[default]
    QueryAndFragment,
    /// No address-bar mirroring at all (hosts wire `NoopHistory`).
    Disabled,
}

/// Viewer configuration, stored in `viewer.json` next to the host's data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Quiet interval for the search debouncer, in host ticks.
    #[serde(default = "default_search_debounce")]
    pub search_debounce_ticks: u64,

    #[serde(default)]
    pub history_mode: HistoryMode,

    /// Namespace prefix for persisted survey answer keys.
    #[serde(default = "default_survey_prefix")]
    pub survey_prefix: String,
}

fn default_search_debounce() -> u64 {
    crate::debounce::DEFAULT_QUIET_TICKS
}

fn default_survey_prefix() -> String {
    DEFAULT_SURVEY_PREFIX.to_string()
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            search_debounce_ticks: default_search_debounce(),
            history_mode: HistoryMode::default(),
            survey_prefix: default_survey_prefix(),
        }
    }
}

impl ViewerConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: ViewerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }
}
