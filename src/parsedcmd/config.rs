use crate::error::{Result, ShellError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "shell.json";
const DEFAULT_PROMPT: &str = "(Cmd) ";
const DEFAULT_MARKER: &str = "-";

/// Shell behaviour, stored as `shell.json` in a config directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShellConfig {
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Printed once when the command loop starts
    #[serde(default)]
    pub intro: Option<String>,

    /// Prefix that turns a leading token into an option name (e.g. "-", "--")
    #[serde(default = "default_marker")]
    pub option_marker: String,

    /// Whether `help <command>` includes the synopsis or only the doc text
    #[serde(default = "default_true")]
    pub show_usage: bool,

    /// Whether an empty line runs the previous command again
    #[serde(default = "default_true")]
    pub repeat_last_command: bool,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            intro: None,
            option_marker: default_marker(),
            show_usage: true,
            repeat_last_command: true,
        }
    }
}

impl ShellConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ShellError::Io)?;
        let config: ShellConfig =
            serde_json::from_str(&content).map_err(ShellError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ShellError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ShellError::Serialization)?;
        fs::write(config_path, content).map_err(ShellError::Io)?;
        Ok(())
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.option_marker = marker.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// A marker must be non-empty and contain no whitespace, or tokens could never
    /// match it.
    pub fn marker_is_valid(&self) -> bool {
        !self.option_marker.is_empty() && !self.option_marker.chars().any(char::is_whitespace)
    }
}
