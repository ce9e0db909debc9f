use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use ttt_common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};

use super::GameConfig;

const CONFIG_FILE_NAME: &str = "ttt_client_config.yaml";

fn get_config_path() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn get_config_manager(
    path: Option<PathBuf>,
) -> ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path.unwrap_or_else(get_config_path))
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    pub game: GameConfig,
    /// File holding the unfinished game between runs.
    pub state_file: String,
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        if self.state_file.trim().is_empty() {
            return Err("state_file must not be empty".to_string());
        }
        if let Some(log_file) = &self.log_file
            && log_file.trim().is_empty()
        {
            return Err("log_file must not be empty if provided".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            state_file: "ttt_state.yaml".to_string(),
            log_file: None,
        }
    }
}
