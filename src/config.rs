use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::adaptive::WeightPolicy;
use crate::app_dirs::AppDirs;
use crate::difficulty::DifficultyConfig;
use crate::kana::Script;
use crate::quiz::{GameMode, DEFAULT_WORD_LENGTH};
use crate::reverse_mode::ReverseModeConfig;
use crate::session::SessionConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub scripts: Vec<Script>,
    pub groups: Vec<String>,
    pub game_mode: GameMode,
    pub word_length: usize,
    pub wrong_ends_question: Option<bool>,
    pub difficulty: DifficultyConfig,
    pub reverse_mode: ReverseModeConfig,
    pub weights: WeightPolicy,
    pub bell: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scripts: vec![Script::Hiragana],
            groups: vec!["base".to_string()],
            game_mode: GameMode::Pick,
            word_length: DEFAULT_WORD_LENGTH,
            wrong_ends_question: None,
            difficulty: DifficultyConfig::default(),
            reverse_mode: ReverseModeConfig::default(),
            weights: WeightPolicy::default(),
            bell: false,
        }
    }
}

impl From<&Config> for SessionConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            game_mode: cfg.game_mode,
            word_length: cfg.word_length,
            wrong_ends_question: cfg.wrong_ends_question,
            difficulty: cfg.difficulty,
            reverse_mode: cfg.reverse_mode,
            weights: cfg.weights,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("kanaquiz_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files fall back to defaults
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
