/// Shell configuration
use anyhow::Context;
use groove_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShellConfig {
    #[serde(default)]
    pub player: PlayerConfig,

    /// Directory holding the persisted player state
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    /// JSON collection cache to load at startup
    #[serde(default)]
    pub collection: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            state_dir: default_state_dir(),
            collection: None,
        }
    }
}

impl ShellConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `groove.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from("groove.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. GROOVE_PLAYER__REMOVAL_POLICY
        settings = settings.add_source(
            config::Environment::with_prefix("GROOVE")
                .separator("__")
                .try_parsing(true),
        );

        settings
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".groove")
}
