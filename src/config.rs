//! Optional YAML configuration.
//!
//! Every field may be omitted. Values given on the command line take
//! precedence over the file, and the file over built-in defaults.
//!
//! ```yaml
//! save_dir: ./out
//! api_keys:
//!   newsapi: keys/news-api-key.txt
//!   nyt: keys/nyt-key.txt
//!   youtube: keys/youtube-key.txt
//! stopwords_file: stopwords.txt
//! dictionary_file: words.txt
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Paths to files holding API keys, one key per file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiKeyFiles {
    pub newsapi: Option<PathBuf>,
    pub nyt: Option<PathBuf>,
    pub youtube: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output directory for comments and cleaned files.
    pub save_dir: Option<PathBuf>,
    pub api_keys: ApiKeyFiles,
    /// Comma-separated custom stopword list used by `clean -w`.
    pub stopwords_file: Option<PathBuf>,
    /// Word list for spell correction and lemma lookup.
    pub dictionary_file: Option<PathBuf>,
}

impl Config {
    /// Load from `path`, or return the defaults when no path is given.
    ///
    /// # Returns
    ///
    /// The parsed config. A missing file, malformed YAML or an unknown field
    /// is an error.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&yaml)
            .map_err(|e| format!("invalid config {}: {e}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// The save directory: CLI value, then config, then the current directory.
    pub fn save_dir(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.save_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Pick the CLI value when present, else the configured one.
pub fn prefer_cli<T: Clone>(cli: Option<T>, configured: &Option<T>) -> Option<T> {
    cli.or_else(|| configured.clone())
}
