// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Settings read from `flashdeck.toml`.

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use flashdeck_core::Fallible;
use flashdeck_core::fail;
use serde::Deserialize;

/// Looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "flashdeck.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path to the SQLite database holding the collection.
    pub database: PathBuf,
    pub host: String,
    pub port: u16,
    /// How long a card stays face up before a navigation lands.
    pub advance_delay_ms: u64,
    pub open_browser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from("flashdeck.db"),
            host: "127.0.0.1".to_string(),
            port: 8000,
            advance_delay_ms: 200,
            open_browser: true,
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Fallible<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read the config at `path`. Without a path, `./flashdeck.toml` is
    /// read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Fallible<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return fail(format!("config file {} does not exist.", path.display()));
                }
                log::debug!("Reading config from {}", path.display());
                Self::parse(&read_to_string(path)?)
            }
            None => {
                let path = Path::new(CONFIG_FILE);
                if path.exists() {
                    log::debug!("Reading config from {CONFIG_FILE}");
                    Self::parse(&read_to_string(path)?)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_empty_config_is_default() -> Fallible<()> {
        assert_eq!(Config::parse("")?, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_config() -> Fallible<()> {
        let config = Config::parse("port = 9000\nopen_browser = false\n")?;
        assert_eq!(config.port, 9000);
        assert!(!config.open_browser);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.advance_delay(), Duration::from_millis(200));
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = Config::parse("prot = 9000\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let result = Config::parse("port = \"eight thousand\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_path() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("flashdeck.toml");
        write(&path, "database = \"cards.db\"\nadvance_delay_ms = 0\n")?;
        let config = Config::load(Some(&path))?;
        assert_eq!(config.database, PathBuf::from("cards.db"));
        assert_eq!(config.advance_delay(), Duration::ZERO);
        Ok(())
    }

    #[test]
    fn test_load_missing_path_fails() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nope.toml");
        let result = Config::load(Some(&path));
        assert!(result.is_err());
        Ok(())
    }
}
