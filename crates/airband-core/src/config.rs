use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::platform;
use crate::source::{SourceFormat, StationSource};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Explicit player binary; when unset the PATH is searched.
    #[serde(default)]
    pub binary: Option<PathBuf>,
    #[serde(default = "default_volume")]
    pub default_volume: f32,
}

/// Directory-listing sources, loaded in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Path to a local TOML station file (loaded first when present).
    /// Defaults to `$XDG_CONFIG_HOME/airband/stations.toml`.
    #[serde(default = "default_stations_toml")]
    pub stations_toml: PathBuf,
    /// URL or file path for an m3u station list; empty disables it.
    #[serde(default)]
    pub m3u_url: String,
    /// Additional playlist sources (pls or m3u, by extension).
    #[serde(default = "default_extra_sources")]
    pub extra: Vec<ExtraSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraSource {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            binary: None,
            default_volume: default_volume(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            stations_toml: default_stations_toml(),
            m3u_url: String::new(),
            extra: default_extra_sources(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
        }
    }
}

fn default_volume() -> f32 {
    0.5
}

fn default_stations_toml() -> PathBuf {
    platform::config_dir().join("stations.toml")
}

fn default_extra_sources() -> Vec<ExtraSource> {
    vec![
        ExtraSource {
            label: "SomaFM Groove Salad".into(),
            url: "https://somafm.com/groovesalad.pls".into(),
        },
        ExtraSource {
            label: "SomaFM Drone Zone".into(),
            url: "https://somafm.com/dronezone.pls".into(),
        },
    ]
}

fn default_state_file() -> PathBuf {
    platform::data_dir().join("state.json")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    /// Configured directory sources, in load order. The local TOML file is
    /// included only when present so a fresh install doesn't log a failure
    /// for it.
    pub fn station_sources(&self) -> Vec<StationSource> {
        let mut sources = Vec::new();

        if self.sources.stations_toml.exists() {
            sources.push(StationSource::new(
                "local",
                self.sources.stations_toml.display().to_string(),
                SourceFormat::Toml,
            ));
        }

        let m3u = self.sources.m3u_url.trim();
        if !m3u.is_empty() {
            sources.push(StationSource::new(
                "m3u",
                m3u,
                SourceFormat::guess(m3u),
            ));
        }

        for extra in &self.sources.extra {
            sources.push(StationSource::new(
                extra.label.clone(),
                extra.url.clone(),
                SourceFormat::guess(&extra.url),
            ));
        }

        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.player.default_volume, 0.5);
        assert!(config.player.binary.is_none());
        assert!(config.sources.m3u_url.is_empty());
        assert_eq!(config.sources.extra.len(), 2);
        assert!(config
            .sources
            .stations_toml
            .ends_with("airband/stations.toml"));
        assert!(config.paths.state_file.ends_with("airband/state.json"));
    }

    #[test]
    fn sources_skip_missing_toml_and_guess_formats() {
        let mut config = Config::default();
        config.sources.stations_toml = PathBuf::from("/nonexistent/stations.toml");
        config.sources.m3u_url = "https://example.com/stations.m3u".into();

        let sources = config.station_sources();
        // Missing TOML file is skipped; m3u + the two default extras remain.
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].label, "m3u");
        assert_eq!(sources[0].format, SourceFormat::M3u);
        assert_eq!(sources[1].label, "SomaFM Groove Salad");
        assert_eq!(sources[1].format, SourceFormat::Pls);
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.sources.m3u_url, config.sources.m3u_url);
    }
}
