//! Persisted session state: volume and recently-played stations.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Recently-played history cap.
const RECENT_LIMIT: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentPlay {
    pub name: String,
    pub url: String,
    pub played_at: DateTime<Local>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub volume: f32,
    pub last_url: Option<String>,
    #[serde(default)]
    pub recent: Vec<RecentPlay>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            volume: 0.5,
            last_url: None,
            recent: Vec::new(),
        }
    }
}

impl SessionState {
    /// Load from disk; any unreadable or unparsable file yields defaults.
    pub fn load(path: &Path) -> Self {
        if let Ok(content) = std::fs::read_to_string(path) {
            if let Ok(state) = serde_json::from_str::<Self>(&content) {
                return state;
            }
        }
        Self::default()
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Record a play, newest last, trimming the history to its cap.
    pub fn record_play(&mut self, name: &str, url: &str) {
        self.last_url = Some(url.to_string());
        self.recent.push(RecentPlay {
            name: name.to_string(),
            url: url.to_string(),
            played_at: Local::now(),
        });
        if self.recent.len() > RECENT_LIMIT {
            let excess = self.recent.len() - RECENT_LIMIT;
            self.recent.drain(..excess);
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_play_trims_to_cap() {
        let mut state = SessionState::default();
        for i in 0..30 {
            state.record_play(&format!("st-{}", i), &format!("http://x/{}", i));
        }
        assert_eq!(state.recent.len(), RECENT_LIMIT);
        // Oldest entries were dropped, newest kept.
        assert_eq!(state.recent.last().unwrap().name, "st-29");
        assert_eq!(state.recent.first().unwrap().name, "st-10");
        assert_eq!(state.last_url.as_deref(), Some("http://x/29"));
    }

    #[test]
    fn volume_is_clamped() {
        let mut state = SessionState::default();
        state.set_volume(1.7);
        assert_eq!(state.volume, 1.0);
        state.set_volume(-0.3);
        assert_eq!(state.volume, 0.0);
    }

    #[test]
    fn load_missing_file_yields_defaults() {
        let state = SessionState::load(Path::new("/nonexistent/airband-state.json"));
        assert_eq!(state.volume, 0.5);
        assert!(state.recent.is_empty());
    }
}
