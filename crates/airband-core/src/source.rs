//! Directory sources and the continue-on-error loader.
//!
//! Each source yields a batch of entries labeled with the source's name in
//! the `directory` field. Sources are fetched sequentially; a failure is
//! logged and skipped so the remaining sources still load, and nothing from
//! a failed source is appended.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::entry::DirectoryEntry;
use crate::store::DirectoryStore;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("parse {label}: {message}")]
    Parse { label: String, message: String },
}

/// What format a source's payload is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// TOML `[[station]]` tables.
    Toml,
    /// `#EXTINF` playlist.
    M3u,
    /// `[playlist]` with `FileN=` / `TitleN=` pairs.
    Pls,
}

impl SourceFormat {
    /// Guess the format from a URL or path extension; m3u is the fallback.
    pub fn guess(location: &str) -> Self {
        let l = location.trim().to_lowercase();
        if l.ends_with(".toml") {
            Self::Toml
        } else if l.ends_with(".pls") {
            Self::Pls
        } else {
            Self::M3u
        }
    }
}

/// One configured directory source: a label plus where/how to fetch it.
#[derive(Debug, Clone)]
pub struct StationSource {
    pub label: String,
    /// `http://` / `https://` URL, or a local file path.
    pub location: String,
    pub format: SourceFormat,
}

impl StationSource {
    pub fn new(label: impl Into<String>, location: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            label: label.into(),
            location: location.into(),
            format,
        }
    }

    fn is_remote(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }

    /// Fetch and parse this source's entries.
    pub async fn fetch(&self) -> Result<Vec<DirectoryEntry>, SourceError> {
        let content = if self.is_remote() {
            let resp = reqwest::get(&self.location)
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| SourceError::Fetch {
                    url: self.location.clone(),
                    source: e,
                })?;
            resp.text().await.map_err(|e| SourceError::Fetch {
                url: self.location.clone(),
                source: e,
            })?
        } else {
            let path = PathBuf::from(&self.location);
            std::fs::read_to_string(&path).map_err(|e| SourceError::Read { path, source: e })?
        };

        match self.format {
            SourceFormat::Toml => parse_toml(&self.label, &content),
            SourceFormat::M3u => Ok(parse_m3u(&self.label, &content)),
            SourceFormat::Pls => Ok(parse_pls(&self.label, &content)),
        }
    }
}

// ── parsers ───────────────────────────────────────────────────────────────────

/// Intermediate struct matching the TOML `[[station]]` table. Kept separate
/// from `DirectoryEntry` so the file schema can diverge from the model.
#[derive(Debug, serde::Deserialize)]
struct TomlStationFile {
    station: Vec<TomlStation>,
}

#[derive(Debug, serde::Deserialize)]
struct TomlStation {
    name: String,
    url: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    genre: String,
}

fn parse_toml(label: &str, content: &str) -> Result<Vec<DirectoryEntry>, SourceError> {
    let file: TomlStationFile = toml::from_str(content).map_err(|e| SourceError::Parse {
        label: label.to_string(),
        message: e.to_string(),
    })?;
    Ok(file
        .station
        .into_iter()
        .map(|s| DirectoryEntry::new(label, s.name, s.url, s.kind, s.genre))
        .collect())
}

fn parse_m3u(label: &str, content: &str) -> Vec<DirectoryEntry> {
    let mut entries = Vec::new();
    let mut pending_name: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("#EXTINF:") {
            if let Some(comma_idx) = rest.find(',') {
                pending_name = Some(rest[comma_idx + 1..].trim().to_string());
            }
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        let url = line.to_string();
        let name = pending_name.take().unwrap_or_else(|| url.clone());
        entries.push(DirectoryEntry::new(label, name, url, "", ""));
    }

    entries
}

fn parse_pls(label: &str, content: &str) -> Vec<DirectoryEntry> {
    // FileN / TitleN keys may appear in any order; pair them by index.
    let mut files: BTreeMap<u32, String> = BTreeMap::new();
    let mut titles: BTreeMap<u32, String> = BTreeMap::new();

    for line in content.lines() {
        let line = line.trim();
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if let Some(n) = key.strip_prefix("File").and_then(|n| n.parse::<u32>().ok()) {
            files.insert(n, value.to_string());
        } else if let Some(n) = key.strip_prefix("Title").and_then(|n| n.parse::<u32>().ok()) {
            titles.insert(n, value.to_string());
        }
    }

    files
        .into_iter()
        .map(|(n, url)| {
            let name = titles.get(&n).cloned().unwrap_or_else(|| url.clone());
            DirectoryEntry::new(label, name, url, "", "")
        })
        .collect()
}

// ── loader ────────────────────────────────────────────────────────────────────

/// Outcome of one loader pass over all configured sources.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// (source label, entries appended) per successful source.
    pub loaded: Vec<(String, usize)>,
    /// (source label, error) per failed source.
    pub failed: Vec<(String, String)>,
}

impl LoadReport {
    pub fn total_loaded(&self) -> usize {
        self.loaded.iter().map(|(_, n)| n).sum()
    }
}

/// Fetch every source in order, appending each successful batch to the
/// store. Failures are logged and skipped; later sources still run.
pub async fn load_directories(sources: &[StationSource], store: &DirectoryStore) -> LoadReport {
    let mut report = LoadReport::default();

    for source in sources {
        match source.fetch().await {
            Ok(entries) => {
                let count = entries.len();
                let rev = store.append_batch(entries).await;
                info!(
                    "loaded {} entries from {} (rev {})",
                    count, source.label, rev
                );
                report.loaded.push((source.label.clone(), count));
            }
            Err(e) => {
                warn!("failed to read directory {}: {}", source.label, e);
                report.failed.push((source.label.clone(), e.to_string()));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn m3u_extinf_names_and_urls() {
        let content = "\
#EXTM3U
#EXTINF:-1,Radio Paradise
http://stream.radioparadise.com/mp3-192
# a comment
http://example.com/bare-stream
";
        let entries = parse_m3u("test-m3u", content);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Radio Paradise");
        assert_eq!(entries[0].url, "http://stream.radioparadise.com/mp3-192");
        assert_eq!(entries[0].directory, "test-m3u");
        // Bare URL with no #EXTINF falls back to the URL as its name.
        assert_eq!(entries[1].name, "http://example.com/bare-stream");
    }

    #[test]
    fn pls_pairs_files_with_titles() {
        let content = "\
[playlist]
NumberOfEntries=2
File1=http://ice1.somafm.com/groovesalad
Title1=Groove Salad
File2=http://ice1.somafm.com/dronezone
Title2=Drone Zone
";
        let entries = parse_pls("somafm", content);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Groove Salad");
        assert_eq!(entries[1].url, "http://ice1.somafm.com/dronezone");
        assert_eq!(entries[1].directory, "somafm");
    }

    #[test]
    fn pls_missing_title_falls_back_to_url() {
        let content = "[playlist]\nFile1=http://example.com/a\n";
        let entries = parse_pls("p", content);
        assert_eq!(entries[0].name, "http://example.com/a");
    }

    #[test]
    fn toml_station_tables() {
        let content = r#"
[[station]]
name = "Radio Paradise"
url = "http://stream.radioparadise.com/mp3-192"
type = "MP3"
genre = "Eclectic"

[[station]]
name = "Minimal"
url = "http://example.com/minimal"
"#;
        let entries = parse_toml("local", content).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, "MP3");
        assert_eq!(entries[0].genre, "Eclectic");
        assert_eq!(entries[1].kind, "");
    }

    #[test]
    fn toml_parse_error_is_reported() {
        let err = parse_toml("broken", "not toml at all [").unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[test]
    fn format_guess_by_extension() {
        assert_eq!(SourceFormat::guess("stations.toml"), SourceFormat::Toml);
        assert_eq!(
            SourceFormat::guess("https://somafm.com/groovesalad.pls"),
            SourceFormat::Pls
        );
        assert_eq!(SourceFormat::guess("https://x.example/list.m3u"), SourceFormat::M3u);
    }
}
