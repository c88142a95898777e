use serde::{Deserialize, Serialize};

/// One playable station record from a directory listing.
///
/// Entries are immutable once constructed and owned by the store. Fields
/// absent from a source deserialize to empty strings, which can never match
/// a non-empty filter pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DirectoryEntry {
    /// Name of the directory (source) this entry came from.
    #[serde(default)]
    pub directory: String,
    pub name: String,
    pub url: String,
    /// Station type (stream container/codec as reported by the directory).
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub genre: String,
}

impl DirectoryEntry {
    pub fn new(
        directory: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        kind: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
            url: url.into(),
            kind: kind.into(),
            genre: genre.into(),
        }
    }
}
