//! Per-field substring filter over directory entries.

use crate::entry::DirectoryEntry;

/// The five filterable entry fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Directory,
    Name,
    Address,
    Kind,
    Genre,
}

impl FilterField {
    pub const ALL: [FilterField; 5] = [
        FilterField::Directory,
        FilterField::Name,
        FilterField::Address,
        FilterField::Kind,
        FilterField::Genre,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::Name => "name",
            Self::Address => "address",
            Self::Kind => "type",
            Self::Genre => "genre",
        }
    }

    /// Parse a field name as typed at the console (`type` and `kind` both
    /// accepted for the station-type column).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "directory" | "dir" => Some(Self::Directory),
            "name" => Some(Self::Name),
            "address" | "url" => Some(Self::Address),
            "type" | "kind" => Some(Self::Kind),
            "genre" => Some(Self::Genre),
            _ => None,
        }
    }
}

/// Change notification produced by predicate mutations.
///
/// `Cleared` is distinguished from a single-field change so a dependent view
/// may treat it as a full re-evaluation; the view here recomputes fully in
/// both cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEvent {
    FieldChanged(FilterField),
    Cleared,
}

/// The set of per-field substring patterns currently applied to the view.
///
/// Patterns are trimmed and lower-cased on the way in; a whitespace-only
/// pattern unsets the field. `None` means "no constraint on this field".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    directory: Option<String>,
    name: Option<String>,
    address: Option<String>,
    kind: Option<String>,
    genre: Option<String>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace one field's pattern.
    pub fn set(&mut self, field: FilterField, pattern: &str) -> FilterEvent {
        let normalized = normalize(pattern);
        match field {
            FilterField::Directory => self.directory = normalized,
            FilterField::Name => self.name = normalized,
            FilterField::Address => self.address = normalized,
            FilterField::Kind => self.kind = normalized,
            FilterField::Genre => self.genre = normalized,
        }
        FilterEvent::FieldChanged(field)
    }

    /// Reset all five fields to unconstrained.
    pub fn clear(&mut self) -> FilterEvent {
        *self = Self::default();
        FilterEvent::Cleared
    }

    pub fn pattern(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Directory => self.directory.as_deref(),
            FilterField::Name => self.name.as_deref(),
            FilterField::Address => self.address.as_deref(),
            FilterField::Kind => self.kind.as_deref(),
            FilterField::Genre => self.genre.as_deref(),
        }
    }

    /// True when no field imposes a constraint.
    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|f| self.pattern(*f).is_none())
    }

    /// True iff every constrained field's pattern is a case-insensitive
    /// substring of the entry's corresponding value.
    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        field_matches(&self.directory, &entry.directory)
            && field_matches(&self.name, &entry.name)
            && field_matches(&self.address, &entry.url)
            && field_matches(&self.kind, &entry.kind)
            && field_matches(&self.genre, &entry.genre)
    }
}

fn field_matches(pattern: &Option<String>, value: &str) -> bool {
    match pattern {
        None => true,
        Some(p) => value.to_lowercase().contains(p.as_str()),
    }
}

fn normalize(pattern: &str) -> Option<String> {
    let trimmed = pattern.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
