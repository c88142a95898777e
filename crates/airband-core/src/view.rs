//! Sorted/filtered projection of the directory store.

use std::cmp::Ordering;

use crate::entry::DirectoryEntry;
use crate::filter::{EntryFilter, FilterEvent, FilterField};

/// Sort order for the directory table, cycled column-by-column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Original fetch order.
    #[default]
    Insertion,
    Directory,
    Name,
    Genre,
    Address,
    Kind,
}

impl SortKey {
    pub fn next(self) -> Self {
        match self {
            Self::Insertion => Self::Directory,
            Self::Directory => Self::Name,
            Self::Name => Self::Genre,
            Self::Genre => Self::Address,
            Self::Address => Self::Kind,
            Self::Kind => Self::Insertion,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Insertion => Self::Kind,
            Self::Directory => Self::Insertion,
            Self::Name => Self::Directory,
            Self::Genre => Self::Name,
            Self::Address => Self::Genre,
            Self::Kind => Self::Address,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Insertion => "default",
            Self::Directory => "directory",
            Self::Name => "name",
            Self::Genre => "genre",
            Self::Address => "address",
            Self::Kind => "type",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" | "insertion" => Some(Self::Insertion),
            "directory" | "dir" => Some(Self::Directory),
            "name" => Some(Self::Name),
            "genre" => Some(Self::Genre),
            "address" | "url" => Some(Self::Address),
            "type" | "kind" => Some(Self::Kind),
            _ => None,
        }
    }

    fn compare(self, a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
        match self {
            Self::Insertion => Ordering::Equal,
            Self::Directory => ci_cmp(&a.directory, &b.directory).then(ci_cmp(&a.name, &b.name)),
            Self::Name => ci_cmp(&a.name, &b.name),
            Self::Genre => ci_cmp(&a.genre, &b.genre).then(ci_cmp(&a.name, &b.name)),
            Self::Address => ci_cmp(&a.url, &b.url),
            Self::Kind => ci_cmp(&a.kind, &b.kind).then(ci_cmp(&a.name, &b.name)),
        }
    }
}

fn ci_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Pure projection: filter first, then a stable sort of the surviving
/// indices. Equal keys (and `SortKey::Insertion`) keep insertion order.
pub fn render(entries: &[DirectoryEntry], filter: &EntryFilter, sort: SortKey) -> Vec<usize> {
    let mut visible: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| filter.matches(e))
        .map(|(i, _)| i)
        .collect();
    if sort != SortKey::Insertion {
        visible.sort_by(|&a, &b| sort.compare(&entries[a], &entries[b]));
    }
    visible
}

/// View-model over the latest store snapshot: always sorted by the current
/// key and restricted to entries matching the predicate. Recomputed in full
/// on any trigger (snapshot, sort, filter); the directory holds at most a
/// few hundred entries.
pub struct DirectoryView {
    entries: Vec<DirectoryEntry>,
    visible: Vec<usize>,
    filter: EntryFilter,
    sort: SortKey,
    selected: usize,
    /// Store revision this view last saw.
    seen_rev: u64,
}

impl DirectoryView {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            visible: Vec::new(),
            filter: EntryFilter::new(),
            sort: SortKey::Insertion,
            selected: 0,
            seen_rev: 0,
        }
    }

    /// Replace the backing snapshot (store mutation trigger).
    pub fn set_entries(&mut self, entries: Vec<DirectoryEntry>, rev: u64) {
        self.entries = entries;
        self.seen_rev = rev;
        self.refresh();
    }

    pub fn seen_rev(&self) -> u64 {
        self.seen_rev
    }

    pub fn set_filter_field(&mut self, field: FilterField, pattern: &str) -> FilterEvent {
        let event = self.filter.set(field, pattern);
        self.refresh();
        event
    }

    pub fn clear_filter(&mut self) -> FilterEvent {
        let event = self.filter.clear();
        self.refresh();
        event
    }

    pub fn filter(&self) -> &EntryFilter {
        &self.filter
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.refresh();
    }

    pub fn cycle_sort(&mut self) -> SortKey {
        self.set_sort(self.sort.next());
        self.sort
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Entries currently visible, in display order.
    pub fn visible_entries(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.visible.iter().map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn total_len(&self) -> usize {
        self.entries.len()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&DirectoryEntry> {
        self.visible.get(self.selected).map(|&i| &self.entries[i])
    }

    pub fn entry_at(&self, row: usize) -> Option<&DirectoryEntry> {
        self.visible.get(row).map(|&i| &self.entries[i])
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        if !self.visible.is_empty() {
            self.selected = (self.selected + n).min(self.visible.len() - 1);
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
    }

    pub fn select_row(&mut self, row: usize) {
        if row < self.visible.len() {
            self.selected = row;
        }
    }

    /// Recompute the projection, keeping the same entry selected when it
    /// survives the change and clamping otherwise.
    fn refresh(&mut self) {
        let previous = self.visible.get(self.selected).copied();
        self.visible = render(&self.entries, &self.filter, self.sort);
        self.selected = previous
            .and_then(|orig| self.visible.iter().position(|&i| i == orig))
            .unwrap_or(0);
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }
}

impl Default for DirectoryView {
    fn default() -> Self {
        Self::new()
    }
}
