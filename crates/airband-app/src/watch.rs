//! Watch-pattern matching for custom addresses.
//!
//! Addresses matching a watch pattern are intercepted and handed straight to
//! the native player; other http(s)/rtsp/mms addresses play as custom
//! stations; anything else is rejected as unplayable.

use regex::Regex;

/// Patterns whose matches are always intercepted for native playback.
pub const DEFAULT_WATCH_PATTERNS: &[&str] = &[r"^https?://(www\.)?youtube\.com/watch\?v=.*"];

const PLAYABLE_SCHEMES: &[&str] = &["http://", "https://", "rtsp://", "mms://"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDecision {
    /// Matches a watch pattern; play in the native player.
    Intercept,
    /// A plain stream address; play as a custom station.
    PassThrough,
    /// Not a playable address.
    Reject,
}

pub struct WatchList {
    patterns: Vec<Regex>,
}

impl WatchList {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> anyhow::Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn with_defaults() -> anyhow::Result<Self> {
        Self::new(DEFAULT_WATCH_PATTERNS)
    }

    pub fn decide(&self, address: &str) -> LinkDecision {
        let address = address.trim();
        if address.is_empty() {
            return LinkDecision::Reject;
        }
        if self.patterns.iter().any(|p| p.is_match(address)) {
            return LinkDecision::Intercept;
        }
        if PLAYABLE_SCHEMES.iter().any(|s| address.starts_with(s)) {
            return LinkDecision::PassThrough;
        }
        LinkDecision::Reject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_pattern_is_intercepted() {
        let watch = WatchList::with_defaults().unwrap();
        assert_eq!(
            watch.decide("http://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            LinkDecision::Intercept
        );
        assert_eq!(
            watch.decide("https://youtube.com/watch?v=abc123"),
            LinkDecision::Intercept
        );
    }

    #[test]
    fn plain_stream_urls_pass_through() {
        let watch = WatchList::with_defaults().unwrap();
        assert_eq!(
            watch.decide("http://stream.radioparadise.com/mp3-192"),
            LinkDecision::PassThrough
        );
        assert_eq!(
            watch.decide("rtsp://example.com/live"),
            LinkDecision::PassThrough
        );
    }

    #[test]
    fn non_addresses_are_rejected() {
        let watch = WatchList::with_defaults().unwrap();
        assert_eq!(watch.decide(""), LinkDecision::Reject);
        assert_eq!(watch.decide("   "), LinkDecision::Reject);
        assert_eq!(watch.decide("not a url"), LinkDecision::Reject);
        // Browsing the site (not a watch link) is not playable either.
        assert_eq!(watch.decide("file:///etc/passwd"), LinkDecision::Reject);
    }
}
