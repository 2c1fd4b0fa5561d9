/// Queue entry type
use serde::{Deserialize, Serialize};

/// One track's resolved, playable metadata
///
/// Stream and artwork URLs are resolved once, when the entry is built from
/// catalog metadata, and never re-resolved afterwards. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    /// Source-stable track identifier
    pub id: String,

    /// Track title
    pub title: String,

    /// Display artist
    pub artist: String,

    /// Album name (empty when unknown)
    #[serde(default)]
    pub album: String,

    /// Catalog duration in whole seconds
    #[serde(default)]
    pub duration_seconds: u32,

    /// Artwork URL (empty when the catalog had none)
    #[serde(default)]
    pub artwork_url: String,

    /// Stream URL handed to the audio driver (empty when unresolved)
    #[serde(default)]
    pub stream_url: String,
}

impl QueueEntry {
    /// Create an entry with only the identifying fields set
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: String::new(),
            duration_seconds: 0,
            artwork_url: String::new(),
            stream_url: String::new(),
        }
    }

    /// Set album name
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Set catalog duration
    #[must_use]
    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Set artwork URL
    #[must_use]
    pub fn with_artwork_url(mut self, url: impl Into<String>) -> Self {
        self.artwork_url = url.into();
        self
    }

    /// Set stream URL
    #[must_use]
    pub fn with_stream_url(mut self, url: impl Into<String>) -> Self {
        self.stream_url = url.into();
        self
    }

    /// Whether the entry has a stream the driver can load
    pub fn is_playable(&self) -> bool {
        !self.stream_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_fields() {
        let entry = QueueEntry::new("a1", "Title", "Artist")
            .with_duration(90)
            .with_stream_url("https://cdn.example.com/a1.mp4");

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["durationSeconds"], 90);
        assert_eq!(json["streamUrl"], "https://cdn.example.com/a1.mp4");
        assert_eq!(json["artworkUrl"], "");
    }

    #[test]
    fn missing_optional_fields_default() {
        let entry: QueueEntry =
            serde_json::from_str(r#"{"id":"x","title":"T","artist":"A"}"#).unwrap();
        assert_eq!(entry.album, "");
        assert_eq!(entry.duration_seconds, 0);
        assert!(!entry.is_playable());
    }
}
