//! Catalog metadata → `QueueEntry` resolution

use riff_core::{ArtworkSize, AudioQuality, QueueEntry};

use crate::types::{CatalogSong, Variant};

/// Artist shown when the catalog has none
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Which variants to pick when building queue entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub stream_quality: AudioQuality,
    pub artwork_size: ArtworkSize,
}

/// Pick the variant labelled `quality`
///
/// Falls back to the last variant in list order when no label matches, and to
/// an empty string when there are no variants at all.
pub fn select_variant<'a>(variants: &'a [Variant], quality: &str) -> &'a str {
    variants
        .iter()
        .find(|variant| variant.quality == quality)
        .or_else(|| variants.last())
        .map_or("", |variant| variant.url.as_str())
}

/// Stream URL at `quality`
pub fn stream_url(song: &CatalogSong, quality: AudioQuality) -> &str {
    select_variant(&song.download_url, quality.label())
}

/// Artwork URL at `size`
pub fn artwork_url(song: &CatalogSong, size: ArtworkSize) -> &str {
    select_variant(&song.image, size.label())
}

/// Build a playable queue entry from catalog metadata
pub fn to_queue_entry(song: &CatalogSong, options: ResolveOptions) -> QueueEntry {
    let artist = song
        .primary_artists
        .as_deref()
        .filter(|artists| !artists.is_empty())
        .unwrap_or(UNKNOWN_ARTIST);
    let album = song.album.as_ref().map_or("", |album| album.name.as_str());

    QueueEntry::new(&song.id, &song.name, artist)
        .with_album(album)
        .with_duration(song.duration)
        .with_artwork_url(artwork_url(song, options.artwork_size))
        .with_stream_url(stream_url(song, options.stream_quality))
}

impl From<&CatalogSong> for QueueEntry {
    fn from(song: &CatalogSong) -> Self {
        to_queue_entry(song, ResolveOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlbumRef;

    fn variants(labels: &[&str]) -> Vec<Variant> {
        labels
            .iter()
            .map(|label| Variant::new(*label, format!("https://cdn.example.com/{label}")))
            .collect()
    }

    #[test]
    fn exact_label_wins() {
        let list = variants(&["96kbps", "160kbps", "320kbps"]);
        assert_eq!(
            select_variant(&list, "160kbps"),
            "https://cdn.example.com/160kbps"
        );
    }

    #[test]
    fn missing_label_falls_back_to_last() {
        let list = variants(&["96kbps", "160kbps"]);
        assert_eq!(
            select_variant(&list, "320kbps"),
            "https://cdn.example.com/160kbps"
        );
    }

    #[test]
    fn fallback_is_positional_not_by_quality() {
        // Catalog order is trusted even when it is not ascending
        let list = variants(&["320kbps", "96kbps"]);
        assert_eq!(
            select_variant(&list, "160kbps"),
            "https://cdn.example.com/96kbps"
        );
    }

    #[test]
    fn no_variants_yields_empty() {
        assert_eq!(select_variant(&[], "320kbps"), "");
    }

    #[test]
    fn entry_uses_defaults_and_fallbacks() {
        let mut song = CatalogSong::new("s1", "Song");
        song.duration = 215;
        song.image = variants(&["50x50", "150x150", "500x500"]);
        song.download_url = variants(&["96kbps", "320kbps"]);

        let entry = QueueEntry::from(&song);

        assert_eq!(entry.id, "s1");
        assert_eq!(entry.title, "Song");
        assert_eq!(entry.artist, UNKNOWN_ARTIST);
        assert_eq!(entry.album, "");
        assert_eq!(entry.duration_seconds, 215);
        assert_eq!(entry.artwork_url, "https://cdn.example.com/500x500");
        assert_eq!(entry.stream_url, "https://cdn.example.com/320kbps");
        assert!(entry.is_playable());
    }

    #[test]
    fn entry_honours_options() {
        let mut song = CatalogSong::new("s1", "Song");
        song.primary_artists = Some("Artist One, Artist Two".into());
        song.album = Some(AlbumRef {
            id: "al1".into(),
            name: "Album".into(),
            url: None,
        });
        song.image = variants(&["50x50", "150x150", "500x500"]);
        song.download_url = variants(&["96kbps", "160kbps", "320kbps"]);

        let entry = to_queue_entry(
            &song,
            ResolveOptions {
                stream_quality: AudioQuality::Low,
                artwork_size: ArtworkSize::Thumbnail,
            },
        );

        assert_eq!(entry.artist, "Artist One, Artist Two");
        assert_eq!(entry.album, "Album");
        assert_eq!(entry.stream_url, "https://cdn.example.com/96kbps");
        assert_eq!(entry.artwork_url, "https://cdn.example.com/50x50");
    }

    #[test]
    fn song_without_streams_is_not_playable() {
        let entry = QueueEntry::from(&CatalogSong::new("s1", "Song"));
        assert!(!entry.is_playable());
    }
}
