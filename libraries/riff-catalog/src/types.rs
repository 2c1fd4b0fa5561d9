//! Wire types for the catalog API.

use serde::{Deserialize, Deserializer, Serialize};

/// One quality-tagged URL (artwork size or stream bitrate)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Quality label, e.g. `"320kbps"` or `"500x500"`
    pub quality: String,
    /// URL of this variant
    pub url: String,
}

impl Variant {
    /// Create a variant
    pub fn new(quality: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            quality: quality.into(),
            url: url.into(),
        }
    }
}

/// Album reference embedded in song metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Raw song metadata as returned by search, details and suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSong {
    pub id: String,

    /// Song title
    pub name: String,

    #[serde(default)]
    pub album: Option<AlbumRef>,

    /// Duration in seconds; the API sends either a string or a number
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: u32,

    /// Display artist string (may be missing or empty)
    #[serde(default)]
    pub primary_artists: Option<String>,

    #[serde(default)]
    pub year: Option<String>,

    #[serde(default)]
    pub language: Option<String>,

    /// Artwork variants, smallest first
    #[serde(default, deserialize_with = "deserialize_variants")]
    pub image: Vec<Variant>,

    /// Stream variants, lowest bitrate first
    #[serde(default, deserialize_with = "deserialize_variants")]
    pub download_url: Vec<Variant>,
}

impl CatalogSong {
    /// Minimal metadata, mostly useful for tests and fixtures
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            album: None,
            duration: 0,
            primary_artists: None,
            year: None,
            language: None,
            image: Vec::new(),
            download_url: Vec::new(),
        }
    }
}

/// Album metadata as returned by album search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogAlbum {
    pub id: String,

    /// Album title
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub year: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub primary_artists: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub language: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub url: Option<String>,

    /// Artwork variants, smallest first
    #[serde(default, deserialize_with = "deserialize_variants")]
    pub image: Vec<Variant>,
}

/// Artist metadata as returned by artist search and artist details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogArtist {
    pub id: String,

    /// Display name
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub role: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub follower_count: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub dominant_language: Option<String>,

    #[serde(default, deserialize_with = "deserialize_text")]
    pub url: Option<String>,

    /// Portrait variants, smallest first
    #[serde(default, deserialize_with = "deserialize_variants")]
    pub image: Vec<Variant>,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage<T = CatalogSong> {
    /// Matches on this page, in catalog order
    pub results: Vec<T>,
    /// Total matches reported by the catalog
    pub total: usize,
}

impl<T> Default for SearchPage<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            total: 0,
        }
    }
}

// ===== Envelopes =====

#[derive(Debug, Deserialize)]
pub(crate) struct SearchEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<SearchData<T>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchData<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total: usize,
}

impl<T> Default for SearchData<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            total: 0,
        }
    }
}

/// `{ success, data }` wrapper used by the lookup endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Artist songs arrive either as a bare list or wrapped with a total
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SongList {
    Plain(Vec<CatalogSong>),
    Paged {
        #[serde(default)]
        songs: Vec<CatalogSong>,
    },
}

impl SongList {
    pub(crate) fn into_songs(self) -> Vec<CatalogSong> {
        match self {
            Self::Plain(songs) | Self::Paged { songs } => songs,
        }
    }
}

// ===== Lenient field parsing =====

/// Accepts `"215"`, `215`, `215.9`, `null`; anything unparseable is 0
fn deserialize_duration<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Integer(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<RawDuration>::deserialize(deserializer)? {
        None => 0,
        Some(RawDuration::Integer(n)) => u32::try_from(n.max(0)).unwrap_or(u32::MAX),
        Some(RawDuration::Float(f)) if f.is_finite() && f > 0.0 => {
            f.trunc().min(f64::from(u32::MAX)) as u32
        }
        Some(RawDuration::Float(_)) => 0,
        Some(RawDuration::Text(text)) => parse_duration(&text),
    })
}

/// `null` variant lists are treated as empty
fn deserialize_variants<'de, D>(deserializer: D) -> Result<Vec<Variant>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Variant>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Strings are kept, numbers are rendered, anything else is dropped
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Leading-integer parse: `"215abc"` is 215, `"abc"` and negatives are 0
pub(crate) fn parse_duration(text: &str) -> u32 {
    let text = text.trim_start();
    if text.starts_with('-') {
        return 0;
    }
    let digits = text.strip_prefix('+').unwrap_or(text);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }
    digits[..end].parse().unwrap_or(u32::MAX)
}
