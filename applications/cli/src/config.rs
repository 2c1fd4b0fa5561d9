/// Riff configuration
use crate::error::{CliError, Result};
use riff_catalog::{CatalogConfig, ResolveOptions};
use riff_core::{ArtworkSize, AudioQuality};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File picked up from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "riff.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RiffConfig {
    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default)]
    pub stream_quality: AudioQuality,

    #[serde(default)]
    pub artwork_size: ArtworkSize,

    /// Status report interval of the simulated driver
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl RiffConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `riff.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. RIFF_CATALOG__BASE_URL
        settings = settings.add_source(
            config::Environment::with_prefix("RIFF")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.catalog.base_url.trim();
        if base_url.is_empty() {
            return Err(CliError::Config(
                "Catalog base URL is required (set RIFF_CATALOG__BASE_URL)".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "Catalog base URL must start with http:// or https://, got {base_url}"
            )));
        }
        if self.catalog.page_size == 0 {
            return Err(CliError::Config("Page size must be at least 1".to_string()));
        }
        if self.playback.tick_millis == 0 {
            return Err(CliError::Config("Tick interval must be at least 1ms".to_string()));
        }
        Ok(())
    }

    /// Settings for the catalog client
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.catalog.base_url.clone(),
            page_size: self.catalog.page_size,
            timeout_secs: self.catalog.timeout_secs,
        }
    }

    /// Variant choices used when turning catalog songs into queue entries
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            stream_quality: self.playback.stream_quality,
            artwork_size: self.playback.artwork_size,
        }
    }

    /// Simulated driver tick
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.playback.tick_millis)
    }
}

// Default values
fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        base_url: default_base_url(),
        page_size: default_page_size(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_base_url() -> String {
    riff_catalog::DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    riff_catalog::DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    riff_catalog::DEFAULT_TIMEOUT_SECS
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        stream_quality: AudioQuality::default(),
        artwork_size: ArtworkSize::default(),
        tick_millis: default_tick_millis(),
    }
}

fn default_tick_millis() -> u64 {
    500
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        path: default_storage_path(),
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data/riff.redb")
}

impl Default for RiffConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            playback: default_playback(),
            storage: default_storage(),
        }
    }
}
