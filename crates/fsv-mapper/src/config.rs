use std::fs;
use std::path::{Path, PathBuf};

use fsv_content::ContentCacheConfig;
use fsv_stat::StatCacheConfig;
use serde::{Deserialize, Serialize};

use crate::error::{MapperError, MapperResult};

/// Configuration for a [`crate::FileVaultMapper`].
///
/// ```toml
/// provider_root = "jcr_root"
/// filter_xml = "META-INF/vault/filter.xml"
///
/// [stat_cache]
/// ttl_ms = 1000
/// max_entries = 10000
///
/// [content_cache]
/// max_size = 1000
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Directory mapped to the logical root `/`.
    pub provider_root: PathBuf,
    /// Optional workspace filter file.
    pub filter_xml: Option<PathBuf>,
    /// File stat cache settings.
    pub stat_cache: StatCacheConfig,
    /// Descriptor cache settings.
    pub content_cache: ContentCacheConfig,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            provider_root: PathBuf::from("."),
            filter_xml: None,
            stat_cache: StatCacheConfig::default(),
            content_cache: ContentCacheConfig::default(),
        }
    }
}

impl MapperConfig {
    /// A default configuration for the given provider root.
    pub fn for_root(provider_root: impl Into<PathBuf>) -> Self {
        Self {
            provider_root: provider_root.into(),
            ..Default::default()
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> MapperResult<Self> {
        toml::from_str(s).map_err(|e| MapperError::Config(e.to_string()))
    }

    /// Read a TOML file. Relative paths inside it are resolved against the
    /// directory containing the file.
    pub fn load(file: &Path) -> MapperResult<Self> {
        let text = fs::read_to_string(file)?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = file.parent() {
            config.provider_root = base.join(&config.provider_root);
            config.filter_xml = config.filter_xml.map(|f| base.join(f));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = MapperConfig::default();
        assert_eq!(c.provider_root, PathBuf::from("."));
        assert!(c.filter_xml.is_none());
        assert_eq!(c.stat_cache, StatCacheConfig::default());
        assert_eq!(c.content_cache.max_size, 1_000);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let c = MapperConfig::from_toml_str(
            r#"
            provider_root = "jcr_root"

            [stat_cache]
            ttl_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(c.provider_root, PathBuf::from("jcr_root"));
        assert_eq!(c.stat_cache.ttl_ms, 0);
        assert_eq!(c.stat_cache.max_entries, StatCacheConfig::default().max_entries);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let result = MapperConfig::from_toml_str("provider_root = [");
        assert!(matches!(result, Err(MapperError::Config(_))));
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("fsv.toml");
        fs::write(
            &file,
            "provider_root = \"jcr_root\"\nfilter_xml = \"META-INF/vault/filter.xml\"\n",
        )
        .unwrap();

        let c = MapperConfig::load(&file).unwrap();
        assert_eq!(c.provider_root, dir.path().join("jcr_root"));
        assert_eq!(
            c.filter_xml,
            Some(dir.path().join("META-INF/vault/filter.xml"))
        );
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MapperConfig::load(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(MapperError::Io(_))));
    }
}
