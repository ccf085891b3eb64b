//! Configuration layering, file discovery and environment overrides

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use gallery_core::error::GalleryError;
use tracing::debug;

use crate::toml::{parse_table, validate_config, GalleryToml};
use crate::ConfigResult;

/// Project configuration file name
pub const PROJECT_CONFIG_FILE: &str = "gallery.toml";

/// Prefix of recognised environment overrides
pub const ENV_PREFIX: &str = "GALLERY_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
    /// Home directory holding `.gallery/config.toml`
    home: Option<Utf8PathBuf>,
}

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Global config file
    Global(Utf8PathBuf),
    /// gallery.toml discovered from the working directory
    Project(Utf8PathBuf),
    /// File named on the command line
    Explicit(Utf8PathBuf),
    /// Environment variable
    Environment(String),
}

/// Fully resolved configuration and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: GalleryToml,
    /// Contributing layers, lowest priority first; empty means pure defaults
    pub sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        let home = dirs::home_dir().and_then(|path| Utf8PathBuf::try_from(path).ok());
        Self { cwd, home }
    }

    /// Create a loader with an explicit home directory
    pub fn with_home(cwd: Utf8PathBuf, home: Option<Utf8PathBuf>) -> Self {
        Self { cwd, home }
    }

    /// Find configuration file in project (walks up directory tree)
    pub fn resolve_config_path(&self, filename: &str) -> Option<Utf8PathBuf> {
        self.cwd
            .ancestors()
            .map(|dir| dir.join(filename))
            .find(|candidate| candidate.is_file())
    }

    /// Location of the global configuration file
    pub fn global_config_path(&self) -> Option<Utf8PathBuf> {
        self.home
            .as_ref()
            .map(|home| home.join(".gallery").join("config.toml"))
    }

    /// Load configuration using the process environment for overrides
    pub async fn load(&self, explicit: Option<&Utf8Path>) -> ConfigResult<LoadedConfig> {
        self.load_with_env(explicit, &ConfigLayering::collect_env_overrides())
            .await
    }

    /// Load configuration with the given environment overrides
    pub async fn load_with_env(
        &self,
        explicit: Option<&Utf8Path>,
        env_overrides: &HashMap<String, String>,
    ) -> ConfigResult<LoadedConfig> {
        let mut layering = ConfigLayering::new();

        if let Some(global) = self.global_config_path().filter(|path| path.is_file()) {
            let table = read_table(&global).await?;
            layering.push_file(ConfigSource::Global(global), table);
        }

        match explicit {
            Some(path) => {
                // A named file must exist, unlike discovered ones
                let table = read_table(path).await?;
                layering.push_file(ConfigSource::Explicit(path.to_path_buf()), table);
            }
            None => {
                if let Some(project) = self.resolve_config_path(PROJECT_CONFIG_FILE) {
                    let table = read_table(&project).await?;
                    layering.push_file(ConfigSource::Project(project), table);
                }
            }
        }

        layering.set_env_overrides(env_overrides.clone());
        layering.resolve()
    }
}

async fn read_table(path: &Utf8Path) -> ConfigResult<::toml::Table> {
    debug!("Reading configuration from {}", path);
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| GalleryError::io(format!("Failed to read {}", path), e))?;

    parse_table(&content).map_err(|e| match e {
        GalleryError::TomlParse { message } => GalleryError::TomlParse {
            message: format!("In file {}: {}", path, message),
        },
        other => other,
    })
}

/// Configuration layering and merging
#[derive(Debug, Default)]
pub struct ConfigLayering {
    /// File layers, lowest priority first
    files: Vec<(ConfigSource, ::toml::Table)>,
    /// Environment overrides
    env_overrides: HashMap<String, String>,
}

impl ConfigLayering {
    /// Create a new configuration layering system
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file layer above every layer added so far
    pub fn push_file(&mut self, source: ConfigSource, table: ::toml::Table) {
        self.files.push((source, table));
    }

    pub fn set_env_overrides(&mut self, overrides: HashMap<String, String>) {
        self.env_overrides = overrides;
    }

    /// Merge all layers over the defaults and validate the result
    pub fn resolve(self) -> ConfigResult<LoadedConfig> {
        let mut merged = ::toml::Table::new();
        let mut sources = Vec::with_capacity(self.files.len());

        for (source, table) in self.files {
            Self::merge_tables(&mut merged, table);
            sources.push(source);
        }

        let mut config: GalleryToml = ::toml::Value::Table(merged)
            .try_into()
            .map_err(|e: ::toml::de::Error| GalleryError::TomlParse {
                message: e.to_string(),
            })?;

        for key in Self::apply_env_overrides(&mut config, &self.env_overrides)? {
            sources.push(ConfigSource::Environment(key));
        }

        validate_config(&config)?;

        Ok(LoadedConfig { config, sources })
    }

    /// Deep-merge `overlay` into `base`; overlay keys win, nested tables merge
    pub fn merge_tables(base: &mut ::toml::Table, overlay: ::toml::Table) {
        for (key, value) in overlay {
            match (base.get_mut(&key), value) {
                (Some(::toml::Value::Table(existing)), ::toml::Value::Table(incoming)) => {
                    Self::merge_tables(existing, incoming);
                }
                (_, value) => {
                    base.insert(key, value);
                }
            }
        }
    }

    /// Apply environment variable overrides, returning the keys that applied
    pub fn apply_env_overrides(
        config: &mut GalleryToml,
        overrides: &HashMap<String, String>,
    ) -> ConfigResult<Vec<String>> {
        let mut applied = Vec::new();

        let mut keys: Vec<&String> = overrides.keys().collect();
        keys.sort();

        for key in keys {
            let value = &overrides[key];
            match key.as_str() {
                "GALLERY_BASE_URL" => config.api.base_url = value.clone(),
                "GALLERY_TIMEOUT_MS" => config.api.timeout_ms = parse_number(key, value)?,
                "GALLERY_MAX_RETRIES" => config.api.max_retries = parse_number(key, value)?,
                "GALLERY_RETRY_DELAY_MS" => config.api.retry_delay_ms = parse_number(key, value)?,
                "GALLERY_CACHE_TTL_MS" => config.api.cache_ttl_ms = parse_number(key, value)?,
                "GALLERY_IIIF_URL" => config.images.iiif_url = value.clone(),
                _ => {
                    // Unknown environment variable, ignore
                    continue;
                }
            }
            applied.push(key.clone());
        }

        Ok(applied)
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| GalleryError::ConfigValidation {
        field: key.to_string(),
        reason: format!("'{}' is not a valid number: {}", value, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_dir(temp_dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_without_files() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoader::with_home(utf8_dir(&temp_dir), None);

        let loaded = loader.load_with_env(None, &HashMap::new()).await.unwrap();

        assert_eq!(loaded.config, GalleryToml::default());
        assert!(loaded.sources.is_empty());
    }

    #[tokio::test]
    async fn test_project_config_found_from_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_dir(&temp_dir);
        tokio::fs::write(root.join("gallery.toml"), "[api]\nmax_retries = 1\n")
            .await
            .unwrap();
        let nested = root.join("a").join("b");
        tokio::fs::create_dir_all(&nested).await.unwrap();

        let loader = ConfigLoader::with_home(nested, None);
        let loaded = loader.load_with_env(None, &HashMap::new()).await.unwrap();

        assert_eq!(loaded.config.api.max_retries, 1);
        assert_eq!(loaded.sources, vec![ConfigSource::Project(root.join("gallery.toml"))]);
    }

    #[tokio::test]
    async fn test_project_layer_overrides_global() {
        let home_dir = TempDir::new().unwrap();
        let home = utf8_dir(&home_dir);
        tokio::fs::create_dir_all(home.join(".gallery")).await.unwrap();
        tokio::fs::write(
            home.join(".gallery").join("config.toml"),
            "[api]\nmax_retries = 5\ncache_ttl_ms = 1000\n",
        )
        .await
        .unwrap();

        let project_dir = TempDir::new().unwrap();
        let project = utf8_dir(&project_dir);
        tokio::fs::write(project.join("gallery.toml"), "[api]\nmax_retries = 2\n")
            .await
            .unwrap();

        let loader = ConfigLoader::with_home(project.clone(), Some(home.clone()));
        let loaded = loader.load_with_env(None, &HashMap::new()).await.unwrap();

        // Project wins per key, global fills the rest
        assert_eq!(loaded.config.api.max_retries, 2);
        assert_eq!(loaded.config.api.cache_ttl_ms, 1000);
        assert_eq!(loaded.sources.len(), 2);
        assert!(matches!(loaded.sources[0], ConfigSource::Global(_)));
        assert!(matches!(loaded.sources[1], ConfigSource::Project(_)));
    }

    #[tokio::test]
    async fn test_explicit_path_replaces_discovery() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_dir(&temp_dir);
        tokio::fs::write(root.join("gallery.toml"), "[api]\nmax_retries = 1\n")
            .await
            .unwrap();
        let explicit = root.join("other.toml");
        tokio::fs::write(&explicit, "[api]\ntimeout_ms = 2500\n").await.unwrap();

        let loader = ConfigLoader::with_home(root, None);
        let loaded = loader
            .load_with_env(Some(explicit.as_path()), &HashMap::new())
            .await
            .unwrap();

        assert_eq!(loaded.config.api.timeout_ms, 2500);
        assert_eq!(loaded.config.api.max_retries, 3);
        assert_eq!(loaded.sources, vec![ConfigSource::Explicit(explicit)]);
    }

    #[tokio::test]
    async fn test_missing_explicit_path_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_dir(&temp_dir);
        let loader = ConfigLoader::with_home(root.clone(), None);

        let err = loader
            .load_with_env(Some(root.join("missing.toml").as_path()), &HashMap::new())
            .await
            .unwrap_err();

        assert!(matches!(err, GalleryError::Io { .. }));
    }

    #[tokio::test]
    async fn test_env_overrides_apply_last() {
        let temp_dir = TempDir::new().unwrap();
        let root = utf8_dir(&temp_dir);
        tokio::fs::write(root.join("gallery.toml"), "[api]\nretry_delay_ms = 50\n")
            .await
            .unwrap();

        let mut env = HashMap::new();
        env.insert("GALLERY_RETRY_DELAY_MS".to_string(), "10".to_string());
        env.insert("GALLERY_BASE_URL".to_string(), "http://localhost:9000".to_string());
        env.insert("GALLERY_UNRELATED".to_string(), "x".to_string());

        let loader = ConfigLoader::with_home(root, None);
        let loaded = loader.load_with_env(None, &env).await.unwrap();

        assert_eq!(loaded.config.api.retry_delay_ms, 10);
        assert_eq!(loaded.config.api.base_url, "http://localhost:9000");
        assert_eq!(
            &loaded.sources[1..],
            &[
                ConfigSource::Environment("GALLERY_BASE_URL".to_string()),
                ConfigSource::Environment("GALLERY_RETRY_DELAY_MS".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_env_number() {
        let mut config = GalleryToml::default();
        let mut env = HashMap::new();
        env.insert("GALLERY_MAX_RETRIES".to_string(), "many".to_string());

        let err = ConfigLayering::apply_env_overrides(&mut config, &env).unwrap_err();
        match err {
            GalleryError::ConfigValidation { field, .. } => {
                assert_eq!(field, "GALLERY_MAX_RETRIES")
            }
            other => panic!("Expected ConfigValidation error, got {:?}", other),
        }
    }

    #[test]
    fn test_env_override_is_validated() {
        let mut layering = ConfigLayering::new();
        let mut env = HashMap::new();
        env.insert("GALLERY_TIMEOUT_MS".to_string(), "0".to_string());
        layering.set_env_overrides(env);

        assert!(layering.resolve().is_err());
    }

    #[test]
    fn test_merge_tables_is_deep() {
        let mut base = parse_table(
            r#"
[api]
max_retries = 5
timeout_ms = 100

[images]
default_size = "a"
"#,
        )
        .unwrap();
        let overlay = parse_table("[api]\nmax_retries = 1\n").unwrap();

        ConfigLayering::merge_tables(&mut base, overlay);

        let config: GalleryToml = ::toml::Value::Table(base).try_into().unwrap();
        assert_eq!(config.api.max_retries, 1);
        assert_eq!(config.api.timeout_ms, 100);
        assert_eq!(config.images.default_size, "a");
    }
}
