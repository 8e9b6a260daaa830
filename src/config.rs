//! Configuration management using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::widget::{
    WidgetTargets, DEFAULT_DATA_PATH, DEFAULT_REPOS_CONTAINER, DEFAULT_STATS_CONTAINER,
};

/// Name used for config file discovery.
pub const CONFIG_NAME: &str = "portfolio-activity";

/// Default GitHub API base URL.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default collection window in days.
pub const DEFAULT_LOOKBACK_DAYS: u64 = 30;

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Site root: a directory on disk or an `http(s)` URL.
    pub site_root: String,
    /// Activity document path, relative to the site root.
    pub data_path: String,
    /// Id of the stats grid container.
    pub stats_container: String,
    /// Id of the recent repositories container.
    pub repos_container: String,
    /// User agent for HTTP requests.
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// GitHub account whose activity is collected.
    pub github_username: Option<String>,
    /// Personal access token for higher API rate limits.
    pub github_token: Option<String>,
    /// GitHub API base URL.
    pub github_api_url: String,
    /// Collection window in days.
    pub lookback_days: u64,
    /// Where `collect` writes the activity document.
    pub output_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_root: ".".to_string(),
            data_path: DEFAULT_DATA_PATH.to_string(),
            stats_container: DEFAULT_STATS_CONTAINER.to_string(),
            repos_container: DEFAULT_REPOS_CONTAINER.to_string(),
            user_agent: None,
            request_timeout: 30,
            github_username: None,
            github_token: None,
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            output_path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

impl Settings {
    /// Container ids for the widgets.
    pub fn targets(&self) -> WidgetTargets {
        WidgetTargets {
            stats: self.stats_container.clone(),
            repos: self.repos_container.clone(),
        }
    }

    /// Whether the site root points at a web server rather than a directory.
    pub fn site_is_remote(&self) -> bool {
        self.site_root.starts_with("http://") || self.site_root.starts_with("https://")
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Site root directory or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_root: Option<String>,
    /// Activity document path relative to the site root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_container: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repos_container: Option<String>,
    /// User agent string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookback_days: Option<u64>,
    /// Output file for `collect`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    pub async fn load() -> Self {
        // Use prefer for file discovery, then parse with serde
        match prefer::load(CONFIG_NAME).await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("{}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            // No config file found
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML, and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, String> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        match ext {
            "toml" => {
                toml::from_str(contents).map_err(|e| format!("Failed to parse TOML config: {}", e))
            }
            "yaml" | "yml" => serde_yaml::from_str(contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e)),
            _ => serde_json::from_str(contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e)),
        }
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    /// `base_dir` is used to resolve relative paths (typically config file dir or CWD).
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref site_root) = self.site_root {
            settings.site_root = resolve_site_root(self, site_root, base_dir);
        }
        if let Some(ref data_path) = self.data_path {
            settings.data_path = data_path.clone();
        }
        if let Some(ref id) = self.stats_container {
            settings.stats_container = id.clone();
        }
        if let Some(ref id) = self.repos_container {
            settings.repos_container = id.clone();
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ref username) = self.github_username {
            settings.github_username = Some(username.clone());
        }
        if let Some(ref api_url) = self.github_api_url {
            settings.github_api_url = api_url.trim_end_matches('/').to_string();
        }
        if let Some(days) = self.lookback_days {
            settings.lookback_days = days;
        }
        if let Some(ref output) = self.output_path {
            settings.output_path = self.resolve_path(output, base_dir);
        }
    }
}

/// URLs pass through; directories resolve like any other path.
fn resolve_site_root(config: &Config, site_root: &str, base_dir: &Path) -> String {
    if site_root.starts_with("http://") || site_root.starts_with("https://") {
        site_root.to_string()
    } else {
        config
            .resolve_path(site_root, base_dir)
            .display()
            .to_string()
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Use CWD for relative paths instead of config file directory.
    pub use_cwd: bool,
    /// Site root override (--site flag).
    pub site_root: Option<String>,
}

/// Load config from file sources.
async fn load_file_config(options: &LoadOptions) -> Config {
    // Priority 1: Explicit --config flag
    if let Some(ref config_path) = options.config_path {
        return match Config::load_from_path(config_path).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}", e);
                Config::default()
            }
        };
    }

    // Priority 2: Auto-discover via prefer
    Config::load().await
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
pub async fn load_settings_with_options(options: LoadOptions) -> (Settings, Config) {
    let config = load_file_config(&options).await;
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Determine base directory for resolving relative paths
    let base_dir = if options.use_cwd {
        cwd.clone()
    } else {
        config.base_dir().unwrap_or_else(|| cwd.clone())
    };

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings, &base_dir);
    apply_env_overrides(&mut settings, &config, &cwd);

    // --site override takes precedence over config and environment
    if let Some(ref site) = options.site_root {
        settings.site_root = resolve_site_root(&config, site, &cwd);
    }

    (settings, config)
}

fn apply_env_overrides(settings: &mut Settings, config: &Config, cwd: &Path) {
    if let Some(site) = non_empty_env("FOLIO_SITE_ROOT") {
        tracing::debug!("Using FOLIO_SITE_ROOT from environment: {}", site);
        settings.site_root = resolve_site_root(config, &site, cwd);
    }
    if let Some(username) = non_empty_env("GITHUB_USERNAME") {
        settings.github_username = Some(username);
    }
    // Token only ever comes from the environment
    if let Some(token) = non_empty_env("GITHUB_TOKEN") {
        settings.github_token = Some(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.data_path, "data/github_activity.json");
        assert_eq!(settings.targets(), WidgetTargets::default());
        assert_eq!(settings.lookback_days, 30);
        assert!(!settings.site_is_remote());
    }

    #[test]
    fn test_parse_toml() {
        let config = Config::parse(
            "site_root = \"public\"\nstats_container = \"stats\"\nlookback_days = 7\n",
            Path::new("portfolio-activity.toml"),
        )
        .unwrap();
        assert_eq!(config.site_root.as_deref(), Some("public"));
        assert_eq!(config.stats_container.as_deref(), Some("stats"));
        assert_eq!(config.lookback_days, Some(7));
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let yaml = Config::parse(
            "github_username: octocat\n",
            Path::new("portfolio-activity.yaml"),
        )
        .unwrap();
        assert_eq!(yaml.github_username.as_deref(), Some("octocat"));

        let json = Config::parse(
            r#"{"repos_container": "repos"}"#,
            Path::new("portfolio-activity.json"),
        )
        .unwrap();
        assert_eq!(json.repos_container.as_deref(), Some("repos"));
    }

    #[test]
    fn test_parse_invalid() {
        let err = Config::parse("not = [valid", Path::new("c.toml")).unwrap_err();
        assert!(err.contains("TOML"));
    }

    #[test]
    fn test_apply_resolves_relative_paths() {
        let config = Config {
            site_root: Some("public".to_string()),
            output_path: Some("public/data/activity.json".to_string()),
            github_api_url: Some("https://ghe.example.com/api/v3/".to_string()),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("/srv/site"));

        assert_eq!(
            settings.site_root,
            Path::new("/srv/site").join("public").display().to_string()
        );
        assert_eq!(
            settings.output_path,
            Path::new("/srv/site").join("public/data/activity.json")
        );
        assert_eq!(settings.github_api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_apply_keeps_remote_site_root() {
        let config = Config {
            site_root: Some("https://octocat.github.io/".to_string()),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("/srv/site"));

        assert_eq!(settings.site_root, "https://octocat.github.io/");
        assert!(settings.site_is_remote());
    }

    #[tokio::test]
    async fn test_load_from_path_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio-activity.toml");
        std::fs::write(&path, "repos_container = \"repos\"\n").unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.source_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.base_dir().as_deref(), Some(dir.path()));
    }
}
