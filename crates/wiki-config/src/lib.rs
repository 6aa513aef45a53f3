//! Configuration management for the wiki converter.
//!
//! Parses `wiki.toml` files with serde and provides auto-discovery of the
//! config file in parent directories.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields: `site.domain` and everything under `[paths]`.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use wiki_config::Config;
//!
//! let config = Config::discover(Path::new("."))?;
//! let paths = config.site_paths();
//! # Ok::<(), wiki_config::ConfigError>(())
//! ```

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use wiki_link::SitePaths;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "wiki.toml";

/// Errors raised while locating or reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for this schema.
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
    /// No config file exists in the start directory or any parent.
    #[error("no {CONFIG_FILENAME} found in {} or any parent directory", start.display())]
    NotFound {
        /// Directory the search started from.
        start: PathBuf,
    },
    /// A `${VAR}` reference without a default named an unset variable.
    #[error("environment variable {name} is not set")]
    MissingEnv {
        /// Variable name.
        name: String,
    },
}

/// Application configuration parsed from `wiki.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,
    /// URL and path settings for the special link namespaces.
    pub paths: PathsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Site-wide settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Apex domain used for absolute cross-book URLs.
    pub domain: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            domain: "example.org".to_owned(),
        }
    }
}

/// URL and path settings for the special link namespaces.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Public base URL for uploaded media.
    pub media_url: String,
    /// Filesystem root holding attachments, one subdirectory per book.
    pub attachment_dir: String,
    /// Base URL of the generated API reference.
    pub api_url: String,
    /// Base URL for downloadable release files.
    pub download_url: String,
    /// Prefix for user profile URLs.
    pub profile_url: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            media_url: "/media".to_owned(),
            attachment_dir: "files".to_owned(),
            api_url: "/api".to_owned(),
            download_url: "/download".to_owned(),
            profile_url: "/profile?id=".to_owned(),
        }
    }
}

impl Config {
    /// Load configuration from `path` and expand environment references.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read,
    /// [`ConfigError::Parse`] on invalid TOML and
    /// [`ConfigError::MissingEnv`] when a `${VAR}` without a default is
    /// unset.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.expand_env()?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Find and load `wiki.toml`, searching `start_dir` and its parents.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when no config file exists on the
    /// path to the filesystem root, otherwise the errors of
    /// [`load`](Self::load).
    pub fn discover(start_dir: &Path) -> Result<Self, ConfigError> {
        let mut dir = start_dir;
        loop {
            let candidate = dir.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Self::load(&candidate);
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => {
                    return Err(ConfigError::NotFound {
                        start: start_dir.to_path_buf(),
                    });
                }
            }
        }
    }

    /// The [`SitePaths`] consumed by the link resolver and URL builder.
    #[must_use]
    pub fn site_paths(&self) -> SitePaths {
        SitePaths {
            media_url: self.paths.media_url.clone(),
            attachment_dir: PathBuf::from(&self.paths.attachment_dir),
            api_url: self.paths.api_url.clone(),
            download_url: self.paths.download_url.clone(),
            domain: self.site.domain.clone(),
            profile_url: self.paths.profile_url.clone(),
        }
    }

    fn expand_env(&mut self) -> Result<(), ConfigError> {
        for field in [
            &mut self.site.domain,
            &mut self.paths.media_url,
            &mut self.paths.attachment_dir,
            &mut self.paths.api_url,
            &mut self.paths.download_url,
            &mut self.paths.profile_url,
        ] {
            *field = expand::expand(field)
                .map_err(|expand::MissingVar(name)| ConfigError::MissingEnv { name })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[site]
domain = "wiki.example.net"

[paths]
media_url = "/files/media"
attachment_dir = "/srv/wiki/files"
api_url = "https://api.example.net"
download_url = "/files/releases"
profile_url = "https://forum.example.net/profile.php?id="
"#,
        );

        let config = Config::load(&path).unwrap();
        let paths = config.site_paths();

        assert_eq!(paths.domain, "wiki.example.net");
        assert_eq!(paths.media_url, "/files/media");
        assert_eq!(paths.attachment_dir, PathBuf::from("/srv/wiki/files"));
        assert_eq!(paths.api_url, "https://api.example.net");
        assert_eq!(paths.download_url, "/files/releases");
        assert_eq!(
            paths.profile_url,
            "https://forum.example.net/profile.php?id="
        );
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[site]\ndomain = \"d.example\"\n");

        let config = Config::load(&path).unwrap();
        assert_eq!(config.site.domain, "d.example");
        assert_eq!(config.paths.media_url, "/media");
        assert_eq!(config.paths.attachment_dir, "files");
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[site\ndomain =");

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);

        assert!(matches!(Config::load(&path), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_discover_walks_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[site]\ndomain = \"found.example\"\n");
        let nested = dir.path().join("books/doc/en");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::discover(&nested).unwrap();
        assert_eq!(config.site.domain, "found.example");
    }

    #[test]
    fn test_discover_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::discover(dir.path());
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_env_expansion_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[site]\ndomain = \"${WIKI_TEST_SURELY_UNSET:-fallback.example}\"\n",
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.site.domain, "fallback.example");
    }

    #[test]
    fn test_env_expansion_missing_variable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[paths]\nmedia_url = \"${WIKI_TEST_SURELY_UNSET}\"\n",
        );

        let result = Config::load(&path);
        assert!(matches!(
            result,
            Err(ConfigError::MissingEnv { name }) if name == "WIKI_TEST_SURELY_UNSET"
        ));
    }
}
