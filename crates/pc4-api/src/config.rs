//! Configuration file and the session factory.
//!
//! ```json
//! {
//!   "hermes_path": "/data/snomed/uk_sct2cl_39.0.0",
//!   "ods_path": "/data/ods",
//!   "nhspd_path": "/data/nhspd",
//!   "default_language": "en-GB"
//! }
//! ```
//!
//! Every field is optional. `PC4_HERMES_PATH`, `PC4_ODS_PATH`,
//! `PC4_NHSPD_PATH` and `PC4_DEFAULT_LANGUAGE` override the file.

use std::fs;
use std::path::{Path, PathBuf};

use pc4_store::StoreConfig;
use pc4_types::well_known;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::hermes::TerminologySession;
use crate::ods::DirectorySession;

/// Overrides `hermes_path`.
pub const ENV_HERMES_PATH: &str = "PC4_HERMES_PATH";
/// Overrides `ods_path`.
pub const ENV_ODS_PATH: &str = "PC4_ODS_PATH";
/// Overrides `nhspd_path`.
pub const ENV_NHSPD_PATH: &str = "PC4_NHSPD_PATH";
/// Overrides `default_language`.
pub const ENV_DEFAULT_LANGUAGE: &str = "PC4_DEFAULT_LANGUAGE";

/// Locations of the stores and session defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SNOMED CT release directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hermes_path: Option<PathBuf>,
    /// Organisation CSV directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ods_path: Option<PathBuf>,
    /// Postcode CSV directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nhspd_path: Option<PathBuf>,
    /// Language tag used when callers omit one.
    pub default_language: String,
    /// Whether to load active components only.
    pub active_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hermes_path: None,
            ods_path: None,
            nhspd_path: None,
            default_language: well_known::DEFAULT_LANGUAGE_TAG.to_string(),
            active_only: true,
        }
    }
}

impl Config {
    /// Reads a JSON configuration file.
    ///
    /// # Errors
    /// [`ApiError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ApiResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
            .map_err(|e| ApiError::Config(format!("{}: {e}", path.display())))
    }

    /// Parses a JSON configuration.
    pub fn from_json(text: &str) -> ApiResult<Self> {
        serde_json::from_str(text).map_err(|e| ApiError::Config(e.to_string()))
    }

    /// Builds a configuration from environment variables alone.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies environment variable overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = lookup(ENV_HERMES_PATH) {
            self.hermes_path = Some(path.into());
        }
        if let Some(path) = lookup(ENV_ODS_PATH) {
            self.ods_path = Some(path.into());
        }
        if let Some(path) = lookup(ENV_NHSPD_PATH) {
            self.nhspd_path = Some(path.into());
        }
        if let Some(tag) = lookup(ENV_DEFAULT_LANGUAGE) {
            self.default_language = tag;
        }
        self
    }

    /// Store loading options derived from this configuration.
    ///
    /// Descriptions are kept in English, where international release FSNs
    /// live, and in the default language's primary subtag.
    pub fn store_config(&self) -> StoreConfig {
        let mut language_codes = StoreConfig::default().language_codes;
        let primary = well_known::primary_language(&self.default_language);
        if !primary.is_empty() && !language_codes.contains(&primary) {
            language_codes.push(primary);
        }

        StoreConfig {
            active_only: self.active_only,
            language_codes,
            language_tag: self.default_language.clone(),
        }
    }
}

/// Opens and owns the configured sessions.
///
/// ```ignore
/// let factory = Factory::from_config_file("pc4.json")?;
/// if let Some(hermes) = factory.hermes() {
///     let concept = hermes.fetch_concept(37340000)?;
/// }
/// factory.close();
/// ```
#[derive(Debug)]
pub struct Factory {
    config: Config,
    hermes: Option<TerminologySession>,
    ods: Option<DirectorySession>,
}

impl Factory {
    /// Reads a configuration file, applies environment overrides and opens
    /// the sessions it names.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> ApiResult<Self> {
        Self::from_config(Config::from_file(path)?.with_env_overrides())
    }

    /// Opens the sessions named by `config`.
    ///
    /// # Errors
    /// [`ApiError::Config`] if only one of the two directory locations is
    /// set; [`ApiError::UnavailableStore`] if a store fails to open.
    pub fn from_config(config: Config) -> ApiResult<Self> {
        let hermes = config
            .hermes_path
            .as_ref()
            .map(|path| TerminologySession::open_with(path, &config.store_config()))
            .transpose()?;

        let ods = match (&config.ods_path, &config.nhspd_path) {
            (Some(ods), Some(nhspd)) => Some(DirectorySession::open(ods, nhspd)?),
            (None, None) => None,
            _ => {
                return Err(ApiError::Config(
                    "ods_path and nhspd_path must be set together".to_string(),
                ))
            }
        };

        info!(
            hermes = hermes.is_some(),
            ods = ods.is_some(),
            "factory ready"
        );
        Ok(Self { config, hermes, ods })
    }

    /// Returns the configuration the factory was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the terminology session, if one is configured.
    pub fn hermes(&self) -> Option<&TerminologySession> {
        self.hermes.as_ref()
    }

    /// Returns the directory session, if one is configured.
    pub fn ods(&self) -> Option<&DirectorySession> {
        self.ods.as_ref()
    }

    /// Closes every session.
    pub fn close(&self) {
        if let Some(hermes) = &self.hermes {
            hermes.close();
        }
        if let Some(ods) = &self.ods {
            ods.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_language, "en-GB");
        assert!(config.active_only);
    }

    #[test]
    fn test_from_json() {
        let config = Config::from_json(
            r#"{"hermes_path": "/data/snomed", "default_language": "en-US", "active_only": false}"#,
        )
        .unwrap();

        assert_eq!(config.hermes_path, Some(PathBuf::from("/data/snomed")));
        assert_eq!(config.ods_path, None);
        assert_eq!(config.store_config().language_tag, "en-US");
        assert!(!config.store_config().active_only);
    }

    #[test]
    fn test_store_config_loads_default_language_terms() {
        let english = Config::default().store_config();
        assert_eq!(english.language_codes, vec!["en"]);

        let spanish = Config {
            default_language: "es".to_string(),
            ..Config::default()
        }
        .store_config();
        assert_eq!(spanish.language_codes, vec!["en", "es"]);
        assert_eq!(spanish.language_tag, "es");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Config::from_json("{\"hermes_path\": 3}"),
            Err(ApiError::Config(_))
        ));
        assert!(matches!(
            Config::from_file("/no/such/pc4.json"),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_HERMES_PATH, "/env/snomed"),
            (ENV_DEFAULT_LANGUAGE, "en-US"),
            (ENV_ODS_PATH, "  "),
        ]);
        let config = Config {
            ods_path: Some(PathBuf::from("/file/ods")),
            ..Config::default()
        }
        .with_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.hermes_path, Some(PathBuf::from("/env/snomed")));
        assert_eq!(config.ods_path, Some(PathBuf::from("/file/ods")));
        assert_eq!(config.default_language, "en-US");
    }

    #[test]
    fn test_factory_without_stores() {
        let factory = Factory::from_config(Config::default()).unwrap();
        assert!(factory.hermes().is_none());
        assert!(factory.ods().is_none());
        factory.close();
    }

    #[test]
    fn test_factory_rejects_half_directory_config() {
        let config = Config {
            ods_path: Some(PathBuf::from("/data/ods")),
            ..Config::default()
        };
        assert!(matches!(
            Factory::from_config(config),
            Err(ApiError::Config(_))
        ));
    }

    #[test]
    fn test_serialised_config_omits_unset_paths() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert_eq!(json, r#"{"default_language":"en-GB","active_only":true}"#);
    }
}
