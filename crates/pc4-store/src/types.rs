//! Errors, loading configuration and discovered release files.

use std::path::PathBuf;

use pc4_types::{well_known, CharacteristicType, DescriptionType, SctId};
use thiserror::Error;

/// Errors raised while loading or querying the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error reading a data file.
    #[error("IO error reading data file: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid SCTID format.
    #[error("Invalid SCTID format: {value}")]
    InvalidSctId {
        /// The invalid value.
        value: String,
    },

    /// Invalid date format.
    #[error("Invalid date format: {value}")]
    InvalidDate {
        /// The invalid value.
        value: String,
    },

    /// Invalid boolean value.
    #[error("Invalid boolean value: {value} (expected 0 or 1)")]
    InvalidBoolean {
        /// The invalid value.
        value: String,
    },

    /// Invalid integer value.
    #[error("Invalid integer value: {value}")]
    InvalidInteger {
        /// The invalid value.
        value: String,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The missing path.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The missing path.
        path: String,
    },

    /// Required file missing from a release directory.
    #[error("Required RF2 file not found: {file_type} in {directory}")]
    RequiredFileMissing {
        /// The kind of file that is missing.
        file_type: String,
        /// The directory that was searched.
        directory: String,
    },

    /// A directory holds no usable CSV files.
    #[error("No {kind} data files found in {directory}")]
    NoDataFiles {
        /// What kind of data was expected.
        kind: &'static str,
        /// The directory that was searched.
        directory: String,
    },

    /// Header has fewer columns than the record type needs.
    #[error("Invalid header: expected {expected} columns, found {found}")]
    InvalidHeader {
        /// Expected column count.
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// Unexpected column name.
    #[error("Unexpected column '{found}' at position {position}, expected '{expected}'")]
    UnexpectedColumn {
        /// The column position.
        position: usize,
        /// Expected column name.
        expected: String,
        /// Found column name.
        found: String,
    },

    /// An expression constraint could not be parsed or evaluated.
    #[error("Invalid constraint '{constraint}': {message}")]
    InvalidConstraint {
        /// The constraint as given.
        constraint: String,
        /// The engine's explanation.
        message: String,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Configuration for RF2 parsing.
#[derive(Debug, Clone)]
pub struct Rf2Config {
    /// Whether to keep active records only.
    pub active_only: bool,
}

impl Default for Rf2Config {
    fn default() -> Self {
        Self { active_only: true }
    }
}

/// Configuration specific to description parsing.
#[derive(Debug, Clone)]
pub struct DescriptionConfig {
    /// Base RF2 configuration.
    pub base: Rf2Config,
    /// Language codes to include (empty = all languages).
    pub language_codes: Vec<String>,
    /// Description type IDs to include (empty = all types).
    pub type_ids: Vec<SctId>,
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            base: Rf2Config::default(),
            language_codes: vec!["en".to_string()],
            type_ids: vec![],
        }
    }
}

impl DescriptionConfig {
    /// Fully specified names and synonyms only, in the given languages.
    pub fn terms_in(language_codes: Vec<String>) -> Self {
        Self {
            base: Rf2Config::default(),
            language_codes,
            type_ids: vec![DescriptionType::FSN_ID, DescriptionType::SYNONYM_ID],
        }
    }
}

/// Configuration specific to relationship parsing.
#[derive(Debug, Clone, Default)]
pub struct RelationshipConfig {
    /// Base RF2 configuration.
    pub base: Rf2Config,
    /// Relationship type IDs to include (empty = all types).
    pub type_ids: Vec<SctId>,
    /// Characteristic type IDs to include (empty = all types).
    pub characteristic_type_ids: Vec<SctId>,
}

impl RelationshipConfig {
    /// Inferred relationships only.
    pub fn inferred_only() -> Self {
        Self {
            base: Rf2Config::default(),
            type_ids: vec![],
            characteristic_type_ids: vec![CharacteristicType::INFERRED_ID],
        }
    }
}

/// Options used when opening a store from a release directory.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Whether to keep active components only.
    pub active_only: bool,
    /// Description language codes to load.
    pub language_codes: Vec<String>,
    /// Language tag used for display terms in search results.
    pub language_tag: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            active_only: true,
            language_codes: vec!["en".to_string()],
            language_tag: well_known::DEFAULT_LANGUAGE_TAG.to_string(),
        }
    }
}

impl StoreConfig {
    pub(crate) fn rf2(&self) -> Rf2Config {
        Rf2Config {
            active_only: self.active_only,
        }
    }

    pub(crate) fn descriptions(&self) -> DescriptionConfig {
        DescriptionConfig {
            base: self.rf2(),
            ..DescriptionConfig::terms_in(self.language_codes.clone())
        }
    }

    pub(crate) fn relationships(&self) -> RelationshipConfig {
        RelationshipConfig {
            base: self.rf2(),
            ..RelationshipConfig::inferred_only()
        }
    }
}

/// Discovered RF2 files in a release directory.
#[derive(Debug, Clone, Default)]
pub struct Rf2Files {
    /// Path to concept file.
    pub concept_file: Option<PathBuf>,
    /// Path to description file.
    pub description_file: Option<PathBuf>,
    /// Path to relationship file.
    pub relationship_file: Option<PathBuf>,
    /// Paths to simple reference set files.
    pub simple_refset_files: Vec<PathBuf>,
    /// Paths to language reference set files.
    pub language_refset_files: Vec<PathBuf>,
    /// Release date extracted from filename (YYYYMMDD).
    pub release_date: Option<String>,
}

impl Rf2Files {
    /// Creates a new empty Rf2Files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if concept, description and relationship files are present.
    pub fn has_required_files(&self) -> bool {
        self.concept_file.is_some()
            && self.description_file.is_some()
            && self.relationship_file.is_some()
    }

    /// Returns a list of missing required files.
    pub fn missing_files(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.concept_file.is_none() {
            missing.push("Concept");
        }
        if self.description_file.is_none() {
            missing.push("Description");
        }
        if self.relationship_file.is_none() {
            missing.push("Relationship");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_default() {
        let config = StoreConfig::default();
        assert!(config.active_only);
        assert_eq!(config.language_tag, "en-GB");
        assert_eq!(config.descriptions().type_ids.len(), 2);
    }

    #[test]
    fn test_store_config_propagates_active_only() {
        let config = StoreConfig {
            active_only: false,
            ..Default::default()
        };
        assert!(!config.descriptions().base.active_only);
        assert!(!config.relationships().base.active_only);
        assert_eq!(
            config.relationships().characteristic_type_ids,
            vec![CharacteristicType::INFERRED_ID]
        );
    }

    #[test]
    fn test_rf2_files_missing() {
        let files = Rf2Files {
            concept_file: Some(PathBuf::from("concept.txt")),
            ..Default::default()
        };

        assert!(!files.has_required_files());
        let missing = files.missing_files();
        assert_eq!(missing, vec!["Description", "Relationship"]);
    }
}
