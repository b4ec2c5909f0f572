//! # pc4-api
//!
//! Typed facade over two lookup services:
//!
//! - [`TerminologySession`] ("hermes"): SNOMED CT search, concept retrieval,
//!   preferred synonyms and subsumption
//! - [`DirectorySession`] ("ods"): postcode to organisation lookup
//!
//! Sessions are opened directly or through a [`Factory`] built from a
//! [`Config`]. Engines sit behind the [`TerminologyStore`] and
//! [`DirectoryStore`] traits.
//!
//! ```ignore
//! use pc4_api::{SearchParameters, TerminologySession};
//!
//! let hermes = TerminologySession::open("/data/snomed")?;
//! let params = SearchParameters::builder()
//!     .text("mnd")
//!     .fuzzy(0)
//!     .fallback_fuzzy(2)
//!     .max_hits(10)
//!     .build();
//!
//! for hit in hermes.search(&params)? {
//!     println!("{}\t{}", hit.concept_id, hit.display_term());
//! }
//! assert!(hermes.subsumed_by(24700007, 6118003)?);
//! ```

#![warn(missing_docs)]

mod config;
mod engine;
mod error;
mod hermes;
mod ods;

pub use config::{
    Config, Factory, ENV_DEFAULT_LANGUAGE, ENV_HERMES_PATH, ENV_NHSPD_PATH, ENV_ODS_PATH,
};
pub use engine::{DirectoryStore, TerminologyStore};
pub use error::{ApiError, ApiResult};
pub use hermes::TerminologySession;
pub use ods::DirectorySession;

pub use pc4_store::StoreConfig;
pub use pc4_types::{
    Concept, Description, ExtendedConcept, Location, Organisation, PostcodeRecord, SctId,
    SearchParameters, SearchParametersBuilder, SearchResult,
};

/// The terminology session under its service name.
pub type Hermes = TerminologySession;

/// The directory session under its service name.
pub type Ods = DirectorySession;
