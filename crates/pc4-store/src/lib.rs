//! # pc4-store
//!
//! In-memory engines behind the pc4 facade:
//!
//! - [`SnomedStore`]: a SNOMED CT release loaded from RF2 Snapshot files, with
//!   transitive closure, expression constraint evaluation and term search
//! - [`DirectoryIndex`]: organisations and postcodes loaded from CSV
//!
//! ```ignore
//! use pc4_store::{SnomedStore, StoreConfig};
//! use pc4_types::SearchParameters;
//!
//! let store = SnomedStore::open("/data/snomed", &StoreConfig::default())?;
//! let params = SearchParameters::builder().text("mnd").max_hits(10).build();
//! for hit in store.search(&params)? {
//!     println!("{} {}", hit.concept_id, hit.display_term());
//! }
//! ```

#![warn(missing_docs)]

mod directory;
mod ecl;
mod loader;
mod parser;
mod records;
mod search;
mod store;
mod types;

pub use directory::DirectoryIndex;
pub use loader::discover_rf2_files;
pub use parser::{parse, Rf2Parser, Rf2Record};
pub use records::{DescriptionFilter, RelationshipFilter};
pub use search::{tokenize, SearchIndex, DEFAULT_MAX_HITS};
pub use store::SnomedStore;
pub use types::{
    DescriptionConfig, RelationshipConfig, Rf2Config, Rf2Files, StoreConfig, StoreError,
    StoreResult,
};

pub use pc4_types;
pub use snomed_ecl_executor::{EclExecutor, EclQueryable};
