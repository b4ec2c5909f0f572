//! # pc4-types
//!
//! Value types shared by the pc4 terminology and directory facade.
//!
//! This crate holds plain data records with no behaviour beyond simple
//! accessors: SNOMED CT concepts, descriptions and relationships, the
//! extended concept snapshot, search parameters and results, and the
//! organisational directory records returned by postcode lookup.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!
//! ## Usage
//!
//! ```rust
//! use pc4_types::{SearchParameters, SctId};
//! use pc4_types::well_known;
//!
//! let params = SearchParameters::builder()
//!     .text("multiple sclerosis")
//!     .constraint("<< 404684003")
//!     .max_hits(20)
//!     .build();
//!
//! assert!(params.has_criteria());
//! let is_a: SctId = well_known::IS_A;
//! assert_eq!(is_a, 116680003);
//! ```

#![warn(missing_docs)]

mod concept;
mod description;
pub mod directory;
mod enums;
mod extended;
pub mod refset;
mod relationship;
mod sctid;
pub mod search;
pub mod well_known;

// Re-export all public types at crate root
pub use concept::Concept;
pub use description::Description;
pub use directory::{normalise_postcode, Location, Organisation, PostcodeRecord};
pub use enums::{CharacteristicType, DefinitionStatus, DescriptionType};
pub use extended::ExtendedConcept;
pub use refset::{LanguageRefsetMember, SimpleRefsetMember};
pub use relationship::Relationship;
pub use sctid::SctId;
pub use search::{SearchParameters, SearchParametersBuilder, SearchResult};
