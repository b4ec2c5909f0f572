//! SNOMED CT concept.

use crate::{DefinitionStatus, SctId};

/// A SNOMED CT concept as published in a terminology release.
///
/// The identifier is the only attribute the facade relies upon; the remaining
/// fields mirror the release row so callers can inspect status and module.
///
/// # Examples
///
/// ```
/// use pc4_types::{Concept, DefinitionStatus};
///
/// let concept = Concept {
///     id: 24700007,
///     effective_time: 20020131,
///     active: true,
///     module_id: 900000000000207008,
///     definition_status_id: DefinitionStatus::PRIMITIVE_ID,
/// };
///
/// assert!(concept.is_primitive());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Concept {
    /// Unique identifier for this concept.
    pub id: SctId,
    /// Effective date in YYYYMMDD format.
    pub effective_time: u32,
    /// Whether this concept is active.
    pub active: bool,
    /// The module containing this concept.
    pub module_id: SctId,
    /// Primitive or fully defined.
    pub definition_status_id: SctId,
}

impl Concept {
    /// Returns the definition status, or `None` for an unrecognised id.
    pub fn definition_status(&self) -> Option<DefinitionStatus> {
        DefinitionStatus::from_id(self.definition_status_id)
    }

    /// Returns true if this concept is primitively defined.
    pub fn is_primitive(&self) -> bool {
        self.definition_status_id == DefinitionStatus::PRIMITIVE_ID
    }

    /// Returns true if this concept is fully defined.
    pub fn is_fully_defined(&self) -> bool {
        self.definition_status_id == DefinitionStatus::FULLY_DEFINED_ID
    }
}
