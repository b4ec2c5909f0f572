//! SNOMED CT relationship.

use crate::{well_known, CharacteristicType, SctId};

/// A relationship between two concepts.
///
/// IS-A relationships form the subsumption hierarchy; every other type is an
/// attribute of the source concept.
///
/// # Examples
///
/// ```
/// use pc4_types::{Relationship, CharacteristicType};
///
/// let relationship = Relationship {
///     id: 100000028,
///     effective_time: 20020131,
///     active: true,
///     module_id: 900000000000207008,
///     source_id: 24700007,       // Multiple sclerosis
///     destination_id: 6118003,   // Demyelinating disease of CNS
///     relationship_group: 0,
///     type_id: 116680003,        // IS_A
///     characteristic_type_id: CharacteristicType::INFERRED_ID,
///     modifier_id: 900000000000451002,
/// };
///
/// assert!(relationship.is_is_a());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relationship {
    /// Unique identifier for this relationship.
    pub id: SctId,
    /// Effective date in YYYYMMDD format.
    pub effective_time: u32,
    /// Whether this relationship is active.
    pub active: bool,
    /// The module containing this relationship.
    pub module_id: SctId,
    /// Source concept.
    pub source_id: SctId,
    /// Destination concept.
    pub destination_id: SctId,
    /// Role group number (0 = ungrouped).
    pub relationship_group: u16,
    /// Relationship type (IS_A, finding site, ...).
    pub type_id: SctId,
    /// Stated, inferred or additional.
    pub characteristic_type_id: SctId,
    /// Existential or universal modifier.
    pub modifier_id: SctId,
}

impl Relationship {
    /// Returns true if this is an IS_A relationship.
    pub fn is_is_a(&self) -> bool {
        self.type_id == well_known::IS_A
    }

    /// Returns the characteristic type, or `None` for an unrecognised id.
    pub fn characteristic_type(&self) -> Option<CharacteristicType> {
        CharacteristicType::from_id(self.characteristic_type_id)
    }

    /// Returns true if this relationship was inferred by the classifier.
    pub fn is_inferred(&self) -> bool {
        self.characteristic_type_id == CharacteristicType::INFERRED_ID
    }
}
