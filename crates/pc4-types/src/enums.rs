//! Coded values used by release rows.

use crate::SctId;

/// Definition status for a SNOMED CT concept.
///
/// # Examples
///
/// ```
/// use pc4_types::DefinitionStatus;
///
/// assert_eq!(
///     DefinitionStatus::from_id(900000000000074008),
///     Some(DefinitionStatus::Primitive)
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefinitionStatus {
    /// Necessary conditions only.
    Primitive,
    /// Necessary and sufficient conditions.
    FullyDefined,
}

impl DefinitionStatus {
    /// SCTID for primitive definition status.
    pub const PRIMITIVE_ID: SctId = 900000000000074008;
    /// SCTID for fully defined definition status.
    pub const FULLY_DEFINED_ID: SctId = 900000000000073002;

    /// Creates a DefinitionStatus from its SCTID.
    pub fn from_id(id: SctId) -> Option<Self> {
        match id {
            Self::PRIMITIVE_ID => Some(Self::Primitive),
            Self::FULLY_DEFINED_ID => Some(Self::FullyDefined),
            _ => None,
        }
    }

    /// Returns the SCTID for this definition status.
    pub fn to_id(self) -> SctId {
        match self {
            Self::Primitive => Self::PRIMITIVE_ID,
            Self::FullyDefined => Self::FULLY_DEFINED_ID,
        }
    }
}

/// Description type: fully specified name, synonym or definition.
///
/// # Examples
///
/// ```
/// use pc4_types::DescriptionType;
///
/// assert_eq!(
///     DescriptionType::from_id(900000000000003001),
///     Some(DescriptionType::Fsn)
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DescriptionType {
    /// Fully Specified Name, unambiguous and carrying a semantic tag.
    Fsn,
    /// An alternative term for the concept.
    Synonym,
    /// A textual definition.
    Definition,
}

impl DescriptionType {
    /// SCTID for Fully Specified Name type.
    pub const FSN_ID: SctId = 900000000000003001;
    /// SCTID for Synonym type.
    pub const SYNONYM_ID: SctId = 900000000000013009;
    /// SCTID for Definition type.
    pub const DEFINITION_ID: SctId = 900000000000550004;

    /// Creates a DescriptionType from its SCTID.
    pub fn from_id(id: SctId) -> Option<Self> {
        match id {
            Self::FSN_ID => Some(Self::Fsn),
            Self::SYNONYM_ID => Some(Self::Synonym),
            Self::DEFINITION_ID => Some(Self::Definition),
            _ => None,
        }
    }

    /// Returns the SCTID for this description type.
    pub fn to_id(self) -> SctId {
        match self {
            Self::Fsn => Self::FSN_ID,
            Self::Synonym => Self::SYNONYM_ID,
            Self::Definition => Self::DEFINITION_ID,
        }
    }
}

/// Whether a relationship was stated by an author or inferred by a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharacteristicType {
    /// Authored relationship.
    Stated,
    /// Classifier output.
    Inferred,
    /// Additional, non-defining relationship.
    Additional,
}

impl CharacteristicType {
    /// SCTID for stated relationships.
    pub const STATED_ID: SctId = 900000000000010007;
    /// SCTID for inferred relationships.
    pub const INFERRED_ID: SctId = 900000000000011006;
    /// SCTID for additional relationships.
    pub const ADDITIONAL_ID: SctId = 900000000000227009;

    /// Creates a CharacteristicType from its SCTID.
    pub fn from_id(id: SctId) -> Option<Self> {
        match id {
            Self::STATED_ID => Some(Self::Stated),
            Self::INFERRED_ID => Some(Self::Inferred),
            Self::ADDITIONAL_ID => Some(Self::Additional),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_status_round_trip_ids() {
        assert_eq!(DefinitionStatus::Primitive.to_id(), DefinitionStatus::PRIMITIVE_ID);
        assert_eq!(
            DefinitionStatus::from_id(DefinitionStatus::FULLY_DEFINED_ID),
            Some(DefinitionStatus::FullyDefined)
        );
        assert_eq!(DefinitionStatus::from_id(12345), None);
    }

    #[test]
    fn test_description_type_ids() {
        assert_eq!(DescriptionType::Synonym.to_id(), DescriptionType::SYNONYM_ID);
        assert_eq!(
            DescriptionType::from_id(DescriptionType::DEFINITION_ID),
            Some(DescriptionType::Definition)
        );
    }

    #[test]
    fn test_characteristic_type_ids() {
        assert_eq!(
            CharacteristicType::from_id(900000000000011006),
            Some(CharacteristicType::Inferred)
        );
        assert_eq!(CharacteristicType::from_id(0), None);
    }
}
