//! SNOMED CT description.

use crate::{DescriptionType, SctId};

/// A human-readable term bound to exactly one concept.
///
/// # Examples
///
/// ```
/// use pc4_types::{Description, DescriptionType};
///
/// let fsn = Description {
///     id: 41398015,
///     effective_time: 20020131,
///     active: true,
///     module_id: 900000000000207008,
///     concept_id: 24700007,
///     language_code: "en".to_string(),
///     type_id: DescriptionType::FSN_ID,
///     term: "Multiple sclerosis (disorder)".to_string(),
///     case_significance_id: 900000000000448009,
/// };
///
/// assert!(fsn.is_fsn());
/// assert_eq!(fsn.semantic_tag(), Some("disorder"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Description {
    /// Unique identifier for this description.
    pub id: SctId,
    /// Effective date in YYYYMMDD format.
    pub effective_time: u32,
    /// Whether this description is active.
    pub active: bool,
    /// The module containing this description.
    pub module_id: SctId,
    /// The owning concept.
    pub concept_id: SctId,
    /// ISO 639-1 language code (e.g., "en").
    pub language_code: String,
    /// Fully specified name, synonym or definition.
    pub type_id: SctId,
    /// The term text.
    pub term: String,
    /// Case significance of the term.
    pub case_significance_id: SctId,
}

impl Description {
    /// Returns the description type, or `None` for an unrecognised id.
    pub fn description_type(&self) -> Option<DescriptionType> {
        DescriptionType::from_id(self.type_id)
    }

    /// Returns true if this is the fully specified name.
    pub fn is_fsn(&self) -> bool {
        self.type_id == DescriptionType::FSN_ID
    }

    /// Returns true if this is a synonym.
    pub fn is_synonym(&self) -> bool {
        self.type_id == DescriptionType::SYNONYM_ID
    }

    /// Returns true if this is a textual definition.
    pub fn is_definition(&self) -> bool {
        self.type_id == DescriptionType::DEFINITION_ID
    }

    /// Returns the semantic tag of a fully specified name.
    ///
    /// The tag is the text inside the trailing parentheses, so
    /// "Motor neuron disease (disorder)" yields "disorder".
    pub fn semantic_tag(&self) -> Option<&str> {
        let term = self.term.trim_end();
        let inner = term.strip_suffix(')')?;
        let start = inner.rfind('(')?;
        Some(&inner[start + 1..])
    }
}
