//! Reference set members.
//!
//! Two kinds of reference set matter to the facade:
//!
//! - **Simple refsets**: plain membership, reported in an extended concept
//! - **Language refsets**: which description is preferred per dialect
//!
//! # Example
//!
//! ```
//! use pc4_types::LanguageRefsetMember;
//! use pc4_types::well_known::GB_ENGLISH_LANG_REFSET;
//!
//! let member = LanguageRefsetMember {
//!     id: "80000a1e-3d2c-5b2e-8d6a-0c2a3c7b1f11".to_string(),
//!     effective_time: 20200101,
//!     active: true,
//!     module_id: 900000000000207008,
//!     refset_id: GB_ENGLISH_LANG_REFSET,
//!     referenced_component_id: 61462014,
//!     acceptability_id: LanguageRefsetMember::PREFERRED_ID,
//! };
//!
//! assert!(member.is_preferred());
//! ```

use crate::SctId;

/// A simple reference set member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleRefsetMember {
    /// Member identifier (a UUID).
    pub id: String,
    /// Effective time as YYYYMMDD integer.
    pub effective_time: u32,
    /// Whether this membership is active.
    pub active: bool,
    /// Module this member belongs to.
    pub module_id: SctId,
    /// The reference set.
    pub refset_id: SctId,
    /// The member component, usually a concept.
    pub referenced_component_id: SctId,
}

/// A language reference set member.
///
/// The referenced component is a description; the acceptability says whether
/// the description is the preferred or merely an acceptable term in the dialect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LanguageRefsetMember {
    /// Member identifier (a UUID).
    pub id: String,
    /// Effective time as YYYYMMDD integer.
    pub effective_time: u32,
    /// Whether this membership is active.
    pub active: bool,
    /// Module this member belongs to.
    pub module_id: SctId,
    /// The language reference set (dialect).
    pub refset_id: SctId,
    /// The description id.
    pub referenced_component_id: SctId,
    /// Preferred (900000000000548007) or Acceptable (900000000000549004).
    pub acceptability_id: SctId,
}

impl LanguageRefsetMember {
    /// SCTID for "Preferred" acceptability.
    pub const PREFERRED_ID: SctId = 900000000000548007;
    /// SCTID for "Acceptable" acceptability.
    pub const ACCEPTABLE_ID: SctId = 900000000000549004;

    /// Returns true if the description is preferred in this dialect.
    pub fn is_preferred(&self) -> bool {
        self.acceptability_id == Self::PREFERRED_ID
    }

    /// Returns true if the description is acceptable but not preferred.
    pub fn is_acceptable(&self) -> bool {
        self.acceptability_id == Self::ACCEPTABLE_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::well_known;

    #[test]
    fn test_language_refset_acceptability() {
        let preferred = LanguageRefsetMember {
            id: "80000a1e-3d2c-5b2e-8d6a-0c2a3c7b1f11".to_string(),
            effective_time: 20200101,
            active: true,
            module_id: 900000000000207008,
            refset_id: well_known::US_ENGLISH_LANG_REFSET,
            referenced_component_id: 61462014,
            acceptability_id: LanguageRefsetMember::PREFERRED_ID,
        };
        let acceptable = LanguageRefsetMember {
            acceptability_id: LanguageRefsetMember::ACCEPTABLE_ID,
            ..preferred.clone()
        };

        assert!(preferred.is_preferred());
        assert!(!preferred.is_acceptable());
        assert!(acceptable.is_acceptable());
        assert!(!acceptable.is_preferred());
    }
}
