//! Extended concept: a concept together with its terms and hierarchy.

use std::collections::{BTreeMap, BTreeSet};

use crate::{well_known, Concept, Description, SctId};

/// A read-only snapshot of a concept with its descriptions and relationships.
///
/// Relationship maps are keyed by relationship type id. The transitive map
/// holds, for IS_A, every ancestor of the concept; for any other type, the
/// destination of each relationship together with that destination's
/// ancestors. This is enough to answer subsumption questions without going
/// back to the store. Re-fetch to observe newer data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtendedConcept {
    /// The concept itself.
    pub concept: Concept,
    /// Active descriptions, all owned by `concept`.
    pub descriptions: Vec<Description>,
    /// Direct relationship destinations, by type.
    pub direct_parent_relationships: BTreeMap<SctId, BTreeSet<SctId>>,
    /// Transitive relationship destinations, by type.
    pub parent_relationships: BTreeMap<SctId, BTreeSet<SctId>>,
    /// Simple reference sets containing the concept.
    pub refsets: BTreeSet<SctId>,
}

impl ExtendedConcept {
    /// Returns the concept id.
    pub fn id(&self) -> SctId {
        self.concept.id
    }

    /// Returns the direct IS_A parents.
    pub fn direct_parents(&self) -> impl Iterator<Item = SctId> + '_ {
        self.direct_parent_relationships
            .get(&well_known::IS_A)
            .into_iter()
            .flatten()
            .copied()
    }

    /// Returns every IS_A ancestor, excluding the concept itself.
    pub fn ancestors(&self) -> impl Iterator<Item = SctId> + '_ {
        self.parent_relationships
            .get(&well_known::IS_A)
            .into_iter()
            .flatten()
            .copied()
    }

    /// Returns true if this concept is `ancestor` or one of its descendants.
    pub fn is_a(&self, ancestor: SctId) -> bool {
        self.concept.id == ancestor
            || self
                .parent_relationships
                .get(&well_known::IS_A)
                .is_some_and(|parents| parents.contains(&ancestor))
    }

    /// Returns the fully specified name, if one is present.
    pub fn fsn(&self) -> Option<&Description> {
        self.descriptions.iter().find(|d| d.is_fsn())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DefinitionStatus, DescriptionType};

    fn make_extended() -> ExtendedConcept {
        let concept = Concept {
            id: 24700007,
            effective_time: 20020131,
            active: true,
            module_id: well_known::SNOMED_CT_CORE_MODULE,
            definition_status_id: DefinitionStatus::PRIMITIVE_ID,
        };
        let fsn = Description {
            id: 41398015,
            effective_time: 20020131,
            active: true,
            module_id: well_known::SNOMED_CT_CORE_MODULE,
            concept_id: 24700007,
            language_code: "en".to_string(),
            type_id: DescriptionType::FSN_ID,
            term: "Multiple sclerosis (disorder)".to_string(),
            case_significance_id: 900000000000448009,
        };

        ExtendedConcept {
            concept,
            descriptions: vec![fsn],
            direct_parent_relationships: BTreeMap::from([(
                well_known::IS_A,
                BTreeSet::from([6118003]),
            )]),
            parent_relationships: BTreeMap::from([(
                well_known::IS_A,
                BTreeSet::from([6118003, 404684003, 138875005]),
            )]),
            refsets: BTreeSet::new(),
        }
    }

    #[test]
    fn test_extended_concept_is_a() {
        let ec = make_extended();
        assert!(ec.is_a(24700007));
        assert!(ec.is_a(6118003));
        assert!(ec.is_a(138875005));
        assert!(!ec.is_a(40733004));
    }

    #[test]
    fn test_extended_concept_parents() {
        let ec = make_extended();
        assert_eq!(ec.direct_parents().collect::<Vec<_>>(), vec![6118003]);
        assert_eq!(ec.ancestors().count(), 3);
        assert_eq!(ec.fsn().map(|d| d.term.as_str()), Some("Multiple sclerosis (disorder)"));
    }
}
