//! Expression constraint (ECL) evaluation over the store.
//!
//! `SnomedStore` implements `EclQueryable`, so constraints given to a search
//! are evaluated by `snomed-ecl-executor` directly against the loaded data.

use std::collections::HashSet;

use pc4_types::well_known;
use snomed_ecl::SctId;
use snomed_ecl_executor::{
    ConcreteRelationshipInfo, DescriptionInfo, EclExecutor, EclQueryable, RelationshipInfo,
};

use crate::types::{StoreError, StoreResult};
use crate::SnomedStore;

impl SnomedStore {
    /// Evaluates an expression constraint to the set of matching concepts.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidConstraint`] if the expression does not
    /// parse or cannot be evaluated.
    pub fn constraint_members(&self, ecl: &str) -> StoreResult<HashSet<SctId>> {
        let executor = EclExecutor::new(self);
        let result = executor
            .execute(ecl)
            .map_err(|e| StoreError::InvalidConstraint {
                constraint: ecl.to_string(),
                message: e.to_string(),
            })?;
        Ok(result.iter().copied().collect())
    }
}

impl EclQueryable for SnomedStore {
    fn get_children(&self, concept_id: SctId) -> Vec<SctId> {
        self.get_children(concept_id)
    }

    fn get_parents(&self, concept_id: SctId) -> Vec<SctId> {
        self.get_parents(concept_id)
    }

    fn has_concept(&self, concept_id: SctId) -> bool {
        self.has_concept(concept_id)
    }

    fn all_concept_ids(&self) -> Box<dyn Iterator<Item = SctId> + '_> {
        Box::new(self.concept_ids().copied())
    }

    fn get_refset_members(&self, refset_id: SctId) -> Vec<SctId> {
        SnomedStore::get_refset_members(self, refset_id)
    }

    fn get_attributes(&self, concept_id: SctId) -> Vec<RelationshipInfo> {
        self.get_outgoing_relationships(concept_id)
            .map(|rels| {
                rels.iter()
                    .filter(|r| r.type_id != well_known::IS_A && r.active)
                    .map(|r| RelationshipInfo {
                        type_id: r.type_id,
                        destination_id: r.destination_id,
                        group: r.relationship_group,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn get_inbound_relationships(&self, concept_id: SctId) -> Vec<RelationshipInfo> {
        self.get_incoming_relationships(concept_id)
            .map(|rels| {
                rels.iter()
                    .filter(|r| r.type_id != well_known::IS_A && r.active)
                    .map(|r| RelationshipInfo {
                        type_id: r.type_id,
                        // inbound: the source is reported as the far end
                        destination_id: r.source_id,
                        group: r.relationship_group,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn get_descriptions(&self, concept_id: SctId) -> Vec<DescriptionInfo> {
        SnomedStore::get_descriptions(self, concept_id)
            .map(|descs| {
                descs
                    .iter()
                    .map(|d| DescriptionInfo {
                        description_id: d.id,
                        term: d.term.clone(),
                        language_code: d.language_code.clone(),
                        type_id: d.type_id,
                        case_significance_id: d.case_significance_id,
                        active: d.active,
                        effective_time: Some(d.effective_time),
                        module_id: d.module_id,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn get_preferred_term(&self, concept_id: SctId) -> Option<String> {
        SnomedStore::get_preferred_term(self, concept_id).map(str::to_string)
    }

    fn is_concept_active(&self, concept_id: SctId) -> bool {
        self.get_concept(concept_id).is_some_and(|c| c.active)
    }

    fn get_concept_module(&self, concept_id: SctId) -> Option<SctId> {
        self.get_concept(concept_id).map(|c| c.module_id)
    }

    fn get_concrete_values(&self, _concept_id: SctId) -> Vec<ConcreteRelationshipInfo> {
        Vec::new()
    }

    fn get_semantic_tag(&self, concept_id: SctId) -> Option<String> {
        self.get_fsn(concept_id)
            .and_then(|fsn| fsn.semantic_tag())
            .map(str::to_string)
    }

    fn get_concept_effective_time(&self, concept_id: SctId) -> Option<u32> {
        self.get_concept(concept_id).map(|c| c.effective_time)
    }

    fn is_concept_primitive(&self, concept_id: SctId) -> Option<bool> {
        self.get_concept(concept_id).map(|c| c.is_primitive())
    }
}
