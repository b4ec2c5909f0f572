//! RF2 row parsing for concepts, descriptions, relationships and refsets.

use csv::StringRecord;
use pc4_types::{Concept, Description, LanguageRefsetMember, Relationship, SimpleRefsetMember};

use crate::parser::{parse, Rf2Record};
use crate::types::{DescriptionConfig, RelationshipConfig, Rf2Config, StoreResult};

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

impl Rf2Record for Concept {
    const EXPECTED_COLUMNS: &'static [&'static str] = &[
        "id",
        "effectiveTime",
        "active",
        "moduleId",
        "definitionStatusId",
    ];

    fn from_record(record: &StringRecord) -> StoreResult<Self> {
        Ok(Concept {
            id: parse::sctid(field(record, 0))?,
            effective_time: parse::effective_time(field(record, 1))?,
            active: parse::boolean(field(record, 2))?,
            module_id: parse::sctid(field(record, 3))?,
            definition_status_id: parse::sctid(field(record, 4))?,
        })
    }

    fn passes_filter(&self, config: &Rf2Config) -> bool {
        !config.active_only || self.active
    }
}

impl Rf2Record for Description {
    const EXPECTED_COLUMNS: &'static [&'static str] = &[
        "id",
        "effectiveTime",
        "active",
        "moduleId",
        "conceptId",
        "languageCode",
        "typeId",
        "term",
        "caseSignificanceId",
    ];

    fn from_record(record: &StringRecord) -> StoreResult<Self> {
        Ok(Description {
            id: parse::sctid(field(record, 0))?,
            effective_time: parse::effective_time(field(record, 1))?,
            active: parse::boolean(field(record, 2))?,
            module_id: parse::sctid(field(record, 3))?,
            concept_id: parse::sctid(field(record, 4))?,
            language_code: field(record, 5).to_string(),
            type_id: parse::sctid(field(record, 6))?,
            term: field(record, 7).to_string(),
            case_significance_id: parse::sctid(field(record, 8))?,
        })
    }

    fn passes_filter(&self, config: &Rf2Config) -> bool {
        !config.active_only || self.active
    }
}

impl Rf2Record for Relationship {
    const EXPECTED_COLUMNS: &'static [&'static str] = &[
        "id",
        "effectiveTime",
        "active",
        "moduleId",
        "sourceId",
        "destinationId",
        "relationshipGroup",
        "typeId",
        "characteristicTypeId",
        "modifierId",
    ];

    fn from_record(record: &StringRecord) -> StoreResult<Self> {
        Ok(Relationship {
            id: parse::sctid(field(record, 0))?,
            effective_time: parse::effective_time(field(record, 1))?,
            active: parse::boolean(field(record, 2))?,
            module_id: parse::sctid(field(record, 3))?,
            source_id: parse::sctid(field(record, 4))?,
            destination_id: parse::sctid(field(record, 5))?,
            relationship_group: parse::integer(field(record, 6))?,
            type_id: parse::sctid(field(record, 7))?,
            characteristic_type_id: parse::sctid(field(record, 8))?,
            modifier_id: parse::sctid(field(record, 9))?,
        })
    }

    fn passes_filter(&self, config: &Rf2Config) -> bool {
        !config.active_only || self.active
    }
}

impl Rf2Record for SimpleRefsetMember {
    const EXPECTED_COLUMNS: &'static [&'static str] = &[
        "id",
        "effectiveTime",
        "active",
        "moduleId",
        "refsetId",
        "referencedComponentId",
    ];

    fn from_record(record: &StringRecord) -> StoreResult<Self> {
        Ok(Self {
            id: field(record, 0).to_string(),
            effective_time: parse::effective_time(field(record, 1))?,
            active: parse::boolean(field(record, 2))?,
            module_id: parse::sctid(field(record, 3))?,
            refset_id: parse::sctid(field(record, 4))?,
            referenced_component_id: parse::sctid(field(record, 5))?,
        })
    }

    fn passes_filter(&self, config: &Rf2Config) -> bool {
        !config.active_only || self.active
    }
}

impl Rf2Record for LanguageRefsetMember {
    const EXPECTED_COLUMNS: &'static [&'static str] = &[
        "id",
        "effectiveTime",
        "active",
        "moduleId",
        "refsetId",
        "referencedComponentId",
        "acceptabilityId",
    ];

    fn from_record(record: &StringRecord) -> StoreResult<Self> {
        Ok(Self {
            id: field(record, 0).to_string(),
            effective_time: parse::effective_time(field(record, 1))?,
            active: parse::boolean(field(record, 2))?,
            module_id: parse::sctid(field(record, 3))?,
            refset_id: parse::sctid(field(record, 4))?,
            referenced_component_id: parse::sctid(field(record, 5))?,
            acceptability_id: parse::sctid(field(record, 6))?,
        })
    }

    fn passes_filter(&self, config: &Rf2Config) -> bool {
        !config.active_only || self.active
    }
}

/// Language and type filtering on top of the base filter.
pub trait DescriptionFilter {
    /// Returns true if the description passes the extended filter.
    fn passes_description_filter(&self, config: &DescriptionConfig) -> bool;
}

impl DescriptionFilter for Description {
    fn passes_description_filter(&self, config: &DescriptionConfig) -> bool {
        self.passes_filter(&config.base)
            && (config.language_codes.is_empty()
                || config.language_codes.contains(&self.language_code))
            && (config.type_ids.is_empty() || config.type_ids.contains(&self.type_id))
    }
}

/// Type and characteristic filtering on top of the base filter.
pub trait RelationshipFilter {
    /// Returns true if the relationship passes the extended filter.
    fn passes_relationship_filter(&self, config: &RelationshipConfig) -> bool;
}

impl RelationshipFilter for Relationship {
    fn passes_relationship_filter(&self, config: &RelationshipConfig) -> bool {
        self.passes_filter(&config.base)
            && (config.type_ids.is_empty() || config.type_ids.contains(&self.type_id))
            && (config.characteristic_type_ids.is_empty()
                || config
                    .characteristic_type_ids
                    .contains(&self.characteristic_type_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc4_types::{well_known, CharacteristicType, DescriptionType};

    #[test]
    fn test_parse_description_record() {
        let record = StringRecord::from(vec![
            "61462014",
            "20020131",
            "1",
            "900000000000207008",
            "37340000",
            "en",
            "900000000000013009",
            "Motor neurone disease",
            "900000000000448009",
        ]);

        let desc = Description::from_record(&record).unwrap();
        assert_eq!(desc.id, 61462014);
        assert_eq!(desc.concept_id, 37340000);
        assert_eq!(desc.term, "Motor neurone disease");
        assert!(desc.is_synonym());
    }

    #[test]
    fn test_parse_relationship_record() {
        let record = StringRecord::from(vec![
            "100000028",
            "20020131",
            "1",
            "900000000000207008",
            "24700007",
            "6118003",
            "0",
            "116680003",
            "900000000000011006",
            "900000000000451002",
        ]);

        let rel = Relationship::from_record(&record).unwrap();
        assert_eq!(rel.source_id, 24700007);
        assert_eq!(rel.destination_id, 6118003);
        assert!(rel.is_is_a());
        assert!(rel.is_inferred());
    }

    #[test]
    fn test_parse_language_refset_member_with_uuid_id() {
        let record = StringRecord::from(vec![
            "80000a1e-3d2c-5b2e-8d6a-0c2a3c7b1f11",
            "20200101",
            "1",
            "900000000000207008",
            "900000000000508004",
            "61462014",
            "900000000000548007",
        ]);

        let member = LanguageRefsetMember::from_record(&record).unwrap();
        assert_eq!(member.refset_id, well_known::GB_ENGLISH_LANG_REFSET);
        assert_eq!(member.referenced_component_id, 61462014);
        assert!(member.is_preferred());
    }

    #[test]
    fn test_parse_simple_refset_member() {
        let record = StringRecord::from(vec![
            "5c5e3e0e-2f3a-4f6b-9a53-0b8f0b4a7d22",
            "20200101",
            "0",
            "900000000000207008",
            "723264001",
            "24700007",
        ]);

        let member = SimpleRefsetMember::from_record(&record).unwrap();
        assert_eq!(member.refset_id, 723264001);
        assert!(!member.passes_filter(&Rf2Config::default()));
        assert!(member.passes_filter(&Rf2Config { active_only: false }));
    }

    #[test]
    fn test_description_filter() {
        let synonym = Description {
            id: 1,
            effective_time: 20020131,
            active: true,
            module_id: 900000000000207008,
            concept_id: 24700007,
            language_code: "en".to_string(),
            type_id: DescriptionType::SYNONYM_ID,
            term: "Disseminated sclerosis".to_string(),
            case_significance_id: 900000000000448009,
        };
        let spanish = Description {
            language_code: "es".to_string(),
            ..synonym.clone()
        };
        let definition = Description {
            type_id: DescriptionType::DEFINITION_ID,
            ..synonym.clone()
        };

        let config = DescriptionConfig::terms_in(vec!["en".to_string()]);
        assert!(synonym.passes_description_filter(&config));
        assert!(!spanish.passes_description_filter(&config));
        assert!(!definition.passes_description_filter(&config));
    }

    #[test]
    fn test_relationship_filter() {
        let inferred = Relationship {
            id: 1,
            effective_time: 20020131,
            active: true,
            module_id: 900000000000207008,
            source_id: 24700007,
            destination_id: 6118003,
            relationship_group: 0,
            type_id: well_known::IS_A,
            characteristic_type_id: CharacteristicType::INFERRED_ID,
            modifier_id: 900000000000451002,
        };
        let stated = Relationship {
            characteristic_type_id: CharacteristicType::STATED_ID,
            ..inferred.clone()
        };

        let config = RelationshipConfig::inferred_only();
        assert!(inferred.passes_relationship_filter(&config));
        assert!(!stated.passes_relationship_filter(&config));
    }
}
