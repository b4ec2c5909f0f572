//! Well-known SNOMED CT identifiers and language tag mapping.
//!
//! # Examples
//!
//! ```
//! use pc4_types::well_known;
//!
//! assert_eq!(well_known::IS_A, 116680003);
//! assert!(well_known::language_refsets_for_tag("en-GB")
//!     .contains(&well_known::GB_ENGLISH_LANG_REFSET));
//! ```

use crate::SctId;

// =============================================================================
// Concepts
// =============================================================================

/// SNOMED CT root concept (138875005).
pub const SNOMED_CT_ROOT: SctId = 138875005;

/// Clinical finding (finding) - 404684003.
pub const CLINICAL_FINDING: SctId = 404684003;

/// SNOMED CT core module.
pub const SNOMED_CT_CORE_MODULE: SctId = 900000000000207008;

// =============================================================================
// Relationship Types
// =============================================================================

/// IS_A (116680003), the subsumption relationship type.
pub const IS_A: SctId = 116680003;

/// Finding site (363698007).
pub const FINDING_SITE: SctId = 363698007;

/// Associated morphology (116676008).
pub const ASSOCIATED_MORPHOLOGY: SctId = 116676008;

// =============================================================================
// Language Reference Sets
// =============================================================================

/// US English language reference set.
pub const US_ENGLISH_LANG_REFSET: SctId = 900000000000509007;

/// GB English language reference set.
pub const GB_ENGLISH_LANG_REFSET: SctId = 900000000000508004;

/// UK clinical realm language reference set.
pub const UK_CLINICAL_LANG_REFSET: SctId = 999001261000000100;

/// UK pharmacy realm language reference set.
pub const UK_PHARMACY_LANG_REFSET: SctId = 999000691000001104;

/// Language tag used when a caller does not supply one.
pub const DEFAULT_LANGUAGE_TAG: &str = "en-GB";

/// Returns the language reference sets for a BCP-47 language tag, most
/// specific first.
///
/// Matching ignores case. An unrecognised tag yields an empty slice.
pub fn language_refsets_for_tag(tag: &str) -> &'static [SctId] {
    const EN_GB: &[SctId] = &[
        UK_CLINICAL_LANG_REFSET,
        UK_PHARMACY_LANG_REFSET,
        GB_ENGLISH_LANG_REFSET,
    ];
    const EN_US: &[SctId] = &[US_ENGLISH_LANG_REFSET];
    const EN: &[SctId] = &[GB_ENGLISH_LANG_REFSET, US_ENGLISH_LANG_REFSET];

    match tag.trim().to_ascii_lowercase().as_str() {
        "en-gb" => EN_GB,
        "en-us" => EN_US,
        "en" => EN,
        _ => &[],
    }
}

/// Returns the primary language subtag of a BCP-47 tag ("en-GB" -> "en").
pub fn primary_language(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_constants() {
        assert_eq!(SNOMED_CT_ROOT, 138875005);
        assert_eq!(IS_A, 116680003);
        assert_eq!(SNOMED_CT_CORE_MODULE, 900000000000207008);
    }

    #[test]
    fn test_language_refsets_for_tag() {
        assert_eq!(language_refsets_for_tag("en-US"), &[US_ENGLISH_LANG_REFSET]);
        assert_eq!(language_refsets_for_tag("EN-gb")[0], UK_CLINICAL_LANG_REFSET);
        assert!(language_refsets_for_tag("fr-FR").is_empty());
    }

    #[test]
    fn test_primary_language() {
        assert_eq!(primary_language("en-GB"), "en");
        assert_eq!(primary_language("es_AR"), "es");
        assert_eq!(primary_language("EN"), "en");
    }
}
