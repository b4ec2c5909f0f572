//! SNOMED CT identifier type.

/// A SNOMED CT identifier (SCTID).
///
/// Concept, description, relationship and reference set identifiers are all
/// 64-bit unsigned integers, unique within a terminology release and never
/// reused once published.
///
/// # Examples
///
/// ```
/// use pc4_types::SctId;
///
/// let multiple_sclerosis: SctId = 24700007;
/// let motor_neurone_disease: SctId = 37340000;
/// assert_ne!(multiple_sclerosis, motor_neurone_disease);
/// ```
pub type SctId = u64;
