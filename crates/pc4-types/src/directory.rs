//! Organisational directory records: postcodes and the organisations at them.

/// A postcode from the national postcode directory.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PostcodeRecord {
    /// Normalised postcode, e.g. "CF14 4XW".
    pub postcode: String,
    /// OS grid reference easting (1m resolution).
    pub easting: Option<u32>,
    /// OS grid reference northing (1m resolution).
    pub northing: Option<u32>,
    /// Lower-layer super output area code.
    pub lsoa: Option<String>,
    /// Commissioning body code.
    pub ccg: Option<String>,
    /// Country code.
    pub country: Option<String>,
    /// Date of termination (YYYYMM), absent for live postcodes.
    pub terminated: Option<String>,
}

impl PostcodeRecord {
    /// Returns true if the postcode is still in use.
    pub fn is_live(&self) -> bool {
        self.terminated.is_none()
    }
}

/// An organisation from the organisational directory.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Organisation {
    /// Organisation code.
    pub code: String,
    /// Organisation name.
    pub name: String,
    /// First address line.
    pub address: Option<String>,
    /// Town.
    pub town: Option<String>,
    /// Normalised postcode.
    pub postcode: String,
    /// Primary role code.
    pub primary_role: Option<String>,
    /// Close date, absent for open organisations.
    pub close_date: Option<String>,
}

impl Organisation {
    /// Returns true if the organisation is open.
    pub fn is_active(&self) -> bool {
        self.close_date.is_none()
    }
}

/// The result of a postcode lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// The postcode record.
    pub postcode: PostcodeRecord,
    /// Organisations sited at the postcode, ordered by code.
    pub organisations: Vec<Organisation>,
}

/// Normalises a postcode: upper case, a single space before the inward code.
///
/// Returns `None` if nothing but whitespace remains.
///
/// ```
/// use pc4_types::normalise_postcode;
///
/// assert_eq!(normalise_postcode(" cf14  4xw ").as_deref(), Some("CF14 4XW"));
/// assert_eq!(normalise_postcode("cf144xw").as_deref(), Some("CF14 4XW"));
/// assert_eq!(normalise_postcode("   "), None);
/// ```
pub fn normalise_postcode(code: &str) -> Option<String> {
    let compact: String = code
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if compact.is_empty() {
        return None;
    }

    let chars: Vec<char> = compact.chars().collect();
    if chars.len() <= 3 {
        return Some(compact);
    }
    let (outward, inward) = chars.split_at(chars.len() - 3);
    Some(format!(
        "{} {}",
        outward.iter().collect::<String>(),
        inward.iter().collect::<String>()
    ))
}
