//! Search request and result types.
//!
//! A search is described by [`SearchParameters`], an immutable value produced
//! by [`SearchParametersBuilder`]. Every field is optional and a field that
//! was never set is absent from the parameters, so an engine can always tell
//! "not asked" apart from "asked for zero/false".
//!
//! ```
//! use pc4_types::SearchParameters;
//!
//! let params = SearchParameters::builder()
//!     .text("mnd")
//!     .max_hits(10)
//!     .fuzzy(-1) // negative values are treated as unset
//!     .build();
//!
//! assert_eq!(params.text(), Some("mnd"));
//! assert_eq!(params.max_hits(), Some(10));
//! assert_eq!(params.fuzzy(), None);
//! ```

use std::cmp::Ordering;

use crate::SctId;

/// An immutable set of search parameters.
///
/// Safe to share between threads and reuse across searches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub struct SearchParameters {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    text: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    max_hits: Option<usize>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    fuzzy: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    fallback_fuzzy: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    show_fsn: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    constraint: Option<String>,
}

impl SearchParameters {
    /// Creates a new builder.
    pub fn builder() -> SearchParametersBuilder {
        SearchParametersBuilder::new()
    }

    /// Free text to match against descriptions.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Maximum number of results.
    pub fn max_hits(&self) -> Option<usize> {
        self.max_hits
    }

    /// Edit-distance budget for the primary pass.
    pub fn fuzzy(&self) -> Option<u32> {
        self.fuzzy
    }

    /// Edit-distance budget for the second pass, used only when the primary
    /// pass finds nothing.
    pub fn fallback_fuzzy(&self) -> Option<u32> {
        self.fallback_fuzzy
    }

    /// Whether results display the fully specified name.
    pub fn show_fsn(&self) -> Option<bool> {
        self.show_fsn
    }

    /// Expression constraint restricting eligible concepts.
    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    /// Returns true if the parameters carry a text or constraint filter.
    ///
    /// Text without any letter or digit filters nothing and does not count.
    pub fn has_criteria(&self) -> bool {
        let has_text = self
            .text
            .as_deref()
            .is_some_and(|t| t.chars().any(char::is_alphanumeric));
        has_text || self.constraint.is_some()
    }

    /// Returns the parameters for the fallback pass, if one is configured.
    ///
    /// The fallback pass uses `fallback_fuzzy` as its fuzziness and carries
    /// no further fallback.
    pub fn fallback(&self) -> Option<SearchParameters> {
        let fallback_fuzzy = self.fallback_fuzzy?;
        Some(SearchParameters {
            fuzzy: Some(fallback_fuzzy),
            fallback_fuzzy: None,
            ..self.clone()
        })
    }
}

/// Accumulates search fields in any order and freezes them with [`build`].
///
/// Setters take signed integers: a negative hit count or fuzziness leaves the
/// field unset rather than being rejected or forwarded.
///
/// [`build`]: SearchParametersBuilder::build
#[derive(Debug, Clone, Default)]
pub struct SearchParametersBuilder {
    text: Option<String>,
    max_hits: Option<i64>,
    fuzzy: Option<i64>,
    fallback_fuzzy: Option<i64>,
    show_fsn: Option<bool>,
    constraint: Option<String>,
}

impl SearchParametersBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text query.
    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the maximum hit count.
    pub fn max_hits(&mut self, max_hits: i64) -> &mut Self {
        self.max_hits = Some(max_hits);
        self
    }

    /// Sets the fuzziness of the primary pass.
    pub fn fuzzy(&mut self, fuzzy: i64) -> &mut Self {
        self.fuzzy = Some(fuzzy);
        self
    }

    /// Sets the fuzziness of the fallback pass.
    pub fn fallback_fuzzy(&mut self, fallback_fuzzy: i64) -> &mut Self {
        self.fallback_fuzzy = Some(fallback_fuzzy);
        self
    }

    /// Sets whether to display fully specified names.
    pub fn show_fsn(&mut self, show: bool) -> &mut Self {
        self.show_fsn = Some(show);
        self
    }

    /// Sets the expression constraint.
    pub fn constraint(&mut self, ecl: impl Into<String>) -> &mut Self {
        self.constraint = Some(ecl.into());
        self
    }

    /// Produces an immutable snapshot of the fields set so far.
    ///
    /// The builder is left untouched and may be reused.
    pub fn build(&self) -> SearchParameters {
        SearchParameters {
            text: self.text.clone(),
            max_hits: self.max_hits.and_then(|n| usize::try_from(n).ok()),
            fuzzy: self.fuzzy.and_then(|n| u32::try_from(n).ok()),
            fallback_fuzzy: self.fallback_fuzzy.and_then(|n| u32::try_from(n).ok()),
            show_fsn: self.show_fsn,
            constraint: self.constraint.clone(),
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// The matched description, or 0 when the hit came from a constraint alone.
    pub description_id: SctId,
    /// The matched concept.
    pub concept_id: SctId,
    /// The matched term.
    pub term: String,
    /// The display term when it differs from `term`.
    pub preferred_term: Option<String>,
    /// Relevance in `(0, 1]`, higher is better.
    pub score: f64,
}

impl SearchResult {
    /// Orders by descending score, then ascending concept id.
    pub fn cmp_relevance(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.concept_id.cmp(&other.concept_id))
    }

    /// Returns the term to display: the preferred term if present.
    pub fn display_term(&self) -> &str {
        self.preferred_term.as_deref().unwrap_or(&self.term)
    }
}
