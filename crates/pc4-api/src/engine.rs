//! Engine seams behind the sessions.
//!
//! Sessions talk to their engine only through these traits, so any engine
//! (or a test double) can stand behind the facade.

use pc4_store::{DirectoryIndex, SnomedStore, StoreResult};
use pc4_types::{
    Concept, Description, ExtendedConcept, Location, SctId, SearchParameters, SearchResult,
};

/// Operations a terminology engine provides to a [`TerminologySession`].
///
/// [`TerminologySession`]: crate::TerminologySession
pub trait TerminologyStore: Send + Sync {
    /// Runs one search pass with the parameters exactly as given.
    fn search(&self, params: &SearchParameters) -> StoreResult<Vec<SearchResult>>;

    /// Looks up a concept.
    fn concept(&self, id: SctId) -> Option<Concept>;

    /// Looks up a concept with its descriptions and relationships.
    fn extended_concept(&self, id: SctId) -> Option<ExtendedConcept>;

    /// Looks up the preferred synonym of a concept in a language.
    fn preferred_synonym(&self, id: SctId, language_tag: &str) -> Option<Description>;

    /// Returns true if `id` is `ancestor_id` or a descendant of it.
    fn subsumed_by(&self, id: SctId, ancestor_id: SctId) -> bool;

    /// Releases engine resources. Called once when the owning session closes.
    fn close(&self) {}
}

/// Operations an organisational directory provides to a [`DirectorySession`].
///
/// [`DirectorySession`]: crate::DirectorySession
pub trait DirectoryStore: Send + Sync {
    /// Looks up a postcode, which the engine normalises.
    fn fetch_postcode(&self, code: &str) -> Option<Location>;

    /// Releases engine resources.
    fn close(&self) {}
}

impl TerminologyStore for SnomedStore {
    fn search(&self, params: &SearchParameters) -> StoreResult<Vec<SearchResult>> {
        SnomedStore::search(self, params)
    }

    fn concept(&self, id: SctId) -> Option<Concept> {
        self.get_concept(id).cloned()
    }

    fn extended_concept(&self, id: SctId) -> Option<ExtendedConcept> {
        SnomedStore::extended_concept(self, id)
    }

    fn preferred_synonym(&self, id: SctId, language_tag: &str) -> Option<Description> {
        SnomedStore::preferred_synonym(self, id, language_tag).cloned()
    }

    fn subsumed_by(&self, id: SctId, ancestor_id: SctId) -> bool {
        SnomedStore::subsumed_by(self, id, ancestor_id)
    }
}

impl DirectoryStore for DirectoryIndex {
    fn fetch_postcode(&self, code: &str) -> Option<Location> {
        DirectoryIndex::fetch_postcode(self, code)
    }
}
