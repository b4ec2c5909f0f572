//! Terminology session.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use pc4_store::{SnomedStore, StoreConfig};
use pc4_types::{Concept, Description, ExtendedConcept, SctId, SearchParameters, SearchResult};
use tracing::{debug, info};

use crate::engine::TerminologyStore;
use crate::error::{ApiError, ApiResult};

/// A handle on one opened terminology store.
///
/// Reads may run concurrently from many threads. After [`close`] every
/// operation fails with [`ApiError::SessionClosed`].
///
/// ```ignore
/// let hermes = TerminologySession::open("/data/snomed")?;
/// let params = SearchParameters::builder().text("mnd").max_hits(5).build();
/// let hits = hermes.search(&params)?;
/// hermes.close();
/// ```
///
/// [`close`]: TerminologySession::close
pub struct TerminologySession {
    store: RwLock<Option<Arc<dyn TerminologyStore>>>,
    default_language: String,
}

impl std::fmt::Debug for TerminologySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminologySession")
            .field("open", &self.is_open())
            .field("default_language", &self.default_language)
            .finish()
    }
}

impl TerminologySession {
    /// Opens a SNOMED CT release directory with default options.
    ///
    /// # Errors
    /// [`ApiError::UnavailableStore`] if the release cannot be loaded.
    pub fn open<P: AsRef<Path>>(path: P) -> ApiResult<Self> {
        Self::open_with(path, &StoreConfig::default())
    }

    /// Opens a SNOMED CT release directory.
    ///
    /// The store's language tag becomes the session's default language.
    ///
    /// # Errors
    /// [`ApiError::UnavailableStore`] if the release cannot be loaded.
    pub fn open_with<P: AsRef<Path>>(path: P, config: &StoreConfig) -> ApiResult<Self> {
        let path = path.as_ref();
        let store = SnomedStore::open(path, config).map_err(|e| ApiError::unavailable(path, e))?;
        info!(path = %path.display(), "terminology session opened");

        Ok(Self::with_store(Arc::new(store)).with_default_language(config.language_tag.clone()))
    }

    /// Wraps an already opened engine.
    pub fn with_store(store: Arc<dyn TerminologyStore>) -> Self {
        Self {
            store: RwLock::new(Some(store)),
            default_language: pc4_types::well_known::DEFAULT_LANGUAGE_TAG.to_string(),
        }
    }

    /// Sets the language used when a caller does not pass one.
    pub fn with_default_language(mut self, language_tag: impl Into<String>) -> Self {
        self.default_language = language_tag.into();
        self
    }

    /// Returns the default language tag.
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Returns true until [`close`](Self::close) is called.
    pub fn is_open(&self) -> bool {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Closes the session. Closing twice is a no-op.
    ///
    /// Callers must let in-flight operations finish first.
    pub fn close(&self) {
        let store = self
            .store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(store) = store {
            store.close();
            info!("terminology session closed");
        }
    }

    fn store(&self) -> ApiResult<Arc<dyn TerminologyStore>> {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ApiError::SessionClosed)
    }

    /// Searches for concepts.
    ///
    /// At least one of text or constraint must be set. When the primary pass
    /// finds nothing and a fallback fuzziness is set, the search is repeated
    /// with that fuzziness. Results are ordered most relevant first and cut to
    /// `max_hits` after ranking.
    ///
    /// # Errors
    /// [`ApiError::InvalidQuery`] for a request without criteria or with an
    /// unusable constraint; [`ApiError::SessionClosed`] after close.
    pub fn search(&self, params: &SearchParameters) -> ApiResult<Vec<SearchResult>> {
        if !params.has_criteria() {
            return Err(ApiError::InvalidQuery(
                "search needs text or a constraint".to_string(),
            ));
        }
        let store = self.store()?;
        if params.max_hits() == Some(0) {
            return Ok(Vec::new());
        }

        let run = |p: &SearchParameters| {
            store
                .search(p)
                .map_err(|e| ApiError::InvalidQuery(e.to_string()))
        };

        let mut results = run(params)?;
        if results.is_empty() {
            if let Some(fallback) = params.fallback() {
                debug!(fuzzy = ?fallback.fuzzy(), "no hits, retrying with fallback fuzziness");
                results = run(&fallback)?;
            }
        }

        if let Some(max_hits) = params.max_hits() {
            results.truncate(max_hits);
        }
        debug!(hits = results.len(), "search complete");
        Ok(results)
    }

    /// Fetches a concept, or `None` if it does not exist.
    pub fn fetch_concept(&self, id: SctId) -> ApiResult<Option<Concept>> {
        Ok(self.store()?.concept(id))
    }

    /// Fetches a concept with its descriptions, relationships and refsets.
    pub fn fetch_extended_concept(&self, id: SctId) -> ApiResult<Option<ExtendedConcept>> {
        Ok(self.store()?.extended_concept(id))
    }

    /// Fetches the preferred synonym of a concept.
    ///
    /// Uses the session's default language when `language_tag` is `None`.
    pub fn preferred_synonym(
        &self,
        id: SctId,
        language_tag: Option<&str>,
    ) -> ApiResult<Option<Description>> {
        let tag = language_tag.unwrap_or(&self.default_language);
        Ok(self.store()?.preferred_synonym(id, tag))
    }

    /// Returns true if `id` is `ancestor_id` or one of its descendants.
    ///
    /// Unknown identifiers give `false`.
    pub fn subsumed_by(&self, id: SctId, ancestor_id: SctId) -> ApiResult<bool> {
        Ok(self.store()?.subsumed_by(id, ancestor_id))
    }

    /// Returns true if `concept` is a kind of `parent`.
    pub fn is_a(&self, concept: &Concept, parent: &Concept) -> ApiResult<bool> {
        self.subsumed_by(concept.id, parent.id)
    }
}

impl Drop for TerminologySession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use pc4_store::StoreResult;

    /// Returns canned hits per fuzziness and records each pass.
    #[derive(Default)]
    struct ScriptedStore {
        hits_by_fuzzy: Vec<(u32, Vec<SearchResult>)>,
        passes: Mutex<Vec<Option<u32>>>,
        closed: AtomicUsize,
    }

    impl TerminologyStore for ScriptedStore {
        fn search(&self, params: &SearchParameters) -> StoreResult<Vec<SearchResult>> {
            self.passes.lock().unwrap().push(params.fuzzy());
            let fuzzy = params.fuzzy().unwrap_or(0);
            Ok(self
                .hits_by_fuzzy
                .iter()
                .find(|(f, _)| *f == fuzzy)
                .map(|(_, hits)| hits.clone())
                .unwrap_or_default())
        }

        fn concept(&self, _id: SctId) -> Option<Concept> {
            None
        }

        fn extended_concept(&self, _id: SctId) -> Option<ExtendedConcept> {
            None
        }

        fn preferred_synonym(&self, _id: SctId, _language_tag: &str) -> Option<Description> {
            None
        }

        fn subsumed_by(&self, id: SctId, ancestor_id: SctId) -> bool {
            id == ancestor_id
        }

        fn close(&self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn hit(concept_id: SctId, score: f64) -> SearchResult {
        SearchResult {
            description_id: concept_id * 10,
            concept_id,
            term: format!("term {concept_id}"),
            preferred_term: None,
            score,
        }
    }

    fn session(store: ScriptedStore) -> (TerminologySession, Arc<ScriptedStore>) {
        let store = Arc::new(store);
        (TerminologySession::with_store(store.clone()), store)
    }

    #[test]
    fn test_search_requires_criteria() {
        let (hermes, store) = session(ScriptedStore::default());

        let err = hermes.search(&SearchParameters::default()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidQuery(_)));
        assert!(store.passes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_fallback_used_only_when_primary_is_empty() {
        let (hermes, store) = session(ScriptedStore {
            hits_by_fuzzy: vec![(2, vec![hit(1, 0.5)])],
            ..Default::default()
        });

        let params = SearchParameters::builder()
            .text("sclerosus")
            .fuzzy(0)
            .fallback_fuzzy(2)
            .build();
        let results = hermes.search(&params).unwrap();

        assert_eq!(results, vec![hit(1, 0.5)]);
        assert_eq!(*store.passes.lock().unwrap(), vec![Some(0), Some(2)]);
    }

    #[test]
    fn test_fallback_skipped_when_primary_has_hits() {
        let (hermes, store) = session(ScriptedStore {
            hits_by_fuzzy: vec![(0, vec![hit(1, 1.0)]), (2, vec![hit(2, 0.5)])],
            ..Default::default()
        });

        let params = SearchParameters::builder().text("ms").fallback_fuzzy(2).build();
        let results = hermes.search(&params).unwrap();

        assert_eq!(results, vec![hit(1, 1.0)]);
        assert_eq!(store.passes.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_max_hits_truncates_engine_output() {
        let (hermes, _) = session(ScriptedStore {
            hits_by_fuzzy: vec![(0, vec![hit(1, 1.0), hit(2, 0.9), hit(3, 0.8)])],
            ..Default::default()
        });

        let params = SearchParameters::builder().text("x").max_hits(2).build();
        let results = hermes.search(&params).unwrap();
        assert_eq!(results, vec![hit(1, 1.0), hit(2, 0.9)]);
    }

    #[test]
    fn test_zero_max_hits_skips_engine() {
        let (hermes, store) = session(ScriptedStore {
            hits_by_fuzzy: vec![(2, vec![hit(1, 0.5)])],
            ..Default::default()
        });

        let params = SearchParameters::builder()
            .text("x")
            .max_hits(0)
            .fallback_fuzzy(2)
            .build();
        assert!(hermes.search(&params).unwrap().is_empty());
        assert!(store.passes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_blank_text_requires_constraint() {
        let (hermes, store) = session(ScriptedStore::default());

        let params = SearchParameters::builder().text(" - ").build();
        assert!(matches!(hermes.search(&params), Err(ApiError::InvalidQuery(_))));
        assert!(store.passes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_close_is_idempotent_and_blocks_reads() {
        let (hermes, store) = session(ScriptedStore::default());
        assert!(hermes.is_open());

        hermes.close();
        hermes.close();

        assert!(!hermes.is_open());
        assert_eq!(store.closed.load(Ordering::SeqCst), 1);
        assert!(matches!(hermes.fetch_concept(1), Err(ApiError::SessionClosed)));
        assert!(matches!(
            hermes.search(&SearchParameters::builder().text("x").build()),
            Err(ApiError::SessionClosed)
        ));
        assert!(matches!(hermes.subsumed_by(1, 1), Err(ApiError::SessionClosed)));
    }

    #[test]
    fn test_default_language() {
        let (hermes, _) = session(ScriptedStore::default());
        assert_eq!(hermes.default_language(), "en-GB");

        let hermes = hermes.with_default_language("en-US");
        assert_eq!(hermes.default_language(), "en-US");
    }

    #[test]
    fn test_drop_closes_store() {
        let (hermes, store) = session(ScriptedStore::default());
        drop(hermes);
        assert_eq!(store.closed.load(Ordering::SeqCst), 1);
    }
}
