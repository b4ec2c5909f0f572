//! Organisational directory session.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use pc4_store::DirectoryIndex;
use pc4_types::Location;
use tracing::{debug, info};

use crate::engine::DirectoryStore;
use crate::error::{ApiError, ApiResult};

/// A handle on an opened organisational directory.
pub struct DirectorySession {
    store: RwLock<Option<Arc<dyn DirectoryStore>>>,
}

impl std::fmt::Debug for DirectorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectorySession")
            .field("open", &self.is_open())
            .finish()
    }
}

impl DirectorySession {
    /// Opens the organisation directory and the postcode reference data.
    ///
    /// # Errors
    /// [`ApiError::UnavailableStore`] if either location cannot be loaded.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(ods_dir: P, nhspd_dir: Q) -> ApiResult<Self> {
        let ods_dir = ods_dir.as_ref();
        let index = DirectoryIndex::open(ods_dir, nhspd_dir.as_ref())
            .map_err(|e| ApiError::unavailable(ods_dir, e))?;
        info!(path = %ods_dir.display(), "directory session opened");

        Ok(Self::with_store(Arc::new(index)))
    }

    /// Wraps an already opened directory engine.
    pub fn with_store(store: Arc<dyn DirectoryStore>) -> Self {
        Self {
            store: RwLock::new(Some(store)),
        }
    }

    /// Returns true until [`close`](Self::close) is called.
    pub fn is_open(&self) -> bool {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Closes the session. Closing twice is a no-op.
    pub fn close(&self) {
        let store = self
            .store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(store) = store {
            store.close();
            info!("directory session closed");
        }
    }

    /// Looks up a postcode, ignoring case and spacing.
    ///
    /// Returns `None` for an unrecognised postcode.
    pub fn fetch_by_postcode(&self, code: &str) -> ApiResult<Option<Location>> {
        let store = self
            .store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ApiError::SessionClosed)?;

        let location = store.fetch_postcode(code);
        if location.is_none() {
            debug!(code, "postcode not found");
        }
        Ok(location)
    }
}

impl Drop for DirectorySession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc4_types::{normalise_postcode, PostcodeRecord};

    struct OnePostcode;

    impl DirectoryStore for OnePostcode {
        fn fetch_postcode(&self, code: &str) -> Option<Location> {
            (normalise_postcode(code)?.as_str() == "CF14 4XW").then(|| Location {
                postcode: PostcodeRecord {
                    postcode: "CF14 4XW".to_string(),
                    easting: None,
                    northing: None,
                    lsoa: None,
                    ccg: None,
                    country: None,
                    terminated: None,
                },
                organisations: Vec::new(),
            })
        }
    }

    #[test]
    fn test_fetch_by_postcode() {
        let ods = DirectorySession::with_store(Arc::new(OnePostcode));

        assert!(ods.fetch_by_postcode("cf14 4xw").unwrap().is_some());
        assert!(ods.fetch_by_postcode("ZZ1 1ZZ").unwrap().is_none());
    }

    #[test]
    fn test_closed_session() {
        let ods = DirectorySession::with_store(Arc::new(OnePostcode));
        ods.close();
        ods.close();

        assert!(!ods.is_open());
        assert!(matches!(
            ods.fetch_by_postcode("CF14 4XW"),
            Err(ApiError::SessionClosed)
        ));
    }

    #[test]
    fn test_open_missing_directories() {
        let err = DirectorySession::open("/no/such/ods", "/no/such/nhspd").unwrap_err();
        assert!(matches!(err, ApiError::UnavailableStore { .. }));
    }
}
