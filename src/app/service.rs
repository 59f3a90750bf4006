//! Recommendation service.
//!
//! Owns the current catalog snapshot and answers queries against it:
//! - The snapshot is replaced as a whole, only after a build succeeds
//! - Queries clone the snapshot `Arc` and never hold the lock while working
//! - "Not loaded" is an explicit state, reported as `AppError::NotLoaded`

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use super::errors::AppError;
use crate::catalog::{Catalog, CatalogBuilder, Recommendation, DEFAULT_SEARCH_LIMIT, DEFAULT_TOP_N};
use crate::dataset::{self, DatasetPaths};

#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub default_recommendations: usize,
    pub search_limit: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            default_recommendations: DEFAULT_TOP_N,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

pub struct RecommenderService {
    paths: DatasetPaths,
    builder: CatalogBuilder,
    options: ServiceOptions,
    snapshot: RwLock<Option<Arc<Catalog>>>,
    /// held for the whole read-build-publish sequence of a reload
    reload: Mutex<()>,
}

impl RecommenderService {
    /// Create a service in the "not loaded" state.
    pub fn new(paths: DatasetPaths, builder: CatalogBuilder, options: ServiceOptions) -> Self {
        Self {
            paths,
            builder,
            options,
            snapshot: RwLock::new(None),
            reload: Mutex::new(()),
        }
    }

    pub fn paths(&self) -> &DatasetPaths {
        &self.paths
    }

    /// Rebuild the catalog from the dataset and publish it.
    ///
    /// On failure the previously published catalog stays in place.
    /// Reloads run one at a time, so the catalog published last is always
    /// built from the most recent read of the dataset.
    /// Returns the number of movies in the new catalog.
    pub fn load(&self) -> Result<usize, AppError> {
        let _reloading = self.lock_reloads();

        let records = dataset::load(&self.paths).inspect_err(|err| {
            log::error!("dataset load failed, keeping current catalog: {err}");
        })?;

        let catalog = self.builder.build(records);
        let count = catalog.len();
        self.publish(catalog);

        Ok(count)
    }

    pub(crate) fn lock_reloads(&self) -> MutexGuard<'_, ()> {
        self.reload.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the current snapshot.
    pub fn publish(&self, catalog: Catalog) {
        let catalog = Arc::new(catalog);
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(catalog);
    }

    pub fn snapshot(&self) -> Result<Arc<Catalog>, AppError> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(AppError::NotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_ok()
    }

    pub fn list_titles(&self) -> Result<Vec<String>, AppError> {
        Ok(self.snapshot()?.titles().to_vec())
    }

    /// Titles containing `query`; a blank query matches nothing.
    pub fn search(&self, query: &str) -> Result<Vec<String>, AppError> {
        let catalog = self.snapshot()?;
        let query = query.trim();

        Ok(catalog
            .index()
            .search(query, self.options.search_limit)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Movies similar to `title`; `count` defaults to the configured value.
    pub fn recommend(
        &self,
        title: &str,
        count: Option<usize>,
    ) -> Result<Vec<Recommendation>, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("movie title is required".to_string()));
        }

        let catalog = self.snapshot()?;
        let count = count.unwrap_or(self.options.default_recommendations);

        catalog
            .recommend(title, count)
            .ok_or_else(|| AppError::NotFound(title.to_string()))
    }
}
