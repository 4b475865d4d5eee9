use crate::core::CatalogSource;
use crate::domain::fallback::fallback_sites;
use crate::domain::model::{HeritageSite, SiteId};
use crate::utils::validation::validate_coordinates;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    Remote,
    Fallback,
    Override,
}

/// The sites loaded for this session. Ids are unique and coordinates valid.
#[derive(Debug, Clone)]
pub struct Catalog {
    sites: Vec<HeritageSite>,
    origin: CatalogOrigin,
}

impl Catalog {
    pub fn new(sites: Vec<HeritageSite>, origin: CatalogOrigin) -> Self {
        Self {
            sites: sanitize(sites),
            origin,
        }
    }

    pub fn sites(&self) -> &[HeritageSite] {
        &self.sites
    }

    pub fn origin(&self) -> CatalogOrigin {
        self.origin
    }

    pub fn get(&self, id: SiteId) -> Option<&HeritageSite> {
        self.sites.iter().find(|site| site.id == id)
    }

    pub fn contains(&self, id: SiteId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// Drops duplicate ids (first wins) and entries with impossible coordinates.
fn sanitize(sites: Vec<HeritageSite>) -> Vec<HeritageSite> {
    let mut seen = HashSet::new();
    sites
        .into_iter()
        .filter(|site| {
            if let Err(e) = validate_coordinates(&format!("site {}", site.id), site.lat, site.lng) {
                tracing::warn!("Skipping site '{}': {}", site.name, e);
                return false;
            }
            if !seen.insert(site.id) {
                tracing::warn!("Skipping duplicate site id {} ('{}')", site.id, site.name);
                return false;
            }
            true
        })
        .collect()
}

enum Source<S> {
    Remote(S),
    Override(Vec<HeritageSite>),
}

pub struct CatalogLoader<S: CatalogSource> {
    source: Source<S>,
}

impl<S: CatalogSource> CatalogLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Source::Remote(source),
        }
    }

    /// Uses the given sites verbatim; no request is ever made.
    pub fn with_override(sites: Vec<HeritageSite>) -> Self {
        Self {
            source: Source::Override(sites),
        }
    }

    /// Loads the catalog. Never fails: any problem with the remote source
    /// falls back to the bundled list.
    pub async fn load(&self) -> Catalog {
        let source = match &self.source {
            Source::Override(sites) => {
                tracing::debug!("Using {} caller-supplied sites", sites.len());
                return Catalog::new(sites.clone(), CatalogOrigin::Override);
            }
            Source::Remote(source) => source,
        };

        match source.fetch_sites().await {
            Ok(sites) => {
                let catalog = Catalog::new(sites, CatalogOrigin::Remote);
                if catalog.is_empty() {
                    tracing::warn!("Catalog endpoint returned no usable sites, using fallback list");
                    return Self::fallback();
                }
                tracing::info!("🗺️ Loaded {} heritage sites", catalog.len());
                catalog
            }
            Err(e) => {
                tracing::warn!("Catalog fetch failed ({}), using fallback list", e);
                Self::fallback()
            }
        }
    }

    fn fallback() -> Catalog {
        Catalog::new(fallback_sites(), CatalogOrigin::Fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fallback::fallback_len;
    use crate::utils::error::{Result, TrailError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockSource {
        response: Option<Vec<HeritageSite>>,
        calls: Arc<AtomicUsize>,
    }

    impl MockSource {
        fn new(response: Option<Vec<HeritageSite>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    response,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl CatalogSource for MockSource {
        async fn fetch_sites(&self) -> Result<Vec<HeritageSite>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().ok_or_else(|| TrailError::StatusError {
                endpoint: "mock".to_string(),
                status: 500,
            })
        }
    }

    #[tokio::test]
    async fn test_remote_sites_are_used() {
        let (source, calls) = MockSource::new(Some(vec![HeritageSite::new(
            1,
            "Victoria Memorial",
            22.5448,
            88.3426,
        )]));
        let catalog = CatalogLoader::new(source).load().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(catalog.origin(), CatalogOrigin::Remote);
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_substitutes_fallback() {
        let (source, calls) = MockSource::new(None);
        let catalog = CatalogLoader::new(source).load().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(catalog.origin(), CatalogOrigin::Fallback);
        assert_eq!(catalog.len(), fallback_len());
    }

    #[tokio::test]
    async fn test_empty_remote_list_substitutes_fallback() {
        let (source, _) = MockSource::new(Some(vec![]));
        let catalog = CatalogLoader::new(source).load().await;
        assert_eq!(catalog.origin(), CatalogOrigin::Fallback);
        assert!(!catalog.is_empty());
    }

    #[tokio::test]
    async fn test_override_skips_source() {
        let loader: CatalogLoader<MockSource> =
            CatalogLoader::with_override(vec![HeritageSite::new(7, "Kalighat Temple", 22.5185, 88.3427)]);
        let catalog = loader.load().await;
        assert_eq!(catalog.origin(), CatalogOrigin::Override);
        assert_eq!(catalog.sites()[0].name, "Kalighat Temple");
    }

    #[test]
    fn test_duplicates_and_bad_coordinates_dropped() {
        let catalog = Catalog::new(
            vec![
                HeritageSite::new(1, "Victoria Memorial", 22.5448, 88.3426),
                HeritageSite::new(1, "Victoria Memorial (copy)", 22.5448, 88.3426),
                HeritageSite::new(2, "Nowhere", 123.0, 88.0),
            ],
            CatalogOrigin::Remote,
        );
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(SiteId(1)).unwrap().name, "Victoria Memorial");
        assert!(!catalog.contains(SiteId(2)));
    }
}
