use crate::core::catalog::{Catalog, CatalogLoader};
use crate::core::details::{ImageCatalog, PlaceDetails};
use crate::core::map::{ClickAction, MapFeature, MapRenderer, Marker};
use crate::core::narration::{NarrationFlow, NarrationOutcome, NarrationPhase, UnlockState};
use crate::core::notices::Notices;
use crate::core::shell::ModalShell;
use crate::core::wallet::WalletGate;
use crate::core::{AudioPlayer, CatalogSource, ConnectionStatus, NarrationService};
use crate::domain::model::{Notice, SelectedPlace, SiteId};
use crate::utils::error::{Result, TrailError};
use std::sync::Arc;

/// One visitor's session: the loaded catalog, the map, narration state,
/// the overlay shell and the wallet gate.
pub struct TourSession<S, N, P, C>
where
    S: CatalogSource,
    N: NarrationService,
    P: AudioPlayer,
    C: ConnectionStatus,
{
    loader: CatalogLoader<S>,
    catalog: Catalog,
    renderer: MapRenderer,
    narration: NarrationFlow<N, P>,
    gate: WalletGate<C>,
    shell: ModalShell,
    images: ImageCatalog,
    notices: Arc<Notices>,
}

impl<S, N, P, C> TourSession<S, N, P, C>
where
    S: CatalogSource,
    N: NarrationService,
    P: AudioPlayer,
    C: ConnectionStatus,
{
    /// Loads the catalog and returns a ready session.
    pub async fn start(
        loader: CatalogLoader<S>,
        renderer: MapRenderer,
        narration: NarrationFlow<N, P>,
        gate: WalletGate<C>,
    ) -> Self {
        let catalog = loader.load().await;
        Self {
            loader,
            catalog,
            renderer,
            narration,
            gate,
            shell: ModalShell::default(),
            images: ImageCatalog::default(),
            notices: Arc::new(Notices::default()),
        }
    }

    pub fn with_images(mut self, images: ImageCatalog) -> Self {
        self.images = images;
        self
    }

    pub fn with_notices(mut self, notices: Arc<Notices>) -> Self {
        self.notices = notices;
        self
    }

    /// Fetches the catalog again. Unlocks are kept; an open detail view whose
    /// site vanished is closed so the selection always refers to the catalog.
    pub async fn reload(&mut self) {
        self.catalog = self.loader.load().await;
        let stale = self
            .shell
            .selected()
            .is_some_and(|place| !self.catalog.contains(place.id));
        if stale {
            self.shell.back_to_map();
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn shell(&self) -> &ModalShell {
        &self.shell
    }

    pub fn renderer(&self) -> &MapRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut MapRenderer {
        &mut self.renderer
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.renderer.render(&self.catalog, &self.narration.unlocks())
    }

    pub fn features(&self) -> Vec<MapFeature> {
        self.renderer.features(&self.catalog, &self.narration.unlocks())
    }

    pub fn unlocks(&self) -> UnlockState {
        self.narration.unlocks()
    }

    pub fn narrating(&self) -> Vec<SiteId> {
        self.narration.narrating()
    }

    pub fn phase(&self, id: SiteId) -> NarrationPhase {
        self.narration.phase(id)
    }

    pub fn notices(&self) -> Arc<Notices> {
        self.notices.clone()
    }

    pub fn drain_notices(&self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// The landing page's "get started" button.
    pub async fn get_started(&mut self) -> Result<()> {
        let result = self.gate.get_started(&mut self.shell).await;
        if result.is_err() {
            self.notices.raise(Notice::wallet_rejected());
        }
        result
    }

    /// Marker click: handled by the registered callback, otherwise narrates or
    /// opens the detail view depending on the map's click mode.
    pub async fn click_marker(&mut self, id: SiteId) -> Result<ClickAction> {
        let action = self.renderer.click(&self.catalog, id);
        match &action {
            ClickAction::Narrate(site) => {
                self.narrate(site.id).await?;
            }
            ClickAction::ShowDetails(site) => {
                self.select_place(site.id)?;
            }
            ClickAction::Delegated | ClickAction::Ignored => {}
        }
        Ok(action)
    }

    /// Takes `&self` so several sites can be narrated concurrently.
    pub async fn narrate(&self, id: SiteId) -> Result<NarrationOutcome> {
        let site = self
            .catalog
            .get(id)
            .ok_or(TrailError::UnknownSite { id: id.0 })?;

        match self.narration.narrate(site).await {
            Ok(outcome) => Ok(outcome),
            Err(e @ TrailError::AlreadyNarrating { .. }) => Err(e),
            Err(e) => {
                self.notices.raise(Notice::narration_unavailable());
                Err(e)
            }
        }
    }

    /// Waits until started narrations have finished playing; call before exiting.
    pub async fn wait_for_playback(&self) {
        self.narration.wait_for_playback().await;
    }

    /// Opens the detail view for a site and returns what it shows.
    pub fn select_place(&mut self, id: SiteId) -> Result<PlaceDetails> {
        let site = self
            .catalog
            .get(id)
            .ok_or(TrailError::UnknownSite { id: id.0 })?;
        let place = SelectedPlace::from(site);
        let details = PlaceDetails::from_selected(&place, &self.images);
        self.shell.open_place_detail(place, &self.catalog)?;
        Ok(details)
    }

    pub fn back_to_map(&mut self) {
        self.shell.back_to_map();
    }

    pub fn close_place_detail(&mut self) {
        self.shell.close_place_detail();
    }

    pub fn open_preferences(&mut self) {
        self.shell.open_preferences();
    }

    pub fn close(&mut self) {
        self.shell.close_all();
    }
}
