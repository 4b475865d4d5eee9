use crate::core::catalog::Catalog;
use crate::domain::model::SelectedPlace;
use crate::utils::error::{Result, TrailError};
use serde::Serialize;

/// The overlay currently on screen. Only one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlay {
    None,
    Map,
    PlaceDetail,
    Preferences,
    WalletLogin,
}

#[derive(Debug, Clone)]
pub struct ModalShell {
    current: Overlay,
    selected: Option<SelectedPlace>,
    /// Set when the detail view was opened on top of the map.
    return_to_map: bool,
}

impl Default for ModalShell {
    fn default() -> Self {
        Self {
            current: Overlay::None,
            selected: None,
            return_to_map: false,
        }
    }
}

impl ModalShell {
    pub fn current(&self) -> Overlay {
        self.current
    }

    pub fn selected(&self) -> Option<&SelectedPlace> {
        self.selected.as_ref()
    }

    pub fn returns_to_map(&self) -> bool {
        self.return_to_map
    }

    pub fn open_map(&mut self) {
        self.show(Overlay::Map);
    }

    pub fn open_preferences(&mut self) {
        self.show(Overlay::Preferences);
    }

    pub fn open_wallet_login(&mut self) {
        self.show(Overlay::WalletLogin);
    }

    /// The place must belong to the catalog the map was drawn from.
    pub fn open_place_detail(&mut self, place: SelectedPlace, catalog: &Catalog) -> Result<()> {
        if !catalog.contains(place.id) {
            return Err(TrailError::UnknownSite { id: place.id.0 });
        }
        self.return_to_map = self.current == Overlay::Map || self.return_to_map;
        self.selected = Some(place);
        self.current = Overlay::PlaceDetail;
        Ok(())
    }

    /// Always lands on the map, whatever was showing.
    pub fn back_to_map(&mut self) {
        self.show(Overlay::Map);
    }

    /// Dismisses the detail view; returns to the map when it was opened from there.
    pub fn close_place_detail(&mut self) {
        if self.current != Overlay::PlaceDetail {
            return;
        }
        let target = if self.return_to_map {
            Overlay::Map
        } else {
            Overlay::None
        };
        self.show(target);
    }

    /// Closing the application modal also cancels a pending wallet prompt.
    pub fn close_all(&mut self) {
        if self.current == Overlay::WalletLogin {
            tracing::debug!("Cancelling pending wallet login");
        }
        self.show(Overlay::None);
    }

    pub(crate) fn restore(&mut self, snapshot: ModalShell) {
        *self = snapshot;
    }

    fn show(&mut self, overlay: Overlay) {
        self.current = overlay;
        self.selected = None;
        self.return_to_map = false;
    }
}
