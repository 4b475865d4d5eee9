use crate::core::catalog::Catalog;
use crate::core::narration::UnlockState;
use crate::domain::model::{HeritageSite, LatLng, SiteId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MAX_ZOOM: u8 = 18;
/// From this zoom on every marker is drawn on its own.
pub const DISABLE_CLUSTERING_AT_ZOOM: u8 = 18;
pub const CLUSTER_RADIUS_PX: f64 = 80.0;
const TILE_SIZE: f64 = 256.0;
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    Locked,
    Unlocked,
}

impl MarkerColor {
    pub fn hex(self) -> &'static str {
        match self {
            MarkerColor::Locked => "#A52A2A",
            MarkerColor::Unlocked => "#FFD700",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub site_id: SiteId,
    pub name: String,
    pub position: LatLng,
    pub color: MarkerColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterGroup {
    pub center: LatLng,
    pub members: Vec<SiteId>,
    /// Zoom level a click on the cluster should move to.
    pub expansion_zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapFeature {
    Single(Marker),
    Cluster(ClusterGroup),
}

/// What a marker click does when no site-click callback is registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickMode {
    /// Request narration for the site (the map on the home page).
    #[default]
    Narrate,
    /// Open the place-detail view (the map page and the interactive map modal).
    ShowDetails,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    pub clustering: bool,
    pub on_click: ClickMode,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: LatLng {
                lat: 22.5726,
                lng: 88.3639,
            },
            zoom: 13,
            clustering: true,
            on_click: ClickMode::Narrate,
        }
    }
}

pub type SiteClickCallback = Box<dyn Fn(&HeritageSite) + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum ClickAction {
    /// The registered site-click callback handled it.
    Delegated,
    /// Request narration for this site.
    Narrate(HeritageSite),
    /// Open the detail view for this site.
    ShowDetails(HeritageSite),
    Ignored,
}

pub struct MapRenderer {
    view: MapView,
    on_site_click: Option<SiteClickCallback>,
}

impl MapRenderer {
    pub fn new(view: MapView) -> Self {
        Self {
            view,
            on_site_click: None,
        }
    }

    pub fn with_site_click(mut self, callback: SiteClickCallback) -> Self {
        self.on_site_click = Some(callback);
        self
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn set_zoom(&mut self, zoom: u8) {
        self.view.zoom = zoom.min(MAX_ZOOM);
    }

    pub fn set_clustering(&mut self, clustering: bool) {
        self.view.clustering = clustering;
    }

    pub fn set_click_mode(&mut self, mode: ClickMode) {
        self.view.on_click = mode;
    }

    /// One marker per site; the colour depends only on unlock membership.
    pub fn render(&self, catalog: &Catalog, unlocks: &UnlockState) -> Vec<Marker> {
        catalog
            .sites()
            .iter()
            .map(|site| Marker {
                site_id: site.id,
                name: site.name.clone(),
                position: site.position(),
                color: if unlocks.contains(site.id) {
                    MarkerColor::Unlocked
                } else {
                    MarkerColor::Locked
                },
            })
            .collect()
    }

    /// What is actually drawn at the current zoom.
    pub fn features(&self, catalog: &Catalog, unlocks: &UnlockState) -> Vec<MapFeature> {
        let markers = self.render(catalog, unlocks);
        if self.view.clustering {
            cluster(&markers, self.view.zoom)
        } else {
            markers.into_iter().map(MapFeature::Single).collect()
        }
    }

    pub fn click(&self, catalog: &Catalog, id: SiteId) -> ClickAction {
        let Some(site) = catalog.get(id) else {
            tracing::debug!("Click on unknown site {}", id);
            return ClickAction::Ignored;
        };

        if let Some(callback) = &self.on_site_click {
            callback(site);
            return ClickAction::Delegated;
        }
        match self.view.on_click {
            ClickMode::Narrate => ClickAction::Narrate(site.clone()),
            ClickMode::ShowDetails => ClickAction::ShowDetails(site.clone()),
        }
    }
}

/// Web-Mercator pixel coordinates at the given zoom.
fn project(position: LatLng, zoom: u8) -> (f64, f64) {
    let scale = TILE_SIZE * f64::from(1u32 << zoom.min(MAX_ZOOM));
    let lat = position.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (position.lng + 180.0) / 360.0 * scale;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * scale;
    (x, y)
}

fn cell_of(position: LatLng, zoom: u8) -> (i64, i64) {
    let (x, y) = project(position, zoom);
    (
        (x / CLUSTER_RADIUS_PX).floor() as i64,
        (y / CLUSTER_RADIUS_PX).floor() as i64,
    )
}

/// Groups marker indices by grid cell, keeping first-seen order.
fn group_by_cell<'a>(markers: impl Iterator<Item = &'a Marker>, zoom: u8) -> Vec<Vec<&'a Marker>> {
    let mut index: HashMap<(i64, i64), usize> = HashMap::new();
    let mut groups: Vec<Vec<&Marker>> = Vec::new();
    for marker in markers {
        let cell = cell_of(marker.position, zoom);
        match index.get(&cell) {
            Some(&i) => groups[i].push(marker),
            None => {
                index.insert(cell, groups.len());
                groups.push(vec![marker]);
            }
        }
    }
    groups
}

fn expansion_zoom(members: &[&Marker], zoom: u8) -> u8 {
    (zoom.saturating_add(1)..MAX_ZOOM)
        .find(|&z| group_by_cell(members.iter().copied(), z).len() > 1)
        .unwrap_or(MAX_ZOOM)
}

/// Grid clustering of markers whose screen positions fall within the same
/// `CLUSTER_RADIUS_PX` cell.
pub fn cluster(markers: &[Marker], zoom: u8) -> Vec<MapFeature> {
    if zoom >= DISABLE_CLUSTERING_AT_ZOOM {
        return markers.iter().cloned().map(MapFeature::Single).collect();
    }

    group_by_cell(markers.iter(), zoom)
        .into_iter()
        .map(|group| {
            if let [single] = group.as_slice() {
                return MapFeature::Single((*single).clone());
            }
            let count = group.len() as f64;
            let center = LatLng {
                lat: group.iter().map(|m| m.position.lat).sum::<f64>() / count,
                lng: group.iter().map(|m| m.position.lng).sum::<f64>() / count,
            };
            MapFeature::Cluster(ClusterGroup {
                center,
                members: group.iter().map(|m| m.site_id).collect(),
                expansion_zoom: expansion_zoom(&group, zoom),
            })
        })
        .collect()
}
