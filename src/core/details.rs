use crate::domain::model::{SelectedPlace, SiteId};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_DESCRIPTION: &str = "Discover the rich history and cultural significance of this heritage site in Kolkata. Each location tells a unique story of the city's past, present, and future.";
pub const DEFAULT_LOCATION: &str = "Kolkata, West Bengal";
pub const DEFAULT_TIMING: &str = "Please check local timings";
pub const DEFAULT_RATING: f32 = 4.5;

/// Bundled place images, keyed by site id.
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    images: HashMap<SiteId, PathBuf>,
}

impl ImageCatalog {
    pub fn new(images: HashMap<SiteId, PathBuf>) -> Self {
        Self { images }
    }

    pub fn image_for(&self, id: SiteId) -> Option<&Path> {
        self.images.get(&id).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceDetails {
    pub id: SiteId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub timing: String,
    pub rating: f32,
    pub image: Option<PathBuf>,
}

impl PlaceDetails {
    pub fn from_selected(place: &SelectedPlace, images: &ImageCatalog) -> Self {
        let location = match (place.lat, place.lng) {
            (Some(lat), Some(lng)) => format!("{:.4}, {:.4}", lat, lng),
            _ => DEFAULT_LOCATION.to_string(),
        };

        Self {
            id: place.id,
            name: place.name.clone(),
            description: place
                .history_details
                .clone()
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            location,
            timing: DEFAULT_TIMING.to_string(),
            rating: DEFAULT_RATING,
            image: images.image_for(place.id).map(Path::to_path_buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::HeritageSite;

    #[test]
    fn test_details_from_full_site() {
        let site = HeritageSite::new(2, "Howrah Bridge", 22.585, 88.3478)
            .with_history("A cantilever bridge over the Hooghly.");
        let images = ImageCatalog::new(HashMap::from([(
            SiteId(2),
            PathBuf::from("assets/places/howrah.jpg"),
        )]));

        let details = PlaceDetails::from_selected(&SelectedPlace::from(&site), &images);
        assert_eq!(details.location, "22.5850, 88.3478");
        assert_eq!(details.description, "A cantilever bridge over the Hooghly.");
        assert_eq!(details.image, Some(PathBuf::from("assets/places/howrah.jpg")));
        assert_eq!(details.rating, DEFAULT_RATING);
    }

    #[test]
    fn test_details_defaults() {
        let place = SelectedPlace {
            id: SiteId(9),
            name: "Belur Math".to_string(),
            lat: None,
            lng: None,
            history_details: None,
        };

        let details = PlaceDetails::from_selected(&place, &ImageCatalog::default());
        assert_eq!(details.location, DEFAULT_LOCATION);
        assert_eq!(details.description, DEFAULT_DESCRIPTION);
        assert_eq!(details.timing, DEFAULT_TIMING);
        assert!(details.image.is_none());
    }

    #[test]
    fn test_image_lookup_is_by_id_not_name() {
        // Two sites share a word in their names; only the id decides.
        let images = ImageCatalog::new(HashMap::from([(
            SiteId(1),
            PathBuf::from("victoria-memorial.jpg"),
        )]));
        let other = SelectedPlace::from(&HeritageSite::new(45, "White Town Memorial", 22.57, 88.34));

        assert!(PlaceDetails::from_selected(&other, &images).image.is_none());
    }
}
