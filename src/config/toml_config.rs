use crate::core::details::ImageCatalog;
use crate::core::map::{ClickMode, MapView, MAX_ZOOM};
use crate::core::ConfigProvider;
use crate::domain::model::{LatLng, SiteId};
use crate::utils::error::{Result, TrailError};
use crate::utils::validation::{
    validate_coordinates, validate_non_empty_string, validate_positive_number, validate_range,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CATALOG_ENDPOINT: &str = "https://api.sonarkolkata.com/heritage-sites";
pub const DEFAULT_NARRATION_WEBHOOK: &str = "http://localhost:5678/webhook-test/narrate-heritage";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    pub catalog: CatalogConfig,
    pub narration: NarrationConfig,
    pub map: MapConfig,
    pub wallet: WalletConfig,
    pub audio: AudioConfig,
    /// Site id → image path.
    pub images: HashMap<String, PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
    /// Skip the network and use the bundled site list.
    pub offline: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CATALOG_ENDPOINT.to_string(),
            timeout_seconds: 10,
            offline: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationConfig {
    pub webhook: String,
    pub timeout_seconds: u64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            webhook: DEFAULT_NARRATION_WEBHOOK.to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
    pub clustering: bool,
    /// `narrate` or `show_details`.
    pub on_click: ClickMode,
}

impl Default for MapConfig {
    fn default() -> Self {
        let view = MapView::default();
        Self {
            center_lat: view.center.lat,
            center_lng: view.center.lng,
            zoom: view.zoom,
            clustering: view.clustering,
            on_click: view.on_click,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub require_connection: bool,
    pub account: Option<String>,
    /// Treat the account as already connected at start-up.
    pub connected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// External player program. Without one, clips are archived to `output_dir`.
    pub player: Option<String>,
    pub args: Vec<String>,
    pub output_dir: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            player: None,
            args: Vec::new(),
            output_dir: PathBuf::from("./narrations"),
        }
    }
}

impl TrailConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrailError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrailError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrailError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if !self.catalog.offline {
            validate_url("catalog.endpoint", &self.catalog.endpoint)?;
        }
        validate_positive_number("catalog.timeout_seconds", self.catalog.timeout_seconds, 1)?;
        validate_url("narration.webhook", &self.narration.webhook)?;
        validate_positive_number("narration.timeout_seconds", self.narration.timeout_seconds, 1)?;

        validate_coordinates("map.center", self.map.center_lat, self.map.center_lng)?;
        validate_range("map.zoom", self.map.zoom, 0, MAX_ZOOM)?;

        if let Some(player) = &self.audio.player {
            validate_non_empty_string("audio.player", player)?;
        }
        if let Some(account) = &self.wallet.account {
            validate_non_empty_string("wallet.account", account)?;
        }

        self.image_catalog().map(|_| ())
    }

    pub fn map_view(&self) -> MapView {
        MapView {
            center: LatLng {
                lat: self.map.center_lat,
                lng: self.map.center_lng,
            },
            zoom: self.map.zoom,
            clustering: self.map.clustering,
            on_click: self.map.on_click,
        }
    }

    pub fn image_catalog(&self) -> Result<ImageCatalog> {
        let mut images = HashMap::with_capacity(self.images.len());
        for (key, path) in &self.images {
            let id = key
                .trim()
                .parse::<u64>()
                .map_err(|e| TrailError::InvalidValueError {
                    field: "images".to_string(),
                    value: key.clone(),
                    reason: format!("image keys must be site ids: {}", e),
                })?;
            images.insert(SiteId(id), path.clone());
        }
        Ok(ImageCatalog::new(images))
    }
}

impl ConfigProvider for TrailConfig {
    fn catalog_endpoint(&self) -> &str {
        &self.catalog.endpoint
    }

    fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_seconds)
    }

    fn narration_webhook(&self) -> &str {
        &self.narration.webhook
    }

    fn narration_timeout(&self) -> Duration {
        Duration::from_secs(self.narration.timeout_seconds)
    }

    fn require_wallet(&self) -> bool {
        self.wallet.require_connection
    }
}

impl Validate for TrailConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
