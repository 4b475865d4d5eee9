use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub u64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for SiteId {
    fn from(id: u64) -> Self {
        SiteId(id)
    }
}

/// A point of interest as delivered by the catalog endpoint. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeritageSite {
    pub id: SiteId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_details: Option<String>,
}

impl HeritageSite {
    pub fn new(id: u64, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: SiteId(id),
            name: name.into(),
            lat,
            lng,
            history_details: None,
        }
    }

    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.history_details = Some(history.into());
        self
    }

    pub fn position(&self) -> LatLng {
        LatLng {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// View-model behind the place-detail overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedPlace {
    pub id: SiteId,
    pub name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub history_details: Option<String>,
}

impl From<&HeritageSite> for SelectedPlace {
    fn from(site: &HeritageSite) -> Self {
        Self {
            id: site.id,
            name: site.name.clone(),
            lat: Some(site.lat),
            lng: Some(site.lng),
            history_details: site.history_details.clone(),
        }
    }
}

/// Body of the narration webhook call.
#[derive(Debug, Clone, Serialize)]
pub struct NarrationRequest {
    pub site_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_history: Option<String>,
}

impl From<&HeritageSite> for NarrationRequest {
    fn from(site: &HeritageSite) -> Self {
        Self {
            site_name: site.name.clone(),
            full_history: site.history_details.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl AudioClip {
    pub const DEFAULT_CONTENT_TYPE: &'static str = "audio/mpeg";

    pub fn new(bytes: Vec<u8>, content_type: Option<&str>) -> Self {
        let content_type = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_CONTENT_TYPE.to_string());
        Self {
            bytes,
            content_type,
        }
    }

    /// File extension used when the clip is written to disk.
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
            "audio/ogg" => "ogg",
            "audio/webm" => "webm",
            "audio/aac" => "aac",
            "audio/mp4" | "audio/x-m4a" => "m4a",
            "audio/flac" => "flac",
            _ => "mp3",
        }
    }
}

/// Result of a confirmed registry transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionReceipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub confirmed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    NarrationUnavailable,
    WalletRejected,
    TransactionFailed,
}

/// A message surfaced to the user, the equivalent of a toast or alert.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn narration_unavailable() -> Self {
        Self::new(
            NoticeKind::NarrationUnavailable,
            "The city is quiet right now... check if the narration service is running!",
        )
    }

    pub fn wallet_rejected() -> Self {
        Self::new(
            NoticeKind::WalletRejected,
            "Wallet connection was rejected. You can try connecting again.",
        )
    }

    pub fn transaction_failed() -> Self {
        Self::new(
            NoticeKind::TransactionFailed,
            "Transaction failed or rejected. Please try again.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_deserializes_with_extra_fields() {
        let json = serde_json::json!({
            "id": 1,
            "name": "Victoria Memorial",
            "lat": 22.5448,
            "lng": 88.3426,
            "category": "monument"
        });
        let site: HeritageSite = serde_json::from_value(json).unwrap();
        assert_eq!(site.id, SiteId(1));
        assert!(site.history_details.is_none());
    }

    #[test]
    fn test_narration_request_omits_missing_history() {
        let site = HeritageSite::new(2, "Howrah Bridge", 22.585, 88.3478);
        let body = serde_json::to_value(NarrationRequest::from(&site)).unwrap();
        assert_eq!(body, serde_json::json!({"site_name": "Howrah Bridge"}));

        let site = site.with_history("Opened in 1943");
        let body = serde_json::to_value(NarrationRequest::from(&site)).unwrap();
        assert_eq!(body["full_history"], "Opened in 1943");
    }

    #[test]
    fn test_audio_clip_content_type_is_normalized() {
        let clip = AudioClip::new(vec![1, 2, 3], Some("Audio/WAV; charset=binary"));
        assert_eq!(clip.content_type, "audio/wav");
        assert_eq!(clip.extension(), "wav");

        let clip = AudioClip::new(vec![1], None);
        assert_eq!(clip.extension(), "mp3");
    }
}
