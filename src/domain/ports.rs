use crate::domain::model::{AudioClip, HeritageSite, NarrationRequest, TransactionReceipt};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Where the heritage-site catalog comes from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_sites(&self) -> Result<Vec<HeritageSite>>;
}

/// Produces narration audio for a site.
#[async_trait]
pub trait NarrationService: Send + Sync {
    async fn request_narration(&self, request: &NarrationRequest) -> Result<AudioClip>;
}

/// Plays a fetched clip. Returns once playback has started; the player owns
/// the clip from then on and must release any staged copy when playback ends.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, site: &HeritageSite, clip: AudioClip) -> Result<()>;

    /// Resolves once every clip started so far has finished playing.
    async fn wait_idle(&self) {}
}

/// The two capabilities consumed from a wallet library.
#[async_trait]
pub trait ConnectionStatus: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Shows the connect prompt. `Err` means the user (or the wallet) declined.
    async fn request_connect(&self) -> Result<()>;
}

/// Write interface of the place registry contract.
#[async_trait]
pub trait PlaceRegistry: Send + Sync {
    async fn save_image(&self, image_hash: &str, title: &str)
        -> Result<Box<dyn PendingTransaction>>;
}

#[async_trait]
pub trait PendingTransaction: Send {
    fn hash(&self) -> &str;

    /// Waits for block confirmation.
    async fn confirm(self: Box<Self>) -> Result<TransactionReceipt>;
}

#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Stores the image and returns its content address.
    async fn upload(&self, image: &Path) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn catalog_endpoint(&self) -> &str;
    fn catalog_timeout(&self) -> Duration;
    fn narration_webhook(&self) -> &str;
    fn narration_timeout(&self) -> Duration;
    fn require_wallet(&self) -> bool;
}
