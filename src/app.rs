use crate::adapters::audio::{ArchiveAudioPlayer, CommandAudioPlayer};
use crate::adapters::http::{HttpCatalogSource, WebhookNarrator};
use crate::adapters::wallet::PresetWallet;
use crate::config::TrailConfig;
use crate::core::catalog::CatalogLoader;
use crate::core::map::MapRenderer;
use crate::core::narration::{NarrationFlow, NarrationOutcome};
use crate::core::session::TourSession;
use crate::core::wallet::WalletGate;
use crate::core::{AudioPlayer, ConfigProvider, HeritageSite, SiteId};
use crate::domain::fallback::fallback_sites;
use crate::domain::model::AudioClip;
use crate::utils::error::{Result, TrailError};
use async_trait::async_trait;

/// The player picked by the `[audio]` section.
#[derive(Debug, Clone)]
pub enum ConfiguredPlayer {
    Command(CommandAudioPlayer),
    Archive(ArchiveAudioPlayer),
}

impl ConfiguredPlayer {
    pub fn from_config(config: &TrailConfig) -> Self {
        match &config.audio.player {
            Some(program) => {
                ConfiguredPlayer::Command(CommandAudioPlayer::new(program, config.audio.args.clone()))
            }
            None => ConfiguredPlayer::Archive(ArchiveAudioPlayer::new(&config.audio.output_dir)),
        }
    }
}

#[async_trait]
impl AudioPlayer for ConfiguredPlayer {
    async fn play(&self, site: &HeritageSite, clip: AudioClip) -> Result<()> {
        match self {
            ConfiguredPlayer::Command(player) => player.play(site, clip).await,
            ConfiguredPlayer::Archive(player) => player.play(site, clip).await,
        }
    }

    async fn wait_idle(&self) {
        match self {
            ConfiguredPlayer::Command(player) => player.wait_idle().await,
            ConfiguredPlayer::Archive(player) => player.wait_idle().await,
        }
    }
}

pub type AppSession = TourSession<HttpCatalogSource, WebhookNarrator, ConfiguredPlayer, PresetWallet>;

/// Wires the adapters described by `config` into a started session.
pub async fn build_session(config: &TrailConfig) -> Result<AppSession> {
    let loader = if config.catalog.offline {
        tracing::info!("Offline mode, using the bundled site list");
        CatalogLoader::with_override(fallback_sites())
    } else {
        CatalogLoader::new(HttpCatalogSource::from_config(config))
    };

    let narration = NarrationFlow::new(
        WebhookNarrator::from_config(config),
        ConfiguredPlayer::from_config(config),
    );
    let wallet = PresetWallet::new(config.wallet.account.clone(), config.wallet.connected);
    let gate = WalletGate::new(wallet, config.require_wallet());
    let images = config.image_catalog()?;

    let session = TourSession::start(
        loader,
        MapRenderer::new(config.map_view()),
        narration,
        gate,
    )
    .await
    .with_images(images);

    Ok(session)
}

/// Results of a batch of narrations started from the command line.
#[derive(Debug, Default)]
pub struct NarrationReport {
    pub unlocked: Vec<SiteId>,
    pub replayed: Vec<SiteId>,
    pub failed: Vec<(SiteId, TrailError)>,
}

impl NarrationReport {
    pub fn record(&mut self, id: SiteId, result: Result<NarrationOutcome>) {
        match result {
            Ok(outcome) if outcome.first_unlock => self.unlocked.push(outcome.site_id),
            Ok(outcome) => self.replayed.push(outcome.site_id),
            Err(e) => self.failed.push((id, e)),
        }
    }

    /// The first real failure. A duplicate id that was already narrating is
    /// not one.
    pub fn into_result(self) -> Result<()> {
        match self
            .failed
            .into_iter()
            .find(|(_, e)| !matches!(e, TrailError::AlreadyNarrating { .. }))
        {
            Some((_, e)) => Err(e),
            None => Ok(()),
        }
    }
}
