use crate::core::{AudioPlayer, NarrationService};
use crate::domain::model::{HeritageSite, NarrationRequest, SiteId};
use crate::utils::error::{Result, TrailError};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Sites whose narration has started at least once this session. Only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnlockState {
    unlocked: BTreeSet<SiteId>,
}

impl UnlockState {
    pub fn contains(&self, id: SiteId) -> bool {
        self.unlocked.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SiteId> + '_ {
        self.unlocked.iter().copied()
    }

    pub(crate) fn insert(&mut self, id: SiteId) -> bool {
        self.unlocked.insert(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrationPhase {
    Idle,
    Requesting,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrationOutcome {
    pub site_id: SiteId,
    /// False when the site had already been unlocked earlier in the session.
    pub first_unlock: bool,
}

#[derive(Debug, Default)]
struct NarrationState {
    unlocked: UnlockState,
    narrating: BTreeMap<SiteId, NarrationPhase>,
}

fn lock(state: &Mutex<NarrationState>) -> MutexGuard<'_, NarrationState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps a site in the narrating set for as long as it is alive, so a
/// dropped narration future never leaves a stale loading indicator.
struct InFlight<'a> {
    state: &'a Mutex<NarrationState>,
    id: SiteId,
}

impl InFlight<'_> {
    fn advance(&self, phase: NarrationPhase) {
        lock(self.state).narrating.insert(self.id, phase);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.state).narrating.remove(&self.id);
    }
}

/// `Idle → Requesting → Playing → Idle + unlocked`, or back to `Idle` on failure.
///
/// A site is recorded as unlocked as soon as playback starts. Narrations for
/// different sites run independently; the state lock is never held across an
/// await point.
pub struct NarrationFlow<N: NarrationService, P: AudioPlayer> {
    service: N,
    player: P,
    state: Mutex<NarrationState>,
}

impl<N: NarrationService, P: AudioPlayer> NarrationFlow<N, P> {
    pub fn new(service: N, player: P) -> Self {
        Self {
            service,
            player,
            state: Mutex::new(NarrationState::default()),
        }
    }

    pub async fn narrate(&self, site: &HeritageSite) -> Result<NarrationOutcome> {
        let in_flight = {
            let mut state = lock(&self.state);
            if state.narrating.contains_key(&site.id) {
                return Err(TrailError::AlreadyNarrating { id: site.id.0 });
            }
            state.narrating.insert(site.id, NarrationPhase::Requesting);
            InFlight {
                state: &self.state,
                id: site.id,
            }
        };

        tracing::debug!("Requesting narration for '{}' ({})", site.name, site.id);
        let clip = match self.service.request_narration(&NarrationRequest::from(site)).await {
            Ok(clip) => clip,
            Err(e) => {
                tracing::warn!("Narration request for '{}' failed: {}", site.name, e);
                return Err(e);
            }
        };

        in_flight.advance(NarrationPhase::Playing);
        if let Err(e) = self.player.play(site, clip).await {
            tracing::warn!("Playback for '{}' failed: {}", site.name, e);
            return Err(e);
        }

        let first_unlock = {
            let mut state = lock(&self.state);
            state.unlocked.insert(site.id)
        };
        drop(in_flight);

        if first_unlock {
            tracing::info!("🔓 Unlocked '{}'", site.name);
        }
        Ok(NarrationOutcome {
            site_id: site.id,
            first_unlock,
        })
    }

    /// Waits for the player to finish everything started so far.
    pub async fn wait_for_playback(&self) {
        self.player.wait_idle().await;
    }

    pub fn phase(&self, id: SiteId) -> NarrationPhase {
        lock(&self.state)
            .narrating
            .get(&id)
            .copied()
            .unwrap_or(NarrationPhase::Idle)
    }

    pub fn narrating(&self) -> Vec<SiteId> {
        lock(&self.state).narrating.keys().copied().collect()
    }

    pub fn is_unlocked(&self, id: SiteId) -> bool {
        lock(&self.state).unlocked.contains(id)
    }

    /// Snapshot of the unlock set for rendering.
    pub fn unlocks(&self) -> UnlockState {
        lock(&self.state).unlocked.clone()
    }
}
