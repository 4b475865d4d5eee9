use crate::core::{AudioPlayer, HeritageSite};
use crate::domain::model::AudioClip;
use crate::utils::error::{Result, TrailError};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;
use tokio::process::Command;
use tokio::task::JoinSet;

/// Placeholder in player arguments replaced by the staged file path.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Fetched audio written to a temporary file for the duration of playback.
/// The file is deleted when this guard is dropped, whichever way playback ends.
#[derive(Debug)]
pub struct StagedAudio {
    file: NamedTempFile,
}

impl StagedAudio {
    pub fn stage(clip: &AudioClip, dir: Option<&Path>) -> Result<Self> {
        let suffix = format!(".{}", clip.extension());
        let mut builder = tempfile::Builder::new();
        builder.prefix("narration-").suffix(&suffix);
        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(&clip.bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Plays narration through an external program, e.g. `ffplay -nodisp -autoexit {file}`.
///
/// Each started player is watched by a task that releases the staged clip once
/// the process exits. Await [`AudioPlayer::wait_idle`] before shutting the
/// runtime down; a watcher that is cancelled instead kills its player first.
#[derive(Debug, Clone)]
pub struct CommandAudioPlayer {
    program: String,
    args: Vec<String>,
    staging_dir: Option<PathBuf>,
    playing: Arc<Mutex<JoinSet<()>>>,
}

impl CommandAudioPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            staging_dir: None,
            playing: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    fn playing(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.playing.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of players that have not exited yet.
    pub fn active(&self) -> usize {
        self.playing().len()
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    fn command_args(&self, file: &Path) -> Vec<String> {
        let file = file.display().to_string();
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace(FILE_PLACEHOLDER, &file))
            .collect();
        if !self.args.iter().any(|arg| arg.contains(FILE_PLACEHOLDER)) {
            args.push(file);
        }
        args
    }
}

#[async_trait]
impl AudioPlayer for CommandAudioPlayer {
    async fn play(&self, site: &HeritageSite, clip: AudioClip) -> Result<()> {
        let staged = StagedAudio::stage(&clip, self.staging_dir.as_deref())?;
        let args = self.command_args(staged.path());

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TrailError::PlaybackError {
                message: format!("could not start '{}': {}", self.program, e),
            })?;

        tracing::info!("🔊 Playing narration for '{}'", site.name);
        let name = site.name.clone();
        {
            let mut playing = self.playing();
            while playing.try_join_next().is_some() {}
            playing.spawn(async move {
                match child.wait().await {
                    Ok(status) if status.success() => {
                        tracing::debug!("Narration for '{}' finished", name)
                    }
                    Ok(status) => tracing::warn!("Player for '{}' exited with {}", name, status),
                    Err(e) => tracing::warn!("Lost track of player for '{}': {}", name, e),
                }
                drop(staged);
            });
        }

        Ok(())
    }

    /// Waits until every started player has exited and its clip is released.
    async fn wait_idle(&self) {
        loop {
            let mut playing = std::mem::take(&mut *self.playing());
            if playing.is_empty() {
                return;
            }
            tracing::debug!("Waiting for {} player(s) to finish", playing.len());
            while let Some(joined) = playing.join_next().await {
                if let Err(e) = joined {
                    tracing::warn!("Playback watcher ended abnormally: {}", e);
                }
            }
        }
    }
}

/// Headless "playback": keeps each clip in an output directory as
/// `<id>-<slug>.<ext>`.
#[derive(Debug, Clone)]
pub struct ArchiveAudioPlayer {
    output_dir: PathBuf,
}

impl ArchiveAudioPlayer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn clip_path(&self, site: &HeritageSite, clip: &AudioClip) -> PathBuf {
        self.output_dir
            .join(format!("{}-{}.{}", site.id, slug(&site.name), clip.extension()))
    }
}

#[async_trait]
impl AudioPlayer for ArchiveAudioPlayer {
    async fn play(&self, site: &HeritageSite, clip: AudioClip) -> Result<()> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.clip_path(site, &clip);
        tokio::fs::write(&path, &clip.bytes).await?;
        tracing::info!("💾 Narration for '{}' saved to {}", site.name, path.display());
        Ok(())
    }
}

fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
