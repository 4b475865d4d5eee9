use crate::config::toml_config::TrailConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "heritage-trail")]
#[command(about = "Explore heritage sites on a map and hear their stories")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub catalog_endpoint: Option<String>,

    #[arg(long)]
    pub narration_webhook: Option<String>,

    /// Use the bundled site list instead of the catalog endpoint
    #[arg(long)]
    pub offline: bool,

    /// Directory narration clips are saved to when no player is configured
    #[arg(long)]
    pub audio_dir: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the map markers (or clusters) for the loaded catalog
    Sites {
        #[arg(long)]
        zoom: Option<u8>,

        /// Show every marker individually
        #[arg(long)]
        no_cluster: bool,

        #[arg(long)]
        json: bool,
    },
    /// Narrate one or more sites; several ids are narrated concurrently
    Narrate {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Show the place-detail view for a site
    Details { id: u64 },
    /// Click a site's marker on the map
    Click {
        id: u64,

        /// Open the detail view instead of narrating
        #[arg(long)]
        details: bool,
    },
    /// Pass the wallet gate and open the map
    Start,
}

impl CliConfig {
    /// File configuration (or defaults) with command-line overrides applied.
    pub fn resolve(&self) -> Result<TrailConfig> {
        let mut config = match &self.config {
            Some(path) => TrailConfig::from_file(path)?,
            None => TrailConfig::default(),
        };

        if let Some(endpoint) = &self.catalog_endpoint {
            config.catalog.endpoint = endpoint.clone();
        }
        if let Some(webhook) = &self.narration_webhook {
            config.narration.webhook = webhook.clone();
        }
        if self.offline {
            config.catalog.offline = true;
        }
        if let Some(dir) = &self.audio_dir {
            config.audio.output_dir = dir.clone();
        }

        Ok(config)
    }
}
