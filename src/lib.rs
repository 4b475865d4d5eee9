pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::TrailConfig;

pub use crate::app::{build_session, AppSession};
pub use crate::core::{catalog::CatalogLoader, narration::NarrationFlow, session::TourSession};
pub use crate::utils::error::{Result, TrailError};
