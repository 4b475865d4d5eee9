pub mod catalog;
pub mod details;
pub mod map;
pub mod narration;
pub mod notices;
pub mod session;
pub mod shell;
pub mod submission;
pub mod wallet;

pub use crate::domain::model::{HeritageSite, SelectedPlace, SiteId};
pub use crate::domain::ports::{
    AudioPlayer, CatalogSource, ConfigProvider, ConnectionStatus, ImageUploader,
    NarrationService, PendingTransaction, PlaceRegistry,
};
pub use crate::utils::error::Result;
