use crate::core::notices::Notices;
use crate::core::{ImageUploader, PlaceRegistry};
use crate::domain::model::{Notice, TransactionReceipt};
use crate::utils::error::{Result, TrailError};
use crate::utils::validation::{
    validate_coordinates, validate_file_extension, validate_non_empty_string,
};
use std::path::PathBuf;
use std::sync::Arc;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
pub const PLACEHOLDER_IMAGE_HASH: &str = "ipfs://placeholder";

/// The "add a place" form. Fields stay as typed until a submission succeeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPlace {
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub image: Option<PathBuf>,
}

impl NewPlace {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.latitude.trim().is_empty()
            && !self.longitude.trim().is_empty()
    }

    /// Attaches a dropped or picked file. Non-image files are refused and the
    /// previous attachment is kept.
    pub fn attach_image(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        validate_file_extension("image", &path, IMAGE_EXTENSIONS)?;
        self.image = Some(path);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        let lat = parse_coordinate("latitude", &self.latitude)?;
        let lng = parse_coordinate("longitude", &self.longitude)?;
        validate_coordinates("place", lat, lng)?;
        if let Some(image) = &self.image {
            validate_file_extension("image", image, IMAGE_EXTENSIONS)?;
        }
        Ok(())
    }

    /// Title stored on chain, e.g. `Howrah Bridge (22.585, 88.3478)`.
    pub fn title(&self) -> String {
        format!(
            "{} ({}, {})",
            self.name.trim(),
            self.latitude.trim(),
            self.longitude.trim()
        )
    }

    pub fn clear(&mut self) {
        *self = NewPlace::default();
    }
}

fn parse_coordinate(field: &str, raw: &str) -> Result<f64> {
    validate_non_empty_string(field, raw)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|e| TrailError::InvalidValueError {
            field: field.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub place_name: String,
    pub title: String,
    pub image_hash: String,
    pub transaction: TransactionReceipt,
}

pub struct PlaceSubmitter<R: PlaceRegistry> {
    registry: R,
    uploader: Option<Arc<dyn ImageUploader>>,
    notices: Arc<Notices>,
}

impl<R: PlaceRegistry> PlaceSubmitter<R> {
    pub fn new(registry: R, notices: Arc<Notices>) -> Self {
        Self {
            registry,
            uploader: None,
            notices,
        }
    }

    pub fn with_uploader(mut self, uploader: Arc<dyn ImageUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Saves the place and waits for confirmation. The form is cleared only on
    /// success; on any registry failure a notice is raised and it is left as is.
    pub async fn submit(&self, form: &mut NewPlace) -> Result<SubmissionReceipt> {
        form.validate()?;

        match self.save(form).await {
            Ok(receipt) => {
                tracing::info!(
                    "✅ Saved '{}' in transaction {}",
                    receipt.place_name,
                    receipt.transaction.tx_hash
                );
                form.clear();
                Ok(receipt)
            }
            Err(e) => {
                tracing::error!("Saving '{}' failed: {}", form.name, e);
                self.notices.raise(Notice::transaction_failed());
                Err(e)
            }
        }
    }

    async fn save(&self, form: &NewPlace) -> Result<SubmissionReceipt> {
        let image_hash = match (&form.image, &self.uploader) {
            (Some(image), Some(uploader)) => uploader.upload(image).await?,
            (Some(image), None) => {
                tracing::warn!("No image uploader configured, '{}' not stored", image.display());
                PLACEHOLDER_IMAGE_HASH.to_string()
            }
            (None, _) => PLACEHOLDER_IMAGE_HASH.to_string(),
        };
        let title = form.title();

        let pending = self.registry.save_image(&image_hash, &title).await?;
        tracing::debug!("Waiting for confirmation of {}", pending.hash());
        let transaction = pending.confirm().await?;

        Ok(SubmissionReceipt {
            place_name: form.name.trim().to_string(),
            title,
            image_hash,
            transaction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PendingTransaction;
    use crate::domain::model::NoticeKind;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::path::Path;
    use std::sync::Mutex;

    struct MockTx {
        hash: String,
        confirms: bool,
    }

    #[async_trait]
    impl PendingTransaction for MockTx {
        fn hash(&self) -> &str {
            &self.hash
        }

        async fn confirm(self: Box<Self>) -> Result<TransactionReceipt> {
            if !self.confirms {
                return Err(TrailError::TransactionError {
                    message: "reverted".to_string(),
                });
            }
            Ok(TransactionReceipt {
                tx_hash: self.hash,
                block_number: Some(7),
                confirmed_at: Utc::now(),
            })
        }
    }

    #[derive(Default)]
    struct MockRegistry {
        reject: bool,
        revert: bool,
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl PlaceRegistry for MockRegistry {
        async fn save_image(
            &self,
            image_hash: &str,
            title: &str,
        ) -> Result<Box<dyn PendingTransaction>> {
            self.calls
                .lock()
                .unwrap()
                .push((image_hash.to_string(), title.to_string()));
            if self.reject {
                return Err(TrailError::TransactionError {
                    message: "user rejected transaction".to_string(),
                });
            }
            Ok(Box::new(MockTx {
                hash: "0xabc".to_string(),
                confirms: !self.revert,
            }))
        }
    }

    struct MockUploader;

    #[async_trait]
    impl ImageUploader for MockUploader {
        async fn upload(&self, image: &Path) -> Result<String> {
            Ok(format!("ipfs://{}", image.display()))
        }
    }

    fn form() -> NewPlace {
        NewPlace {
            name: "Prinsep Ghat".to_string(),
            latitude: "22.5553".to_string(),
            longitude: "88.3312".to_string(),
            image: None,
        }
    }

    #[test]
    fn test_form_completeness_and_title() {
        let mut place = form();
        assert!(place.is_complete());
        assert_eq!(place.title(), "Prinsep Ghat (22.5553, 88.3312)");

        place.longitude.clear();
        assert!(!place.is_complete());
        assert!(place.validate().is_err());
    }

    #[test]
    fn test_only_images_can_be_attached() {
        let mut place = form();
        place.attach_image("ghat.png").unwrap();
        assert!(place.attach_image("notes.pdf").is_err());
        assert_eq!(place.image, Some(PathBuf::from("ghat.png")));
    }

    #[test]
    fn test_out_of_range_latitude_rejected() {
        let mut place = form();
        place.latitude = "122.5".to_string();
        assert!(place.validate().is_err());

        place.latitude = "north".to_string();
        assert!(place.validate().is_err());
    }

    #[tokio::test]
    async fn test_successful_submission_clears_form() {
        let notices = Arc::new(Notices::default());
        let submitter = PlaceSubmitter::new(MockRegistry::default(), notices.clone());
        let mut place = form();

        let receipt = submitter.submit(&mut place).await.unwrap();
        assert_eq!(receipt.image_hash, PLACEHOLDER_IMAGE_HASH);
        assert_eq!(receipt.transaction.tx_hash, "0xabc");
        assert_eq!(place, NewPlace::default());
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_uploaded_image_hash_is_used() {
        let submitter = PlaceSubmitter::new(MockRegistry::default(), Arc::new(Notices::default()))
            .with_uploader(Arc::new(MockUploader));
        let mut place = form();
        place.attach_image("ghat.jpg").unwrap();

        let receipt = submitter.submit(&mut place).await.unwrap();
        assert_eq!(receipt.image_hash, "ipfs://ghat.jpg");
        let calls = submitter.registry.calls.lock().unwrap();
        assert_eq!(calls[0].1, "Prinsep Ghat (22.5553, 88.3312)");
    }

    #[tokio::test]
    async fn test_rejected_transaction_keeps_form() {
        let notices = Arc::new(Notices::default());
        let registry = MockRegistry {
            reject: true,
            ..MockRegistry::default()
        };
        let submitter = PlaceSubmitter::new(registry, notices.clone());
        let mut place = form();

        assert!(submitter.submit(&mut place).await.is_err());
        assert_eq!(place, form());
        let raised = notices.drain();
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].kind, NoticeKind::TransactionFailed);
    }

    #[tokio::test]
    async fn test_unconfirmed_transaction_is_a_failure() {
        let notices = Arc::new(Notices::default());
        let registry = MockRegistry {
            revert: true,
            ..MockRegistry::default()
        };
        let submitter = PlaceSubmitter::new(registry, notices.clone());
        let mut place = form();

        assert!(submitter.submit(&mut place).await.is_err());
        assert_eq!(place.name, "Prinsep Ghat");
        assert!(!notices.is_empty());
    }
}
