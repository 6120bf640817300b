pub mod client;
pub mod continuous;
pub mod normalize;
pub mod response;
pub mod specs;

use std::time::Duration;

use image::DynamicImage;
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::models::DetectedCar;
use crate::thumbnail::ThumbnailStore;
use client::{RecognitionAttempt, RecognitionClient};
use normalize::{ImageNormalizer, NormalizedImage, RawImage};

/// Orchestrates one detection request from raw bytes to a `DetectedCar`:
/// normalize, recognize with fallback, interpret, enrich.
///
/// One logical flow per call; the fallback attempts inside are strictly
/// sequential. Failures are typed: a conversion error is fatal immediately,
/// recognition ends in `Unreachable` or `NoDetection`.
pub struct DetectionPipeline {
    config: DetectionConfig,
    normalizer: ImageNormalizer,
    client: RecognitionClient,
    catalog: Catalog,
    attempts: Vec<RecognitionAttempt>,
    thumbnails: ThumbnailStore,
}

impl DetectionPipeline {
    pub fn new(config: DetectionConfig) -> Result<Self> {
        let normalizer = ImageNormalizer::new(config.max_width, config.max_height);
        let client = RecognitionClient::new(config.clone());
        Ok(Self {
            config,
            normalizer,
            client,
            catalog: Catalog::builtin(),
            attempts: RecognitionAttempt::fallback_sequence(),
            thumbnails: ThumbnailStore::new()?,
        })
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn client(&self) -> &RecognitionClient {
        &self.client
    }

    /// Detects from an uploaded or picked image.
    pub async fn detect_upload(&self, input: &RawImage) -> Result<DetectedCar> {
        debug!("normalizing input image");
        let normalized = self.normalizer.normalize(input)?;
        self.run(normalized, self.config.upload_delay).await
    }

    /// Detects from a live camera frame (already a pixel buffer).
    pub async fn detect_frame(&self, frame: &DynamicImage) -> Result<DetectedCar> {
        debug!("normalizing camera frame");
        let normalized = self.normalizer.normalize_frame(frame)?;
        self.run(normalized, self.config.capture_delay).await
    }

    async fn run(&self, normalized: NormalizedImage, delay: Duration) -> Result<DetectedCar> {
        debug!(bytes = normalized.len(), "recognizing");
        let mut car = self
            .client
            .recognize(&normalized, &self.attempts, delay, &self.catalog)
            .await?;

        // Attach the reference to the exact submitted bytes right after
        // creation; the record is never touched again.
        let thumbnail = self.thumbnails.store(normalized.data()).await?;
        car.attach_thumbnail(thumbnail);
        Ok(car)
    }
}
