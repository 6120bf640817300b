pub mod catalog;
pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod thumbnail;

pub use catalog::{Catalog, CatalogEntry, VehicleCategory, reference_lineup};
pub use config::DetectionConfig;
pub use detection::DetectionPipeline;
pub use detection::client::{BoxParams, RecognitionAttempt, RecognitionClient};
pub use detection::continuous::{ContinuousDetection, FrameSource, StopHandle};
pub use detection::normalize::{ImageNormalizer, NormalizedImage, RawImage};
pub use detection::response::{RawDetectionResponse, interpret};
pub use detection::specs::SpecResolver;
pub use error::{AttemptFailure, DetectionError, Result};
pub use models::{DetectedCar, ReferenceModel, SpecSheet};
pub use thumbnail::ThumbnailStore;
