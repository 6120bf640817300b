mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from carspot for tests
pub use carspot::{
    ContinuousDetection, DetectedCar, DetectionConfig, DetectionError, DetectionPipeline,
    FrameSource, RawImage,
};
