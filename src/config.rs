use std::time::Duration;

use url::Url;

/// Default base URL of the recognition service.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8787";

/// Configuration for the detection pipeline.
///
/// Passed in explicitly when constructing the pipeline; nothing in the
/// library reads ambient process state.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Base URL of the recognition service.
    pub api_base: Url,

    /// Stabilization delay before the first request for an uploaded image.
    pub upload_delay: Duration,

    /// Stabilization delay before the first request for a live capture.
    pub capture_delay: Duration,

    /// Pause between continuous-detection cycles.
    pub continuous_interval: Duration,

    /// Normalized images are bounded to this resolution.
    pub max_width: u32,
    pub max_height: u32,

    /// Per-attempt request timeout. `None` lets a hung request block its
    /// attempt indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"),
            upload_delay: Duration::from_millis(2000),
            capture_delay: Duration::from_millis(3000),
            continuous_interval: Duration::from_millis(3000),
            max_width: 1920,
            max_height: 1080,
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl DetectionConfig {
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = delay;
        self
    }

    pub fn with_capture_delay(mut self, delay: Duration) -> Self {
        self.capture_delay = delay;
        self
    }

    pub fn with_continuous_interval(mut self, interval: Duration) -> Self {
        self.continuous_interval = interval;
        self
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_width = width;
        self.max_height = height;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DetectionConfig::default();
        assert_eq!(config.api_base.as_str(), "http://127.0.0.1:8787/");
        assert_eq!(config.upload_delay, Duration::from_millis(2000));
        assert_eq!(config.capture_delay, Duration::from_millis(3000));
        assert_eq!(config.continuous_interval, Duration::from_millis(3000));
        assert_eq!(config.max_width, 1920);
        assert_eq!(config.max_height, 1080);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_builder_overrides() {
        let config = DetectionConfig::default()
            .with_api_base(Url::parse("http://recognizer.local:9000").unwrap())
            .with_upload_delay(Duration::ZERO)
            .with_max_dimensions(640, 480)
            .with_request_timeout(None);

        assert_eq!(config.api_base.host_str(), Some("recognizer.local"));
        assert_eq!(config.upload_delay, Duration::ZERO);
        assert_eq!(config.max_width, 640);
        assert_eq!(config.max_height, 480);
        assert_eq!(config.request_timeout, None);
        // Untouched fields keep their defaults
        assert_eq!(config.capture_delay, Duration::from_millis(3000));
    }
}
