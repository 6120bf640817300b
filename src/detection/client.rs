use std::time::{Duration, Instant};

use reqwest::multipart::{Form, Part};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::DetectionConfig;
use crate::detection::normalize::NormalizedImage;
use crate::detection::response::{self, RawDetectionResponse};
use crate::error::{AttemptFailure, DetectionError, Result};
use crate::models::DetectedCar;

/// Bounding-box selection parameters, identical across all fallback
/// attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxParams {
    pub select: &'static str,
    pub min_height: u32,
    pub min_width: u32,
    pub min_ratio: f64,
    pub max_ratio: f64,
    pub offset: u32,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            select: "largest",
            min_height: 60,
            min_width: 60,
            min_ratio: 0.5,
            max_ratio: 4.0,
            offset: 0,
        }
    }
}

/// One fallback query variant: which feature set to request, for which
/// region, plus the shared box parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionAttempt {
    pub features: &'static str,
    pub region: &'static str,
    pub box_params: BoxParams,
}

impl RecognitionAttempt {
    /// The canonical fallback sequence, walked strictly in order: full
    /// feature set first, then progressively smaller ones.
    pub fn fallback_sequence() -> Vec<RecognitionAttempt> {
        let box_params = BoxParams::default();
        vec![
            RecognitionAttempt {
                features: "mmg,color",
                region: "EU",
                box_params,
            },
            RecognitionAttempt {
                features: "mm,color",
                region: "EU",
                box_params,
            },
            RecognitionAttempt {
                features: "mm",
                region: "DEF",
                box_params,
            },
        ]
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("features", self.features.to_string()),
            ("region", self.region.to_string()),
            ("box_select", self.box_params.select.to_string()),
            ("box_min_height", self.box_params.min_height.to_string()),
            ("box_min_width", self.box_params.min_width.to_string()),
            ("box_min_ratio", self.box_params.min_ratio.to_string()),
            ("box_max_ratio", self.box_params.max_ratio.to_string()),
            ("box_offset", self.box_params.offset.to_string()),
        ]
    }
}

/// Client for the external make/model recognition service.
pub struct RecognitionClient {
    http: reqwest::Client,
    config: DetectionConfig,
}

impl RecognitionClient {
    pub fn new(config: DetectionConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().unwrap_or_else(|_| reqwest::Client::new());
        Self { http, config }
    }

    /// Best-effort connectivity probe against `GET /health`. The outcome is
    /// only logged; it never blocks anything.
    pub async fn health_check(&self) -> bool {
        let url = self.endpoint("health");
        match self.http.get(&url).send().await {
            Ok(res) if res.status().is_success() => {
                info!("recognition service reachable");
                true
            }
            Ok(res) => {
                warn!(status = %res.status(), "recognition service responded with an error");
                false
            }
            Err(err) => {
                warn!(%err, "cannot reach recognition service");
                false
            }
        }
    }

    /// Walks the fallback sequence in order and returns the first confident,
    /// non-unknown interpretation.
    ///
    /// Individual attempt failures are recorded and walked past; the call
    /// only fails once the whole sequence is exhausted, as `Unreachable`
    /// when no HTTP exchange succeeded at all and `NoDetection` otherwise.
    pub async fn recognize(
        &self,
        image: &NormalizedImage,
        attempts: &[RecognitionAttempt],
        stabilization_delay: Duration,
        catalog: &Catalog,
    ) -> Result<DetectedCar> {
        if !stabilization_delay.is_zero() {
            debug!(
                delay_ms = stabilization_delay.as_millis() as u64,
                "waiting for camera stabilization"
            );
            tokio::time::sleep(stabilization_delay).await;
        }

        let mut exchanged = false;
        let mut last_failure: Option<AttemptFailure> = None;

        for (index, attempt) in attempts.iter().enumerate() {
            match self.try_attempt(image, attempt).await {
                Ok(parsed) => {
                    exchanged = true;
                    match response::interpret(&parsed, catalog) {
                        Some(car) if car.has_confident_make() => {
                            info!(
                                attempt = index + 1,
                                make = %car.make,
                                model = %car.model,
                                confidence = car.confidence,
                                "vehicle recognized"
                            );
                            return Ok(car);
                        }
                        Some(car) if !car.make.is_empty() => {
                            warn!(attempt = index + 1, make = %car.make, "make reported as unknown");
                            last_failure = Some(AttemptFailure::UnknownMake(car.make));
                        }
                        _ => {
                            warn!(attempt = index + 1, "no usable candidates in response");
                            last_failure = Some(AttemptFailure::EmptyCandidates);
                        }
                    }
                }
                Err(failure) => {
                    if matches!(failure, AttemptFailure::Status { .. } | AttemptFailure::Parse(_)) {
                        exchanged = true;
                    }
                    warn!(attempt = index + 1, %failure, "recognition attempt failed");
                    last_failure = Some(failure);
                }
            }
        }

        let reason = last_failure
            .map(|failure| failure.to_string())
            .unwrap_or_else(|| "no attempts were made".to_string());
        if exchanged {
            Err(DetectionError::NoDetection { reason })
        } else {
            Err(DetectionError::Unreachable { reason })
        }
    }

    /// Issues one attempt: a multipart POST carrying the image as
    /// `frame.jpg` plus the attempt's query parameters.
    async fn try_attempt(
        &self,
        image: &NormalizedImage,
        attempt: &RecognitionAttempt,
    ) -> std::result::Result<RawDetectionResponse, AttemptFailure> {
        let url = self.endpoint("recognize");
        let part = Part::bytes(image.data().to_vec())
            .file_name("frame.jpg")
            .mime_str(image.media_type())?;
        let form = Form::new().part("image", part);

        debug!(
            %url,
            features = attempt.features,
            region = attempt.region,
            bytes = image.len(),
            "sending recognition request"
        );
        let started = Instant::now();
        let response = self
            .http
            .post(&url)
            .query(&attempt.query())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        debug!(
            %status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "recognition response"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptFailure::Status { status, body });
        }

        let body = response.text().await?;
        let parsed: RawDetectionResponse = serde_json::from_str(&body)?;
        if let Some(parameters) = parsed.meta.as_ref().and_then(|m| m.parameters.as_ref()) {
            debug!(%parameters, "upstream parameters echo");
        }
        Ok(parsed)
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base.as_str().trim_end_matches('/'),
            path
        )
    }
}
