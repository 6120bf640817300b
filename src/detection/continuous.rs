use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::DynamicImage;
use tokio::sync::mpsc;
use tracing::debug;

use super::DetectionPipeline;
use crate::error::{DetectionError, Result};
use crate::models::DetectedCar;

/// Supplies the frames a continuous detection consumes.
pub trait FrameSource: Send + 'static {
    fn next_frame(&mut self) -> anyhow::Result<DynamicImage>;
}

/// Cooperative stop switch for a continuous detection.
///
/// Stopping never aborts an in-flight cycle; it only suppresses the next
/// scheduled one.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// A running continuous detection: results drain from `results`, the loop
/// stops via `handle`.
pub struct ContinuousDetection {
    pub results: mpsc::Receiver<Result<DetectedCar>>,
    pub handle: StopHandle,
}

impl ContinuousDetection {
    /// Spawns the self-rescheduling loop.
    ///
    /// Each cycle runs to completion (success or failure) and its result is
    /// reported before the next cycle is scheduled; the stop flag is checked
    /// before every reschedule. Dropping the receiver also ends the loop.
    pub fn spawn<S: FrameSource>(pipeline: Arc<DetectionPipeline>, mut source: S) -> Self {
        let handle = StopHandle::default();
        let stop = handle.clone();
        let (tx, results) = mpsc::channel(8);
        let interval = pipeline.config().continuous_interval;

        tokio::spawn(async move {
            loop {
                let result = match source.next_frame() {
                    Ok(frame) => pipeline.detect_frame(&frame).await,
                    Err(err) => Err(DetectionError::Conversion(err.to_string())),
                };
                if let Err(err) = &result {
                    debug!(%err, "detection cycle failed");
                }
                if tx.send(result).await.is_err() {
                    debug!("result channel closed, stopping continuous detection");
                    break;
                }
                if stop.is_stopped() {
                    break;
                }
                tokio::time::sleep(interval).await;
                if stop.is_stopped() {
                    break;
                }
            }
            debug!("continuous detection finished");
        });

        Self { results, handle }
    }
}
