use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Multipart, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageBuffer, Rgb};
use serde_json::json;
use url::Url;

use carspot::DetectionConfig;

/// Pipeline configuration pointed at a stub, with the stabilization delays
/// collapsed so tests run fast.
pub fn test_config(base_url: Url) -> DetectionConfig {
    DetectionConfig::default()
        .with_api_base(base_url)
        .with_upload_delay(Duration::ZERO)
        .with_capture_delay(Duration::ZERO)
        .with_continuous_interval(Duration::from_millis(20))
}

/// Creates a small RGB test frame.
pub fn test_frame(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 64u8])
    }))
}

/// Encodes a test frame as JPEG bytes.
pub fn test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut data, 90);
    test_frame(width, height)
        .write_with_encoder(encoder)
        .expect("Failed to encode test JPEG");
    data
}

/// One canned reply for the stub's `/recognize` route.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
}

impl CannedResponse {
    pub fn ok(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn error(status: u16) -> Self {
        Self {
            status,
            body: json!({ "error": "upstream failure" }).to_string(),
        }
    }
}

/// A confident single-region response with one mm candidate.
pub fn mm_response(make: &str, model: &str, probability: f64) -> CannedResponse {
    CannedResponse::ok(json!({
        "detections": [{
            "status": { "selected": true },
            "mm": [{ "make_name": make, "model_name": model, "probability": probability }],
            "mmg": []
        }]
    }))
}

/// A response whose top candidate is the unknown placeholder.
pub fn unknown_response() -> CannedResponse {
    mm_response("Unknown", "Unknown Model", 0.3)
}

/// A response with no detection regions at all.
pub fn no_regions_response() -> CannedResponse {
    CannedResponse::ok(json!({ "detections": [] }))
}

/// A selected region with both candidate lists empty.
pub fn no_candidates_response() -> CannedResponse {
    CannedResponse::ok(json!({
        "detections": [{ "status": { "selected": true }, "mm": [], "mmg": [] }]
    }))
}

/// What the stub recorded about one `/recognize` call.
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub query: HashMap<String, String>,
    pub field_name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Clone)]
struct StubState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    responses: Arc<Mutex<VecDeque<CannedResponse>>>,
}

/// In-process stand-in for the recognition service.
///
/// Replies come from the canned queue in order; the last entry repeats once
/// the queue runs dry, and an empty queue answers with no regions.
pub struct RecognitionStub {
    pub base_url: Url,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RecognitionStub {
    pub async fn spawn(responses: Vec<CannedResponse>) -> Self {
        let state = StubState {
            requests: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(responses.into())),
        };
        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .route("/recognize", post(recognize))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Failed to read stub address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Stub server failed");
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}")).expect("Failed to build stub URL"),
            requests: state.requests,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn recognize(
    State(state): State<StubState>,
    Query(query): Query<HashMap<String, String>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut recorded = RecordedRequest {
        query,
        ..Default::default()
    };
    while let Some(field) = multipart.next_field().await.expect("Failed to read field") {
        recorded.field_name = field.name().map(str::to_string);
        recorded.file_name = field.file_name().map(str::to_string);
        recorded.content_type = field.content_type().map(str::to_string);
        recorded.body = field.bytes().await.expect("Failed to read bytes").to_vec();
    }
    state.requests.lock().unwrap().push(recorded);

    let canned = {
        let mut queue = state.responses.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
    .unwrap_or_else(no_regions_response);

    (
        StatusCode::from_u16(canned.status).expect("Invalid canned status"),
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
}
