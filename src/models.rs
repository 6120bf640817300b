use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Specification fields attached to a detected car.
///
/// Everything is optional: a detection with no exact catalog hit ships an
/// empty sheet, and callers that want more invoke the spec resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecSheet {
    pub horsepower: Option<u32>,
    pub torque: Option<u32>,
    /// 0-60 time in seconds.
    pub acceleration: Option<f64>,
    /// Combined fuel economy.
    pub mpg: Option<u32>,
    pub fuel_type: Option<String>,
    pub seating: Option<u32>,
    pub cargo: Option<f64>,
}

impl SpecSheet {
    pub fn is_empty(&self) -> bool {
        *self == SpecSheet::default()
    }
}

/// A single recognized vehicle, the unit handed to the UI collaborator.
///
/// Created once per successful detection and never mutated afterwards,
/// except to attach the thumbnail reference immediately after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedCar {
    pub make: String,
    pub model: String,
    /// Year or generation label; empty when the generation candidate list
    /// was not the source of the detection.
    pub year: String,
    /// Rounded percentage of the winning candidate's probability.
    pub confidence: u8,
    /// Local path to the exact bytes that were submitted for recognition.
    pub thumbnail: Option<PathBuf>,
    pub specs: SpecSheet,
}

impl DetectedCar {
    /// Zero-confidence sentinel: the service answered but carried no usable
    /// candidates. Distinguishes "found nothing" from "unreachable"; the
    /// pipeline treats it as a failed detection, never as a result.
    pub fn sentinel() -> Self {
        Self {
            make: String::new(),
            model: String::new(),
            year: String::new(),
            confidence: 0,
            thumbnail: None,
            specs: SpecSheet::default(),
        }
    }

    /// True when the make is present and not an unknown placeholder.
    pub fn has_confident_make(&self) -> bool {
        !self.make.is_empty() && !self.make.to_ascii_lowercase().contains("unknown")
    }

    pub fn attach_thumbnail(&mut self, path: PathBuf) {
        self.thumbnail = Some(path);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub horsepower: u32,
    pub torque: u32,
    /// 0-60 time in seconds.
    pub acceleration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Efficiency {
    pub mpg: u32,
    pub fuel_type: String,
}

/// Exterior dimensions in millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: u32,
    pub width: u32,
    pub height: u32,
}

/// A reference vehicle from the selection lineup.
///
/// Read-only and immutable for the process lifetime; the lineup is supplied
/// to the UI collaborator, not produced by detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceModel {
    pub id: String,
    pub name: String,
    pub year: String,
    pub performance: Performance,
    pub efficiency: Efficiency,
    pub technology: Vec<String>,
    pub dimensions: Dimensions,
    pub seating: u32,
    pub cargo: u32,
}
