use serde::Deserialize;
use tracing::warn;

use crate::catalog::{Catalog, CatalogEntry};
use crate::models::{DetectedCar, SpecSheet};

/// Wire shape of a `POST /recognize` response.
///
/// Field presence is validated by serde when the body is parsed, not
/// trusted at access time; absent arrays simply deserialize empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDetectionResponse {
    #[serde(default)]
    pub detections: Vec<DetectionRegion>,
    #[serde(default)]
    pub meta: Option<ResponseMeta>,
}

/// One bounding region the service considered.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionRegion {
    #[serde(default)]
    pub status: RegionStatus,
    /// Make/model candidates.
    #[serde(default)]
    pub mm: Vec<Candidate>,
    /// Make/model/generation candidates.
    #[serde(default)]
    pub mmg: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionStatus {
    #[serde(default)]
    pub selected: bool,
}

/// A single make/model guess with its probability in [0, 1].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    pub make_name: Option<String>,
    pub model_name: Option<String>,
    /// Generation label, only present on mmg candidates.
    pub years: Option<String>,
    pub probability: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub parameters: Option<serde_json::Value>,
}

/// Interprets a parsed response into a detection record.
///
/// Returns `None` when the response carries no detection regions at all.
/// Returns the zero-confidence sentinel when the selected region has no
/// candidates: the service answered, it just found nothing.
pub fn interpret(response: &RawDetectionResponse, catalog: &Catalog) -> Option<DetectedCar> {
    let region = response
        .detections
        .iter()
        .find(|d| d.status.selected)
        .or_else(|| response.detections.first())?;

    if !region.status.selected {
        warn!("recognition box not selected by upstream");
    }

    let (source, from_mmg) = if let Some(candidate) = region.mmg.first() {
        (candidate, true)
    } else if let Some(candidate) = region.mm.first() {
        (candidate, false)
    } else {
        return Some(DetectedCar::sentinel());
    };

    let make = source
        .make_name
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());
    let model = source
        .model_name
        .clone()
        .unwrap_or_else(|| "Unknown Model".to_string());
    let year = if from_mmg {
        source.years.clone().unwrap_or_default()
    } else {
        String::new()
    };
    let probability = source.probability.unwrap_or(0.0).clamp(0.0, 1.0);
    let confidence = (probability * 100.0).round() as u8;

    let specs = catalog
        .exact(&make, &model)
        .map(enrich)
        .unwrap_or_default();

    Some(DetectedCar {
        make,
        model,
        year,
        confidence,
        thumbnail: None,
        specs,
    })
}

/// Inline enrichment mapping from a catalog row. The catalog carries no
/// torque column and only lists petrol competitors; sedan rows have no
/// cargo volume, which maps to 0.
fn enrich(entry: &CatalogEntry) -> SpecSheet {
    SpecSheet {
        horsepower: Some(entry.horsepower),
        torque: Some(0),
        acceleration: Some(entry.acceleration),
        mpg: Some(entry.mpg_combined),
        fuel_type: Some("Petrol".to_string()),
        seating: Some(entry.seating),
        cargo: Some(entry.cargo_volume.unwrap_or(0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> RawDetectionResponse {
        serde_json::from_str(body).expect("test body should parse")
    }

    #[test]
    fn test_zero_regions_interprets_to_none() {
        let catalog = Catalog::builtin();
        let response = parse(r#"{"detections":[]}"#);
        assert!(interpret(&response, &catalog).is_none());
    }

    #[test]
    fn test_missing_detections_field_interprets_to_none() {
        let catalog = Catalog::builtin();
        let response = parse(r#"{}"#);
        assert!(interpret(&response, &catalog).is_none());
    }

    #[test]
    fn test_empty_candidate_lists_yield_sentinel() {
        let catalog = Catalog::builtin();
        let response = parse(r#"{"detections":[{"status":{"selected":true},"mm":[],"mmg":[]}]}"#);

        let car = interpret(&response, &catalog).expect("sentinel, not None");
        assert_eq!(car, DetectedCar::sentinel());
        assert_eq!(car.confidence, 0);
        assert!(car.make.is_empty());
    }

    #[test]
    fn test_selected_region_is_preferred_over_first() {
        let catalog = Catalog::builtin();
        let response = parse(
            r#"{"detections":[
                {"status":{"selected":false},"mm":[{"make_name":"Audi","model_name":"A4","probability":0.5}]},
                {"status":{"selected":true},"mm":[{"make_name":"BMW","model_name":"X4","probability":0.9}]}
            ]}"#,
        );

        let car = interpret(&response, &catalog).expect("should interpret");
        assert_eq!(car.make, "BMW");
    }

    #[test]
    fn test_unselected_regions_fall_back_to_first() {
        let catalog = Catalog::builtin();
        let response = parse(
            r#"{"detections":[
                {"status":{"selected":false},"mm":[{"make_name":"Audi","model_name":"A4","probability":0.5}]},
                {"status":{"selected":false},"mm":[{"make_name":"BMW","model_name":"X4","probability":0.9}]}
            ]}"#,
        );

        let car = interpret(&response, &catalog).expect("should interpret");
        assert_eq!(car.make, "Audi");
    }

    #[test]
    fn test_mmg_candidate_is_preferred_and_carries_year() {
        let catalog = Catalog::builtin();
        let response = parse(
            r#"{"detections":[{"status":{"selected":true},
                "mm":[{"make_name":"BMW","model_name":"X4","probability":0.95}],
                "mmg":[{"make_name":"BMW","model_name":"X5","years":"2018-2023","probability":0.81}]
            }]}"#,
        );

        let car = interpret(&response, &catalog).expect("should interpret");
        assert_eq!(car.model, "X5");
        assert_eq!(car.year, "2018-2023");
        assert_eq!(car.confidence, 81);
    }

    #[test]
    fn test_mm_candidate_leaves_year_empty() {
        let catalog = Catalog::builtin();
        let response = parse(
            r#"{"detections":[{"status":{"selected":true},
                "mm":[{"make_name":"BMW","model_name":"X4","probability":0.92}],"mmg":[]}]}"#,
        );

        let car = interpret(&response, &catalog).expect("should interpret");
        assert_eq!(car.make, "BMW");
        assert_eq!(car.model, "X4");
        assert_eq!(car.year, "");
        assert_eq!(car.confidence, 92);
    }

    #[test]
    fn test_exact_catalog_hit_enriches_specs() {
        let catalog = Catalog::builtin();
        let response = parse(
            r#"{"detections":[{"status":{"selected":true},
                "mm":[{"make_name":"BMW","model_name":"X4","probability":0.92}],"mmg":[]}]}"#,
        );

        let car = interpret(&response, &catalog).expect("should interpret");
        assert_eq!(car.specs.horsepower, Some(248));
        assert_eq!(car.specs.torque, Some(0));
        assert_eq!(car.specs.acceleration, Some(6.1));
        assert_eq!(car.specs.mpg, Some(24));
        assert_eq!(car.specs.fuel_type.as_deref(), Some("Petrol"));
        assert_eq!(car.specs.seating, Some(5));
        assert_eq!(car.specs.cargo, Some(50.5));
    }

    #[test]
    fn test_sedan_catalog_hit_maps_cargo_to_zero() {
        let catalog = Catalog::builtin();
        let response = parse(
            r#"{"detections":[{"status":{"selected":true},
                "mm":[{"make_name":"Audi","model_name":"A4","probability":0.7}],"mmg":[]}]}"#,
        );

        let car = interpret(&response, &catalog).expect("should interpret");
        assert_eq!(car.specs.cargo, Some(0.0));
        assert_eq!(car.specs.horsepower, Some(201));
    }

    #[test]
    fn test_no_catalog_hit_leaves_specs_empty() {
        let catalog = Catalog::builtin();
        let response = parse(
            r#"{"detections":[{"status":{"selected":true},
                "mm":[{"make_name":"Ferrari","model_name":"Roma","probability":0.88}],"mmg":[]}]}"#,
        );

        let car = interpret(&response, &catalog).expect("should interpret");
        assert_eq!(car.make, "Ferrari");
        assert!(car.specs.is_empty());
    }

    #[test]
    fn test_missing_names_get_placeholders() {
        let catalog = Catalog::builtin();
        let response = parse(r#"{"detections":[{"mm":[{"probability":0.4}]}]}"#);

        let car = interpret(&response, &catalog).expect("should interpret");
        assert_eq!(car.make, "Unknown");
        assert_eq!(car.model, "Unknown Model");
        assert_eq!(car.confidence, 40);
        assert!(!car.has_confident_make());
    }

    #[test]
    fn test_confidence_is_rounded_percentage() {
        let catalog = Catalog::builtin();
        let response = parse(
            r#"{"detections":[{"mm":[{"make_name":"BMW","model_name":"X4","probability":0.925}]}]}"#,
        );

        let car = interpret(&response, &catalog).expect("should interpret");
        assert_eq!(car.confidence, 93);
    }
}
