use rand::Rng;
use tracing::debug;

use crate::catalog::{Catalog, CatalogEntry, VehicleCategory};

/// Luxury-tier makes, matched case-insensitively as substrings.
const LUXURY_BRANDS: &[&str] = &[
    "BMW",
    "MERCEDES",
    "AUDI",
    "LEXUS",
    "INFINITI",
    "CADILLAC",
    "LINCOLN",
    "GENESIS",
    "PORSCHE",
    "JAGUAR",
    "LAND ROVER",
    "RANGE ROVER",
    "VOLVO",
];

/// Model names that read as SUVs regardless of lettering pattern.
const SUV_NAMES: &[&str] = &[
    "RX", "GX", "NX", "UX", "XT", "CX", "RAV", "CR-V", "PILOT", "EXPLORER", "TAHOE", "SUBURBAN",
    "YUKON", "ESCALADE", "NAVIGATOR", "EXPEDITION",
];

/// Model names that read as sedans.
const SEDAN_NAMES: &[&str] = &[
    "SERIES", "ACCORD", "CAMRY", "ALTIMA", "SONATA", "ELANTRA", "CIVIC", "COROLLA",
];

/// Fixed base figures for one category x tier cell of the synthesis table.
struct BaseSpecs {
    cargo: Option<f64>,
    trunk: Option<f64>,
    mpg: u32,
    msrp: u32,
    seating: u32,
    horsepower: u32,
    acceleration: f64,
}

/// Resolves a make/model to a specification record: an exact catalog hit,
/// a make-level hit, or a synthesized plausible record.
///
/// Never fails. The synthesis rung draws a random jitter, so repeated
/// calls for an uncataloged vehicle yield different numbers.
#[derive(Debug, Clone, Copy)]
pub struct SpecResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> SpecResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, make: &str, model: &str) -> CatalogEntry {
        self.resolve_with(make, model, &mut rand::rng())
    }

    /// Same chain with the jitter source supplied by the caller. The two
    /// lookup rungs never touch the generator.
    pub fn resolve_with<R: Rng + ?Sized>(&self, make: &str, model: &str, rng: &mut R) -> CatalogEntry {
        if let Some(entry) = self.catalog.exact(make, model) {
            debug!(make, model, "exact catalog hit");
            return entry.clone();
        }
        if let Some(entry) = self.catalog.by_make(make) {
            debug!(make, "make-level catalog hit");
            return entry.clone();
        }
        debug!(make, model, "no catalog entry, synthesizing specs");
        synthesize(make, model, rng)
    }
}

fn synthesize<R: Rng + ?Sized>(make: &str, model: &str, rng: &mut R) -> CatalogEntry {
    let luxury = is_luxury(make);

    let (base, category) = if looks_like_suv(model) {
        let base = if luxury {
            BaseSpecs {
                cargo: Some(70.0),
                trunk: None,
                mpg: 22,
                msrp: 60000,
                seating: 7,
                horsepower: 300,
                acceleration: 6.0,
            }
        } else {
            BaseSpecs {
                cargo: Some(60.0),
                trunk: None,
                mpg: 26,
                msrp: 35000,
                seating: 7,
                horsepower: 250,
                acceleration: 7.5,
            }
        };
        (base, VehicleCategory::Suv)
    } else if looks_like_sedan(model) {
        let base = if luxury {
            BaseSpecs {
                cargo: None,
                trunk: Some(13.0),
                mpg: 25,
                msrp: 45000,
                seating: 5,
                horsepower: 280,
                acceleration: 5.8,
            }
        } else {
            BaseSpecs {
                cargo: None,
                trunk: Some(13.0),
                mpg: 30,
                msrp: 28000,
                seating: 5,
                horsepower: 200,
                acceleration: 7.2,
            }
        };
        (base, VehicleCategory::Sedan)
    } else {
        let base = if luxury {
            BaseSpecs {
                cargo: Some(65.0),
                trunk: None,
                mpg: 23,
                msrp: 55000,
                seating: 5,
                horsepower: 280,
                acceleration: 6.5,
            }
        } else {
            BaseSpecs {
                cargo: Some(55.0),
                trunk: None,
                mpg: 27,
                msrp: 32000,
                seating: 5,
                horsepower: 220,
                acceleration: 7.8,
            }
        };
        (base, VehicleCategory::Crossover)
    };

    // One draw per resolution, applied to every jittered field.
    let jitter: f64 = rng.random_range(0.9..=1.1);

    CatalogEntry {
        cargo_volume: base.cargo.map(|c| (c * jitter).round()),
        trunk_volume: base.trunk,
        mpg_combined: (base.mpg as f64 * jitter).round() as u32,
        msrp: (base.msrp as f64 * jitter).round() as u32,
        seating: base.seating,
        horsepower: (base.horsepower as f64 * jitter).round() as u32,
        acceleration: (base.acceleration * jitter * 10.0).round() / 10.0,
        category,
    }
}

fn is_luxury(make: &str) -> bool {
    let upper = make.to_uppercase();
    LUXURY_BRANDS.iter().any(|brand| upper.contains(brand))
}

/// `X4`, `Q7`, `RX`-style names and the usual full-size nameplates.
fn looks_like_suv(model: &str) -> bool {
    let upper = model.to_uppercase();
    SUV_NAMES.iter().any(|name| upper.contains(name)) || has_letter_digit(&upper, &['X', 'Q'])
}

/// `3 Series`, `A4`/`C300`/`E350`/`S90`-style names, bare 3/5/7 badges and
/// the usual compact nameplates.
fn looks_like_sedan(model: &str) -> bool {
    let upper = model.to_uppercase();
    SEDAN_NAMES.iter().any(|name| upper.contains(name))
        || has_letter_digit(&upper, &['A', 'C', 'E', 'S'])
        || upper.contains(['3', '5', '7'])
}

fn has_letter_digit(upper: &str, letters: &[char]) -> bool {
    upper
        .as_bytes()
        .windows(2)
        .any(|w| letters.contains(&(w[0] as char)) && (w[1] as char).is_ascii_digit())
}
