use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Dimensions, Efficiency, Performance, ReferenceModel};

/// Body-style tag carried by catalog entries and synthesized records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleCategory {
    CrossoverCoupe,
    ThreeRow,
    FullSize,
    SportSedan,
    Generic,
    Suv,
    Sedan,
    Crossover,
}

/// Whatever subset of competitor figures is known for a catalog key.
///
/// SUV-shaped rows carry a cargo volume, sedan rows a trunk volume; the
/// remaining fields are present on every row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub cargo_volume: Option<f64>,
    pub trunk_volume: Option<f64>,
    pub mpg_combined: u32,
    pub msrp: u32,
    pub seating: u32,
    pub horsepower: u32,
    /// 0-60 time in seconds.
    pub acceleration: f64,
    pub category: VehicleCategory,
}

/// Static competitor table, keyed by `"{make} {model}"` or by bare make.
///
/// Read-only for the lifetime of the process; used for deterministic
/// enrichment and as the first two rungs of the spec resolver.
#[derive(Debug)]
pub struct Catalog {
    entries: HashMap<&'static str, CatalogEntry>,
}

fn suv(
    cargo: f64,
    mpg: u32,
    msrp: u32,
    seating: u32,
    hp: u32,
    accel: f64,
    category: VehicleCategory,
) -> CatalogEntry {
    CatalogEntry {
        cargo_volume: Some(cargo),
        trunk_volume: None,
        mpg_combined: mpg,
        msrp,
        seating,
        horsepower: hp,
        acceleration: accel,
        category,
    }
}

fn sedan(
    trunk: f64,
    mpg: u32,
    msrp: u32,
    seating: u32,
    hp: u32,
    accel: f64,
    category: VehicleCategory,
) -> CatalogEntry {
    CatalogEntry {
        cargo_volume: None,
        trunk_volume: Some(trunk),
        mpg_combined: mpg,
        msrp,
        seating,
        horsepower: hp,
        acceleration: accel,
        category,
    }
}

impl Catalog {
    /// The built-in competitor table.
    pub fn builtin() -> Self {
        use VehicleCategory::*;

        let mut entries = HashMap::new();

        entries.insert("BMW X4", suv(50.5, 24, 56000, 5, 248, 6.1, CrossoverCoupe));
        entries.insert("Mercedes GLC Coupe", suv(49.4, 23, 58000, 5, 255, 6.3, CrossoverCoupe));
        entries.insert("Audi Q5 Sportback", suv(53.1, 24, 54000, 5, 261, 5.9, CrossoverCoupe));
        entries.insert("BMW X6", suv(59.7, 22, 68000, 5, 335, 5.3, CrossoverCoupe));

        entries.insert("Acura MDX", suv(71.4, 22, 50000, 7, 290, 6.4, ThreeRow));
        entries.insert("Audi Q7", suv(69.6, 21, 59000, 7, 261, 6.9, ThreeRow));
        entries.insert("BMW X5", suv(72.3, 23, 62000, 7, 335, 5.5, ThreeRow));
        entries.insert("Volvo XC90", suv(85.7, 23, 58000, 7, 295, 6.2, ThreeRow));
        entries.insert("Lexus RX L", suv(58.5, 24, 53000, 7, 295, 7.2, ThreeRow));

        entries.insert("Cadillac Escalade", suv(94.2, 17, 82000, 8, 420, 6.1, FullSize));
        entries.insert("BMW X7", suv(90.4, 21, 79000, 7, 335, 6.1, FullSize));
        entries.insert("Mercedes GLS", suv(84.7, 20, 81000, 7, 362, 5.9, FullSize));
        entries.insert("Land Rover Range Rover", suv(68.6, 19, 98000, 7, 395, 5.4, FullSize));
        entries.insert("Lincoln Navigator", suv(103.3, 18, 83000, 8, 440, 5.9, FullSize));

        entries.insert("BMW 3 Series", sedan(13.0, 28, 44000, 5, 255, 5.6, SportSedan));
        entries.insert("Mercedes C-Class", sedan(12.6, 27, 45000, 5, 255, 5.9, SportSedan));
        entries.insert("Audi A4", sedan(13.0, 28, 40000, 5, 201, 6.8, SportSedan));
        entries.insert("Genesis G70", sedan(10.5, 25, 40000, 5, 252, 6.0, SportSedan));
        entries.insert("Lexus IS", sedan(10.8, 26, 41000, 5, 241, 7.0, SportSedan));

        // Bare-make fallback rows.
        entries.insert("BMW", suv(60.0, 24, 58000, 5, 300, 5.8, Generic));
        entries.insert("Mercedes", suv(58.0, 23, 60000, 5, 310, 5.7, Generic));
        entries.insert("Audi", suv(62.0, 25, 56000, 5, 280, 6.0, Generic));
        entries.insert("Lexus", suv(55.0, 26, 50000, 5, 295, 6.5, Generic));
        entries.insert("Acura", suv(68.0, 23, 48000, 7, 290, 6.3, Generic));
        entries.insert("Volvo", suv(70.0, 24, 54000, 7, 295, 6.4, Generic));
        entries.insert("Cadillac", suv(88.0, 18, 78000, 8, 400, 6.2, Generic));
        entries.insert("Lincoln", suv(95.0, 19, 80000, 8, 420, 6.0, Generic));
        entries.insert("Genesis", suv(12.0, 26, 42000, 5, 260, 6.2, Generic));
        entries.insert("Land Rover", suv(70.0, 20, 90000, 7, 380, 5.8, Generic));

        Self { entries }
    }

    /// Exact `"{make} {model}"` lookup. The key is trimmed, so an empty
    /// model degrades to a bare-make key.
    pub fn exact(&self, make: &str, model: &str) -> Option<&CatalogEntry> {
        let key = format!("{} {}", make, model);
        self.entries.get(key.trim())
    }

    /// Bare-make lookup.
    pub fn by_make(&self, make: &str) -> Option<&CatalogEntry> {
        self.entries.get(make.trim())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The built-in reference lineup shown on the selection screen.
pub fn reference_lineup() -> Vec<ReferenceModel> {
    vec![
        ReferenceModel {
            id: "qx80".to_string(),
            name: "QX80".to_string(),
            year: "2024".to_string(),
            performance: Performance {
                horsepower: 400,
                torque: 413,
                acceleration: 6.5,
            },
            efficiency: Efficiency {
                mpg: 16,
                fuel_type: "Petrol".to_string(),
            },
            technology: vec![
                "ProPILOT Assist".to_string(),
                "Around View Monitor".to_string(),
                "Bose Performance Series Audio".to_string(),
            ],
            dimensions: Dimensions {
                length: 5290,
                width: 2030,
                height: 1925,
            },
            seating: 7,
            cargo: 470,
        },
        ReferenceModel {
            id: "qx60".to_string(),
            name: "QX60".to_string(),
            year: "2024".to_string(),
            performance: Performance {
                horsepower: 295,
                torque: 270,
                acceleration: 7.2,
            },
            efficiency: Efficiency {
                mpg: 24,
                fuel_type: "Petrol".to_string(),
            },
            technology: vec![
                "ProPILOT Assist".to_string(),
                "Tri-Zone Climate Control".to_string(),
                "Wireless Apple CarPlay".to_string(),
            ],
            dimensions: Dimensions {
                length: 5034,
                width: 1981,
                height: 1742,
            },
            seating: 7,
            cargo: 386,
        },
        ReferenceModel {
            id: "qx55".to_string(),
            name: "QX55".to_string(),
            year: "2024".to_string(),
            performance: Performance {
                horsepower: 268,
                torque: 251,
                acceleration: 7.0,
            },
            efficiency: Efficiency {
                mpg: 25,
                fuel_type: "Petrol".to_string(),
            },
            technology: vec![
                "ProACTIVE".to_string(),
                "Head-Up Display".to_string(),
                "Bose Premium Audio".to_string(),
            ],
            dimensions: Dimensions {
                length: 4678,
                width: 1903,
                height: 1594,
            },
            seating: 5,
            cargo: 762,
        },
        ReferenceModel {
            id: "q50".to_string(),
            name: "Q50".to_string(),
            year: "2024".to_string(),
            performance: Performance {
                horsepower: 300,
                torque: 295,
                acceleration: 5.6,
            },
            efficiency: Efficiency {
                mpg: 27,
                fuel_type: "Petrol".to_string(),
            },
            technology: vec![
                "Direct Adaptive Steering".to_string(),
                "InTouch Dual Display".to_string(),
                "Active Lane Control".to_string(),
            ],
            dimensions: Dimensions {
                length: 4783,
                width: 1823,
                height: 1445,
            },
            seating: 5,
            cargo: 372,
        },
    ]
}
