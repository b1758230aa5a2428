//! Crop parameter table
//!
//! Base temperature, upper temperature and cumulative GDD stage thresholds
//! per crop, following the FAO56 framework (initial, development,
//! mid-season, harvest at the end of the late season).
//!
//! Built-in values come from Paredes, P., López-Urrea, R., Martínez-Romero,
//! Á., Petry, M., Cameira, M.R., Montoya, F., Salman, M., & Pereira, L.S.
//! (2025). "Estimating the lengths of crop growth stages to define the crop
//! coefficient curves using growing degree days (GDD): Application of the
//! revised FAO56 guidelines." Agricultural Water Management, 319, 109758.
//! Tbase and Tupper from Tables 1-2, cumulative GDD from Table 5. They apply
//! under non-limiting water and nutrient conditions.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{PhenologyError, PhenologyResult};
use crate::models::{CropParameters, StageThresholds};
use crate::validation::validate_crop_parameters;

/// (crop_id, t_base, t_upper, [initial, development, mid_season, harvest])
const BUILTIN_CROPS: &[(&str, f64, f64, [f64; 4])] = &[
    // Roots, tubers, bulbs
    ("carrot_common", 6.0, 30.0, [320.0, 785.0, 1285.0, 1575.0]),
    ("garlic_short", 4.0, 30.0, [150.0, 490.0, 825.0, 1140.0]),
    ("garlic_long", 4.0, 30.0, [580.0, 1195.0, 1510.0, 1750.0]),
    ("onion_common", 4.5, 35.0, [460.0, 930.0, 1810.0, 2290.0]),
    ("potato_short", 2.0, 30.0, [260.0, 750.0, 1275.0, 1600.0]),
    ("potato_long", 2.0, 30.0, [405.0, 935.0, 1425.0, 2260.0]),
    // Leaves and flowers
    ("broccoli_short", 4.5, 30.0, [195.0, 445.0, 655.0, 755.0]),
    ("broccoli_long", 4.5, 30.0, [295.0, 645.0, 1170.0, 1280.0]),
    ("lettuce_short", 4.0, 28.0, [365.0, 750.0, 965.0, 985.0]),
    ("lettuce_long", 4.0, 28.0, [360.0, 815.0, 1270.0, 1290.0]),
    // Fruit vegetables
    ("bell_pepper_common", 10.0, 35.0, [445.0, 1625.0, 2370.0, 2415.0]),
    ("melon_short", 10.0, 38.0, [185.0, 705.0, 1020.0, 1175.0]),
    ("melon_long", 10.0, 38.0, [140.0, 685.0, 1145.0, 1600.0]),
    ("tomato_industry", 7.0, 28.0, [280.0, 800.0, 1680.0, 1900.0]),
    ("tomato_market", 7.0, 28.0, [325.0, 985.0, 1865.0, 2065.0]),
    // Field crops, cereals
    ("barley_short", 0.0, 30.0, [290.0, 745.0, 1090.0, 1450.0]),
    ("barley_long", 0.0, 30.0, [300.0, 975.0, 1665.0, 2330.0]),
    ("maize_grain_short", 10.0, 32.0, [200.0, 580.0, 1080.0, 1540.0]),
    ("maize_grain_long", 10.0, 32.0, [295.0, 715.0, 1490.0, 1955.0]),
];

/// Mapping from crop identifier to crop parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CropTable {
    crops: BTreeMap<String, CropParameters>,
}

impl CropTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table holding the built-in FAO56rev crops
    pub fn builtin() -> Self {
        let crops = BUILTIN_CROPS
            .iter()
            .map(|&(id, t_base, t_upper, [initial, development, mid_season, harvest])| {
                let stages = StageThresholds::new(initial, development, mid_season, harvest);
                (id.to_string(), CropParameters::new(t_base, t_upper, stages))
            })
            .collect();
        Self { crops }
    }

    /// Load a table from JSON keyed by crop id, validating every entry
    pub fn from_json_str(json: &str) -> PhenologyResult<Self> {
        let table: CropTable = serde_json::from_str(json)?;
        for (crop_id, params) in &table.crops {
            validate_crop_parameters(params).map_err(|reason| {
                PhenologyError::InvalidCropParameters {
                    crop_id: crop_id.clone(),
                    reason: reason.to_string(),
                }
            })?;
        }
        Ok(table)
    }

    /// Insert or replace a crop, returning the previous parameters
    pub fn insert(
        &mut self,
        crop_id: impl Into<String>,
        params: CropParameters,
    ) -> Option<CropParameters> {
        self.crops.insert(crop_id.into(), params)
    }

    pub fn get(&self, crop_id: &str) -> Option<&CropParameters> {
        self.crops.get(crop_id)
    }

    /// Parameters for `crop_id`, failing with `UnknownCrop`
    pub fn resolve(&self, crop_id: &str) -> PhenologyResult<&CropParameters> {
        self.get(crop_id)
            .ok_or_else(|| PhenologyError::UnknownCrop(crop_id.to_string()))
    }

    pub fn contains(&self, crop_id: &str) -> bool {
        self.crops.contains_key(crop_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.crops.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CropParameters)> {
        self.crops.iter().map(|(id, params)| (id.as_str(), params))
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}

/// Built-in table, loaded once per process
pub fn builtin_table() -> &'static CropTable {
    static TABLE: OnceLock<CropTable> = OnceLock::new();
    TABLE.get_or_init(CropTable::builtin)
}
