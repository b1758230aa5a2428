//! Crop parameter models

use serde::{Deserialize, Serialize};

/// Phenological stage of a crop, following the FAO56 framework
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    /// Target date precedes every retained observation
    PrePlanting,
    Initial,
    Development,
    MidSeason,
    /// Late season, ending at harvest
    Harvest,
    PostHarvest,
    /// No observations retained for the season
    NoData,
}

impl GrowthStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::PrePlanting => "pre_planting",
            GrowthStage::Initial => "initial",
            GrowthStage::Development => "development",
            GrowthStage::MidSeason => "mid_season",
            GrowthStage::Harvest => "harvest",
            GrowthStage::PostHarvest => "post_harvest",
            GrowthStage::NoData => "no_data",
        }
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cumulative GDD at which each stage ends
///
/// Thresholds are cumulative from planting, not per-stage deltas, and must
/// be non-decreasing in declaration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StageThresholds {
    pub initial: f64,
    pub development: f64,
    pub mid_season: f64,
    pub harvest: f64,
}

impl StageThresholds {
    pub fn new(initial: f64, development: f64, mid_season: f64, harvest: f64) -> Self {
        Self {
            initial,
            development,
            mid_season,
            harvest,
        }
    }

    /// Stage end points in classification order
    pub fn ordered(&self) -> [(GrowthStage, f64); 4] {
        [
            (GrowthStage::Initial, self.initial),
            (GrowthStage::Development, self.development),
            (GrowthStage::MidSeason, self.mid_season),
            (GrowthStage::Harvest, self.harvest),
        ]
    }

    pub fn is_ordered(&self) -> bool {
        self.initial <= self.development
            && self.development <= self.mid_season
            && self.mid_season <= self.harvest
    }
}

/// Thermal requirements of a crop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CropParameters {
    /// Lower developmental threshold [°C]
    pub t_base: f64,
    /// Upper developmental threshold [°C]
    pub t_upper: f64,
    pub stages: StageThresholds,
}

impl CropParameters {
    pub fn new(t_base: f64, t_upper: f64, stages: StageThresholds) -> Self {
        Self {
            t_base,
            t_upper,
            stages,
        }
    }

    /// Largest GDD a single day can contribute
    pub fn max_daily_gdd(&self) -> f64 {
        self.t_upper - self.t_base
    }
}
