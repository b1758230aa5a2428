//! Stage classification results

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::GrowthStage;

/// Stage located by the classifier with the fractional position inside it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StageProgress {
    pub stage: GrowthStage,
    /// Position within the stage interval (0-1)
    pub progress: f64,
}

/// Stage of a season as of a given date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StageReport {
    pub stage: GrowthStage,
    pub progress: f64,
    pub cumulative_gdd: f64,
}

impl StageReport {
    pub fn pre_planting() -> Self {
        Self {
            stage: GrowthStage::PrePlanting,
            progress: 0.0,
            cumulative_gdd: 0.0,
        }
    }
}

/// Season status as of the most recent observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonSummary {
    pub crop_id: String,
    /// Reference date, `None` when the season has no observations
    pub date: Option<NaiveDate>,
    pub cumulative_gdd: f64,
    pub stage: GrowthStage,
    pub stage_progress: f64,
    /// Cumulative GDD as a fraction of the harvest threshold (0-1)
    pub overall_progress: f64,
}

impl SeasonSummary {
    pub fn no_data(crop_id: impl Into<String>) -> Self {
        Self {
            crop_id: crop_id.into(),
            date: None,
            cumulative_gdd: 0.0,
            stage: GrowthStage::NoData,
            stage_progress: 0.0,
            overall_progress: 0.0,
        }
    }
}
