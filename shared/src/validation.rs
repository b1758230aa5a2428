//! Validation utilities for crop phenology inputs
//!
//! The GDD engine itself never rejects input; these checks guard the edges
//! where crop tables and user input enter the system.

use chrono::NaiveDate;
use validator::Validate;

use crate::models::{CropParameters, DailyObservation, StageThresholds};
use crate::types::GpsCoordinates;

// ============================================================================
// Crop Parameter Validations
// ============================================================================

/// Validate that stage thresholds are cumulative and non-decreasing
pub fn validate_stage_order(stages: &StageThresholds) -> Result<(), &'static str> {
    if stages.initial.is_nan() || stages.initial < 0.0 {
        return Err("Stage thresholds cannot be negative");
    }
    if !stages.is_ordered() {
        return Err("Stage thresholds must be non-decreasing from initial to harvest");
    }
    Ok(())
}

/// Validate base/upper temperatures and stage thresholds of a crop
pub fn validate_crop_parameters(params: &CropParameters) -> Result<(), &'static str> {
    if !params.t_base.is_finite() || !params.t_upper.is_finite() {
        return Err("Base and upper temperatures must be finite");
    }
    if params.t_upper < params.t_base {
        return Err("Upper temperature must not be below base temperature");
    }
    validate_stage_order(&params.stages)
}

// ============================================================================
// Season Input Validations
// ============================================================================

/// Validate latitude and longitude ranges
pub fn validate_coordinates(coordinates: &GpsCoordinates) -> Result<(), &'static str> {
    if coordinates.latitude.is_nan() || coordinates.longitude.is_nan() {
        return Err("Coordinates must be numbers");
    }
    coordinates
        .validate()
        .map_err(|_| "Latitude must be within [-90, 90] and longitude within [-180, 180]")
}

/// Validate that the planting date is not after `today`
pub fn validate_planting_date(
    planting_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), &'static str> {
    if planting_date > today {
        return Err("Planting date cannot be in the future");
    }
    Ok(())
}

/// Check that an observation's minimum does not exceed its maximum
///
/// Advisory only: the GDD engine accepts swapped extremes.
pub fn is_plausible_observation(observation: &DailyObservation) -> bool {
    observation.tmin <= observation.tmax
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_validate_stage_order_valid() {
        assert!(validate_stage_order(&StageThresholds::new(100.0, 200.0, 300.0, 400.0)).is_ok());
        assert!(validate_stage_order(&StageThresholds::new(0.0, 0.0, 0.0, 0.0)).is_ok());
    }

    #[test]
    fn test_validate_stage_order_invalid() {
        assert!(validate_stage_order(&StageThresholds::new(200.0, 100.0, 300.0, 400.0)).is_err());
        assert!(validate_stage_order(&StageThresholds::new(100.0, 200.0, 300.0, 250.0)).is_err());
        assert!(validate_stage_order(&StageThresholds::new(-1.0, 200.0, 300.0, 400.0)).is_err());
    }

    #[test]
    fn test_validate_crop_parameters() {
        let stages = StageThresholds::new(100.0, 200.0, 300.0, 400.0);
        assert!(validate_crop_parameters(&CropParameters::new(10.0, 30.0, stages)).is_ok());
        assert!(validate_crop_parameters(&CropParameters::new(10.0, 10.0, stages)).is_ok());
        assert!(validate_crop_parameters(&CropParameters::new(30.0, 10.0, stages)).is_err());
        assert_eq!(
            validate_crop_parameters(&CropParameters::new(f64::NAN, 30.0, stages)),
            Err("Base and upper temperatures must be finite")
        );
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(&GpsCoordinates::new(52.37, 4.90)).is_ok());
        assert!(validate_coordinates(&GpsCoordinates::new(120.0, 4.90)).is_err());
        assert!(validate_coordinates(&GpsCoordinates::new(f64::NAN, 4.90)).is_err());
    }

    #[test]
    fn test_validate_planting_date() {
        let today = date("2025-06-01");
        assert!(validate_planting_date(date("2025-03-15"), today).is_ok());
        assert!(validate_planting_date(today, today).is_ok());
        assert!(validate_planting_date(date("2025-06-02"), today).is_err());
    }

    #[test]
    fn test_plausible_observation() {
        assert!(is_plausible_observation(&DailyObservation::new(date("2025-01-01"), 5.0, 15.0)));
        assert!(!is_plausible_observation(&DailyObservation::new(date("2025-01-01"), 15.0, 5.0)));
    }
}
