//! Growing Degree Day engine
//!
//! Turns daily temperature extremes into thermal time and maps cumulative
//! thermal time onto phenological stages. Everything here is pure.

use crate::models::{GrowthStage, StageProgress, StageThresholds};

/// Daily GDD from the mean of `tmin` and `tmax`
///
/// Nothing accrues below `t_base`; above `t_upper` the contribution
/// saturates at `t_upper - t_base`.
pub fn compute_daily_gdd(tmin: f64, tmax: f64, t_base: f64, t_upper: f64) -> f64 {
    let t_avg = (tmin + tmax) / 2.0;

    if t_avg < t_base {
        return 0.0;
    }
    if t_avg > t_upper {
        return t_upper - t_base;
    }
    t_avg - t_base
}

/// Classify a cumulative GDD value against stage thresholds
///
/// A value equal to a threshold belongs to the stage that threshold ends.
/// Values beyond harvest fall into `post_harvest`, a zero-width interval.
pub fn determine_growing_stage(cumulative_gdd: f64, stages: &StageThresholds) -> StageProgress {
    let mut stage_start = 0.0;

    for (stage, stage_end) in stages.ordered() {
        if cumulative_gdd <= stage_end {
            return StageProgress {
                stage,
                progress: interval_progress(cumulative_gdd, stage_start, stage_end),
            };
        }
        stage_start = stage_end;
    }

    StageProgress {
        stage: GrowthStage::PostHarvest,
        progress: interval_progress(cumulative_gdd, stages.harvest, stages.harvest),
    }
}

fn interval_progress(value: f64, start: f64, end: f64) -> f64 {
    if start == end {
        return 1.0;
    }
    unit_fraction((value - start) / (end - start))
}

/// Clamp a fraction to `[0, 1]`, mapping NaN to 1.0
pub(crate) fn unit_fraction(value: f64) -> f64 {
    value.min(1.0).max(0.0)
}

/// Running sum of daily GDD values
pub fn accumulate(daily: &[f64]) -> Vec<f64> {
    daily
        .iter()
        .scan(0.0, |total, gdd| {
            *total += gdd;
            Some(*total)
        })
        .collect()
}

/// Cumulative GDD if every day contributed `max_daily_gdd`
pub fn upper_bound_curve(window_days: usize, max_daily_gdd: f64) -> Vec<f64> {
    (1..=window_days).map(|day| max_daily_gdd * day as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_stages() -> StageThresholds {
        StageThresholds::new(100.0, 200.0, 300.0, 400.0)
    }

    // ========================================================================
    // Daily GDD
    // ========================================================================

    #[test]
    fn test_daily_gdd_below_base() {
        assert_eq!(compute_daily_gdd(5.0, 7.0, 10.0, 30.0), 0.0);
    }

    #[test]
    fn test_daily_gdd_between_thresholds() {
        assert_eq!(compute_daily_gdd(10.0, 20.0, 10.0, 30.0), 5.0);
    }

    #[test]
    fn test_daily_gdd_above_upper() {
        assert_eq!(compute_daily_gdd(40.0, 42.0, 10.0, 30.0), 20.0);
    }

    #[test]
    fn test_daily_gdd_at_thresholds() {
        assert_eq!(compute_daily_gdd(8.0, 12.0, 10.0, 30.0), 0.0);
        assert_eq!(compute_daily_gdd(25.0, 35.0, 10.0, 30.0), 20.0);
    }

    #[test]
    fn test_daily_gdd_accepts_swapped_extremes() {
        assert_eq!(
            compute_daily_gdd(20.0, 10.0, 10.0, 30.0),
            compute_daily_gdd(10.0, 20.0, 10.0, 30.0)
        );
    }

    // ========================================================================
    // Stage classification
    // ========================================================================

    #[test]
    fn test_stage_in_each_interval() {
        let stages = reference_stages();
        let cases = [
            (50.0, GrowthStage::Initial, 0.5),
            (150.0, GrowthStage::Development, 0.5),
            (250.0, GrowthStage::MidSeason, 0.5),
            (375.0, GrowthStage::Harvest, 0.75),
        ];
        for (gdd, stage, progress) in cases {
            let result = determine_growing_stage(gdd, &stages);
            assert_eq!(result.stage, stage);
            assert_relative_eq!(result.progress, progress);
        }
    }

    #[test]
    fn test_stage_post_harvest() {
        let result = determine_growing_stage(450.0, &reference_stages());
        assert_eq!(result.stage, GrowthStage::PostHarvest);
        assert_eq!(result.progress, 1.0);
    }

    #[test]
    fn test_threshold_belongs_to_earlier_stage() {
        let stages = reference_stages();

        let result = determine_growing_stage(100.0, &stages);
        assert_eq!(result.stage, GrowthStage::Initial);
        assert_eq!(result.progress, 1.0);

        let result = determine_growing_stage(400.0, &stages);
        assert_eq!(result.stage, GrowthStage::Harvest);
        assert_eq!(result.progress, 1.0);
    }

    #[test]
    fn test_zero_gdd_starts_initial() {
        let result = determine_growing_stage(0.0, &reference_stages());
        assert_eq!(result.stage, GrowthStage::Initial);
        assert_eq!(result.progress, 0.0);
    }

    #[test]
    fn test_duplicated_threshold_is_skipped() {
        // development ends where initial ends, so it can never be entered
        let stages = StageThresholds::new(100.0, 100.0, 300.0, 400.0);
        let result = determine_growing_stage(100.0, &stages);
        assert_eq!(result.stage, GrowthStage::Initial);

        let result = determine_growing_stage(150.0, &stages);
        assert_eq!(result.stage, GrowthStage::MidSeason);
        assert_relative_eq!(result.progress, 0.25);
    }

    #[test]
    fn test_zero_width_initial_interval() {
        let stages = StageThresholds::new(0.0, 100.0, 200.0, 300.0);
        let result = determine_growing_stage(0.0, &stages);
        assert_eq!(result.stage, GrowthStage::Initial);
        assert_eq!(result.progress, 1.0);
    }

    #[test]
    fn test_negative_gdd_is_clamped() {
        let result = determine_growing_stage(-25.0, &reference_stages());
        assert_eq!(result.stage, GrowthStage::Initial);
        assert_eq!(result.progress, 0.0);
    }

    #[test]
    fn test_infinite_thresholds_keep_progress_in_range() {
        let stages = StageThresholds::new(100.0, f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let result = determine_growing_stage(f64::INFINITY, &stages);
        assert_eq!(result.stage, GrowthStage::Development);
        assert_eq!(result.progress, 1.0);
    }

    #[test]
    fn test_nan_gdd_is_post_harvest() {
        let result = determine_growing_stage(f64::NAN, &reference_stages());
        assert_eq!(result.stage, GrowthStage::PostHarvest);
        assert_eq!(result.progress, 1.0);
    }

    #[test]
    fn test_unit_fraction() {
        assert_eq!(unit_fraction(0.25), 0.25);
        assert_eq!(unit_fraction(-3.0), 0.0);
        assert_eq!(unit_fraction(7.0), 1.0);
        assert_eq!(unit_fraction(f64::NAN), 1.0);
    }

    // ========================================================================
    // Series helpers
    // ========================================================================

    #[test]
    fn test_accumulate() {
        assert_eq!(accumulate(&[5.0, 0.0, 2.5]), vec![5.0, 5.0, 7.5]);
        assert!(accumulate(&[]).is_empty());
    }

    #[test]
    fn test_upper_bound_curve() {
        assert_eq!(upper_bound_curve(3, 20.0), vec![20.0, 40.0, 60.0]);
        assert!(upper_bound_curve(0, 20.0).is_empty());
    }
}
