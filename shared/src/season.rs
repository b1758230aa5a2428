//! Season aggregation
//!
//! A season binds a crop, a planting date and a location to the weather
//! observed since planting. The GDD series is derived on first use and kept
//! on the season afterwards.

use chrono::NaiveDate;
use serde_json::Value;

use crate::crops::CropTable;
use crate::error::PhenologyResult;
use crate::gdd::{compute_daily_gdd, determine_growing_stage, unit_fraction, upper_bound_curve};
use crate::models::{
    CropParameters, DailyObservation, GddRecord, SeasonSummary, StageReport, WeatherSeries,
};

/// Lifecycle of a season's derived GDD series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonState {
    /// Observations retained, GDD not computed yet
    Constructed,
    /// Daily and cumulative GDD attached to every observation
    Derived,
}

/// One crop's growing season at one location
#[derive(Debug, Clone)]
pub struct Season {
    crop_id: String,
    location: String,
    planting_date: NaiveDate,
    params: CropParameters,
    observations: Vec<DailyObservation>,
    gdd_series: Option<Vec<GddRecord>>,
}

impl Season {
    /// Create a season from observations on or after `planting_date`
    ///
    /// Retained observations are sorted by date; observations sharing a date
    /// keep their input order. The caller's series is left untouched.
    pub fn new(
        table: &CropTable,
        crop_id: &str,
        planting_date: NaiveDate,
        weather: &WeatherSeries,
        location: impl Into<String>,
    ) -> PhenologyResult<Self> {
        let params = *table.resolve(crop_id)?;

        let mut observations: Vec<DailyObservation> = weather
            .iter()
            .filter(|obs| obs.date >= planting_date)
            .copied()
            .collect();
        observations.sort_by_key(|obs| obs.date);

        tracing::debug!(
            crop_id,
            %planting_date,
            supplied = weather.len(),
            retained = observations.len(),
            "Season constructed"
        );

        Ok(Self {
            crop_id: crop_id.to_string(),
            location: location.into(),
            planting_date,
            params,
            observations,
            gdd_series: None,
        })
    }

    /// Create a season from untyped tabular JSON
    ///
    /// The crop is resolved before the weather is inspected, so an unknown
    /// crop wins over a malformed table.
    pub fn from_json(
        table: &CropTable,
        crop_id: &str,
        planting_date: NaiveDate,
        weather: &Value,
        location: impl Into<String>,
    ) -> PhenologyResult<Self> {
        table.resolve(crop_id)?;
        let series = WeatherSeries::from_json(weather)?;
        Self::new(table, crop_id, planting_date, &series, location)
    }

    /// Attach daily and running cumulative GDD to every retained observation
    ///
    /// Calling again recomputes and replaces the previous series.
    pub fn compute_gdd_series(&mut self) -> &[GddRecord] {
        let CropParameters {
            t_base, t_upper, ..
        } = self.params;

        let mut cumulative_gdd = 0.0;
        let series: Vec<GddRecord> = self
            .observations
            .iter()
            .map(|obs| {
                let daily_gdd = compute_daily_gdd(obs.tmin, obs.tmax, t_base, t_upper);
                cumulative_gdd += daily_gdd;
                GddRecord {
                    date: obs.date,
                    tmin: obs.tmin,
                    tmax: obs.tmax,
                    daily_gdd,
                    cumulative_gdd,
                }
            })
            .collect();

        tracing::debug!(
            crop_id = %self.crop_id,
            days = series.len(),
            cumulative_gdd,
            "GDD series computed"
        );

        self.gdd_series.insert(series)
    }

    /// Stage as of `target_date`, from the latest observation on or before it
    pub fn stage_on_date(&mut self, target_date: NaiveDate) -> StageReport {
        let stages = self.params.stages;
        let series = self.derived_series();

        let idx = series.partition_point(|record| record.date <= target_date);
        if idx == 0 {
            return StageReport::pre_planting();
        }

        let cumulative_gdd = series[idx - 1].cumulative_gdd;
        let located = determine_growing_stage(cumulative_gdd, &stages);
        StageReport {
            stage: located.stage,
            progress: located.progress,
            cumulative_gdd,
        }
    }

    /// Summary as of the most recent retained observation
    pub fn summary_today(&mut self) -> SeasonSummary {
        let Some(last_date) = self.observations.last().map(|obs| obs.date) else {
            return SeasonSummary::no_data(self.crop_id.clone());
        };

        let report = self.stage_on_date(last_date);

        let harvest_gdd = self.params.stages.harvest;
        let overall_progress = if harvest_gdd == 0.0 {
            1.0
        } else {
            unit_fraction(report.cumulative_gdd / harvest_gdd)
        };

        SeasonSummary {
            crop_id: self.crop_id.clone(),
            date: Some(last_date),
            cumulative_gdd: report.cumulative_gdd,
            stage: report.stage,
            stage_progress: report.progress,
            overall_progress,
        }
    }

    pub fn state(&self) -> SeasonState {
        if self.gdd_series.is_some() {
            SeasonState::Derived
        } else {
            SeasonState::Constructed
        }
    }

    /// Derived series, `None` until computed
    pub fn gdd_series(&self) -> Option<&[GddRecord]> {
        self.gdd_series.as_deref()
    }

    /// Ideal cumulative GDD for each retained day
    pub fn ideal_curve(&self) -> Vec<f64> {
        upper_bound_curve(self.observations.len(), self.params.max_daily_gdd())
    }

    pub fn observations(&self) -> &[DailyObservation] {
        &self.observations
    }

    pub fn crop_id(&self) -> &str {
        &self.crop_id
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn planting_date(&self) -> NaiveDate {
        self.planting_date
    }

    pub fn params(&self) -> &CropParameters {
        &self.params
    }

    fn derived_series(&mut self) -> &[GddRecord] {
        if self.gdd_series.is_none() {
            self.compute_gdd_series();
        }
        self.gdd_series.as_deref().unwrap_or_default()
    }
}
