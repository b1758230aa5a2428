//! Weather observation models

use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PhenologyError, PhenologyResult};

/// Column names of the tabular weather contract
pub const DATE_COLUMN: &str = "date";
pub const TMIN_COLUMN: &str = "tmin";
pub const TMAX_COLUMN: &str = "tmax";

/// Daily minimum and maximum temperature for one calendar date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyObservation {
    pub date: NaiveDate,
    /// Minimum temperature [°C]
    pub tmin: f64,
    /// Maximum temperature [°C]
    pub tmax: f64,
}

impl DailyObservation {
    pub fn new(date: NaiveDate, tmin: f64, tmax: f64) -> Self {
        Self { date, tmin, tmax }
    }
}

/// An observation with its derived GDD columns attached
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GddRecord {
    pub date: NaiveDate,
    pub tmin: f64,
    pub tmax: f64,
    pub daily_gdd: f64,
    pub cumulative_gdd: f64,
}

/// Sequence of daily observations as supplied by a weather source
///
/// The series is kept in the order it was supplied; seasons filter and sort
/// their own copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WeatherSeries {
    observations: Vec<DailyObservation>,
}

impl WeatherSeries {
    pub fn new(observations: Vec<DailyObservation>) -> Self {
        Self { observations }
    }

    /// Build a series from parallel date/tmin/tmax columns
    ///
    /// Temperatures must be finite.
    pub fn from_columns(
        dates: &[NaiveDate],
        tmins: &[f64],
        tmaxs: &[f64],
    ) -> PhenologyResult<Self> {
        if dates.len() != tmins.len() || dates.len() != tmaxs.len() {
            return Err(PhenologyError::WrongInputType(format!(
                "column lengths differ (date: {}, tmin: {}, tmax: {})",
                dates.len(),
                tmins.len(),
                tmaxs.len()
            )));
        }

        let observations = dates
            .iter()
            .zip(tmins.iter().zip(tmaxs.iter()))
            .enumerate()
            .map(|(i, (&date, (&tmin, &tmax)))| {
                finite_observation(i, DailyObservation::new(date, tmin, tmax))
            })
            .collect::<PhenologyResult<Vec<_>>>()?;

        Ok(Self { observations })
    }

    /// Build a series from untyped tabular JSON
    ///
    /// Accepts either an array of `{date, tmin, tmax}` records or an object
    /// of equally long `date`, `tmin` and `tmax` column arrays.
    pub fn from_json(value: &Value) -> PhenologyResult<Self> {
        match value {
            Value::Array(rows) => rows
                .iter()
                .enumerate()
                .map(|(i, row)| observation_from_record(i, row))
                .collect::<PhenologyResult<Vec<_>>>()
                .map(Self::new),
            Value::Object(columns) => {
                let dates = column(columns, DATE_COLUMN)?
                    .iter()
                    .enumerate()
                    .map(|(i, v)| parse_date(v).ok_or_else(|| cell_error(i, DATE_COLUMN)))
                    .collect::<PhenologyResult<Vec<_>>>()?;
                let tmins = numeric_column(columns, TMIN_COLUMN)?;
                let tmaxs = numeric_column(columns, TMAX_COLUMN)?;
                Self::from_columns(&dates, &tmins, &tmaxs)
            }
            other => Err(PhenologyError::WrongInputType(format!(
                "expected a table of observations, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Read a CSV table with `date`, `tmin` and `tmax` headers
    ///
    /// Surrounding whitespace in header names is ignored. Cells such as
    /// `NaN` or `inf` are rejected.
    pub fn from_csv_reader<R: Read>(reader: R) -> PhenologyResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| PhenologyError::WrongInputType(format!("unreadable CSV header: {}", e)))?;
        for required in [DATE_COLUMN, TMIN_COLUMN, TMAX_COLUMN] {
            if !headers.iter().any(|h| h == required) {
                return Err(PhenologyError::WrongInputType(format!(
                    "missing column: {}",
                    required
                )));
            }
        }

        let observations = rdr
            .deserialize::<DailyObservation>()
            .enumerate()
            .map(|(i, row)| {
                let observation = row.map_err(|e| {
                    PhenologyError::WrongInputType(format!("row {}: {}", i + 1, e))
                })?;
                finite_observation(i + 1, observation)
            })
            .collect::<PhenologyResult<Vec<_>>>()?;

        Ok(Self { observations })
    }

    pub fn observations(&self) -> &[DailyObservation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailyObservation> {
        self.observations.iter()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn push(&mut self, observation: DailyObservation) {
        self.observations.push(observation);
    }
}

impl FromIterator<DailyObservation> for WeatherSeries {
    fn from_iter<I: IntoIterator<Item = DailyObservation>>(iter: I) -> Self {
        Self {
            observations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a WeatherSeries {
    type Item = &'a DailyObservation;
    type IntoIter = std::slice::Iter<'a, DailyObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

fn observation_from_record(index: usize, row: &Value) -> PhenologyResult<DailyObservation> {
    let record = row.as_object().ok_or_else(|| {
        PhenologyError::WrongInputType(format!(
            "row {} is {}, expected a record",
            index,
            json_kind(row)
        ))
    })?;

    let date = record
        .get(DATE_COLUMN)
        .and_then(parse_date)
        .ok_or_else(|| cell_error(index, DATE_COLUMN))?;
    let tmin = record
        .get(TMIN_COLUMN)
        .and_then(Value::as_f64)
        .ok_or_else(|| cell_error(index, TMIN_COLUMN))?;
    let tmax = record
        .get(TMAX_COLUMN)
        .and_then(Value::as_f64)
        .ok_or_else(|| cell_error(index, TMAX_COLUMN))?;

    finite_observation(index, DailyObservation::new(date, tmin, tmax))
}

fn finite_observation(
    index: usize,
    observation: DailyObservation,
) -> PhenologyResult<DailyObservation> {
    for (name, value) in [(TMIN_COLUMN, observation.tmin), (TMAX_COLUMN, observation.tmax)] {
        if !value.is_finite() {
            return Err(PhenologyError::WrongInputType(format!(
                "row {}: {} is not a finite number",
                index, name
            )));
        }
    }
    Ok(observation)
}

fn column<'a>(
    columns: &'a serde_json::Map<String, Value>,
    name: &str,
) -> PhenologyResult<&'a Vec<Value>> {
    columns
        .get(name)
        .and_then(Value::as_array)
        .ok_or_else(|| PhenologyError::WrongInputType(format!("missing column: {}", name)))
}

fn numeric_column(
    columns: &serde_json::Map<String, Value>,
    name: &str,
) -> PhenologyResult<Vec<f64>> {
    column(columns, name)?
        .iter()
        .enumerate()
        .map(|(i, v)| v.as_f64().ok_or_else(|| cell_error(i, name)))
        .collect()
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    value
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok())
}

fn cell_error(index: usize, name: &str) -> PhenologyError {
    PhenologyError::WrongInputType(format!("row {}: missing or invalid {}", index, name))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
