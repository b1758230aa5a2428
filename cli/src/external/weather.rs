//! Weather archive client for fetching daily temperatures
//!
//! Integrates with the Open-Meteo historical archive API

use std::time::Duration;

use chrono::NaiveDate;
use cropstage_shared::{DailyObservation, DateRange, GpsCoordinates, WeatherSeries};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Open-Meteo archive client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

/// Open-Meteo archive response
#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    daily: Option<ArchiveDaily>,
}

#[derive(Debug, Default, Deserialize)]
struct ArchiveDaily {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
}

impl WeatherClient {
    /// Create a new WeatherClient against `base_url`
    pub fn new(base_url: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::WeatherService(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Fetch daily minimum and maximum temperatures for a date range
    pub async fn fetch_daily_temperatures(
        &self,
        coordinates: GpsCoordinates,
        range: DateRange,
    ) -> AppResult<WeatherSeries> {
        let start_date = range.start.format("%Y-%m-%d").to_string();
        let end_date = range.end.format("%Y-%m-%d").to_string();
        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();

        tracing::debug!(%start_date, %end_date, "Requesting Open-Meteo archive");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("start_date", start_date.as_str()),
                ("end_date", end_date.as_str()),
                ("daily", "temperature_2m_min,temperature_2m_max"),
                ("timezone", "auto"),
            ])
            .send()
            .await
            .map_err(|e| AppError::WeatherService(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherService(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: ArchiveResponse = response.json().await.map_err(|e| {
            AppError::WeatherService(format!("Failed to parse weather response: {}", e))
        })?;

        convert_archive_response(data)
    }
}

/// Convert the archive's parallel daily arrays to a weather series
///
/// Days with a missing temperature are dropped, not interpolated.
fn convert_archive_response(data: ArchiveResponse) -> AppResult<WeatherSeries> {
    let daily = data.daily.unwrap_or_default();

    if daily.time.len() != daily.temperature_2m_min.len()
        || daily.time.len() != daily.temperature_2m_max.len()
    {
        return Err(AppError::WeatherService(
            "Open-Meteo response arrays have different lengths.".to_string(),
        ));
    }

    let mut series = WeatherSeries::default();
    for ((time, tmin), tmax) in daily
        .time
        .iter()
        .zip(daily.temperature_2m_min)
        .zip(daily.temperature_2m_max)
    {
        let date = NaiveDate::parse_from_str(time, "%Y-%m-%d").map_err(|e| {
            AppError::WeatherService(format!("Invalid date in weather response '{}': {}", time, e))
        })?;

        match (tmin, tmax) {
            (Some(tmin), Some(tmax)) => series.push(DailyObservation::new(date, tmin, tmax)),
            _ => tracing::warn!(%date, "Dropping day with missing temperature"),
        }
    }

    Ok(series)
}
