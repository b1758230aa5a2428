//! Season service: input checks, weather acquisition and historical comparison

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use cropstage_shared::{
    comparison_years, daily_envelope, historical_records, is_plausible_observation, season_window,
    validate_coordinates, validate_planting_date, CropTable, DailyEnvelope, DateRange,
    GpsCoordinates, Season, WeatherSeries,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::external::WeatherClient;

/// A request for the status of one growing season
#[derive(Debug, Clone, Validate)]
pub struct SeasonRequest {
    #[validate(length(min = 1))]
    pub crop_id: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate]
    pub coordinates: GpsCoordinates,
    pub planting_date: NaiveDate,
}

/// Season service
#[derive(Clone)]
pub struct SeasonService {
    table: CropTable,
    client: WeatherClient,
    earliest_year: i32,
}

impl SeasonService {
    pub fn new(table: CropTable, client: WeatherClient, earliest_year: i32) -> Self {
        Self {
            table,
            client,
            earliest_year,
        }
    }

    /// Load a custom crop table from JSON, or the built-in one
    pub fn load_table(path: Option<&Path>) -> AppResult<CropTable> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let table = CropTable::from_json_str(&json)?;
                tracing::info!(path = %path.display(), crops = table.len(), "Loaded crop table");
                Ok(table)
            }
            None => Ok(CropTable::builtin()),
        }
    }

    /// Check a request before any weather is fetched
    pub fn validate_request(&self, request: &SeasonRequest, today: NaiveDate) -> AppResult<()> {
        request.validate()?;
        validate_coordinates(&request.coordinates)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validate_planting_date(request.planting_date, today)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.table.resolve(&request.crop_id)?;
        Ok(())
    }

    /// Read observations from a `date,tmin,tmax` CSV file
    pub fn read_weather_csv(path: &Path) -> AppResult<WeatherSeries> {
        let series = WeatherSeries::from_csv_reader(File::open(path)?)?;
        tracing::info!(path = %path.display(), days = series.len(), "Loaded weather CSV");
        Ok(series)
    }

    /// Fetch observations from planting date through `today`
    pub async fn fetch_season_weather(
        &self,
        request: &SeasonRequest,
        today: NaiveDate,
    ) -> AppResult<WeatherSeries> {
        let range = DateRange::new(request.planting_date, today);
        let series = self
            .client
            .fetch_daily_temperatures(request.coordinates, range)
            .await?;
        tracing::info!(days = series.len(), "Fetched season weather");
        Ok(series)
    }

    /// Build the season and derive its GDD series
    pub fn build_season(
        &self,
        request: &SeasonRequest,
        weather: &WeatherSeries,
    ) -> AppResult<Season> {
        let implausible = weather.iter().filter(|obs| !is_plausible_observation(obs)).count();
        if implausible > 0 {
            tracing::warn!(implausible, "Observations with tmin above tmax");
        }

        let mut season = Season::new(
            &self.table,
            &request.crop_id,
            request.planting_date,
            weather,
            request.location.clone(),
        )?;
        season.compute_gdd_series();
        Ok(season)
    }

    /// Mean and spread of past years' cumulative GDD over the same window
    ///
    /// Years where the planting date does not exist are skipped, as are
    /// years with fewer than `window_days` observations.
    pub async fn historical_envelope(
        &self,
        season: &Season,
        coordinates: GpsCoordinates,
        window_days: u32,
        current_year: i32,
    ) -> AppResult<Vec<DailyEnvelope>> {
        if window_days == 0 {
            return Ok(Vec::new());
        }

        let mut seasons = Vec::new();
        for year in comparison_years(self.earliest_year, current_year) {
            let Some(range) = season_window(season.planting_date(), year, window_days) else {
                tracing::warn!(year, "Planting date does not exist in year, skipping");
                continue;
            };
            let series = self.client.fetch_daily_temperatures(coordinates, range).await?;
            tracing::debug!(year, days = series.len(), "Fetched historical season");
            seasons.push((year, series));
        }

        let params = season.params();
        let records = historical_records(
            seasons.iter().map(|(year, series)| (*year, series)),
            window_days as usize,
            params.t_base,
            params.t_upper,
        );
        let envelope = daily_envelope(&records);

        tracing::info!(
            years = seasons.len(),
            days = envelope.len(),
            "Historical comparison computed"
        );
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    use cropstage_shared::{CropParameters, PhenologyError, StageThresholds};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn service() -> SeasonService {
        let mut table = CropTable::empty();
        table.insert(
            "test_crop",
            CropParameters::new(5.0, 30.0, StageThresholds::new(50.0, 100.0, 200.0, 300.0)),
        );
        let client =
            WeatherClient::new("http://127.0.0.1:9".to_string(), Duration::from_secs(1)).unwrap();
        SeasonService::new(table, client, 1979)
    }

    fn request(crop_id: &str, planting: &str) -> SeasonRequest {
        SeasonRequest {
            crop_id: crop_id.to_string(),
            location: "Test Farm".to_string(),
            coordinates: GpsCoordinates::new(41.65, -4.72),
            planting_date: date(planting),
        }
    }

    #[test]
    fn test_validate_request_ok() {
        let service = service();
        assert!(service
            .validate_request(&request("test_crop", "2025-01-01"), date("2025-06-01"))
            .is_ok());
    }

    #[test]
    fn test_validate_request_future_planting() {
        let service = service();
        let err = service
            .validate_request(&request("test_crop", "2025-07-01"), date("2025-06-01"))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_request_bad_coordinates() {
        let service = service();
        let mut req = request("test_crop", "2025-01-01");
        req.coordinates = GpsCoordinates::new(120.0, 0.0);
        assert!(matches!(
            service.validate_request(&req, date("2025-06-01")),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_request_empty_location() {
        let service = service();
        let mut req = request("test_crop", "2025-01-01");
        req.location = String::new();
        assert!(service.validate_request(&req, date("2025-06-01")).is_err());
    }

    #[test]
    fn test_validate_request_unknown_crop() {
        let service = service();
        let err = service
            .validate_request(&request("banana", "2025-01-01"), date("2025-06-01"))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Phenology(PhenologyError::UnknownCrop(ref id)) if id == "banana"
        ));
    }

    #[test]
    fn test_build_season_from_csv() {
        let mut file = std::env::temp_dir();
        file.push(format!("cropstage_weather_{}.csv", std::process::id()));
        {
            let mut f = File::create(&file).unwrap();
            writeln!(f, "date,tmin,tmax").unwrap();
            writeln!(f, "2024-12-31,0.0,40.0").unwrap();
            writeln!(f, "2025-01-02,8.0,18.0").unwrap();
            writeln!(f, "2025-01-01,6.0,16.0").unwrap();
        }

        let weather = SeasonService::read_weather_csv(&file).unwrap();
        std::fs::remove_file(&file).ok();

        let season = service()
            .build_season(&request("test_crop", "2025-01-01"), &weather)
            .unwrap();
        let series = season.gdd_series().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, date("2025-01-01"));
        assert_eq!(series[1].cumulative_gdd, 14.0);
    }

    #[test]
    fn test_load_builtin_table() {
        let table = SeasonService::load_table(None).unwrap();
        assert_eq!(table.len(), 19);
    }

    #[test]
    fn test_load_missing_table_file() {
        let err =
            SeasonService::load_table(Some(Path::new("/nonexistent/crops.json"))).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[tokio::test]
    async fn test_historical_envelope_empty_window() {
        let service = service();
        let season = service
            .build_season(&request("test_crop", "2025-01-01"), &WeatherSeries::default())
            .unwrap();
        let envelope = service
            .historical_envelope(&season, GpsCoordinates::new(0.0, 0.0), 0, 2025)
            .await
            .unwrap();
        assert!(envelope.is_empty());
    }
}
