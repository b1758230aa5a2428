//! Reporting service for textual results and CSV exports

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use cropstage_shared::{CropTable, Season, SeasonSummary, StageReport};
use serde::Serialize;

use crate::error::AppResult;

/// One exported day of the current season
#[derive(Debug, Clone, Serialize)]
pub struct SeriesRow {
    pub day: usize,
    pub date: NaiveDate,
    pub tmin: f64,
    pub tmax: f64,
    pub daily_gdd: f64,
    pub cumulative_gdd: f64,
    pub ideal_gdd: f64,
}

/// Reporting service
pub struct ReportService;

impl ReportService {
    /// Results block for a season summary
    pub fn render_summary(summary: &SeasonSummary, location: &str) -> String {
        let date = summary
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "None".to_string());

        let mut out = String::new();
        let _ = writeln!(out, "=== Results ===");
        let _ = writeln!(out, "Current Date    : {}", date);
        let _ = writeln!(out, "Crop            : {}", summary.crop_id);
        let _ = writeln!(out, "Location        : {}", location);
        let _ = writeln!(out, "Cumulative GDD  : {:.2}", summary.cumulative_gdd);
        let _ = writeln!(out, "Stage           : {}", summary.stage);
        let _ = writeln!(out, "Stage progress  : {:.2}%", summary.stage_progress * 100.0);
        let _ = writeln!(out, "Overall progress: {:.2}%", summary.overall_progress * 100.0);
        out
    }

    /// One-line stage report for a specific date
    pub fn render_stage_report(date: NaiveDate, report: &StageReport) -> String {
        format!(
            "Stage on {}: {} ({:.2}% of stage, {:.2} GDD)",
            date.format("%Y-%m-%d"),
            report.stage,
            report.progress * 100.0,
            report.cumulative_gdd
        )
    }

    /// Listing of every crop in a table
    pub fn render_crop_table(table: &CropTable) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<20} {:>6} {:>7} {:>8} {:>11} {:>10} {:>8}",
            "crop_id", "t_base", "t_upper", "initial", "development", "mid_season", "harvest"
        );
        for (crop_id, params) in table.iter() {
            let _ = writeln!(
                out,
                "{:<20} {:>6.1} {:>7.1} {:>8.0} {:>11.0} {:>10.0} {:>8.0}",
                crop_id,
                params.t_base,
                params.t_upper,
                params.stages.initial,
                params.stages.development,
                params.stages.mid_season,
                params.stages.harvest
            );
        }
        out
    }

    /// Rows for the current season, one per retained day
    ///
    /// Empty until the season's GDD series has been derived.
    pub fn series_rows(season: &Season) -> Vec<SeriesRow> {
        let ideal = season.ideal_curve();
        season
            .gdd_series()
            .unwrap_or_default()
            .iter()
            .zip(ideal)
            .enumerate()
            .map(|(i, (record, ideal_gdd))| SeriesRow {
                day: i + 1,
                date: record.date,
                tmin: record.tmin,
                tmax: record.tmax,
                daily_gdd: record.daily_gdd,
                cumulative_gdd: record.cumulative_gdd,
                ideal_gdd,
            })
            .collect()
    }

    /// Export file name: `{today}_{crop_id}_{location}` with spaces replaced
    pub fn export_file_name(
        today: NaiveDate,
        crop_id: &str,
        location: &str,
        suffix: &str,
    ) -> String {
        format!(
            "{}_{}_{}{}.csv",
            today.format("%Y-%m-%d"),
            crop_id,
            location.replace(' ', "_"),
            suffix
        )
    }

    /// Export data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }

    /// Write CSV data into `dir`, creating it when missing
    pub fn write_csv<T: Serialize>(dir: &Path, file_name: &str, data: &[T]) -> AppResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(file_name);
        std::fs::write(&path, Self::export_to_csv(data)?)?;
        tracing::info!(path = %path.display(), rows = data.len(), "Saved CSV export");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropstage_shared::{
        CropParameters, DailyEnvelope, DailyObservation, GrowthStage, StageThresholds,
        WeatherSeries,
    };

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_season() -> Season {
        let mut table = CropTable::empty();
        table.insert(
            "test_crop",
            CropParameters::new(5.0, 30.0, StageThresholds::new(50.0, 100.0, 200.0, 300.0)),
        );
        let weather = WeatherSeries::new(vec![
            DailyObservation::new(date("2025-01-01"), 6.0, 16.0),
            DailyObservation::new(date("2025-01-02"), 8.0, 18.0),
        ]);
        Season::new(&table, "test_crop", date("2025-01-01"), &weather, "Test Farm").unwrap()
    }

    #[test]
    fn test_render_summary() {
        let summary = SeasonSummary {
            crop_id: "carrot_common".to_string(),
            date: Some(date("2025-06-01")),
            cumulative_gdd: 512.345,
            stage: GrowthStage::Development,
            stage_progress: 0.4136,
            overall_progress: 0.3253,
        };

        let text = ReportService::render_summary(&summary, "Valladolid");
        assert!(text.contains("Current Date    : 2025-06-01"));
        assert!(text.contains("Location        : Valladolid"));
        assert!(text.contains("Cumulative GDD  : 512.35"));
        assert!(text.contains("Stage           : development"));
        assert!(text.contains("Stage progress  : 41.36%"));
        assert!(text.contains("Overall progress: 32.53%"));
    }

    #[test]
    fn test_render_summary_no_data() {
        let text = ReportService::render_summary(&SeasonSummary::no_data("carrot_common"), "X");
        assert!(text.contains("Current Date    : None"));
        assert!(text.contains("Stage           : no_data"));
    }

    #[test]
    fn test_render_stage_report() {
        let report = StageReport {
            stage: GrowthStage::MidSeason,
            progress: 0.5,
            cumulative_gdd: 250.0,
        };
        assert_eq!(
            ReportService::render_stage_report(date("2025-05-01"), &report),
            "Stage on 2025-05-01: mid_season (50.00% of stage, 250.00 GDD)"
        );
    }

    #[test]
    fn test_render_crop_table_lists_all() {
        let table = CropTable::builtin();
        let text = ReportService::render_crop_table(&table);
        assert_eq!(text.lines().count(), table.len() + 1);
        assert!(text.contains("maize_grain_long"));
    }

    #[test]
    fn test_series_rows() {
        let mut season = sample_season();
        assert!(ReportService::series_rows(&season).is_empty());

        season.compute_gdd_series();
        let rows = ReportService::series_rows(&season);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].day, 2);
        assert_eq!(rows[1].cumulative_gdd, 14.0);
        assert_eq!(rows[1].ideal_gdd, 50.0);
    }

    #[test]
    fn test_export_to_csv() {
        let mut season = sample_season();
        season.compute_gdd_series();
        let csv = ReportService::export_to_csv(&ReportService::series_rows(&season)).unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("day,date,tmin,tmax,daily_gdd,cumulative_gdd,ideal_gdd")
        );
        assert_eq!(lines.next(), Some("1,2025-01-01,6.0,16.0,6.0,6.0,25.0"));
    }

    #[test]
    fn test_export_envelope_csv() {
        let envelope = vec![DailyEnvelope {
            day: 1,
            mean: 5.0,
            std_dev: None,
            years: 1,
        }];
        let csv = ReportService::export_to_csv(&envelope).unwrap();
        assert_eq!(csv, "day,mean,std_dev,years\n1,5.0,,1\n");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            ReportService::export_file_name(date("2025-06-01"), "carrot_common", "Test Farm", ""),
            "2025-06-01_carrot_common_Test_Farm.csv"
        );
        assert_eq!(
            ReportService::export_file_name(date("2025-06-01"), "carrot_common", "X", "_history"),
            "2025-06-01_carrot_common_X_history.csv"
        );
    }
}
