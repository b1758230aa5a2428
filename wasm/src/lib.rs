//! WebAssembly module for cropstage
//!
//! Provides client-side computation for:
//! - Daily GDD from temperature extremes
//! - Growth stage classification for a crop
//! - Season summaries from JSON observations

use chrono::NaiveDate;
use cropstage_shared::{builtin_table, determine_growing_stage, Season, StageProgress};
use serde_json::Value;
use wasm_bindgen::prelude::*;

/// Daily GDD from the mean of `tmin` and `tmax`
///
/// The mean is clamped to `[t_base, t_upper]` before `t_base` is subtracted;
/// the individual readings are not clipped.
#[wasm_bindgen(js_name = compute_daily_gdd)]
pub fn daily_gdd(tmin: f64, tmax: f64, t_base: f64, t_upper: f64) -> f64 {
    cropstage_shared::compute_daily_gdd(tmin, tmax, t_base, t_upper)
}

/// Classify cumulative GDD for a built-in crop
///
/// Returns `{"stage": ..., "progress": ...}` as JSON.
#[wasm_bindgen]
pub fn classify_growth_stage(crop_id: &str, cumulative_gdd: f64) -> Result<String, JsValue> {
    classify(crop_id, cumulative_gdd).map_err(|e| JsValue::from_str(&e))
}

/// Season summary for a built-in crop
///
/// `observations_json` is an array of `{date, tmin, tmax}` records; the
/// result is the summary serialized as JSON.
#[wasm_bindgen]
pub fn season_summary(
    crop_id: &str,
    planting_date: &str,
    observations_json: &str,
) -> Result<String, JsValue> {
    summarize(crop_id, planting_date, observations_json).map_err(|e| JsValue::from_str(&e))
}

/// Identifiers of the built-in crops
#[wasm_bindgen]
pub fn list_crops() -> js_sys::Array {
    builtin_table().ids().map(JsValue::from_str).collect()
}

fn classify(crop_id: &str, cumulative_gdd: f64) -> Result<String, String> {
    let params = builtin_table().resolve(crop_id).map_err(|e| e.to_string())?;
    let result: StageProgress = determine_growing_stage(cumulative_gdd, &params.stages);
    serde_json::to_string(&result).map_err(|e| e.to_string())
}

fn summarize(
    crop_id: &str,
    planting_date: &str,
    observations_json: &str,
) -> Result<String, String> {
    let planting_date = NaiveDate::parse_from_str(planting_date, "%Y-%m-%d")
        .map_err(|e| format!("Invalid planting date '{}': {}", planting_date, e))?;
    let observations: Value = serde_json::from_str(observations_json)
        .map_err(|e| format!("Invalid observations JSON: {}", e))?;

    let mut season = Season::from_json(builtin_table(), crop_id, planting_date, &observations, "")
        .map_err(|e| e.to_string())?;
    serde_json::to_string(&season.summary_today()).map_err(|e| e.to_string())
}
