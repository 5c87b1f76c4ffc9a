//! Scenario transforms on input series.
//!
//! Scenario variation ("double the wind", "add a flat nuclear block",
//! "target 140 TWh/yr of wind") happens here, before a run, as pure
//! operations on columns. The dispatch algorithm stays free of scenario
//! branches.

use crate::domain::{BalanceError, HOURS_PER_YEAR};

/// Multiply every value by `factor`.
pub fn scale_by(series: &mut [f64], factor: f64) {
    for value in series.iter_mut() {
        *value *= factor;
    }
}

/// Add `delta_gw` to every value.
pub fn shift_by(series: &mut [f64], delta_gw: f64) {
    for value in series.iter_mut() {
        *value += delta_gw;
    }
}

/// Clamp negative values to zero. Useful after a downward shift of a
/// generation series.
pub fn clamp_non_negative(series: &mut [f64]) {
    for value in series.iter_mut() {
        if *value < 0.0 {
            *value = 0.0;
        }
    }
}

/// Total energy of a series in TWh (hourly GW values, so GWh summed).
pub fn series_energy_twh(series: &[f64]) -> f64 {
    series.iter().sum::<f64>() / 1000.0
}

/// Mean power of a series in GW.
pub fn mean_power_gw(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.iter().sum::<f64>() / series.len() as f64
}

/// Scale a series so its implied annual energy hits `target_twh_per_year`,
/// preserving its shape. Works on any horizon length: the implied annual
/// energy is the series mean extended over one nominal year. Returns the
/// factor applied.
pub fn scale_to_annual_energy(
    series: &mut [f64],
    target_twh_per_year: f64,
) -> Result<f64, BalanceError> {
    if series.is_empty() {
        return Err(BalanceError::InvalidInput(
            "cannot scale an empty series".to_string(),
        ));
    }
    if !target_twh_per_year.is_finite() || target_twh_per_year < 0.0 {
        return Err(BalanceError::InvalidInput(format!(
            "annual energy target must be finite and non-negative, got {}",
            target_twh_per_year
        )));
    }

    let implied_twh = mean_power_gw(series) * HOURS_PER_YEAR as f64 / 1000.0;
    if implied_twh.abs() < f64::EPSILON {
        return Err(BalanceError::InvalidInput(
            "cannot scale a series with zero energy to a target".to_string(),
        ));
    }

    let factor = target_twh_per_year / implied_twh;
    scale_by(series, factor);
    Ok(factor)
}
