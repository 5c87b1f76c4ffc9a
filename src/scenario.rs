//! Scenario assembly.
//!
//! Turns a [`Config`] into a ready-to-run [`Simulation`]: generates the
//! input series from the configured profiles, applies the scenario
//! transforms, and constructs the storage models. Scenario variants are
//! plain config edits; everything downstream of here is deterministic
//! given the series and parameters.

use tracing::info;

use crate::config::Config;
use crate::dispatch::{HydroReservoir, HydrogenFlex};
use crate::domain::{BalanceError, HOURS_PER_YEAR};
use crate::series::{transform, SeriesStore};
use crate::simulation::{inflow_profile, SeasonalProfile, Simulation};

/// Generate the hourly input series a config describes.
pub fn build_series(config: &Config) -> Result<SeriesStore, BalanceError> {
    let hours = config.simulation.years as usize * HOURS_PER_YEAR;
    let start = config
        .simulation
        .start_date
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let mut consumption = SeasonalProfile::new(
        config.consumption.mean_gw,
        config.consumption.seasonal_amplitude_gw,
    )
    .generate(hours);
    if let Some(target_twh) = config.consumption.annual_twh {
        let factor = transform::scale_to_annual_energy(&mut consumption, target_twh)?;
        info!(
            "Rescaled consumption to {} TWh/yr (factor {:.3})",
            target_twh, factor
        );
    }

    let base = SeasonalProfile::new(
        config.must_run.base_mean_gw,
        config.must_run.base_amplitude_gw,
    )
    .generate(hours);
    let mut wind_config = config.must_run.wind;
    if wind_config.random_seed.is_none() {
        wind_config.random_seed = config.simulation.random_seed;
    }
    let wind = wind_config.generate(hours);
    let must_run = base
        .iter()
        .zip(&wind)
        .map(|(b, w)| b + w)
        .collect::<Vec<_>>();

    SeriesStore::builder(start, hours)
        .with_consumption(consumption)
        .with_must_run(must_run)
        .with_hydro_inflow(inflow_profile(hours, config.hydro.inflow_scale))
        .with_trade_limit(config.trade.limit_gw)
        .with_hydro_bounds(config.hydro.min_dispatch_gw, config.hydro.max_dispatch_gw)
        .build()
}

/// Validate the config and assemble the full simulation.
pub fn build_simulation(config: &Config) -> Result<Simulation, BalanceError> {
    config.validate().map_err(BalanceError::InvalidInput)?;

    let series = build_series(config)?;
    let reservoir = HydroReservoir::new(config.hydro.reservoir)?;
    let hydrogen = if config.hydrogen.enabled {
        HydrogenFlex::new(config.hydrogen.params)?
    } else {
        HydrogenFlex::idle()
    };

    info!(
        hours = series.len(),
        years = config.simulation.years,
        seed = ?config.simulation.random_seed,
        hydrogen = config.hydrogen.enabled,
        "scenario assembled"
    );

    Ok(Simulation::new(series, reservoir, hydrogen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::SeriesColumn;

    fn seeded_config(years: u32) -> Config {
        let mut config = Config::default();
        config.simulation.years = years;
        config.simulation.random_seed = Some(5);
        config
    }

    #[test]
    fn test_series_spans_the_configured_years() {
        let series = build_series(&seeded_config(2)).unwrap();
        assert_eq!(series.len(), 2 * HOURS_PER_YEAR);
        assert_eq!(
            series.start(),
            chrono::NaiveDate::from_ymd_opt(2030, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_same_seed_reproduces_the_series() {
        let a = build_series(&seeded_config(1)).unwrap();
        let b = build_series(&seeded_config(1)).unwrap();
        assert_eq!(a.column(SeriesColumn::MustRun), b.column(SeriesColumn::MustRun));
        assert_eq!(
            a.column(SeriesColumn::Consumption),
            b.column(SeriesColumn::Consumption)
        );
    }

    #[test]
    fn test_annual_target_rescales_consumption() {
        let mut config = seeded_config(1);
        config.consumption.annual_twh = Some(200.0);
        let series = build_series(&config).unwrap();

        let energy_twh = transform::series_energy_twh(series.column(SeriesColumn::Consumption));
        assert!((energy_twh - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_must_run_combines_base_and_wind() {
        let mut config = seeded_config(1);
        config.must_run.wind.gust_std_gw = 0.0;
        config.must_run.wind.seasonal_amplitude_gw = 0.0;
        config.must_run.wind.mean_gw = 9.0;
        let series = build_series(&config).unwrap();

        // With noise off, hour 0 is base winter peak plus flat wind.
        let expected = (7.2 + 2.0) + 9.0;
        assert!((series.column(SeriesColumn::MustRun)[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_build_simulation_wires_the_models() {
        let sim = build_simulation(&seeded_config(1)).unwrap();
        assert_eq!(sim.hours_total(), HOURS_PER_YEAR);
        assert_eq!(sim.reservoir().stored_gwh(), 20_000.0);
        let (lo, hi) = sim.hydrogen().feasible_adjustment();
        assert!(lo < 0.0 && hi > 0.0);
    }

    #[test]
    fn test_disabled_hydrogen_never_flexes() {
        let mut config = seeded_config(1);
        config.hydrogen.enabled = false;
        let sim = build_simulation(&config).unwrap();
        let (lo, hi) = sim.hydrogen().feasible_adjustment();
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 0.0);
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let mut config = seeded_config(1);
        config.trade.limit_gw = -1.0;
        let err = build_simulation(&config).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
