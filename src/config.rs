use chrono::NaiveDate;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;

use crate::dispatch::{HydrogenParams, ReservoirParams};
use crate::simulation::WindProfileConfig;

/// Full run configuration. Every section falls back to the reference
/// scenario, so an empty config is a valid one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub consumption: ConsumptionConfig,
    pub must_run: MustRunConfig,
    pub hydro: HydroConfig,
    pub trade: TradeConfig,
    pub hydrogen: HydrogenConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// First simulated day; hours start at midnight.
    pub start_date: NaiveDate,
    pub years: u32,
    /// Seed for the stochastic profiles (None = entropy).
    pub random_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            years: 10,
            random_seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsumptionConfig {
    /// Annual mean consumption (GW).
    pub mean_gw: f64,
    /// Seasonal swing around the mean (GW), peaking mid-winter.
    pub seasonal_amplitude_gw: f64,
    /// Optional annual energy target (TWh); when set, the generated
    /// series is rescaled to hit it.
    pub annual_twh: Option<f64>,
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            mean_gw: 32.25,
            seasonal_amplitude_gw: 4.0,
            annual_twh: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MustRunConfig {
    /// Mean of the non-dispatchable thermal base (GW): nuclear plus CHP.
    pub base_mean_gw: f64,
    /// Seasonal swing of the base (GW); maintenance lands in summer.
    pub base_amplitude_gw: f64,
    pub wind: WindProfileConfig,
}

impl Default for MustRunConfig {
    fn default() -> Self {
        Self {
            base_mean_gw: 7.2,
            base_amplitude_gw: 2.0,
            wind: WindProfileConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HydroConfig {
    /// Factor applied to the empirical inflow curve.
    pub inflow_scale: f64,
    /// Minimum turbine flow (GW); river hydro that cannot stop.
    pub min_dispatch_gw: f64,
    /// Maximum turbine capacity (GW).
    pub max_dispatch_gw: f64,
    pub reservoir: ReservoirParams,
}

impl Default for HydroConfig {
    fn default() -> Self {
        Self {
            inflow_scale: 1.0,
            min_dispatch_gw: 2.0,
            max_dispatch_gw: 13.0,
            reservoir: ReservoirParams::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TradeConfig {
    /// Symmetric interconnector limit (GW), same cap both directions.
    pub limit_gw: f64,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self { limit_gw: 2.6 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HydrogenConfig {
    pub enabled: bool,
    #[serde(flatten)]
    pub params: HydrogenParams,
}

impl Default for HydrogenConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            params: HydrogenParams::default(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("PBS__").split("__"));
        Ok(figment.extract()?)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.simulation.years == 0 {
            return Err("simulation.years must be at least 1".to_string());
        }
        for (name, value) in [
            ("consumption.mean_gw", self.consumption.mean_gw),
            (
                "consumption.seasonal_amplitude_gw",
                self.consumption.seasonal_amplitude_gw,
            ),
            ("must_run.base_mean_gw", self.must_run.base_mean_gw),
            ("must_run.base_amplitude_gw", self.must_run.base_amplitude_gw),
            ("hydro.inflow_scale", self.hydro.inflow_scale),
            ("trade.limit_gw", self.trade.limit_gw),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must be finite and non-negative, got {value}"));
            }
        }
        if let Some(target) = self.consumption.annual_twh {
            if !target.is_finite() || target <= 0.0 {
                return Err(format!(
                    "consumption.annual_twh must be positive, got {target}"
                ));
            }
        }
        self.must_run
            .wind
            .validate()
            .map_err(|e| format!("must_run.wind: {e}"))?;
        if !self.hydro.min_dispatch_gw.is_finite() || !self.hydro.max_dispatch_gw.is_finite() {
            return Err("hydro dispatch bounds must be finite".to_string());
        }
        if self.hydro.min_dispatch_gw > self.hydro.max_dispatch_gw {
            return Err(format!(
                "hydro.min_dispatch_gw {} exceeds hydro.max_dispatch_gw {}",
                self.hydro.min_dispatch_gw, self.hydro.max_dispatch_gw
            ));
        }
        self.hydro
            .reservoir
            .validate()
            .map_err(|e| format!("hydro.reservoir: {e}"))?;
        if self.hydrogen.enabled {
            self.hydrogen
                .params
                .validate()
                .map_err(|e| format!("hydrogen: {e}"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_remaining_defaults() {
        let config: Config = toml::from_str(
            r#"
            [simulation]
            years = 3
            random_seed = 5

            [trade]
            limit_gw = 6.0

            [hydrogen]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation.years, 3);
        assert_eq!(config.simulation.random_seed, Some(5));
        assert_eq!(config.trade.limit_gw, 6.0);
        assert!(!config.hydrogen.enabled);
        // Untouched sections fall back to the reference scenario.
        assert_eq!(config.consumption.mean_gw, 32.25);
        assert_eq!(config.hydro.max_dispatch_gw, 13.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_hydrogen_params_flatten_into_the_section() {
        let config: Config = toml::from_str(
            r#"
            [hydrogen]
            enabled = true
            baseline_gw = 4.0
            min_production_gwh = 20000.0
            max_production_gwh = 60000.0
            "#,
        )
        .unwrap();

        assert_eq!(config.hydrogen.params.baseline_gw, 4.0);
        assert_eq!(config.hydrogen.params.min_production_gwh, 20_000.0);
        // Unset knobs keep their defaults.
        assert_eq!(config.hydrogen.params.max_absorb_gw, 9.35);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_hydro_bounds_rejected() {
        let mut config = Config::default();
        config.hydro.min_dispatch_gw = 14.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_years_rejected() {
        let mut config = Config::default();
        config.simulation.years = 0;
        assert!(config.validate().is_err());
    }
}
