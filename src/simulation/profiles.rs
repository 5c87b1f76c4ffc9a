//! Synthetic scenario profiles.
//!
//! Generators for the input series a run needs when no measured data is
//! wired in: seasonally shaped consumption and must-run base, the
//! empirical reservoir-year inflow curve, and a stochastic wind series.
//! All of them are deterministic for a fixed seed, so scenario runs are
//! reproducible.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::domain::HOURS_PER_YEAR;

/// Annual sinusoidal shape, peaking mid-winter.
///
/// `value(h) = mean + amplitude * cos(2π * (h - peak_offset) / 8760)`,
/// so with a zero offset the curve tops out on January 1 and bottoms out
/// at midsummer. Consumption and the nuclear/heat base both follow this
/// shape (less heat demand and scheduled maintenance in summer).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeasonalProfile {
    pub mean_gw: f64,
    pub amplitude_gw: f64,
    /// Shift of the winter peak away from January 1, in hours.
    pub peak_offset_hours: f64,
}

impl SeasonalProfile {
    pub fn new(mean_gw: f64, amplitude_gw: f64) -> Self {
        Self {
            mean_gw,
            amplitude_gw,
            peak_offset_hours: 0.0,
        }
    }

    /// Value at an absolute hour index (wraps every nominal year).
    pub fn value_at(&self, hour: usize) -> f64 {
        let hour_of_year = (hour % HOURS_PER_YEAR) as f64;
        let angle = (hour_of_year - self.peak_offset_hours) * std::f64::consts::TAU
            / HOURS_PER_YEAR as f64;
        self.mean_gw + self.amplitude_gw * angle.cos()
    }

    pub fn generate(&self, hours: usize) -> Vec<f64> {
        (0..hours).map(|hour| self.value_at(hour)).collect()
    }
}

// Empirical inflow curve constants. The curve is expressed in a
// reservoir year starting May 1: snowmelt builds through late spring,
// peaks around midsummer and decays toward a rain-fed base level.
const INFLOW_QUADRATIC: f64 = 0.000_12;
const INFLOW_DECAY_SCALE: f64 = 0.002;
const INFLOW_DECAY_SHAPE: f64 = 0.9;
const INFLOW_BASE_GW: f64 = 2.8;
/// Hours from January 1 to the May 1 anchor of the reservoir year.
const RESERVOIR_YEAR_OFFSET_HOURS: usize = 5880;

/// Hydro inflow at an absolute hour index (GW-equivalent).
pub fn inflow_at(hour: usize) -> f64 {
    let t = ((hour % HOURS_PER_YEAR) + RESERVOIR_YEAR_OFFSET_HOURS) % HOURS_PER_YEAR;
    let t = t as f64;
    INFLOW_QUADRATIC * t * t * (-(t * INFLOW_DECAY_SCALE).powf(INFLOW_DECAY_SHAPE)).exp()
        + INFLOW_BASE_GW
}

/// Inflow series for `hours`, scaled by `scale`.
pub fn inflow_profile(hours: usize, scale: f64) -> Vec<f64> {
    (0..hours).map(|hour| inflow_at(hour) * scale).collect()
}

/// Configuration for the synthetic wind series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WindProfileConfig {
    /// Annual mean production (GW).
    pub mean_gw: f64,
    /// Seasonal swing around the mean (GW), windier in winter.
    pub seasonal_amplitude_gw: f64,
    /// Standard deviation of hourly gust innovations (GW).
    pub gust_std_gw: f64,
    /// Hour-to-hour persistence of the gust process, in `[0, 1)`. Wind
    /// fronts last days, not hours, so this sits close to 1.
    pub persistence: f64,
    /// Seed for reproducible series (None = entropy).
    pub random_seed: Option<u64>,
}

impl Default for WindProfileConfig {
    fn default() -> Self {
        Self {
            mean_gw: 9.0,
            seasonal_amplitude_gw: 3.0,
            gust_std_gw: 4.0,
            persistence: 0.97,
            random_seed: None,
        }
    }
}

impl WindProfileConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.mean_gw.is_finite() || self.mean_gw < 0.0 {
            return Err(format!(
                "wind mean_gw must be finite and non-negative, got {}",
                self.mean_gw
            ));
        }
        if !self.seasonal_amplitude_gw.is_finite() || self.seasonal_amplitude_gw < 0.0 {
            return Err(format!(
                "wind seasonal_amplitude_gw must be finite and non-negative, got {}",
                self.seasonal_amplitude_gw
            ));
        }
        if !self.gust_std_gw.is_finite() || self.gust_std_gw < 0.0 {
            return Err(format!(
                "wind gust_std_gw must be finite and non-negative, got {}",
                self.gust_std_gw
            ));
        }
        if !self.persistence.is_finite() || !(0.0..1.0).contains(&self.persistence) {
            return Err(format!(
                "wind persistence must lie in [0, 1), got {}",
                self.persistence
            ));
        }
        Ok(())
    }

    /// Generate `hours` of wind production: a seasonal mean plus an AR(1)
    /// gust process, clamped at zero. Expects validated config.
    pub fn generate(&self, hours: usize) -> Vec<f64> {
        let mut rng = match self.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let seasonal = SeasonalProfile::new(self.mean_gw, self.seasonal_amplitude_gw);
        // Innovations are scaled so the gust process itself keeps the
        // configured standard deviation despite the smoothing.
        let innovation_std = self.gust_std_gw * (1.0 - self.persistence * self.persistence).sqrt();
        let normal = Normal::new(0.0, innovation_std).unwrap();

        let mut gust = 0.0;
        (0..hours)
            .map(|hour| {
                gust = self.persistence * gust + normal.sample(&mut rng);
                (seasonal.value_at(hour) + gust).max(0.0)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seasonal_peaks_in_winter_and_dips_in_summer() {
        let profile = SeasonalProfile::new(32.25, 4.0);
        let january = profile.value_at(0);
        let midsummer = profile.value_at(HOURS_PER_YEAR / 2);

        assert!((january - 36.25).abs() < 1e-9);
        assert!((midsummer - 28.25).abs() < 1e-6);
    }

    #[test]
    fn test_seasonal_wraps_across_years() {
        let profile = SeasonalProfile::new(10.0, 2.0);
        assert_eq!(profile.value_at(100), profile.value_at(100 + HOURS_PER_YEAR));
    }

    #[test]
    fn test_seasonal_mean_over_a_year() {
        let profile = SeasonalProfile::new(20.0, 5.0);
        let series = profile.generate(HOURS_PER_YEAR);
        let mean = series.iter().sum::<f64>() / series.len() as f64;
        assert!((mean - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_peak_offset_moves_the_maximum() {
        let profile = SeasonalProfile {
            mean_gw: 10.0,
            amplitude_gw: 3.0,
            peak_offset_hours: 1000.0,
        };
        assert!((profile.value_at(1000) - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_inflow_floor_and_spring_flood() {
        let series = inflow_profile(HOURS_PER_YEAR, 1.0);

        // Never below the rain-fed base.
        assert!(series.iter().all(|&v| v >= INFLOW_BASE_GW));

        // The flood peak lands in late spring / early summer (between
        // May and August) and towers over the winter level.
        let (peak_hour, peak) = series
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (h, &v)| {
                if v > acc.1 {
                    (h, v)
                } else {
                    acc
                }
            });
        let may_1 = 2880;
        let september_1 = 5832;
        assert!(peak_hour > may_1 && peak_hour < september_1);
        assert!(peak > 15.0);

        // Mid-winter is close to the base level.
        assert!(series[400] < 5.0);
    }

    #[test]
    fn test_inflow_scale_factor() {
        let unscaled = inflow_profile(100, 1.0);
        let scaled = inflow_profile(100, 1.5);
        for (a, b) in unscaled.iter().zip(&scaled) {
            assert!((a * 1.5 - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_wind_is_reproducible_with_seed() {
        let config = WindProfileConfig {
            random_seed: Some(42),
            ..WindProfileConfig::default()
        };
        assert_eq!(config.generate(500), config.generate(500));
    }

    #[test]
    fn test_wind_seeds_differ() {
        let a = WindProfileConfig {
            random_seed: Some(1),
            ..WindProfileConfig::default()
        };
        let b = WindProfileConfig {
            random_seed: Some(2),
            ..WindProfileConfig::default()
        };
        assert_ne!(a.generate(100), b.generate(100));
    }

    #[test]
    fn test_wind_never_negative() {
        let config = WindProfileConfig {
            mean_gw: 2.0,
            gust_std_gw: 6.0,
            random_seed: Some(7),
            ..WindProfileConfig::default()
        };
        assert!(config.generate(2000).iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_wind_mean_lands_near_config() {
        let config = WindProfileConfig {
            mean_gw: 9.0,
            seasonal_amplitude_gw: 0.0,
            gust_std_gw: 3.0,
            persistence: 0.9,
            random_seed: Some(11),
        };
        let series = config.generate(4 * HOURS_PER_YEAR);
        let mean = series.iter().sum::<f64>() / series.len() as f64;
        assert!((mean - 9.0).abs() < 0.5);
    }

    #[test]
    fn test_zero_noise_follows_the_seasonal_mean() {
        let config = WindProfileConfig {
            mean_gw: 8.0,
            seasonal_amplitude_gw: 2.0,
            gust_std_gw: 0.0,
            persistence: 0.5,
            random_seed: Some(3),
        };
        let series = config.generate(10);
        let seasonal = SeasonalProfile::new(8.0, 2.0);
        for (hour, value) in series.iter().enumerate() {
            assert!((value - seasonal.value_at(hour)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_persistence_rejected() {
        let config = WindProfileConfig {
            persistence: 1.0,
            ..WindProfileConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
