use serde::{Deserialize, Serialize};

use crate::domain::{BalanceError, HOURS_PER_YEAR};
use crate::dispatch::reservoir::STORAGE_TOLERANCE_GWH;

/// Hydrogen flexibility parameters, fixed for one run.
///
/// The electrolyser fleet runs at `baseline_gw` inside the consumption
/// series. Flexibility is a deviation from that baseline: curtailing
/// releases power to the grid, running above baseline absorbs power.
/// Production targets apply per fixed window (normally one year) and are
/// enforced through the remaining-budget accounting in
/// [`HydrogenState`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrogenParams {
    /// Baseline electrolyser draw already part of consumption (GW).
    pub baseline_gw: f64,
    /// Maximum power released by curtailing production (GW per hour).
    pub max_release_gw: f64,
    /// Maximum extra electrolyser draw above baseline (GW per hour).
    pub max_absorb_gw: f64,
    /// Window over which the production targets apply (hours).
    pub window_hours: usize,
    /// Minimum production per window (GWh).
    pub min_production_gwh: f64,
    /// Maximum production per window (GWh).
    pub max_production_gwh: f64,
    /// Hydrogen energy store level at simulation start (GWh).
    pub initial_store_gwh: f64,
    /// Constant demand drained from the store (GWh per hour).
    pub store_drain_gwh: f64,
}

impl Default for HydrogenParams {
    fn default() -> Self {
        // 9.35 GW baseline over a year is about 82 TWh; the band leaves
        // room to flex both ways. The drain matches an 85 TWh/yr offtake.
        Self {
            baseline_gw: 9.35,
            max_release_gw: 9.35,
            max_absorb_gw: 9.35,
            window_hours: HOURS_PER_YEAR,
            min_production_gwh: 65_000.0,
            max_production_gwh: 150_000.0,
            initial_store_gwh: 0.0,
            store_drain_gwh: 85_000.0 / HOURS_PER_YEAR as f64,
        }
    }
}

impl HydrogenParams {
    /// A model that never flexes: the feasible adjustment is pinned to
    /// zero and only the store drain moves.
    pub fn disabled() -> Self {
        Self {
            baseline_gw: 0.0,
            max_release_gw: 0.0,
            max_absorb_gw: 0.0,
            window_hours: HOURS_PER_YEAR,
            min_production_gwh: 0.0,
            max_production_gwh: 0.0,
            initial_store_gwh: 0.0,
            store_drain_gwh: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let non_negative = [
            ("baseline_gw", self.baseline_gw),
            ("max_release_gw", self.max_release_gw),
            ("max_absorb_gw", self.max_absorb_gw),
            ("min_production_gwh", self.min_production_gwh),
            ("max_production_gwh", self.max_production_gwh),
            ("store_drain_gwh", self.store_drain_gwh),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "hydrogen {} must be finite and non-negative, got {}",
                    name, value
                ));
            }
        }
        if !self.initial_store_gwh.is_finite() {
            return Err(format!(
                "hydrogen initial_store_gwh must be finite, got {}",
                self.initial_store_gwh
            ));
        }
        if self.window_hours == 0 {
            return Err("hydrogen window_hours must be at least 1".to_string());
        }
        if self.min_production_gwh > self.max_production_gwh {
            return Err(format!(
                "hydrogen min_production_gwh {} exceeds max_production_gwh {}",
                self.min_production_gwh, self.max_production_gwh
            ));
        }

        // Baseline production must land inside the window band, otherwise
        // one of the flex budgets starts negative.
        let baseline_window_gwh = self.baseline_gw * self.window_hours as f64;
        if baseline_window_gwh < self.min_production_gwh {
            return Err(format!(
                "baseline production {} GWh per window cannot reach the minimum target {} GWh",
                baseline_window_gwh, self.min_production_gwh
            ));
        }
        if baseline_window_gwh > self.max_production_gwh {
            return Err(format!(
                "baseline production {} GWh per window already exceeds the maximum target {} GWh",
                baseline_window_gwh, self.max_production_gwh
            ));
        }
        Ok(())
    }
}

/// Mutable hydrogen state, threaded hour to hour.
///
/// The two budgets track how far window production may still move in each
/// direction: the release budget is the energy the window may forgo and
/// still reach the minimum target, the absorb budget the energy it may add
/// without passing the maximum. Releasing spends the release budget and
/// frees absorb headroom, and vice versa, so their sum stays
/// `max_production_gwh - min_production_gwh` and window totals can never
/// leave the band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydrogenState {
    /// Production booked in the current window (GWh).
    pub produced_gwh: f64,
    /// Curtailment energy still available this window (GWh).
    pub release_budget_gwh: f64,
    /// Extra-production energy still available this window (GWh).
    pub absorb_budget_gwh: f64,
    /// Hours elapsed in the current window.
    pub hour_in_window: usize,
    /// Hydrogen energy store level (GWh). Pure bookkeeping: fed by
    /// production, drained at the configured rate, may run negative.
    pub store_gwh: f64,
    /// Energy released to the grid since the run started (GWh).
    pub released_total_gwh: f64,
    /// Energy absorbed from the grid since the run started (GWh).
    pub absorbed_total_gwh: f64,
}

/// Hydrogen flexibility model.
#[derive(Debug, Clone)]
pub struct HydrogenFlex {
    params: HydrogenParams,
    state: HydrogenState,
}

impl HydrogenFlex {
    pub fn new(params: HydrogenParams) -> Result<Self, BalanceError> {
        params.validate().map_err(BalanceError::InvalidInput)?;
        Ok(Self {
            state: HydrogenState {
                produced_gwh: 0.0,
                release_budget_gwh: Self::fresh_release_budget(&params),
                absorb_budget_gwh: Self::fresh_absorb_budget(&params),
                hour_in_window: 0,
                store_gwh: params.initial_store_gwh,
                released_total_gwh: 0.0,
                absorbed_total_gwh: 0.0,
            },
            params,
        })
    }

    /// A model that contributes nothing to the merit order.
    pub fn idle() -> Self {
        Self {
            params: HydrogenParams::disabled(),
            state: HydrogenState {
                produced_gwh: 0.0,
                release_budget_gwh: 0.0,
                absorb_budget_gwh: 0.0,
                hour_in_window: 0,
                store_gwh: 0.0,
                released_total_gwh: 0.0,
                absorbed_total_gwh: 0.0,
            },
        }
    }

    fn fresh_release_budget(params: &HydrogenParams) -> f64 {
        params.baseline_gw * params.window_hours as f64 - params.min_production_gwh
    }

    fn fresh_absorb_budget(params: &HydrogenParams) -> f64 {
        params.max_production_gwh - params.baseline_gw * params.window_hours as f64
    }

    pub fn state(&self) -> &HydrogenState {
        &self.state
    }

    pub fn params(&self) -> &HydrogenParams {
        &self.params
    }

    pub fn store_gwh(&self) -> f64 {
        self.state.store_gwh
    }

    /// Power adjustment achievable this hour without leaving the window's
    /// production band: `(lo, hi)` with `lo <= 0 <= hi`. Positive numbers
    /// release power to the grid (curtailment), negative absorb it (extra
    /// production).
    pub fn feasible_adjustment(&self) -> (f64, f64) {
        let hi = self
            .params
            .max_release_gw
            .min(self.params.baseline_gw)
            .min(self.state.release_budget_gwh)
            .max(0.0);
        let lo = -self
            .params
            .max_absorb_gw
            .min(self.state.absorb_budget_gwh)
            .max(0.0);
        (lo, hi)
    }

    /// Book one hour of flex. `flex_gw` must lie inside the range from
    /// [`HydrogenFlex::feasible_adjustment`]; anything outside is an
    /// accounting violation.
    pub fn apply(&mut self, flex_gw: f64) -> Result<(), BalanceError> {
        let (lo, hi) = self.feasible_adjustment();
        if flex_gw < lo - STORAGE_TOLERANCE_GWH || flex_gw > hi + STORAGE_TOLERANCE_GWH {
            return Err(BalanceError::InfeasibleStorage(format!(
                "hydrogen flex {:.6} GW outside feasible range [{:.6}, {:.6}]",
                flex_gw, lo, hi
            )));
        }

        let production = self.params.baseline_gw - flex_gw;
        self.state.produced_gwh += production;

        // Releasing spends release budget and frees absorb headroom; the
        // signs make one update cover both directions.
        self.state.release_budget_gwh -= flex_gw;
        self.state.absorb_budget_gwh += flex_gw;
        if flex_gw > 0.0 {
            self.state.released_total_gwh += flex_gw;
        } else {
            self.state.absorbed_total_gwh += -flex_gw;
        }

        self.state.store_gwh += production - self.params.store_drain_gwh;

        self.state.hour_in_window += 1;
        if self.state.hour_in_window == self.params.window_hours {
            self.roll_window()?;
        }
        Ok(())
    }

    /// Close the current window, asserting its production landed inside
    /// the configured band, and open a fresh one.
    fn roll_window(&mut self) -> Result<(), BalanceError> {
        let produced = self.state.produced_gwh;
        if produced < self.params.min_production_gwh - STORAGE_TOLERANCE_GWH
            || produced > self.params.max_production_gwh + STORAGE_TOLERANCE_GWH
        {
            return Err(BalanceError::InfeasibleStorage(format!(
                "window production {:.3} GWh outside target band [{:.3}, {:.3}]",
                produced, self.params.min_production_gwh, self.params.max_production_gwh
            )));
        }

        self.state.produced_gwh = 0.0;
        self.state.release_budget_gwh = Self::fresh_release_budget(&self.params);
        self.state.absorb_budget_gwh = Self::fresh_absorb_budget(&self.params);
        self.state.hour_in_window = 0;
        Ok(())
    }
}
