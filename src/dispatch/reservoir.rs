use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::BalanceError;

/// Slack allowed on storage bound checks before the state counts as
/// infeasible (GWh). Covers float drift over multi-year runs.
pub const STORAGE_TOLERANCE_GWH: f64 = 1e-6;

/// Reservoir parameters, fixed for one run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservoirParams {
    /// Total water-equivalent storage capacity (GWh).
    pub capacity_gwh: f64,
    /// Stored energy at simulation start (GWh).
    pub initial_storage_gwh: f64,
}

impl Default for ReservoirParams {
    fn default() -> Self {
        // Aggregate Nordic-scale reservoir, starting reasonably full.
        Self {
            capacity_gwh: 33_600.0,
            initial_storage_gwh: 20_000.0,
        }
    }
}

impl ReservoirParams {
    pub fn validate(&self) -> Result<(), String> {
        if !self.capacity_gwh.is_finite() || self.capacity_gwh < 0.0 {
            return Err(format!(
                "reservoir capacity_gwh must be finite and non-negative, got {}",
                self.capacity_gwh
            ));
        }
        if !self.initial_storage_gwh.is_finite() || self.initial_storage_gwh < 0.0 {
            return Err(format!(
                "reservoir initial_storage_gwh must be finite and non-negative, got {}",
                self.initial_storage_gwh
            ));
        }
        if self.initial_storage_gwh > self.capacity_gwh {
            return Err(format!(
                "reservoir initial storage {} GWh exceeds capacity {} GWh",
                self.initial_storage_gwh, self.capacity_gwh
            ));
        }
        Ok(())
    }
}

/// Mutable reservoir state, threaded hour to hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReservoirState {
    /// Stored water-equivalent energy (GWh), always within
    /// `[0, capacity_gwh]`.
    pub stored_gwh: f64,
    /// Inflow spilled past a full reservoir since the run started (GWh).
    /// Spill is absorbed here, never surfaced as excess in the power
    /// balance.
    pub spilled_gwh: f64,
}

/// Hydro reservoir model.
///
/// Owns the [`ReservoirState`], answers per-hour dispatch feasibility and
/// advances the storage accounting. With one-hour steps a GW dispatch
/// moves the same number of GWh.
#[derive(Debug, Clone)]
pub struct HydroReservoir {
    params: ReservoirParams,
    state: ReservoirState,
}

impl HydroReservoir {
    pub fn new(params: ReservoirParams) -> Result<Self, BalanceError> {
        params.validate().map_err(BalanceError::InvalidInput)?;
        Ok(Self {
            state: ReservoirState {
                stored_gwh: params.initial_storage_gwh,
                spilled_gwh: 0.0,
            },
            params,
        })
    }

    pub fn state(&self) -> &ReservoirState {
        &self.state
    }

    pub fn stored_gwh(&self) -> f64 {
        self.state.stored_gwh
    }

    pub fn spilled_gwh(&self) -> f64 {
        self.state.spilled_gwh
    }

    pub fn capacity_gwh(&self) -> f64 {
        self.params.capacity_gwh
    }

    /// Feasible hydro dispatch range for this hour: the hour's dispatch
    /// bounds intersected with what storage allows given `inflow_gw`.
    ///
    /// Storage feasibility wins when the intersection is empty: a dry
    /// reservoir caps dispatch below `dispatch_min_gw` (a minimum-flow
    /// preference cannot create water), and an overflowing one forces
    /// dispatch up to `dispatch_max_gw` (the remainder spills in
    /// [`HydroReservoir::apply`]). The returned pair always satisfies
    /// `lo <= hi`.
    pub fn feasible_range(
        &self,
        inflow_gw: f64,
        dispatch_min_gw: f64,
        dispatch_max_gw: f64,
    ) -> (f64, f64) {
        // Energy that could leave this hour without draining below empty.
        let available = self.state.stored_gwh + inflow_gw;
        // Dispatch below this level would overflow the reservoir.
        let forced = available - self.params.capacity_gwh;

        let hi = dispatch_max_gw.min(available);
        let lo = dispatch_min_gw.max(forced).min(hi);
        (lo, hi)
    }

    /// Advance storage by one hour of inflow and dispatch. Returns the
    /// energy spilled past capacity this hour (GWh, usually zero).
    ///
    /// Dispatch is expected to lie within the range returned by
    /// [`HydroReservoir::feasible_range`]; draining below empty is an
    /// accounting violation and fails with
    /// [`BalanceError::InfeasibleStorage`].
    pub fn apply(&mut self, inflow_gw: f64, dispatch_gw: f64) -> Result<f64, BalanceError> {
        let next = self.state.stored_gwh + inflow_gw - dispatch_gw;

        if next < -STORAGE_TOLERANCE_GWH {
            return Err(BalanceError::InfeasibleStorage(format!(
                "reservoir would hold {:.6} GWh after dispatching {:.3} GW against {:.3} GW inflow",
                next, dispatch_gw, inflow_gw
            )));
        }

        let spilled = (next - self.params.capacity_gwh).max(0.0);
        if spilled > 0.0 {
            debug!(
                spilled_gwh = spilled,
                capacity_gwh = self.params.capacity_gwh,
                "reservoir full, inflow spilled"
            );
        }

        self.state.spilled_gwh += spilled;
        self.state.stored_gwh = next.clamp(0.0, self.params.capacity_gwh);
        Ok(spilled)
    }
}
