//! Collected results of a simulation run.

use serde::Serialize;

use crate::dispatch::{DispatchResult, HydrogenState, ReservoirState};
use crate::domain::BalanceError;

/// Everything a finished (or partial) run produced: the per-hour dispatch
/// results, aligned end-of-hour storage traces, and the final storage
/// states. Serializes whole for archiving a run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationOutput {
    /// One dispatch result per simulated hour.
    pub results: Vec<DispatchResult>,
    /// Reservoir level after each hour (GWh), aligned with `results`.
    pub reservoir_gwh: Vec<f64>,
    /// Hydrogen store level after each hour (GWh), aligned with `results`.
    pub hydrogen_store_gwh: Vec<f64>,
    /// Reservoir capacity the run was bounded by (GWh).
    pub reservoir_capacity_gwh: f64,
    pub final_reservoir: ReservoirState,
    pub final_hydrogen: HydrogenState,
}

impl SimulationOutput {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Hours that closed with unmet demand.
    pub fn shortage_hours(&self) -> usize {
        self.results.iter().filter(|r| r.shortage_gw > 0.0).count()
    }

    /// Hours that closed with unabsorbed surplus.
    pub fn excess_hours(&self) -> usize {
        self.results.iter().filter(|r| r.excess_gw > 0.0).count()
    }

    /// Re-check every invariant the engine maintains hour by hour.
    ///
    /// The engine already asserts these in debug builds; this walks the
    /// collected output so a release-mode caller can audit a finished run.
    pub fn verify(&self) -> Result<(), BalanceError> {
        for (hour, result) in self.results.iter().enumerate() {
            if !result.verify_balance() {
                return Err(BalanceError::InfeasibleStorage(format!(
                    "hour {hour}: balance identity violated at {}",
                    result.timestamp
                )));
            }
            if result.shortage_gw < 0.0 || result.excess_gw < 0.0 {
                return Err(BalanceError::InfeasibleStorage(format!(
                    "hour {hour}: negative residual (shortage {}, excess {})",
                    result.shortage_gw, result.excess_gw
                )));
            }
            if result.shortage_gw > 0.0 && result.excess_gw > 0.0 {
                return Err(BalanceError::InfeasibleStorage(format!(
                    "hour {hour}: shortage {} and excess {} both nonzero",
                    result.shortage_gw, result.excess_gw
                )));
            }
        }

        for (hour, &level) in self.reservoir_gwh.iter().enumerate() {
            if level < 0.0 || level > self.reservoir_capacity_gwh {
                return Err(BalanceError::InfeasibleStorage(format!(
                    "hour {hour}: reservoir level {level} GWh outside [0, {}]",
                    self.reservoir_capacity_gwh
                )));
            }
        }

        Ok(())
    }
}
