use crate::domain::{BalanceError, HourRecord};

use super::hydrogen::HydrogenFlex;
use super::reservoir::HydroReservoir;
use super::result::DispatchResult;

/// Merit-order dispatch engine - THE CORE ALGORITHM
///
/// Balances one hour of the national grid with a fixed resource priority:
/// 1. Must-run generation is given (wind, nuclear, heat)
/// 2. Hydro follows the residual within dispatch and storage bounds
/// 3. Hydrogen flex moves within its window production band
/// 4. Cross-border trade fills in up to the hour's limit
/// 5. Whatever is left is shortage or excess, never an error
///
/// Each resource passes the unmet remainder on, sign unchanged. The
/// engine is deterministic: the result is a pure function of the record
/// and the two threaded states.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchEngine;

impl DispatchEngine {
    pub fn new() -> Self {
        Self
    }

    /// Balance one hour and advance both storage states.
    ///
    /// Fails with [`BalanceError::InvalidInput`] on a structurally broken
    /// record; an hour that simply cannot be balanced reports its
    /// shortage or excess in the result instead.
    pub fn dispatch_hour(
        &self,
        record: &HourRecord,
        reservoir: &mut HydroReservoir,
        hydrogen: &mut HydrogenFlex,
    ) -> Result<DispatchResult, BalanceError> {
        record.validate().map_err(|reason| {
            BalanceError::InvalidInput(format!("hour {}: {}", record.timestamp, reason))
        })?;

        // Step 1: residual demand after must-run. May be negative.
        let need = record.need_gw();

        // Step 2: hydro follows need within the feasible range. The range
        // already intersects turbine bounds with storage bounds, so the
        // clamp is safe and the later apply() cannot drain below empty.
        let (hydro_lo, hydro_hi) = reservoir.feasible_range(
            record.hydro_inflow_gw,
            record.hydro_min_gw,
            record.hydro_max_gw,
        );
        let hydro = need.clamp(hydro_lo, hydro_hi);
        let mut remaining = need - hydro;

        // Step 3: hydrogen flex takes what the window budgets allow. The
        // range always contains zero, so an already balanced hour leaves
        // hydrogen at its baseline.
        let (flex_lo, flex_hi) = hydrogen.feasible_adjustment();
        let flex = remaining.clamp(flex_lo, flex_hi);
        remaining -= flex;

        // Step 4: trade within the hour's symmetric limit.
        let trade = remaining.clamp(-record.trade_limit_gw, record.trade_limit_gw);
        remaining -= trade;

        // Step 5: the residual is shortage (unmet demand) or excess
        // (unabsorbed surplus); `remaining` has a single sign here so at
        // most one of them is nonzero.
        let shortage = remaining.max(0.0);
        let excess = (-remaining).max(0.0);

        reservoir.apply(record.hydro_inflow_gw, hydro)?;
        hydrogen.apply(flex)?;

        let result = DispatchResult {
            timestamp: record.timestamp,
            consumption_gw: record.consumption_gw,
            must_run_gw: record.must_run_gw,
            hydro_gw: hydro,
            hydrogen_flex_gw: flex,
            trade_gw: trade,
            shortage_gw: shortage,
            excess_gw: excess,
        };
        debug_assert!(
            result.verify_balance(),
            "balance identity broken at {}: {:?}",
            record.timestamp,
            result
        );
        Ok(result)
    }
}
