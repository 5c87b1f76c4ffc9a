use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the aligned hourly timeline.
///
/// All power values are in GW. The simulation steps in whole hours, so a
/// GW figure doubles as its GWh energy for the hour. Records are built
/// once from the input series and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourRecord {
    /// Hour this record describes (start of hour).
    pub timestamp: NaiveDateTime,
    /// National consumption (GW, >= 0).
    pub consumption_gw: f64,
    /// Must-run generation: wind plus nuclear/heat base (GW, >= 0).
    pub must_run_gw: f64,
    /// Water inflow to the hydro reservoir (GW-equivalent, >= 0).
    pub hydro_inflow_gw: f64,
    /// Maximum magnitude of cross-border trade this hour (GW, >= 0).
    pub trade_limit_gw: f64,
    /// Lower hydro dispatch bound (GW). Negative means the plant can
    /// absorb power, e.g. by pumping.
    pub hydro_min_gw: f64,
    /// Upper hydro dispatch bound (GW), the turbine capacity.
    pub hydro_max_gw: f64,
}

impl HourRecord {
    /// Residual demand after must-run generation. May be negative when
    /// must-run exceeds consumption.
    pub fn need_gw(&self) -> f64 {
        self.consumption_gw - self.must_run_gw
    }

    /// Check the structural invariants of a single record.
    ///
    /// Returns a description of the first violation found. A failing
    /// record is a data/configuration error and aborts the run at this
    /// hour; it is never "repaired".
    pub fn validate(&self) -> Result<(), String> {
        let finite = [
            ("consumption_gw", self.consumption_gw),
            ("must_run_gw", self.must_run_gw),
            ("hydro_inflow_gw", self.hydro_inflow_gw),
            ("trade_limit_gw", self.trade_limit_gw),
            ("hydro_min_gw", self.hydro_min_gw),
            ("hydro_max_gw", self.hydro_max_gw),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(format!("{} is not finite: {}", name, value));
            }
        }

        if self.consumption_gw < 0.0 {
            return Err(format!(
                "consumption_gw is negative: {}",
                self.consumption_gw
            ));
        }
        if self.must_run_gw < 0.0 {
            return Err(format!("must_run_gw is negative: {}", self.must_run_gw));
        }
        if self.hydro_inflow_gw < 0.0 {
            return Err(format!(
                "hydro_inflow_gw is negative: {}",
                self.hydro_inflow_gw
            ));
        }
        if self.trade_limit_gw < 0.0 {
            return Err(format!(
                "trade_limit_gw is negative: {}",
                self.trade_limit_gw
            ));
        }
        if self.hydro_min_gw > self.hydro_max_gw {
            return Err(format!(
                "hydro_min_gw {} exceeds hydro_max_gw {}",
                self.hydro_min_gw, self.hydro_max_gw
            ));
        }

        Ok(())
    }
}
