use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Tolerance for the hourly balance identity (GW).
pub const BALANCE_TOLERANCE_GW: f64 = 1e-6;

/// Dispatched power account for one hour.
///
/// Balance identity, holding for every hour:
/// `consumption = must_run + hydro + hydrogen_flex + trade + shortage - excess`.
/// Shortage and excess are residuals of the merit order, not independent
/// choices, and at most one of them is nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Hour this account describes.
    pub timestamp: NaiveDateTime,
    /// Consumption (GW), echoed from the input record.
    pub consumption_gw: f64,
    /// Must-run generation (GW), echoed from the input record.
    pub must_run_gw: f64,
    /// Hydro dispatch (GW); negative means absorbing, e.g. pumping.
    pub hydro_gw: f64,
    /// Hydrogen flex (GW); positive releases power to the grid by
    /// curtailing production, negative absorbs power into extra
    /// production.
    pub hydrogen_flex_gw: f64,
    /// Cross-border trade (GW); positive = import, negative = export.
    pub trade_gw: f64,
    /// Unmet demand after all resources and trade (GW, >= 0).
    pub shortage_gw: f64,
    /// Unabsorbed surplus after all resources and trade (GW, >= 0).
    pub excess_gw: f64,
}

impl DispatchResult {
    /// Verify the balance identity within [`BALANCE_TOLERANCE_GW`].
    pub fn verify_balance(&self) -> bool {
        let supplied =
            self.must_run_gw + self.hydro_gw + self.hydrogen_flex_gw + self.trade_gw;
        let accounted = supplied + self.shortage_gw - self.excess_gw;
        (self.consumption_gw - accounted).abs() <= BALANCE_TOLERANCE_GW
    }

    /// Import this hour (GW, 0 when exporting).
    pub fn import_gw(&self) -> f64 {
        self.trade_gw.max(0.0)
    }

    /// Export this hour (GW, 0 when importing).
    pub fn export_gw(&self) -> f64 {
        (-self.trade_gw).max(0.0)
    }

    /// True when the hour closed without shortage or excess.
    pub fn is_balanced(&self) -> bool {
        self.shortage_gw == 0.0 && self.excess_gw == 0.0
    }
}

impl fmt::Display for DispatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | load {:.2} GW = must-run {:.2} + hydro {:.2} + H2 flex {:.2} + trade {:.2}",
            self.timestamp,
            self.consumption_gw,
            self.must_run_gw,
            self.hydro_gw,
            self.hydrogen_flex_gw,
            self.trade_gw
        )?;
        if self.shortage_gw > 0.0 {
            write!(f, " | shortage {:.2} GW", self.shortage_gw)?;
        }
        if self.excess_gw > 0.0 {
            write!(f, " | excess {:.2} GW", self.excess_gw)?;
        }
        Ok(())
    }
}
