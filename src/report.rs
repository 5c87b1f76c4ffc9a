//! Run Report and Adequacy Statistics
//!
//! Aggregates a finished simulation into per-year energy totals and
//! system-level adequacy figures (shortage hours, exceedance levels,
//! reservoir envelope). This is the summary a scenario comparison works
//! from; the full hourly output stays in [`SimulationOutput`].

use std::cmp::Reverse;
use std::fmt;

use itertools::Itertools;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::dispatch::DispatchResult;
use crate::domain::HOURS_PER_YEAR;
use crate::simulation::SimulationOutput;

const GWH_PER_TWH: f64 = 1000.0;

/// Energy totals for one simulated year (the last year may be partial).
#[derive(Debug, Clone, Serialize)]
pub struct YearReport {
    pub year_index: usize,
    pub hours: usize,
    pub consumption_twh: f64,
    pub must_run_twh: f64,
    /// Net hydro energy (TWh); pumping hours subtract.
    pub hydro_twh: f64,
    /// Energy released to the grid by curtailing hydrogen production.
    pub hydrogen_released_twh: f64,
    /// Energy absorbed from the grid into extra hydrogen production.
    pub hydrogen_absorbed_twh: f64,
    pub import_twh: f64,
    pub export_twh: f64,
    pub shortage_twh: f64,
    pub excess_twh: f64,
    pub shortage_hours: usize,
    pub excess_hours: usize,
    pub peak_shortage_gw: f64,
    pub peak_excess_gw: f64,
}

impl YearReport {
    fn aggregate(year_index: usize, hours: &[DispatchResult]) -> Self {
        let mut report = Self {
            year_index,
            hours: hours.len(),
            consumption_twh: 0.0,
            must_run_twh: 0.0,
            hydro_twh: 0.0,
            hydrogen_released_twh: 0.0,
            hydrogen_absorbed_twh: 0.0,
            import_twh: 0.0,
            export_twh: 0.0,
            shortage_twh: 0.0,
            excess_twh: 0.0,
            shortage_hours: 0,
            excess_hours: 0,
            peak_shortage_gw: 0.0,
            peak_excess_gw: 0.0,
        };

        // One hour at 1 GW is 1 GWh, so summing GW over hours gives GWh.
        for result in hours {
            report.consumption_twh += result.consumption_gw;
            report.must_run_twh += result.must_run_gw;
            report.hydro_twh += result.hydro_gw;
            report.hydrogen_released_twh += result.hydrogen_flex_gw.max(0.0);
            report.hydrogen_absorbed_twh += (-result.hydrogen_flex_gw).max(0.0);
            report.import_twh += result.import_gw();
            report.export_twh += result.export_gw();
            report.shortage_twh += result.shortage_gw;
            report.excess_twh += result.excess_gw;

            if result.shortage_gw > 0.0 {
                report.shortage_hours += 1;
                report.peak_shortage_gw = report.peak_shortage_gw.max(result.shortage_gw);
            }
            if result.excess_gw > 0.0 {
                report.excess_hours += 1;
                report.peak_excess_gw = report.peak_excess_gw.max(result.excess_gw);
            }
        }

        report.consumption_twh /= GWH_PER_TWH;
        report.must_run_twh /= GWH_PER_TWH;
        report.hydro_twh /= GWH_PER_TWH;
        report.hydrogen_released_twh /= GWH_PER_TWH;
        report.hydrogen_absorbed_twh /= GWH_PER_TWH;
        report.import_twh /= GWH_PER_TWH;
        report.export_twh /= GWH_PER_TWH;
        report.shortage_twh /= GWH_PER_TWH;
        report.excess_twh /= GWH_PER_TWH;

        report
    }
}

/// Whole-run summary.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub hours: usize,
    pub years: Vec<YearReport>,
    pub shortage_hours: usize,
    pub excess_hours: usize,
    pub peak_shortage_gw: f64,
    pub peak_excess_gw: f64,
    /// Shortage level exceeded in at most 1% of all hours (GW).
    pub shortage_p99_gw: f64,
    pub reservoir_min_gwh: f64,
    pub reservoir_max_gwh: f64,
    pub reservoir_final_gwh: f64,
    /// Inflow spilled past a full reservoir over the whole run (GWh).
    pub spilled_total_gwh: f64,
    pub hydrogen_released_twh: f64,
    pub hydrogen_absorbed_twh: f64,
    pub hydrogen_store_final_gwh: f64,
}

impl RunReport {
    pub fn from_output(output: &SimulationOutput) -> Self {
        let years = output
            .results
            .chunks(HOURS_PER_YEAR)
            .enumerate()
            .map(|(index, chunk)| YearReport::aggregate(index, chunk))
            .collect::<Vec<_>>();

        let shortage_curve =
            duration_curve(output.results.iter().map(|result| result.shortage_gw));
        let peak_shortage_gw = shortage_curve.first().copied().unwrap_or(0.0);
        let shortage_p99_gw = exceedance_level(&shortage_curve, 0.01);

        let peak_excess_gw = output
            .results
            .iter()
            .map(|result| result.excess_gw)
            .fold(0.0, f64::max);

        let final_level = output.final_reservoir.stored_gwh;
        let reservoir_min_gwh = output.reservoir_gwh.iter().copied().fold(final_level, f64::min);
        let reservoir_max_gwh = output.reservoir_gwh.iter().copied().fold(final_level, f64::max);

        Self {
            hours: output.len(),
            years,
            shortage_hours: output.shortage_hours(),
            excess_hours: output.excess_hours(),
            peak_shortage_gw,
            peak_excess_gw,
            shortage_p99_gw,
            reservoir_min_gwh,
            reservoir_max_gwh,
            reservoir_final_gwh: final_level,
            spilled_total_gwh: output.final_reservoir.spilled_gwh,
            hydrogen_released_twh: output.final_hydrogen.released_total_gwh / GWH_PER_TWH,
            hydrogen_absorbed_twh: output.final_hydrogen.absorbed_total_gwh / GWH_PER_TWH,
            hydrogen_store_final_gwh: output.final_hydrogen.store_gwh,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Run: {} h over {} year(s), shortage {} h (peak {:.2} GW, p99 {:.2} GW), \
             excess {} h (peak {:.2} GW), reservoir {:.0}..{:.0} GWh (final {:.0}, \
             spilled {:.0})",
            self.hours,
            self.years.len(),
            self.shortage_hours,
            self.peak_shortage_gw,
            self.shortage_p99_gw,
            self.excess_hours,
            self.peak_excess_gw,
            self.reservoir_min_gwh,
            self.reservoir_max_gwh,
            self.reservoir_final_gwh,
            self.spilled_total_gwh,
        )
    }
}

/// Values sorted descending: `curve[k]` is the level exceeded in `k`
/// hours. The classic load-duration view of any hourly quantity.
pub fn duration_curve(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    values
        .into_iter()
        .sorted_by_key(|&value| Reverse(OrderedFloat(value)))
        .collect()
}

/// Level exceeded in at most `fraction` of the hours on a descending
/// duration curve.
fn exceedance_level(curve: &[f64], fraction: f64) -> f64 {
    if curve.is_empty() {
        return 0.0;
    }
    let index = ((curve.len() as f64 * fraction) as usize).min(curve.len() - 1);
    curve[index]
}
