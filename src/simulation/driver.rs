//! Simulation driver.
//!
//! Folds the dispatch engine over an hourly input series, threading the
//! reservoir and hydrogen state from one hour into the next. The driver
//! owns the whole run: callers either single-step for interactive use or
//! call [`Simulation::run`] for the full horizon.

use tracing::info;

use crate::dispatch::{DispatchEngine, DispatchResult, HydroReservoir, HydrogenFlex};
use crate::domain::{BalanceError, HOURS_PER_YEAR};
use crate::series::SeriesStore;

use super::SimulationOutput;

#[derive(Debug)]
pub struct Simulation {
    series: SeriesStore,
    engine: DispatchEngine,
    reservoir: HydroReservoir,
    hydrogen: HydrogenFlex,
    cursor: usize,
}

impl Simulation {
    pub fn new(series: SeriesStore, reservoir: HydroReservoir, hydrogen: HydrogenFlex) -> Self {
        Self {
            series,
            engine: DispatchEngine::new(),
            reservoir,
            hydrogen,
            cursor: 0,
        }
    }

    /// Hours in the input series.
    pub fn hours_total(&self) -> usize {
        self.series.len()
    }

    /// Hours dispatched so far.
    pub fn hours_done(&self) -> usize {
        self.cursor
    }

    pub fn reservoir(&self) -> &HydroReservoir {
        &self.reservoir
    }

    pub fn hydrogen(&self) -> &HydrogenFlex {
        &self.hydrogen
    }

    /// Dispatch the next hour. Returns `Ok(None)` once the series is
    /// exhausted; an error aborts the run with all state as of the
    /// failing hour.
    pub fn step(&mut self) -> Result<Option<DispatchResult>, BalanceError> {
        let record = match self.series.record(self.cursor) {
            Some(record) => record,
            None => return Ok(None),
        };

        let result = self
            .engine
            .dispatch_hour(&record, &mut self.reservoir, &mut self.hydrogen)?;
        self.cursor += 1;

        if self.cursor % HOURS_PER_YEAR == 0 {
            info!(
                "Simulated year {}: reservoir {:.1} GWh (spilled {:.1}), hydrogen store {:.1} GWh",
                self.cursor / HOURS_PER_YEAR,
                self.reservoir.stored_gwh(),
                self.reservoir.spilled_gwh(),
                self.hydrogen.store_gwh()
            );
        }

        Ok(Some(result))
    }

    /// Run every remaining hour and collect the output.
    pub fn run(&mut self) -> Result<SimulationOutput, BalanceError> {
        let remaining = self.series.len().saturating_sub(self.cursor);
        self.run_hours(remaining)
    }

    /// Run at most `hours` more hours (fewer if the series ends first).
    pub fn run_hours(&mut self, hours: usize) -> Result<SimulationOutput, BalanceError> {
        let mut results = Vec::with_capacity(hours);
        let mut reservoir_gwh = Vec::with_capacity(hours);
        let mut hydrogen_store_gwh = Vec::with_capacity(hours);

        for _ in 0..hours {
            let result = match self.step()? {
                Some(result) => result,
                None => break,
            };
            results.push(result);
            reservoir_gwh.push(self.reservoir.stored_gwh());
            hydrogen_store_gwh.push(self.hydrogen.store_gwh());
        }

        Ok(SimulationOutput {
            results,
            reservoir_gwh,
            hydrogen_store_gwh,
            reservoir_capacity_gwh: self.reservoir.capacity_gwh(),
            final_reservoir: *self.reservoir.state(),
            final_hydrogen: *self.hydrogen.state(),
        })
    }
}
