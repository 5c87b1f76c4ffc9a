use chrono::{Duration, NaiveDateTime};

use crate::domain::{BalanceError, HourRecord};

/// Named column of the store.
///
/// Scenario transforms address columns through this enum so that series
/// shaping stays outside the dispatch algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesColumn {
    Consumption,
    MustRun,
    HydroInflow,
    TradeLimit,
    HydroMin,
    HydroMax,
}

/// Aligned hourly input series for one simulation run.
///
/// All columns share one timeline: strictly increasing timestamps exactly
/// one hour apart. Alignment is enforced at construction; per-hour value
/// checks happen in the dispatch engine so a run aborts at the offending
/// hour.
#[derive(Debug, Clone)]
pub struct SeriesStore {
    timestamps: Vec<NaiveDateTime>,
    consumption_gw: Vec<f64>,
    must_run_gw: Vec<f64>,
    hydro_inflow_gw: Vec<f64>,
    trade_limit_gw: Vec<f64>,
    hydro_min_gw: Vec<f64>,
    hydro_max_gw: Vec<f64>,
}

impl SeriesStore {
    /// Start building a store with `hours` zero-filled columns and a
    /// generated timeline beginning at `start`.
    pub fn builder(start: NaiveDateTime, hours: usize) -> SeriesBuilder {
        SeriesBuilder::new(start, hours)
    }

    /// Build a store from prepared records, validating the timeline.
    pub fn from_records(records: &[HourRecord]) -> Result<Self, BalanceError> {
        if records.is_empty() {
            return Err(BalanceError::InvalidInput("timeline is empty".to_string()));
        }

        for window in records.windows(2) {
            let step = window[1].timestamp - window[0].timestamp;
            if step != Duration::hours(1) {
                return Err(BalanceError::InvalidInput(format!(
                    "timeline is not hourly-monotonic: {} is followed by {}",
                    window[0].timestamp, window[1].timestamp
                )));
            }
        }

        Ok(Self {
            timestamps: records.iter().map(|r| r.timestamp).collect(),
            consumption_gw: records.iter().map(|r| r.consumption_gw).collect(),
            must_run_gw: records.iter().map(|r| r.must_run_gw).collect(),
            hydro_inflow_gw: records.iter().map(|r| r.hydro_inflow_gw).collect(),
            trade_limit_gw: records.iter().map(|r| r.trade_limit_gw).collect(),
            hydro_min_gw: records.iter().map(|r| r.hydro_min_gw).collect(),
            hydro_max_gw: records.iter().map(|r| r.hydro_max_gw).collect(),
        })
    }

    /// Number of hours in the timeline.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// First hour of the timeline.
    pub fn start(&self) -> NaiveDateTime {
        self.timestamps[0]
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Assemble the record for one hour, or `None` past the end.
    pub fn record(&self, hour: usize) -> Option<HourRecord> {
        if hour >= self.len() {
            return None;
        }
        Some(HourRecord {
            timestamp: self.timestamps[hour],
            consumption_gw: self.consumption_gw[hour],
            must_run_gw: self.must_run_gw[hour],
            hydro_inflow_gw: self.hydro_inflow_gw[hour],
            trade_limit_gw: self.trade_limit_gw[hour],
            hydro_min_gw: self.hydro_min_gw[hour],
            hydro_max_gw: self.hydro_max_gw[hour],
        })
    }

    /// Iterate the timeline as records.
    pub fn iter(&self) -> impl Iterator<Item = HourRecord> + '_ {
        self.timestamps
            .iter()
            .enumerate()
            .map(move |(hour, &timestamp)| HourRecord {
                timestamp,
                consumption_gw: self.consumption_gw[hour],
                must_run_gw: self.must_run_gw[hour],
                hydro_inflow_gw: self.hydro_inflow_gw[hour],
                trade_limit_gw: self.trade_limit_gw[hour],
                hydro_min_gw: self.hydro_min_gw[hour],
                hydro_max_gw: self.hydro_max_gw[hour],
            })
    }

    pub fn column(&self, column: SeriesColumn) -> &[f64] {
        match column {
            SeriesColumn::Consumption => &self.consumption_gw,
            SeriesColumn::MustRun => &self.must_run_gw,
            SeriesColumn::HydroInflow => &self.hydro_inflow_gw,
            SeriesColumn::TradeLimit => &self.trade_limit_gw,
            SeriesColumn::HydroMin => &self.hydro_min_gw,
            SeriesColumn::HydroMax => &self.hydro_max_gw,
        }
    }

    /// Mutable column access for pre-run scenario transforms. Records
    /// handed to the engine are immutable snapshots, so mutation after a
    /// run has started only affects a later, separate run.
    pub fn column_mut(&mut self, column: SeriesColumn) -> &mut [f64] {
        match column {
            SeriesColumn::Consumption => &mut self.consumption_gw,
            SeriesColumn::MustRun => &mut self.must_run_gw,
            SeriesColumn::HydroInflow => &mut self.hydro_inflow_gw,
            SeriesColumn::TradeLimit => &mut self.trade_limit_gw,
            SeriesColumn::HydroMin => &mut self.hydro_min_gw,
            SeriesColumn::HydroMax => &mut self.hydro_max_gw,
        }
    }
}

/// Builder for [`SeriesStore`].
///
/// Columns default to zero; uniform setters broadcast a scalar across the
/// whole timeline, series setters take one value per hour. Length
/// mismatches surface once, in [`SeriesBuilder::build`].
#[derive(Debug, Clone)]
pub struct SeriesBuilder {
    start: NaiveDateTime,
    hours: usize,
    consumption_gw: Vec<f64>,
    must_run_gw: Vec<f64>,
    hydro_inflow_gw: Vec<f64>,
    trade_limit_gw: Vec<f64>,
    hydro_min_gw: Vec<f64>,
    hydro_max_gw: Vec<f64>,
}

impl SeriesBuilder {
    pub fn new(start: NaiveDateTime, hours: usize) -> Self {
        Self {
            start,
            hours,
            consumption_gw: vec![0.0; hours],
            must_run_gw: vec![0.0; hours],
            hydro_inflow_gw: vec![0.0; hours],
            trade_limit_gw: vec![0.0; hours],
            hydro_min_gw: vec![0.0; hours],
            hydro_max_gw: vec![0.0; hours],
        }
    }

    pub fn with_consumption(mut self, series: Vec<f64>) -> Self {
        self.consumption_gw = series;
        self
    }

    pub fn with_must_run(mut self, series: Vec<f64>) -> Self {
        self.must_run_gw = series;
        self
    }

    pub fn with_hydro_inflow(mut self, series: Vec<f64>) -> Self {
        self.hydro_inflow_gw = series;
        self
    }

    /// Same trade limit for every hour.
    pub fn with_trade_limit(mut self, limit_gw: f64) -> Self {
        self.trade_limit_gw = vec![limit_gw; self.hours];
        self
    }

    pub fn with_trade_limit_series(mut self, series: Vec<f64>) -> Self {
        self.trade_limit_gw = series;
        self
    }

    /// Same hydro dispatch bounds for every hour.
    pub fn with_hydro_bounds(mut self, min_gw: f64, max_gw: f64) -> Self {
        self.hydro_min_gw = vec![min_gw; self.hours];
        self.hydro_max_gw = vec![max_gw; self.hours];
        self
    }

    pub fn with_hydro_bounds_series(mut self, min_gw: Vec<f64>, max_gw: Vec<f64>) -> Self {
        self.hydro_min_gw = min_gw;
        self.hydro_max_gw = max_gw;
        self
    }

    pub fn build(self) -> Result<SeriesStore, BalanceError> {
        if self.hours == 0 {
            return Err(BalanceError::InvalidInput("timeline is empty".to_string()));
        }

        let columns = [
            ("consumption", self.consumption_gw.len()),
            ("must_run", self.must_run_gw.len()),
            ("hydro_inflow", self.hydro_inflow_gw.len()),
            ("trade_limit", self.trade_limit_gw.len()),
            ("hydro_min", self.hydro_min_gw.len()),
            ("hydro_max", self.hydro_max_gw.len()),
        ];
        for (name, len) in columns {
            if len != self.hours {
                return Err(BalanceError::InvalidInput(format!(
                    "column {} has {} values, timeline has {} hours",
                    name, len, self.hours
                )));
            }
        }

        let timestamps = (0..self.hours)
            .map(|hour| self.start + Duration::hours(hour as i64))
            .collect();

        Ok(SeriesStore {
            timestamps,
            consumption_gw: self.consumption_gw,
            must_run_gw: self.must_run_gw,
            hydro_inflow_gw: self.hydro_inflow_gw,
            trade_limit_gw: self.trade_limit_gw,
            hydro_min_gw: self.hydro_min_gw,
            hydro_max_gw: self.hydro_max_gw,
        })
    }
}
