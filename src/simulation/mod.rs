//! # Simulation Module
//!
//! Drives the hourly dispatch over a multi-year horizon and generates the
//! synthetic input series a scenario needs.
//!
//! ## Components
//!
//! - **Profiles**: Seasonal consumption and must-run shapes, the empirical
//!   reservoir inflow curve, and a seeded stochastic wind series
//! - **Driver**: Folds the dispatch engine over the input series while
//!   threading reservoir and hydrogen state from hour to hour
//! - **Output**: Collected per-hour results, storage traces, and a
//!   release-mode audit of the balance invariants
//!
//! ## Usage
//!
//! ```rust
//! use power_balance_sim::dispatch::{HydroReservoir, HydrogenFlex, ReservoirParams};
//! use power_balance_sim::simulation::{SeasonalProfile, Simulation};
//! use power_balance_sim::series::SeriesStore;
//! use chrono::NaiveDate;
//!
//! let hours = 24;
//! let start = NaiveDate::from_ymd_opt(2030, 1, 1)
//!     .unwrap()
//!     .and_hms_opt(0, 0, 0)
//!     .unwrap();
//!
//! let series = SeriesStore::builder(start, hours)
//!     .with_consumption(SeasonalProfile::new(32.25, 4.0).generate(hours))
//!     .with_must_run(vec![12.0; hours])
//!     .with_hydro_inflow(vec![4.0; hours])
//!     .with_trade_limit(6.0)
//!     .with_hydro_bounds(2.0, 13.0)
//!     .build()
//!     .unwrap();
//!
//! let reservoir = HydroReservoir::new(ReservoirParams::default()).unwrap();
//! let mut sim = Simulation::new(series, reservoir, HydrogenFlex::idle());
//!
//! let output = sim.run().unwrap();
//! assert_eq!(output.len(), hours);
//! ```

pub mod driver;
pub mod output;
pub mod profiles;

pub use driver::Simulation;
pub use output::SimulationOutput;
pub use profiles::{inflow_at, inflow_profile, SeasonalProfile, WindProfileConfig};
