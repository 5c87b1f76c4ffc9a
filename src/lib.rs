pub mod config;
pub mod dispatch;
pub mod domain;
pub mod report;
pub mod scenario;
pub mod series;
pub mod simulation;
pub mod telemetry;

pub use config::Config;
pub use domain::{BalanceError, HourRecord};
pub use report::RunReport;
