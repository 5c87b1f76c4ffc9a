pub mod error;
pub mod record;

pub use error::BalanceError;
pub use record::HourRecord;

/// Hours in the simulation's nominal year. Annual targets, budgets and
/// per-year reporting all use this fixed length; leap days are not
/// modeled.
pub const HOURS_PER_YEAR: usize = 8760;
