/// Merit-Order Dispatch
///
/// The core of the simulator: per-hour balancing of consumption against
/// must-run generation, flexible hydro, hydrogen flex and cross-border
/// trade, with shortage/excess as the explicit residual. The two storage
/// models own the state that threads from one hour to the next.

pub mod engine;
pub mod hydrogen;
pub mod reservoir;
pub mod result;

pub use engine::DispatchEngine;
pub use hydrogen::{HydrogenFlex, HydrogenParams, HydrogenState};
pub use reservoir::{HydroReservoir, ReservoirParams, ReservoirState};
pub use result::{DispatchResult, BALANCE_TOLERANCE_GW};
