use thiserror::Error;

/// Simulation errors.
///
/// Power imbalance (shortage/excess) is deliberately absent here: an hour
/// that cannot be balanced is a first-class simulation outcome, not an
/// error. Errors are reserved for inputs that are structurally wrong and
/// for storage accounting that ends up out of bounds after clamping.
#[derive(Debug, Clone, Error)]
pub enum BalanceError {
    /// Structural violation in configuration, a series, or an hour record.
    /// Fatal: the run stops at the offending hour.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A reservoir or hydrogen bound was breached after all clamping.
    /// The dispatch clamps make this unreachable for valid inputs, so
    /// seeing it means the accounting itself is wrong.
    #[error("infeasible storage state: {0}")]
    InfeasibleStorage(String),
}

impl BalanceError {
    /// True for the input-validation variant.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, BalanceError::InvalidInput(_))
    }
}
