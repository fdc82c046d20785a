use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{cents, ExpenseId};

#[derive(Error, Debug)]
pub(crate) enum LedgerError {
    #[error("Please enter a valid number: {0:?}")]
    Validation(String),

    #[error(
        "Transaction amount ${} exceeds remaining budget ${}",
        cents(.requested),
        cents(.available)
    )]
    InsufficientBudget {
        requested: Decimal,
        available: Decimal,
    },

    /// The result does not fit in a `Decimal`.
    #[error("Amount out of range: {0}")]
    Overflow(String),

    #[error("No expense at position {0}")]
    NoExpenseAt(usize),

    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl LedgerError {
    /// Errors a user can fix by changing their input or selection. Anything
    /// else means the store is unusable.
    pub(crate) fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}
