use rust_decimal::{Decimal, RoundingStrategy};

pub(crate) type ExpenseId = i64;

/// A single recorded outflow. Rows are immutable once stored; the only way to
/// change one is to discard it and record a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Expense {
    pub id: ExpenseId,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
}

impl Expense {
    /// List form: `$12.50 - Food: Lunch`.
    pub(crate) fn display_line(&self) -> String {
        format!(
            "${} - {}: {}",
            cents(&self.amount),
            self.category,
            self.description
        )
    }

    /// Summary form: `12.5 - Food: Lunch`, `200.0 - Rent: May`.
    pub(crate) fn summary_line(&self) -> String {
        format!(
            "{} - {}: {}",
            plain_amount(&self.amount),
            self.category,
            self.description
        )
    }
}

/// Rounds to whole cents, ties to even, and always prints two places.
/// `Decimal`'s own `{:.2}` truncates, so `0.999` would show as `0.99`.
pub(crate) fn cents(amount: &Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    if rounded.is_zero() {
        // -0.001 rounds to a signed zero
        rounded = Decimal::ZERO;
    }
    format!("{rounded:.2}")
}

/// Shortest exact form with at least one fractional digit, so `12.50` and
/// `12.5` print the same.
fn plain_amount(amount: &Decimal) -> String {
    let normalized = amount.normalize();
    if normalized.scale() == 0 {
        format!("{normalized}.0")
    } else {
        normalized.to_string()
    }
}
