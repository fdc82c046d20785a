mod amount;
mod error;

use rust_decimal::Decimal;

use crate::models::{cents, Expense, ExpenseId};
use crate::store::{LedgerOps, LedgerStore, LedgerTx};

pub(crate) use amount::parse_amount;
pub(crate) use error::LedgerError;

pub(crate) type Result<T> = std::result::Result<T, LedgerError>;

/// The budget rule and the display views over a [`LedgerStore`].
///
/// Holds no ledger state of its own; every call reads or writes the store.
/// Mutations take `&mut self`, so there is never more than one in flight.
pub(crate) struct Ledger {
    store: LedgerStore,
}

impl Ledger {
    pub(crate) fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Records an expense if it fits in the remaining budget.
    ///
    /// The budget check, the budget decrement and the insert commit together
    /// or not at all.
    pub(crate) fn record_expense(
        &mut self,
        amount: Decimal,
        category: &str,
        description: &str,
    ) -> Result<ExpenseId> {
        let tx = self.store.begin()?;
        let available = tx.current_budget()?;
        if amount > available {
            tracing::info!(%amount, %available, "expense rejected: insufficient budget");
            return Err(LedgerError::InsufficientBudget {
                requested: amount,
                available,
            });
        }
        apply_to_budget(&tx, -amount)?;
        let id = tx.insert_expense(amount, category, description)?;
        tx.commit()?;
        tracing::info!(id, %amount, category, "expense recorded");
        Ok(id)
    }

    /// Discards the expense at `index` in the current [`Ledger::expenses`]
    /// order and credits its amount back to the budget.
    ///
    /// A stale index yields [`LedgerError::NoExpenseAt`] and changes nothing.
    pub(crate) fn discard_expense(&mut self, index: usize) -> Result<Expense> {
        let expense = self.expense_at(index)?;
        self.discard_expense_by_id(expense.id)
    }

    pub(crate) fn discard_expense_by_id(&mut self, id: ExpenseId) -> Result<Expense> {
        let tx = self.store.begin()?;
        let expense = tx
            .expense_by_id(id)?
            .ok_or(LedgerError::ExpenseNotFound(id))?;
        apply_to_budget(&tx, expense.amount)?;
        tx.delete_expense(id)?;
        tx.commit()?;
        tracing::info!(id, amount = %expense.amount, "expense discarded");
        Ok(expense)
    }

    pub(crate) fn expense_amount_at(&self, index: usize) -> Result<Decimal> {
        Ok(self.expense_at(index)?.amount)
    }

    fn expense_at(&self, index: usize) -> Result<Expense> {
        self.store
            .list_expenses()?
            .into_iter()
            .nth(index)
            .ok_or(LedgerError::NoExpenseAt(index))
    }

    /// Adds `amount` (possibly negative) to the budget. There is no floor.
    pub(crate) fn adjust_budget(&mut self, amount: Decimal) -> Result<Decimal> {
        let tx = self.store.begin()?;
        let updated = apply_to_budget(&tx, amount)?;
        tx.commit()?;
        tracing::info!(delta = %amount, budget = %updated, "budget adjusted");
        Ok(updated)
    }

    pub(crate) fn current_budget(&self) -> Result<Decimal> {
        Ok(self.store.current_budget()?)
    }

    pub(crate) fn expenses(&self) -> Result<Vec<Expense>> {
        Ok(self.store.list_expenses()?)
    }

    pub(crate) fn expense_count(&self) -> Result<i64> {
        Ok(self.store.expense_count()?)
    }

    pub(crate) fn total_expenses(&self) -> Result<Decimal> {
        total_of(&self.expenses()?)
    }

    /// One `$12.50 - Food: Lunch` line per expense, in store order.
    pub(crate) fn formatted_expenses(&self) -> Result<Vec<String>> {
        Ok(self.expenses()?.iter().map(Expense::display_line).collect())
    }

    /// `Total Expenses: $<sum>` followed by one line per expense.
    pub(crate) fn monthly_summary(&self) -> Result<String> {
        let expenses = self.expenses()?;
        let total = total_of(&expenses)?;
        let lines: Vec<String> = expenses.iter().map(Expense::summary_line).collect();
        Ok(format!("Total Expenses: ${}\n{}", cents(&total), lines.join("\n")))
    }

    pub(crate) fn reset_all(&mut self) -> Result<()> {
        self.store.reset_all()?;
        tracing::warn!("ledger reset");
        Ok(())
    }

    pub(crate) fn shutdown(self) -> Result<()> {
        Ok(self.store.shutdown()?)
    }
}

/// Sum of `expenses`. Each one fit the budget when recorded, but top-ups in
/// between mean the total can still exceed what a `Decimal` holds.
pub(crate) fn total_of(expenses: &[Expense]) -> Result<Decimal> {
    expenses.iter().try_fold(Decimal::ZERO, |total, e| {
        total
            .checked_add(e.amount)
            .ok_or_else(|| LedgerError::Overflow("total of all expenses".into()))
    })
}

/// Adds `delta` to the budget inside `tx`, refusing a result that does not fit.
fn apply_to_budget(tx: &LedgerTx<'_>, delta: Decimal) -> Result<Decimal> {
    let current = tx.current_budget()?;
    if current.checked_add(delta).is_none() {
        return Err(LedgerError::Overflow(format!(
            "budget {current} cannot change by {delta}"
        )));
    }
    Ok(tx.adjust_budget(delta)?)
}
