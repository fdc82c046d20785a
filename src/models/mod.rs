mod expense;

pub(crate) use expense::{cents, Expense, ExpenseId};
