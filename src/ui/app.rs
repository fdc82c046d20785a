use anyhow::Result;
use rust_decimal::Decimal;

use crate::ledger::{self, parse_amount, Ledger};
use crate::models::{cents, Expense, ExpenseId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// The question the edit line is currently answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prompt {
    BudgetDelta,
    ExpenseAmount,
    ExpenseCategory,
    ExpenseDescription,
}

impl Prompt {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::BudgetDelta => "budget +/-",
            Self::ExpenseAmount => "amount",
            Self::ExpenseCategory => "category",
            Self::ExpenseDescription => "description",
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DiscardExpense { id: ExpenseId, label: String },
    ResetAll,
}

/// Fields collected so far by the add-expense prompts.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExpenseDraft {
    pub(crate) amount: Option<Decimal>,
    pub(crate) category: String,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) edit_input: String,
    pub(crate) prompt: Option<Prompt>,
    pub(crate) draft: ExpenseDraft,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) show_summary: bool,
    pub(crate) summary_text: String,

    // Ledger view, re-read after every mutation
    pub(crate) budget: Decimal,
    pub(crate) expenses: Vec<Expense>,
    pub(crate) expense_lines: Vec<String>,
    /// `None` when the total does not fit in a `Decimal`.
    pub(crate) total_spent: Option<Decimal>,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            edit_input: String::new(),
            prompt: None,
            draft: ExpenseDraft::default(),
            status_message: String::new(),
            show_help: false,
            show_summary: false,
            summary_text: String::new(),

            budget: Decimal::ZERO,
            expenses: Vec::new(),
            expense_lines: Vec::new(),
            total_spent: Some(Decimal::ZERO),
            expense_index: 0,
            expense_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn refresh(&mut self, ledger: &Ledger) -> Result<()> {
        self.budget = ledger.current_budget()?;
        self.expenses = ledger.expenses()?;
        self.expense_lines = self.expenses.iter().map(Expense::display_line).collect();
        self.total_spent = ledger::total_of(&self.expenses).ok();
        if self.expense_index >= self.expenses.len() {
            self.expense_index = self.expenses.len().saturating_sub(1);
        }
        if self.expense_scroll > self.expense_index {
            self.expense_scroll = self.expense_index;
        }
        Ok(())
    }

    pub(crate) fn selected_expense(&self) -> Option<&Expense> {
        self.expenses.get(self.expense_index)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Shows recoverable ledger errors in the status line. Storage errors are
    /// passed up and end the session.
    fn report<T>(&mut self, result: ledger::Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_recoverable() => {
                self.set_status(format!("Error: {e}"));
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    // ── Prompts ───────────────────────────────────────────────

    pub(crate) fn begin_prompt(&mut self, prompt: Prompt) {
        if prompt == Prompt::ExpenseAmount {
            self.draft = ExpenseDraft::default();
        }
        self.prompt = Some(prompt);
        self.edit_input.clear();
        self.input_mode = InputMode::Editing;
    }

    pub(crate) fn cancel_prompt(&mut self) {
        self.prompt = None;
        self.draft = ExpenseDraft::default();
        self.edit_input.clear();
        self.input_mode = InputMode::Normal;
        self.set_status("Cancelled");
    }

    /// Consumes the edit line for the active prompt, moving on to the next
    /// prompt or committing to the ledger.
    pub(crate) fn submit_prompt(&mut self, ledger: &mut Ledger) -> Result<()> {
        let input = std::mem::take(&mut self.edit_input);
        let Some(prompt) = self.prompt.take() else {
            self.input_mode = InputMode::Normal;
            return Ok(());
        };
        self.input_mode = InputMode::Normal;

        match prompt {
            Prompt::BudgetDelta => self.add_budget(ledger, &input)?,
            Prompt::ExpenseAmount => {
                if let Some(amount) = self.report(parse_amount(&input))? {
                    self.draft.amount = Some(amount);
                    self.begin_prompt(Prompt::ExpenseCategory);
                }
            }
            Prompt::ExpenseCategory => {
                self.draft.category = input.trim().to_string();
                self.begin_prompt(Prompt::ExpenseDescription);
            }
            Prompt::ExpenseDescription => {
                let draft = std::mem::take(&mut self.draft);
                if let Some(amount) = draft.amount {
                    self.record_expense(ledger, amount, &draft.category, input.trim())?;
                }
            }
        }
        Ok(())
    }

    // ── Ledger actions ────────────────────────────────────────

    pub(crate) fn add_budget(&mut self, ledger: &mut Ledger, input: &str) -> Result<()> {
        let Some(delta) = self.report(parse_amount(input))? else {
            return Ok(());
        };
        if let Some(budget) = self.report(ledger.adjust_budget(delta))? {
            self.refresh(ledger)?;
            self.set_status(format!("Budget updated: ${}", cents(&budget)));
        }
        Ok(())
    }

    pub(crate) fn record_expense(
        &mut self,
        ledger: &mut Ledger,
        amount: Decimal,
        category: &str,
        description: &str,
    ) -> Result<()> {
        if self
            .report(ledger.record_expense(amount, category, description))?
            .is_some()
        {
            self.refresh(ledger)?;
            self.expense_index = self.expenses.len().saturating_sub(1);
            self.set_status(format!(
                "Transaction added: ${} {category}",
                cents(&amount)
            ));
        }
        Ok(())
    }

    pub(crate) fn request_discard(&mut self) {
        let (id, label) = match self.selected_expense() {
            Some(expense) => (expense.id, expense.display_line()),
            None => {
                self.set_status("Select an expense to remove");
                return;
            }
        };
        self.confirm_message = format!("Remove {label}?");
        self.pending_action = Some(PendingAction::DiscardExpense { id, label });
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn request_reset(&mut self) {
        self.confirm_message = "Erase every expense and zero the budget?".into();
        self.pending_action = Some(PendingAction::ResetAll);
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn confirm(&mut self, ledger: &mut Ledger) -> Result<()> {
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
        match self.pending_action.take() {
            Some(PendingAction::DiscardExpense { id, label }) => {
                if self.report(ledger.discard_expense_by_id(id))?.is_some() {
                    self.set_status(format!("Removed: {label}"));
                }
                self.refresh(ledger)?;
            }
            Some(PendingAction::ResetAll) => {
                ledger.reset_all()?;
                self.expense_index = 0;
                self.expense_scroll = 0;
                self.refresh(ledger)?;
                self.set_status("Ledger reset");
            }
            None => {}
        }
        Ok(())
    }

    pub(crate) fn cancel_confirm(&mut self) {
        self.pending_action = None;
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
        self.set_status("Cancelled");
    }

    pub(crate) fn open_summary(&mut self, ledger: &Ledger) -> Result<()> {
        if let Some(text) = self.report(ledger.monthly_summary())? {
            self.summary_text = text;
            self.show_summary = true;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
