use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, Prompt};
use crate::export::{export_expenses, export_path};
use crate::ledger::{parse_amount, Ledger};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Ledger) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit BudgetLedger", cmd_quit, r);
    register_command!("quit", "Quit BudgetLedger", cmd_quit, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "budget",
        "Add to (or subtract from) the budget (e.g. :budget 500)",
        cmd_budget,
        r
    );
    register_command!("b", "Add to the budget (e.g. :b -50)", cmd_budget, r);
    register_command!(
        "add",
        "Record expense (e.g. :add 12.50 Food Lunch downtown)",
        cmd_add,
        r
    );
    register_command!("a", "Record expense (e.g. :a 4 Coffee)", cmd_add, r);
    register_command!("remove", "Remove selected expense", cmd_remove, r);
    register_command!("rm", "Remove selected expense", cmd_remove, r);
    register_command!("summary", "Show expense summary", cmd_summary, r);
    register_command!("s", "Show expense summary", cmd_summary, r);
    register_command!(
        "reset",
        "Erase all expenses and zero the budget",
        cmd_reset,
        r
    );
    register_command!(
        "export",
        "Export expenses to CSV (e.g. :export ~/expenses.csv)",
        cmd_export,
        r
    );

    r
});

pub(crate) fn handle_command(
    input: &str,
    app: &mut App,
    ledger: &mut Ledger,
) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, ledger)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Splits `<amount> <category> [description...]`.
pub(crate) fn split_expense_args(args: &str) -> Option<(&str, &str, &str)> {
    let mut parts = args.trim().splitn(3, char::is_whitespace);
    let amount = parts.next().filter(|s| !s.is_empty())?;
    let category = parts.next().filter(|s| !s.is_empty())?;
    let description = parts.next().unwrap_or("").trim();
    Some((amount, category, description))
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    if args.is_empty() {
        app.begin_prompt(Prompt::BudgetDelta);
        return Ok(());
    }
    app.add_budget(ledger, args)
}

fn cmd_add(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    if args.is_empty() {
        app.begin_prompt(Prompt::ExpenseAmount);
        return Ok(());
    }
    let Some((amount, category, description)) = split_expense_args(args) else {
        app.set_status("Usage: :add <amount> <category> [description]");
        return Ok(());
    };
    match parse_amount(amount) {
        Ok(amount) => app.record_expense(ledger, amount, category, description),
        Err(e) => {
            app.set_status(format!("Error: {e}"));
            Ok(())
        }
    }
}

fn cmd_remove(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.request_discard();
    Ok(())
}

fn cmd_summary(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    app.open_summary(ledger)
}

fn cmd_reset(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.request_reset();
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let path = export_path(Some(args));
    let expenses = ledger.expenses()?;
    match export_expenses(&expenses, &path) {
        Ok(0) => app.set_status(format!(
            "No expenses to export; wrote header to {}",
            path.display()
        )),
        Ok(count) => app.set_status(format!(
            "Exported {count} expenses to {}",
            path.display()
        )),
        Err(e) => app.set_status(format!("Export failed: {e:#}")),
    }
    Ok(())
}
