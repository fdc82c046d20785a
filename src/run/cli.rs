use anyhow::Result;

use crate::export::{export_expenses, export_path};
use crate::ledger::{parse_amount, Ledger, LedgerError};
use crate::ui::util::format_amount;

pub(crate) fn as_cli(args: &[String], ledger: &mut Ledger) -> Result<()> {
    match args[1].as_str() {
        "budget" | "b" => cli_budget(&args[2..], ledger),
        "add" | "a" => cli_add(&args[2..], ledger),
        "remove" | "rm" => cli_remove(&args[2..], ledger),
        "list" | "ls" => cli_list(ledger),
        "summary" | "s" => cli_summary(ledger),
        "reset" => cli_reset(&args[2..], ledger),
        "export" => cli_export(&args[2..], ledger),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budgetledger {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("BudgetLedger - a local budget and expense ledger");
    println!();
    println!("Usage: budgetledger [--db <path>] [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  budget [amount]               Show the budget, or add to it");
    println!("  add <amount> <category> [description...]");
    println!("                                Record an expense against the budget");
    println!("  remove <n>                    Remove expense #n and refund its amount");
    println!("  list                          List expenses with their numbers");
    println!("  summary                       Print the monthly summary");
    println!("  reset --yes                   Erase every expense and zero the budget");
    println!("  export [path]                 Export expenses to CSV");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn cli_budget(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let budget = match args.first() {
        Some(input) => ledger.adjust_budget(parse_amount(input)?)?,
        None => ledger.current_budget()?,
    };
    println!("Current Budget: {}", format_amount(budget));
    Ok(())
}

fn cli_add(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let [amount, category, description @ ..] = args else {
        anyhow::bail!("Usage: budgetledger add <amount> <category> [description...]");
    };
    let amount = parse_amount(amount)?;
    let description = description.join(" ");
    ledger.record_expense(amount, category, &description)?;
    println!("Transaction added: {} {category}", format_amount(amount));
    println!("Current Budget: {}", format_amount(ledger.current_budget()?));
    Ok(())
}

fn cli_remove(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let Some(arg) = args.first() else {
        anyhow::bail!("Usage: budgetledger remove <n>");
    };
    let position: usize = arg
        .parse()
        .map_err(|_| anyhow::anyhow!("Not an expense number: {arg}"))?;

    // Positions are shown 1-based by `list`.
    let index = position
        .checked_sub(1)
        .ok_or(LedgerError::NoExpenseAt(position))?;
    let amount = match ledger.expense_amount_at(index) {
        Err(LedgerError::NoExpenseAt(_)) => {
            anyhow::bail!("No expense #{position}; run `budgetledger list` to see them")
        }
        other => other?,
    };
    let removed = ledger.discard_expense(index)?;
    println!("Removed: {}", removed.display_line());
    println!(
        "Refunded {}; Current Budget: {}",
        format_amount(amount),
        format_amount(ledger.current_budget()?)
    );
    Ok(())
}

fn cli_list(ledger: &mut Ledger) -> Result<()> {
    let lines = ledger.formatted_expenses()?;
    if lines.is_empty() {
        println!("No expenses recorded");
    }
    for (i, line) in lines.iter().enumerate() {
        println!("{:>4}. {line}", i + 1);
    }
    println!();
    println!("Current Budget: {}", format_amount(ledger.current_budget()?));
    Ok(())
}

fn cli_summary(ledger: &mut Ledger) -> Result<()> {
    let month = chrono::Local::now().format("%B %Y");
    println!("Summary for {month}");
    println!("{}", "─".repeat(40));
    println!("{}", ledger.monthly_summary()?);
    Ok(())
}

fn cli_reset(args: &[String], ledger: &mut Ledger) -> Result<()> {
    if !args.iter().any(|a| a == "--yes" || a == "-y") {
        anyhow::bail!("Refusing to reset without --yes; this erases every expense and the budget");
    }
    ledger.reset_all()?;
    println!("Ledger reset");
    Ok(())
}

fn cli_export(args: &[String], ledger: &mut Ledger) -> Result<()> {
    let path = export_path(args.first().map(String::as_str));
    let count = export_expenses(&ledger.expenses()?, &path)?;
    if count == 0 {
        println!("No expenses to export; wrote header to {}", path.display());
    } else {
        println!("Exported {count} expenses to {}", path.display());
    }
    Ok(())
}
