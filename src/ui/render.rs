use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use super::app::{App, InputMode};
use super::commands;
use super::theme;
use super::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Length(3), // Budget header
            Constraint::Min(3),    // Expense list
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0]);
    render_budget_header(f, chunks[1], app);
    render_expenses(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);
    render_command_bar(f, chunks[4], app);

    if app.show_summary {
        render_summary_overlay(f, f.area(), app);
    }
    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

/// Rows available to the expense list for a terminal of `height` lines.
pub(crate) fn list_rows(height: u16) -> usize {
    // title + header(3) + status + command + list borders(2)
    (height.saturating_sub(8) as usize).max(1)
}

fn render_title_bar(f: &mut Frame, area: Rect) {
    let date = chrono::Local::now().format("%B %Y").to_string();
    let title = " BudgetLedger";
    let pad = (area.width as usize).saturating_sub(title.len() + date.len() + 1);
    let bar = Paragraph::new(Line::from(vec![
        Span::styled(title, theme::header_style().fg(theme::ACCENT)),
        Span::styled(" ".repeat(pad), theme::header_style()),
        Span::styled(format!("{date} "), theme::header_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_budget_header(f: &mut Frame, area: Rect, app: &App) {
    let spent = match app.total_spent {
        Some(total) => format_amount(total),
        None => "out of range".to_string(),
    };
    let line = Line::from(vec![
        Span::styled(" Current Budget: ", theme::normal_style()),
        Span::styled(format_amount(app.budget), theme::budget_style(app.budget)),
        Span::styled("    Expenses: ", theme::dim_style()),
        Span::styled(app.expenses.len().to_string(), theme::normal_style()),
        Span::styled("    Spent: ", theme::dim_style()),
        Span::styled(spent, theme::expense_style()),
    ]);
    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY)),
    );
    f.render_widget(header, area);
}

fn render_expenses(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Expenses ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    if app.expense_lines.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No expenses recorded", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press b to add budget, a to record an expense",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = app
        .expense_lines
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, line)| {
            let style = if i == app.expense_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            ListItem::new(Line::from(Span::styled(
                format!(" {:<width$}", truncate(line, width)),
                style,
            )))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command => theme::GREEN,
        InputMode::Editing => theme::YELLOW,
        InputMode::Confirm => theme::RED,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let info = match app.selected_expense() {
        Some(_) => format!(" {}/{}", app.expense_index + 1, app.expenses.len()),
        None => String::new(),
    };
    let right = " b budget | a add | D remove | s summary | ? help ";

    let used = mode_label.len() + info.len() + right.len();
    let pad = (area.width as usize).saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Editing => {
            let label = format!("{}> ", app.prompt.map(|p| p.label()).unwrap_or(""));
            let offset = label.chars().count() + app.edit_input.chars().count();
            (
                Line::from(vec![
                    Span::styled(label, Style::default().fg(theme::YELLOW)),
                    Span::styled(&app.edit_input, theme::command_bar_style()),
                ]),
                Some(offset as u16),
            )
        }
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn render_summary_overlay(f: &mut Frame, area: Rect, app: &App) {
    let mut text: Vec<Line> = app
        .summary_text
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let style = if i == 0 {
                theme::normal_style().add_modifier(Modifier::BOLD)
            } else {
                theme::normal_style()
            };
            Line::from(Span::styled(format!(" {line}"), style))
        })
        .collect();
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        " Press any key to close ",
        theme::dim_style(),
    )));

    render_popup(f, area, " Monthly Summary ", text, 60);
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let row = |text: &'static str| Line::from(Span::styled(text, theme::normal_style()));

    let mut help_text = vec![
        section(" Keys"),
        row("  j/k or Up/Down   Move cursor           g/G        Top/Bottom"),
        row("  b                Add to budget         a          Record expense"),
        row("  D / Delete       Remove expense        s          Monthly summary"),
        row("  R                Reset ledger          Ctrl-q     Quit"),
        row("  :                Command mode          Esc        Cancel"),
        Line::from(""),
        section(" Commands"),
    ];

    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 2 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<10} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        theme::dim_style(),
    )));

    render_popup(f, area, " BudgetLedger Help ", help_text, 72);
}

/// Centered bordered popup, clamped to the terminal size.
fn render_popup(f: &mut Frame, area: Rect, title: &str, text: Vec<Line>, width: u16) {
    let popup_height = (text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = width.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let popup = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .title(Span::styled(
                title.to_string(),
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(popup, popup_area);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::ledger::Ledger;
    use crate::store::LedgerStore;
    use ratatui::{backend::TestBackend, Terminal};
    use rust_decimal_macros::dec;

    fn screen_text(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..height {
            for x in 0..width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_list_rows() {
        assert_eq!(list_rows(24), 16);
        assert_eq!(list_rows(3), 1);
    }

    #[test]
    fn test_renders_budget_and_expenses() {
        let mut ledger = Ledger::new(LedgerStore::open_in_memory().unwrap());
        ledger.adjust_budget(dec!(1000)).unwrap();
        ledger.record_expense(dec!(200), "Food", "Groceries").unwrap();
        let mut app = App::new();
        app.refresh(&ledger).unwrap();

        let text = screen_text(&app, 80, 20);
        assert!(text.contains("Current Budget: $800.00"));
        assert!(text.contains("$200.00 - Food: Groceries"));
    }

    #[test]
    fn test_renders_empty_state_and_summary() {
        let ledger = Ledger::new(LedgerStore::open_in_memory().unwrap());
        let mut app = App::new();
        app.refresh(&ledger).unwrap();
        assert!(screen_text(&app, 80, 20).contains("No expenses recorded"));

        app.open_summary(&ledger).unwrap();
        assert!(screen_text(&app, 80, 20).contains("Total Expenses: $0.00"));
    }

    #[test]
    fn test_renders_when_total_overflows() {
        let mut ledger = Ledger::new(LedgerStore::open_in_memory().unwrap());
        ledger.adjust_budget(rust_decimal::Decimal::MAX).unwrap();
        ledger.record_expense(rust_decimal::Decimal::MAX, "A", "a").unwrap();
        ledger.adjust_budget(rust_decimal::Decimal::MAX).unwrap();
        ledger.record_expense(rust_decimal::Decimal::MAX, "B", "b").unwrap();
        let mut app = App::new();
        app.refresh(&ledger).unwrap();

        assert!(screen_text(&app, 100, 20).contains("Spent: out of range"));
    }

    #[test]
    fn test_renders_in_tiny_terminal() {
        let app = App::new();
        screen_text(&app, 10, 4);
    }
}
