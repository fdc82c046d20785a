mod schema;

use anyhow::{bail, Context, Result};
use rusqlite::types::{Type, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::{Expense, ExpenseId};

use schema::BUDGET_ID;

/// Durable home of the budget row and the expense table.
///
/// The connection is owned here and nowhere else. It is released when the
/// store is dropped, or explicitly through [`LedgerStore::shutdown`] when the
/// caller wants to see close errors.
pub(crate) struct LedgerStore {
    conn: Connection,
}

/// A unit of work over the store. Rolls back on drop unless committed.
pub(crate) struct LedgerTx<'a> {
    tx: Transaction<'a>,
}

impl LedgerStore {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut store = Self { conn };
        store.initialize()?;
        tracing::debug!(path = %path.display(), "ledger store opened");
        Ok(store)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Creates or migrates the schema and makes sure the budget row exists.
    /// Safe to run on every startup.
    pub(crate) fn initialize(&mut self) -> Result<()> {
        self.migrate().context("Database migration failed")?;
        self.conn
            .execute(
                "INSERT OR IGNORE INTO budget (id, amount) VALUES (?1, '0')",
                params![BUDGET_ID],
            )
            .context("Failed to initialize budget")?;
        Ok(())
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh file, or one from before versioning. Every statement in
            // the base schema is IF NOT EXISTS, so existing tables are kept.
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        if current > schema::CURRENT_VERSION {
            bail!(
                "Database schema version {current} is newer than supported version {}",
                schema::CURRENT_VERSION
            );
        }

        let tx = self.conn.transaction()?;
        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tx.execute_batch(sql)?;
            }
        }
        if current < schema::CURRENT_VERSION {
            tx.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }
        tx.commit()?;

        Ok(())
    }

    pub(crate) fn begin(&mut self) -> Result<LedgerTx<'_>> {
        let tx = self
            .conn
            .transaction()
            .context("Failed to begin transaction")?;
        Ok(LedgerTx { tx })
    }

    /// Drops every expense, zeroes the budget and restarts expense ids at 1.
    pub(crate) fn reset_all(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM expenses", [])?;
        tx.execute(
            "INSERT OR REPLACE INTO budget (id, amount) VALUES (?1, '0')",
            params![BUDGET_ID],
        )?;
        tx.execute("DELETE FROM sqlite_sequence WHERE name = 'expenses'", [])?;
        tx.commit().context("Failed to reset ledger")?;
        Ok(())
    }

    pub(crate) fn shutdown(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close database")
    }
}

impl LedgerTx<'_> {
    pub(crate) fn commit(self) -> Result<()> {
        self.tx.commit().context("Failed to commit transaction")
    }
}

/// Row-level ledger operations, available on the store directly and inside
/// a [`LedgerTx`].
///
/// None of these interpret business rules. Budget adjustment is a
/// read-modify-write; callers needing it to line up with other writes run it
/// inside a transaction.
pub(crate) trait LedgerOps {
    fn conn(&self) -> &Connection;

    fn insert_expense(
        &self,
        amount: Decimal,
        category: &str,
        description: &str,
    ) -> Result<ExpenseId> {
        self.conn()
            .execute(
                "INSERT INTO expenses (amount, category, description) VALUES (?1, ?2, ?3)",
                params![amount.to_string(), category, description],
            )
            .context("Failed to insert expense")?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Returns whether a row was removed. Unknown ids are not an error.
    fn delete_expense(&self, id: ExpenseId) -> Result<bool> {
        let removed = self
            .conn()
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])
            .context("Failed to delete expense")?;
        Ok(removed > 0)
    }

    /// All expenses in insertion order.
    fn list_expenses(&self) -> Result<Vec<Expense>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id, amount, category, description FROM expenses ORDER BY id")?;
        let rows = stmt.query_map([], expense_from_row)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to read expenses")
    }

    fn expense_by_id(&self, id: ExpenseId) -> Result<Option<Expense>> {
        self.conn()
            .query_row(
                "SELECT id, amount, category, description FROM expenses WHERE id = ?1",
                params![id],
                expense_from_row,
            )
            .optional()
            .with_context(|| format!("Failed to read expense {id}"))
    }

    fn expense_count(&self) -> Result<i64> {
        Ok(self
            .conn()
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }

    fn current_budget(&self) -> Result<Decimal> {
        self.conn()
            .query_row(
                "SELECT amount FROM budget WHERE id = ?1",
                params![BUDGET_ID],
                |row| decimal_column(row, 0),
            )
            .context("Failed to read budget")
    }

    /// Adds `delta` to the budget and returns the new value.
    fn adjust_budget(&self, delta: Decimal) -> Result<Decimal> {
        let current = self.current_budget()?;
        let Some(updated) = current.checked_add(delta) else {
            bail!("Budget overflow adding {delta} to {current}");
        };
        self.conn()
            .execute(
                "UPDATE budget SET amount = ?1 WHERE id = ?2",
                params![updated.to_string(), BUDGET_ID],
            )
            .context("Failed to update budget")?;
        Ok(updated)
    }
}

impl LedgerOps for LedgerStore {
    fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl LedgerOps for LedgerTx<'_> {
    fn conn(&self) -> &Connection {
        &self.tx
    }
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        amount: decimal_column(row, 1)?,
        category: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    })
}

/// Reads an amount column. TEXT is the current layout; INTEGER and REAL come
/// from files written before amounts were stored as text.
fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let conversion = |ty: Type, e: Box<dyn std::error::Error + Send + Sync>| {
        rusqlite::Error::FromSqlConversionFailure(idx, ty, e)
    };
    match row.get_ref(idx)? {
        ValueRef::Text(bytes) => {
            let text =
                std::str::from_utf8(bytes).map_err(|e| conversion(Type::Text, Box::new(e)))?;
            Decimal::from_str(text.trim()).map_err(|e| conversion(Type::Text, Box::new(e)))
        }
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Real(f) => Decimal::try_from(f).map_err(|e| conversion(Type::Real, Box::new(e))),
        other => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "amount".into(),
            other.data_type(),
        )),
    }
}

#[cfg(test)]
mod tests;
