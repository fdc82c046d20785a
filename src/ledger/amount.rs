use rust_decimal::Decimal;
use std::str::FromStr;

use super::LedgerError;

/// Parses a user-typed amount such as `200`, `12.50`, `$1,250.00` or `-40`.
///
/// The sign is not checked: what an amount may be used for is decided by the
/// operation it is passed to.
pub(crate) fn parse_amount(input: &str) -> Result<Decimal, LedgerError> {
    let trimmed = input.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let digits: String = rest
        .strip_prefix('$')
        .unwrap_or(rest)
        .chars()
        .filter(|c| *c != ',')
        .collect();

    if digits.is_empty() || digits.starts_with(['-', '+']) {
        return Err(LedgerError::Validation(input.to_string()));
    }

    let value =
        Decimal::from_str(&digits).map_err(|_| LedgerError::Validation(input.to_string()))?;
    Ok(if negative { -value } else { value })
}
