//! Input Validation
//!
//! Local checks applied to user input before any store call. The prompt layer
//! runs the same functions inline so a failure re-prompts instead of aborting
//! the action.
//!
//! Only local checks live here: non-empty text, and a positive salary that
//! fits a `DECIMAL(10, 2)` column.
//! Referential validity (existing department, role, manager) is guaranteed by
//! presenting only valid choices and, ultimately, by the store's constraints.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{Result, TrackerError};

/// Trim `input` and reject it if nothing is left
///
/// `field` names the value in the error message (e.g. "Department name").
pub fn non_empty(input: &str, field: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Largest salary a `DECIMAL(10, 2)` column holds
/// (mantissa 9_999_999_999 = 0x2_540B_E3FF, scale 2 => 99,999,999.99)
pub const MAX_SALARY: Decimal = Decimal::from_parts(0x540B_E3FF, 0x2, 0, false, 2);

/// Reject salaries the `DECIMAL(10, 2)` column cannot hold exactly
///
/// Zero, negatives, sub-cent amounts and anything above [`MAX_SALARY`] fail;
/// a stored salary is therefore always the value that was typed.
pub fn positive_salary(salary: Decimal) -> Result<Decimal> {
    if salary <= Decimal::ZERO {
        return Err(TrackerError::validation("Salary must be greater than zero"));
    }
    if salary.normalize().scale() > 2 {
        return Err(TrackerError::validation("Salary cannot have more than two decimal places"));
    }
    if salary > MAX_SALARY {
        return Err(TrackerError::validation("Salary cannot exceed 99,999,999.99"));
    }
    Ok(salary)
}

/// Parse a salary typed by the user
///
/// Accepts plain decimals with an optional leading `$` and `,` digit
/// grouping (`80000`, `80,000.50`, `$95000`).
pub fn parse_salary(input: &str) -> Result<Decimal> {
    let cleaned: String =
        input.trim().trim_start_matches('$').chars().filter(|c| *c != ',').collect();

    if cleaned.is_empty() {
        return Err(TrackerError::validation("Please enter a valid salary"));
    }

    let salary = Decimal::from_str(&cleaned)
        .map_err(|_| TrackerError::validation("Please enter a valid salary"))?;

    positive_salary(salary)
}
