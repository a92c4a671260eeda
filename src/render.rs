//! Terminal Rendering
//!
//! Turns repository results into the text the controller prints: tables for
//! listings, a currency format for salaries and budgets, and the banner.
//! Everything here is pure (returns `String`) so output can be asserted on.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{
    Department, DepartmentBudget, DepartmentEmployee, EmployeeListing, ManagedEmployee,
    RoleListing,
};

/// Startup banner
pub const BANNER: &str = r"
 ___                 _                        _____                _
| __|_ __  _ __  ___| |___ _  _ ___ ___      |_   _| _ __ _ __ | |_____ _ _
| _|| '  \| '_ \/ _ \ / _ \ || / -_) -_)       | || '_/ _` / _|| / / -_) '_|
|___|_|_|_| .__/\___/_\___/\_, \___\___|       |_||_| \__,_\__||_\_\___|_|
          |_|              |__/
";

/// Placeholder for an employee without a manager
pub const NO_MANAGER: &str = "None";

/// Format an amount as dollars with digit grouping and two decimals
///
/// `200000` becomes `$200,000.00`, `-1234.5` becomes `-$1,234.50`.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().copied());
    table
}

fn money_cell(amount: Decimal) -> Cell {
    Cell::new(format_currency(amount)).set_alignment(CellAlignment::Right)
}

/// Render a listing, or a short notice when it has no rows
fn finish(table: Table, rows: usize, empty_notice: &str) -> String {
    if rows == 0 {
        empty_notice.to_string()
    } else {
        table.to_string()
    }
}

#[must_use]
pub fn departments_table(departments: &[Department]) -> String {
    let mut table = new_table(&["id", "name"]);
    for dept in departments {
        table.add_row(vec![Cell::new(dept.id), Cell::new(&dept.name)]);
    }
    finish(table, departments.len(), "No departments found.")
}

#[must_use]
pub fn roles_table(roles: &[RoleListing]) -> String {
    let mut table = new_table(&["id", "title", "salary", "department"]);
    for role in roles {
        table.add_row(vec![
            Cell::new(role.id),
            Cell::new(&role.title),
            money_cell(role.salary),
            Cell::new(&role.department),
        ]);
    }
    finish(table, roles.len(), "No roles found.")
}

#[must_use]
pub fn employees_table(employees: &[EmployeeListing]) -> String {
    let mut table =
        new_table(&["id", "first_name", "last_name", "title", "department", "salary", "manager"]);
    for emp in employees {
        table.add_row(vec![
            Cell::new(emp.id),
            Cell::new(&emp.first_name),
            Cell::new(&emp.last_name),
            Cell::new(&emp.title),
            Cell::new(&emp.department),
            money_cell(emp.salary),
            Cell::new(emp.manager.as_deref().unwrap_or(NO_MANAGER)),
        ]);
    }
    finish(table, employees.len(), "No employees found.")
}

#[must_use]
pub fn managed_employees_table(employees: &[ManagedEmployee]) -> String {
    let mut table = new_table(&["id", "first_name", "last_name", "title", "department"]);
    for emp in employees {
        table.add_row(vec![
            Cell::new(emp.id),
            Cell::new(&emp.first_name),
            Cell::new(&emp.last_name),
            Cell::new(&emp.title),
            Cell::new(&emp.department),
        ]);
    }
    finish(table, employees.len(), "No direct reports.")
}

#[must_use]
pub fn department_employees_table(employees: &[DepartmentEmployee]) -> String {
    let mut table = new_table(&["id", "first_name", "last_name", "title", "salary"]);
    for emp in employees {
        table.add_row(vec![
            Cell::new(emp.id),
            Cell::new(&emp.first_name),
            Cell::new(&emp.last_name),
            Cell::new(&emp.title),
            money_cell(emp.salary),
        ]);
    }
    finish(table, employees.len(), "No employees in this department yet.")
}

/// Two-line budget summary
#[must_use]
pub fn budget_summary(budget: &DepartmentBudget) -> String {
    format!(
        "💰 {} Department Budget:\nTotal Utilized Budget: {}",
        budget.department,
        format_currency(budget.total_budget)
    )
}
