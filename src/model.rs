//! Domain Types
//!
//! Row-shaped records returned by the repositories and the validated input
//! records passed into them. Every listing type mirrors the column shape of
//! the query that produces it; nothing here holds a live reference to another
//! entity (managers are referenced by id).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation::{non_empty, positive_salary};

/// A department row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i32,
    pub name: String,
}

/// A role row as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i32,
    pub title: String,
    pub salary: Decimal,
    pub department_id: i32,
}

/// A role joined with its department name (role listing)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleListing {
    pub id: i32,
    pub title: String,
    pub salary: Decimal,
    pub department: String,
}

/// An employee row as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub role_id: i32,
    /// Id of the managing employee, `None` for top-level employees
    pub manager_id: Option<i32>,
}

impl Employee {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An employee joined with role, department, and manager name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeListing {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub department: String,
    pub salary: Decimal,
    /// Manager's full name, `None` when the employee has no manager
    pub manager: Option<String>,
}

/// A direct report, as listed for a given manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedEmployee {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub department: String,
}

/// An employee listed within a department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentEmployee {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub salary: Decimal,
}

/// Id plus display name, used to populate choice lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeChoice {
    pub id: i32,
    pub name: String,
}

/// Total salary utilised by a department's employees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentBudget {
    pub department: String,
    pub total_budget: Decimal,
}

/// Validated input for a new role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    pub title: String,
    pub salary: Decimal,
    pub department_id: i32,
}

impl NewRole {
    /// Build a new role, trimming the title and rejecting empty titles or
    /// non-positive salaries
    pub fn new(title: &str, salary: Decimal, department_id: i32) -> Result<Self> {
        Ok(Self {
            title: non_empty(title, "Role title")?,
            salary: positive_salary(salary)?,
            department_id,
        })
    }
}

/// Validated input for a new employee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub role_id: i32,
    pub manager_id: Option<i32>,
}

impl NewEmployee {
    pub fn new(
        first_name: &str,
        last_name: &str,
        role_id: i32,
        manager_id: Option<i32>,
    ) -> Result<Self> {
        Ok(Self {
            first_name: non_empty(first_name, "First name")?,
            last_name: non_empty(last_name, "Last name")?,
            role_id,
            manager_id,
        })
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
