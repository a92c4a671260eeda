//! Store Traits and Core Types
//!
//! This module defines the repository abstractions the controller talks to.
//! Each engine (`PostgreSQL`, `SQLite`) implements all three repositories plus
//! the [`Store`] lifecycle trait.
//!
//! # Connection Model
//! A store owns one lazily-acquired connection for the process lifetime.
//! Every repository call is a single parameterized statement; there are no
//! application-level transactions, so multi-row effects (cascading deletes)
//! come entirely from the schema each engine installs in `init_schema`.
//!
//! # Engine Isolation
//! Each engine implementation is completely independent.
//! No shared SQL helpers or cross-engine abstractions.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;

use crate::error::Result;
use crate::model::{
    Department, DepartmentBudget, DepartmentEmployee, Employee, EmployeeChoice, EmployeeListing,
    ManagedEmployee, NewEmployee, NewRole, Role, RoleListing,
};

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

/// Supported database engine types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `PostgreSQL` database
    Postgres,
    /// `SQLite` database
    SQLite,
}

impl DatabaseType {
    /// Get the engine name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::SQLite => "sqlite",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DatabaseType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "sqlite" | "sqlite3" => Ok(Self::SQLite),
            other => Err(format!("unknown database engine '{other}' (expected postgres or sqlite)")),
        }
    }
}

/// Connection configuration for database engines
///
/// Fields are engine-specific (e.g., `file` only applies to `SQLite`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database engine type
    pub engine: DatabaseType,

    /// Hostname (for postgres)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Port number (for postgres)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Username (for postgres)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Password (for postgres)
    /// WARNING: Sensitive data, do not log or include in error messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Database name (for postgres)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Database file path (for sqlite, `:memory:` for an in-memory database)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl ConnectionConfig {
    /// Create a new `PostgreSQL` connection config
    #[must_use]
    pub const fn postgres(
        host: String,
        port: u16,
        user: String,
        password: Option<String>,
        database: String,
    ) -> Self {
        Self {
            engine: DatabaseType::Postgres,
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password,
            database: Some(database),
            file: None,
        }
    }

    /// Create a new `SQLite` connection config
    #[must_use]
    pub const fn sqlite(file: PathBuf) -> Self {
        Self {
            engine: DatabaseType::SQLite,
            host: None,
            port: None,
            user: None,
            password: None,
            database: None,
            file: Some(file),
        }
    }

    /// Short, credential-free description used in logs and the banner
    #[must_use]
    pub fn describe(&self) -> String {
        match self.engine {
            DatabaseType::Postgres => format!(
                "postgres://{}@{}:{}/{}",
                self.user.as_deref().unwrap_or("?"),
                self.host.as_deref().unwrap_or("?"),
                self.port.map_or_else(|| "?".to_string(), |p| p.to_string()),
                self.database.as_deref().unwrap_or("?"),
            ),
            DatabaseType::SQLite => format!(
                "sqlite://{}",
                self.file.as_ref().map_or_else(|| "?".into(), |f| f.display().to_string())
            ),
        }
    }
}

/// Department queries and commands
pub trait DepartmentRepository {
    /// All departments, ascending by id
    fn list_departments(&self) -> impl Future<Output = Result<Vec<Department>>> + Send;

    /// Insert a department and return the created row
    ///
    /// Fails with `ConstraintViolation` when the name is already taken.
    fn add_department(&self, name: &str) -> impl Future<Output = Result<Department>> + Send;

    /// Delete a department, returning the deleted row or `None` if no row matched
    ///
    /// Roles in the department, and their employees, are removed by the
    /// schema's cascade rules.
    fn delete_department(
        &self,
        id: i32,
    ) -> impl Future<Output = Result<Option<Department>>> + Send;

    /// Sum of role salaries over the department's employees
    ///
    /// Returns `None` when the department has no employees, which is distinct
    /// from a zero budget.
    fn department_budget(
        &self,
        id: i32,
    ) -> impl Future<Output = Result<Option<DepartmentBudget>>> + Send;
}

/// Role queries and commands
pub trait RoleRepository {
    /// All roles with their department name, ascending by id
    ///
    /// Inner join: a role without an existing department is not listed.
    fn list_roles(&self) -> impl Future<Output = Result<Vec<RoleListing>>> + Send;

    /// Insert a role; `ConstraintViolation` if the department does not exist
    fn add_role(&self, role: &NewRole) -> impl Future<Output = Result<Role>> + Send;

    /// Delete a role; employees holding it are removed by cascade
    fn delete_role(&self, id: i32) -> impl Future<Output = Result<Option<Role>>> + Send;
}

/// Employee queries and commands
pub trait EmployeeRepository {
    /// All employees with title, department, salary, and manager name, ascending by id
    fn list_employees(&self) -> impl Future<Output = Result<Vec<EmployeeListing>>> + Send;

    /// Insert an employee and return the created row
    fn add_employee(
        &self,
        employee: &NewEmployee,
    ) -> impl Future<Output = Result<Employee>> + Send;

    /// Reassign an employee's role
    fn update_employee_role(
        &self,
        employee_id: i32,
        role_id: i32,
    ) -> impl Future<Output = Result<Option<Employee>>> + Send;

    /// Reassign (or clear) an employee's manager
    ///
    /// No cycle check: an employee may be made their own manager.
    fn update_employee_manager(
        &self,
        employee_id: i32,
        manager_id: Option<i32>,
    ) -> impl Future<Output = Result<Option<Employee>>> + Send;

    /// Direct reports of `manager_id`, sorted by last name then first name
    fn list_employees_by_manager(
        &self,
        manager_id: i32,
    ) -> impl Future<Output = Result<Vec<ManagedEmployee>>> + Send;

    /// Employees whose role belongs to `department_id`, sorted by last name then first name
    fn list_employees_by_department(
        &self,
        department_id: i32,
    ) -> impl Future<Output = Result<Vec<DepartmentEmployee>>> + Send;

    /// Delete an employee; direct reports lose their manager (set to null)
    fn delete_employee(&self, id: i32) -> impl Future<Output = Result<Option<Employee>>> + Send;

    /// Id and full name of every employee, sorted by last name then first name
    fn list_employee_choices(&self) -> impl Future<Output = Result<Vec<EmployeeChoice>>> + Send;

    /// Employees who currently manage at least one other employee, sorted by full name
    fn list_managers(&self) -> impl Future<Output = Result<Vec<EmployeeChoice>>> + Send;
}

/// A complete store: all repositories plus connection lifecycle
pub trait Store: DepartmentRepository + RoleRepository + EmployeeRepository + Send + Sync {
    /// Engine backing this store
    fn engine(&self) -> DatabaseType;

    /// Round-trip a trivial query to prove the store is reachable
    fn ping(&self) -> impl Future<Output = Result<()>> + Send;

    /// Create the three tables (if absent) with their cascade rules
    fn init_schema(&self) -> impl Future<Output = Result<()>> + Send;

    /// Release the connection; later calls fail with `ConnectivityFailure`
    fn close(&self) -> impl Future<Output = ()> + Send;
}
