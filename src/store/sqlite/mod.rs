//! `SQLite` Store Implementation
//!
//! This module implements the repository traits for `SQLite` databases.
//!
//! # Features
//! - File-based connections (`/path/to/tracker.db`)
//! - In-memory connections (`:memory:`)
//! - Cascade rules declared in the schema, enforced with `PRAGMA foreign_keys`
//!
//! # Implementation Notes
//! - Uses `rusqlite` (synchronous driver, no async needed)
//! - One connection held behind a mutex; no statement awaits while it is locked
//! - Salaries are stored with NUMERIC affinity and read back into `Decimal`
//! - Writes use `RETURNING` so every command yields the affected row

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, ErrorCode, OpenFlags, OptionalExtension, Row};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use crate::error::{Result, TrackerError};
use crate::model::{
    Department, DepartmentBudget, DepartmentEmployee, Employee, EmployeeChoice, EmployeeListing,
    ManagedEmployee, NewEmployee, NewRole, Role, RoleListing,
};
use crate::store::{
    ConnectionConfig, DatabaseType, DepartmentRepository, EmployeeRepository, RoleRepository,
    Store,
};

/// Tables, in dependency order
///
/// `employee.role_id` cascades so that a department delete reaches employees
/// through their roles. `employee.manager_id` is nulled instead of cascading.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS department (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(30) NOT NULL UNIQUE CHECK (length(trim(name)) > 0)
);

CREATE TABLE IF NOT EXISTS role (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title VARCHAR(30) NOT NULL CHECK (length(trim(title)) > 0),
    salary DECIMAL(10, 2) NOT NULL CHECK (salary > 0),
    department_id INTEGER NOT NULL REFERENCES department(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS employee (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name VARCHAR(30) NOT NULL CHECK (length(trim(first_name)) > 0),
    last_name VARCHAR(30) NOT NULL CHECK (length(trim(last_name)) > 0),
    role_id INTEGER NOT NULL REFERENCES role(id) ON DELETE CASCADE,
    manager_id INTEGER REFERENCES employee(id) ON DELETE SET NULL
);
";

/// `SQLite` store
pub struct SqliteStore {
    conn: Mutex<Option<Connection>>,
}

impl SqliteStore {
    /// Open the database named by a `SQLite` connection config
    pub fn open(config: &ConnectionConfig) -> Result<Self> {
        if config.engine != DatabaseType::SQLite {
            return Err(TrackerError::config_error(format!(
                "Expected SQLite engine, got {}",
                config.engine
            )));
        }

        let file_path = config
            .file
            .as_ref()
            .ok_or_else(|| TrackerError::config_error("SQLite requires 'file' parameter"))?;

        Self::open_path(file_path)
    }

    /// Open (creating if needed) the database at `path`
    pub fn open_path(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;
        let conn = Connection::open_with_flags(path, flags).map_err(|e| {
            TrackerError::connectivity(format!("Failed to open SQLite database: {e}"))
        })?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            TrackerError::connectivity(format!("Failed to open in-memory SQLite database: {e}"))
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Foreign keys (and therefore cascades) are off by default per connection
        conn.execute_batch("PRAGMA foreign_keys = ON;").map_err(map_sqlite_error)?;
        Ok(Self { conn: Mutex::new(Some(conn)) })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>> {
        self.conn.lock().map_err(|_| TrackerError::connectivity("SQLite connection lock poisoned"))
    }

    /// Run `f` against the open connection
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T> {
        let guard = self.lock()?;
        let conn = guard
            .as_ref()
            .ok_or_else(|| TrackerError::connectivity("SQLite connection is closed"))?;
        f(conn).map_err(map_sqlite_error)
    }

    /// Run a query and collect every row through `map`
    fn query_all<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map(params, map)?;
            rows.collect()
        })
    }
}

/// Classify a `rusqlite` error into a tracker error kind
fn map_sqlite_error(err: rusqlite::Error) -> TrackerError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::ConstraintViolation => TrackerError::constraint_violation(err.to_string()),
            ErrorCode::CannotOpen
            | ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::NotADatabase
            | ErrorCode::SystemIoFailure => TrackerError::connectivity(err.to_string()),
            _ => TrackerError::query_failed(err.to_string()),
        },
        _ => TrackerError::query_failed(err.to_string()),
    }
}

/// Read a salary column, whatever storage class `SQLite` chose for it
fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let conversion_error = |ty| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            ty,
            format!("column {idx} is not a decimal").into(),
        )
    };

    match row.get_ref(idx)? {
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Real(f) => Decimal::from_f64(f)
            .map(|d| d.round_dp(2))
            .ok_or_else(|| conversion_error(rusqlite::types::Type::Real)),
        ValueRef::Text(s) => std::str::from_utf8(s)
            .ok()
            .and_then(|text| Decimal::from_str(text).ok())
            .ok_or_else(|| conversion_error(rusqlite::types::Type::Text)),
        ValueRef::Null => Err(conversion_error(rusqlite::types::Type::Null)),
        ValueRef::Blob(_) => Err(conversion_error(rusqlite::types::Type::Blob)),
    }
}

fn department_from_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department { id: row.get(0)?, name: row.get(1)? })
}

fn role_from_row(row: &Row<'_>) -> rusqlite::Result<Role> {
    Ok(Role {
        id: row.get(0)?,
        title: row.get(1)?,
        salary: decimal_at(row, 2)?,
        department_id: row.get(3)?,
    })
}

fn employee_from_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        role_id: row.get(3)?,
        manager_id: row.get(4)?,
    })
}

fn choice_from_row(row: &Row<'_>) -> rusqlite::Result<EmployeeChoice> {
    Ok(EmployeeChoice { id: row.get(0)?, name: row.get(1)? })
}

impl DepartmentRepository for SqliteStore {
    async fn list_departments(&self) -> Result<Vec<Department>> {
        tracing::debug!("sqlite: list departments");
        self.query_all("SELECT id, name FROM department ORDER BY id", [], department_from_row)
    }

    async fn add_department(&self, name: &str) -> Result<Department> {
        tracing::debug!(name, "sqlite: add department");
        self.with_conn(|conn| {
            conn.query_row(
                "INSERT INTO department (name) VALUES (?1) RETURNING id, name",
                params![name],
                department_from_row,
            )
        })
    }

    async fn delete_department(&self, id: i32) -> Result<Option<Department>> {
        tracing::debug!(id, "sqlite: delete department");
        self.with_conn(|conn| {
            conn.query_row(
                "DELETE FROM department WHERE id = ?1 RETURNING id, name",
                params![id],
                department_from_row,
            )
            .optional()
        })
    }

    async fn department_budget(&self, id: i32) -> Result<Option<DepartmentBudget>> {
        tracing::debug!(id, "sqlite: department budget");
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT d.name AS department, SUM(r.salary) AS total_budget
                 FROM employee e
                 JOIN role r ON e.role_id = r.id
                 JOIN department d ON r.department_id = d.id
                 WHERE d.id = ?1
                 GROUP BY d.id, d.name",
                params![id],
                |row| Ok(DepartmentBudget { department: row.get(0)?, total_budget: decimal_at(row, 1)? }),
            )
            .optional()
        })
    }
}

impl RoleRepository for SqliteStore {
    async fn list_roles(&self) -> Result<Vec<RoleListing>> {
        tracing::debug!("sqlite: list roles");
        self.query_all(
            "SELECT r.id, r.title, r.salary, d.name AS department
             FROM role r
             JOIN department d ON r.department_id = d.id
             ORDER BY r.id",
            [],
            |row| {
                Ok(RoleListing {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    salary: decimal_at(row, 2)?,
                    department: row.get(3)?,
                })
            },
        )
    }

    async fn add_role(&self, role: &NewRole) -> Result<Role> {
        tracing::debug!(title = %role.title, department_id = role.department_id, "sqlite: add role");
        self.with_conn(|conn| {
            conn.query_row(
                "INSERT INTO role (title, salary, department_id)
                 VALUES (?1, ?2, ?3)
                 RETURNING id, title, salary, department_id",
                params![role.title, role.salary.to_string(), role.department_id],
                role_from_row,
            )
        })
    }

    async fn delete_role(&self, id: i32) -> Result<Option<Role>> {
        tracing::debug!(id, "sqlite: delete role");
        self.with_conn(|conn| {
            conn.query_row(
                "DELETE FROM role WHERE id = ?1 RETURNING id, title, salary, department_id",
                params![id],
                role_from_row,
            )
            .optional()
        })
    }
}

impl EmployeeRepository for SqliteStore {
    async fn list_employees(&self) -> Result<Vec<EmployeeListing>> {
        tracing::debug!("sqlite: list employees");
        self.query_all(
            "SELECT
                e.id,
                e.first_name,
                e.last_name,
                r.title,
                d.name AS department,
                r.salary,
                m.first_name || ' ' || m.last_name AS manager
             FROM employee e
             JOIN role r ON e.role_id = r.id
             JOIN department d ON r.department_id = d.id
             LEFT JOIN employee m ON e.manager_id = m.id
             ORDER BY e.id",
            [],
            |row| {
                Ok(EmployeeListing {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    title: row.get(3)?,
                    department: row.get(4)?,
                    salary: decimal_at(row, 5)?,
                    manager: row.get(6)?,
                })
            },
        )
    }

    async fn add_employee(&self, employee: &NewEmployee) -> Result<Employee> {
        tracing::debug!(
            role_id = employee.role_id,
            manager_id = ?employee.manager_id,
            "sqlite: add employee"
        );
        self.with_conn(|conn| {
            conn.query_row(
                "INSERT INTO employee (first_name, last_name, role_id, manager_id)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, first_name, last_name, role_id, manager_id",
                params![employee.first_name, employee.last_name, employee.role_id, employee.manager_id],
                employee_from_row,
            )
        })
    }

    async fn update_employee_role(&self, employee_id: i32, role_id: i32) -> Result<Option<Employee>> {
        tracing::debug!(employee_id, role_id, "sqlite: update employee role");
        self.with_conn(|conn| {
            conn.query_row(
                "UPDATE employee SET role_id = ?1 WHERE id = ?2
                 RETURNING id, first_name, last_name, role_id, manager_id",
                params![role_id, employee_id],
                employee_from_row,
            )
            .optional()
        })
    }

    async fn update_employee_manager(
        &self,
        employee_id: i32,
        manager_id: Option<i32>,
    ) -> Result<Option<Employee>> {
        tracing::debug!(employee_id, ?manager_id, "sqlite: update employee manager");
        self.with_conn(|conn| {
            conn.query_row(
                "UPDATE employee SET manager_id = ?1 WHERE id = ?2
                 RETURNING id, first_name, last_name, role_id, manager_id",
                params![manager_id, employee_id],
                employee_from_row,
            )
            .optional()
        })
    }

    async fn list_employees_by_manager(&self, manager_id: i32) -> Result<Vec<ManagedEmployee>> {
        tracing::debug!(manager_id, "sqlite: list employees by manager");
        self.query_all(
            "SELECT e.id, e.first_name, e.last_name, r.title, d.name AS department
             FROM employee e
             JOIN role r ON e.role_id = r.id
             JOIN department d ON r.department_id = d.id
             WHERE e.manager_id = ?1
             ORDER BY e.last_name, e.first_name",
            params![manager_id],
            |row| {
                Ok(ManagedEmployee {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    title: row.get(3)?,
                    department: row.get(4)?,
                })
            },
        )
    }

    async fn list_employees_by_department(
        &self,
        department_id: i32,
    ) -> Result<Vec<DepartmentEmployee>> {
        tracing::debug!(department_id, "sqlite: list employees by department");
        self.query_all(
            "SELECT e.id, e.first_name, e.last_name, r.title, r.salary
             FROM employee e
             JOIN role r ON e.role_id = r.id
             WHERE r.department_id = ?1
             ORDER BY e.last_name, e.first_name",
            params![department_id],
            |row| {
                Ok(DepartmentEmployee {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    title: row.get(3)?,
                    salary: decimal_at(row, 4)?,
                })
            },
        )
    }

    async fn delete_employee(&self, id: i32) -> Result<Option<Employee>> {
        tracing::debug!(id, "sqlite: delete employee");
        self.with_conn(|conn| {
            conn.query_row(
                "DELETE FROM employee WHERE id = ?1
                 RETURNING id, first_name, last_name, role_id, manager_id",
                params![id],
                employee_from_row,
            )
            .optional()
        })
    }

    async fn list_employee_choices(&self) -> Result<Vec<EmployeeChoice>> {
        tracing::debug!("sqlite: list employee choices");
        self.query_all(
            "SELECT id, first_name || ' ' || last_name AS name
             FROM employee
             ORDER BY last_name, first_name",
            [],
            choice_from_row,
        )
    }

    async fn list_managers(&self) -> Result<Vec<EmployeeChoice>> {
        tracing::debug!("sqlite: list managers");
        self.query_all(
            "SELECT DISTINCT e.id, e.first_name || ' ' || e.last_name AS name
             FROM employee e
             JOIN employee sub ON e.id = sub.manager_id
             ORDER BY name",
            [],
            choice_from_row,
        )
    }
}

impl Store for SqliteStore {
    fn engine(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    async fn ping(&self) -> Result<()> {
        let version: String =
            self.with_conn(|conn| conn.query_row("SELECT sqlite_version()", [], |row| row.get(0)))?;
        tracing::debug!(version = %version, "sqlite: connected");
        Ok(())
    }

    async fn init_schema(&self) -> Result<()> {
        tracing::info!("sqlite: ensuring schema");
        self.with_conn(|conn| conn.execute_batch(SCHEMA))
    }

    async fn close(&self) {
        let conn = match self.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };

        if let Some(conn) = conn {
            if let Err((_, e)) = conn.close() {
                tracing::warn!(error = %e, "sqlite: failed to close connection cleanly");
            }
        }
    }
}
