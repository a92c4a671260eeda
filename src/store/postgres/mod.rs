//! `PostgreSQL` Store Implementation
//!
//! This module implements the repository traits for `PostgreSQL` databases.
//!
//! # Features
//! - Client-server connections via TCP
//! - Lazily acquired connection, reused across menu actions
//! - Cascade rules declared in the schema (`ON DELETE CASCADE` / `SET NULL`)
//! - `NUMERIC` salaries mapped to `rust_decimal::Decimal`
//!
//! # Implementation Notes
//! - Uses `tokio-postgres` (async driver, requires tokio runtime)
//! - The connection task is spawned onto the runtime; its errors are logged
//! - A dropped client is replaced on the next acquisition; an explicitly
//!   closed store stays closed
//! - Errors are classified by SQLSTATE: class 23 is a constraint violation

use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, Config, NoTls, Row};

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
    id SERIAL PRIMARY KEY,
    name VARCHAR(30) NOT NULL UNIQUE CHECK (length(trim(name)) > 0)
);

CREATE TABLE IF NOT EXISTS role (
    id SERIAL PRIMARY KEY,
    title VARCHAR(30) NOT NULL CHECK (length(trim(title)) > 0),
    salary DECIMAL(10, 2) NOT NULL CHECK (salary > 0),
    department_id INTEGER NOT NULL REFERENCES department(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS employee (
    id SERIAL PRIMARY KEY,
    first_name VARCHAR(30) NOT NULL CHECK (length(trim(first_name)) > 0),
    last_name VARCHAR(30) NOT NULL CHECK (length(trim(last_name)) > 0),
    role_id INTEGER NOT NULL REFERENCES role(id) ON DELETE CASCADE,
    manager_id INTEGER REFERENCES employee(id) ON DELETE SET NULL
);
";

/// Give up on an unreachable server instead of hanging the menu at startup
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection state held by the store
enum Slot {
    /// Not connected yet (or the server dropped the connection)
    Idle,
    Open(Client),
    /// `close()` was called; no reconnection
    Closed,
}

impl Slot {
    fn client(&self) -> Result<&Client> {
        match self {
            Self::Open(client) => Ok(client),
            Self::Idle => Err(TrackerError::connectivity("PostgreSQL client unavailable")),
            Self::Closed => Err(TrackerError::connectivity("PostgreSQL store is closed")),
        }
    }
}

/// `PostgreSQL` store
pub struct PostgresStore {
    config: Config,
    slot: Mutex<Slot>,
}

impl PostgresStore {
    /// Create a store for a `PostgreSQL` connection config
    ///
    /// No connection is opened until the first query.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        if config.engine != DatabaseType::Postgres {
            return Err(TrackerError::config_error(format!(
                "Expected PostgreSQL engine, got {}",
                config.engine
            )));
        }

        Ok(Self::from_pg_config(build_pg_config(config)?))
    }

    /// Create a store from an already-built driver config (e.g. a parsed URL)
    #[must_use]
    pub fn from_pg_config(config: Config) -> Self {
        Self { config, slot: Mutex::new(Slot::Idle) }
    }

    /// Return the cached client, connecting first if there is none or it dropped
    ///
    /// Fails without touching the network once the store has been closed.
    async fn acquire(&self) -> Result<MutexGuard<'_, Slot>> {
        let mut slot = self.slot.lock().await;

        let needs_connect = match &*slot {
            Slot::Idle => true,
            Slot::Open(client) => client.is_closed(),
            Slot::Closed => return Err(TrackerError::connectivity("PostgreSQL store is closed")),
        };

        if needs_connect {
            tracing::debug!("postgres: opening connection");
            *slot = Slot::Open(connect(&self.config).await?);
        }

        Ok(slot)
    }

    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>> {
        let slot = self.acquire().await?;
        let client = slot.client()?;
        client.query(sql, params).await.map_err(map_pg_error)
    }

    async fn query_opt(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Option<Row>> {
        let slot = self.acquire().await?;
        let client = slot.client()?;
        client.query_opt(sql, params).await.map_err(map_pg_error)
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Row> {
        let slot = self.acquire().await?;
        let client = slot.client()?;
        client.query_one(sql, params).await.map_err(map_pg_error)
    }
}

/// Build `PostgreSQL` connection config from `ConnectionConfig`
fn build_pg_config(config: &ConnectionConfig) -> Result<Config> {
    let host = config
        .host
        .as_ref()
        .ok_or_else(|| TrackerError::config_error("PostgreSQL requires 'host' parameter"))?;

    let port = config
        .port
        .ok_or_else(|| TrackerError::config_error("PostgreSQL requires 'port' parameter"))?;

    let user = config
        .user
        .as_ref()
        .ok_or_else(|| TrackerError::config_error("PostgreSQL requires 'user' parameter"))?;

    let database = config
        .database
        .as_ref()
        .ok_or_else(|| TrackerError::config_error("PostgreSQL requires 'database' parameter"))?;

    let mut pg_config = Config::new();
    pg_config
        .host(host)
        .port(port)
        .user(user)
        .dbname(database)
        .application_name("employee-tracker")
        .connect_timeout(CONNECT_TIMEOUT);

    // Password is optional: trust/peer auth setups have none
    if let Some(password) = &config.password {
        pg_config.password(password);
    }

    Ok(pg_config)
}

/// Open a client and spawn its connection driver
async fn connect(config: &Config) -> Result<Client> {
    let (client, connection) = config.connect(NoTls).await.map_err(|e| {
        TrackerError::connectivity(format!("Failed to connect to PostgreSQL: {e}"))
    })?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::warn!(error = %e, "postgres: connection closed with error");
        }
    });

    Ok(client)
}

/// Classify a driver error into a tracker error kind
fn map_pg_error(err: tokio_postgres::Error) -> TrackerError {
    let io_failure = std::error::Error::source(&err)
        .is_some_and(|source| source.downcast_ref::<std::io::Error>().is_some());
    let detail = err.as_db_error().map_or_else(|| err.to_string(), |db| db.message().to_string());

    classify_failure(err.is_closed(), io_failure, err.code(), detail)
}

/// Connection loss is connectivity, SQLSTATE class 23 is a constraint,
/// everything else (other SQLSTATEs, row counts, type conversion) failed the query
fn classify_failure(
    closed: bool,
    io_failure: bool,
    code: Option<&SqlState>,
    detail: String,
) -> TrackerError {
    if closed {
        return TrackerError::connectivity(format!("PostgreSQL connection closed: {detail}"));
    }
    if io_failure {
        return TrackerError::connectivity(detail);
    }

    match code {
        Some(code) if is_constraint_violation(code) => TrackerError::constraint_violation(detail),
        _ => TrackerError::query_failed(detail),
    }
}

/// SQLSTATE class 23: integrity constraint violation
fn is_constraint_violation(code: &SqlState) -> bool {
    code.code().starts_with("23")
}

fn department_from_row(row: &Row) -> Department {
    Department { id: row.get("id"), name: row.get("name") }
}

fn role_from_row(row: &Row) -> Role {
    Role {
        id: row.get("id"),
        title: row.get("title"),
        salary: row.get("salary"),
        department_id: row.get("department_id"),
    }
}

fn employee_from_row(row: &Row) -> Employee {
    Employee {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        role_id: row.get("role_id"),
        manager_id: row.get("manager_id"),
    }
}

fn choice_from_row(row: &Row) -> EmployeeChoice {
    EmployeeChoice { id: row.get("id"), name: row.get("name") }
}

impl DepartmentRepository for PostgresStore {
    async fn list_departments(&self) -> Result<Vec<Department>> {
        tracing::debug!("postgres: list departments");
        let rows = self.query("SELECT id, name FROM department ORDER BY id", &[]).await?;
        Ok(rows.iter().map(department_from_row).collect())
    }

    async fn add_department(&self, name: &str) -> Result<Department> {
        tracing::debug!(name, "postgres: add department");
        let row = self
            .query_one("INSERT INTO department (name) VALUES ($1) RETURNING id, name", &[&name])
            .await?;
        Ok(department_from_row(&row))
    }

    async fn delete_department(&self, id: i32) -> Result<Option<Department>> {
        tracing::debug!(id, "postgres: delete department");
        let row = self
            .query_opt("DELETE FROM department WHERE id = $1 RETURNING id, name", &[&id])
            .await?;
        Ok(row.as_ref().map(department_from_row))
    }

    async fn department_budget(&self, id: i32) -> Result<Option<DepartmentBudget>> {
        tracing::debug!(id, "postgres: department budget");
        let row = self
            .query_opt(
                "SELECT d.name AS department, SUM(r.salary) AS total_budget
                 FROM employee e
                 JOIN role r ON e.role_id = r.id
                 JOIN department d ON r.department_id = d.id
                 WHERE d.id = $1
                 GROUP BY d.id, d.name",
                &[&id],
            )
            .await?;

        Ok(row.map(|row| DepartmentBudget {
            department: row.get("department"),
            total_budget: row.get("total_budget"),
        }))
    }
}

impl RoleRepository for PostgresStore {
    async fn list_roles(&self) -> Result<Vec<RoleListing>> {
        tracing::debug!("postgres: list roles");
        let rows = self
            .query(
                "SELECT r.id, r.title, r.salary, d.name AS department
                 FROM role r
                 JOIN department d ON r.department_id = d.id
                 ORDER BY r.id",
                &[],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| RoleListing {
                id: row.get("id"),
                title: row.get("title"),
                salary: row.get("salary"),
                department: row.get("department"),
            })
            .collect())
    }

    async fn add_role(&self, role: &NewRole) -> Result<Role> {
        tracing::debug!(title = %role.title, department_id = role.department_id, "postgres: add role");
        let row = self
            .query_one(
                "INSERT INTO role (title, salary, department_id)
                 VALUES ($1, $2, $3)
                 RETURNING id, title, salary, department_id",
                &[&role.title, &role.salary, &role.department_id],
            )
            .await?;
        Ok(role_from_row(&row))
    }

    async fn delete_role(&self, id: i32) -> Result<Option<Role>> {
        tracing::debug!(id, "postgres: delete role");
        let row = self
            .query_opt(
                "DELETE FROM role WHERE id = $1 RETURNING id, title, salary, department_id",
                &[&id],
            )
            .await?;
        Ok(row.as_ref().map(role_from_row))
    }
}

impl EmployeeRepository for PostgresStore {
    async fn list_employees(&self) -> Result<Vec<EmployeeListing>> {
        tracing::debug!("postgres: list employees");
        let rows = self
            .query(
                "SELECT
                    e.id,
                    e.first_name,
                    e.last_name,
                    r.title,
                    d.name AS department,
                    r.salary,
                    CASE WHEN m.id IS NULL THEN NULL
                         ELSE CONCAT(m.first_name, ' ', m.last_name) END AS manager
                 FROM employee e
                 JOIN role r ON e.role_id = r.id
                 JOIN department d ON r.department_id = d.id
                 LEFT JOIN employee m ON e.manager_id = m.id
                 ORDER BY e.id",
                &[],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| EmployeeListing {
                id: row.get("id"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                title: row.get("title"),
                department: row.get("department"),
                salary: row.get("salary"),
                manager: row.get("manager"),
            })
            .collect())
    }

    async fn add_employee(&self, employee: &NewEmployee) -> Result<Employee> {
        tracing::debug!(
            role_id = employee.role_id,
            manager_id = ?employee.manager_id,
            "postgres: add employee"
        );
        let row = self
            .query_one(
                "INSERT INTO employee (first_name, last_name, role_id, manager_id)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, first_name, last_name, role_id, manager_id",
                &[&employee.first_name, &employee.last_name, &employee.role_id, &employee.manager_id],
            )
            .await?;
        Ok(employee_from_row(&row))
    }

    async fn update_employee_role(&self, employee_id: i32, role_id: i32) -> Result<Option<Employee>> {
        tracing::debug!(employee_id, role_id, "postgres: update employee role");
        let row = self
            .query_opt(
                "UPDATE employee SET role_id = $1 WHERE id = $2
                 RETURNING id, first_name, last_name, role_id, manager_id",
                &[&role_id, &employee_id],
            )
            .await?;
        Ok(row.as_ref().map(employee_from_row))
    }

    async fn update_employee_manager(
        &self,
        employee_id: i32,
        manager_id: Option<i32>,
    ) -> Result<Option<Employee>> {
        tracing::debug!(employee_id, ?manager_id, "postgres: update employee manager");
        let row = self
            .query_opt(
                "UPDATE employee SET manager_id = $1 WHERE id = $2
                 RETURNING id, first_name, last_name, role_id, manager_id",
                &[&manager_id, &employee_id],
            )
            .await?;
        Ok(row.as_ref().map(employee_from_row))
    }

    async fn list_employees_by_manager(&self, manager_id: i32) -> Result<Vec<ManagedEmployee>> {
        tracing::debug!(manager_id, "postgres: list employees by manager");
        let rows = self
            .query(
                "SELECT e.id, e.first_name, e.last_name, r.title, d.name AS department
                 FROM employee e
                 JOIN role r ON e.role_id = r.id
                 JOIN department d ON r.department_id = d.id
                 WHERE e.manager_id = $1
                 ORDER BY e.last_name, e.first_name",
                &[&manager_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| ManagedEmployee {
                id: row.get("id"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                title: row.get("title"),
                department: row.get("department"),
            })
            .collect())
    }

    async fn list_employees_by_department(
        &self,
        department_id: i32,
    ) -> Result<Vec<DepartmentEmployee>> {
        tracing::debug!(department_id, "postgres: list employees by department");
        let rows = self
            .query(
                "SELECT e.id, e.first_name, e.last_name, r.title, r.salary
                 FROM employee e
                 JOIN role r ON e.role_id = r.id
                 WHERE r.department_id = $1
                 ORDER BY e.last_name, e.first_name",
                &[&department_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| DepartmentEmployee {
                id: row.get("id"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                title: row.get("title"),
                salary: row.get("salary"),
            })
            .collect())
    }

    async fn delete_employee(&self, id: i32) -> Result<Option<Employee>> {
        tracing::debug!(id, "postgres: delete employee");
        let row = self
            .query_opt(
                "DELETE FROM employee WHERE id = $1
                 RETURNING id, first_name, last_name, role_id, manager_id",
                &[&id],
            )
            .await?;
        Ok(row.as_ref().map(employee_from_row))
    }

    async fn list_employee_choices(&self) -> Result<Vec<EmployeeChoice>> {
        tracing::debug!("postgres: list employee choices");
        let rows = self
            .query(
                "SELECT id, CONCAT(first_name, ' ', last_name) AS name
                 FROM employee
                 ORDER BY last_name, first_name",
                &[],
            )
            .await?;
        Ok(rows.iter().map(choice_from_row).collect())
    }

    async fn list_managers(&self) -> Result<Vec<EmployeeChoice>> {
        tracing::debug!("postgres: list managers");
        let rows = self
            .query(
                "SELECT DISTINCT e.id, CONCAT(e.first_name, ' ', e.last_name) AS name
                 FROM employee e
                 JOIN employee sub ON e.id = sub.manager_id
                 ORDER BY name",
                &[],
            )
            .await?;
        Ok(rows.iter().map(choice_from_row).collect())
    }
}

impl Store for PostgresStore {
    fn engine(&self) -> DatabaseType {
        DatabaseType::Postgres
    }

    async fn ping(&self) -> Result<()> {
        let row = self.query_one("SELECT version()", &[]).await?;
        let version: String = row.get(0);
        tracing::debug!(version = %version, "postgres: connected");
        Ok(())
    }

    async fn init_schema(&self) -> Result<()> {
        tracing::info!("postgres: ensuring schema");
        let slot = self.acquire().await?;
        let client = slot.client()?;
        client.batch_execute(SCHEMA).await.map_err(map_pg_error)
    }

    async fn close(&self) {
        // Dropping the client ends the spawned connection task
        let previous = std::mem::replace(&mut *self.slot.lock().await, Slot::Closed);
        if matches!(previous, Slot::Open(_)) {
            tracing::debug!("postgres: connection released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> ConnectionConfig {
        ConnectionConfig::postgres(
            "localhost".to_string(),
            5432,
            "postgres".to_string(),
            Some("password".to_string()),
            "employee_db".to_string(),
        )
    }

    #[test]
    fn test_new_rejects_wrong_engine() {
        let mut config = local_config();
        config.engine = DatabaseType::SQLite;

        let result = PostgresStore::new(&config);
        assert!(result.err().unwrap().message().contains("Expected PostgreSQL engine"));
    }

    #[test]
    fn test_build_pg_config_requires_parameters() {
        let mut config = local_config();
        config.host = None;
        let err = build_pg_config(&config).unwrap_err();
        assert!(err.message().contains("'host'"));

        let mut config = local_config();
        config.database = None;
        let err = build_pg_config(&config).unwrap_err();
        assert!(err.message().contains("'database'"));
    }

    #[test]
    fn test_build_pg_config_password_optional() {
        let mut config = local_config();
        config.password = None;
        let pg_config = build_pg_config(&config).unwrap();
        assert!(pg_config.get_password().is_none());
        assert_eq!(pg_config.get_dbname(), Some("employee_db"));
        assert_eq!(pg_config.get_ports(), &[5432]);
    }

    #[test]
    fn test_constraint_sqlstate_class() {
        assert!(is_constraint_violation(&SqlState::FOREIGN_KEY_VIOLATION));
        assert!(is_constraint_violation(&SqlState::UNIQUE_VIOLATION));
        assert!(is_constraint_violation(&SqlState::CHECK_VIOLATION));
        assert!(!is_constraint_violation(&SqlState::SYNTAX_ERROR));
    }

    #[test]
    fn test_failure_classification() {
        let err = classify_failure(true, false, None, "socket".to_string());
        assert!(matches!(err, TrackerError::ConnectivityFailure(_)));

        let err = classify_failure(false, true, None, "connection reset".to_string());
        assert!(matches!(err, TrackerError::ConnectivityFailure(_)));

        let err =
            classify_failure(false, false, Some(&SqlState::FOREIGN_KEY_VIOLATION), "fk".to_string());
        assert!(matches!(err, TrackerError::ConstraintViolation(_)));

        let err = classify_failure(false, false, Some(&SqlState::SYNTAX_ERROR), "syntax".to_string());
        assert!(matches!(err, TrackerError::QueryFailed(_)));

        // Row-count and conversion errors carry no SQLSTATE and no I/O source
        let err = classify_failure(false, false, None, "query returned an unexpected number of rows".to_string());
        assert!(matches!(err, TrackerError::QueryFailed(_)));
    }

    #[tokio::test]
    async fn test_closed_store_does_not_reconnect() {
        // Unroutable address with a long timeout: any connection attempt would stall
        let mut pg_config = Config::new();
        pg_config
            .host("10.255.255.1")
            .port(5432)
            .user("postgres")
            .dbname("employee_db")
            .connect_timeout(Duration::from_secs(60));
        let store = PostgresStore::from_pg_config(pg_config);

        store.close().await;

        let result = tokio::time::timeout(Duration::from_secs(2), store.ping())
            .await
            .expect("closed store must not attempt a connection");
        let err = result.unwrap_err();
        assert!(matches!(err, TrackerError::ConnectivityFailure(_)));
        assert!(err.message().contains("PostgreSQL store is closed"));

        assert!(store.list_departments().await.unwrap_err().message().contains("closed"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connectivity_failure() {
        let mut pg_config = Config::new();
        pg_config
            .host("127.0.0.1")
            .port(1)
            .user("postgres")
            .dbname("employee_db")
            .connect_timeout(Duration::from_secs(2));
        let store = PostgresStore::from_pg_config(pg_config);

        let err = store.ping().await.unwrap_err();
        assert!(matches!(err, TrackerError::ConnectivityFailure(_)));
    }

    // Integration tests require a real database
    // Run with: TRACKER_TEST_DATABASE_URL=postgres://... cargo test -- --ignored

    async fn live_store() -> PostgresStore {
        let url = std::env::var("TRACKER_TEST_DATABASE_URL")
            .expect("TRACKER_TEST_DATABASE_URL required");
        let store = PostgresStore::from_pg_config(url.parse().expect("valid database URL"));
        store.init_schema().await.expect("init schema");
        store
            .query("TRUNCATE employee, role, department RESTART IDENTITY CASCADE", &[])
            .await
            .expect("truncate tables");
        store
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn live_department_cascade() {
        let store = live_store().await;
        let dept = store.add_department("Engineering").await.unwrap();
        let role = store
            .add_role(&NewRole::new("Engineer", rust_decimal::Decimal::new(80000, 0), dept.id).unwrap())
            .await
            .unwrap();
        store.add_employee(&NewEmployee::new("Ada", "Lovelace", role.id, None).unwrap()).await.unwrap();

        let budget = store.department_budget(dept.id).await.unwrap().unwrap();
        assert_eq!(budget.total_budget, rust_decimal::Decimal::new(80000, 0));

        store.delete_department(dept.id).await.unwrap().unwrap();
        assert!(store.list_roles().await.unwrap().is_empty());
        assert!(store.list_employees().await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn live_row_count_error_is_query_failure() {
        let store = live_store().await;
        let err = store.query_one("SELECT 1 WHERE false", &[]).await.unwrap_err();
        assert!(matches!(err, TrackerError::QueryFailed(_)));

        // Still usable afterwards
        store.ping().await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn live_employee_mutations_return_full_row() {
        let store = live_store().await;
        let dept = store.add_department("Engineering").await.unwrap();
        let lead = store
            .add_role(&NewRole::new("Lead", rust_decimal::Decimal::new(150_000, 0), dept.id).unwrap())
            .await
            .unwrap();
        let engineer = store
            .add_role(&NewRole::new("Engineer", rust_decimal::Decimal::new(120_000, 0), dept.id).unwrap())
            .await
            .unwrap();

        let ada = store.add_employee(&NewEmployee::new("Ada", "Lovelace", lead.id, None).unwrap()).await.unwrap();
        let grace = store
            .add_employee(&NewEmployee::new("Grace", "Hopper", engineer.id, Some(ada.id)).unwrap())
            .await
            .unwrap();
        assert_eq!(grace.first_name, "Grace");
        assert_eq!(grace.last_name, "Hopper");
        assert_eq!(grace.manager_id, Some(ada.id));

        let moved = store.update_employee_role(grace.id, lead.id).await.unwrap().unwrap();
        assert_eq!((moved.id, moved.role_id, moved.manager_id), (grace.id, lead.id, Some(ada.id)));

        let freed = store.update_employee_manager(grace.id, None).await.unwrap().unwrap();
        assert_eq!((freed.first_name.as_str(), freed.manager_id), ("Grace", None));

        let deleted = store.delete_employee(grace.id).await.unwrap().unwrap();
        assert_eq!(deleted.last_name, "Hopper");
        assert!(store.delete_employee(grace.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn live_foreign_key_violation() {
        let store = live_store().await;
        let err = store
            .add_role(&NewRole::new("Ghost", rust_decimal::Decimal::new(1, 0), 9999).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::ConstraintViolation(_)));
    }
}
