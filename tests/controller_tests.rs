//! Controller Scenario Tests
//!
//! Drives the menu loop with a scripted prompter over a `SQLite` store and
//! asserts on the rendered output and the resulting rows. A side connection
//! to the same database file can delete rows between prompts, which is how
//! the "no rows affected" path is reached.

#![cfg(feature = "sqlite")]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use employee_tracker::seed::seed_sample_data;
use employee_tracker::validation::parse_salary;
use employee_tracker::{
    Controller, DepartmentRepository, EmployeeRepository, MenuAction, Prompter, RoleRepository,
    SqliteStore, Store, TrackerError,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

// ============================================================================
// Scripted prompter
// ============================================================================

#[derive(Debug, Clone)]
enum Answer {
    Select(usize),
    Text(&'static str),
    Salary(&'static str),
    Confirm(bool),
    /// Run SQL on the side connection, then continue with the next answer
    Execute(String),
}

fn menu(action: MenuAction) -> Answer {
    let index = MenuAction::ALL.iter().position(|a| *a == action).expect("menu action");
    Answer::Select(index)
}

/// Prompter that replays a fixed list of answers
///
/// Invalid text or salary answers are recorded and the next answer is used,
/// the way the terminal prompter asks again.
struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    side: Option<rusqlite::Connection>,
    prompts: Vec<String>,
    rejected: Vec<String>,
}

impl ScriptedPrompter {
    fn new(answers: Vec<Answer>) -> Self {
        Self { answers: answers.into(), side: None, prompts: Vec::new(), rejected: Vec::new() }
    }

    fn with_side_connection(mut self, path: &Path) -> Self {
        let conn = rusqlite::Connection::open(path).expect("side connection");
        conn.execute_batch("PRAGMA foreign_keys = ON;").expect("pragma");
        self.side = Some(conn);
        self
    }

    fn next(&mut self, prompt: &str) -> Result<Answer, TrackerError> {
        self.prompts.push(prompt.to_string());
        loop {
            match self.answers.pop_front() {
                Some(Answer::Execute(sql)) => {
                    let conn = self.side.as_ref().expect("side connection configured");
                    conn.execute_batch(&sql).expect("side statement");
                }
                Some(answer) => return Ok(answer),
                None => return Err(TrackerError::prompt_failed("script exhausted")),
            }
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, prompt: &str, items: &[String]) -> Result<usize, TrackerError> {
        match self.next(prompt)? {
            Answer::Select(index) => {
                assert!(index < items.len(), "selection {index} out of range for {prompt}");
                Ok(index)
            }
            other => Err(TrackerError::prompt_failed(format!("expected select, got {other:?}"))),
        }
    }

    fn text(
        &mut self,
        prompt: &str,
        validate: &dyn Fn(&str) -> Result<String, TrackerError>,
    ) -> Result<String, TrackerError> {
        loop {
            match self.next(prompt)? {
                Answer::Text(input) => match validate(input) {
                    Ok(value) => return Ok(value),
                    Err(err) => self.rejected.push(err.message()),
                },
                other => {
                    return Err(TrackerError::prompt_failed(format!("expected text, got {other:?}")))
                }
            }
        }
    }

    fn salary(&mut self, prompt: &str) -> Result<Decimal, TrackerError> {
        loop {
            match self.next(prompt)? {
                Answer::Salary(input) => match parse_salary(input) {
                    Ok(value) => return Ok(value),
                    Err(err) => self.rejected.push(err.message()),
                },
                other => {
                    return Err(TrackerError::prompt_failed(format!("expected salary, got {other:?}")))
                }
            }
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, TrackerError> {
        match self.next(prompt)? {
            Answer::Confirm(yes) => Ok(yes),
            other => Err(TrackerError::prompt_failed(format!("expected confirm, got {other:?}"))),
        }
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

type TestController = Controller<SqliteStore, ScriptedPrompter, Vec<u8>>;

async fn fresh_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().expect("open in-memory store");
    store.init_schema().await.expect("init schema");
    store
}

async fn seeded_store() -> SqliteStore {
    let store = fresh_store().await;
    seed_sample_data(&store).await.expect("seed");
    store
}

fn controller(store: SqliteStore, answers: Vec<Answer>) -> TestController {
    Controller::new(store, ScriptedPrompter::new(answers), Vec::new())
}

fn output_of(controller: TestController) -> (SqliteStore, ScriptedPrompter, String) {
    let (store, prompter, out) = controller.into_parts();
    (store, prompter, String::from_utf8(out).expect("utf-8 output"))
}

fn temp_db_path() -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir()
        .join(format!("employee_tracker_controller_{}_{id}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

// ============================================================================
// Sessions
// ============================================================================

#[tokio::test]
async fn test_session_builds_first_employee() {
    let mut ctl = controller(
        fresh_store().await,
        vec![
            menu(MenuAction::AddDepartment),
            Answer::Text("Engineering"),
            menu(MenuAction::AddRole),
            Answer::Text("Engineer"),
            Answer::Salary("80000"),
            Answer::Select(0),
            menu(MenuAction::AddEmployee),
            Answer::Text("Ada"),
            Answer::Text("Lovelace"),
            Answer::Select(0),
            Answer::Select(0),
            menu(MenuAction::ViewEmployees),
            menu(MenuAction::Exit),
        ],
    );

    ctl.run().await.unwrap();
    let (_, prompter, out) = output_of(ctl);

    assert!(out.contains("Welcome to the Employee Tracker!"));
    assert!(out.contains("✅ Department \"Engineering\" added successfully!"));
    assert!(out.contains("✅ Role \"Engineer\" added successfully!"));
    assert!(out.contains("✅ Employee \"Ada Lovelace\" added successfully!"));
    assert!(out.contains("Lovelace"));
    assert!(out.contains("$80,000.00"));
    assert!(out.contains("Goodbye"));
    assert!(prompter.answers.is_empty());
}

#[tokio::test]
async fn test_failed_action_returns_to_menu() {
    let mut ctl = controller(
        fresh_store().await,
        vec![menu(MenuAction::AddRole), menu(MenuAction::ViewDepartments), menu(MenuAction::Exit)],
    );

    ctl.run().await.unwrap();
    let (_, _, out) = output_of(ctl);

    assert!(out.contains("No departments available. Add a department first."));
    assert!(out.contains("No departments found."));
    assert!(out.contains("Goodbye"));
}

#[tokio::test]
async fn test_menu_prompt_failure_ends_session() {
    let mut ctl = controller(fresh_store().await, vec![menu(MenuAction::ViewRoles)]);

    ctl.run().await.unwrap();
    let (_, _, out) = output_of(ctl);

    assert!(out.contains("No roles found."));
    assert!(!out.contains("Goodbye"));
}

#[tokio::test]
async fn test_not_found_reported_as_warning() {
    let path = temp_db_path();
    let store = SqliteStore::open_path(&path).unwrap();
    store.init_schema().await.unwrap();
    seed_sample_data(&store).await.unwrap();

    let choices = store.list_employee_choices().await.unwrap();
    let first = choices[0].id;

    let prompter = ScriptedPrompter::new(vec![
        menu(MenuAction::DeleteEmployee),
        Answer::Select(0),
        Answer::Execute(format!("DELETE FROM employee WHERE id = {first};")),
        Answer::Confirm(true),
        menu(MenuAction::Exit),
    ])
    .with_side_connection(&path);

    let mut ctl = Controller::new(store, prompter, Vec::new());
    ctl.run().await.unwrap();
    let (_, _, out) = output_of(ctl);

    assert!(out.contains(&format!("⚠️  No rows affected: employee {first} no longer exists")));
    assert!(out.contains("Goodbye"));

    let _ = std::fs::remove_file(&path);
}

// ============================================================================
// Single actions
// ============================================================================

#[tokio::test]
async fn test_blank_department_name_is_asked_again() {
    let mut ctl =
        controller(fresh_store().await, vec![Answer::Text(""), Answer::Text("   "), Answer::Text("Legal")]);

    ctl.perform(MenuAction::AddDepartment).await.unwrap();

    let names: Vec<String> =
        ctl.store().list_departments().await.unwrap().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["Legal".to_string()]);

    let (_, prompter, _) = output_of(ctl);
    assert_eq!(prompter.rejected.len(), 2);
    assert_eq!(prompter.rejected[0], "Department name cannot be empty");
}

#[tokio::test]
async fn test_invalid_salary_is_asked_again() {
    let store = fresh_store().await;
    store.add_department("Engineering").await.unwrap();
    let mut ctl = controller(
        store,
        vec![
            Answer::Text("Engineer"),
            Answer::Salary("lots"),
            Answer::Salary("-5"),
            Answer::Salary("$95,000.50"),
            Answer::Select(0),
        ],
    );

    ctl.perform(MenuAction::AddRole).await.unwrap();

    let roles = ctl.store().list_roles().await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].salary, Decimal::new(9_500_050, 2));

    let (_, prompter, _) = output_of(ctl);
    assert_eq!(prompter.rejected.len(), 2);
}

#[tokio::test]
async fn test_sub_cent_salary_is_asked_again() {
    let store = fresh_store().await;
    store.add_department("Engineering").await.unwrap();
    let mut ctl = controller(
        store,
        vec![
            Answer::Text("Intern"),
            Answer::Salary("0.004"),
            Answer::Salary("80000.555"),
            Answer::Salary("123456789012"),
            Answer::Salary("32000.25"),
            Answer::Select(0),
        ],
    );

    ctl.perform(MenuAction::AddRole).await.unwrap();

    let roles = ctl.store().list_roles().await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].salary, Decimal::new(3_200_025, 2));

    let (_, prompter, _) = output_of(ctl);
    assert_eq!(prompter.rejected.len(), 3);
}

#[tokio::test]
async fn test_add_employee_with_manager() {
    let store = fresh_store().await;
    let eng = store.add_department("Engineering").await.unwrap();
    let role = employee_tracker::NewRole::new("Engineer", Decimal::from(80_000), eng.id).unwrap();
    let role = store.add_role(&role).await.unwrap();
    let ada = employee_tracker::NewEmployee::new("Ada", "Lovelace", role.id, None).unwrap();
    let ada = store.add_employee(&ada).await.unwrap();

    // Manager list is ["None", "Ada Lovelace"]
    let mut ctl = controller(
        store,
        vec![Answer::Text("Grace"), Answer::Text("Hopper"), Answer::Select(0), Answer::Select(1)],
    );
    ctl.perform(MenuAction::AddEmployee).await.unwrap();

    let reports = ctl.store().list_employees_by_manager(ada.id).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].first_name, "Grace");
}

#[tokio::test]
async fn test_clear_manager_with_none_entry() {
    let store = seeded_store().await;
    // Dale Carnegie reports to Mary Kay
    let choices = store.list_employee_choices().await.unwrap();
    let index = choices.iter().position(|c| c.name == "Dale Carnegie").expect("dale seeded");
    let dale = choices[index].clone();

    let mut ctl = controller(store, vec![Answer::Select(index), Answer::Select(0)]);
    ctl.perform(MenuAction::UpdateEmployeeManager).await.unwrap();

    let listed = ctl.store().list_employees().await.unwrap();
    let dale_row = listed.iter().find(|e| e.id == dale.id).expect("dale listed");
    assert_eq!(dale_row.manager, None);

    let (_, _, out) = output_of(ctl);
    assert!(out.contains("✅ Employee manager updated successfully!"));
}

#[tokio::test]
async fn test_update_employee_role() {
    let store = seeded_store().await;
    let roles = store.list_roles().await.unwrap();
    let target = roles.iter().position(|r| r.title == "Lawyer").expect("lawyer role");
    let first = store.list_employee_choices().await.unwrap()[0].clone();

    let mut ctl = controller(store, vec![Answer::Select(0), Answer::Select(target)]);
    ctl.perform(MenuAction::UpdateEmployeeRole).await.unwrap();

    let listed = ctl.store().list_employees().await.unwrap();
    let row = listed.iter().find(|e| e.id == first.id).expect("employee listed");
    assert_eq!(row.title, "Lawyer");
    assert_eq!(row.department, "Legal");
}

#[tokio::test]
async fn test_delete_cancelled_keeps_rows() {
    let store = seeded_store().await;
    let mut ctl = controller(store, vec![Answer::Select(0), Answer::Confirm(false)]);

    ctl.perform(MenuAction::DeleteDepartment).await.unwrap();

    assert_eq!(ctl.store().list_departments().await.unwrap().len(), 4);
    let (_, prompter, out) = output_of(ctl);
    assert!(out.contains("❌ Deletion cancelled."));
    assert!(prompter.prompts.iter().any(|p| p.contains("delete all associated roles and employees")));
}

#[tokio::test]
async fn test_delete_department_cascades() {
    let store = seeded_store().await;
    let mut ctl = controller(store, vec![Answer::Select(0), Answer::Confirm(true)]);

    ctl.perform(MenuAction::DeleteDepartment).await.unwrap();

    let store = ctl.store();
    let departments: Vec<String> =
        store.list_departments().await.unwrap().into_iter().map(|d| d.name).collect();
    assert_eq!(departments, vec!["Finance", "Legal", "Sales"]);
    assert!(store.list_roles().await.unwrap().iter().all(|r| r.department != "Engineering"));
    assert!(store.list_employees().await.unwrap().iter().all(|e| e.department != "Engineering"));

    let (_, _, out) = output_of(ctl);
    assert!(out.contains("🗑️  Department \"Engineering\" deleted successfully!"));
}

#[tokio::test]
async fn test_department_budget_output() {
    let store = seeded_store().await;
    let empty = store.add_department("Research").await.unwrap();
    assert_eq!(store.department_budget(empty.id).await.unwrap(), None);

    // Engineering: 150,000 + 2 x 120,000
    let mut ctl = controller(store, vec![Answer::Select(0), Answer::Select(4)]);
    ctl.perform(MenuAction::ViewDepartmentBudget).await.unwrap();
    ctl.perform(MenuAction::ViewDepartmentBudget).await.unwrap();

    let (_, _, out) = output_of(ctl);
    assert!(out.contains("💰 Engineering Department Budget:\nTotal Utilized Budget: $390,000.00"));
    assert!(out.contains("No employees in this department yet."));
}

#[tokio::test]
async fn test_view_by_manager_and_department() {
    let store = seeded_store().await;
    let managers = store.list_managers().await.unwrap();
    let ada = managers.iter().position(|m| m.name == "Ada Lovelace").expect("ada manages");

    let mut ctl = controller(store, vec![Answer::Select(ada), Answer::Select(0)]);
    ctl.perform(MenuAction::ViewEmployeesByManager).await.unwrap();
    ctl.perform(MenuAction::ViewEmployeesByDepartment).await.unwrap();

    let (_, _, out) = output_of(ctl);
    assert!(out.contains("📋 Employees managed by Ada Lovelace:"));
    assert!(out.contains("Hopper"));
    assert!(out.contains("Turing"));
    assert!(out.contains("📋 Employees in Engineering department:"));
    assert!(out.contains("$120,000.00"));
}

#[tokio::test]
async fn test_empty_choice_lists_fail_before_prompting() {
    let mut ctl = controller(fresh_store().await, Vec::new());

    for action in [
        MenuAction::UpdateEmployeeRole,
        MenuAction::UpdateEmployeeManager,
        MenuAction::ViewEmployeesByManager,
        MenuAction::ViewEmployeesByDepartment,
        MenuAction::ViewDepartmentBudget,
        MenuAction::DeleteDepartment,
        MenuAction::DeleteRole,
        MenuAction::DeleteEmployee,
        MenuAction::AddEmployee,
    ] {
        let err = ctl.perform(action).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILURE", "{action}");
    }

    let (_, prompter, _) = output_of(ctl);
    assert!(prompter.prompts.is_empty());
}
