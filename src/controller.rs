//! Interaction Controller
//!
//! The menu loop: show the main menu, run the chosen action to completion,
//! come back to the menu. Each action follows the same shape:
//!
//! 1. Fetch whatever lists are needed to build choices
//! 2. Collect input (validated inline by the prompter)
//! 3. Make exactly one repository call
//! 4. Render the result
//!
//! The loop is the recovery boundary. An error inside an action is logged,
//! reported to the user, and the menu comes back; only `Exit` (or a menu
//! prompt that can no longer read input) ends the session. Destructive actions
//! ask for confirmation first and report a cancellation when declined.

use std::io::Write;
use tracing::Instrument;

use crate::error::{Result, TrackerError};
use crate::menu::MenuAction;
use crate::model::{NewEmployee, NewRole};
use crate::prompt::Prompter;
use crate::render;
use crate::store::Store;
use crate::validation::non_empty;

/// Label of the "no manager" entry at the top of manager choice lists
pub const NO_MANAGER_CHOICE: &str = "None";

/// Menu-driven controller over a store, a prompter, and an output sink
pub struct Controller<S, P, W> {
    store: S,
    prompter: P,
    out: W,
}

impl<S, P, W> Controller<S, P, W>
where
    S: Store,
    P: Prompter,
    W: Write,
{
    pub fn new(store: S, prompter: P, out: W) -> Self {
        Self { store, prompter, out }
    }

    /// Take the controller apart (used to inspect output after a session)
    pub fn into_parts(self) -> (S, P, W) {
        (self.store, self.prompter, self.out)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the menu loop until exit, then release the store
    pub async fn run(&mut self) -> Result<()> {
        let session = self.session().await;
        self.store.close().await;
        tracing::info!("store connection closed");
        session
    }

    async fn session(&mut self) -> Result<()> {
        writeln!(self.out, "{}", render::BANNER)?;
        writeln!(self.out, "Welcome to the Employee Tracker!\n")?;

        loop {
            let action = match self.prompt_action() {
                Ok(action) => action,
                Err(err) => {
                    // Without a readable menu there is nothing left to recover to
                    tracing::warn!(error = %err, "main menu prompt failed, ending session");
                    return Ok(());
                }
            };

            if action == MenuAction::Exit {
                writeln!(self.out, "\n👋 Goodbye! Thank you for using Employee Tracker.\n")?;
                return Ok(());
            }

            let span = tracing::info_span!("action", action = %action);
            tracing::debug!(parent: &span, destructive = action.is_destructive(), "running action");
            if let Err(err) = self.perform(action).instrument(span).await {
                self.report_failure(action, &err)?;
            }
        }
    }

    fn prompt_action(&mut self) -> Result<MenuAction> {
        let index = self.prompter.select("What would you like to do?", &MenuAction::labels())?;
        MenuAction::from_index(index)
            .ok_or_else(|| TrackerError::validation(format!("Invalid menu selection {index}")))
    }

    fn report_failure(&mut self, action: MenuAction, err: &TrackerError) -> Result<()> {
        if err.is_not_found() {
            tracing::warn!(%action, code = err.error_code(), "{}", err.message());
            writeln!(self.out, "\n⚠️  {}\n", err.message())?;
        } else {
            tracing::error!(%action, code = err.error_code(), "{}", err.message());
            writeln!(self.out, "\n❌ Error ({}): {}\n", action.label().trim(), err.message())?;
        }
        Ok(())
    }

    /// Run one menu action to completion (everything except `Exit`)
    pub async fn perform(&mut self, action: MenuAction) -> Result<()> {
        match action {
            MenuAction::ViewDepartments => self.view_departments().await,
            MenuAction::ViewRoles => self.view_roles().await,
            MenuAction::ViewEmployees => self.view_employees().await,
            MenuAction::AddDepartment => self.add_department().await,
            MenuAction::AddRole => self.add_role().await,
            MenuAction::AddEmployee => self.add_employee().await,
            MenuAction::UpdateEmployeeRole => self.update_employee_role().await,
            MenuAction::UpdateEmployeeManager => self.update_employee_manager().await,
            MenuAction::ViewEmployeesByManager => self.view_employees_by_manager().await,
            MenuAction::ViewEmployeesByDepartment => self.view_employees_by_department().await,
            MenuAction::ViewDepartmentBudget => self.view_department_budget().await,
            MenuAction::DeleteDepartment => self.delete_department().await,
            MenuAction::DeleteRole => self.delete_role().await,
            MenuAction::DeleteEmployee => self.delete_employee().await,
            MenuAction::Exit => Ok(()),
        }
    }

    /// Ask the user to pick one of `labels`
    ///
    /// An empty list is a validation failure (`empty` explains why) rather
    /// than an empty prompt.
    fn choose(&mut self, prompt: &str, labels: &[String], empty: &str) -> Result<usize> {
        if labels.is_empty() {
            return Err(TrackerError::validation(empty));
        }

        let index = self.prompter.select(prompt, labels)?;
        if index >= labels.len() {
            return Err(TrackerError::validation(format!("Invalid selection {index}")));
        }
        Ok(index)
    }

    /// Ask for confirmation; prints the cancellation notice when declined
    fn confirmed(&mut self, prompt: &str) -> Result<bool> {
        if self.prompter.confirm(prompt)? {
            return Ok(true);
        }
        tracing::info!("deletion cancelled by user");
        writeln!(self.out, "\n❌ Deletion cancelled.\n")?;
        Ok(false)
    }

    async fn view_departments(&mut self) -> Result<()> {
        let departments = self.store.list_departments().await?;
        writeln!(self.out, "\n📋 All Departments:\n")?;
        writeln!(self.out, "{}", render::departments_table(&departments))?;
        Ok(())
    }

    async fn view_roles(&mut self) -> Result<()> {
        let roles = self.store.list_roles().await?;
        writeln!(self.out, "\n📋 All Roles:\n")?;
        writeln!(self.out, "{}", render::roles_table(&roles))?;
        Ok(())
    }

    async fn view_employees(&mut self) -> Result<()> {
        let employees = self.store.list_employees().await?;
        writeln!(self.out, "\n📋 All Employees:\n")?;
        writeln!(self.out, "{}", render::employees_table(&employees))?;
        Ok(())
    }

    async fn add_department(&mut self) -> Result<()> {
        let name = self.prompter.text("Enter the name of the new department:", &|input: &str| {
            non_empty(input, "Department name")
        })?;

        let department = self.store.add_department(&name).await?;
        tracing::info!(id = department.id, "department added");
        writeln!(self.out, "\n✅ Department \"{}\" added successfully!\n", department.name)?;
        Ok(())
    }

    async fn add_role(&mut self) -> Result<()> {
        let departments = self.store.list_departments().await?;
        if departments.is_empty() {
            return Err(TrackerError::validation("No departments available. Add a department first."));
        }

        let title = self
            .prompter
            .text("Enter the title of the new role:", &|input: &str| non_empty(input, "Role title"))?;
        let salary = self.prompter.salary("Enter the salary for this role:")?;

        let labels: Vec<String> = departments.iter().map(|d| d.name.clone()).collect();
        let index = self.choose("Select the department for this role:", &labels, "")?;

        let new_role = NewRole::new(&title, salary, departments[index].id)?;
        let role = self.store.add_role(&new_role).await?;
        tracing::info!(id = role.id, department_id = role.department_id, "role added");
        writeln!(self.out, "\n✅ Role \"{}\" added successfully!\n", role.title)?;
        Ok(())
    }

    async fn add_employee(&mut self) -> Result<()> {
        let roles = self.store.list_roles().await?;
        if roles.is_empty() {
            return Err(TrackerError::validation("No roles available. Add a role first."));
        }
        let employees = self.store.list_employee_choices().await?;

        let first_name = self
            .prompter
            .text("Enter the employee's first name:", &|input: &str| non_empty(input, "First name"))?;
        let last_name = self
            .prompter
            .text("Enter the employee's last name:", &|input: &str| non_empty(input, "Last name"))?;

        let role_labels: Vec<String> =
            roles.iter().map(|r| format!("{} ({})", r.title, r.department)).collect();
        let role_index = self.choose("Select the employee's role:", &role_labels, "")?;

        let manager_labels: Vec<String> = std::iter::once(NO_MANAGER_CHOICE.to_string())
            .chain(employees.iter().map(|e| e.name.clone()))
            .collect();
        let manager_index = self.choose("Select the employee's manager:", &manager_labels, "")?;
        let manager_id = manager_index.checked_sub(1).map(|i| employees[i].id);

        let new_employee =
            NewEmployee::new(&first_name, &last_name, roles[role_index].id, manager_id)?;
        let employee = self.store.add_employee(&new_employee).await?;
        tracing::info!(id = employee.id, role_id = employee.role_id, "employee added");
        writeln!(self.out, "\n✅ Employee \"{}\" added successfully!\n", employee.full_name())?;
        Ok(())
    }

    async fn update_employee_role(&mut self) -> Result<()> {
        let employees = self.store.list_employee_choices().await?;
        let roles = self.store.list_roles().await?;

        let employee_labels: Vec<String> = employees.iter().map(|e| e.name.clone()).collect();
        let employee_index = self.choose(
            "Select the employee to update:",
            &employee_labels,
            "No employees available.",
        )?;

        let role_labels: Vec<String> =
            roles.iter().map(|r| format!("{} ({})", r.title, r.department)).collect();
        let role_index = self.choose("Select the new role:", &role_labels, "No roles available.")?;

        let employee_id = employees[employee_index].id;
        let updated = self
            .store
            .update_employee_role(employee_id, roles[role_index].id)
            .await?
            .ok_or_else(|| TrackerError::not_found(format!("employee {employee_id} no longer exists")))?;

        tracing::info!(id = updated.id, role_id = updated.role_id, "employee role updated");
        writeln!(self.out, "\n✅ Employee role updated successfully!\n")?;
        Ok(())
    }

    async fn update_employee_manager(&mut self) -> Result<()> {
        let employees = self.store.list_employee_choices().await?;

        let employee_labels: Vec<String> = employees.iter().map(|e| e.name.clone()).collect();
        let employee_index = self.choose(
            "Select the employee to update:",
            &employee_labels,
            "No employees available.",
        )?;

        let manager_labels: Vec<String> = std::iter::once(NO_MANAGER_CHOICE.to_string())
            .chain(employee_labels.iter().cloned())
            .collect();
        let manager_index = self.choose("Select the new manager:", &manager_labels, "")?;
        let manager_id = manager_index.checked_sub(1).map(|i| employees[i].id);

        let employee_id = employees[employee_index].id;
        let updated = self
            .store
            .update_employee_manager(employee_id, manager_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(format!("employee {employee_id} no longer exists")))?;

        tracing::info!(id = updated.id, manager_id = ?updated.manager_id, "employee manager updated");
        writeln!(self.out, "\n✅ Employee manager updated successfully!\n")?;
        Ok(())
    }

    async fn view_employees_by_manager(&mut self) -> Result<()> {
        let managers = self.store.list_managers().await?;

        let labels: Vec<String> = managers.iter().map(|m| m.name.clone()).collect();
        let index = self.choose(
            "Select a manager to view their employees:",
            &labels,
            "No employees currently manage anyone.",
        )?;

        let manager = &managers[index];
        let reports = self.store.list_employees_by_manager(manager.id).await?;
        writeln!(self.out, "\n📋 Employees managed by {}:\n", manager.name)?;
        writeln!(self.out, "{}", render::managed_employees_table(&reports))?;
        Ok(())
    }

    async fn view_employees_by_department(&mut self) -> Result<()> {
        let departments = self.store.list_departments().await?;

        let labels: Vec<String> = departments.iter().map(|d| d.name.clone()).collect();
        let index = self.choose(
            "Select a department to view its employees:",
            &labels,
            "No departments available.",
        )?;

        let department = &departments[index];
        let employees = self.store.list_employees_by_department(department.id).await?;
        writeln!(self.out, "\n📋 Employees in {} department:\n", department.name)?;
        writeln!(self.out, "{}", render::department_employees_table(&employees))?;
        Ok(())
    }

    async fn view_department_budget(&mut self) -> Result<()> {
        let departments = self.store.list_departments().await?;

        let labels: Vec<String> = departments.iter().map(|d| d.name.clone()).collect();
        let index = self.choose(
            "Select a department to view its budget:",
            &labels,
            "No departments available.",
        )?;

        match self.store.department_budget(departments[index].id).await? {
            Some(budget) => writeln!(self.out, "\n{}\n", render::budget_summary(&budget))?,
            None => writeln!(self.out, "\n⚠️  No employees in this department yet.\n")?,
        }
        Ok(())
    }

    async fn delete_department(&mut self) -> Result<()> {
        let departments = self.store.list_departments().await?;

        let labels: Vec<String> = departments.iter().map(|d| d.name.clone()).collect();
        let index =
            self.choose("Select a department to delete:", &labels, "No departments available.")?;

        if !self.confirmed("⚠️  This will delete all associated roles and employees. Are you sure?")? {
            return Ok(());
        }

        let id = departments[index].id;
        let deleted = self
            .store
            .delete_department(id)
            .await?
            .ok_or_else(|| TrackerError::not_found(format!("department {id} no longer exists")))?;

        tracing::info!(id = deleted.id, "department deleted");
        writeln!(self.out, "\n🗑️  Department \"{}\" deleted successfully!\n", deleted.name)?;
        Ok(())
    }

    async fn delete_role(&mut self) -> Result<()> {
        let roles = self.store.list_roles().await?;

        let labels: Vec<String> =
            roles.iter().map(|r| format!("{} ({})", r.title, r.department)).collect();
        let index = self.choose("Select a role to delete:", &labels, "No roles available.")?;

        if !self.confirmed("⚠️  This will delete all employees with this role. Are you sure?")? {
            return Ok(());
        }

        let id = roles[index].id;
        let deleted = self
            .store
            .delete_role(id)
            .await?
            .ok_or_else(|| TrackerError::not_found(format!("role {id} no longer exists")))?;

        tracing::info!(id = deleted.id, "role deleted");
        writeln!(self.out, "\n🗑️  Role \"{}\" deleted successfully!\n", deleted.title)?;
        Ok(())
    }

    async fn delete_employee(&mut self) -> Result<()> {
        let employees = self.store.list_employee_choices().await?;

        let labels: Vec<String> = employees.iter().map(|e| e.name.clone()).collect();
        let index =
            self.choose("Select an employee to delete:", &labels, "No employees available.")?;

        if !self.confirmed("⚠️  Are you sure you want to delete this employee?")? {
            return Ok(());
        }

        let id = employees[index].id;
        let deleted = self
            .store
            .delete_employee(id)
            .await?
            .ok_or_else(|| TrackerError::not_found(format!("employee {id} no longer exists")))?;

        tracing::info!(id = deleted.id, "employee deleted");
        writeln!(self.out, "\n🗑️  Employee \"{}\" deleted successfully!\n", deleted.full_name())?;
        Ok(())
    }
}
