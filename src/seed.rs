//! Sample data
//!
//! `--seed` fills an empty database with a small organisation so every menu
//! action has something to work on. Rows go through the repository API, so
//! the same constraints apply as for interactive input.

use rust_decimal::Decimal;

use crate::error::{Result, TrackerError};
use crate::model::{NewEmployee, NewRole};
use crate::store::Store;

type Org = [(&'static str, &'static [(&'static str, i64)])];
type Staff = [(&'static str, &'static str, &'static str, Option<usize>)];

/// Departments with their roles (title, yearly salary in whole dollars)
const SAMPLE_ORG: &Org = &[
    ("Engineering", &[("Lead Engineer", 150_000), ("Software Engineer", 120_000)]),
    ("Finance", &[("Account Manager", 160_000), ("Accountant", 125_000)]),
    ("Legal", &[("Legal Team Lead", 250_000), ("Lawyer", 190_000)]),
    ("Sales", &[("Sales Lead", 100_000), ("Salesperson", 80_000)]),
];

/// Employees: (first, last, role title, manager index into this list)
const SAMPLE_EMPLOYEES: &Staff = &[
    ("Ada", "Lovelace", "Lead Engineer", None),
    ("Grace", "Hopper", "Software Engineer", Some(0)),
    ("Alan", "Turing", "Software Engineer", Some(0)),
    ("Katherine", "Johnson", "Account Manager", None),
    ("Edsger", "Dijkstra", "Accountant", Some(3)),
    ("Ruth", "Bader", "Legal Team Lead", None),
    ("Thurgood", "Marshall", "Lawyer", Some(5)),
    ("Mary", "Kay", "Sales Lead", None),
    ("Dale", "Carnegie", "Salesperson", Some(7)),
];

/// What a seeding run inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub departments: usize,
    pub roles: usize,
    pub employees: usize,
}

impl SeedSummary {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.departments == 0 && self.roles == 0 && self.employees == 0
    }
}

/// Insert the sample organisation unless the store already has departments
pub async fn seed_sample_data<S: Store>(store: &S) -> Result<SeedSummary> {
    seed_with(store, SAMPLE_ORG, SAMPLE_EMPLOYEES).await
}

/// Every employee must name a known role and a manager listed before them
fn check_tables(org: &Org, staff: &Staff) -> Result<()> {
    for (position, (first_name, last_name, title, manager)) in staff.iter().enumerate() {
        let known_role = org.iter().any(|(_, roles)| roles.iter().any(|(t, _)| t == title));
        if !known_role {
            return Err(TrackerError::config_error(format!(
                "Sample employee {first_name} {last_name} has unknown role '{title}'"
            )));
        }
        if manager.is_some_and(|index| index >= position) {
            return Err(TrackerError::config_error(format!(
                "Sample employee {first_name} {last_name} must be listed after their manager"
            )));
        }
    }
    Ok(())
}

async fn seed_with<S: Store>(store: &S, org: &Org, staff: &Staff) -> Result<SeedSummary> {
    check_tables(org, staff)?;

    if !store.list_departments().await?.is_empty() {
        tracing::info!("store already has data, skipping seed");
        return Ok(SeedSummary::default());
    }

    let mut summary = SeedSummary::default();
    let mut role_ids: Vec<(&str, i32)> = Vec::new();

    for (department_name, roles) in org {
        let department = store.add_department(department_name).await?;
        summary.departments += 1;

        for (title, salary) in *roles {
            let role = store
                .add_role(&NewRole::new(title, Decimal::from(*salary), department.id)?)
                .await?;
            role_ids.push((*title, role.id));
            summary.roles += 1;
        }
    }

    let mut employee_ids: Vec<i32> = Vec::with_capacity(staff.len());
    for (first_name, last_name, title, manager) in staff {
        let role_id = role_ids
            .iter()
            .find(|(t, _)| t == title)
            .map(|&(_, id)| id)
            .ok_or_else(|| TrackerError::config_error(format!("Unknown sample role '{title}'")))?;
        let manager_id = match manager {
            Some(index) => Some(employee_ids.get(*index).copied().ok_or_else(|| {
                TrackerError::config_error(format!("Unknown sample manager #{index}"))
            })?),
            None => None,
        };

        let employee = store
            .add_employee(&NewEmployee::new(first_name, last_name, role_id, manager_id)?)
            .await?;
        employee_ids.push(employee.id);
        summary.employees += 1;
    }

    tracing::info!(
        departments = summary.departments,
        roles = summary.roles,
        employees = summary.employees,
        "sample data inserted"
    );
    Ok(summary)
}
