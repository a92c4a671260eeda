//! Main Menu Actions
//!
//! Each menu entry is a [`MenuAction`] variant. The label shown to the user is
//! derived from the action, never the other way round, so labels can change
//! without touching dispatch.

/// Every action offered by the main menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    ViewDepartments,
    ViewRoles,
    ViewEmployees,
    AddDepartment,
    AddRole,
    AddEmployee,
    UpdateEmployeeRole,
    UpdateEmployeeManager,
    ViewEmployeesByManager,
    ViewEmployeesByDepartment,
    ViewDepartmentBudget,
    DeleteDepartment,
    DeleteRole,
    DeleteEmployee,
    Exit,
}

impl MenuAction {
    /// All actions in menu order
    pub const ALL: [Self; 15] = [
        Self::ViewDepartments,
        Self::ViewRoles,
        Self::ViewEmployees,
        Self::AddDepartment,
        Self::AddRole,
        Self::AddEmployee,
        Self::UpdateEmployeeRole,
        Self::UpdateEmployeeManager,
        Self::ViewEmployeesByManager,
        Self::ViewEmployeesByDepartment,
        Self::ViewDepartmentBudget,
        Self::DeleteDepartment,
        Self::DeleteRole,
        Self::DeleteEmployee,
        Self::Exit,
    ];

    /// Menu label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ViewDepartments => "👁️  View All Departments",
            Self::ViewRoles => "👁️  View All Roles",
            Self::ViewEmployees => "👁️  View All Employees",
            Self::AddDepartment => "➕ Add a Department",
            Self::AddRole => "➕ Add a Role",
            Self::AddEmployee => "➕ Add an Employee",
            Self::UpdateEmployeeRole => "🔄 Update Employee Role",
            Self::UpdateEmployeeManager => "🔄 Update Employee Manager",
            Self::ViewEmployeesByManager => "👥 View Employees by Manager",
            Self::ViewEmployeesByDepartment => "🏢 View Employees by Department",
            Self::ViewDepartmentBudget => "💰 View Department Budget",
            Self::DeleteDepartment => "🗑️  Delete Department",
            Self::DeleteRole => "🗑️  Delete Role",
            Self::DeleteEmployee => "🗑️  Delete Employee",
            Self::Exit => "🚪 Exit",
        }
    }

    /// Stable identifier used in log records
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ViewDepartments => "view_departments",
            Self::ViewRoles => "view_roles",
            Self::ViewEmployees => "view_employees",
            Self::AddDepartment => "add_department",
            Self::AddRole => "add_role",
            Self::AddEmployee => "add_employee",
            Self::UpdateEmployeeRole => "update_employee_role",
            Self::UpdateEmployeeManager => "update_employee_manager",
            Self::ViewEmployeesByManager => "view_employees_by_manager",
            Self::ViewEmployeesByDepartment => "view_employees_by_department",
            Self::ViewDepartmentBudget => "view_department_budget",
            Self::DeleteDepartment => "delete_department",
            Self::DeleteRole => "delete_role",
            Self::DeleteEmployee => "delete_employee",
            Self::Exit => "exit",
        }
    }

    /// Whether the action removes rows and needs confirmation
    #[must_use]
    pub const fn is_destructive(&self) -> bool {
        matches!(self, Self::DeleteDepartment | Self::DeleteRole | Self::DeleteEmployee)
    }

    /// Labels for the menu prompt, index-aligned with [`MenuAction::ALL`]
    #[must_use]
    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|action| action.label().to_string()).collect()
    }

    /// Action at a menu index
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_menu_order_and_exit_last() {
        assert_eq!(MenuAction::ALL.len(), 15);
        assert_eq!(MenuAction::ALL[0], MenuAction::ViewDepartments);
        assert_eq!(MenuAction::ALL[14], MenuAction::Exit);
    }

    #[test]
    fn test_labels_aligned_with_actions() {
        let labels = MenuAction::labels();
        for (index, action) in MenuAction::ALL.iter().enumerate() {
            assert_eq!(labels[index], action.label());
            assert_eq!(MenuAction::from_index(index), Some(*action));
        }
        assert_eq!(MenuAction::from_index(15), None);
    }

    #[test]
    fn test_labels_and_ids_unique() {
        let labels: HashSet<_> = MenuAction::ALL.iter().map(MenuAction::label).collect();
        let ids: HashSet<_> = MenuAction::ALL.iter().map(MenuAction::as_str).collect();
        assert_eq!(labels.len(), 15);
        assert_eq!(ids.len(), 15);
    }

    #[test]
    fn test_destructive_actions() {
        let destructive: Vec<_> =
            MenuAction::ALL.iter().filter(|a| a.is_destructive()).copied().collect();
        assert_eq!(
            destructive,
            vec![MenuAction::DeleteDepartment, MenuAction::DeleteRole, MenuAction::DeleteEmployee]
        );
    }
}
