//! Employee Tracker - Interactive Workforce Database CLI
//!
//! A menu-driven terminal application for managing departments, roles, and
//! employees stored in PostgreSQL or SQLite.
//!
//! # Architecture
//! - The store layer ([`store`]) exposes one repository trait per entity and a
//!   [`Store`] supertrait; each engine implements them independently.
//! - The [`controller`] drives the menu loop against any `Store` and any
//!   [`Prompter`], writing rendered output to any `io::Write`.
//! - The binary only wires configuration, logging, and the terminal together.
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`model`] - Row types and validated inputs
//! - [`validation`] - Input checks shared by prompts and models
//! - [`store`] - Repository traits and engine implementations
//! - [`config`] - Configuration file lookup and overrides
//! - [`menu`] - Main menu actions
//! - [`prompt`] - Prompter trait and terminal implementation
//! - [`render`] - Tables and currency formatting
//! - [`controller`] - The interactive loop
//! - [`seed`] - Sample data
//! - [`logging`] - Tracing setup

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod menu;
pub mod model;
pub mod prompt;
pub mod render;
pub mod seed;
pub mod store;
pub mod validation;

pub use config::{load_config, ConfigSource, ConnectionOverrides, TrackerConfig};
pub use controller::Controller;
pub use error::{Result, TrackerError};
pub use menu::MenuAction;
pub use model::{
    Department, DepartmentBudget, DepartmentEmployee, Employee, EmployeeChoice, EmployeeListing,
    ManagedEmployee, NewEmployee, NewRole, Role, RoleListing,
};
pub use prompt::{Prompter, TerminalPrompter};
pub use store::{
    ConnectionConfig, DatabaseType, DepartmentRepository, EmployeeRepository, RoleRepository, Store,
};

#[cfg(feature = "postgres")]
pub use store::postgres::PostgresStore;
#[cfg(feature = "sqlite")]
pub use store::sqlite::SqliteStore;
