//! Role-scoped navigation.
//!
//! Purely presentational: hiding an entry here grants or denies nothing.
//! The edge gate and page guard remain the enforcement points.

use serde::Serialize;

use crate::Role;

/// What an entry lets the user do, for the view layer to pick icons/forms.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Overview,
    ManageBranches,
    ManageEmployees,
    ViewTransactions,
    NewTransfer,
    ViewReports,
    ViewInventory,
    ViewProfit,
    Settings,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub route: &'static str,
    pub label: &'static str,
    pub capability: Capability,
}

struct MenuItem {
    entry: NavEntry,
    roles: &'static [Role],
}

const fn item(route: &'static str, label: &'static str, capability: Capability, roles: &'static [Role]) -> MenuItem {
    MenuItem {
        entry: NavEntry { route, label, capability },
        roles,
    }
}

const D: &[Role] = &[Role::Director];
const BM: &[Role] = &[Role::BranchManager];
const BM_EMP: &[Role] = &[Role::BranchManager, Role::Employee];
const EMP: &[Role] = &[Role::Employee];

// Master menu, in display order.
const MENU: &[MenuItem] = &[
    item("/dashboard/director", "Home", Capability::Overview, D),
    item("/dashboard/branches", "Branches", Capability::ManageBranches, D),
    item("/dashboard/employees", "Employees", Capability::ManageEmployees, D),
    item("/dashboard/transactions", "Transactions", Capability::ViewTransactions, D),
    item("/money-transfer?role=director", "New transfer", Capability::NewTransfer, D),
    item("/dashboard/reports", "Reports", Capability::ViewReports, D),
    item("/dashboard/inventory", "Inventory", Capability::ViewInventory, D),
    item("/dashboard/settings", "Settings", Capability::Settings, D),
    item("/branch-dashboard", "Home", Capability::Overview, BM),
    item("/branch-dashboard/employees", "Employees", Capability::ManageEmployees, BM),
    item("/money-transfer", "Transfers", Capability::NewTransfer, BM_EMP),
    item("/money-transfer/employee-dashboard", "My transfers", Capability::ViewTransactions, EMP),
    item("/branch-dashboard/reports", "Reports", Capability::ViewReports, BM),
    item("/branch-dashboard/profit", "Profit", Capability::ViewProfit, BM),
    item("/branch-dashboard/settings", "Settings", Capability::Settings, BM),
];

/// Menu for `role`. Deterministic, no I/O.
pub fn compose(role: Role) -> Vec<NavEntry> {
    MENU.iter()
        .filter(|item| item.roles.contains(&role))
        .map(|item| item.entry)
        .collect()
}
