use crate::domain::Role;

/// Custom actions for staff accounts.
#[derive(Debug, Clone)]
pub enum StaffAction {
    /// Grants or revokes admin rights.
    SetRole(Role),
}

/// Results from StaffActions - variants match 1:1 with StaffAction
#[derive(Debug, Clone, PartialEq)]
pub enum StaffActionResult {
    /// The role held before the change.
    SetRole(Role),
}
