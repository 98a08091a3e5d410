use crate::domain::Role;

/// Custom actions for User entities.
#[derive(Debug, Clone)]
pub enum UserAction {
    /// Grants a different role. Admin-only at the client layer.
    SetRole(Role),
}
