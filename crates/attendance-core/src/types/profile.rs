//! Employee profile as cached on the client.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Access role of an employee account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    /// Regular employee.
    Employee,
    /// HR administrator.
    HrAdmin,
}

/// Profile row for an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Account key.
    pub user_id: UserId,
    /// Display name.
    pub full_name: String,
    /// Work email.
    pub email: String,
    /// Access role.
    pub role: EmployeeRole,
    /// Department name.
    #[serde(default)]
    pub department: Option<String>,
}

impl UserProfile {
    /// Whether the account may manage other employees.
    pub fn is_hr_admin(&self) -> bool {
        self.role == EmployeeRole::HrAdmin
    }
}
