//! Leave request detail returned by the related-entity lookup.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::LeaveRequestId;

/// Approval state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Waiting for HR.
    Pending,
    /// Approved by HR.
    Approved,
    /// Rejected by HR.
    Rejected,
    /// Withdrawn by the employee.
    Cancelled,
}

/// Fields shown when a leave notification is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequestDetail {
    /// Leave request key.
    pub id: LeaveRequestId,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Current status.
    pub status: LeaveStatus,
    /// Employee-provided reason.
    #[serde(default)]
    pub reason: Option<String>,
}

impl LeaveRequestDetail {
    /// Number of calendar days covered, counting both ends.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days().max(0) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_count_inclusive() {
        let detail = LeaveRequestDetail {
            id: LeaveRequestId::new(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
            status: LeaveStatus::Approved,
            reason: None,
        };
        assert_eq!(detail.day_count(), 3);
    }
}
