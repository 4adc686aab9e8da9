//! Taskey operations and the endpoints they target.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TaskeyError;

/// Record types Taskey accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Add a new lead
    AddLead,
    /// Add a new purchase
    AddPurchase,
    /// Add a new task
    AddTask,
    /// Add a new meeting
    AddMeeting,
}

impl Operation {
    /// All operations, in display order.
    pub const ALL: [Self; 4] = [
        Self::AddLead,
        Self::AddPurchase,
        Self::AddTask,
        Self::AddMeeting,
    ];

    /// Script name under `/webapi/` that handles this operation.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::AddLead => "AddLead.php",
            Self::AddPurchase => "AddPurchase.php",
            Self::AddTask => "AddTask.php",
            Self::AddMeeting => "AddMeeting.php",
        }
    }

    /// Wire value used in input records.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AddLead => "addLead",
            Self::AddPurchase => "addPurchase",
            Self::AddTask => "addTask",
            Self::AddMeeting => "addMeeting",
        }
    }

    /// Get display name for this operation.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::AddLead => "Add Lead",
            Self::AddPurchase => "Add Purchase",
            Self::AddTask => "Add Task",
            Self::AddMeeting => "Add Meeting",
        }
    }

    /// Short action description.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::AddLead => "Add a new lead",
            Self::AddPurchase => "Add a new purchase",
            Self::AddTask => "Add a new task",
            Self::AddMeeting => "Add a new meeting",
        }
    }

    /// Form field carrying the contact email.
    ///
    /// The purchase and task scripts read `mail`, the lead and meeting
    /// scripts read `email`.
    #[must_use]
    pub const fn email_field(&self) -> &'static str {
        match self {
            Self::AddPurchase | Self::AddTask => "mail",
            Self::AddLead | Self::AddMeeting => "email",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = TaskeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| TaskeyError::UnknownOperation(s.to_string()))
    }
}
