use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::{store::TaskState, task::Task};

/// Human-readable backup of the whole collection
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub tasks: Vec<Task>,
    pub daily_limit: u32,
    pub export_date: Timestamp,
}

impl ExportDocument {
    pub fn from_state(state: &TaskState, exported_at: Timestamp) -> Self {
        Self {
            tasks: state.tasks.clone(),
            daily_limit: state.daily_limit,
            export_date: exported_at,
        }
    }

    /// Default file name, e.g. `totitodo-backup-2024-01-15.json`
    pub fn file_name(&self) -> String {
        format!(
            "totitodo-backup-{}.json",
            self.export_date.strftime("%Y-%m-%d")
        )
    }
}
