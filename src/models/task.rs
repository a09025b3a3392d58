use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// UUID to identify the task
    pub id: Uuid,
    /// Title of the task
    pub title: String,
    /// Optional longer text shown under the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the task is done. Always paired with `completed_at`
    #[serde(default)]
    pub completed: bool,
    /// When the task was created
    pub created_at: Timestamp,
    /// When the task was completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    /// Day the task is planned for. `None` keeps it in the backlog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<Timestamp>,
    /// Not used for ordering or classification yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Task {
    pub fn new(id: Uuid, title: String, description: Option<String>, now: Timestamp) -> Self {
        Self {
            id,
            title,
            description,
            completed: false,
            created_at: now,
            completed_at: None,
            scheduled_date: Some(now),
            priority: None,
        }
    }

    /// `completed` and `completed_at` agree
    pub fn is_consistent(&self) -> bool {
        self.completed == self.completed_at.is_some()
    }

    /// Flips completion, stamping or clearing `completed_at` with it
    pub fn set_completed(&mut self, completed: bool, now: Timestamp) {
        if completed == self.completed {
            return;
        }
        self.completed = completed;
        self.completed_at = completed.then_some(now);
    }

    /// First eight hex digits of the id, as shown in listings
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}

/// Fields to replace on an existing task.
///
/// `None` leaves the field alone; for optional task fields `Some(None)` clears it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub scheduled_date: Option<Option<Timestamp>>,
    pub priority: Option<Option<Priority>>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn schedule(date: Option<Timestamp>) -> Self {
        Self {
            scheduled_date: Some(date),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_camel_case_and_omits_absent_fields() {
        let now: Timestamp = "2024-01-15T09:30:00Z".parse().unwrap();
        let task = Task::new(Uuid::nil(), String::from("Buy milk"), None, now);

        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["createdAt"], "2024-01-15T09:30:00Z");
        assert_eq!(value["scheduledDate"], "2024-01-15T09:30:00Z");
        assert_eq!(value["completed"], false);
        assert!(value.get("completedAt").is_none());
        assert!(value.get("description").is_none());
        assert!(value.get("priority").is_none());
    }

    #[test]
    fn test_deserializes_browser_style_timestamps() {
        let json = r#"{
            "id": "6f1c1f8e-2a55-4a5c-9a8e-2b0b8f0e5a11",
            "title": "Write report",
            "completed": true,
            "createdAt": "2024-01-14T08:00:00.000Z",
            "completedAt": "2024-01-15T17:45:12.345Z",
            "priority": "high"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.title, "Write report");
        assert_eq!(task.priority, Some(Priority::High));
        assert_eq!(
            task.completed_at,
            Some("2024-01-15T17:45:12.345Z".parse().unwrap())
        );
        assert_eq!(task.scheduled_date, None);
        assert!(task.is_consistent());
    }

    #[test]
    fn test_set_completed_keeps_timestamp_paired() {
        let now: Timestamp = "2024-01-15T09:30:00Z".parse().unwrap();
        let later: Timestamp = "2024-01-15T10:00:00Z".parse().unwrap();
        let mut task = Task::new(Uuid::new_v4(), String::from("Call mom"), None, now);

        task.set_completed(true, now);
        assert_eq!(task.completed_at, Some(now));

        // Re-completing does not move the stamp
        task.set_completed(true, later);
        assert_eq!(task.completed_at, Some(now));

        task.set_completed(false, later);
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
    }

    #[test]
    fn test_short_id_is_eight_hex_digits() {
        let id = Uuid::parse_str("6f1c1f8e-2a55-4a5c-9a8e-2b0b8f0e5a11").unwrap();
        let task = Task {
            id,
            ..Task::default()
        };
        assert_eq!(task.short_id(), "6f1c1f8e");
    }
}
