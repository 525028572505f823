use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

fn default_priority() -> i32 {
    1
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task, assigned by the database.
    pub id: i64,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    pub description: Option<String>,
    /// The priority of the task.
    pub priority: i32,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Identifier of the user who owns the task.
    pub user_id: i64,
}

/// Input structure for creating a task.
///
/// There is deliberately no `completed` field: a new task always starts
/// incomplete, whatever the client sends.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskCreate {
    /// The title of the task.
    /// Must be between 1 and 255 characters.
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// An optional description for the task.
    pub description: Option<String>,

    /// The priority of the task; 1 when omitted.
    #[serde(default = "default_priority")]
    pub priority: i32,
}

/// Patch structure for updating a task.
///
/// Only the fields present in the request are applied; absent fields leave
/// the stored values untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskUpdate {
    /// New title, if present. Must remain non-empty.
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    /// New description, if present.
    pub description: Option<String>,

    /// New priority, if present.
    pub priority: Option<i32>,

    /// New completion state, if present.
    pub completed: Option<bool>,
}

/// Represents query parameters for filtering tasks when listing them.
/// Both filters are exact-match and are AND-combined when both are present.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    /// Filter tasks by completion state.
    pub completed: Option<bool>,
    /// Filter tasks by priority.
    pub priority: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_task_create_defaults() {
        let input: TaskCreate = serde_json::from_value(json!({
            "title": "Buy groceries"
        }))
        .unwrap();

        assert_eq!(input.title, "Buy groceries");
        assert_eq!(input.description, None);
        assert_eq!(input.priority, 1);
    }

    #[test]
    fn test_task_create_ignores_completed_flag() {
        // A client cannot create a task in the completed state; the field
        // simply does not exist on the input and is dropped if sent.
        let input: TaskCreate = serde_json::from_value(json!({
            "title": "Buy groceries",
            "completed": true
        }))
        .unwrap();

        assert_eq!(input.title, "Buy groceries");
        assert_eq!(input.priority, 1);
    }

    #[test]
    fn test_task_update_absent_fields_stay_unset() {
        let patch: TaskUpdate = serde_json::from_value(json!({
            "priority": 5
        }))
        .unwrap();

        assert_eq!(patch.title, None);
        assert_eq!(patch.description, None);
        assert_eq!(patch.priority, Some(5));
        assert_eq!(patch.completed, None);
    }

    #[test]
    fn test_title_validation() {
        let empty_title = TaskCreate {
            title: "".to_string(),
            description: None,
            priority: 1,
        };
        assert!(empty_title.validate().is_err());

        let long_title = TaskCreate {
            title: "a".repeat(256),
            description: None,
            priority: 1,
        };
        assert!(long_title.validate().is_err());

        let valid = TaskCreate {
            title: "Valid Task".to_string(),
            description: Some("Details".to_string()),
            priority: 3,
        };
        assert!(valid.validate().is_ok());

        // The same rule applies to a patched title.
        let empty_patch_title = TaskUpdate {
            title: Some("".to_string()),
            description: None,
            priority: None,
            completed: None,
        };
        assert!(empty_patch_title.validate().is_err());

        let untouched_title = TaskUpdate {
            title: None,
            description: None,
            priority: Some(2),
            completed: Some(true),
        };
        assert!(untouched_title.validate().is_ok());
    }
}
