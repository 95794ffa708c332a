use serde::{Deserialize, Serialize};

pub type TaskId = u64;

// A single to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub complete: bool,
}

impl Task {
    pub fn new(id: TaskId, text: &str) -> Task {
        Task {
            id,
            text: text.to_string(),
            complete: false,
        }
    }
}

/// Next free id: one past the largest id in use, or 1 for an empty list.
/// `None` once the largest id is `TaskId::MAX`.
pub fn next_id(tasks: &[Task]) -> Option<TaskId> {
    match tasks.iter().map(|task| task.id).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}
