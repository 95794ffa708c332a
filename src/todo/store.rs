use crate::error::{StorageError, StoreError};
use crate::ops::kv::KeyValueStore;
use crate::todo::models::{Task, TaskId, next_id};

/// Storage key the task list is persisted under.
pub const TASKS_KEY: &str = "todos";

pub type ChangeListener = Box<dyn Fn(&[Task])>;

/// Owns the task list and its persistence.
///
/// Every mutation is followed by a commit: the change listener is called
/// with the new list, then the list is written to the key-value store.
pub struct TaskStore {
    tasks: Vec<Task>,
    storage: Box<dyn KeyValueStore>,
    on_change: Option<ChangeListener>,
}

impl TaskStore {
    /// Loads the persisted task list. Absent or malformed data yields an empty list.
    pub fn load(storage: Box<dyn KeyValueStore>) -> TaskStore {
        let tasks = match storage.get(TASKS_KEY) {
            Some(text) => serde_json::from_str::<Vec<Task>>(&text).unwrap_or_else(|err| {
                tracing::warn!("discarding malformed task data: {err}");
                Vec::new()
            }),
            None => Vec::new(),
        };
        tracing::info!(count = tasks.len(), "loaded tasks");

        TaskStore {
            tasks,
            storage,
            on_change: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Sets the change listener, replacing any earlier one.
    pub fn register_change_listener(&mut self, listener: impl Fn(&[Task]) + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    pub fn add_task(&mut self, text: &str) -> Result<(), StoreError> {
        self.ensure_listener()?;
        let Some(id) = next_id(&self.tasks) else {
            let max = self.tasks.iter().map(|task| task.id).max().unwrap_or_default();
            return Err(StoreError::IdsExhausted(max));
        };
        let task = Task::new(id, text);
        tracing::debug!(id = task.id, "adding task");
        self.tasks.push(task);
        self.commit()
    }

    /// Replaces the text of the matching task. Unknown ids leave the list as is.
    pub fn edit_task(&mut self, id: TaskId, text: &str) -> Result<(), StoreError> {
        self.ensure_listener()?;
        tracing::debug!(id, "editing task");
        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                if task.id == id {
                    Task {
                        text: text.to_string(),
                        ..task.clone()
                    }
                } else {
                    task.clone()
                }
            })
            .collect();
        self.commit()
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<(), StoreError> {
        self.ensure_listener()?;
        tracing::debug!(id, "deleting task");
        self.tasks = self
            .tasks
            .iter()
            .filter(|task| task.id != id)
            .cloned()
            .collect();
        self.commit()
    }

    pub fn toggle_task(&mut self, id: TaskId) -> Result<(), StoreError> {
        self.ensure_listener()?;
        tracing::debug!(id, "toggling task");
        self.tasks = self
            .tasks
            .iter()
            .map(|task| {
                if task.id == id {
                    Task {
                        complete: !task.complete,
                        ..task.clone()
                    }
                } else {
                    task.clone()
                }
            })
            .collect();
        self.commit()
    }

    // Checked up front so a rejected mutation never changes the list.
    fn ensure_listener(&self) -> Result<(), StoreError> {
        if self.on_change.is_some() {
            Ok(())
        } else {
            Err(StoreError::NoListener)
        }
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        let Some(on_change) = &self.on_change else {
            return Err(StoreError::NoListener);
        };
        on_change(&self.tasks);

        let serialized = serde_json::to_string(&self.tasks).map_err(StorageError::from)?;
        self.storage.set(TASKS_KEY, serialized)?;
        tracing::debug!(count = self.tasks.len(), "committed tasks");
        Ok(())
    }
}
