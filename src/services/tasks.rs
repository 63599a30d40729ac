//! Tasks service — provider task list ordered by position rank key.

use crate::store::EntityStore;
use crate::types::Task;

#[derive(Debug, Default)]
pub struct TaskStore {
    store: EntityStore<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, tasks: Vec<Task>) {
        self.store.upsert(tasks);
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.store.get(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Task> {
        self.store.all()
    }

    /// Every task by position ascending; ties and NaN positions fall back
    /// to id order so the result is deterministic.
    pub fn ordered(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.store.all().collect();
        tasks.sort_by(|a, b| {
            a.position
                .total_cmp(&b.position)
                .then_with(|| a.id.cmp(&b.id))
        });
        tasks
    }

    /// Tasks with no parent, by position.
    pub fn top_level(&self) -> Vec<&Task> {
        self.ordered()
            .into_iter()
            .filter(|t| t.parent_id.is_none())
            .collect()
    }

    /// Children of a task, by position.
    pub fn subtasks_of(&self, parent_id: &str) -> Vec<&Task> {
        self.ordered()
            .into_iter()
            .filter(|t| t.parent_id.as_deref() == Some(parent_id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}
