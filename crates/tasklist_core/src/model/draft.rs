use serde::{Deserialize, Serialize};

use super::{Task, TaskId};

/// Input-form state that has not been committed to the collection yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub title: String,
    pub note: String,
    pub tagged_user: String,
    pub due_date: String,
}

impl Draft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            note: task.note.clone(),
            tagged_user: task.tagged_user.clone(),
            due_date: task.due_date.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.note.is_empty()
            && self.tagged_user.is_empty()
            && self.due_date.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing(TaskId),
}

impl EditState {
    pub fn editing_id(self) -> Option<TaskId> {
        match self {
            Self::Idle => None,
            Self::Editing(id) => Some(id),
        }
    }

    pub fn is_editing(self) -> bool {
        matches!(self, Self::Editing(_))
    }
}
