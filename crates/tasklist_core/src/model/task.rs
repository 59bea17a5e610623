use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

use super::Draft;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl TaskId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TaskId)
    }
}

/// Field order matches the share-link payload: `id, title, note, completed,
/// taggedUser, dueDate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub tagged_user: String,
    #[serde(default)]
    pub due_date: String,
}

impl Task {
    pub fn from_draft(id: TaskId, draft: &Draft) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            note: draft.note.clone(),
            completed: false,
            tagged_user: draft.tagged_user.clone(),
            due_date: draft.due_date.clone(),
        }
    }

    /// Overwrites the editable fields. `id` and `completed` are left alone.
    pub fn apply_draft(&mut self, draft: &Draft) {
        self.title = draft.title.clone();
        self.note = draft.note.clone();
        self.tagged_user = draft.tagged_user.clone();
        self.due_date = draft.due_date.clone();
    }
}

/// Hands out strictly increasing ids for one session. Once `u64::MAX` has
/// been handed out (or reserved) the generator is exhausted for good.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    next: Option<u64>,
}

impl IdGenerator {
    pub fn starting_at(first: u64) -> Self {
        Self { next: Some(first) }
    }

    /// Seeds the counter with the current Unix time in milliseconds.
    pub fn from_clock() -> Self {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        Self::starting_at(u64::try_from(millis).unwrap_or(1))
    }

    /// Returns `None` when every id has been used; the generator is left
    /// unchanged in that case.
    pub fn next_id(&mut self) -> Option<TaskId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(TaskId(id))
    }

    /// Makes sure no future id is less than or equal to `id`.
    pub fn reserve_past(&mut self, id: TaskId) {
        if let Some(next) = self.next
            && id.0 >= next
        {
            self.next = id.0.checked_add(1);
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::from_clock()
    }
}
