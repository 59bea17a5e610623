use crate::error::AppError;
use crate::filter;
use crate::model::{Draft, EditState, IdGenerator, Task, TaskId};
use crate::share;

/// The whole application state: tasks, the draft being composed, the edit
/// state, and the active filter.
///
/// Every method that returns `Err` leaves the store exactly as it found it.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    draft: Draft,
    edit_state: EditState,
    filter: String,
    ids: IdGenerator,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::with_id_generator(IdGenerator::from_clock())
    }

    pub fn with_id_generator(ids: IdGenerator) -> Self {
        Self {
            tasks: Vec::new(),
            draft: Draft::default(),
            edit_state: EditState::Idle,
            filter: String::new(),
            ids,
        }
    }

    /// Builds a store around an existing collection. Ids must be unique;
    /// the id generator is moved past the largest one.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, AppError> {
        let mut store = Self::new();
        store.replace_tasks(tasks)?;
        Ok(store)
    }

    /// Rebuilds a store from a share link produced by [`TaskStore::export_shareable`].
    pub fn import_shareable(link: &str) -> Result<Self, AppError> {
        let tasks = share::parse_share_link(link)?;
        tracing::debug!(count = tasks.len(), "imported shared tasks");
        Self::from_tasks(tasks)
    }

    fn replace_tasks(&mut self, tasks: Vec<Task>) -> Result<(), AppError> {
        share::ensure_unique_ids(&tasks)?;
        for task in &tasks {
            self.ids.reserve_past(task.id);
        }
        self.tasks = tasks;
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn edit_state(&self) -> EditState {
        self.edit_state
    }

    pub fn set_title<T: Into<String>>(&mut self, title: T) {
        self.draft.title = title.into();
    }

    pub fn set_note<T: Into<String>>(&mut self, note: T) {
        self.draft.note = note.into();
    }

    pub fn set_tagged_user<T: Into<String>>(&mut self, tagged_user: T) {
        self.draft.tagged_user = tagged_user.into();
    }

    pub fn set_due_date<T: Into<String>>(&mut self, due_date: T) {
        self.draft.due_date = due_date.into();
    }

    /// Replaces the draft wholesale.
    pub fn set_draft(&mut self, draft: Draft) {
        self.draft = draft;
    }

    /// Commits the draft as a new task at the end of the collection.
    ///
    /// Only an empty title is rejected; whitespace counts as a title.
    pub fn create_task(&mut self) -> Result<&Task, AppError> {
        if let EditState::Editing(id) = self.edit_state {
            tracing::debug!(%id, "create rejected while editing");
            return Err(AppError::EditInProgress(id));
        }
        if self.draft.title.is_empty() {
            tracing::debug!("create rejected: empty title");
            return Err(AppError::EmptyTitle);
        }

        let id = self.ids.next_id().ok_or_else(|| {
            tracing::debug!("create rejected: ids exhausted");
            AppError::invalid_data("task ids exhausted")
        })?;
        self.tasks.push(Task::from_draft(id, &self.draft));
        self.draft.clear();
        tracing::debug!(%id, "task created");

        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Returns the removed task, or `None` when no task has that id.
    pub fn delete_task(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        let removed = self.tasks.remove(index);
        tracing::debug!(%id, "task deleted");
        Some(removed)
    }

    /// Flips `completed`. Returns `None` when no task has that id.
    pub fn toggle_complete(&mut self, id: TaskId) -> Option<&Task> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        tracing::debug!(%id, completed = task.completed, "task toggled");
        Some(&*task)
    }

    /// Loads the task into the draft and enters edit mode. Any in-progress
    /// draft is overwritten.
    pub fn begin_edit(&mut self, id: TaskId) -> Result<&Draft, AppError> {
        let task = self.task(id).ok_or(AppError::TaskNotFound(id))?;
        let draft = Draft::from_task(task);

        if let EditState::Editing(previous) = self.edit_state
            && previous != id
        {
            tracing::debug!(%previous, %id, "discarding previous edit");
        }

        self.draft = draft;
        self.edit_state = EditState::Editing(id);
        Ok(&self.draft)
    }

    /// Writes the draft back into the task being edited and returns to idle.
    pub fn save_edit(&mut self) -> Result<&Task, AppError> {
        let id = self.edit_state.editing_id().ok_or(AppError::NoActiveEdit)?;
        if self.draft.title.is_empty() {
            tracing::debug!(%id, "save rejected: empty title");
            return Err(AppError::EmptyTitle);
        }

        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(AppError::TaskNotFound(id))?;

        self.tasks[index].apply_draft(&self.draft);
        self.edit_state = EditState::Idle;
        self.draft.clear();
        tracing::debug!(%id, "task saved");

        Ok(&self.tasks[index])
    }

    /// Leaves edit mode and clears the draft. Returns the id that was being
    /// edited, if any.
    pub fn cancel_edit(&mut self) -> Option<TaskId> {
        let id = self.edit_state.editing_id()?;
        self.edit_state = EditState::Idle;
        self.draft.clear();
        tracing::debug!(%id, "edit cancelled");
        Some(id)
    }

    pub fn set_filter<T: Into<String>>(&mut self, filter: T) {
        self.filter = filter.into();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        filter::filter_tasks(&self.tasks, &self.filter)
    }

    /// Encodes the full collection, ignoring the filter, as
    /// `<origin>?tasks=...`. Delivering the link is up to the caller.
    pub fn export_shareable(&self, origin: &str) -> Result<String, AppError> {
        share::share_link(origin, &self.tasks)
    }
}
