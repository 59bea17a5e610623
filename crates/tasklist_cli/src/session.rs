use crate::cli::SessionCommand;
use crate::clipboard::Clipboard;
use crate::render;
use std::io::Write;
use tasklist_core::config::{Config, Palette, palette_for_theme};
use tasklist_core::error::AppError;
use tasklist_core::model::TaskId;
use tasklist_core::store::TaskStore;

/// Presentation layer over one [`TaskStore`] for the lifetime of a session.
pub struct Session {
    store: TaskStore,
    config: Config,
    palette: Palette,
    json: bool,
    clipboard: Box<dyn Clipboard>,
}

impl Session {
    pub fn new(store: TaskStore, config: Config, json: bool, clipboard: Box<dyn Clipboard>) -> Self {
        let palette = palette_for_theme(config.theme.as_deref());
        Self {
            store,
            config,
            palette,
            json,
            clipboard,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn execute<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> Result<(), AppError> {
        match command {
            SessionCommand::Title { text } => {
                self.store.set_title(text);
                self.print_draft(out)
            }
            SessionCommand::Note { text } => {
                self.store.set_note(text);
                self.print_draft(out)
            }
            SessionCommand::Tag { text } => {
                self.store.set_tagged_user(text);
                self.print_draft(out)
            }
            SessionCommand::Due { text } => {
                self.store.set_due_date(text);
                self.print_draft(out)
            }
            SessionCommand::Draft => self.print_draft(out),
            SessionCommand::Add {
                title,
                note,
                tag,
                due,
            } => {
                if self.store.edit_state().is_editing() {
                    return self.store.create_task().map(|_| ());
                }
                let mut draft = self.store.draft().clone();
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(note) = note {
                    draft.note = note;
                }
                if let Some(tag) = tag {
                    draft.tagged_user = tag;
                }
                if let Some(due) = due {
                    draft.due_date = due;
                }
                self.store.set_draft(draft);

                let task = self.store.create_task()?;
                if self.json {
                    emit(out, render::task_json(task))
                } else {
                    emit(out, format!("Added task: {} ({})", task.title, task.id))
                }
            }
            SessionCommand::Edit { id } => {
                self.store.begin_edit(id)?;
                if !self.json {
                    emit(out, format!("Editing task {id}"))?;
                }
                self.print_draft(out)
            }
            SessionCommand::Save => {
                let task = self.store.save_edit()?;
                if self.json {
                    emit(out, render::task_json(task))
                } else {
                    emit(out, format!("Saved task: {} ({})", task.title, task.id))
                }
            }
            SessionCommand::Cancel => {
                let cancelled = self.store.cancel_edit();
                if self.json {
                    return emit(out, serde_json::json!({ "cancelled": cancelled }));
                }
                match cancelled {
                    Some(id) => emit(out, format!("Cancelled edit of task {id}")),
                    None => emit(out, "No edit in progress"),
                }
            }
            SessionCommand::Toggle { id } => match self.store.toggle_complete(id) {
                Some(task) if self.json => emit(out, render::task_json(task)),
                Some(task) => {
                    let verb = if task.completed { "Completed" } else { "Reopened" };
                    emit(out, format!("{verb} task: {} ({})", task.title, task.id))
                }
                None => self.report_missing(id, out),
            },
            SessionCommand::Delete { id } => match self.store.delete_task(id) {
                Some(task) if self.json => emit(out, render::task_json(&task)),
                Some(task) => emit(out, format!("Deleted task: {} ({})", task.title, task.id)),
                None => self.report_missing(id, out),
            },
            SessionCommand::Filter { text } => {
                self.store.set_filter(text);
                if self.json {
                    return emit(out, serde_json::json!({ "filter": self.store.filter() }));
                }
                if self.store.filter().is_empty() {
                    emit(out, "Filter cleared")
                } else {
                    emit(out, format!("Filter set to '{}'", self.store.filter()))
                }
            }
            SessionCommand::List { all } => self.print_list(all, out),
            SessionCommand::Share { copy } => {
                let link = self.store.export_shareable(self.config.origin())?;
                if self.json {
                    emit(
                        out,
                        serde_json::json!({ "link": link, "count": self.store.len() }),
                    )?;
                } else {
                    emit(out, &link)?;
                }

                if copy {
                    self.clipboard.write_text(&link)?;
                    if !self.json {
                        emit(out, self.palette.mutedize("Shareable link copied to clipboard"))?;
                    }
                }
                Ok(())
            }
            SessionCommand::Import { link } => {
                let imported = TaskStore::import_shareable(&link)?;
                if self.store.edit_state().is_editing() {
                    tracing::debug!("import discarded an in-progress edit");
                }
                self.store = imported;
                if self.json {
                    emit(out, serde_json::json!({ "imported": self.store.len() }))
                } else {
                    emit(out, format!("Imported {} task(s)", self.store.len()))
                }
            }
        }
    }

    fn print_draft<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        let draft = self.store.draft();
        let editing = self.store.edit_state();
        if self.json {
            return emit(out, render::draft_json(draft, editing));
        }
        for line in render::draft_lines(draft, editing, &self.palette) {
            emit(out, line)?;
        }
        Ok(())
    }

    fn print_list<W: Write>(&self, all: bool, out: &mut W) -> Result<(), AppError> {
        let editing = self.store.edit_state();
        let (tasks, filter): (Vec<_>, &str) = if all {
            (self.store.tasks().iter().collect(), "")
        } else {
            (self.store.visible_tasks().collect(), self.store.filter())
        };

        if self.json {
            return emit(out, render::tasks_json(tasks));
        }

        emit(
            out,
            render::list_heading(tasks.len(), self.store.len(), filter, &self.palette),
        )?;
        if tasks.is_empty() {
            return emit(out, self.palette.mutedize("No tasks"));
        }
        emit(out, render::task_table(tasks, editing))
    }

    fn report_missing<W: Write>(&self, id: TaskId, out: &mut W) -> Result<(), AppError> {
        tracing::debug!(%id, "no task with that id");
        if self.json {
            emit(out, serde_json::Value::Null)
        } else {
            emit(out, self.palette.mutedize(&format!("No task with id {id}")))
        }
    }
}

fn emit<W: Write, T: std::fmt::Display>(out: &mut W, value: T) -> Result<(), AppError> {
    writeln!(out, "{value}").map_err(|err| AppError::io(err.to_string()))
}
