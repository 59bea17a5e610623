use tabled::settings::Style;
use tabled::{Table, Tabled};
use tasklist_core::config::Palette;
use tasklist_core::model::{Draft, EditState, Task};

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Tagged")]
    tagged_user: String,
    #[tabled(rename = "Due")]
    due_date: String,
    #[tabled(rename = "Note")]
    note: String,
}

impl TaskRow {
    fn new(task: &Task, editing: EditState) -> Self {
        let id = if editing.editing_id() == Some(task.id) {
            format!("{} *", task.id)
        } else {
            task.id.to_string()
        };

        Self {
            id,
            done: if task.completed { "[x]" } else { "[ ]" },
            title: task.title.clone(),
            tagged_user: task.tagged_user.clone(),
            due_date: task.due_date.clone(),
            note: task.note.clone(),
        }
    }
}

/// Renders the tasks as a table. The task being edited is marked with `*`.
pub fn task_table<'a>(tasks: impl IntoIterator<Item = &'a Task>, editing: EditState) -> String {
    let rows: Vec<TaskRow> = tasks
        .into_iter()
        .map(|task| TaskRow::new(task, editing))
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn list_heading(shown: usize, total: usize, filter: &str, palette: &Palette) -> String {
    if filter.is_empty() {
        palette.accentize(&format!("{total} task(s)"))
    } else {
        palette.accentize(&format!("{shown} of {total} task(s) matching '{filter}'"))
    }
}

pub fn draft_lines(draft: &Draft, editing: EditState, palette: &Palette) -> Vec<String> {
    let mode = match editing {
        EditState::Idle => "new task".to_string(),
        EditState::Editing(id) => format!("editing task {id}"),
    };

    vec![
        palette.accentize(&format!("Draft ({mode})")),
        format!("  title: {}", draft.title),
        format!("  note:  {}", draft.note),
        format!("  tag:   {}", draft.tagged_user),
        format!("  due:   {}", draft.due_date),
    ]
}

pub fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({
        "id": task.id,
        "title": task.title,
        "note": task.note,
        "completed": task.completed,
        "taggedUser": task.tagged_user,
        "dueDate": task.due_date,
    })
}

pub fn tasks_json<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> serde_json::Value {
    serde_json::Value::Array(tasks.into_iter().map(task_json).collect())
}

pub fn draft_json(draft: &Draft, editing: EditState) -> serde_json::Value {
    serde_json::json!({
        "title": draft.title,
        "note": draft.note,
        "taggedUser": draft.tagged_user,
        "dueDate": draft.due_date,
        "editing": editing.editing_id(),
    })
}

#[cfg(test)]
mod tests {
    use super::{draft_json, list_heading, task_table, tasks_json};
    use tasklist_core::config::palette_for_theme;
    use tasklist_core::model::{Draft, EditState, Task, TaskId};

    fn task(id: u64, title: &str, completed: bool) -> Task {
        Task {
            id: TaskId(id),
            title: title.to_string(),
            note: String::new(),
            completed,
            tagged_user: "@sam".to_string(),
            due_date: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn table_lists_every_task_with_done_marker() {
        let tasks = vec![task(1, "Buy milk", true), task(2, "Walk dog", false)];
        let table = task_table(&tasks, EditState::Editing(TaskId(2)));

        assert!(table.contains("Buy milk"));
        assert!(table.contains("[x]"));
        assert!(table.contains("[ ]"));
        assert!(table.contains("2 *"));
        assert!(table.contains("Tagged"));
    }

    #[test]
    fn heading_mentions_filter() {
        let palette = palette_for_theme(None);
        assert_eq!(list_heading(3, 3, "", &palette), "3 task(s)");
        assert_eq!(
            list_heading(1, 3, "@sam", &palette),
            "1 of 3 task(s) matching '@sam'"
        );
    }

    #[test]
    fn json_uses_share_link_keys() {
        let value = tasks_json(&[task(5, "Buy milk", false)]);
        assert_eq!(value[0]["id"], 5);
        assert_eq!(value[0]["taggedUser"], "@sam");
        assert_eq!(value[0]["dueDate"], "2024-01-01");
        assert_eq!(value[0]["completed"], false);

        let titled = Draft {
            title: "x".to_string(),
            ..Draft::default()
        };
        let draft = draft_json(&titled, EditState::Editing(TaskId(9)));
        assert_eq!(draft["title"], "x");
        assert_eq!(draft["editing"], 9);

        let idle = draft_json(&Draft::default(), EditState::Idle);
        assert!(idle["editing"].is_null());
    }
}
