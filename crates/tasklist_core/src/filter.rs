use crate::model::Task;

/// Filter text that additionally selects every completed task.
pub const COMPLETED_KEYWORD: &str = "completed";

/// Case-sensitive, untrimmed. An empty filter matches everything.
pub fn matches(filter: &str, task: &Task) -> bool {
    if filter.is_empty() {
        return true;
    }

    task.tagged_user.contains(filter) || (filter == COMPLETED_KEYWORD && task.completed)
}

pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    filter: &'a str,
) -> impl Iterator<Item = &'a Task> + 'a {
    tasks.iter().filter(move |task| matches(filter, task))
}

#[cfg(test)]
mod tests {
    use super::{filter_tasks, matches};
    use crate::model::{Task, TaskId};

    fn task(id: u64, tagged_user: &str, completed: bool) -> Task {
        Task {
            id: TaskId(id),
            title: format!("task {id}"),
            note: String::new(),
            completed,
            tagged_user: tagged_user.to_string(),
            due_date: String::new(),
        }
    }

    fn ids<'a>(tasks: impl Iterator<Item = &'a Task>) -> Vec<u64> {
        tasks.map(|task| task.id.get()).collect()
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let tasks = vec![task(3, "", true), task(1, "@bob", false), task(2, "", false)];
        assert_eq!(ids(filter_tasks(&tasks, "")), vec![3, 1, 2]);
    }

    #[test]
    fn tag_filter_is_case_sensitive_substring() {
        let tasks = vec![
            task(1, "@alice", false),
            task(2, "@Alice", false),
            task(3, "team-alice-b", true),
            task(4, "@bob", false),
        ];
        assert_eq!(ids(filter_tasks(&tasks, "alice")), vec![1, 3]);
    }

    #[test]
    fn filter_is_not_trimmed() {
        let tasks = vec![task(1, "@alice", false)];
        assert!(!matches(" alice", &tasks[0]));
    }

    #[test]
    fn completed_keyword_unions_with_tag_match() {
        let tasks = vec![
            task(1, "", true),
            task(2, "uncompleted-queue", false),
            task(3, "@sam", false),
            task(4, "@sam", true),
        ];
        assert_eq!(ids(filter_tasks(&tasks, "completed")), vec![1, 2, 4]);
    }

    #[test]
    fn keyword_must_match_exactly() {
        let done = task(1, "", true);
        assert!(!matches("Completed", &done));
        assert!(!matches("complete", &done));
    }
}
