//! Share-link codec.
//!
//! A link is `<origin>?tasks=<value>` where `<value>` is the form-urlencoded
//! compact JSON array of every task, in collection order:
//!
//! ```text
//! [{"id":1,"title":"..","note":"..","completed":false,"taggedUser":"..","dueDate":".."}]
//! ```
//!
//! Decoding accepts `+` or `%20` for spaces, so links built with a
//! browser's `encodeURIComponent` decode as well.

use crate::error::AppError;
use crate::model::{Task, TaskId};
use std::collections::HashSet;
use url::Url;
use url::form_urlencoded;

pub const SHARE_PARAM: &str = "tasks";
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

pub fn encode_tasks(tasks: &[Task]) -> Result<String, AppError> {
    let json = serde_json::to_string(tasks)?;
    Ok(form_urlencoded::byte_serialize(json.as_bytes()).collect())
}

/// Builds the full link. Other query parameters already on `origin` are kept;
/// an existing `tasks` parameter is replaced.
pub fn share_link(origin: &str, tasks: &[Task]) -> Result<String, AppError> {
    let mut url = parse_origin(origin)?;
    let json = serde_json::to_string(tasks)?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != SHARE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(SHARE_PARAM, &json);
    }

    Ok(url.into())
}

fn parse_origin(origin: &str) -> Result<Url, AppError> {
    let url = Url::parse(origin.trim())
        .map_err(|err| AppError::invalid_input(format!("invalid origin '{origin}': {err}")))?;
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(AppError::invalid_input(format!(
            "origin '{origin}' must be an absolute URL with a host"
        )));
    }
    Ok(url)
}

/// Accepts a full link, a query string (`?tasks=...`), a bare encoded
/// parameter value, or the raw JSON array.
pub fn parse_share_link(input: &str) -> Result<Vec<Task>, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("share link is required"));
    }

    if trimmed.starts_with('[') {
        return decode_json(trimmed);
    }

    let json = match Url::parse(trimmed) {
        Ok(url) => find_param(url.query_pairs())?,
        Err(_) => {
            let query = trimmed.strip_prefix('?').unwrap_or(trimmed);
            if query.contains('=') {
                find_param(form_urlencoded::parse(query.as_bytes()))?
            } else {
                decode_value(query)
            }
        }
    };

    decode_json(&json)
}

/// Reverses [`encode_tasks`].
pub fn decode_tasks(encoded: &str) -> Result<Vec<Task>, AppError> {
    decode_json(&decode_value(encoded.trim()))
}

fn decode_value(encoded: &str) -> String {
    let query = format!("{SHARE_PARAM}={encoded}");
    form_urlencoded::parse(query.as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

fn find_param<'a, I>(mut pairs: I) -> Result<String, AppError>
where
    I: Iterator<Item = (std::borrow::Cow<'a, str>, std::borrow::Cow<'a, str>)>,
{
    pairs
        .find(|(key, _)| key == SHARE_PARAM)
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| AppError::invalid_input("share link has no tasks parameter"))
}

fn decode_json(json: &str) -> Result<Vec<Task>, AppError> {
    let tasks: Vec<Task> = serde_json::from_str(json)
        .map_err(|err| AppError::invalid_data(format!("invalid task list: {err}")))?;
    ensure_unique_ids(&tasks)?;
    Ok(tasks)
}

pub(crate) fn ensure_unique_ids(tasks: &[Task]) -> Result<(), AppError> {
    let mut seen: HashSet<TaskId> = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(task.id) {
            return Err(AppError::invalid_data(format!("duplicate task id {}", task.id)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, encode_tasks, parse_share_link, share_link};
    use crate::model::{Task, TaskId};

    fn sample() -> Vec<Task> {
        vec![
            Task {
                id: TaskId(1700000000001),
                title: "Buy milk & eggs".to_string(),
                note: "2% only, not 1%".to_string(),
                completed: true,
                tagged_user: "@sam".to_string(),
                due_date: "2024-01-01".to_string(),
            },
            Task {
                id: TaskId(1700000000002),
                title: "Ünïcode ✓ + spaces".to_string(),
                note: "line one\nline two?".to_string(),
                completed: false,
                tagged_user: String::new(),
                due_date: "next friday".to_string(),
            },
        ]
    }

    #[test]
    fn link_round_trips_every_field_in_order() {
        let tasks = sample();
        let link = share_link("https://lists.example.com", &tasks).unwrap();

        assert!(link.starts_with("https://lists.example.com/?tasks="));
        assert_eq!(parse_share_link(&link).unwrap(), tasks);
    }

    #[test]
    fn encoded_value_is_url_safe() {
        let encoded = encode_tasks(&sample()).unwrap();

        assert!(!encoded.contains('&'));
        assert!(!encoded.contains('='));
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains('"'));
        assert!(!encoded.contains('\n'));
        assert_eq!(decode_tasks(&encoded).unwrap(), sample());
    }

    #[test]
    fn existing_query_parameters_are_kept_and_tasks_replaced() {
        let link = share_link("https://example.com/app?lang=en&tasks=stale", &sample()).unwrap();

        assert!(link.starts_with("https://example.com/app?lang=en&tasks="));
        assert_eq!(link.matches("tasks=").count(), 1);
        assert_eq!(parse_share_link(&link).unwrap(), sample());
    }

    #[test]
    fn empty_collection_encodes_as_empty_array() {
        let link = share_link("http://localhost:3000", &[]).unwrap();
        assert_eq!(link, "http://localhost:3000/?tasks=%5B%5D");
        assert!(parse_share_link(&link).unwrap().is_empty());
    }

    #[test]
    fn accepts_percent_twenty_spaces() {
        let link = "http://localhost:3000?tasks=%5B%7B%22id%22%3A5%2C%22title%22%3A%22Buy%20milk%22%2C%22note%22%3A%22%22%2C%22completed%22%3Afalse%2C%22taggedUser%22%3A%22%40sam%22%2C%22dueDate%22%3A%22%22%7D%5D";
        let tasks = parse_share_link(link).unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, TaskId(5));
        assert_eq!(tasks[0].title, "Buy milk");
        assert_eq!(tasks[0].tagged_user, "@sam");
    }

    #[test]
    fn accepts_query_string_bare_value_and_raw_json() {
        let encoded = encode_tasks(&sample()).unwrap();
        let json = serde_json::to_string(&sample()).unwrap();

        assert_eq!(parse_share_link(&format!("?tasks={encoded}")).unwrap(), sample());
        assert_eq!(parse_share_link(&encoded).unwrap(), sample());
        assert_eq!(parse_share_link(&json).unwrap(), sample());
    }

    #[test]
    fn rejects_link_without_tasks_parameter() {
        let err = parse_share_link("https://example.com/?lang=en").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn rejects_malformed_payload() {
        let err = parse_share_link("https://example.com/?tasks=%5B%7Bbroken").unwrap_err();
        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = parse_share_link(r#"[{"id":1,"title":"a"},{"id":1,"title":"b"}]"#).unwrap_err();
        assert_eq!(err.code(), "invalid_data");
        assert!(err.message().contains("duplicate task id 1"));
    }

    #[test]
    fn rejects_relative_origin() {
        let err = share_link("not a url", &sample()).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }
}
