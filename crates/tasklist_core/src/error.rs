use thiserror::Error;

use crate::model::TaskId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("invalid_input - {0}")]
    InvalidInput(String),
    #[error("invalid_data - {0}")]
    InvalidData(String),
    #[error("io_error - {0}")]
    Io(String),
    #[error("clipboard - {0}")]
    Clipboard(String),
    #[error("empty_title - title is required")]
    EmptyTitle,
    #[error("edit_in_progress - task {0} is being edited; save or cancel first")]
    EditInProgress(TaskId),
    #[error("no_active_edit - no task is being edited")]
    NoActiveEdit,
    #[error("task_not_found - task {0} not found")]
    TaskNotFound(TaskId),
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn clipboard<M: Into<String>>(message: M) -> Self {
        Self::Clipboard(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
            Self::Clipboard(_) => "clipboard",
            Self::EmptyTitle => "empty_title",
            Self::EditInProgress(_) => "edit_in_progress",
            Self::NoActiveEdit => "no_active_edit",
            Self::TaskNotFound(_) => "task_not_found",
        }
    }

    pub fn message(&self) -> String {
        let rendered = self.to_string();
        match rendered.split_once(" - ") {
            Some((_, message)) => message.to_string(),
            None => rendered,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidData(err.to_string())
    }
}
