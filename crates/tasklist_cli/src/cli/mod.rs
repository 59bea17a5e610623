use clap::{Parser, Subcommand};
use tasklist_core::error::AppError;
use tasklist_core::model::TaskId;

#[derive(Parser, Debug)]
#[command(name = "tasklist", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,

    /// Start the session with the tasks from a share link
    #[arg(long, value_name = "LINK", global = true)]
    pub from: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an interactive session (the default)
    ///
    /// Example: tasklist session --from "http://localhost:3000/?tasks=..."
    Session,
    /// Print the tasks encoded in a share link
    ///
    /// Example: tasklist decode "http://localhost:3000/?tasks=..."
    /// Example: tasklist decode "http://localhost:3000/?tasks=..." --filter @sam
    Decode {
        link: String,
        #[arg(long)]
        filter: Option<String>,
    },
}

/// Commands whose argument is the rest of the line, see [`session_argv`].
const FREE_TEXT_COMMANDS: [&str; 5] = ["title", "note", "tag", "due", "filter"];

/// One line typed into the interactive session.
#[derive(Parser, Debug)]
#[command(name = "tasklist", disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Set the draft title to the rest of the line
    ///
    /// Example: title Buy milk
    /// Example: title "  leading spaces need quotes"
    Title {
        #[arg(default_value = "", allow_hyphen_values = true)]
        text: String,
    },
    /// Set the draft note
    ///
    /// Example: note "two litres"
    Note {
        #[arg(default_value = "", allow_hyphen_values = true)]
        text: String,
    },
    /// Set the draft tagged user
    ///
    /// Example: tag @sam
    Tag {
        #[arg(default_value = "", allow_hyphen_values = true)]
        text: String,
    },
    /// Set the draft due date
    ///
    /// Example: due 2024-01-01
    Due {
        #[arg(default_value = "", allow_hyphen_values = true)]
        text: String,
    },
    /// Show the draft and whether a task is being edited
    Draft,
    /// Add the draft as a new task; given values are copied into the draft first
    ///
    /// Example: add "Buy milk" --tag @sam --due 2024-01-01
    Add {
        title: Option<String>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    /// Load a task into the draft for editing
    ///
    /// Example: edit 1700000000000
    Edit { id: TaskId },
    /// Write the draft back into the task being edited
    Save,
    /// Leave edit mode and clear the draft
    Cancel,
    /// Flip a task between open and completed
    ///
    /// Example: toggle 1700000000000
    Toggle { id: TaskId },
    /// Delete a task
    ///
    /// Example: delete 1700000000000
    Delete { id: TaskId },
    /// Show only tasks whose tag contains TEXT; "completed" also matches done tasks
    ///
    /// Example: filter @sam
    /// Example: filter completed
    /// Example: filter (clears the filter)
    Filter {
        #[arg(default_value = "", allow_hyphen_values = true)]
        text: String,
    },
    /// List the tasks that pass the current filter
    ///
    /// Example: list
    /// Example: list --all
    List {
        /// Ignore the current filter
        #[arg(long)]
        all: bool,
    },
    /// Print a share link for the whole list
    ///
    /// Example: share --copy
    Share {
        /// Also copy the link to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Replace the list with the tasks from a share link
    ///
    /// Example: import "http://localhost:3000/?tasks=..."
    Import { link: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Origin,
    Alias(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field.trim(), Some(rest.trim())))
        .unwrap_or((key_raw.trim(), None));

    let canonical_field =
        canonicalize_flag_name(field).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match canonical_field.as_str() {
        "theme" | "origin" if remainder.is_some() => {
            return Err(format!("{canonical_field} override cannot have subfields"));
        }
        "theme" => ConfigOverrideTarget::Theme,
        "origin" => ConfigOverrideTarget::Origin,
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            ConfigOverrideTarget::Alias(alias_name.to_string())
        }
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

/// Turns a session line into clap arguments. Free-text commands keep the
/// rest of the line verbatim as a single argument; when that rest starts
/// with `"` it is unquoted instead. Everything else is split like a shell
/// line.
pub fn session_argv(line: &str) -> Result<Vec<String>, AppError> {
    let trimmed = line.trim_start();
    let (head, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));

    if !FREE_TEXT_COMMANDS.contains(&head) {
        return split_command_line(line);
    }

    let rest = rest.trim_start();
    let text = if rest.starts_with('"') {
        split_command_line(rest)?.join(" ")
    } else {
        rest.to_string()
    };
    Ok(vec![head.to_string(), text])
}

/// Splits a session line into arguments. Double quotes group words; inside
/// quotes `\"` and `\\` are escapes.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            quoted = true;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() || quoted {
                args.push(std::mem::take(&mut current));
                quoted = false;
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() || quoted {
        args.push(current);
    }

    Ok(args)
}
