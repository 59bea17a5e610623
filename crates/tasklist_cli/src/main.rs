use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, BufRead, Write};
use tasklist_cli::cli::{
    Cli, Command, ConfigOverrideTarget, SessionLine, normalize_parse_error, parse_config_override,
    session_argv,
};
use tasklist_cli::clipboard::clipboard_from_env;
use tasklist_cli::render;
use tasklist_cli::session::Session;
use tasklist_core::config::{self, Config, ConfigOverrides, palette_for_theme};
use tasklist_core::error::AppError;
use tasklist_core::filter;
use tasklist_core::share;
use tasklist_core::store::TaskStore;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_ENV_VAR: &str = "TASKLIST_LOG";

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

fn load_config(raw_overrides: &[String]) -> Result<Config, AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        tracing::warn!(code = err.code(), "using default config: {}", err.message());
    }

    let mut overrides = ConfigOverrides::default();
    for raw in raw_overrides {
        let parsed = parse_config_override(raw).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::Origin => overrides.origin = Some(parsed.value),
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
        }
    }

    Ok(config::merge_overrides(&loaded.config, &overrides))
}

fn print_session_help() {
    let mut cmd = SessionLine::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_decode(link: &str, filter_text: Option<&str>, config: &Config, json: bool) -> Result<(), AppError> {
    let tasks = share::parse_share_link(link)?;
    let filter_text = filter_text.unwrap_or("");
    let shown: Vec<_> = filter::filter_tasks(&tasks, filter_text).collect();

    if json {
        println!("{}", render::tasks_json(shown));
        return Ok(());
    }

    let palette = palette_for_theme(config.theme.as_deref());
    println!(
        "{}",
        render::list_heading(shown.len(), tasks.len(), filter_text, &palette)
    );
    if !shown.is_empty() {
        println!("{}", render::task_table(shown, Default::default()));
    }
    Ok(())
}

fn run_interactive(mut session: Session) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();
    let stdout = io::stdout();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        // Trailing spaces are part of free-text values, only the line ending goes.
        let line = input.trim_end_matches(['\n', '\r']);
        let word = line.trim();
        if word.is_empty() {
            continue;
        }

        if word.eq_ignore_ascii_case("exit") || word.eq_ignore_ascii_case("quit") {
            break;
        }

        if word == "help" || word == "?" {
            print_session_help();
            continue;
        }

        let expanded = session.config().expand_alias(line);
        let args = match session_argv(&expanded) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasklist".to_string());
        argv.extend(args);

        let parsed = match SessionLine::try_parse_from(argv) {
            Ok(parsed) => parsed,
            Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                println!("{}", err.render());
                continue;
            }
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        let mut out = stdout.lock();
        if let Err(err) = session.execute(parsed.command, &mut out) {
            eprintln!("ERROR: {}", err);
        }
        out.flush().map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(&cli.config_override)?;

    match cli.command {
        Some(Command::Decode { link, filter }) => {
            run_decode(&link, filter.as_deref(), &config, cli.json)
        }
        Some(Command::Session) | None => {
            let store = match cli.from.as_deref() {
                Some(link) => TaskStore::import_shareable(link)?,
                None => TaskStore::new(),
            };
            tracing::debug!(tasks = store.len(), "session started");
            let session = Session::new(store, config, cli.json, clipboard_from_env());
            run_interactive(session)
        }
    }
}

fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
