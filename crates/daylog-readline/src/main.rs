use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::history::DefaultHistory;
use rustyline::{Context, Editor, Helper};

use daylog_application::{EntryStoreAdapter, JournalController};
use daylog_core::error::DaylogError;
use daylog_infrastructure::{
    AccountPicker, ConfigService, DaylogPaths, LocalIdentityProvider, TomlEntryStore, UidPicker,
};

mod commands;
mod logging;
mod picker;
mod render;

use commands::{COMMANDS, Command};
use picker::StdinAccountPicker;

#[derive(Parser)]
#[command(name = "daylog")]
#[command(about = "dayLog - a personal daily journal", long_about = None)]
struct Args {
    /// Config file (default: ~/.config/daylog/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding entry collections (overrides [store].data_dir)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log filter for the log file, e.g. "debug" (RUST_LOG takes precedence)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Print the view as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Sign in as this account uid without prompting
    #[arg(long, value_name = "UID")]
    account: Option<String>,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
struct CliHelper {
    commands: Vec<&'static str>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|(name, _)| *name).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

enum Flow {
    Continue,
    Quit,
}

struct Repl {
    journal: Arc<JournalController>,
    json: bool,
}

impl Repl {
    async fn execute(&self, command: Command) -> Flow {
        let journal = &self.journal;
        let result = match command {
            Command::Quit => return Flow::Quit,
            Command::Help => {
                print_help();
                return Flow::Continue;
            }
            Command::Unknown(input) => {
                println!("{}", format!("Unknown command: {input} (try /help)").bright_black());
                return Flow::Continue;
            }
            Command::Line(line) => {
                if !journal.push_draft_line(&line) {
                    println!(
                        "{}",
                        "Unknown command (try /help). Use /new to write an entry.".bright_black()
                    );
                    return Flow::Continue;
                }
                Ok(())
            }
            Command::SignIn => journal.begin_sign_in().await,
            Command::SignOut => journal.sign_out_current().await,
            Command::Search(term) => {
                journal.set_search_term(term);
                Ok(())
            }
            Command::New => journal.open_composer(),
            Command::Toggle => journal.toggle_composer(),
            Command::Date(date) => {
                if !journal.set_draft_date(date) {
                    print_form_closed();
                    return Flow::Continue;
                }
                Ok(())
            }
            Command::Text(text) => {
                if !journal.set_draft_text(text) {
                    print_form_closed();
                    return Flow::Continue;
                }
                Ok(())
            }
            Command::Save => journal.save_entry().await,
            Command::Cancel => {
                journal.cancel_composer();
                Ok(())
            }
            Command::Dismiss => {
                journal.dismiss_composer();
                Ok(())
            }
            Command::View => Ok(()),
        };

        if let Err(e) = result {
            report(&e);
        }
        self.show().await;
        Flow::Continue
    }

    async fn show(&self) {
        if self.journal.is_loading() && !self.json {
            println!("{}", daylog_core::view::LOADING_LABEL.yellow());
        }
        self.journal.wait_until_idle().await;

        let view = self.journal.view();
        if self.json {
            match render::render_json(&view) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("{}", format!("Error: {e}").red()),
            }
        } else {
            println!();
            print!("{}", render::render_text(&view));
            println!();
        }
    }
}

fn print_form_closed() {
    println!("{}", "The entry form is closed; use /new first.".yellow());
}

fn report(error: &DaylogError) {
    match error {
        DaylogError::NotSignedIn => println!("{}", "Sign in first (/signin).".yellow()),
        e if e.is_user_facing() => println!("{}", format!("⚠ {e}").yellow()),
        other => eprintln!("{}", format!("Error: {other}").red()),
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    for (name, help) in COMMANDS {
        println!("  {:<10} {}", name.bright_cyan(), help.bright_black());
    }
    println!(
        "  {:<10} {}",
        "quit".bright_cyan(),
        "Leave dayLog".bright_black()
    );
    println!(
        "{}",
        "While the entry form is open, plain lines are added to the text.".bright_black()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ===== Configuration =====
    let paths = DaylogPaths::new(None);
    // An explicit config file keeps the session and logs beside it.
    let (config_file, session_file, logs_dir) = match args.config {
        Some(file) => {
            let dir = file
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            (file, dir.join("session.toml"), dir.join("logs"))
        }
        None => (paths.config_file()?, paths.session_file()?, paths.logs_dir()?),
    };
    let config_service = ConfigService::at(&config_file);
    let config = config_service
        .get_config()
        .with_context(|| format!("failed to load {}", config_file.display()))?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let _log_guard = logging::init(&logs_dir, &level)?;

    let data_dir = match args.data_dir.or_else(|| config.store.data_dir.clone()) {
        Some(dir) => dir,
        None => paths.data_dir()?,
    };
    tracing::info!(
        config = %config_service.path().display(),
        data_dir = %data_dir.display(),
        collection = %config.store.collection,
        "starting daylog"
    );

    // ===== Backend Initialization =====
    let picker: Arc<dyn AccountPicker> = match args.account {
        Some(uid) => Arc::new(UidPicker(uid)),
        None => Arc::new(StdinAccountPicker),
    };
    let identity_provider = LocalIdentityProvider::new(
        config.identities(),
        picker,
        session_file,
    )?;
    let store = TomlEntryStore::new(data_dir);
    let journal = Arc::new(JournalController::new(
        Arc::new(identity_provider),
        EntryStoreAdapter::with_collection(Arc::new(store), config.store.collection.clone()),
    ));
    journal.mount();

    let repl = Repl {
        journal: Arc::clone(&journal),
        json: args.json,
    };

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== dayLog ===".bright_magenta().bold());
    println!(
        "{}",
        "Type '/help' for commands, or 'quit' to exit.".bright_black()
    );
    repl.show().await;

    // ===== Main REPL Loop =====
    loop {
        let prompt = if journal.composer().is_visible() {
            "entry> "
        } else {
            ">> "
        };

        match rl.readline(prompt) {
            Ok(line) => {
                let Some(command) = Command::parse(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(line.as_str());

                if let Flow::Quit = repl.execute(command).await {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    journal.unmount();
    Ok(())
}
