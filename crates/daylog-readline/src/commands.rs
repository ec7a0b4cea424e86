//! REPL command parsing.

/// Command names with their help text, in the order `/help` lists them.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/signin", "Sign in and load your entries"),
    ("/signout", "Sign out"),
    ("/search", "Filter entries by text (no argument clears)"),
    ("/new", "Open the entry form"),
    ("/toggle", "Floating +/✖ button: open the form, or close and discard it"),
    ("/date", "Set the draft date (YYYY-MM-DD)"),
    ("/text", "Replace the draft text"),
    ("/save", "Save the draft"),
    ("/cancel", "Close the form and discard the draft"),
    ("/dismiss", "Close the form and discard the draft"),
    ("/view", "Show the journal again"),
    ("/help", "Show this help"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SignIn,
    SignOut,
    Search(String),
    New,
    Toggle,
    Date(String),
    Text(String),
    Save,
    Cancel,
    Dismiss,
    View,
    Help,
    Quit,
    /// A line that is not a command; appended to the draft while composing.
    Line(String),
    Unknown(String),
}

impl Command {
    /// Parses one REPL line. Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end();
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed == "quit" || trimmed == "exit" {
            return Some(Self::Quit);
        }

        let Some(command) = trimmed.strip_prefix('/') else {
            return Some(Self::Line(line.to_string()));
        };

        let (name, argument) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };

        let parsed = match name {
            "signin" => Self::SignIn,
            "signout" => Self::SignOut,
            "search" => Self::Search(argument.to_string()),
            "new" => Self::New,
            "toggle" | "+" => Self::Toggle,
            "date" => Self::Date(argument.to_string()),
            "text" => Self::Text(argument.to_string()),
            "save" => Self::Save,
            "cancel" => Self::Cancel,
            "dismiss" => Self::Dismiss,
            "view" => Self::View,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(trimmed.to_string()),
        };
        Some(parsed)
    }
}
