//! Terminal rendering of the journal view.

use colored::Colorize;
use daylog_core::view::{ComposerForm, Dashboard, Landing, View};
use std::fmt::Write;

/// Renders the view as colored text.
pub fn render_text(view: &View) -> String {
    let mut out = String::new();
    match view {
        View::SignedOut(landing) => render_landing(&mut out, landing),
        View::SignedIn(dashboard) => render_dashboard(&mut out, dashboard),
    }
    out
}

/// Renders the view model as pretty JSON.
pub fn render_json(view: &View) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view)
}

fn render_landing(out: &mut String, landing: &Landing) {
    let _ = writeln!(out, "{}", landing.brand.bright_magenta().bold());
    let _ = writeln!(out, "{}", landing.tagline);
    let _ = writeln!(
        out,
        "  {}  {}",
        format!("[ {} ]", landing.sign_in_label).bright_cyan(),
        "/signin".bright_black()
    );
    let _ = writeln!(out, "{}", landing.note.bright_black());
}

fn render_dashboard(out: &mut String, dashboard: &Dashboard) {
    let header = &dashboard.header;
    let _ = write!(
        out,
        "{}  {}",
        header.brand.bright_magenta().bold(),
        header.welcome
    );
    if let Some(avatar) = &header.avatar_url {
        let _ = write!(out, " {}", format!("<{avatar}>").bright_black());
    }
    let _ = writeln!(
        out,
        "  {}",
        format!("[ {} ]", header.sign_out_label).bright_black()
    );

    let toolbar = &dashboard.toolbar;
    let search = if toolbar.search_term.is_empty() {
        toolbar.search_placeholder.bright_black().to_string()
    } else {
        toolbar.search_term.bright_white().to_string()
    };
    let _ = writeln!(
        out,
        "🔍 {}  {}",
        search,
        format!("[ {} ]", toolbar.new_entry_label).bright_cyan()
    );
    let _ = writeln!(out);

    let list = &dashboard.list;
    let _ = writeln!(out, "{}", list.title.bold().underline());
    if let Some(loading) = list.loading {
        let _ = writeln!(out, "  {}", loading.yellow());
    }
    if let Some(note) = list.empty_note {
        let _ = writeln!(out, "  {}", note.bright_black());
    }
    for card in &list.entries {
        let mut lines = card.text.lines();
        let first = lines.next().unwrap_or_default();
        let _ = writeln!(out, "  {}  {}", card.date.cyan(), first);
        for line in lines {
            let _ = writeln!(out, "  {}  {}", " ".repeat(card.date.len()), line);
        }
    }

    let action = dashboard.floating_action;
    let _ = writeln!(
        out,
        "{}",
        format!("({}) {}", action.glyph(), action.title()).bright_green()
    );

    if let Some(form) = &dashboard.composer {
        render_composer(out, form);
    }
}

fn render_composer(out: &mut String, form: &ComposerForm) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", format!("── {} ──", form.title).bright_yellow());

    let date = if form.date.is_empty() {
        "YYYY-MM-DD".bright_black().to_string()
    } else {
        form.date.clone()
    };
    let _ = writeln!(out, "  Date: {date}");

    if form.text.is_empty() {
        let _ = writeln!(out, "  {}", form.placeholder.bright_black());
    } else {
        for line in form.text.lines() {
            let _ = writeln!(out, "  │ {line}");
        }
    }
    let _ = writeln!(
        out,
        "  {}",
        "type lines to add text · /date · /save · /cancel · /dismiss".bright_black()
    );
}
