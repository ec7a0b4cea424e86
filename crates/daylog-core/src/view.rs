//! View renderer.
//!
//! Derives what the user sees from the journal state. [`render`] is pure:
//! the same inputs always produce the same [`View`], and nothing is mutated.
//! Front ends turn the `View` into terminal output, markup or JSON.

use crate::composer::Composer;
use crate::entry::Entry;
use crate::filter::visible_entries;
use crate::session::Session;
use serde::Serialize;

pub const BRAND: &str = "dayLog";
pub const TAGLINE: &str = "Capture your thoughts, one day at a time";
pub const LANDING_NOTE: &str = "Build your habit, one entry a day.";
pub const SIGN_IN_LABEL: &str = "Sign in";
pub const SIGN_OUT_LABEL: &str = "Sign out";
pub const NEW_ENTRY_LABEL: &str = "+ New Entry";
pub const SEARCH_PLACEHOLDER: &str = "Search entries...";
pub const SECTION_TITLE: &str = "My Entries";
pub const LOADING_LABEL: &str = "Loading…";
pub const EMPTY_NOTE: &str = "No entries yet. Click + to add one.";
pub const COMPOSER_TITLE: &str = "New Entry";
pub const COMPOSER_PLACEHOLDER: &str = "Write your thoughts...";

/// Everything the renderer reads.
#[derive(Debug, Clone, Copy)]
pub struct ViewInput<'a> {
    pub session: &'a Session,
    pub cache: &'a [Entry],
    pub search_term: &'a str,
    pub composer: &'a Composer,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    SignedOut(Landing),
    SignedIn(Dashboard),
}

/// Landing page with a single sign-in action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Landing {
    pub brand: &'static str,
    pub tagline: &'static str,
    pub sign_in_label: &'static str,
    pub note: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub header: Header,
    pub toolbar: Toolbar,
    pub list: EntryList,
    pub floating_action: FloatingAction,
    /// Entry form overlay, present only while the composer is open.
    pub composer: Option<ComposerForm>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub brand: &'static str,
    pub welcome: String,
    pub avatar_url: Option<String>,
    pub sign_out_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toolbar {
    pub search_term: String,
    pub search_placeholder: &'static str,
    pub new_entry_label: &'static str,
}

/// The list region.
///
/// `loading` and `empty_note` are mutually exclusive; entries are listed
/// whenever any match the search term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryList {
    pub title: &'static str,
    pub loading: Option<&'static str>,
    pub empty_note: Option<&'static str>,
    pub entries: Vec<EntryCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryCard {
    pub id: String,
    pub date: String,
    pub text: String,
}

/// Floating add/close button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatingAction {
    Add,
    Close,
}

impl FloatingAction {
    pub fn title(self) -> &'static str {
        match self {
            Self::Add => "Add entry",
            Self::Close => "Close",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Close => "✖",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposerForm {
    pub title: &'static str,
    pub date: String,
    pub text: String,
    pub placeholder: &'static str,
}

/// Renders the journal state.
pub fn render(input: &ViewInput<'_>) -> View {
    let Some(identity) = input.session.identity() else {
        return View::SignedOut(Landing {
            brand: BRAND,
            tagline: TAGLINE,
            sign_in_label: SIGN_IN_LABEL,
            note: LANDING_NOTE,
        });
    };

    let entries: Vec<EntryCard> = visible_entries(input.cache, input.search_term)
        .into_iter()
        .map(|entry| EntryCard {
            id: entry.id.clone(),
            date: entry.date.clone(),
            text: entry.text.clone(),
        })
        .collect();

    let list = EntryList {
        title: SECTION_TITLE,
        loading: input.loading.then_some(LOADING_LABEL),
        empty_note: (!input.loading && entries.is_empty()).then_some(EMPTY_NOTE),
        entries,
    };

    let composer = input.composer.is_visible().then(|| ComposerForm {
        title: COMPOSER_TITLE,
        date: input.composer.date().to_string(),
        text: input.composer.text().to_string(),
        placeholder: COMPOSER_PLACEHOLDER,
    });

    View::SignedIn(Dashboard {
        header: Header {
            brand: BRAND,
            welcome: format!("Welcome, {}", identity.display_name),
            avatar_url: identity.avatar_url.clone(),
            sign_out_label: SIGN_OUT_LABEL,
        },
        toolbar: Toolbar {
            search_term: input.search_term.to_string(),
            search_placeholder: SEARCH_PLACEHOLDER,
            new_entry_label: NEW_ENTRY_LABEL,
        },
        list,
        floating_action: if composer.is_some() {
            FloatingAction::Close
        } else {
            FloatingAction::Add
        },
        composer,
    })
}
