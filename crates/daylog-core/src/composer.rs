//! Composer: transient draft state for a single new entry.

use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::Serialize;

/// Expected format of an entry date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComposerState {
    Hidden,
    Editing,
}

/// The in-progress new entry and whether its form is shown.
///
/// Nothing here is persisted; the draft is discarded whenever the form closes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    visible: bool,
    date: String,
    text: String,
}

/// A draft that passed validation.
///
/// Only [`Composer::validate`] constructs one, so holding an `EntryDraft`
/// means the date is a calendar date and the text is non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    date: String,
    text: String,
}

impl EntryDraft {
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ComposerState {
        if self.visible {
            ComposerState::Editing
        } else {
            ComposerState::Hidden
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shows the form ("new entry"). Opening an open form keeps its draft.
    pub fn open(&mut self) {
        self.visible = true;
    }

    /// Floating action: opens a hidden form, closes (and clears) a visible one.
    pub fn toggle(&mut self) {
        if self.visible {
            self.reset();
        } else {
            self.open();
        }
    }

    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Click outside the form overlay.
    pub fn dismiss(&mut self) {
        self.reset();
    }

    /// Closes the form after its entry was written.
    pub fn finish(&mut self) {
        self.reset();
    }

    /// Replaces the draft date. Ignored while the form is hidden.
    pub fn set_date(&mut self, date: impl Into<String>) -> bool {
        if !self.visible {
            return false;
        }
        self.date = date.into();
        true
    }

    /// Replaces the draft text. Ignored while the form is hidden.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        if !self.visible {
            return false;
        }
        self.text = text.into();
        true
    }

    /// Appends a line to the draft text. Ignored while the form is hidden.
    pub fn push_line(&mut self, line: &str) -> bool {
        if !self.visible {
            return false;
        }
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line);
        true
    }

    /// Checks the draft without changing it.
    pub fn validate(&self) -> Result<EntryDraft, ValidationError> {
        let date = self.date.trim();
        if date.is_empty() {
            return Err(ValidationError::MissingDate);
        }
        if NaiveDate::parse_from_str(date, DATE_FORMAT).is_err() {
            return Err(ValidationError::InvalidDate(date.to_string()));
        }

        let text = self.text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }

        Ok(EntryDraft {
            date: date.to_string(),
            text: text.to_string(),
        })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(date: &str, text: &str) -> Composer {
        let mut composer = Composer::new();
        composer.open();
        composer.set_date(date);
        composer.set_text(text);
        composer
    }

    #[test]
    fn test_starts_hidden_and_empty() {
        let composer = Composer::new();
        assert_eq!(composer.state(), ComposerState::Hidden);
        assert!(composer.date().is_empty());
        assert!(composer.text().is_empty());
    }

    #[test]
    fn test_edits_ignored_while_hidden() {
        let mut composer = Composer::new();
        assert!(!composer.set_text("lost"));
        assert!(!composer.set_date("2024-01-01"));
        assert!(composer.text().is_empty());
    }

    #[test]
    fn test_cancel_dismiss_and_finish_reset_draft() {
        let closers: [fn(&mut Composer); 3] = [Composer::cancel, Composer::dismiss, Composer::finish];
        for close in closers {
            let mut composer = editing("2024-03-01", "draft");
            close(&mut composer);
            assert_eq!(composer, Composer::default());
        }
    }

    #[test]
    fn test_toggle_opens_then_clears() {
        let mut composer = Composer::new();
        composer.toggle();
        assert_eq!(composer.state(), ComposerState::Editing);

        composer.set_text("half a thought");
        composer.toggle();
        assert_eq!(composer.state(), ComposerState::Hidden);
        assert!(composer.text().is_empty());
    }

    #[test]
    fn test_open_keeps_existing_draft() {
        let mut composer = editing("2024-03-01", "draft");
        composer.open();
        assert_eq!(composer.text(), "draft");
    }

    #[test]
    fn test_validate_trims_text() {
        let composer = editing("2024-03-01", "  morning pages \n");
        let draft = composer.validate().unwrap();
        assert_eq!(draft.date(), "2024-03-01");
        assert_eq!(draft.text(), "morning pages");
    }

    #[test]
    fn test_validate_rejects_missing_date() {
        let composer = editing("", "text");
        assert_eq!(composer.validate(), Err(ValidationError::MissingDate));
    }

    #[test]
    fn test_validate_rejects_non_calendar_date() {
        let composer = editing("03/01/2024", "text");
        assert_eq!(
            composer.validate(),
            Err(ValidationError::InvalidDate("03/01/2024".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_blank_text_and_keeps_draft() {
        let composer = editing("2024-03-01", "   \n\t");
        let before = composer.clone();

        assert_eq!(composer.validate(), Err(ValidationError::EmptyText));
        assert_eq!(composer, before);
        assert_eq!(composer.state(), ComposerState::Editing);
    }

    #[test]
    fn test_push_line_builds_multiline_text() {
        let mut composer = editing("2024-03-01", "");
        composer.push_line("first");
        composer.push_line("second");
        assert_eq!(composer.text(), "first\nsecond");
    }
}
