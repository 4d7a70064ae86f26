//! Form state for the menu actions plus the parsing that turns raw text into
//! typed values before anything reaches the catalog.

use ratatui::text::Line;
use thiserror::Error;

use crate::catalog::SearchQuery;
use crate::models::{BookStatus, UnknownStatus};

use super::helpers::field_line;

/// Why raw form text could not be turned into a typed value. The action that
/// needed the value is abandoned; the user starts it again from the menu.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum InputError {
    #[error("{field} is not a valid number: '{raw}'.")]
    NotANumber { field: &'static str, raw: String },

    #[error(transparent)]
    Status(#[from] UnknownStatus),
}

/// Parse a required integer field. Surrounding whitespace is ignored.
pub(crate) fn parse_number(field: &'static str, raw: &str) -> Result<i64, InputError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| InputError::NotANumber {
            field,
            raw: raw.to_string(),
        })
}

/// Like [`parse_number`], but a blank field means "not supplied".
pub(crate) fn parse_optional_number(
    field: &'static str,
    raw: &str,
) -> Result<Option<i64>, InputError> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_number(field, raw).map(Some)
    }
}

fn non_blank(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Character-level editing shared by every dialog.
pub(crate) trait TextInput {
    /// Append a printable character to the focused field. Control characters
    /// are ignored.
    fn push_char(&mut self, ch: char);

    fn backspace(&mut self);
}

/// Fields of the add and search forms.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
}

impl BookField {
    pub(crate) const ALL: [BookField; 3] = [BookField::Title, BookField::Author, BookField::Year];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Year => "Year",
        }
    }

    fn row(self) -> u16 {
        match self {
            BookField::Title => 0,
            BookField::Author => 1,
            BookField::Year => 2,
        }
    }
}

/// Title, author, and year as typed. Shared by the add and search dialogs;
/// only the way the text is interpreted differs.
#[derive(Debug, Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) active: BookField,
}

impl BookForm {
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Author,
            BookField::Author => BookField::Year,
            BookField::Year => BookField::Title,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Year,
            BookField::Author => BookField::Title,
            BookField::Year => BookField::Author,
        };
    }

    fn value_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
            BookField::Year => &mut self.year,
        }
    }

    pub(crate) fn value(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Year => &self.year,
        }
    }

    /// Typed values for a new book. Title and author are passed through
    /// untouched; the year must be an integer.
    pub(crate) fn parse_new_book(&self) -> Result<(String, String, i64), InputError> {
        let year = parse_number("Year", &self.year)?;
        Ok((self.title.clone(), self.author.clone(), year))
    }

    /// Blank fields become absent filters.
    pub(crate) fn parse_query(&self) -> Result<SearchQuery, InputError> {
        Ok(SearchQuery {
            title: non_blank(&self.title),
            author: non_blank(&self.author),
            year: parse_optional_number("Year", &self.year)?,
        })
    }

    pub(crate) fn build_line(&self, field: BookField, placeholder: &str) -> Line<'static> {
        field_line(
            field.label(),
            self.value(field),
            placeholder,
            self.active == field,
        )
    }

    /// Row offset of the active field inside the dialog.
    pub(crate) fn active_row(&self) -> u16 {
        self.active.row()
    }
}

impl TextInput for BookForm {
    fn push_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.value_mut(self.active).push(ch);
        }
    }

    fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }
}

/// Single id prompt used by the remove dialog.
#[derive(Debug, Default, Clone)]
pub(crate) struct LookupForm {
    pub(crate) id: String,
}

impl TextInput for LookupForm {
    fn push_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.id.push(ch);
        }
    }

    fn backspace(&mut self) {
        self.id.pop();
    }
}

impl LookupForm {
    pub(crate) fn parse_id(&self) -> Result<i64, InputError> {
        parse_number("Id", &self.id)
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        field_line("Id", &self.id, "<required>", true)
    }
}

/// Fields of the status dialog.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum StatusField {
    #[default]
    Id,
    Status,
}

/// Id plus the new status text for the edit-status dialog.
#[derive(Debug, Default, Clone)]
pub(crate) struct StatusForm {
    pub(crate) id: String,
    pub(crate) status: String,
    pub(crate) active: StatusField,
}

impl StatusForm {
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            StatusField::Id => StatusField::Status,
            StatusField::Status => StatusField::Id,
        };
    }

    /// The id is checked first, then the status text must name a known status.
    pub(crate) fn parse_inputs(&self) -> Result<(i64, BookStatus), InputError> {
        let id = parse_number("Id", &self.id)?;
        let status = self.status.parse::<BookStatus>()?;
        Ok((id, status))
    }

    pub(crate) fn build_line(&self, field: StatusField) -> Line<'static> {
        match field {
            StatusField::Id => field_line("Id", &self.id, "<required>", self.active == field),
            StatusField::Status => field_line(
                "Status",
                &self.status,
                "available | checked_out",
                self.active == field,
            ),
        }
    }
}

impl TextInput for StatusForm {
    fn push_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        match self.active {
            StatusField::Id => self.id.push(ch),
            StatusField::Status => self.status.push(ch),
        }
    }

    fn backspace(&mut self) {
        match self.active {
            StatusField::Id => {
                self.id.pop();
            }
            StatusField::Status => {
                self.status.pop();
            }
        }
    }
}
