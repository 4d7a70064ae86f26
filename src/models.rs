//! Domain models that mirror the persisted catalog records and get passed
//! throughout the terminal front end. These types stay light-weight data
//! holders so the catalog and store layers can focus on invariants and
//! persistence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
/// Circulation state of a single book. Stored as a plain string; literals
/// other than the two known ones are kept verbatim so a rewrite leaves them
/// exactly as they were read.
pub enum BookStatus {
    /// On the shelf. Every new book starts here.
    #[default]
    Available,
    CheckedOut,
    /// Any other literal, e.g. `в наличии` from catalogs written by older tools.
    Other(String),
}

impl BookStatus {
    /// Literal used in the persisted file and in the front end.
    pub fn as_str(&self) -> &str {
        match self {
            BookStatus::Available => "available",
            BookStatus::CheckedOut => "checked_out",
            BookStatus::Other(text) => text,
        }
    }
}

impl From<String> for BookStatus {
    fn from(text: String) -> Self {
        match text.as_str() {
            "available" => BookStatus::Available,
            "checked_out" => BookStatus::CheckedOut,
            _ => BookStatus::Other(text),
        }
    }
}

impl From<BookStatus> for String {
    fn from(status: BookStatus) -> Self {
        match status {
            BookStatus::Other(text) => text,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when free text does not name a recognized status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown status '{0}'. Use 'available' or 'checked_out'.")]
pub struct UnknownStatus(pub String);

impl FromStr for BookStatus {
    type Err = UnknownStatus;

    /// Strict parse for user input: only the two known literals are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "available" => Ok(BookStatus::Available),
            "checked_out" => Ok(BookStatus::CheckedOut),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
/// One catalog record. Field order here is the field order on disk.
pub struct Book {
    /// Assigned by the catalog, never reused within a session.
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: i64,
    /// The only field that changes after creation.
    pub status: BookStatus,
}

impl Book {
    /// Render every field as `key: value` pairs on a single line. The list
    /// and search screens use this so both views print records identically.
    pub fn summary_line(&self) -> String {
        format!(
            "id: {}, title: {}, author: {}, year: {}, status: {}",
            self.id, self.title, self.author, self.year, self.status
        )
    }
}

impl fmt::Display for Book {
    /// Short `Title - Author` label used in status messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.author.trim().is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} - {}", self.title, self.author)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> Book {
        Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            year: 1965,
            status: BookStatus::Available,
        }
    }

    #[test]
    fn status_parses_only_the_known_literals() {
        assert_eq!("available".parse::<BookStatus>(), Ok(BookStatus::Available));
        assert_eq!(" checked_out ".parse::<BookStatus>(), Ok(BookStatus::CheckedOut));
        assert!("в наличии".parse::<BookStatus>().is_err());
    }

    #[test]
    fn status_rejects_unknown_text() {
        let err = "lost".parse::<BookStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("lost".to_string()));
        assert!("Available".parse::<BookStatus>().is_err());
    }

    #[test]
    fn stored_literals_are_kept_verbatim() {
        assert_eq!(BookStatus::from("available".to_string()), BookStatus::Available);
        assert_eq!(
            BookStatus::from("выдана".to_string()),
            BookStatus::Other("выдана".to_string())
        );
        assert_eq!(String::from(BookStatus::Other("lost".to_string())), "lost");
        assert_eq!(String::from(BookStatus::CheckedOut), "checked_out");
    }

    #[test]
    fn default_status_is_available() {
        assert_eq!(BookStatus::default(), BookStatus::Available);
    }

    #[test]
    fn summary_line_lists_every_field() {
        assert_eq!(
            dune().summary_line(),
            "id: 1, title: Dune, author: Herbert, year: 1965, status: available"
        );
    }

    #[test]
    fn display_omits_blank_author() {
        let mut book = dune();
        assert_eq!(book.to_string(), "Dune - Herbert");
        book.author = "  ".to_string();
        assert_eq!(book.to_string(), "Dune");
    }
}
