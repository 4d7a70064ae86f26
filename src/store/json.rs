use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{PersistenceError, Result};
use crate::models::Book;

use super::Serializer;

/// Four spaces per level, matching catalog files written by hand or by the
/// earlier tool.
const INDENT: &[u8] = b"    ";

/// Pretty-printed JSON array of book objects. serde_json leaves non-ASCII text
/// unescaped, so titles and authors round-trip byte for byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn encode(&self, books: &[Book]) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let formatter = PrettyFormatter::with_indent(INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
        books
            .serialize(&mut serializer)
            .map_err(|err| PersistenceError::Encode(Box::new(err)))?;
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<Book>> {
        let books: Vec<Book> = serde_json::from_slice(bytes)
            .map_err(|err| PersistenceError::Decode(Box::new(err)))?;
        Ok(books)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::models::BookStatus;

    fn book(id: i64, title: &str, author: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            year: 1967,
            status: BookStatus::CheckedOut,
        }
    }

    #[test]
    fn encodes_fields_in_declared_order() {
        let bytes = JsonSerializer.encode(&[book(1, "Solaris", "Lem")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let positions: Vec<usize> = ["\"id\"", "\"title\"", "\"author\"", "\"year\"", "\"status\""]
            .iter()
            .map(|key| text.find(key).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert!(text.contains("\"status\": \"checked_out\""));
        assert!(text.contains("\n    {"));
    }

    #[test]
    fn keeps_non_ascii_text_unescaped() {
        let books = vec![book(7, "Мастер и Маргарита", "Булгаков")];
        let bytes = JsonSerializer.encode(&books).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("Мастер и Маргарита"));
        assert!(!text.contains("\\u"));
        assert_eq!(JsonSerializer.decode(&bytes).unwrap(), books);
    }

    #[test]
    fn empty_set_encodes_as_empty_array() {
        assert_eq!(JsonSerializer.encode(&[]).unwrap(), b"[]");
    }

    #[test]
    fn unrecognized_status_literals_survive_decode_and_encode() {
        let raw = r#"[{"id": 3, "title": "T", "author": "A", "year": 2001, "status": "выдана"}]"#;
        let books = JsonSerializer.decode(raw.as_bytes()).unwrap();
        assert_eq!(books[0].status, BookStatus::Other("выдана".to_string()));

        let text = String::from_utf8(JsonSerializer.encode(&books).unwrap()).unwrap();
        assert!(text.contains("\"status\": \"выдана\""));
    }

    #[test]
    fn rejects_records_with_missing_or_extra_fields() {
        let missing = br#"[{"id": 1, "title": "T", "author": "A", "year": 2001}]"#;
        let extra = br#"[{"id": 1, "title": "T", "author": "A", "year": 2001, "status": "available", "isbn": "x"}]"#;
        for raw in [&missing[..], &extra[..]] {
            let err = JsonSerializer.decode(raw).unwrap_err();
            assert!(matches!(
                err,
                CatalogError::Persistence(PersistenceError::Decode(_))
            ));
        }
    }

    #[test]
    fn rejects_non_array_content() {
        assert!(JsonSerializer.decode(b"{\"id\": 1}").is_err());
        assert!(JsonSerializer.decode(b"not json").is_err());
    }
}
