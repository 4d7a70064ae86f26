use std::cmp::min;

use crate::models::Book;

/// Entries of the main menu, selected by a single digit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum MenuChoice {
    AddBook,
    RemoveBook,
    SearchBooks,
    ListBooks,
    EditStatus,
    Exit,
}

impl MenuChoice {
    /// Display order on the menu screen.
    pub(crate) const ALL: [MenuChoice; 6] = [
        MenuChoice::AddBook,
        MenuChoice::RemoveBook,
        MenuChoice::SearchBooks,
        MenuChoice::ListBooks,
        MenuChoice::EditStatus,
        MenuChoice::Exit,
    ];

    /// Map a key press to a menu entry. Anything but `0`-`5` is rejected.
    pub(crate) fn from_key(ch: char) -> Option<Self> {
        match ch {
            '1' => Some(MenuChoice::AddBook),
            '2' => Some(MenuChoice::RemoveBook),
            '3' => Some(MenuChoice::SearchBooks),
            '4' => Some(MenuChoice::ListBooks),
            '5' => Some(MenuChoice::EditStatus),
            '0' => Some(MenuChoice::Exit),
            _ => None,
        }
    }

    pub(crate) fn key(self) -> char {
        match self {
            MenuChoice::AddBook => '1',
            MenuChoice::RemoveBook => '2',
            MenuChoice::SearchBooks => '3',
            MenuChoice::ListBooks => '4',
            MenuChoice::EditStatus => '5',
            MenuChoice::Exit => '0',
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            MenuChoice::AddBook => "Add book",
            MenuChoice::RemoveBook => "Remove book",
            MenuChoice::SearchBooks => "Search books",
            MenuChoice::ListBooks => "List all books",
            MenuChoice::EditStatus => "Edit book status",
            MenuChoice::Exit => "Exit",
        }
    }
}

/// Scrollable snapshot of books, used for both the full listing and search
/// results. The snapshot is taken when the screen opens.
pub(crate) struct BookListScreen {
    pub(crate) heading: String,
    pub(crate) books: Vec<Book>,
    pub(crate) empty_message: &'static str,
    pub(crate) selected: usize,
}

impl BookListScreen {
    pub(crate) fn all_books(books: Vec<Book>) -> Self {
        Self {
            heading: "All books".to_string(),
            books,
            empty_message: "The library is empty.",
            selected: 0,
        }
    }

    pub(crate) fn search_results(books: Vec<Book>) -> Self {
        Self {
            heading: format!("Search results ({})", books.len()),
            books,
            empty_message: "No books match these criteria.",
            selected: 0,
        }
    }

    pub(crate) fn current_book(&self) -> Option<&Book> {
        self.books.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.books.is_empty() {
            self.selected = 0;
            return;
        }
        let last = self.books.len() - 1;
        let target = self.selected as isize + offset;
        self.selected = if target < 0 {
            0
        } else {
            min(target as usize, last)
        };
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.books.len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookStatus;

    fn books(count: i64) -> Vec<Book> {
        (1..=count)
            .map(|id| Book {
                id,
                title: format!("Book {id}"),
                author: "Anon".to_string(),
                year: 2000,
                status: BookStatus::Available,
            })
            .collect()
    }

    #[test]
    fn menu_accepts_only_known_digits() {
        for choice in MenuChoice::ALL {
            assert_eq!(MenuChoice::from_key(choice.key()), Some(choice));
        }
        for ch in ['6', '9', 'a', ' ', '-'] {
            assert_eq!(MenuChoice::from_key(ch), None);
        }
    }

    #[test]
    fn selection_is_clamped_to_the_list() {
        let mut screen = BookListScreen::all_books(books(3));
        screen.move_selection(-1);
        assert_eq!(screen.selected, 0);
        screen.move_selection(10);
        assert_eq!(screen.current_book().map(|b| b.id), Some(3));
        screen.select_first();
        screen.move_selection(1);
        assert_eq!(screen.selected, 1);
    }

    #[test]
    fn empty_list_has_no_current_book() {
        let mut screen = BookListScreen::search_results(Vec::new());
        screen.move_selection(1);
        screen.select_last();
        assert!(screen.current_book().is_none());
        assert_eq!(screen.heading, "Search results (0)");
    }
}
