use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::error;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::store::Store;

use super::forms::{BookField, BookForm, LookupForm, StatusField, StatusForm, TextInput};
use super::helpers::{centered_rect, cursor_column, surface_error};
use super::screens::{BookListScreen, MenuChoice};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown on the book list.
const PAGE_STEP: isize = 10;

/// High-level navigation states.
enum Screen {
    Menu,
    Books(BookListScreen),
}

/// Dialog currently open on top of the screen, if any.
enum Mode {
    Normal,
    AddingBook(BookForm),
    RemovingBook(LookupForm),
    Searching(BookForm),
    EditingStatus(StatusForm),
}

/// What a dialog wants after a key press.
enum FormOutcome {
    Editing,
    Submit,
    Cancel,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state for the terminal front end. Owns the catalog;
/// there is no other handle to it while the UI runs.
pub struct App<S: Store> {
    catalog: Catalog<S>,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl<S: Store> App<S> {
    pub fn new(catalog: Catalog<S>) -> Self {
        Self {
            catalog,
            screen: Screen::Menu,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn catalog(&self) -> &Catalog<S> {
        &self.catalog
    }

    /// Feed one key press through the current dialog or screen. Returns `true`
    /// once the user asked to exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingBook(form) => self.handle_add_book(code, form),
            Mode::RemovingBook(form) => self.handle_remove_book(code, form),
            Mode::Searching(form) => self.handle_search(code, form),
            Mode::EditingStatus(form) => self.handle_edit_status(code, form),
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match self.screen {
            Screen::Menu => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    *exit = true;
                    Mode::Normal
                }
                KeyCode::Char(ch) => match MenuChoice::from_key(ch) {
                    Some(choice) => self.open_menu_choice(choice, exit),
                    None => {
                        self.set_status("Choose a number from 0 to 5.", StatusKind::Error);
                        Mode::Normal
                    }
                },
                _ => Mode::Normal,
            },
            Screen::Books(ref mut list) => {
                match code {
                    KeyCode::Char('q') => *exit = true,
                    KeyCode::Esc | KeyCode::Backspace => {
                        self.screen = Screen::Menu;
                        self.status = None;
                    }
                    KeyCode::Up => list.move_selection(-1),
                    KeyCode::Down => list.move_selection(1),
                    KeyCode::PageUp => list.move_selection(-PAGE_STEP),
                    KeyCode::PageDown => list.move_selection(PAGE_STEP),
                    KeyCode::Home => list.select_first(),
                    KeyCode::End => list.select_last(),
                    KeyCode::Enter => {
                        if let Some(book) = list.current_book() {
                            let text = book.summary_line();
                            self.set_status(text, StatusKind::Info);
                        }
                    }
                    _ => {}
                }
                Mode::Normal
            }
        }
    }

    fn open_menu_choice(&mut self, choice: MenuChoice, exit: &mut bool) -> Mode {
        self.clear_status();
        match choice {
            MenuChoice::AddBook => Mode::AddingBook(BookForm::default()),
            MenuChoice::RemoveBook => Mode::RemovingBook(LookupForm::default()),
            MenuChoice::SearchBooks => Mode::Searching(BookForm::default()),
            MenuChoice::EditStatus => Mode::EditingStatus(StatusForm::default()),
            MenuChoice::ListBooks => {
                let books = self.catalog.list_all().to_vec();
                self.screen = Screen::Books(BookListScreen::all_books(books));
                Mode::Normal
            }
            MenuChoice::Exit => {
                *exit = true;
                Mode::Normal
            }
        }
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Mode {
        let outcome = match code {
            KeyCode::Tab | KeyCode::Down => {
                form.next_field();
                FormOutcome::Editing
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.previous_field();
                FormOutcome::Editing
            }
            other => edit_text(other, &mut form),
        };

        match outcome {
            FormOutcome::Editing => Mode::AddingBook(form),
            FormOutcome::Cancel => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                Mode::Normal
            }
            FormOutcome::Submit => {
                self.save_new_book(&form);
                Mode::Normal
            }
        }
    }

    fn handle_remove_book(&mut self, code: KeyCode, mut form: LookupForm) -> Mode {
        match edit_text(code, &mut form) {
            FormOutcome::Editing => Mode::RemovingBook(form),
            FormOutcome::Cancel => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Mode::Normal
            }
            FormOutcome::Submit => {
                self.remove_book(&form);
                Mode::Normal
            }
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut form: BookForm) -> Mode {
        let outcome = match code {
            KeyCode::Tab | KeyCode::Down => {
                form.next_field();
                FormOutcome::Editing
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.previous_field();
                FormOutcome::Editing
            }
            other => edit_text(other, &mut form),
        };

        match outcome {
            FormOutcome::Editing => Mode::Searching(form),
            FormOutcome::Cancel => {
                self.set_status("Search cancelled.", StatusKind::Info);
                Mode::Normal
            }
            FormOutcome::Submit => {
                self.run_search(&form);
                Mode::Normal
            }
        }
    }

    fn handle_edit_status(&mut self, code: KeyCode, mut form: StatusForm) -> Mode {
        let outcome = match code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                form.toggle_field();
                FormOutcome::Editing
            }
            other => edit_text(other, &mut form),
        };

        match outcome {
            FormOutcome::Editing => Mode::EditingStatus(form),
            FormOutcome::Cancel => {
                self.set_status("Status edit cancelled.", StatusKind::Info);
                Mode::Normal
            }
            FormOutcome::Submit => {
                self.change_status(&form);
                Mode::Normal
            }
        }
    }

    fn save_new_book(&mut self, form: &BookForm) {
        let (title, author, year) = match form.parse_new_book() {
            Ok(values) => values,
            Err(err) => return self.set_status(err.to_string(), StatusKind::Error),
        };

        match self.catalog.add_book(title, author, year) {
            Ok(book) => {
                let text = format!("Added '{}' with id {}.", book.title, book.id);
                self.set_status(text, StatusKind::Info);
            }
            Err(err) => self.report_catalog_error(err),
        }
    }

    fn remove_book(&mut self, form: &LookupForm) {
        let id = match form.parse_id() {
            Ok(id) => id,
            Err(err) => return self.set_status(err.to_string(), StatusKind::Error),
        };

        match self.catalog.remove_book(id) {
            Ok(book) => self.set_status(format!("Removed '{book}'."), StatusKind::Info),
            Err(err) => self.report_catalog_error(err),
        }
    }

    fn run_search(&mut self, form: &BookForm) {
        let query = match form.parse_query() {
            Ok(query) => query,
            Err(err) => return self.set_status(err.to_string(), StatusKind::Error),
        };

        if query.is_empty() {
            self.set_status(
                "Enter a title, an author, or a year to search.",
                StatusKind::Error,
            );
            return;
        }

        let found: Vec<_> = self
            .catalog
            .search_books(&query)
            .into_iter()
            .cloned()
            .collect();
        if found.is_empty() {
            self.set_status("No books match these criteria.", StatusKind::Info);
        } else {
            self.clear_status();
            self.screen = Screen::Books(BookListScreen::search_results(found));
        }
    }

    fn change_status(&mut self, form: &StatusForm) {
        let (id, status) = match form.parse_inputs() {
            Ok(values) => values,
            Err(err) => return self.set_status(err.to_string(), StatusKind::Error),
        };

        match self.catalog.edit_status(id, status) {
            Ok(book) => {
                let text = format!("Status of '{}' changed to {}.", book.title, book.status);
                self.set_status(text, StatusKind::Info);
            }
            Err(err) => self.report_catalog_error(err),
        }
    }

    /// Lookup problems are the user's to fix; storage problems are logged too.
    fn report_catalog_error(&mut self, err: CatalogError) {
        let text = match err {
            CatalogError::InvalidArgument(_)
            | CatalogError::NotFound(_)
            | CatalogError::IdExhausted(_) => err.to_string(),
            CatalogError::Persistence(_) => {
                let err = anyhow::Error::from(err);
                error!(error = ?err, "catalog storage failed");
                format!("Could not save the catalog: {}", surface_error(&err))
            }
        };
        self.set_status(text, StatusKind::Error);
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Menu => self.draw_menu(frame, content_area),
            Screen::Books(list) => self.draw_book_list(frame, content_area, list),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => {
                self.draw_book_form(frame, area, "Add Book", form, "<required>")
            }
            Mode::Searching(form) => {
                self.draw_book_form(frame, area, "Search Books", form, "<any>")
            }
            Mode::RemovingBook(form) => self.draw_lookup_form(frame, area, form),
            Mode::EditingStatus(form) => self.draw_status_form(frame, area, form),
            Mode::Normal => {}
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Library Catalog ")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut lines: Vec<Line> = MenuChoice::ALL
            .iter()
            .map(|choice| {
                Line::from(vec![
                    Span::styled(format!("{} ", choice.key()), key_style),
                    Span::raw(format!("- {}", choice.label())),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        let count = self.catalog.len();
        let noun = if count == 1 { "book" } else { "books" };
        lines.push(Line::from(Span::styled(
            format!("{count} {noun} in the catalog."),
            Style::default().fg(Color::Gray),
        )));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn draw_book_list(&self, frame: &mut Frame, area: Rect, list: &BookListScreen) {
        let block = Block::default()
            .title(format!(" {} ", list.heading))
            .borders(Borders::ALL);

        if list.books.is_empty() {
            let paragraph = Paragraph::new(Span::styled(
                list.empty_message,
                Style::default().fg(Color::Gray),
            ))
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = list
            .books
            .iter()
            .map(|book| ListItem::new(book.summary_line()))
            .collect();
        let widget = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(list.selected));
        frame.render_stateful_widget(widget, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::AddingBook(_)) | (_, Mode::Searching(_)) | (_, Mode::EditingStatus(_)) => {
                Line::from(vec![
                    Span::styled("[Tab]", key_style),
                    Span::raw(" Next field   "),
                    Span::styled("[Enter]", key_style),
                    Span::raw(" Submit   "),
                    Span::styled("[Esc]", key_style),
                    Span::raw(" Cancel"),
                ])
            }
            (_, Mode::RemovingBook(_)) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::Books(_), Mode::Normal) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Details   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Menu   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Menu, Mode::Normal) => Line::from(vec![
                Span::styled("[0-5]", key_style),
                Span::raw(" Choose   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_book_form(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        form: &BookForm,
        placeholder: &str,
    ) {
        let popup_area = centered_rect(70, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookField::ALL
            .iter()
            .map(|field| form.build_line(*field, placeholder))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter to submit • Tab to switch • Esc to cancel",
            Style::default().fg(Color::Gray),
        )));

        frame.render_widget(Paragraph::new(lines), inner);

        let cursor_x = cursor_column(inner, form.active.label(), form.value(form.active));
        frame.set_cursor_position((cursor_x, inner.y + form.active_row()));
    }

    fn draw_lookup_form(&self, frame: &mut Frame, area: Rect, form: &LookupForm) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Remove Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            form.build_line(),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to remove • Esc to cancel",
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
        frame.set_cursor_position((cursor_column(inner, "Id", &form.id), inner.y));
    }

    fn draw_status_form(&self, frame: &mut Frame, area: Rect, form: &StatusForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Edit Status").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            form.build_line(StatusField::Id),
            form.build_line(StatusField::Status),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), inner);

        let (cursor_x, cursor_y) = match form.active {
            StatusField::Id => (cursor_column(inner, "Id", &form.id), inner.y),
            StatusField::Status => (cursor_column(inner, "Status", &form.status), inner.y + 1),
        };
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn set_status<T: Into<String>>(&mut self, text: T, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Keys every dialog handles the same way: typing, deleting, submitting, and
/// backing out.
fn edit_text(code: KeyCode, input: &mut impl TextInput) -> FormOutcome {
    match code {
        KeyCode::Esc => FormOutcome::Cancel,
        KeyCode::Enter => FormOutcome::Submit,
        KeyCode::Backspace => {
            input.backspace();
            FormOutcome::Editing
        }
        KeyCode::Char(ch) => {
            input.push_char(ch);
            FormOutcome::Editing
        }
        _ => FormOutcome::Editing,
    }
}
