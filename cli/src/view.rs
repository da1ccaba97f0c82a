//! Plain-text rendering of catalog screens.

use std::io::Write;

use catalog_core::{Book, MessageKind, Student, View};
use chrono::NaiveDate;

const TITLE_WIDTH: usize = 28;
const AUTHOR_WIDTH: usize = 20;

/// A `View` that writes tables and messages to any writer, normally stdout.
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Full record card for `books show`.
    pub fn book_detail(&mut self, book: &Book) {
        self.line(&format!("#{} {}", book.id, book.title));
        self.line(&format!("  author     {}", book.author));
        self.line(&format!("  isbn       {}", book.isbn));
        self.line(&format!("  price      {}", format_price(book.price)));
        self.line(&format!("  published  {}", format_date(&book.publish_date)));

        let Some(detail) = &book.detail else {
            return;
        };
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        self.line(&format!("  publisher  {}", or_dash(&detail.publisher)));
        self.line(&format!("  language   {}", or_dash(&detail.language)));
        self.line(&format!("  edition    {}", or_dash(&detail.edition)));
        self.line(&format!(
            "  pages      {}",
            detail.page_count.map_or_else(|| "-".to_string(), |p| p.to_string())
        ));
        self.line(&format!("  about      {}", or_dash(&detail.description)));
        if let Some(cover) = &detail.cover_image_url {
            self.line(&format!("  cover      {cover}"));
        }
    }

    pub fn student_detail(&mut self, student: &Student) {
        self.line(&format!("#{} {}", student.id, student.name));
        self.line(&format!("  number     {}", student.student_number));
        self.line(&format!(
            "  born       {}",
            format_date(student.date_of_birth.as_deref().unwrap_or_default())
        ));
    }

    fn line(&mut self, text: &str) {
        // A closed stdout (e.g. piped into `head`) is not worth failing over.
        let _ = writeln!(self.out, "{text}");
    }

    fn message(&mut self, text: &str, kind: MessageKind) {
        let tag = match kind {
            MessageKind::Success => "ok",
            MessageKind::Error => "error",
            MessageKind::Info => "info",
        };
        self.line(&format!("[{tag}] {text}"));
    }
}

impl<W: Write> View<Book> for TerminalView<W> {
    fn render(&mut self, records: &[Book]) {
        if records.is_empty() {
            self.line("No books registered.");
            return;
        }
        self.line(&format!(
            "{:>4}  {:<TITLE_WIDTH$}  {:<AUTHOR_WIDTH$}  {:<13}  {:>10}  {}",
            "ID", "TITLE", "AUTHOR", "ISBN", "PRICE", "PUBLISHED"
        ));
        for book in records {
            self.line(&format!(
                "{:>4}  {:<TITLE_WIDTH$}  {:<AUTHOR_WIDTH$}  {:<13}  {:>10}  {}",
                book.id,
                truncate(&book.title, TITLE_WIDTH),
                truncate(&book.author, AUTHOR_WIDTH),
                book.isbn,
                format_price(book.price),
                format_date(&book.publish_date),
            ));
        }
    }

    fn show_message(&mut self, text: &str, kind: MessageKind) {
        self.message(text, kind);
    }

    fn set_mode(&mut self, editing: Option<i64>) {
        tracing::debug!(?editing, "book form mode");
    }

    fn focus_field(&mut self, field: &str) {
        self.line(&format!("        check --{}", flag_name(field)));
    }
}

impl<W: Write> View<Student> for TerminalView<W> {
    fn render(&mut self, records: &[Student]) {
        if records.is_empty() {
            self.line("No students registered.");
            return;
        }
        self.line(&format!("{:>4}  {:<TITLE_WIDTH$}  {:<8}  {}", "ID", "NAME", "NUMBER", "BORN"));
        for student in records {
            self.line(&format!(
                "{:>4}  {:<TITLE_WIDTH$}  {:<8}  {}",
                student.id,
                truncate(&student.name, TITLE_WIDTH),
                student.student_number,
                format_date(student.date_of_birth.as_deref().unwrap_or_default()),
            ));
        }
    }

    fn show_message(&mut self, text: &str, kind: MessageKind) {
        self.message(text, kind);
    }

    fn set_mode(&mut self, editing: Option<i64>) {
        tracing::debug!(?editing, "student form mode");
    }

    fn focus_field(&mut self, field: &str) {
        self.line(&format!("        check --{}", flag_name(field)));
    }
}

/// `YYYY-MM-DD` as e.g. `Aug 1, 1965`. Text that is not a real calendar date
/// is shown unchanged; blank text becomes `-`.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "-".to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}

/// Wire field name to its CLI flag, e.g. `publishDate` to `publish-date`.
fn flag_name(field: &str) -> String {
    let mut flag = String::with_capacity(field.len() + 2);
    for c in field.chars() {
        if c.is_ascii_uppercase() {
            flag.push('-');
            flag.push(c.to_ascii_lowercase());
        } else {
            flag.push(c);
        }
    }
    flag
}
