//! Dispatch of parsed commands onto a catalog session.
//!
//! Handlers report their own failures through the view, so a failed action
//! becomes a non-zero exit code here rather than a second error print.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use catalog_core::{ApiService, Book, CatalogClient, Record, Session, Student, UreqTransport};

use crate::cli::{BookAction, Command, StudentAction};
use crate::settings::Settings;
use crate::view::TerminalView;

type Screen<R> = Session<R, UreqTransport, TerminalView<io::Stdout>>;

pub fn run(command: Command, settings: &Settings) -> ExitCode {
    let api = ApiService::new(
        CatalogClient::new(&settings.api.base_url),
        UreqTransport::new(settings.api.timeout()),
    )
    .with_update_method(settings.api.update_method);
    let view = TerminalView::new(io::stdout());
    let policy = settings.validation;

    let ok = match command {
        Command::Books { action } => books(Session::new(api, view, policy), action),
        Command::Students { action } => students(Session::new(api, view, policy), action),
    };
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn books(mut session: Screen<Book>, action: BookAction) -> bool {
    match action {
        BookAction::List => session.load().is_ok(),
        BookAction::Show { id } => match session.fetch(id) {
            Ok(book) => {
                session.view_mut().book_detail(&book);
                true
            }
            Err(_) => false,
        },
        BookAction::Add(fields) => {
            if !check_flags(&mut session, &fields.supplied()) {
                return false;
            }
            fields.apply(session.form_mut());
            session.submit().is_ok()
        }
        BookAction::Edit { id, fields } => {
            if !check_flags(&mut session, &fields.supplied()) || session.begin_edit(id).is_err() {
                return false;
            }
            fields.apply(session.form_mut());
            session.submit().is_ok()
        }
        BookAction::Delete { id, yes } => delete(&mut session, id, yes),
        BookAction::Search { title } => session.search(&title).is_ok(),
    }
}

fn students(mut session: Screen<Student>, action: StudentAction) -> bool {
    match action {
        StudentAction::List => session.load().is_ok(),
        StudentAction::Show { id } => match session.fetch(id) {
            Ok(student) => {
                session.view_mut().student_detail(&student);
                true
            }
            Err(_) => false,
        },
        StudentAction::Add(fields) => {
            if !check_flags(&mut session, &fields.supplied()) {
                return false;
            }
            fields.apply(session.form_mut());
            session.submit().is_ok()
        }
        StudentAction::Edit { id, fields } => {
            if !check_flags(&mut session, &fields.supplied()) || session.begin_edit(id).is_err() {
                return false;
            }
            fields.apply(session.form_mut());
            session.submit().is_ok()
        }
        StudentAction::Delete { id, yes } => delete(&mut session, id, yes),
    }
}

/// Reject a bad flag before any request is made.
fn check_flags<R>(session: &mut Screen<R>, flags: &[(&'static str, String)]) -> bool
where
    R: Record,
    TerminalView<io::Stdout>: catalog_core::View<R>,
{
    flags.iter().all(|(field, raw)| session.check_field(field, raw).is_ok())
}

fn delete<R>(session: &mut Screen<R>, id: i64, yes: bool) -> bool
where
    R: Record,
    TerminalView<io::Stdout>: catalog_core::View<R>,
{
    let Ok(record) = session.fetch(id) else {
        return false;
    };
    let result = session.delete(&record, |r| {
        yes || confirm(
            io::stdin().lock(),
            io::stdout(),
            &format!("Delete {} \"{}\" (id {})? [y/N] ", R::NOUN, r.label(), r.id()),
        )
    });
    result.is_ok()
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
fn confirm<I: BufRead, O: Write>(mut input: I, mut output: O, prompt: &str) -> bool {
    let _ = write!(output, "{prompt}");
    let _ = output.flush();
    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
