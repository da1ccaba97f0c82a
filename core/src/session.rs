//! List/create/edit/delete orchestration for a catalog screen.
//!
//! # Design
//! A `Session` owns the screen state (`UiState`) and drives a `View`, the
//! rendering surface supplied by the front end. Handlers map one user action
//! each. After any successful mutation the full list is fetched again and
//! re-rendered; nothing is patched locally. A failed mutation leaves the form
//! untouched so the user can correct it and resubmit.

use crate::error::{ApiError, SessionError};
use crate::service::ApiService;
use crate::transport::Transport;
use crate::types::{Book, Normalize, Record};
use crate::validation::{Validate, ValidationError, ValidationPolicy};

/// Severity of a message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
    Info,
}

/// The rendering surface a session drives.
pub trait View<R> {
    fn render(&mut self, records: &[R]);

    fn show_message(&mut self, text: &str, kind: MessageKind);

    /// `Some(id)` while a record is being edited, `None` in create mode.
    fn set_mode(&mut self, editing: Option<i64>);

    fn focus_field(&mut self, _field: &str) {}

    /// Toggled around every mutating request.
    fn set_loading(&mut self, _loading: bool) {}
}

/// Everything a screen remembers between user actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState<I> {
    pub editing: Option<i64>,
    pub form: I,
    pub loading: bool,
}

pub struct Session<R: Record, T, V> {
    api: ApiService<T>,
    view: V,
    policy: ValidationPolicy,
    state: UiState<R::Input>,
}

impl<R, T, V> Session<R, T, V>
where
    R: Record,
    T: Transport,
    V: View<R>,
{
    pub fn new(api: ApiService<T>, view: V, policy: ValidationPolicy) -> Self {
        Self {
            api,
            view,
            policy,
            state: UiState::default(),
        }
    }

    pub fn state(&self) -> &UiState<R::Input> {
        &self.state
    }

    /// Mutable access to the form fields.
    pub fn form_mut(&mut self) -> &mut R::Input {
        &mut self.state.form
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Fetch the full list and render it. On failure the list is cleared.
    pub fn load(&mut self) -> Result<Vec<R>, ApiError> {
        match self.api.list::<R>() {
            Ok(records) => {
                tracing::info!(count = records.len(), resource = R::RESOURCE.path(), "list loaded");
                self.view.render(&records);
                Ok(records)
            }
            Err(e) => {
                self.view.show_message(&e.to_string(), MessageKind::Error);
                self.view.render(&[]);
                Err(e)
            }
        }
    }

    /// Fetch a single record without changing any state.
    pub fn fetch(&mut self, id: i64) -> Result<R, ApiError> {
        self.api.get::<R>(id).inspect_err(|e| {
            self.view.show_message(&e.to_string(), MessageKind::Error);
        })
    }

    /// Load a record into the form and switch to edit mode.
    pub fn begin_edit(&mut self, id: i64) -> Result<R, ApiError> {
        let record = self.fetch(id)?;
        self.state.form = record.to_input();
        self.state.editing = Some(id);
        self.view.set_mode(Some(id));
        if let Some(first) = R::Input::FIELDS.first() {
            self.view.focus_field(first);
        }
        Ok(record)
    }

    /// Clear the form and return to create mode.
    pub fn cancel_edit(&mut self) {
        self.reset_form();
    }

    /// Check one field as typed, before it reaches the form. A failure is
    /// shown and the field focused, like a rejected submit.
    pub fn check_field(&mut self, field: &str, raw: &str) -> Result<(), ValidationError> {
        R::Input::validate_field(field, raw, &self.policy).inspect_err(|e| {
            self.view.show_message(&e.message, MessageKind::Error);
            self.view.focus_field(e.field);
        })
    }

    /// Validate the form, then create or update depending on the mode.
    pub fn submit(&mut self) -> Result<R, SessionError> {
        let form = self.state.form.normalized();
        if let Err(e) = form.validate(&self.policy) {
            self.view.show_message(&e.message, MessageKind::Error);
            self.view.focus_field(e.field);
            return Err(e.into());
        }

        self.set_loading(true);
        let result = match self.state.editing {
            Some(id) => self.api.update::<R>(id, &form),
            None => self.api.create::<R>(&form),
        };
        self.set_loading(false);

        match result {
            Ok(saved) => {
                let verb = if self.state.editing.is_some() { "updated" } else { "created" };
                tracing::info!(id = saved.id(), resource = R::RESOURCE.path(), verb, "record saved");
                self.view
                    .show_message(&format!("{} {verb} successfully.", capitalized(R::NOUN)), MessageKind::Success);
                self.reset_form();
                // A failed refresh is already shown by `load`.
                let _ = self.load();
                Ok(saved)
            }
            Err(e) => {
                self.view.show_message(&e.to_string(), MessageKind::Error);
                Err(e.into())
            }
        }
    }

    /// Delete `record` once `confirm` agrees. Returns `Ok(false)` when the
    /// user declined.
    pub fn delete(&mut self, record: &R, confirm: impl FnOnce(&R) -> bool) -> Result<bool, ApiError> {
        if !confirm(record) {
            return Ok(false);
        }
        self.set_loading(true);
        let result = self.api.delete::<R>(record.id());
        self.set_loading(false);

        match result {
            Ok(()) => {
                tracing::info!(id = record.id(), resource = R::RESOURCE.path(), "record deleted");
                self.view.show_message(
                    &format!("{} \"{}\" deleted successfully.", capitalized(R::NOUN), record.label()),
                    MessageKind::Success,
                );
                if self.state.editing == Some(record.id()) {
                    self.reset_form();
                }
                let _ = self.load();
                Ok(true)
            }
            Err(e) => {
                self.view.show_message(&e.to_string(), MessageKind::Error);
                Err(e)
            }
        }
    }

    fn reset_form(&mut self) {
        self.state.form = R::Input::default();
        self.state.editing = None;
        self.view.set_mode(None);
    }

    fn set_loading(&mut self, loading: bool) {
        self.state.loading = loading;
        self.view.set_loading(loading);
    }
}

impl<T, V> Session<Book, T, V>
where
    T: Transport,
    V: View<Book>,
{
    /// Replace the rendered list with books whose title matches.
    pub fn search(&mut self, title: &str) -> Result<Vec<Book>, ApiError> {
        match self.api.search_books(title.trim()) {
            Ok(books) => {
                if books.is_empty() {
                    self.view.show_message(&format!("No books match \"{}\".", title.trim()), MessageKind::Info);
                }
                self.view.render(&books);
                Ok(books)
            }
            Err(e) => {
                self.view.show_message(&e.to_string(), MessageKind::Error);
                Err(e)
            }
        }
    }
}

fn capitalized(noun: &str) -> String {
    let mut chars = noun.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
