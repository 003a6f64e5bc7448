use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::banner::{BannerKind, Banners};
use crate::controller::{ContactController, ContactView, SubmissionOutcome, SEND_LABEL};
use crate::decor::TypeWriter;
use crate::form::{FieldId, FieldState};
use crate::transport::{Transport, TransportError, TransportResponse};

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FieldId),
    Send,
}

impl Focus {
    fn order() -> [Focus; 4] {
        [
            Focus::Field(FieldId::Name),
            Focus::Field(FieldId::Email),
            Focus::Field(FieldId::Message),
            Focus::Send,
        ]
    }

    fn position(&self) -> usize {
        Self::order().iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Focus {
        let order = Self::order();
        order[(self.position() + 1) % order.len()]
    }

    pub fn prev(&self) -> Focus {
        let order = Self::order();
        order[(self.position() + order.len() - 1) % order.len()]
    }
}

/// One text input with a cursor (in characters)
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Returns true if something was removed
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.remove(byte_pos);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.value.chars().count() {
            return false;
        }
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.remove(byte_pos);
        true
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

/// Everything the submission controller reads and writes
#[derive(Debug, Clone)]
pub struct FormState {
    pub inputs: [TextInput; 3],
    pub states: [FieldState; 3],
    pub banners: Banners,
    pub submit_enabled: bool,
    pub submit_label: String,
}

impl FormState {
    pub fn new(banner_timeout: Duration) -> Self {
        Self {
            inputs: Default::default(),
            states: [FieldState::Neutral; 3],
            banners: Banners::new(banner_timeout),
            submit_enabled: true,
            submit_label: SEND_LABEL.to_string(),
        }
    }

    pub fn input(&self, field: FieldId) -> &TextInput {
        &self.inputs[field.index()]
    }

    pub fn input_mut(&mut self, field: FieldId) -> &mut TextInput {
        &mut self.inputs[field.index()]
    }

    pub fn state(&self, field: FieldId) -> FieldState {
        self.states[field.index()]
    }
}

impl ContactView for FormState {
    fn field_value(&self, field: FieldId) -> String {
        self.input(field).value.clone()
    }

    fn set_field_state(&mut self, field: FieldId, state: FieldState) {
        self.states[field.index()] = state;
    }

    fn clear_fields(&mut self) {
        for input in self.inputs.iter_mut() {
            input.clear();
        }
    }

    fn show_banner(&mut self, kind: BannerKind, text: &str) {
        self.banners.show(kind, text, Instant::now());
    }

    fn hide_banner(&mut self, kind: BannerKind) {
        self.banners.hide(kind);
    }

    fn set_submit_control(&mut self, enabled: bool, label: &str) {
        self.submit_enabled = enabled;
        self.submit_label = label.to_string();
    }
}

pub type SubmitTask = JoinHandle<Result<TransportResponse, TransportError>>;

pub struct App<T> {
    pub should_quit: bool,
    pub focus: Focus,
    pub form: FormState,
    pub controller: ContactController<T>,
    pub submit_task: Option<SubmitTask>,
    pub header: TypeWriter,
    // Animation state
    pub animation_frame: u8,
}

impl<T> App<T> {
    pub fn focused_field(&self) -> Option<FieldId> {
        match self.focus {
            Focus::Field(field) => Some(field),
            Focus::Send => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_task.is_some()
    }
}

impl<T: Transport + 'static> App<T> {
    pub fn new(controller: ContactController<T>, owner_name: &str, banner_timeout: Duration) -> Self {
        Self {
            should_quit: false,
            focus: Focus::Field(FieldId::Name),
            form: FormState::new(banner_timeout),
            controller,
            submit_task: None,
            header: TypeWriter::new(owner_name, 1),
            animation_frame: 0,
        }
    }

    /// Move focus; leaving a field counts as a blur.
    pub fn set_focus(&mut self, focus: Focus) {
        if focus == self.focus {
            return;
        }
        if let Some(field) = self.focused_field() {
            self.controller.validate_input(&mut self.form, field);
        }
        self.focus = focus;
    }

    pub fn focus_next(&mut self) {
        self.set_focus(self.focus.next());
    }

    pub fn focus_prev(&mut self) {
        self.set_focus(self.focus.prev());
    }

    /// Apply an edit to the focused field and fire the input handler if the
    /// value changed.
    pub fn edit<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut TextInput) -> bool,
    {
        if let Some(field) = self.focused_field() {
            if edit(self.form.input_mut(field)) {
                self.controller.on_input(&mut self.form, field);
            }
        }
    }

    pub fn type_char(&mut self, c: char) {
        self.edit(|input| {
            input.insert(c);
            true
        });
    }

    /// Start a submission. Ignored while one is in flight.
    pub fn submit(&mut self) {
        if !self.form.submit_enabled || self.submit_task.is_some() {
            return;
        }
        if let Ok(payload) = self.controller.begin_submit(&mut self.form) {
            self.submit_task = Some(self.controller.dispatch(payload));
        }
    }

    /// Collect a settled submission task, if any.
    pub async fn poll_submission(&mut self) -> Option<SubmissionOutcome> {
        if !self.submit_task.as_ref().is_some_and(|task| task.is_finished()) {
            return None;
        }
        let task = self.submit_task.take()?;
        let result = task
            .await
            .unwrap_or_else(|e| Err(TransportError::Aborted(e.to_string())));
        Some(self.controller.finish_submit(&mut self.form, result))
    }

    /// Tick animation frame (called by Tick event)
    pub async fn tick(&mut self, now: Instant) {
        self.header.tick();
        if self.is_submitting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        self.poll_submission().await;
        self.form.banners.expire(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::{Scripted, ScriptedTransport};

    fn app(reply: Scripted) -> App<ScriptedTransport> {
        App::new(
            ContactController::new(ScriptedTransport::new(reply)),
            "Job Montenegro",
            Duration::from_secs(5),
        )
    }

    fn fill(app: &mut App<ScriptedTransport>, name: &str, email: &str, message: &str) {
        for (field, value) in [(FieldId::Name, name), (FieldId::Email, email), (FieldId::Message, message)] {
            app.set_focus(Focus::Field(field));
            for c in value.chars() {
                app.type_char(c);
            }
        }
    }

    async fn settle(app: &mut App<ScriptedTransport>) -> SubmissionOutcome {
        loop {
            if let Some(outcome) = app.poll_submission().await {
                return outcome;
            }
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_text_input_editing() {
        let mut input = TextInput::default();
        for c in "héllo".chars() {
            input.insert(c);
        }
        input.left();
        input.left();
        assert!(input.backspace());
        assert_eq!(input.value, "hélo");
        input.home();
        assert!(!input.backspace());
        assert!(input.delete());
        assert_eq!(input.value, "élo");
        input.end();
        assert!(!input.delete());
        assert_eq!(input.cursor, 3);
    }

    #[test]
    fn test_focus_cycle() {
        let focus = Focus::Field(FieldId::Name);
        assert_eq!(focus.next(), Focus::Field(FieldId::Email));
        assert_eq!(Focus::Send.next(), Focus::Field(FieldId::Name));
        assert_eq!(focus.prev(), Focus::Send);
    }

    #[test]
    fn test_leaving_field_validates_it() {
        let mut app = app(Scripted::Status(200, ""));
        app.focus_next();
        assert_eq!(app.form.state(FieldId::Name), FieldState::Invalid);

        for c in "a@b".chars() {
            app.type_char(c);
        }
        assert_eq!(app.form.state(FieldId::Email), FieldState::Neutral);
        app.focus_next();
        assert_eq!(app.form.state(FieldId::Email), FieldState::Invalid);

        app.set_focus(Focus::Field(FieldId::Email));
        app.type_char('.');
        app.type_char('c');
        app.focus_next();
        assert_eq!(app.form.state(FieldId::Email), FieldState::Valid);
    }

    #[test]
    fn test_typing_hides_error_banner() {
        let mut app = app(Scripted::Status(200, ""));
        app.submit();
        assert!(app.form.banners.error.is_visible());
        assert!(!app.is_submitting());

        app.type_char('J');
        assert!(!app.form.banners.error.is_visible());
    }

    #[tokio::test]
    async fn test_submit_success_resets_form() {
        let mut app = app(Scripted::Status(200, ""));
        fill(&mut app, "Jane Doe", "jane@example.com", "Hello");
        app.set_focus(Focus::Send);

        app.submit();
        assert!(app.is_submitting());
        assert!(!app.form.submit_enabled);
        assert_eq!(app.form.submit_label, "Sending...");

        // A second submit while busy is ignored
        app.submit();

        let outcome = settle(&mut app).await;
        assert!(outcome.is_success());
        assert_eq!(app.controller.transport().call_count(), 1);
        assert!(app.form.submit_enabled);
        assert_eq!(app.form.submit_label, "Send");
        assert!(app.form.banners.success.is_visible());
        assert_eq!(app.form.banners.success.text(), "Message sent successfully!");
        for field in FieldId::all() {
            assert!(app.form.input(field).value.is_empty());
            assert_eq!(app.form.state(field), FieldState::Neutral);
        }
    }

    #[tokio::test]
    async fn test_submit_rejection_keeps_values() {
        let mut app = app(Scripted::Status(422, r#"{"errors":[{"message":"email is invalid"}]}"#));
        fill(&mut app, "Jane Doe", "jane@example.com", "Hello");

        app.submit();
        settle(&mut app).await;
        assert_eq!(app.form.banners.error.text(), "email is invalid");
        assert_eq!(app.form.input(FieldId::Message).value, "Hello");
        assert!(app.form.submit_enabled);
        assert_eq!(app.form.submit_label, "Send");
    }

    #[tokio::test]
    async fn test_tick_expires_banners() {
        let mut app = app(Scripted::Status(200, ""));
        app.submit();
        assert!(app.form.banners.error.is_visible());

        app.tick(Instant::now() + Duration::from_secs(6)).await;
        assert!(!app.form.banners.error.is_visible());
    }

    #[tokio::test]
    async fn test_tick_advances_header() {
        let mut app = app(Scripted::Status(200, ""));
        app.tick(Instant::now()).await;
        app.tick(Instant::now()).await;
        assert_eq!(app.header.visible(), "Jo");
    }
}
