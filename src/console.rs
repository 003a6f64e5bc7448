//! Headless view used by `contact send`: field values come from the command
//! line and banners are printed.

use std::io::Write;

use crate::banner::BannerKind;
use crate::controller::ContactView;
use crate::form::{FieldId, FieldState};

pub struct ConsoleView<W> {
    values: [String; 3],
    states: [FieldState; 3],
    out: W,
    busy: bool,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(name: &str, email: &str, message: &str, out: W) -> Self {
        Self {
            values: [name.to_string(), email.to_string(), message.to_string()],
            states: [FieldState::Neutral; 3],
            out,
            busy: false,
        }
    }

    pub fn state(&self, field: FieldId) -> FieldState {
        self.states[field.index()]
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ContactView for ConsoleView<W> {
    fn field_value(&self, field: FieldId) -> String {
        self.values[field.index()].clone()
    }

    fn set_field_state(&mut self, field: FieldId, state: FieldState) {
        self.states[field.index()] = state;
    }

    fn clear_fields(&mut self) {
        for value in self.values.iter_mut() {
            value.clear();
        }
    }

    fn show_banner(&mut self, kind: BannerKind, text: &str) {
        let prefix = match kind {
            BannerKind::Success => "✓",
            BannerKind::Error => "✗",
        };
        // Nothing useful to do if stdout is gone
        let _ = writeln!(self.out, "{} {}", prefix, text);
    }

    fn hide_banner(&mut self, _kind: BannerKind) {}

    fn set_submit_control(&mut self, enabled: bool, label: &str) {
        self.busy = !enabled;
        if !enabled {
            let _ = writeln!(self.out, "{}", label);
        }
    }
}
