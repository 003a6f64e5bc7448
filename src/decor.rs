//! Typing animation for the header. Purely cosmetic; shares nothing with the
//! submission flow.

/// Reveals `text` one character every `ticks_per_char` ticks
#[derive(Debug, Clone)]
pub struct TypeWriter {
    text: String,
    shown: usize,
    ticks_per_char: u8,
    ticks: u8,
}

impl TypeWriter {
    pub fn new(text: &str, ticks_per_char: u8) -> Self {
        Self {
            text: text.to_string(),
            shown: 0,
            ticks_per_char: ticks_per_char.max(1),
            ticks: 0,
        }
    }

    pub fn tick(&mut self) {
        if self.is_done() {
            return;
        }
        self.ticks += 1;
        if self.ticks >= self.ticks_per_char {
            self.ticks = 0;
            self.shown += 1;
        }
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.text.chars().count()
    }

    pub fn visible(&self) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.shown)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len());
        &self.text[..end]
    }
}
