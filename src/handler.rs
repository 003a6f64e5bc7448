use std::time::Instant;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::{App, Focus, TextInput};
use crate::transport::Transport;
use crate::tui::AppEvent;

pub async fn handle_event<T: Transport + 'static>(app: &mut App<T>, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick(Instant::now()).await,
    }
    Ok(())
}

pub fn handle_key<T: Transport + 'static>(app: &mut App<T>, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keys that work anywhere
    match key.code {
        KeyCode::Char('c') if ctrl => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('s') if ctrl => {
            app.submit();
            return;
        }
        KeyCode::Esc => {
            app.should_quit = true;
            return;
        }
        KeyCode::Tab | KeyCode::Down => {
            app.focus_next();
            return;
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.focus_prev();
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Send => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                app.submit();
            }
        }
        Focus::Field(field) => match key.code {
            KeyCode::Enter if field.is_multiline() => app.type_char('\n'),
            KeyCode::Enter => app.focus_next(),
            KeyCode::Backspace => app.edit(TextInput::backspace),
            KeyCode::Delete => app.edit(TextInput::delete),
            KeyCode::Left => app.form.input_mut(field).left(),
            KeyCode::Right => app.form.input_mut(field).right(),
            KeyCode::Home => app.form.input_mut(field).home(),
            KeyCode::End => app.form.input_mut(field).end(),
            KeyCode::Char(c) if !ctrl => app.type_char(c),
            _ => {}
        },
    }
}
