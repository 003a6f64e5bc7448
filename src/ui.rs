use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::{App, Focus};
use crate::banner::Banner;
use crate::form::{FieldId, FieldState};

pub fn render<T>(app: &App<T>, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_form(app, frame, body_area);
    render_footer(app, frame, footer_area);
}

fn render_header<T>(app: &App<T>, frame: &mut Frame, area: Rect) {
    let cursor = if app.header.is_done() { "" } else { "_" };
    let title = Line::from(vec![
        Span::styled(format!(" {}{} ", app.header.visible(), cursor), Style::default().fg(Color::Cyan).bold()),
        Span::styled("· get in touch", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_form<T>(app: &App<T>, frame: &mut Frame, area: Rect) {
    let [name_area, email_area, message_area, send_area, success_area, error_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_field(app, frame, FieldId::Name, name_area);
    render_field(app, frame, FieldId::Email, email_area);
    render_field(app, frame, FieldId::Message, message_area);
    render_send_button(app, frame, send_area);
    render_banner(frame, &app.form.banners.success, Color::Green, success_area);
    render_banner(frame, &app.form.banners.error, Color::Red, error_area);
}

fn marker_color(state: FieldState) -> Option<Color> {
    match state {
        FieldState::Neutral => None,
        FieldState::Valid => Some(Color::Green),
        FieldState::Invalid => Some(Color::Red),
    }
}

fn render_field<T>(app: &App<T>, frame: &mut Frame, field: FieldId, area: Rect) {
    let focused = app.focus == Focus::Field(field);
    let state = app.form.state(field);

    let color = marker_color(state).unwrap_or(if focused { Color::Yellow } else { Color::DarkGray });
    let mut border_style = Style::default().fg(color);
    if focused {
        border_style = border_style.add_modifier(Modifier::BOLD);
    }

    let title = match state {
        FieldState::Invalid if field.is_email() => format!(" {} (invalid address) ", field.label()),
        FieldState::Invalid => format!(" {} (required) ", field.label()),
        _ => format!(" {} ", field.label()),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    let input = app.form.input(field);
    let paragraph = Paragraph::new(input.value.as_str())
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);

    if focused {
        // Cursor position within the last line of the value
        let before: String = input.value.chars().take(input.cursor).collect();
        frame.set_cursor_position(cursor_position(&before, area));
    }
}

/// Screen position of a cursor placed after `before`, kept inside the block's border
fn cursor_position(before: &str, area: Rect) -> (u16, u16) {
    let row = u16::try_from(before.matches('\n').count()).unwrap_or(u16::MAX);
    let col = before
        .rsplit('\n')
        .next()
        .map(|l| u16::try_from(l.chars().count()).unwrap_or(u16::MAX))
        .unwrap_or(0);
    let x = area.x.saturating_add(1).saturating_add(col).min(area.right().saturating_sub(2));
    let y = area.y.saturating_add(1).saturating_add(row).min(area.bottom().saturating_sub(2));
    (x, y)
}

fn render_send_button<T>(app: &App<T>, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Send;
    let label = if app.is_submitting() {
        format!("{}{}", app.form.submit_label.trim_end_matches('.'), ".".repeat(app.animation_frame as usize + 1))
    } else {
        app.form.submit_label.clone()
    };

    let style = if !app.form.submit_enabled {
        Style::default().fg(Color::DarkGray)
    } else if focused {
        Style::default().fg(Color::Black).bg(Color::Green).bold()
    } else {
        Style::default().fg(Color::Green)
    };

    let [button_area, _] = Layout::horizontal([Constraint::Length(16), Constraint::Min(0)]).areas(area);
    let button = Paragraph::new(Line::from(label).centered())
        .style(style)
        .block(Block::default().borders(Borders::ALL).border_style(style));
    frame.render_widget(button, button_area);
}

fn render_banner(frame: &mut Frame, banner: &Banner, color: Color, area: Rect) {
    if !banner.is_visible() {
        return;
    }
    let line = Line::from(Span::styled(format!(" {} ", banner.text()), Style::default().fg(color).bold()));
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer<T>(app: &App<T>, frame: &mut Frame, area: Rect) {
    let hint = if app.is_submitting() {
        " Sending your message... "
    } else {
        " Tab/↑↓ move · Enter next/send · Ctrl-S send · Esc quit "
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use ratatui::{backend::TestBackend, Terminal};
    use crate::controller::tests::{Scripted, ScriptedTransport};
    use crate::controller::ContactController;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let mut text = String::new();
        for row in buffer.content.chunks(width) {
            for cell in row {
                text.push_str(cell.symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_cursor_position_stays_inside_block() {
        let area = Rect::new(2, 3, 20, 5);
        assert_eq!(cursor_position("", area), (3, 4));
        assert_eq!(cursor_position("ab\ncd", area), (5, 5));

        let long_line = "x".repeat(70_000);
        assert_eq!(cursor_position(&long_line, area), (20, 4));

        let many_lines = "\n".repeat(70_000);
        assert_eq!(cursor_position(&many_lines, area), (3, 6));
    }

    #[test]
    fn test_renders_fields_and_banner() {
        let mut app = App::new(
            ContactController::new(ScriptedTransport::new(Scripted::Status(200, ""))),
            "Job",
            Duration::from_secs(5),
        );
        app.submit();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(&app, frame)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Name"));
        assert!(text.contains("Email"));
        assert!(text.contains("Message"));
        assert!(text.contains("Send"));
        assert!(text.contains("Please fill in all fields."));
    }
}
