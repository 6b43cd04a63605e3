//! UI rendering module

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

use pdrive_core::domain::console::Severity;
use pdrive_core::usecases::LinkState;

use crate::app::{App, Focus, Screen};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(3),  // Status
            Constraint::Length(11), // Form / actions
            Constraint::Min(6),     // Activity log
            Constraint::Length(3),  // Key hints
        ])
        .split(frame.area());

    draw_header(frame, chunks[0]);
    draw_status(frame, app, chunks[1]);
    match app.screen {
        Screen::Login => draw_login_form(frame, app, chunks[2]),
        Screen::Actions => draw_actions(frame, app, chunks[2]),
    }
    draw_log(frame, app, chunks[3]);
    draw_hints(frame, app, chunks[4]);

    if let Some(modal) = &app.modal {
        draw_modal(frame, &modal.title, &modal.buffer);
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            " ProtonDrive ",
            Style::default().fg(Color::Magenta).bold(),
        ),
        Span::styled("secure cloud storage", Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let (dot_color, text) = match app.status {
        LinkState::Connected => (Color::Green, "Connected"),
        LinkState::ConfigBroken => (Color::Yellow, "Configuration error"),
        LinkState::NotConfigured => (Color::Red, "Not connected"),
    };

    let mut spans = vec![
        Span::styled("● ", Style::default().fg(dot_color)),
        Span::raw(text),
    ];
    if app.busy {
        spans.push(Span::styled(
            "   working...",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let status = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, area);
}

fn draw_login_form(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Sign in to ProtonDrive ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(inner);

    let masked: String = "\u{2022}".repeat(app.password.chars().count());
    draw_field(frame, rows[0], "Email address", &app.email, app.focus == Focus::Email);
    draw_field(frame, rows[1], "Password", &masked, app.focus == Focus::Password);
    draw_field(
        frame,
        rows[2],
        "Two-factor code (if enabled)",
        &app.otp,
        app.focus == Focus::Otp,
    );
}

fn draw_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let content = if focused {
        // Block cursor marks the insertion point
        format!("{value}\u{2588}")
    } else {
        value.to_string()
    };
    let field = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {label} ")),
    );
    frame.render_widget(field, area);
}

fn draw_actions(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  [s] ", Style::default().fg(Color::Magenta).bold()),
            Span::raw("Sync folder"),
        ]),
        Line::from(vec![
            Span::styled("  [b] ", Style::default().fg(Color::Magenta).bold()),
            Span::raw("Browse files"),
        ]),
        Line::from(vec![
            Span::styled("  [m] ", Style::default().fg(Color::Magenta).bold()),
            Span::raw("Mount drive"),
        ]),
        Line::from(vec![
            Span::styled("  [l] ", Style::default().fg(Color::Magenta).bold()),
            Span::raw("Sign in again"),
        ]),
        Line::from(vec![
            Span::styled("  [r] ", Style::default().fg(Color::Magenta).bold()),
            Span::raw("Refresh status"),
        ]),
    ];

    let title = if app.busy { " Actions (busy) " } else { " Actions " };
    let actions = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(actions, area);
}

fn draw_log(frame: &mut Frame, app: &App, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .logs
        .iter()
        .rev()
        .take(visible.max(1))
        .rev()
        .map(|line| {
            let style = match line.severity {
                Severity::Success => Style::default().fg(Color::Green),
                Severity::Error => Style::default().fg(Color::Red),
                Severity::Warning => Style::default().fg(Color::Yellow),
                Severity::Info => Style::default(),
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", line.at.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(line.message.clone(), style),
            ]))
        })
        .collect();

    let list =
        List::new(items).block(Block::default().borders(Borders::ALL).title(" Activity Log "));
    frame.render_widget(list, area);
}

fn draw_hints(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match (app.modal.is_some(), app.screen) {
        (true, _) => "Enter: confirm │ Esc: cancel",
        (false, Screen::Login) => "Tab: next field │ Enter: sign in │ Esc: quit",
        (false, Screen::Actions) => {
            "[s]ync │ [b]rowse │ [m]ount │ [l]ogin │ [r]efresh │ [c]lear log │ [q]uit"
        }
    };
    let bar = Paragraph::new(hints).block(Block::default().borders(Borders::ALL));
    frame.render_widget(bar, area);
}

/// Centered one-line input popup
fn draw_modal(frame: &mut Frame, title: &str, buffer: &str) {
    let area = centered_rect(60, 3, frame.area());
    frame.render_widget(Clear, area);
    let input = Paragraph::new(format!("{buffer}\u{2588}")).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(format!(" {title} ")),
    );
    frame.render_widget(input, area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height: height.min(area.height),
    }
}
