//! Stateless UI rendering.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
};

use super::app::{App, Screen};
use nebula_sage::{GameStatus, MAX_ATTEMPTS, MAX_NUMBER, MIN_NUMBER, SessionView};

/// Remaining-attempt count at which the counter turns red.
const LOW_ATTEMPTS: usize = 2;

/// Renders the active screen.
pub fn draw(frame: &mut Frame, app: &App) {
    match app.screen() {
        Screen::Onboarding { validating } => draw_onboarding(frame, app, *validating),
        Screen::Game(controller) => draw_game(frame, app, &controller.view()),
    }
}

fn draw_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("Nebula Sage")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, area);
}

fn draw_onboarding(frame: &mut Frame, app: &App, validating: bool) {
    let area = center_rect(frame.area(), 64, 14);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(4), // Explanation
            Constraint::Length(3), // Key input
            Constraint::Length(3), // Notice
        ])
        .split(area);

    draw_title(frame, chunks[0]);

    let explanation = Paragraph::new(format!(
        "The Sage speaks through {}. Enter an API key to open the channel.\nEnter to submit, Esc to quit.",
        app.provider_label()
    ))
    .wrap(Wrap { trim: true })
    .alignment(Alignment::Center);
    frame.render_widget(explanation, chunks[1]);

    let masked: String = "•".repeat(app.input().chars().count());
    let input = Paragraph::new(masked).block(
        Block::default()
            .borders(Borders::ALL)
            .title(if validating { "Validating..." } else { "API key" }),
    );
    frame.render_widget(input, chunks[2]);

    if let Some(notice) = app.notice() {
        let notice = Paragraph::new(notice)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center);
        frame.render_widget(notice, chunks[3]);
    }
}

fn draw_game(frame: &mut Frame, app: &App, view: &SessionView) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),  // Title
            Constraint::Length(5),  // Oracle message
            Constraint::Length(3),  // Input or result
            Constraint::Min(10),    // Chart
            Constraint::Length(1),  // Footer
        ])
        .split(area);

    draw_title(frame, chunks[0]);
    draw_message(frame, chunks[1], view);
    draw_input_or_result(frame, chunks[2], app, view);
    draw_chart(frame, chunks[3], view);
    draw_footer(frame, chunks[4], app, view);
}

fn draw_message(frame: &mut Frame, area: Rect, view: &SessionView) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(14)])
        .split(area);

    let message = Paragraph::new(Line::from(Span::styled(
        format!("\"{}\"", view.message),
        Style::default().add_modifier(Modifier::ITALIC),
    )))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title("Oracle Feedback"));
    frame.render_widget(message, cols[0]);

    let counter_style = if view.remaining_attempts <= LOW_ATTEMPTS {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };
    let counter = Paragraph::new(view.remaining_attempts.to_string())
        .style(counter_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Left"));
    frame.render_widget(counter, cols[1]);
}

fn draw_input_or_result(frame: &mut Frame, area: Rect, app: &App, view: &SessionView) {
    let widget = match (view.status, view.target) {
        (GameStatus::Playing, _) => {
            let title = if view.pending { "Consulting the stars..." } else { "Your guess" };
            Paragraph::new(app.input().to_string())
                .block(Block::default().borders(Borders::ALL).title(title))
        }
        (status, target) => {
            let (headline, color) = if status == GameStatus::Won {
                ("You have found the truth!", Color::Green)
            } else {
                ("Your fate is spent...", Color::Red)
            };
            let target = target.map(|t| t.to_string()).unwrap_or_default();
            Paragraph::new(format!(
                "{} The hidden number was {}. Press r to seek again.",
                headline, target
            ))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
        }
    };
    frame.render_widget(widget, area);
}

fn draw_chart(frame: &mut Frame, area: Rect, view: &SessionView) {
    let guesses: Vec<(f64, f64)> = view
        .attempts
        .iter()
        .enumerate()
        .map(|(i, attempt)| ((i + 1) as f64, f64::from(attempt.value().value())))
        .collect();
    let target_line: Vec<(f64, f64)> = view
        .target
        .map(|t| {
            let y = f64::from(t.value());
            vec![(1.0, y), (MAX_ATTEMPTS as f64, y)]
        })
        .unwrap_or_default();

    let mut datasets = vec![
        Dataset::default()
            .name("guesses")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&guesses),
    ];
    if !target_line.is_empty() {
        datasets.push(
            Dataset::default()
                .name("target")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Magenta))
                .data(&target_line),
        );
    }

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("Resonance Trail"))
        .x_axis(
            Axis::default()
                .title("attempt")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([1.0, MAX_ATTEMPTS as f64])
                .labels(["1".to_string(), MAX_ATTEMPTS.to_string()]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([f64::from(MIN_NUMBER), f64::from(MAX_NUMBER)])
                .labels([MIN_NUMBER.to_string(), "50".to_string(), MAX_NUMBER.to_string()]),
        );
    frame.render_widget(chart, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App, view: &SessionView) {
    let cue = app.cue().map(|c| format!("♪ {}  ", c)).unwrap_or_default();
    let footer = Paragraph::new(format!(
        "{}session {} · oracle: {} · Ctrl+R reset · Esc quit",
        cue,
        view.session_id,
        app.provider_label()
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
