// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};
use vanguard_phish::core::models::RiskLevel;
use vanguard_phish::core::scoring::HIGH_THRESHOLD;

/// Renders the verdict panel: risk level, exact total and a gauge.
///
/// Nothing is drawn until an assessment has finished.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Verdict");
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Level & score
            Constraint::Length(1), // Gauge
            Constraint::Length(2), // Spacer
            Constraint::Min(0),    // Flagged categories
        ])
        .split(area);

    if !matches!(app.state, AppState::Finished) {
        return;
    }
    let Some(level) = app.summary.level else {
        return;
    };

    let (rating_text, color) = match level {
        RiskLevel::Low => ("LOW RISK", Color::Green),
        RiskLevel::Medium => ("MEDIUM RISK", Color::Yellow),
        RiskLevel::High => ("HIGH RISK", Color::Red),
    };
    let score_text = Text::from(vec![
        Line::from(rating_text.bold().fg(color)),
        Line::from(format!("Score: {}", app.summary.total_score)),
    ]);
    frame.render_widget(Paragraph::new(score_text).alignment(Alignment::Center), summary_chunks[0]);

    // Anything at or past the High threshold fills the gauge.
    let ratio = (app.summary.total_score / HIGH_THRESHOLD).clamp(0.0, 1.0);
    let gauge = Gauge::default().ratio(ratio).label("").style(Style::default().fg(color));
    frame.render_widget(gauge, summary_chunks[1]);

    let flagged = Text::from(vec![
        Line::from("CATEGORIES FLAGGED".bold()),
        Line::from(app.summary.flagged_categories.to_string()),
    ]);
    frame.render_widget(Paragraph::new(flagged), summary_chunks[3]);
}
