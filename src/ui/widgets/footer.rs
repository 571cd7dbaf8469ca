// src/ui/widgets/footer.rs

use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Renders the footer widget, which displays available actions.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let spans = match app.state {
        AppState::Idle => Line::from(vec![
            Span::raw("Press "),
            Span::styled("Enter", Style::new().bold().fg(Color::Yellow)),
            Span::raw(" to assess, "),
            Span::styled("Esc", Style::new().bold().fg(Color::Yellow)),
            Span::raw(" to quit."),
        ]),
        AppState::Finished => Line::from(vec![
            Span::styled("[N]", Style::new().bold().fg(Color::Yellow)),
            Span::raw("ew Assessment, "),
            Span::styled("[↑↓]", Style::new().bold().fg(Color::Yellow)),
            Span::raw(" Scroll, "),
            Span::styled("[Q]", Style::new().bold().fg(Color::Yellow)),
            Span::raw("uit"),
        ]),
        AppState::Scanning => Line::from("Assessing... Press Q to quit."),
    };

    let footer = Paragraph::new(spans).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
