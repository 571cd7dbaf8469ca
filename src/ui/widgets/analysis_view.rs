// src/ui/widgets/analysis_view.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
};
use vanguard_phish::core::knowledge_base;
use vanguard_phish::core::models::{ProbeResult, RiskAssessment};

pub fn render_analysis_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title("Assessment Report (Navigate with ↑ ↓)");

    if !matches!(app.state, AppState::Finished) {
        let content = match app.state {
            AppState::Idle => Paragraph::new("Enter a URL and press Enter. Results will appear here...")
                .alignment(Alignment::Center),
            AppState::Scanning => {
                let spinner_char = SPINNER_CHARS[app.spinner_frame];
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("{} ", spinner_char), Style::default().fg(Color::Cyan)),
                    Span::raw("Running probes... Please wait."),
                ]))
                .alignment(Alignment::Center)
            }
            _ => Paragraph::new(""),
        };
        frame.render_widget(content.block(main_block), area);
        return;
    }

    let lines = match &app.assessment {
        Some(Ok(assessment)) => build_report_lines(assessment),
        Some(Err(e)) => vec![Line::from(Span::styled(
            format!("Assessment failed: {}", e),
            Style::default().fg(Color::Red),
        ))],
        None => Vec::new(),
    };

    app.report_scroll_state = app.report_scroll_state.content_length(lines.len());
    let report = Paragraph::new(lines)
        .block(main_block)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset as u16, 0));
    frame.render_widget(report, area);

    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        area.inner(Margin { vertical: 1, horizontal: 0 }),
        &mut app.report_scroll_state,
    );
}

fn build_report_lines(assessment: &RiskAssessment) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![Span::raw("URL: "), Span::styled(assessment.subject.normalized.clone(), Style::default().bold())]),
        Line::from(format!("Hostname: {}", assessment.subject.hostname.as_deref().unwrap_or("-"))),
        Line::from(""),
    ];

    if let Some(reason) = &assessment.bypass_reason {
        lines.push(Line::from("✓ TRUSTED DOMAIN".bold().fg(Color::Green)));
        lines.push(Line::from(reason.clone()));
        return lines;
    }

    for (category, result) in &assessment.results {
        let score = assessment.partial_scores.get(category).copied().unwrap_or_default();
        let score_style = if score == 0.0 {
            Style::default().fg(Color::Green)
        } else if score < 2.0 {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Red)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("[+{:.1}] ", score), score_style),
            Span::styled(category.to_string(), Style::default().bold()),
        ]));
        for detail in describe_result(result) {
            lines.push(Line::from(Span::raw(format!("    {}", detail))));
        }
        if let Some(info) = knowledge_base::get_category_detail(*category) {
            lines.push(Line::from(Span::styled(
                format!("    {}", info.description),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
    }

    lines
}

/// One line per observed fact of a probe result.
fn describe_result(result: &ProbeResult) -> Vec<String> {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    match result {
        ProbeResult::Blacklist(r) => vec![
            format!("Google Safe Browsing: {}", yes_no(r.on_safe_browsing)),
            format!("Static phishing list: {}", yes_no(r.on_static_list)),
        ],
        ProbeResult::Heuristic(r) => vec![
            format!("Digits in URL: {}", yes_no(r.has_digits)),
            format!("Excessive subdomains: {}", yes_no(r.excessive_subdomains)),
            format!("Suspicious characters: {}", yes_no(r.suspicious_chars)),
        ],
        ProbeResult::Whois(r) => vec![
            format!("Status: {}", r.status),
            format!("Creation date: {}", r.creation_date.as_deref().unwrap_or("-")),
        ],
        ProbeResult::Certificate(r) => vec![
            format!("Issuer: {}", r.issuer),
            format!("Valid until: {}", r.not_after),
            format!("Expired: {}", yes_no(r.expired)),
            format!("Issuer risk: {}", r.issuer_risk),
        ],
        ProbeResult::Similarity(r) => {
            let mut close: Vec<String> = r
                .per_brand_distance
                .iter()
                .filter(|b| (1..=3).contains(&b.distance))
                .map(|b| format!("{} ({}): distance {}", b.brand, b.domain, b.distance))
                .collect();
            if close.is_empty() {
                close.push("No brand within 3 edits".to_string());
            }
            close
        }
        ProbeResult::Content(r) => vec![
            format!("Forms: {}", r.form_count),
            format!("Asks for credentials: {}", yes_no(r.requests_sensitive_data)),
        ],
        ProbeResult::Redirect(r) => vec![format!(
            "Redirect hops: {} (suspicious: {})",
            r.hop_count,
            yes_no(r.had_multiple_redirects)
        )],
        ProbeResult::DynamicDns(r) => vec![format!("Dynamic-DNS provider: {}", yes_no(r.is_dynamic))],
    }
}
