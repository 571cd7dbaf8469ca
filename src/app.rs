// src/app.rs

use ratatui::widgets::ScrollbarState;
use vanguard_phish::core::models::{RiskAssessment, RiskLevel};

pub const SPINNER_CHARS: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub enum AppState {
    Idle,
    Scanning,
    Finished,
}

/// What the verdict panel shows once a scan completes.
#[derive(Debug, Default)]
pub struct ScanSummary {
    pub level: Option<RiskLevel>,
    pub total_score: f64,
    pub flagged_categories: usize,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub assessment: Option<Result<RiskAssessment, String>>,
    pub summary: ScanSummary,
    pub spinner_frame: usize,
    pub scroll_offset: usize,
    pub report_scroll_state: ScrollbarState,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            state: AppState::Idle,
            input: String::new(),
            assessment: None,
            summary: ScanSummary::default(),
            spinner_frame: 0,
            scroll_offset: 0,
            report_scroll_state: ScrollbarState::default(),
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    /// Stores a finished assessment and derives the summary panel from it.
    pub fn finish_scan(&mut self, outcome: Result<RiskAssessment, String>) {
        self.summary = match &outcome {
            Ok(assessment) => ScanSummary {
                level: Some(assessment.verdict.level),
                total_score: assessment.total_score,
                flagged_categories: assessment.partial_scores.values().filter(|s| **s > 0.0).count(),
            },
            Err(_) => ScanSummary::default(),
        };
        self.assessment = Some(outcome);
        self.state = AppState::Finished;
    }

    pub fn on_tick(&mut self) {
        if let AppState::Scanning = self.state {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn reset(&mut self) {
        self.state = AppState::Idle;
        self.input = String::new();
        self.assessment = None;
        self.summary = ScanSummary::default();
        self.spinner_frame = 0;
        self.scroll_offset = 0;
        self.report_scroll_state = ScrollbarState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use vanguard_phish::core::models::{Category, UrlSubject, Verdict};

    fn assessment() -> RiskAssessment {
        let partial_scores: BTreeMap<Category, f64> =
            [(Category::Whois, 0.5), (Category::Content, 2.5), (Category::Redirect, 0.0)].into_iter().collect();
        RiskAssessment {
            subject: UrlSubject::parse("example.com"),
            results: BTreeMap::new(),
            partial_scores,
            total_score: 3.0,
            verdict: Verdict { level: RiskLevel::Medium, score: 3.0 },
            bypass_reason: None,
        }
    }

    #[test]
    fn finishing_a_scan_fills_the_summary() {
        let mut app = App::new();
        app.state = AppState::Scanning;
        app.finish_scan(Ok(assessment()));
        assert!(matches!(app.state, AppState::Finished));
        assert_eq!(app.summary.level, Some(RiskLevel::Medium));
        assert_eq!(app.summary.flagged_categories, 2);
    }

    #[test]
    fn reset_clears_the_previous_assessment() {
        let mut app = App::new();
        app.input = "example.com".to_string();
        app.finish_scan(Err("boom".to_string()));
        app.reset();
        assert!(app.assessment.is_none());
        assert!(app.input.is_empty());
        assert!(matches!(app.state, AppState::Idle));
    }
}
