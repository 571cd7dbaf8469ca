// src/ui/widgets/mod.rs

pub mod analysis_view; // Per-category breakdown of the assessment.
pub mod footer;        // Key bindings for the current state.
pub mod input;         // The URL input field.
pub mod summary;       // Verdict, total score and gauge.
