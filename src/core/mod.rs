// src/core/mod.rs

// The assessment engine: data model, static registries, the probes, and the
// scoring that turns probe results into a verdict. Nothing in here touches
// the terminal.

/// Data structures shared by every probe and by the front-end, such as
/// `RiskAssessment`, `ProbeResult` and `Verdict`.
pub mod models;

/// Static reference data: trusted whitelist, brand registry, CA reputation
/// lists, dynamic-DNS fragments and category descriptions.
pub mod knowledge_base;

/// Input normalization and the trusted-domain short-circuit.
pub mod target;

/// The probes and the orchestrator that runs them concurrently.
pub mod scanner;

/// Pure scoring rules and verdict classification.
pub mod scoring;
