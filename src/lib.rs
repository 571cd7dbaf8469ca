// src/lib.rs

//! Phishing risk assessment for URLs.
//!
//! [`core::scanner::run_full_scan`] runs a set of independent probes (blacklists,
//! lexical heuristics, WHOIS age, TLS certificate, brand similarity, page content,
//! redirects, dynamic DNS) and folds them into a [`core::models::RiskAssessment`].

pub mod config;
pub mod core;
pub mod logging;
