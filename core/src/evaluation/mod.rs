//! Evaluation harness: fixed golden turns and a model-as-judge comparison.

mod critic;
mod golden;

pub use critic::{critique, parse_verdict, CriticVerdict, Winner};
pub use golden::{run_golden, GoldenCase, GoldenResult, GOLDEN_CASES};
