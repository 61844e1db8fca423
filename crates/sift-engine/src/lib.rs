//! Evaluation facade for sift.
//!
//! [`Engine`] binds a [`SiftConfig`](sift_core::config::SiftConfig) to every
//! analysis pass and the executor, and [`Engine::evaluate`] runs a whole
//! request, keeping each component's failure in its own report slot.

pub mod engine;
pub mod types;

pub use engine::{Engine, EngineError};
pub use types::{AnalysisOutcome, EvaluationReport, EvaluationRequest};
