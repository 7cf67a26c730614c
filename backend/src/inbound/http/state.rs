//! Shared HTTP adapter state.
//!
//! Handlers accept this via `actix_web::web::Data` so they only depend on
//! the domain's driving port and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::SurveyFlow;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Survey flow use-cases.
    pub survey: Arc<dyn SurveyFlow>,
}

impl HttpState {
    /// Construct state from the survey flow port.
    pub fn new(survey: Arc<dyn SurveyFlow>) -> Self {
        Self { survey }
    }
}
