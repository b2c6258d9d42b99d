// Interview session: in-memory wizard state, its controller, and the HTTP handlers.

pub mod controller;
pub mod handlers;
pub mod models;

use thiserror::Error;

use crate::render::RenderError;
use crate::resume::ExtractionError;

pub use controller::SessionController;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("API key is missing. Set GOOGLE_API_KEY or provide an api_key.")]
    MissingCredential,

    #[error("Please upload a resume PDF to begin.")]
    MissingDocument,

    #[error("{0}")]
    Extraction(ExtractionError),

    #[error("No interview questions yet. Upload a resume and start the interview first.")]
    NotAnalyzed,

    #[error("The report has been generated. Submit all answers again to re-grade.")]
    AnswersClosed,

    #[error("Answer index {index} is out of range for {count} questions")]
    AnswerOutOfRange { index: usize, count: usize },

    #[error("No report has been generated yet")]
    NoReport,

    #[error("Report rendering failed: {0}")]
    Render(#[from] RenderError),
}
