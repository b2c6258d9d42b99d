use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::interview::InterviewPipeline;
use crate::llm_client::CompletionClient;
use crate::session::SessionController;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one interview session this process serves. Held for the whole
    /// request, so a slow model call blocks every other request.
    pub session: Arc<Mutex<SessionController>>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn CompletionClient>) -> Self {
        let pipeline = InterviewPipeline::new(llm);
        Self {
            session: Arc::new(Mutex::new(SessionController::new(pipeline))),
            config,
        }
    }
}
