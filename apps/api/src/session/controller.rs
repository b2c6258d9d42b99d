//! Session controller: drives one interview through Idle → Analyzed → Reported.
//!
//! Owns its `SessionState` outright; there are no globals, so running several
//! sessions means creating several controllers.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::interview::InterviewPipeline;
use crate::render::{render_report, ReportDocument};
use crate::resume::{extract_text, ExtractionError};
use crate::session::models::{SessionState, Stage};
use crate::session::SessionError;

pub struct SessionController {
    pipeline: InterviewPipeline,
    state: SessionState,
    document: Option<ReportDocument>,
}

impl SessionController {
    pub fn new(pipeline: InterviewPipeline) -> Self {
        Self {
            pipeline,
            state: SessionState::default(),
            document: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Discards questions, answers and any report, back to Idle.
    fn reset(&mut self, job_description: &str) {
        self.state = SessionState {
            job_description: job_description.to_string(),
            ..SessionState::default()
        };
        self.document = None;
    }

    /// Reads the resume and generates the interview questions.
    ///
    /// Any earlier cycle is discarded before the pipeline runs. If the resume
    /// yields no text the session stays Idle and the extraction error is returned.
    pub async fn start(
        &mut self,
        credential: &str,
        document: &[u8],
        job_description: &str,
    ) -> Result<&[String], SessionError> {
        if document.is_empty() {
            return Err(SessionError::MissingDocument);
        }
        if credential.trim().is_empty() {
            return Err(SessionError::MissingCredential);
        }

        self.reset(job_description);

        let extraction = extract_text(document);
        if extraction.is_empty() {
            let err = extraction.error.unwrap_or(ExtractionError::NoText);
            return Err(SessionError::Extraction(err));
        }
        self.state.resume_text = extraction.text;

        let questions = self
            .pipeline
            .analyze(credential, &self.state.resume_text, job_description)
            .await;

        self.state.questions = questions;
        self.state.stage = Stage::Analyzed;
        info!("Resume analyzed, {} questions ready", self.state.questions.len());

        Ok(&self.state.questions)
    }

    /// Stores one answer without grading. Only accepted while Analyzed, so the
    /// stored answers always match the served report.
    pub fn record_answer(&mut self, index: usize, answer: String) -> Result<(), SessionError> {
        match self.state.stage {
            Stage::Idle => return Err(SessionError::NotAnalyzed),
            Stage::Reported => return Err(SessionError::AnswersClosed),
            Stage::Analyzed => {}
        }
        self.check_index(index)?;
        self.state.answers.insert(index, answer);
        Ok(())
    }

    /// Merges the submitted answers, grades the transcript and renders the report.
    ///
    /// Allowed again once Reported: resubmitting re-grades the same questions.
    /// On error the answers, report and document are left as they were.
    pub async fn submit(
        &mut self,
        credential: &str,
        answers: BTreeMap<usize, String>,
    ) -> Result<&str, SessionError> {
        if self.state.questions.is_empty() {
            return Err(SessionError::NotAnalyzed);
        }
        for &index in answers.keys() {
            self.check_index(index)?;
        }
        let mut merged = self.state.answers.clone();
        merged.extend(answers);

        let report = self
            .pipeline
            .grade(credential, &self.state.questions, &merged)
            .await;
        let document = render_report(&report)?;

        // Nothing is committed unless rendering succeeded.
        self.state.answers = merged;
        self.document = Some(document);
        self.state.stage = Stage::Reported;
        info!("Interview graded, report is {} chars", report.len());

        Ok(self.state.report.insert(report).as_str())
    }

    /// The rendered report, available once the session is Reported.
    pub fn report_document(&self) -> Result<&ReportDocument, SessionError> {
        match (&self.state.stage, &self.document) {
            (Stage::Reported, Some(document)) => Ok(document),
            _ => Err(SessionError::NoReport),
        }
    }

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        let count = self.state.questions.len();
        if index >= count {
            warn!("Rejecting answer for question {index}, only {count} questions");
            return Err(SessionError::AnswerOutOfRange { index, count });
        }
        Ok(())
    }
}
