use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::DEFAULT_JOB_DESCRIPTION;

/// Wizard stage. Answers are collected while `Analyzed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Idle,
    Analyzed,
    Reported,
}

/// Everything one interview session knows. Lives only in memory.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub resume_text: String,
    pub job_description: String,
    /// Empty until analysis, then exactly 3.
    pub questions: Vec<String>,
    /// Keyed by question index.
    pub answers: BTreeMap<usize, String>,
    pub report: Option<String>,
    pub stage: Stage,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            resume_text: String::new(),
            job_description: DEFAULT_JOB_DESCRIPTION.to_string(),
            questions: Vec::new(),
            answers: BTreeMap::new(),
            report: None,
            stage: Stage::Idle,
        }
    }
}
