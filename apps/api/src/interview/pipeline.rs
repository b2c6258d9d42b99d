//! Interview pipeline: screen → generate questions → grade.
//!
//! Every stage is one completion call, awaited strictly in sequence because each
//! prompt embeds the previous stage's text. A failed call yields its error text,
//! which is fed forward like any other model output: the pipeline always
//! produces *something* and never aborts midway.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::interview::prompts::{
    FALLBACK_QUESTIONS, GRADE_PROMPT_TEMPLATE, GRADE_SYSTEM, NO_ANSWER, QUESTION_PROMPT_TEMPLATE,
    QUESTION_SYSTEM, SCREEN_PROMPT_TEMPLATE, SCREEN_SYSTEM,
};
use crate::llm_client::CompletionClient;

/// Questions kept per session.
pub const QUESTION_COUNT: usize = 3;

#[derive(Clone)]
pub struct InterviewPipeline {
    llm: Arc<dyn CompletionClient>,
}

impl InterviewPipeline {
    pub fn new(llm: Arc<dyn CompletionClient>) -> Self {
        Self { llm }
    }

    /// One completion call; failures come back as their display text.
    async fn ask(&self, stage: &str, credential: &str, system: &str, prompt: &str) -> String {
        match self.llm.complete(credential, system, prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("{stage} stage failed, passing error text forward: {e}");
                e.to_string()
            }
        }
    }

    /// Stage 1: asks for 3 weak areas of the resume against the job description.
    pub async fn screen(&self, credential: &str, resume_text: &str, job_description: &str) -> String {
        let prompt = fill_template(
            SCREEN_PROMPT_TEMPLATE,
            &[
                ("resume_text", resume_text),
                ("job_description", job_description),
            ],
        );
        self.ask("screen", credential, SCREEN_SYSTEM, &prompt).await
    }

    /// Stage 2: turns the screening output into exactly 3 questions.
    pub async fn generate_questions(&self, credential: &str, weaknesses: &str) -> Vec<String> {
        let prompt = fill_template(QUESTION_PROMPT_TEMPLATE, &[("weaknesses", weaknesses)]);
        let raw = self.ask("generate", credential, QUESTION_SYSTEM, &prompt).await;
        parse_questions(&raw)
    }

    /// Stages 1 and 2 back to back.
    pub async fn analyze(
        &self,
        credential: &str,
        resume_text: &str,
        job_description: &str,
    ) -> Vec<String> {
        info!("Screening resume ({} chars)", resume_text.len());
        let weaknesses = self.screen(credential, resume_text, job_description).await;
        debug!("Weaknesses found: {weaknesses}");

        let questions = self.generate_questions(credential, &weaknesses).await;
        info!("Generated {} interview questions", questions.len());
        questions
    }

    /// Stage 3: grades the transcript. The model's reply is the report, unparsed.
    pub async fn grade(
        &self,
        credential: &str,
        questions: &[String],
        answers: &BTreeMap<usize, String>,
    ) -> String {
        let transcript = format_transcript(questions, answers);
        let prompt = fill_template(GRADE_PROMPT_TEMPLATE, &[("transcript", &transcript)]);
        info!("Grading {} answers", answers.len());
        self.ask("grade", credential, GRADE_SYSTEM, &prompt).await
    }
}

/// Keeps the lines that contain a `?`, in order, and takes the first 3.
/// Fewer than 3 such lines means the output is unusable and the fixed
/// fallback set is returned instead.
pub fn parse_questions(raw: &str) -> Vec<String> {
    let candidates: Vec<String> = raw
        .split('\n')
        .filter(|line| line.contains('?'))
        .take(QUESTION_COUNT)
        .map(String::from)
        .collect();

    if candidates.len() < QUESTION_COUNT {
        warn!(
            "Question generation returned {} usable lines, using fallback questions",
            candidates.len()
        );
        return FALLBACK_QUESTIONS.iter().map(|q| q.to_string()).collect();
    }
    candidates
}

/// Formats `Q: …\nA: …\n\n` blocks in question order. Unanswered questions
/// read `No Answer`.
pub fn format_transcript(questions: &[String], answers: &BTreeMap<usize, String>) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let answer = answers.get(&i).map(String::as_str).unwrap_or(NO_ANSWER);
            format!("Q: {question}\nA: {answer}\n\n")
        })
        .collect()
}

/// Single-pass `{key}` substitution, so user text that happens to contain a
/// placeholder is never expanded a second time.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let replacement = after.find('}').and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, end))
        });
        match replacement {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
