// All LLM prompt constants for the interview pipeline.
// Templates use `{placeholder}` markers replaced before sending.

/// Stage 1 persona: finds weak spots in the resume.
pub const SCREEN_SYSTEM: &str = "You are a ruthless tech recruiter.";

/// Stage 1 prompt. Replace `{resume_text}` and `{job_description}` before sending.
/// The list format is only requested; the reply is passed on verbatim.
pub const SCREEN_PROMPT_TEMPLATE: &str = "Resume:\n{resume_text}\n\nJob Description:\n{job_description}\n\nFind 3 weak areas or missing skills. Return ONLY a python list of strings.";

/// Stage 2 persona: writes the interview questions.
pub const QUESTION_SYSTEM: &str = "You are a Senior Engineer.";

/// Stage 2 prompt. Replace `{weaknesses}` before sending.
pub const QUESTION_PROMPT_TEMPLATE: &str = "Weaknesses found:\n{weaknesses}\n\nGenerate 3 hard technical interview questions to test these weaknesses. Return ONLY a numbered list.";

/// Stage 3 persona: grades the transcript.
pub const GRADE_SYSTEM: &str = "You are a Hiring Manager.";

/// Stage 3 prompt. Replace `{transcript}` before sending.
pub const GRADE_PROMPT_TEMPLATE: &str = "Grade these interview answers. Provide a Pass/Fail decision, a score (0-100), and feedback.\n\n{transcript}";

/// Used when stage 2 output has fewer than 3 question lines. Stable wording.
pub const FALLBACK_QUESTIONS: [&str; 3] = [
    "Describe a difficult bug you fixed.",
    "Explain a project from your resume.",
    "What is your biggest weakness?",
];

/// Stand-in for an answer the user never submitted.
pub const NO_ANSWER: &str = "No Answer";
