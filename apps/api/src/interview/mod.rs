// Interview pipeline: weakness screening, question generation, answer grading.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod pipeline;
pub mod prompts;

pub use pipeline::InterviewPipeline;
