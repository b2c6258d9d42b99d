// Resume intake: turns the uploaded PDF into plain text for the interview pipeline.

pub mod extractor;

pub use extractor::{extract_text, Extraction, ExtractionError};
