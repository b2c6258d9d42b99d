//! Resume text extraction: PDF bytes to plain text, page by page.
//!
//! Extraction fails softly: the caller always gets an `Extraction` back, with
//! empty text and an error to show the user when nothing could be read.

use lopdf::Document;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtractionError {
    #[error("Error reading PDF: {0}")]
    Unreadable(String),

    #[error("Error reading PDF: no extractable text found")]
    NoText,
}

/// Result of reading an uploaded resume. `text` is empty whenever `error` is set.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub text: String,
    pub error: Option<ExtractionError>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn failed(err: ExtractionError) -> Self {
        error!("{err}");
        Self {
            text: String::new(),
            error: Some(err),
        }
    }
}

/// Extracts text from every page in page order, skipping pages without text.
pub fn extract_text(document: &[u8]) -> Extraction {
    let doc = match Document::load_mem(document) {
        Ok(doc) => doc,
        Err(e) => return Extraction::failed(ExtractionError::Unreadable(e.to_string())),
    };

    let pages = doc.get_pages();
    debug!("Extracting text from {} PDF pages", pages.len());

    // get_pages() is a BTreeMap keyed by page number, so iteration is page order.
    let page_texts = pages.keys().map(|&page_number| {
        doc.extract_text(&[page_number])
            .map_err(|e| warn!("Skipping page {page_number}: {e}"))
            .ok()
    });

    let text = join_pages(page_texts);
    if text.is_empty() {
        return Extraction::failed(ExtractionError::NoText);
    }

    Extraction { text, error: None }
}

/// Joins per-page text with newlines, each page exactly as extracted.
/// Pages that failed or produced an empty string are dropped.
pub(crate) fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = Option<String>>,
{
    pages
        .into_iter()
        .flatten()
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
